use ndarray::ArrayView2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{Kernel, LinearSvmModel, PlattScaling, SVM_MODEL_VERSION, SolverSummary, SvmError};

/// Hyperparameters for the dual coordinate descent solver.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    /// Soft-margin penalty; upper bound of each dual variable.
    pub c: f64,
    /// Stop once the projected-gradient spread drops below this.
    pub tolerance: f64,
    pub max_iterations: usize,
    /// Seeds the coordinate visiting order.
    pub seed: u64,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            c: 1.0,
            tolerance: 0.1,
            max_iterations: 1000,
            seed: 2,
        }
    }
}

/// Fit a binary hinge-loss linear SVM and calibrate its probabilities.
///
/// `y` holds class indices into `classes`; index 1 is the positive label. The
/// bias is learned as the weight of an implicit constant feature.
pub fn train_linear_svm(
    x: ArrayView2<'_, f64>,
    y: &[usize],
    classes: &[String],
    options: &TrainOptions,
) -> Result<LinearSvmModel, SvmError> {
    validate_inputs(x, y, classes)?;
    let n = x.nrows();
    let d = x.ncols();
    let c = options.c;

    let signs: Vec<f64> = y.iter().map(|&label| if label == 1 { 1.0 } else { -1.0 }).collect();
    // Diagonal of the dual Hessian, including the constant bias feature.
    let q_diag: Vec<f64> = x
        .rows()
        .into_iter()
        .map(|row| row.dot(&row) + 1.0)
        .collect();

    let mut w = vec![0.0f64; d];
    let mut bias = 0.0f64;
    let mut alpha = vec![0.0f64; n];
    let mut order: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(options.seed);

    let mut iterations = 0usize;
    let mut converged = false;
    while iterations < options.max_iterations {
        iterations += 1;
        order.shuffle(&mut rng);
        let mut pg_max = f64::NEG_INFINITY;
        let mut pg_min = f64::INFINITY;
        for &i in &order {
            let row = x.row(i);
            let margin = row.iter().zip(&w).fold(bias, |acc, (v, wj)| acc + v * wj);
            let grad = signs[i] * margin - 1.0;
            let projected = if alpha[i] == 0.0 {
                grad.min(0.0)
            } else if alpha[i] == c {
                grad.max(0.0)
            } else {
                grad
            };
            pg_max = pg_max.max(projected);
            pg_min = pg_min.min(projected);
            if projected.abs() <= 1e-12 {
                continue;
            }
            let previous = alpha[i];
            alpha[i] = (previous - grad / q_diag[i]).clamp(0.0, c);
            let delta = (alpha[i] - previous) * signs[i];
            for (wj, v) in w.iter_mut().zip(row.iter()) {
                *wj += delta * v;
            }
            bias += delta;
        }
        if pg_max - pg_min <= options.tolerance {
            converged = true;
            break;
        }
    }
    if !converged {
        tracing::warn!(
            "Linear SVM did not converge within {} iterations",
            options.max_iterations
        );
    }

    let decisions: Vec<f64> = x
        .rows()
        .into_iter()
        .map(|row| row.iter().zip(&w).fold(bias, |acc, (v, wj)| acc + v * wj))
        .collect();
    let platt = PlattScaling::fit(&decisions, y);
    let support_vectors = alpha.iter().filter(|&&a| a > 0.0).count();
    tracing::debug!(
        iterations,
        converged,
        support_vectors,
        "Linear SVM fitted on {n} rows x {d} features"
    );

    let model = LinearSvmModel {
        model_version: SVM_MODEL_VERSION,
        kernel: Kernel::Linear,
        classes: classes.to_vec(),
        feature_len: d,
        weights: w,
        bias,
        c,
        platt,
        solver: SolverSummary {
            iterations,
            converged,
            support_vectors,
        },
        metrics: None,
    };
    model.validate()?;
    Ok(model)
}

fn validate_inputs(x: ArrayView2<'_, f64>, y: &[usize], classes: &[String]) -> Result<(), SvmError> {
    if x.nrows() == 0 || x.ncols() == 0 {
        return Err(SvmError::EmptyTrainingSet);
    }
    if x.nrows() != y.len() {
        return Err(SvmError::MismatchedLabels {
            rows: x.nrows(),
            labels: y.len(),
        });
    }
    if classes.len() != 2 {
        return Err(SvmError::NotBinary(classes.len()));
    }
    let mut seen = [false; 2];
    for &label in y {
        let slot = seen.get_mut(label).ok_or(SvmError::LabelOutOfRange(label))?;
        *slot = true;
    }
    if let Some(missing) = seen.iter().position(|present| !present) {
        return Err(SvmError::MissingClass(classes[missing].clone()));
    }
    for ((row, column), value) in x.indexed_iter() {
        if !value.is_finite() {
            return Err(SvmError::NonFinite { row, column });
        }
    }
    Ok(())
}
