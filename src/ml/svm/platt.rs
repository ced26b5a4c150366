use serde::{Deserialize, Serialize};

const MAX_ITERATIONS: usize = 100;
const MIN_STEP: f64 = 1e-10;
const HESSIAN_RIDGE: f64 = 1e-12;
const GRADIENT_EPS: f64 = 1e-5;

/// Sigmoid `P(positive | f) = 1 / (1 + exp(a * f + b))` over decision values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlattScaling {
    pub a: f64,
    pub b: f64,
}

impl PlattScaling {
    pub fn probability(&self, decision: f64) -> f64 {
        let z = self.a * decision + self.b;
        if z >= 0.0 {
            let e = (-z).exp();
            e / (1.0 + e)
        } else {
            1.0 / (1.0 + z.exp())
        }
    }

    /// Fit the sigmoid to decision values and `{0, 1}` labels with Newton's method
    /// and backtracking line search. Targets are smoothed toward the class priors
    /// so separable data does not drive the coefficients to infinity.
    pub fn fit(decisions: &[f64], labels: &[usize]) -> Self {
        let positives = labels.iter().filter(|&&y| y == 1).count() as f64;
        let negatives = labels.len() as f64 - positives;
        let hi_target = (positives + 1.0) / (positives + 2.0);
        let lo_target = 1.0 / (negatives + 2.0);
        let targets: Vec<f64> = labels
            .iter()
            .map(|&y| if y == 1 { hi_target } else { lo_target })
            .collect();

        let mut a = 0.0;
        let mut b = ((negatives + 1.0) / (positives + 1.0)).ln();
        let mut fval = objective(decisions, &targets, a, b);

        for iteration in 0..MAX_ITERATIONS {
            let mut h11 = HESSIAN_RIDGE;
            let mut h22 = HESSIAN_RIDGE;
            let mut h21 = 0.0;
            let mut g1 = 0.0;
            let mut g2 = 0.0;
            for (&f, &t) in decisions.iter().zip(&targets) {
                let z = f * a + b;
                let (p, q) = if z >= 0.0 {
                    let e = (-z).exp();
                    (e / (1.0 + e), 1.0 / (1.0 + e))
                } else {
                    let e = z.exp();
                    (1.0 / (1.0 + e), e / (1.0 + e))
                };
                let d2 = p * q;
                h11 += f * f * d2;
                h22 += d2;
                h21 += f * d2;
                let d1 = t - p;
                g1 += f * d1;
                g2 += d1;
            }
            if g1.abs() < GRADIENT_EPS && g2.abs() < GRADIENT_EPS {
                break;
            }

            let det = h11 * h22 - h21 * h21;
            let da = -(h22 * g1 - h21 * g2) / det;
            let db = -(-h21 * g1 + h11 * g2) / det;
            let gd = g1 * da + g2 * db;

            let mut step = 1.0;
            while step >= MIN_STEP {
                let new_a = a + step * da;
                let new_b = b + step * db;
                let new_f = objective(decisions, &targets, new_a, new_b);
                if new_f < fval + 1e-4 * step * gd {
                    a = new_a;
                    b = new_b;
                    fval = new_f;
                    break;
                }
                step /= 2.0;
            }
            if step < MIN_STEP {
                tracing::debug!("Platt line search stalled at iteration {iteration}");
                break;
            }
        }
        Self { a, b }
    }
}

fn objective(decisions: &[f64], targets: &[f64], a: f64, b: f64) -> f64 {
    decisions
        .iter()
        .zip(targets)
        .map(|(&f, &t)| {
            let z = f * a + b;
            if z >= 0.0 {
                t * z + (-z).exp().ln_1p()
            } else {
                (t - 1.0) * z + z.exp().ln_1p()
            }
        })
        .sum()
}
