//! Linear support-vector classifier with Platt-calibrated probabilities.
//!
//! - Binary classification over standardized feature vectors.
//! - Deterministic dual coordinate descent (seeded permutation order).
//! - JSON export/load through the artifact layer.

mod platt;
mod train;

pub use platt::PlattScaling;
pub use train::{TrainOptions, train_linear_svm};

use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ml::metrics::HoldoutMetrics;

pub const SVM_MODEL_VERSION: i64 = 1;

#[derive(Debug, Error)]
pub enum SvmError {
    #[error("empty training set")]
    EmptyTrainingSet,
    #[error("mismatched training inputs/labels ({rows} rows, {labels} labels)")]
    MismatchedLabels { rows: usize, labels: usize },
    #[error("expected exactly 2 classes, got {0}")]
    NotBinary(usize),
    #[error("class '{0}' has no training rows")]
    MissingClass(String),
    #[error("label index {0} out of range")]
    LabelOutOfRange(usize),
    #[error("non-finite feature value at row {row}, column {column}")]
    NonFinite { row: usize, column: usize },
    #[error("expected {expected} features, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("invalid model: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    Linear,
}

/// Solver bookkeeping recorded with the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverSummary {
    pub iterations: usize,
    pub converged: bool,
    pub support_vectors: usize,
}

/// Fitted linear decision function `w·x + b` over standardized features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSvmModel {
    pub model_version: i64,
    pub kernel: Kernel,
    /// Sorted class labels; index 1 is the positive side of the margin.
    pub classes: Vec<String>,
    pub feature_len: usize,
    pub weights: Vec<f64>,
    pub bias: f64,
    pub c: f64,
    pub platt: PlattScaling,
    pub solver: SolverSummary,
    #[serde(default)]
    pub metrics: Option<HoldoutMetrics>,
}

impl LinearSvmModel {
    pub fn validate(&self) -> Result<(), SvmError> {
        if self.model_version != SVM_MODEL_VERSION {
            return Err(SvmError::Invalid(format!(
                "unsupported model_version {} (expected {SVM_MODEL_VERSION})",
                self.model_version
            )));
        }
        if self.classes.len() != 2 {
            return Err(SvmError::NotBinary(self.classes.len()));
        }
        if self.feature_len == 0 {
            return Err(SvmError::Invalid("feature_len must be > 0".to_string()));
        }
        if self.weights.len() != self.feature_len {
            return Err(SvmError::Invalid("weights length mismatch".to_string()));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(SvmError::Invalid("non-finite coefficients".to_string()));
        }
        if !self.platt.a.is_finite() || !self.platt.b.is_finite() {
            return Err(SvmError::Invalid("non-finite Platt coefficients".to_string()));
        }
        Ok(())
    }

    /// Signed distance-like score; positive values favor `classes[1]`.
    pub fn decision_function(&self, features: &[f64]) -> Result<f64, SvmError> {
        self.check_width(features.len())?;
        Ok(self.score(ArrayView1::from(features)))
    }

    /// Decision values for every row of `x`.
    pub fn decision_values(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>, SvmError> {
        self.check_width(x.ncols())?;
        Ok(x.rows().into_iter().map(|row| self.score(row)).collect())
    }

    pub fn predict_class_index(&self, features: &[f64]) -> Result<usize, SvmError> {
        Ok(class_for(self.decision_function(features)?))
    }

    /// Predicted class indices for every row of `x`.
    pub fn predict_indices(&self, x: ArrayView2<'_, f64>) -> Result<Vec<usize>, SvmError> {
        Ok(self.decision_values(x)?.iter().map(|&f| class_for(f)).collect())
    }

    /// Predicted class label.
    pub fn predict(&self, features: &[f64]) -> Result<&str, SvmError> {
        let idx = self.predict_class_index(features)?;
        Ok(self.classes[idx].as_str())
    }

    /// Probability for each class, aligned with `classes`.
    pub fn predict_proba(&self, features: &[f64]) -> Result<[f64; 2], SvmError> {
        let positive = self.platt.probability(self.decision_function(features)?);
        Ok([1.0 - positive, positive])
    }

    fn score(&self, row: ArrayView1<'_, f64>) -> f64 {
        row.iter()
            .zip(&self.weights)
            .fold(self.bias, |acc, (x, w)| acc + x * w)
    }

    fn check_width(&self, found: usize) -> Result<(), SvmError> {
        if found != self.feature_len {
            return Err(SvmError::DimensionMismatch {
                expected: self.feature_len,
                found,
            });
        }
        Ok(())
    }
}

fn class_for(decision: f64) -> usize {
    usize::from(decision > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn model() -> LinearSvmModel {
        LinearSvmModel {
            model_version: SVM_MODEL_VERSION,
            kernel: Kernel::Linear,
            classes: vec!["0".into(), "1".into()],
            feature_len: 2,
            weights: vec![2.0, -1.0],
            bias: 0.5,
            c: 1.0,
            platt: PlattScaling { a: -2.0, b: 0.0 },
            solver: SolverSummary {
                iterations: 1,
                converged: true,
                support_vectors: 0,
            },
            metrics: None,
        }
    }

    #[test]
    fn decision_sign_selects_class() {
        let m = model();
        assert_eq!(m.decision_function(&[1.0, 0.0]).unwrap(), 2.5);
        assert_eq!(m.predict(&[1.0, 0.0]).unwrap(), "1");
        assert_eq!(m.predict(&[-1.0, 0.0]).unwrap(), "0");
        let x = array![[1.0, 0.0], [-1.0, 0.0]];
        assert_eq!(m.predict_indices(x.view()).unwrap(), vec![1, 0]);
    }

    #[test]
    fn probabilities_sum_to_one_and_follow_decision() {
        let m = model();
        let [p0, p1] = m.predict_proba(&[1.0, 0.0]).unwrap();
        assert!((p0 + p1 - 1.0).abs() < 1e-12);
        assert!(p1 > 0.5);
    }

    #[test]
    fn wrong_width_is_rejected() {
        let err = model().decision_function(&[1.0]).unwrap_err();
        assert!(matches!(err, SvmError::DimensionMismatch { .. }));
    }

    #[test]
    fn validate_catches_weight_length_mismatch() {
        let mut m = model();
        m.weights.push(0.0);
        assert!(m.validate().is_err());
    }
}
