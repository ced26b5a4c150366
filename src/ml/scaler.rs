//! Per-column standardization fitted once and reapplied at inference time.

use ndarray::{Array1, Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Columns whose standard deviation falls below this are left unscaled.
const MIN_SCALE: f64 = 1e-12;

#[derive(Debug, Error)]
pub enum ScalerError {
    #[error("cannot fit a scaler on an empty matrix")]
    Empty,
    #[error("expected {expected} features, got {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("invalid scaler: {0}")]
    Invalid(String),
}

/// Fitted mean and scale for each feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    /// Population standard deviation; `1.0` for constant columns.
    pub scale: Vec<f64>,
    pub n_samples_seen: usize,
}

impl StandardScaler {
    /// Fit column means and population standard deviations over every row of `x`.
    pub fn fit(x: ArrayView2<'_, f64>, feature_names: Vec<String>) -> Result<Self, ScalerError> {
        if x.nrows() == 0 || x.ncols() == 0 {
            return Err(ScalerError::Empty);
        }
        if feature_names.len() != x.ncols() {
            return Err(ScalerError::DimensionMismatch {
                expected: feature_names.len(),
                found: x.ncols(),
            });
        }
        let mean = x.mean_axis(Axis(0)).ok_or(ScalerError::Empty)?;
        let scale = x
            .var_axis(Axis(0), 0.0)
            .mapv(|var| {
                let std = var.sqrt();
                if std < MIN_SCALE { 1.0 } else { std }
            });
        let scaler = Self {
            feature_names,
            mean: mean.to_vec(),
            scale: scale.to_vec(),
            n_samples_seen: x.nrows(),
        };
        scaler.validate()?;
        Ok(scaler)
    }

    pub fn n_features(&self) -> usize {
        self.mean.len()
    }

    /// Standardize every row of `x`.
    pub fn transform(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>, ScalerError> {
        self.check_width(x.ncols())?;
        let mean = Array1::from(self.mean.clone());
        let scale = Array1::from(self.scale.clone());
        Ok((&x - &mean) / &scale)
    }

    /// Standardize a single feature vector.
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, ScalerError> {
        self.check_width(row.len())?;
        Ok(row
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| (value - mean) / scale)
            .collect())
    }

    pub fn validate(&self) -> Result<(), ScalerError> {
        let n = self.mean.len();
        if n == 0 {
            return Err(ScalerError::Invalid("no features".to_string()));
        }
        if self.scale.len() != n || self.feature_names.len() != n {
            return Err(ScalerError::Invalid("length mismatch".to_string()));
        }
        if self.mean.iter().any(|v| !v.is_finite()) {
            return Err(ScalerError::Invalid("non-finite mean".to_string()));
        }
        if self.scale.iter().any(|v| !v.is_finite() || *v <= 0.0) {
            return Err(ScalerError::Invalid("scale must be finite and > 0".to_string()));
        }
        Ok(())
    }

    fn check_width(&self, found: usize) -> Result<(), ScalerError> {
        if found != self.n_features() {
            return Err(ScalerError::DimensionMismatch {
                expected: self.n_features(),
                found,
            });
        }
        Ok(())
    }
}
