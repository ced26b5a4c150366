//! Model fitting and inference building blocks.
//!
//! Everything here works on in-memory matrices; file handling lives in
//! [`crate::artifact`] and [`crate::dataset`].

pub mod metrics;
pub mod scaler;
pub mod svm;
