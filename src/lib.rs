//! Library exports shared by the trainer and status binaries, tests and benches.
/// Scaler/classifier persistence.
pub mod artifact;
/// TOML configuration.
pub mod config;
/// CSV loading and stratified splits.
pub mod dataset;
/// Disease domains and conventional paths.
pub mod domain;
/// Tracing setup and log file location.
pub mod logging;
/// Standardization, linear SVM and metrics.
pub mod ml;
/// Artifact loading and form handling for the interactive page.
pub mod presenter;
/// Train-and-persist routine.
pub mod trainer;
