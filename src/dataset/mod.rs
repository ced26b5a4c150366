//! Tabular dataset loading and stratified splitting for the trainer.

pub mod loader;
pub mod split;

pub use loader::{DatasetError, FeatureSelection, LabeledMatrix, Table};
pub use split::{Split, stratified_split};
