//! Train-and-persist routine: CSV → standardization → linear SVM → artifacts.
//!
//! Every failure is contained per job. A missing dataset is reported and
//! skipped without touching the filesystem; any other error is logged with
//! its cause and returned as [`TrainOutcome::Failed`].

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::artifact::{self, ArtifactError};
use crate::config::TrainingSettings;
use crate::dataset::{DatasetError, FeatureSelection, LabeledMatrix, Table, stratified_split};
use crate::domain::DomainSpec;
use crate::ml::metrics::{ConfusionMatrix, HoldoutMetrics};
use crate::ml::scaler::{ScalerError, StandardScaler};
use crate::ml::svm::{self, LinearSvmModel, SvmError};

#[derive(Debug, Error)]
pub enum TrainError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),
    #[error(transparent)]
    Scaler(#[from] ScalerError),
    #[error(transparent)]
    Svm(#[from] SvmError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

/// Inputs and outputs for one train-and-persist run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainJob {
    /// Name used in log lines.
    pub name: String,
    pub dataset: PathBuf,
    pub model_out: PathBuf,
    pub scaler_out: PathBuf,
    pub label_column: String,
    pub id_column: Option<String>,
}

impl TrainJob {
    /// Build a job from a domain spec, resolving relative paths against `root`.
    pub fn from_spec(spec: &DomainSpec, root: &Path) -> Self {
        let resolved = spec.resolved(root);
        Self {
            name: spec.domain.display_name().to_string(),
            dataset: resolved.dataset,
            model_out: resolved.model,
            scaler_out: resolved.scaler,
            label_column: resolved.label_column,
            id_column: resolved.id_column,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub test_fraction: f64,
    pub svm: svm::TrainOptions,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self::from(&TrainingSettings::default())
    }
}

impl From<&TrainingSettings> for TrainOptions {
    fn from(settings: &TrainingSettings) -> Self {
        Self {
            test_fraction: settings.test_fraction,
            svm: svm::TrainOptions {
                c: settings.c,
                tolerance: settings.tolerance,
                max_iterations: settings.max_iterations,
                seed: settings.seed,
            },
        }
    }
}

/// What a successful run fitted and where it was written.
#[derive(Debug, Clone)]
pub struct TrainSummary {
    pub rows: usize,
    pub features: usize,
    pub train_rows: usize,
    pub holdout: HoldoutMetrics,
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
}

#[derive(Debug)]
pub enum TrainOutcome {
    Trained(TrainSummary),
    DatasetMissing,
    Failed(TrainError),
}

impl TrainOutcome {
    pub fn is_trained(&self) -> bool {
        matches!(self, TrainOutcome::Trained(_))
    }
}

/// Fitted pair plus bookkeeping, before anything touches the disk.
#[derive(Debug, Clone)]
pub struct FittedPair {
    pub scaler: StandardScaler,
    pub classifier: LinearSvmModel,
    pub holdout: HoldoutMetrics,
    pub rows: usize,
    pub train_rows: usize,
}

/// Run one job. Never panics on bad input and never returns an error;
/// the outcome says what happened.
pub fn train_and_persist(job: &TrainJob, options: &TrainOptions) -> TrainOutcome {
    if !job.dataset.is_file() {
        tracing::error!(
            "Dataset {} was not found; place it in the datasets folder to train the {} model",
            job.dataset.display(),
            job.name
        );
        return TrainOutcome::DatasetMissing;
    }
    match fit_and_persist(job, options) {
        Ok(summary) => {
            tracing::info!(
                "Trained {} model from {} ({} rows, {} features); holdout accuracy {:.3}; saved to {}",
                job.name,
                job.dataset.display(),
                summary.rows,
                summary.features,
                summary.holdout.accuracy,
                summary.model_path.display()
            );
            TrainOutcome::Trained(summary)
        }
        Err(err) => {
            tracing::error!("Failed to process {}: {err}", job.dataset.display());
            TrainOutcome::Failed(err)
        }
    }
}

/// Run every job in order. A failed job does not stop the ones after it.
pub fn train_all(jobs: &[TrainJob], options: &TrainOptions) -> Vec<(String, TrainOutcome)> {
    jobs.iter()
        .map(|job| (job.name.clone(), train_and_persist(job, options)))
        .collect()
}

/// Load, standardize, split and fit without writing anything.
pub fn fit_job(job: &TrainJob, options: &TrainOptions) -> Result<FittedPair, TrainError> {
    let table = Table::from_path(&job.dataset)?;
    let data = table.select(FeatureSelection {
        label_column: &job.label_column,
        id_column: job.id_column.as_deref(),
    })?;

    // Scaler sees every row, not only the training split.
    let scaler = StandardScaler::fit(data.x.view(), data.feature_names.clone())?;
    let data = LabeledMatrix {
        x: scaler.transform(data.x.view())?,
        ..data
    };

    let split = stratified_split(&data.y, &data.classes, options.test_fraction, options.svm.seed)?;
    let (train_x, train_y) = data.subset(&split.train);
    let mut classifier =
        svm::train_linear_svm(train_x.view(), &train_y, &data.classes, &options.svm)?;

    let (holdout_x, holdout_y) = data.subset(&split.test);
    let predicted = classifier.predict_indices(holdout_x.view())?;
    let cm = ConfusionMatrix::from_pairs(data.classes.len(), &holdout_y, &predicted);
    let holdout = HoldoutMetrics::from_confusion(&cm, &data.classes);
    classifier.metrics = Some(holdout.clone());

    Ok(FittedPair {
        scaler,
        classifier,
        holdout,
        rows: data.n_rows(),
        train_rows: split.train.len(),
    })
}

fn fit_and_persist(job: &TrainJob, options: &TrainOptions) -> Result<TrainSummary, TrainError> {
    let fitted = fit_job(job, options)?;
    // Classifier first: a failed scaler write leaves only the classifier behind.
    artifact::save(&job.model_out, &fitted.classifier)?;
    artifact::save(&job.scaler_out, &fitted.scaler)?;
    Ok(TrainSummary {
        rows: fitted.rows,
        features: fitted.scaler.n_features(),
        train_rows: fitted.train_rows,
        holdout: fitted.holdout,
        model_path: job.model_out.clone(),
        scaler_path: job.scaler_out.clone(),
    })
}
