//! JSON persistence for fitted scalers and classifiers.
//!
//! Each artifact is a single document carrying its kind and format version next
//! to the payload, so a scaler file cannot be loaded as a classifier by mistake.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::ml::scaler::StandardScaler;
use crate::ml::svm::LinearSvmModel;

pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Scaler,
    Classifier,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid artifact json in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path} holds a {found:?} artifact, expected {expected:?}")]
    KindMismatch {
        path: PathBuf,
        expected: ArtifactKind,
        found: ArtifactKind,
    },
    #[error("{path} has unsupported format_version {found}")]
    UnsupportedVersion { path: PathBuf, found: u32 },
    #[error("{path} failed validation: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

/// A fitted object that can be written to and read back from disk.
pub trait Artifact: Serialize + DeserializeOwned {
    const KIND: ArtifactKind;

    fn check(&self) -> Result<(), String>;
}

impl Artifact for StandardScaler {
    const KIND: ArtifactKind = ArtifactKind::Scaler;

    fn check(&self) -> Result<(), String> {
        self.validate().map_err(|err| err.to_string())
    }
}

impl Artifact for LinearSvmModel {
    const KIND: ArtifactKind = ArtifactKind::Classifier;

    fn check(&self) -> Result<(), String> {
        self.validate().map_err(|err| err.to_string())
    }
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    kind: ArtifactKind,
    format_version: u32,
    payload: &'a T,
}

#[derive(Deserialize)]
struct EnvelopeIn<T> {
    kind: ArtifactKind,
    format_version: u32,
    payload: T,
}

/// Write `artifact` to `path`, creating parent directories and replacing any existing file.
pub fn save<T: Artifact>(path: &Path, artifact: &T) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ArtifactError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let envelope = EnvelopeOut {
        kind: T::KIND,
        format_version: ARTIFACT_FORMAT_VERSION,
        payload: artifact,
    };
    let bytes = serde_json::to_vec_pretty(&envelope).map_err(|source| ArtifactError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, bytes).map_err(|source| ArtifactError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read and validate an artifact of type `T` from `path`.
pub fn load<T: Artifact>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = std::fs::read(path).map_err(|source| ArtifactError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let envelope: EnvelopeIn<serde_json::Value> =
        serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    if envelope.kind != T::KIND {
        return Err(ArtifactError::KindMismatch {
            path: path.to_path_buf(),
            expected: T::KIND,
            found: envelope.kind,
        });
    }
    if envelope.format_version != ARTIFACT_FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            path: path.to_path_buf(),
            found: envelope.format_version,
        });
    }
    let artifact: T =
        serde_json::from_value(envelope.payload).map_err(|source| ArtifactError::Json {
            path: path.to_path_buf(),
            source,
        })?;
    artifact.check().map_err(|reason| ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    })?;
    Ok(artifact)
}
