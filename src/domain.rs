//! Disease domains and the conventional file layout shared by trainer and presenter.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Directory holding the input CSV files, relative to the project root.
pub const DATASETS_DIR: &str = "datasets";
/// Directory receiving the fitted artifacts, relative to the project root.
pub const MODELS_DIR: &str = "models";

/// One of the three disease domains the demo covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiseaseDomain {
    Diabetes,
    Heart,
    Parkinsons,
}

impl DiseaseDomain {
    /// All domains in training order.
    pub const ALL: [DiseaseDomain; 3] = [
        DiseaseDomain::Diabetes,
        DiseaseDomain::Heart,
        DiseaseDomain::Parkinsons,
    ];

    /// File stem used for datasets and artifacts.
    pub fn slug(self) -> &'static str {
        match self {
            DiseaseDomain::Diabetes => "diabetes",
            DiseaseDomain::Heart => "heart",
            DiseaseDomain::Parkinsons => "parkinsons",
        }
    }

    /// Human-readable name shown on the domain card.
    pub fn display_name(self) -> &'static str {
        match self {
            DiseaseDomain::Diabetes => "Diabetes",
            DiseaseDomain::Heart => "Heart Disease",
            DiseaseDomain::Parkinsons => "Parkinson's",
        }
    }

    pub fn label_column(self) -> &'static str {
        match self {
            DiseaseDomain::Diabetes => "Outcome",
            DiseaseDomain::Heart => "target",
            DiseaseDomain::Parkinsons => "status",
        }
    }

    /// Identifier column dropped from the features, if the dataset has one.
    pub fn id_column(self) -> Option<&'static str> {
        match self {
            DiseaseDomain::Parkinsons => Some("name"),
            _ => None,
        }
    }

    /// Conventional paths and columns for this domain.
    pub fn default_spec(self) -> DomainSpec {
        let slug = self.slug();
        DomainSpec {
            domain: self,
            dataset: Path::new(DATASETS_DIR).join(format!("{slug}.csv")),
            model: Path::new(MODELS_DIR).join(format!("{slug}_model.json")),
            scaler: Path::new(MODELS_DIR).join(format!("{slug}_scaler.json")),
            label_column: self.label_column().to_string(),
            id_column: self.id_column().map(str::to_string),
        }
    }
}

impl fmt::Display for DiseaseDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Where a domain's dataset and artifacts live and which columns are not features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainSpec {
    pub domain: DiseaseDomain,
    pub dataset: PathBuf,
    pub model: PathBuf,
    pub scaler: PathBuf,
    pub label_column: String,
    #[serde(default)]
    pub id_column: Option<String>,
}

impl DomainSpec {
    /// Resolve relative paths against `root`. Absolute paths are kept as-is.
    pub fn resolved(&self, root: &Path) -> DomainSpec {
        DomainSpec {
            dataset: root.join(&self.dataset),
            model: root.join(&self.model),
            scaler: root.join(&self.scaler),
            ..self.clone()
        }
    }
}

/// Default specs for every domain, in training order.
pub fn default_specs() -> Vec<DomainSpec> {
    DiseaseDomain::ALL
        .iter()
        .map(|domain| domain.default_spec())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parkinsons_is_the_only_domain_with_an_id_column() {
        let with_id: Vec<_> = DiseaseDomain::ALL
            .iter()
            .filter(|domain| domain.id_column().is_some())
            .collect();
        assert_eq!(with_id, vec![&DiseaseDomain::Parkinsons]);
    }

    #[test]
    fn default_spec_uses_conventional_layout() {
        let spec = DiseaseDomain::Heart.default_spec();
        assert_eq!(spec.dataset, PathBuf::from("datasets/heart.csv"));
        assert_eq!(spec.model, PathBuf::from("models/heart_model.json"));
        assert_eq!(spec.scaler, PathBuf::from("models/heart_scaler.json"));
        assert_eq!(spec.label_column, "target");
    }

    #[test]
    fn resolved_keeps_absolute_paths() {
        let mut spec = DiseaseDomain::Diabetes.default_spec();
        let absolute = std::env::temp_dir().join("elsewhere.csv");
        spec.dataset = absolute.clone();
        let resolved = spec.resolved(Path::new("project"));
        assert_eq!(resolved.dataset, absolute);
        assert_eq!(resolved.model, Path::new("project").join("models/diabetes_model.json"));
    }
}
