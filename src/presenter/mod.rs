//! Presenter-side view of the trained artifacts.
//!
//! Loads each domain's scaler/classifier pair once at startup. A domain whose
//! pair is absent, unreadable or inconsistent is reported as unavailable and
//! its form submit only surfaces a notice.

mod form;

pub use form::{FieldKind, FormField, FormInput, FormInputError, form_fields};

use std::collections::BTreeMap;
use std::path::Path;

use crate::artifact;
use crate::domain::{DiseaseDomain, DomainSpec};
use crate::ml::scaler::StandardScaler;
use crate::ml::svm::LinearSvmModel;

/// Notice shown when a domain's artifacts could not be loaded.
pub const MODELS_UNAVAILABLE_NOTICE: &str = "Model not loaded. Please check your model files.";

/// A scaler and classifier that were loaded together.
#[derive(Debug, Clone)]
pub struct LoadedModels {
    pub scaler: StandardScaler,
    pub classifier: LinearSvmModel,
}

#[derive(Debug, Clone)]
pub enum ModelAvailability {
    Available(Box<LoadedModels>),
    Unavailable { reason: String },
}

impl ModelAvailability {
    pub fn is_available(&self) -> bool {
        matches!(self, ModelAvailability::Available(_))
    }
}

/// Load one domain's pair. Either half failing makes the whole pair unavailable.
pub fn load_models(spec: &DomainSpec, root: &Path) -> ModelAvailability {
    let spec = spec.resolved(root);
    let loaded = artifact::load::<LinearSvmModel>(&spec.model).and_then(|classifier| {
        artifact::load::<StandardScaler>(&spec.scaler).map(|scaler| LoadedModels { scaler, classifier })
    });
    match loaded {
        Ok(models) if models.scaler.n_features() != models.classifier.feature_len => {
            ModelAvailability::Unavailable {
                reason: format!(
                    "scaler expects {} features but classifier expects {}",
                    models.scaler.n_features(),
                    models.classifier.feature_len
                ),
            }
        }
        Ok(models) => ModelAvailability::Available(Box::new(models)),
        Err(err) => ModelAvailability::Unavailable {
            reason: err.to_string(),
        },
    }
}

/// Per-domain availability, loaded once per session.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    domains: BTreeMap<DiseaseDomain, ModelAvailability>,
}

impl ModelRegistry {
    pub fn load(specs: &[DomainSpec], root: &Path) -> Self {
        let mut domains = BTreeMap::new();
        for spec in specs {
            let availability = load_models(spec, root);
            match &availability {
                ModelAvailability::Available(_) => {
                    tracing::info!("{} models loaded", spec.domain)
                }
                ModelAvailability::Unavailable { reason } => {
                    tracing::warn!("{} models unavailable: {reason}", spec.domain)
                }
            }
            domains.insert(spec.domain, availability);
        }
        Self { domains }
    }

    /// `None` when the domain was not configured.
    pub fn availability(&self, domain: DiseaseDomain) -> Option<&ModelAvailability> {
        self.domains.get(&domain)
    }

    pub fn models(&self, domain: DiseaseDomain) -> Option<&LoadedModels> {
        match self.domains.get(&domain) {
            Some(ModelAvailability::Available(models)) => Some(models.as_ref()),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (DiseaseDomain, &ModelAvailability)> {
        self.domains.iter().map(|(domain, availability)| (*domain, availability))
    }
}

/// Which domain card was clicked last in this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveCard {
    #[default]
    None,
    Domain(DiseaseDomain),
}

impl ActiveCard {
    /// Clicking the open card closes it; clicking another card switches to it.
    pub fn click(&mut self, domain: DiseaseDomain) {
        *self = match *self {
            ActiveCard::Domain(current) if current == domain => ActiveCard::None,
            _ => ActiveCard::Domain(domain),
        };
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The pair is loaded; risk scoring is not part of this demo.
    ScoringNotImplemented,
    ModelsUnavailable,
}

impl SubmitOutcome {
    /// User-visible notice, if any.
    pub fn notice(self) -> Option<&'static str> {
        match self {
            SubmitOutcome::ScoringNotImplemented => None,
            SubmitOutcome::ModelsUnavailable => Some(MODELS_UNAVAILABLE_NOTICE),
        }
    }
}

/// Handle a form's predict button: only checks that the domain's pair is loaded.
pub fn submit(domain: DiseaseDomain, registry: &ModelRegistry) -> SubmitOutcome {
    if registry.models(domain).is_some() {
        SubmitOutcome::ScoringNotImplemented
    } else {
        SubmitOutcome::ModelsUnavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clicking_the_same_card_twice_closes_it() {
        let mut card = ActiveCard::default();
        card.click(DiseaseDomain::Heart);
        assert_eq!(card, ActiveCard::Domain(DiseaseDomain::Heart));
        card.click(DiseaseDomain::Diabetes);
        assert_eq!(card, ActiveCard::Domain(DiseaseDomain::Diabetes));
        card.click(DiseaseDomain::Diabetes);
        assert_eq!(card, ActiveCard::None);
    }

    #[test]
    fn empty_registry_reports_models_unavailable() {
        let registry = ModelRegistry::default();
        let outcome = submit(DiseaseDomain::Parkinsons, &registry);
        assert_eq!(outcome, SubmitOutcome::ModelsUnavailable);
        assert_eq!(outcome.notice(), Some(MODELS_UNAVAILABLE_NOTICE));
    }
}
