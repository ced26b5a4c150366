mod support;

use std::path::Path;

use healthpredict::domain::{DiseaseDomain, DomainSpec, default_specs};
use healthpredict::presenter::{
    FormInput, MODELS_UNAVAILABLE_NOTICE, ModelRegistry, SubmitOutcome, form_fields,
    submit,
};
use healthpredict::trainer::{TrainJob, TrainOptions, train_and_persist};
use support::datasets::domain_dataset;
use tempfile::tempdir;

fn train(spec: &DomainSpec, root: &Path, rows: usize) {
    domain_dataset(spec.domain, rows).write(&spec.resolved(root).dataset);
    let outcome = train_and_persist(&TrainJob::from_spec(spec, root), &TrainOptions::default());
    assert!(outcome.is_trained(), "{outcome:?}");
}

#[test]
fn trained_domain_is_available_and_submit_reports_scoring_gap() {
    let dir = tempdir().unwrap();
    let specs = default_specs();
    train(&specs[0], dir.path(), 60);

    let registry = ModelRegistry::load(&specs, dir.path());
    assert!(registry.models(DiseaseDomain::Diabetes).is_some());
    assert!(registry.models(DiseaseDomain::Heart).is_none());

    let outcome = submit(DiseaseDomain::Diabetes, &registry);
    assert_eq!(outcome, SubmitOutcome::ScoringNotImplemented);
    assert!(outcome.notice().is_none());

    let outcome = submit(DiseaseDomain::Heart, &registry);
    assert_eq!(outcome, SubmitOutcome::ModelsUnavailable);
    assert_eq!(outcome.notice(), Some(MODELS_UNAVAILABLE_NOTICE));
}

#[test]
fn missing_scaler_makes_the_pair_unavailable() {
    let dir = tempdir().unwrap();
    let specs = default_specs();
    train(&specs[1], dir.path(), 60);
    std::fs::remove_file(specs[1].resolved(dir.path()).scaler).unwrap();

    let registry = ModelRegistry::load(&specs, dir.path());
    assert!(
        !registry
            .availability(DiseaseDomain::Heart)
            .unwrap()
            .is_available()
    );
    assert_eq!(
        submit(DiseaseDomain::Heart, &registry),
        SubmitOutcome::ModelsUnavailable
    );
}

#[test]
fn pair_from_different_domains_is_rejected() {
    let dir = tempdir().unwrap();
    let specs = default_specs();
    train(&specs[0], dir.path(), 60);
    train(&specs[2], dir.path(), 60);

    // Point the Parkinson's pair at the diabetes scaler: 22 vs 8 features.
    let mut mixed = specs.clone();
    mixed[2].scaler = specs[0].scaler.clone();
    let registry = ModelRegistry::load(&mixed, dir.path());
    assert!(registry.models(DiseaseDomain::Diabetes).is_some());
    assert!(registry.models(DiseaseDomain::Parkinsons).is_none());
}

#[test]
fn coerced_form_values_feed_the_loaded_scaler() {
    let dir = tempdir().unwrap();
    let specs = default_specs();
    train(&specs[0], dir.path(), 60);
    let registry = ModelRegistry::load(&specs, dir.path());
    let models = registry.models(DiseaseDomain::Diabetes).unwrap();

    let mut input = FormInput::new(DiseaseDomain::Diabetes);
    let values = ["2", "120", "70", "20", "80", "25.5", "0.47", "33"];
    for (field, value) in form_fields(DiseaseDomain::Diabetes).iter().zip(values) {
        input.set(field.key, value).unwrap();
    }
    let coerced = input.coerce().unwrap();
    let keys: Vec<&str> = coerced.iter().map(|(key, _)| *key).collect();
    assert_eq!(keys, models.scaler.feature_names);

    let row: Vec<f64> = coerced.iter().map(|(_, value)| *value).collect();
    let scaled = models.scaler.transform_row(&row).unwrap();
    let [p0, p1] = models.classifier.predict_proba(&scaled).unwrap();
    assert!((0.0..=1.0).contains(&p1));
    assert!((p0 + p1 - 1.0).abs() < 1e-12);
}

