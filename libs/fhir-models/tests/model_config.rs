//! `ModelConfig` is process-wide, so everything that changes it lives in this one test binary
//! and in a single test.

use ferrum_r5::r5::{Reference, Resource, Specimen, SpecimenStatus};
use ferrum_r5::ModelConfig;

fn specimen_with_subject(subject: &str) -> ferrum_r5::Result<Specimen> {
    Specimen::builder()
        .status(SpecimenStatus::Available)
        .subject(Reference::builder().reference(subject).build()?)
        .build()
}

#[test]
fn configuration_changes_apply_to_later_builds() {
    assert_eq!(ModelConfig::current(), ModelConfig::default());
    assert!(specimen_with_subject("Practitioner/1").is_err());

    let pretty: Resource = specimen_with_subject("Patient/1").unwrap().into();
    assert!(pretty.to_string().contains("\n  \"status\": \"available\""));

    ModelConfig::set(ModelConfig {
        check_reference_types: false,
        pretty_printing: false,
    });

    let specimen = specimen_with_subject("Practitioner/1").unwrap();
    let compact = Resource::from(specimen).to_string();
    assert_eq!(
        compact,
        r#"{"resourceType":"Specimen","status":"available","subject":{"reference":"Practitioner/1"}}"#
    );

    ModelConfig::set(ModelConfig::default());
    assert!(specimen_with_subject("Practitioner/1").is_err());
}
