use kapsel_context::TerminologyStore;
use kapsel_validator::{
    MessageFilter, ProfileValidator, ValidationError, ValidationMessage, ValidationPipeline,
    ValidatorKind, ValidatorMode, ValidatorPool,
};
use regex::Regex;
use std::fs;
use std::sync::Arc;

const TASK_SD_JSON: &str = r#"{
    "resourceType": "StructureDefinition",
    "url": "https://example.org/fhir/StructureDefinition/PrescriptionTask",
    "version": "1.2.0",
    "status": "active",
    "kind": "resource",
    "type": "Task",
    "derivation": "constraint"
}"#;

fn fixture_store() -> Arc<TerminologyStore> {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("profiles")).unwrap();
    fs::write(dir.path().join("profiles/task.json"), TASK_SD_JSON).unwrap();
    Arc::new(TerminologyStore::from_index_str(dir.path(), "profiles/task.json").unwrap())
}

/// Canned base validator, the way the mode behavior is pinned down without
/// real profile machinery.
struct CannedValidator(Vec<ValidationMessage>);

impl ProfileValidator for CannedValidator {
    fn validate(&self, _content: &str) -> Result<Vec<ValidationMessage>, ValidationError> {
        Ok(self.0.clone())
    }
}

fn canned(messages: Vec<ValidationMessage>, mode: ValidatorMode) -> ValidationPipeline {
    ValidationPipeline::new(Arc::new(CannedValidator(messages)), MessageFilter::built_in(), mode)
}

#[test]
fn strict_mode_flips_a_warned_document_to_invalid() {
    let messages = vec![ValidationMessage::warning("mustSupport element missing")];

    let normal = canned(messages.clone(), ValidatorMode::Normal)
        .validate("{\"resourceType\":\"Task\"}")
        .unwrap();
    assert!(normal.is_success());

    let strict = canned(messages, ValidatorMode::Strict)
        .validate("{\"resourceType\":\"Task\"}")
        .unwrap();
    assert!(!strict.is_success());
    assert_eq!(strict.error_count(), 1);
}

#[test]
fn error_counts_grow_with_mode_strictness() {
    let messages = vec![
        ValidationMessage::information("informational note"),
        ValidationMessage::warning("deprecated code"),
        ValidationMessage::error("cardinality violated"),
    ];
    let content = "{\"resourceType\":\"Task\"}";

    let errors_for = |mode| {
        canned(messages.clone(), mode)
            .validate(content)
            .unwrap()
            .error_count()
    };

    let normal = errors_for(ValidatorMode::Normal);
    let strict = errors_for(ValidatorMode::Strict);
    let pedantic = errors_for(ValidatorMode::Pedantic);
    assert!(normal <= strict && strict <= pedantic);
    assert_eq!(pedantic, 3);
}

#[test]
fn fhir_comments_noise_is_filtered_even_with_a_disjoint_custom_denylist() {
    let filter = MessageFilter::with_custom([Regex::new("completely unrelated").unwrap()]);
    let messages = vec![ValidationMessage::error(
        "Unrecognised property '@fhir_comments'",
    )];
    let pipeline = ValidationPipeline::new(
        Arc::new(CannedValidator(messages)),
        filter,
        ValidatorMode::Pedantic,
    );

    let outcome = pipeline.validate("{\"resourceType\":\"Task\"}").unwrap();
    assert!(outcome.is_success());
    assert!(outcome.messages().is_empty());
}

#[test]
fn unparseable_content_is_a_parse_error_not_an_outcome() {
    let store = fixture_store();
    let pool = ValidatorPool::new(store);
    let pipeline = ValidationPipeline::new(
        pool.validator_for(ValidatorKind::Profile),
        MessageFilter::built_in(),
        ValidatorMode::Normal,
    );

    let err = pipeline.validate("this is not a document").unwrap_err();
    assert!(matches!(err, ValidationError::Parse(_)));
    assert!(!pipeline.is_valid("this is not a document"));
}

#[test]
fn known_profile_claim_validates_cleanly() {
    let pool = ValidatorPool::new(fixture_store());
    let pipeline = ValidationPipeline::new(
        pool.validator_for(ValidatorKind::Profile),
        MessageFilter::built_in(),
        ValidatorMode::Normal,
    );

    let content = r#"{
        "resourceType": "Task",
        "meta": {"profile": ["https://example.org/fhir/StructureDefinition/PrescriptionTask|1.2.0"]},
        "status": "ready"
    }"#;

    let outcome = pipeline.validate(content).unwrap();
    assert!(outcome.is_success(), "unexpected findings: {:?}", outcome.messages());
}

#[test]
fn profile_for_a_different_resource_type_fails() {
    let pool = ValidatorPool::new(fixture_store());
    let pipeline = ValidationPipeline::new(
        pool.validator_for(ValidatorKind::Profile),
        MessageFilter::built_in(),
        ValidatorMode::Normal,
    );

    let content = r#"{
        "resourceType": "Patient",
        "meta": {"profile": ["https://example.org/fhir/StructureDefinition/PrescriptionTask"]}
    }"#;

    let outcome = pipeline.validate(content).unwrap();
    assert!(!outcome.is_success());
}

#[test]
fn unknown_profile_warns_normally_and_fails_under_the_reference_kind() {
    let pool = ValidatorPool::new(fixture_store());
    let content = r#"{
        "resourceType": "Task",
        "meta": {"profile": ["https://example.org/fhir/StructureDefinition/Retired"]}
    }"#;

    let lenient = ValidationPipeline::new(
        pool.validator_for(ValidatorKind::Profile),
        MessageFilter::built_in(),
        ValidatorMode::Normal,
    );
    let outcome = lenient.validate(content).unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.warning_count(), 1);

    let reference = ValidationPipeline::new(
        pool.validator_for(ValidatorKind::Reference),
        MessageFilter::built_in(),
        ValidatorMode::Normal,
    );
    assert!(!reference.validate(content).unwrap().is_success());
}

#[test]
fn version_mismatch_against_loaded_artifact_warns() {
    let pool = ValidatorPool::new(fixture_store());
    let pipeline = ValidationPipeline::new(
        pool.validator_for(ValidatorKind::Profile),
        MessageFilter::built_in(),
        ValidatorMode::Normal,
    );

    let content = r#"{
        "resourceType": "Task",
        "meta": {"profile": ["https://example.org/fhir/StructureDefinition/PrescriptionTask|1.3.0"]}
    }"#;

    let outcome = pipeline.validate(content).unwrap();
    assert!(outcome.is_success());
    assert_eq!(outcome.warning_count(), 1);
}

#[test]
fn null_validator_kind_only_checks_decodability() {
    let pool = ValidatorPool::new(fixture_store());
    let pipeline = ValidationPipeline::new(
        pool.validator_for(ValidatorKind::Null),
        MessageFilter::built_in(),
        ValidatorMode::Pedantic,
    );

    assert!(pipeline.is_valid(r#"{"resourceType":"Task","whatever":1}"#));
    assert!(!pipeline.is_valid("<Task><unclosed</Task>"));
}
