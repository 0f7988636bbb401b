//! HIPAA 5010 compliance scenarios against the 837P fixture.

mod common;

use common::claim_837;
use x12::{Engine, Error, Severity, StrictnessLevel, ValidationProfile};

#[test]
fn test_valid_claim_is_clean() {
    let engine = Engine::new();
    let parsed = engine.parse(claim_837("1234567893").as_bytes()).unwrap();
    let report = engine.validate(&parsed, &ValidationProfile::hipaa_5010());
    assert!(report.is_valid(), "{:?}", report.findings);
    assert_eq!(report.warning_count(), 0, "{:?}", report.findings);
}

#[test]
fn test_invalid_tax_id_reported() {
    let engine = Engine::new();
    let input = claim_837("1234567893").replace("REF*EI*123456789~", "REF*EI*12345~");
    let parsed = engine.parse(input.as_bytes()).unwrap();
    let report = engine.validate(&parsed, &ValidationProfile::hipaa_5010());

    let finding = report.errors().find(|f| f.code == "INVALID_TAX_ID").unwrap();
    assert_eq!(finding.location.segment_id.as_deref(), Some("REF"));
    assert_eq!(finding.location.element, Some(2));
}

#[test]
fn test_invalid_diagnosis_code_reported() {
    let engine = Engine::new();
    let input = claim_837("1234567893").replace("HI*ABK:J45.909~", "HI*ABK:45J~");
    let parsed = engine.parse(input.as_bytes()).unwrap();
    let report = engine.validate(&parsed, &ValidationProfile::hipaa_5010());

    assert!(report.errors().any(|f| f.code == "INVALID_DIAGNOSIS_CODE"));
}

#[test]
fn test_invalid_procedure_code_reported() {
    let engine = Engine::new();
    let input = claim_837("1234567893").replace("SV1*HC:99213*", "SV1*HC:9921X*");
    let parsed = engine.parse(input.as_bytes()).unwrap();
    let report = engine.validate(&parsed, &ValidationProfile::hipaa_5010());

    assert!(report.errors().any(|f| f.code == "INVALID_PROCEDURE_CODE"));
}

#[test]
fn test_claim_balance_mismatch_reported() {
    let engine = Engine::new();
    // Claim total 100, single service line 60.
    let input = claim_837("1234567893").replace("SV1*HC:99213*100*", "SV1*HC:99213*60*");
    let parsed = engine.parse(input.as_bytes()).unwrap();
    let report = engine.validate(&parsed, &ValidationProfile::hipaa_5010());

    let finding = report.errors().find(|f| f.code == "CLAIM_BALANCE").unwrap();
    assert_eq!(finding.location.segment_id.as_deref(), Some("CLM"));
}

#[test]
fn test_profile_off_skips_hipaa_rules() {
    let engine = Engine::new();
    let parsed = engine.parse(claim_837("1234567890").as_bytes()).unwrap();
    let report = engine.validate(&parsed, &ValidationProfile::default());
    assert!(
        !report.findings.iter().any(|f| f.code == "INVALID_NPI"),
        "NPI rule only runs under the HIPAA profile"
    );
}

#[test]
fn test_strict_mode_turns_errors_terminal() {
    let engine = Engine::new();
    let parsed = engine.parse(claim_837("1234567890").as_bytes()).unwrap();

    let err = engine
        .validate_strict(&parsed, &ValidationProfile::hipaa_5010())
        .unwrap_err();
    match err {
        Error::Validation(e) => assert!(e.to_string().contains("INVALID_NPI")),
        other => panic!("expected validation rejection, got {other}"),
    }

    // A clean document passes strict mode.
    let clean = engine.parse(claim_837("1234567893").as_bytes()).unwrap();
    assert!(engine
        .validate_strict(&clean, &ValidationProfile::hipaa_5010())
        .is_ok());
}

#[test]
fn test_permissive_strictness_demotes_errors() {
    let engine = Engine::new();
    let parsed = engine.parse(claim_837("1234567890").as_bytes()).unwrap();
    let profile = ValidationProfile::hipaa_5010().with_strictness(StrictnessLevel::Permissive);
    let report = engine.validate(&parsed, &profile);

    assert!(report.is_valid());
    assert!(report
        .warnings()
        .any(|f| f.code == "INVALID_NPI" && f.severity == Severity::Warning));
}

#[test]
fn test_missing_subscriber_name_rejected_by_schema() {
    let engine = Engine::new();
    let input = claim_837("1234567893").replace("NM1*IL*1*DOE*JANE~", "NM1*IL*1~");
    let parsed = engine.parse(input.as_bytes()).unwrap();
    let report = engine.validate(&parsed, &ValidationProfile::hipaa_5010());

    assert!(report.errors().any(|f| f.code == "NM1_NAME_REQUIRED"));
}
