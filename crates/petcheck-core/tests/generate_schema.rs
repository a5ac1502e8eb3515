//! Integration test that generates run-report.schema.json
//!
//! Run with: cargo test -p petcheck-core --test generate_schema

use petcheck_core::report::generate_schema;

#[test]
fn write_schema_file() {
    let schema = generate_schema();

    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("run-report.schema.json");

    std::fs::write(&schema_path, &schema).expect("failed to write schema file");

    // Verify the file is valid JSON
    let content = std::fs::read_to_string(&schema_path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(
        parsed.get("title").and_then(|v| v.as_str()),
        Some("RunReport")
    );
}

#[test]
fn sample_report_validates_against_schema() {
    let schema: serde_json::Value = serde_json::from_str(&generate_schema()).unwrap();
    let validator = jsonschema::validator_for(&schema).unwrap();

    let mut report = petcheck_core::RunReport::new("https://petstore.swagger.io/v2");
    report
        .outcomes
        .push(petcheck_core::ScenarioOutcome::passed("store::inventory", 0.2));
    let instance = serde_json::to_value(&report).unwrap();

    let errors: Vec<String> = validator
        .iter_errors(&instance)
        .map(|e| e.to_string())
        .collect();
    assert!(errors.is_empty(), "{errors:?}");
}
