//! Tests for formatter options

use reltrace::{ErrorKind, FormatOptions, RECURSIVE_CUTOFF};

#[test]
fn test_defaults_follow_the_conventional_format() {
    let options = FormatOptions::default();

    assert_eq!(options.limit, None);
    assert!(options.lookup_lines);
    assert!(!options.capture_locals);
    assert!(options.chain);
    assert_eq!(options.recursive_cutoff, RECURSIVE_CUTOFF);
}

#[test]
fn test_json_fills_missing_fields_with_defaults() {
    let options = FormatOptions::from_json(r#"{ "limit": -5, "capture_locals": true }"#)
        .expect("valid options");

    assert_eq!(
        options,
        FormatOptions::default().limit(Some(-5)).capture_locals(true)
    );
}

#[test]
fn test_zero_cutoff_is_rejected() {
    let error = FormatOptions::from_json(r#"{ "recursive_cutoff": 0 }"#)
        .expect_err("cutoff of zero is invalid");

    assert!(matches!(error.kind(), ErrorKind::Configuration));
    assert!(error.to_string().contains("recursive_cutoff must be at least 1, got 0"));
}

#[test]
fn test_malformed_json_is_a_configuration_error() {
    let error = FormatOptions::from_json("{ limit: ").expect_err("not json");

    assert!(matches!(error.kind(), ErrorKind::Configuration));
}

#[test]
fn test_options_serialize_back_to_json() {
    let options = FormatOptions::default().chain(false);

    let json = serde_json::to_string(&options).expect("serializable");

    assert_eq!(FormatOptions::from_json(&json).expect("round trip"), options);
}
