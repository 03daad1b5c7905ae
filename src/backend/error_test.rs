//! Tests for backend error types.

use crate::backend::{BackendError, ROW_NOT_FOUND_CODE};

#[test]
fn not_found_error_displays_correctly() {
    let err = BackendError::not_found("course", "c-1");
    assert_eq!(err.to_string(), "Entity not found: course with id 'c-1'");
    assert!(err.is_not_found());
}

#[test]
fn api_error_with_row_not_found_code_counts_as_not_found() {
    let err = BackendError::Api {
        status: 406,
        code: Some(ROW_NOT_FOUND_CODE.to_string()),
        message: "JSON object requested, multiple (or no) rows returned".to_string(),
    };
    assert!(err.is_not_found());
}

#[test]
fn other_api_errors_are_not_not_found() {
    let err = BackendError::Api {
        status: 409,
        code: Some("23505".to_string()),
        message: "duplicate key value violates unique constraint".to_string(),
    };
    assert!(!err.is_not_found());
    assert_eq!(
        err.to_string(),
        "Backend error (409): duplicate key value violates unique constraint"
    );
}

#[test]
fn validation_error_displays_correctly() {
    let err = BackendError::validation("amount must be positive");
    assert_eq!(err.to_string(), "Validation error: amount must be positive");
}

#[test]
fn json_errors_become_decode_errors() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: BackendError = json_err.into();
    assert!(matches!(err, BackendError::Decode { .. }));
}
