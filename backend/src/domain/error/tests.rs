//! Regression coverage for this module.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn email_conflict() -> Error {
    Error::conflict("email already in use")
        .with_details(json!({ "field": "email", "code": "email_in_use" }))
}

#[rstest]
#[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::not_found(Error::not_found("missing"), ErrorCode::NotFound)]
#[case::conflict(Error::conflict("taken"), ErrorCode::Conflict)]
#[case::unavailable(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_expected_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn try_new_rejects_blank_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert_eq!(result, Err(ErrorValidationError::EmptyMessage));
}

#[rstest]
#[should_panic(expected = "error messages must satisfy validation")]
fn new_panics_on_blank_messages() {
    let _ = Error::new(ErrorCode::InternalError, "");
}

#[rstest]
fn trace_id_is_absent_outside_a_request() {
    assert!(Error::internal("boom").trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn trace_id_is_captured_inside_a_request() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid UUID");
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let value = serde_json::to_value(Error::not_found("user not found")).expect("serialise");
    assert_eq!(value, json!({ "code": "not_found", "message": "user not found" }));
}

#[rstest]
fn serialises_details_and_trace_id(email_conflict: Error) {
    let value = serde_json::to_value(email_conflict.with_trace_id(TRACE_ID)).expect("serialise");
    assert_eq!(
        value,
        json!({
            "code": "conflict",
            "message": "email already in use",
            "traceId": TRACE_ID,
            "details": { "field": "email", "code": "email_in_use" }
        })
    );
}

#[rstest]
fn deserialising_rejects_blank_messages() {
    let result = serde_json::from_value::<Error>(json!({ "code": "conflict", "message": " " }));
    assert!(result.is_err());
}

#[rstest]
fn without_details_keeps_the_rest(email_conflict: Error) {
    let stripped = email_conflict.without_details();
    assert!(stripped.details().is_none());
    assert_eq!(stripped.code(), ErrorCode::Conflict);
    assert_eq!(stripped.message(), "email already in use");
}
