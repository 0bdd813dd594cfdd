//! Integration tests for the serialized forms of errors and traces.

#![cfg(feature = "serde")]

use serde_json::{Value, json};
use typed_errors::{ErrorReport, TraceEntry, TypedError, opt, stack_json};

fn sample() -> TypedError {
    let err = TypedError::not_found([
        opt::cause(std::io::Error::other("no rows")),
        opt::message("user 9 not found"),
        opt::trace(TraceEntry::new("src/db.rs", "app::db::find_user", 10)),
    ]);
    let api = TraceEntry::new("src/api.rs", "app::api::profile", 20);
    err.push_trace_with_message("loading profile", api);
    err
}

// ============================================================================
// stack_json
// ============================================================================

#[test]
fn stack_json_of_none_is_empty_string() {
    assert_eq!(stack_json(None::<&TypedError>), "");
}

#[test]
fn stack_json_of_untyped_is_empty_object() {
    let err = std::io::Error::other("plain");
    assert_eq!(stack_json(Some(&err)), "{}");
}

#[test]
fn stack_json_of_empty_history_is_empty_object() {
    let err = TypedError::conflict([opt::message("no trace")]);
    assert_eq!(stack_json(Some(&err)), "{}");
    assert_eq!(err.stack_json(), "{}");
}

#[test]
fn stack_json_lists_history() {
    let value: Value = serde_json::from_str(&stack_json(Some(&sample()))).unwrap();
    let expected = json!([
        {"file": "src/db.rs", "function": "app::db::find_user", "line": 10},
        {"file": "src/api.rs", "function": "app::api::profile", "line": 20},
    ]);
    assert_eq!(value, expected);
}

// ============================================================================
// Reports
// ============================================================================

#[test]
fn error_serializes_as_report() {
    let value = serde_json::to_value(sample()).unwrap();
    let expected = json!({
        "cause": "no rows",
        "message": "user 9 not found",
        "stack_message": "loading profile",
        "code": 404,
        "trace": {"file": "src/db.rs", "function": "app::db::find_user", "line": 10},
        "stack": [
            {"file": "src/db.rs", "function": "app::db::find_user", "line": 10},
            {"file": "src/api.rs", "function": "app::api::profile", "line": 20},
        ],
    });
    assert_eq!(value, expected);
}

#[test]
fn bare_error_serializes_empty_fields() {
    let value = serde_json::to_value(TypedError::no_content([])).unwrap();
    assert_eq!(value["cause"], "");
    assert_eq!(value["message"], "");
    assert_eq!(value["code"], 204);
    let empty_trace = json!({"file": "", "function": "", "line": 0});
    assert_eq!(value["trace"], empty_trace);
    assert_eq!(value["stack"], json!([]));
}

#[test]
fn report_deserializes() {
    let json = serde_json::to_string(&sample()).unwrap();
    let report: ErrorReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report, sample().report());
    assert_eq!(report.stack.len(), 2);
}
