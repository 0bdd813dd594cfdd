//! Plain-data snapshots of typed errors, for logging pipelines.

use crate::location::TraceEntry;

/// Point-in-time copy of everything a [`TypedError`](crate::TypedError)
/// carries except the wrapped error value.
///
/// Taken under a single lock acquisition, so `stack_message` and `stack`
/// always belong together. Absent strings are empty; an absent trace is
/// [`TraceEntry::default()`].
///
/// With the `serde` feature this serializes as:
///
/// ```text
/// {"cause":"...","message":"...","stack_message":"...","code":404,
///  "trace":{"file":"...","function":"...","line":1},"stack":[...]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorReport {
    /// Rendered text of the wrapped error, untruncated.
    pub cause: String,
    /// User-facing message.
    pub message: String,
    /// Context from the latest `stack_with_message`.
    pub stack_message: String,
    /// Resolved status code.
    pub code: u16,
    /// Initial trace entry.
    pub trace: TraceEntry,
    /// Full trace history, oldest first.
    pub stack: Vec<TraceEntry>,
}

/// Render a trace history as a JSON array, `"{}"` when empty.
#[cfg(feature = "serde")]
pub(crate) fn history_json(history: &[TraceEntry]) -> String {
    if history.is_empty() {
        return "{}".into();
    }
    serde_json::to_string(history).unwrap_or_else(|_| "{}".into())
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn empty_history_is_empty_object() {
        assert_eq!(history_json(&[]), "{}");
    }

    #[test]
    fn history_uses_wire_field_names() {
        let json = history_json(&[TraceEntry::new("src/a.rs", "app::a", 3)]);
        let expected = r#"[{"file":"src/a.rs","function":"app::a","line":3}]"#;
        assert_eq!(json, expected);
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = ErrorReport {
            cause: "db down".into(),
            message: "query failed".into(),
            stack_message: String::new(),
            code: 500,
            trace: TraceEntry::new("src/db.rs", "app::db::query", 10),
            stack: vec![TraceEntry::new("src/db.rs", "app::db::query", 10)],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""stack_message":"""#));
        let back: ErrorReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }
}
