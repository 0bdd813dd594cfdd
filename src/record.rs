//! Shared state behind every [`TypedError`](crate::TypedError).
//!
//! A record is built once by [`ErrorBuilder`](crate::ErrorBuilder) and then
//! shared, through an `Arc`, by every clone of the error it backs. Only the
//! trace history and the stack message change after construction; both sit
//! behind one lock so appends from many threads are never lost and readers
//! always see a whole snapshot.

use std::borrow::Cow;
use std::error::Error;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::location::TraceEntry;
use crate::report::ErrorReport;

/// Longest cause shown by `Display` before it is cut off with `...`.
///
/// Only the rendering is shortened; the stored cause is kept in full.
pub const MAX_CAUSE_DISPLAY_LEN: usize = 200;

// ============================================================================
// HistoryVec - configurable storage for trace history
// ============================================================================
//
// Traces are short (a handful of frames), so the smallvec features keep them
// inline in the record. The default is a plain Vec.

/// Inline history storage with 8 slots.
#[cfg(feature = "smallvec-8")]
type HistoryVec = smallvec::SmallVec<[TraceEntry; 8]>;

/// Inline history storage with 4 slots.
#[cfg(all(feature = "smallvec-4", not(feature = "smallvec-8")))]
type HistoryVec = smallvec::SmallVec<[TraceEntry; 4]>;

/// Heap history storage (default).
#[cfg(not(any(feature = "smallvec-4", feature = "smallvec-8")))]
type HistoryVec = Vec<TraceEntry>;

/// The part of a record that changes after construction.
struct StackState {
    stack_message: Option<String>,
    history: HistoryVec,
}

pub(crate) struct ErrorRecord {
    /// Rendered text of `wrapped` (never truncated here).
    pub(crate) cause: Option<String>,
    pub(crate) wrapped: Option<Arc<dyn Error + Send + Sync + 'static>>,
    pub(crate) message: Option<String>,
    /// First trace entry given at construction.
    pub(crate) trace: Option<TraceEntry>,
    /// Resolved status code; never 0.
    pub(crate) code: u16,
    state: RwLock<StackState>,
}

impl ErrorRecord {
    pub(crate) fn new(
        wrapped: Option<Arc<dyn Error + Send + Sync + 'static>>,
        message: Option<String>,
        history: Vec<TraceEntry>,
        code: u16,
    ) -> Self {
        let cause = wrapped
            .as_ref()
            .map(|err| err.to_string())
            .filter(|text| !text.is_empty());
        let trace = history.first().cloned();
        Self {
            cause,
            wrapped,
            message: message.filter(|text| !text.is_empty()),
            trace,
            code,
            state: RwLock::new(StackState {
                stack_message: None,
                history: history.into_iter().collect(),
            }),
        }
    }

    /// Append one entry, optionally replacing the stack message.
    pub(crate) fn push(&self, entry: TraceEntry, stack_message: Option<String>) {
        let mut state = self.state.write();
        state.history.push(entry);
        if let Some(msg) = stack_message {
            state.stack_message = Some(msg);
        }
    }

    pub(crate) fn history(&self) -> Vec<TraceEntry> {
        self.state.read().history.to_vec()
    }

    pub(crate) fn history_len(&self) -> usize {
        self.state.read().history.len()
    }

    pub(crate) fn stack_message(&self) -> Option<String> {
        self.state.read().stack_message.clone()
    }

    /// Run `f` against the stack message and history under one read lock.
    pub(crate) fn read<R>(&self, f: impl FnOnce(Option<&str>, &[TraceEntry]) -> R) -> R {
        let state = self.state.read();
        f(state.stack_message.as_deref(), &state.history)
    }

    pub(crate) fn report(&self) -> ErrorReport {
        self.read(|stack_message, history| ErrorReport {
            cause: self.cause.clone().unwrap_or_default(),
            message: self.message.clone().unwrap_or_default(),
            stack_message: stack_message.map(str::to_owned).unwrap_or_default(),
            code: self.code,
            trace: self.trace.clone().unwrap_or_default(),
            stack: history.to_vec(),
        })
    }
}

/// Shorten `cause` to [`MAX_CAUSE_DISPLAY_LEN`] characters plus `...`.
pub(crate) fn truncate_cause(cause: &str) -> Cow<'_, str> {
    match cause.char_indices().nth(MAX_CAUSE_DISPLAY_LEN) {
        Some((cut, _)) => Cow::Owned(format!("{}...", &cause[..cut])),
        None => Cow::Borrowed(cause),
    }
}
