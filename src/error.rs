//! The [`TypedError`] handle type.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

use crate::category::Category;
use crate::location::TraceEntry;
use crate::options::{ErrOption, ErrorBuilder};
use crate::record::{ErrorRecord, truncate_cause};
use crate::report::ErrorReport;

// ============================================================================
// TypedError - category tag + shared record
// ============================================================================

/// A categorized error with a status code, message, optional cause and a
/// call-site trace.
///
/// ## Sharing
///
/// `TypedError` is a handle. Cloning it is cheap and produces an alias of
/// the *same* error: a trace entry pushed through one clone is visible
/// through all of them. That is what lets an error fanned out to several
/// worker threads collect every worker's call site.
///
/// ```rust
/// use typed_errors::{here, TypedError};
///
/// let err = TypedError::internal(["cache miss storm".into()]);
/// let alias = err.clone();
/// alias.push_trace(here!());
/// assert_eq!(err.stack().len(), 1);
/// assert!(err.ptr_eq(&alias));
/// ```
///
/// ## Re-wrapping
///
/// Propagate by appending to the same error ([`at`](Self::at),
/// [`crate::stack`]), not by passing it as the cause of a new one. A typed
/// error used as the cause of a different category is accepted, but
/// [`code`](Self::code) and [`category`](Self::category) then report the
/// new category.
#[derive(Clone)]
pub struct TypedError {
    category: Category,
    record: Arc<ErrorRecord>,
}

impl TypedError {
    pub(crate) fn from_record(category: Category, record: ErrorRecord) -> Self {
        Self {
            category,
            record: Arc::new(record),
        }
    }

    /// Build an error of `category` from any options, in any order.
    pub fn new(category: Category, options: impl IntoIterator<Item = ErrOption>) -> Self {
        ErrorBuilder::new(category).options(options).build()
    }

    /// Start a builder for `category`.
    pub fn builder(category: Category) -> ErrorBuilder {
        ErrorBuilder::new(category)
    }

    /// A [`Category::BadRequest`] error (default code 400).
    ///
    /// ## Example
    ///
    /// ```rust
    /// use typed_errors::{here, opt, TypedError};
    ///
    /// let err = TypedError::bad_request([
    ///     opt::message("email is required"),
    ///     opt::code(422),
    ///     opt::trace(here!()),
    /// ]);
    /// assert_eq!(err.code(), 422);
    /// assert_eq!(err.message(), "email is required");
    /// ```
    pub fn bad_request(options: impl IntoIterator<Item = ErrOption>) -> Self {
        Self::new(Category::BadRequest, options)
    }

    /// An [`Category::Unauthorized`] error (default code 403).
    pub fn unauthorized(options: impl IntoIterator<Item = ErrOption>) -> Self {
        Self::new(Category::Unauthorized, options)
    }

    /// A [`Category::NotFound`] error (default code 404).
    pub fn not_found(options: impl IntoIterator<Item = ErrOption>) -> Self {
        Self::new(Category::NotFound, options)
    }

    /// A [`Category::Conflict`] error (default code 409).
    pub fn conflict(options: impl IntoIterator<Item = ErrOption>) -> Self {
        Self::new(Category::Conflict, options)
    }

    /// An [`Category::Internal`] error (default code 500).
    pub fn internal(options: impl IntoIterator<Item = ErrOption>) -> Self {
        Self::new(Category::Internal, options)
    }

    /// A [`Category::Fatal`] error (default code 500).
    pub fn fatal(options: impl IntoIterator<Item = ErrOption>) -> Self {
        Self::new(Category::Fatal, options)
    }

    /// A [`Category::NoContent`] error (default code 204).
    pub fn no_content(options: impl IntoIterator<Item = ErrOption>) -> Self {
        Self::new(Category::NoContent, options)
    }

    // ========================================================================
    // Getters
    // ========================================================================

    /// The category this error was built with.
    #[inline]
    pub fn category(&self) -> Category {
        self.category
    }

    /// True if this error (not its causes) has `category`.
    #[inline]
    pub fn is(&self, category: Category) -> bool {
        self.category == category
    }

    /// The status code: the explicit override, else the category default.
    #[inline]
    pub fn code(&self) -> u16 {
        self.record.code
    }

    /// The cause text, falling back to the message, then to `Display`.
    ///
    /// Never truncated.
    pub fn cause(&self) -> Cow<'_, str> {
        match (&self.record.cause, &self.record.message) {
            (Some(cause), _) => Cow::Borrowed(cause),
            (None, Some(message)) => Cow::Borrowed(message),
            (None, None) => Cow::Owned(self.to_string()),
        }
    }

    /// The message, falling back to `Display`.
    pub fn message(&self) -> Cow<'_, str> {
        match &self.record.message {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(self.to_string()),
        }
    }

    /// The stored cause text, if any.
    #[inline]
    pub fn cause_text(&self) -> Option<&str> {
        self.record.cause.as_deref()
    }

    /// The stored message, if any.
    #[inline]
    pub fn message_text(&self) -> Option<&str> {
        self.record.message.as_deref()
    }

    /// The context message from the latest [`at_with_message`](Self::at_with_message).
    pub fn stack_message(&self) -> Option<String> {
        self.record.stack_message()
    }

    /// The initial trace entry, or the zero value when built without one.
    pub fn trace(&self) -> TraceEntry {
        self.record.trace.clone().unwrap_or_default()
    }

    /// A copy of the trace history, oldest first.
    ///
    /// Changing the returned `Vec` does not affect the error.
    pub fn stack(&self) -> Vec<TraceEntry> {
        self.record.history()
    }

    /// Number of entries in the trace history.
    pub fn stack_len(&self) -> usize {
        self.record.history_len()
    }

    /// The wrapped error value, if one was given.
    pub fn wrapped_cause(&self) -> Option<Arc<dyn Error + Send + Sync + 'static>> {
        self.record.wrapped.clone()
    }

    /// Borrow the wrapped error value, if one was given.
    pub fn wrapped_cause_ref(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.record.wrapped.as_deref()
    }

    /// True if both handles point at the same error.
    #[inline]
    pub fn ptr_eq(&self, other: &TypedError) -> bool {
        Arc::ptr_eq(&self.record, &other.record)
    }

    // ========================================================================
    // Trace appends
    // ========================================================================

    /// Append `entry` to the shared trace history.
    ///
    /// Safe to call from many threads on clones of the same error.
    pub fn push_trace(&self, entry: TraceEntry) {
        self.record.push(entry, None);
    }

    /// Append `entry` and replace the stack message.
    pub fn push_trace_with_message(&self, message: impl Into<String>, entry: TraceEntry) {
        self.record.push(entry, Some(message.into()));
    }

    /// Append `entry` and return the same error, for chaining.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use typed_errors::{here, TypedError};
    ///
    /// fn load() -> Result<(), TypedError> {
    ///     Err(TypedError::not_found([]))
    /// }
    ///
    /// fn handler() -> Result<(), TypedError> {
    ///     load().map_err(|e| e.at(here!()))
    /// }
    ///
    /// assert_eq!(handler().unwrap_err().stack().len(), 1);
    /// ```
    #[must_use]
    pub fn at(self, entry: TraceEntry) -> Self {
        self.push_trace(entry);
        self
    }

    /// Append `entry`, replace the stack message and return the same error.
    #[must_use]
    pub fn at_with_message(self, message: impl Into<String>, entry: TraceEntry) -> Self {
        self.push_trace_with_message(message, entry);
        self
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Snapshot of everything but the wrapped error, taken under one lock.
    pub fn report(&self) -> ErrorReport {
        self.record.report()
    }

    /// Format with code, cause, message, stack message and every trace entry.
    ///
    /// ```text
    /// Error [Code: 500]
    ///   Cause:   db down
    ///   Message: query failed
    ///   Stack:   while loading profile
    ///
    /// Stack Trace:
    ///   1. src/db.rs:12 in app::db::query
    ///   2. src/api.rs:40 in app::api::profile
    /// ```
    pub fn full_trace(&self) -> impl fmt::Display + '_ {
        FullTraceDisplay { err: self }
    }

    /// [`full_trace`](Self::full_trace) rendered to a `String`.
    pub fn render_full(&self) -> String {
        self.full_trace().to_string()
    }

    /// The trace history as a JSON array, or `"{}"` when it is empty.
    #[cfg(feature = "serde")]
    pub fn stack_json(&self) -> String {
        self.record
            .read(|_, history| crate::report::history_json(history))
    }

    /// Emit one `tracing` event for this error at [`Category::level`].
    ///
    /// The event carries `category`, `code`, `message`, `cause`,
    /// `stack_message`, `trace` and `stack` as fields, plus `error` with
    /// the `Display` form. `message` doubles as the event message.
    #[cfg(feature = "tracing")]
    pub fn log(&self) {
        use tracing::Level;

        let err = self;
        let category = self.category;
        let report = self.report();
        let stack: Vec<String> = report.stack.iter().map(ToString::to_string).collect();

        macro_rules! emit {
            ($level:ident) => {
                tracing::$level!(
                    category = %category,
                    code = report.code,
                    message = %report.message,
                    cause = %report.cause,
                    stack_message = %report.stack_message,
                    trace = %report.trace,
                    stack = ?stack,
                    error = %err
                )
            };
        }

        let level = self.category.level();
        if level == Level::ERROR {
            emit!(error);
        } else if level == Level::WARN {
            emit!(warn);
        } else if level == Level::INFO {
            emit!(info);
        } else {
            emit!(debug);
        }
    }
}

// ============================================================================
// Formatting
// ============================================================================

impl fmt::Display for TypedError {
    /// `message`, or `cause: message (at function:line)` once a trace is set.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.record.message.as_deref().unwrap_or("");
        let Some(trace) = self.record.trace.as_ref().filter(|t| t.line != 0) else {
            return f.write_str(message);
        };
        match self.record.cause.as_deref() {
            Some(cause) => write!(
                f,
                "{}: {} (at {}:{})",
                truncate_cause(cause),
                message,
                trace.function,
                trace.line
            ),
            None => write!(f, "{} (at {}:{})", message, trace.function, trace.line),
        }
    }
}

impl fmt::Debug for TypedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.record.read(|stack_message, history| {
            f.debug_struct("TypedError")
                .field("category", &self.category)
                .field("code", &self.record.code)
                .field("message", &self.record.message)
                .field("cause", &self.record.cause)
                .field("stack_message", &stack_message)
                .field("stack", &history)
                .finish()
        })
    }
}

struct FullTraceDisplay<'a> {
    err: &'a TypedError,
}

impl fmt::Display for FullTraceDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = &self.err.record;
        write!(f, "Error [Code: {}]", record.code)?;
        if let Some(cause) = &record.cause {
            write!(f, "\n  Cause:   {}", cause)?;
        }
        if let Some(message) = &record.message {
            write!(f, "\n  Message: {}", message)?;
        }
        record.read(|stack_message, history| {
            if let Some(stack_message) = stack_message {
                write!(f, "\n  Stack:   {}", stack_message)?;
            }
            if !history.is_empty() {
                write!(f, "\n\nStack Trace:")?;
                for (i, entry) in history.iter().enumerate() {
                    write!(f, "\n  {}. {}", i + 1, entry)?;
                }
            }
            Ok(())
        })
    }
}

// ============================================================================
// Error impl
// ============================================================================

impl Error for TypedError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.record
            .wrapped
            .as_deref()
            .map(|err| err as &(dyn Error + 'static))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for TypedError {
    /// Serializes as the error's [`ErrorReport`].
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serde::Serialize::serialize(&self.report(), serializer)
    }
}
