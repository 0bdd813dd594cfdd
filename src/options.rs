//! Construction options and the builder that folds them into a record.
//!
//! Every constructor takes any subset of options in any order:
//!
//! | Option | Sets | Repeats |
//! |--------|------|---------|
//! | [`cause`] / [`shared_cause`] | cause text + wrapped error | last wins |
//! | [`message`] | message | last wins |
//! | [`trace`] / [`with_trace`] | initial trace + history | first is the initial trace, all go to history |
//! | [`code`] | status code (0 = category default) | last wins |

use std::error::Error;
use std::sync::Arc;

use crate::category::Category;
use crate::error::TypedError;
use crate::location::TraceEntry;
use crate::record::ErrorRecord;

/// One optional constructor input.
#[derive(Debug, Clone)]
pub enum ErrOption {
    /// An underlying error to wrap.
    Cause(Arc<dyn Error + Send + Sync + 'static>),
    /// User-facing description.
    Message(String),
    /// A call site; the first one becomes the initial trace.
    Trace(TraceEntry),
    /// Status code override. 0 keeps the category default.
    Code(u16),
}

impl From<TraceEntry> for ErrOption {
    fn from(entry: TraceEntry) -> Self {
        ErrOption::Trace(entry)
    }
}

impl From<String> for ErrOption {
    fn from(text: String) -> Self {
        ErrOption::Message(text)
    }
}

impl From<&str> for ErrOption {
    fn from(text: &str) -> Self {
        ErrOption::Message(text.into())
    }
}

/// Wrap `err` as the cause.
pub fn cause<E: Error + Send + Sync + 'static>(err: E) -> ErrOption {
    ErrOption::Cause(Arc::new(err))
}

/// Wrap an already shared or boxed error as the cause, keeping its identity.
///
/// ## Example
///
/// ```rust
/// use std::error::Error;
/// use std::sync::Arc;
/// use typed_errors::{opt, TypedError};
///
/// let io: Arc<dyn Error + Send + Sync> = Arc::new(std::io::Error::other("disk gone"));
/// let err = TypedError::internal([opt::shared_cause(io.clone())]);
/// assert!(Arc::ptr_eq(&err.wrapped_cause().unwrap(), &io));
/// ```
pub fn shared_cause(err: impl Into<Arc<dyn Error + Send + Sync + 'static>>) -> ErrOption {
    ErrOption::Cause(err.into())
}

/// Set the message.
pub fn message(text: impl Into<String>) -> ErrOption {
    ErrOption::Message(text.into())
}

/// Add a trace entry, usually from [`here!()`](crate::here).
pub fn trace(entry: TraceEntry) -> ErrOption {
    ErrOption::Trace(entry)
}

/// Add a trace entry for the caller of `with_trace`.
///
/// See [`TraceEntry::caller()`] for how the function name is resolved.
#[track_caller]
pub fn with_trace() -> ErrOption {
    ErrOption::Trace(TraceEntry::caller())
}

/// Override the status code.
pub fn code(code: u16) -> ErrOption {
    ErrOption::Code(code)
}

// ============================================================================
// ErrorBuilder
// ============================================================================

/// Folds construction options into a fresh [`TypedError`].
///
/// The category constructors ([`TypedError::not_found`] and friends) are
/// thin wrappers around this. Use it directly when options are collected
/// conditionally.
///
/// ## Example
///
/// ```rust
/// use typed_errors::{here, Category, ErrorBuilder};
///
/// let retry_hint = true;
/// let mut builder = ErrorBuilder::new(Category::Conflict).message("version mismatch");
/// if retry_hint {
///     builder = builder.code(412);
/// }
/// let err = builder.trace(here!()).build();
/// assert_eq!(err.code(), 412);
/// assert_eq!(err.stack().len(), 1);
/// ```
#[derive(Debug)]
#[must_use = "call .build() to get the error"]
pub struct ErrorBuilder {
    category: Category,
    wrapped: Option<Arc<dyn Error + Send + Sync + 'static>>,
    message: Option<String>,
    history: Vec<TraceEntry>,
    code: u16,
}

impl ErrorBuilder {
    /// Start an error of `category` with nothing set.
    pub fn new(category: Category) -> Self {
        Self {
            category,
            wrapped: None,
            message: None,
            history: Vec::new(),
            code: 0,
        }
    }

    /// Apply one option.
    pub fn option(mut self, option: ErrOption) -> Self {
        self.apply(option);
        self
    }

    /// Apply options in order.
    pub fn options(mut self, options: impl IntoIterator<Item = ErrOption>) -> Self {
        for option in options {
            self.apply(option);
        }
        self
    }

    /// Wrap `err` as the cause.
    pub fn cause<E: Error + Send + Sync + 'static>(self, err: E) -> Self {
        self.option(cause(err))
    }

    /// Set the message.
    pub fn message(self, text: impl Into<String>) -> Self {
        self.option(message(text))
    }

    /// Add a trace entry.
    pub fn trace(self, entry: TraceEntry) -> Self {
        self.option(ErrOption::Trace(entry))
    }

    /// Add a trace entry for the caller.
    #[track_caller]
    pub fn with_trace(self) -> Self {
        self.option(ErrOption::Trace(TraceEntry::caller()))
    }

    /// Override the status code.
    pub fn code(self, code: u16) -> Self {
        self.option(ErrOption::Code(code))
    }

    fn apply(&mut self, option: ErrOption) {
        match option {
            ErrOption::Cause(err) => self.wrapped = Some(err),
            ErrOption::Message(text) => self.message = Some(text),
            ErrOption::Trace(entry) => self.history.push(entry),
            ErrOption::Code(code) => self.code = code,
        }
    }

    /// Resolve the status code and produce the error.
    pub fn build(self) -> TypedError {
        let code = match self.code {
            0 => self.category.default_code(),
            code => code,
        };
        let record = ErrorRecord::new(self.wrapped, self.message, self.history, code);
        TypedError::from_record(self.category, record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_message_and_code_win() {
        let err = ErrorBuilder::new(Category::BadRequest)
            .message("first")
            .code(418)
            .message("second")
            .code(422)
            .build();
        assert_eq!(err.message(), "second");
        assert_eq!(err.code(), 422);
    }

    #[test]
    fn zero_code_means_default() {
        let err = ErrorBuilder::new(Category::Conflict).code(0).build();
        assert_eq!(err.code(), 409);
    }

    #[test]
    fn first_trace_is_initial_all_are_history() {
        let a = TraceEntry::new("a.rs", "a", 1);
        let b = TraceEntry::new("b.rs", "b", 2);
        let err = ErrorBuilder::new(Category::Internal)
            .trace(a.clone())
            .trace(b.clone())
            .build();
        assert_eq!(err.trace(), a);
        assert_eq!(err.stack(), vec![a, b]);
    }

    #[test]
    fn last_cause_wins() {
        let err = ErrorBuilder::new(Category::Internal)
            .cause(std::io::Error::other("first"))
            .cause(std::io::Error::other("second"))
            .build();
        assert_eq!(err.cause(), "second");
    }

    #[test]
    fn strings_convert_to_messages() {
        let err = TypedError::not_found(["from &str".into()]);
        assert_eq!(err.message(), "from &str");
        let err = TypedError::not_found([String::from("from String").into()]);
        assert_eq!(err.message(), "from String");
    }

    #[test]
    fn with_trace_reports_this_file() {
        let err = TypedError::internal([with_trace()]);
        let trace = err.trace();
        assert!(trace.file.ends_with("options.rs"), "got {}", trace.file);
        assert!(trace.line > 0);
    }
}
