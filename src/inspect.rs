//! Total accessors over any error, typed or not.
//!
//! Every function here accepts `Option<&E>` for any error type `E` (sized
//! error types, `dyn Error`, `dyn Error + Send + Sync`). `None` stands for
//! "no error", and every function has a defined answer for it and for
//! errors that never passed through this crate, so they are safe to call
//! unconditionally:
//!
//! | Function | `None` | untyped error | [`TypedError`] |
//! |----------|--------|---------------|----------------|
//! | [`cause_of`] | `""` | `Display` | cause, else message, else `Display` |
//! | [`message_of`] | `""` | `Display` | message, else `Display` |
//! | [`code_of`] | `0` | `0` | resolved code |
//! | [`trace_of`] | zero entry | zero entry | initial trace |
//! | [`stack_of`] | `[]` | `[]` | copy of the history |
//! | [`wrapped_cause_of`] | `None` | the error | wrapped error, else the error |
//! | [`unwrap`] | `None` | `source()` | wrapped error |
//! | [`render_full`] | `""` | `Display` | full dump |
//!
//! ## Example
//!
//! ```rust
//! use typed_errors::{cause_of, code_of, message_of, opt, TypedError};
//!
//! fn lookup(id: u64) -> Result<String, TypedError> {
//!     Err(TypedError::not_found([opt::message(format!("user {id} not found"))]))
//! }
//!
//! let result = lookup(3);
//! assert_eq!(code_of(result.as_ref().err()), 404);
//! assert_eq!(message_of(result.as_ref().err()), "user 3 not found");
//!
//! let io = std::io::Error::other("disk gone");
//! assert_eq!(cause_of(Some(&io)), "disk gone");
//! assert_eq!(code_of(Some(&io)), 0);
//! ```

use std::error::Error;
use std::iter;

use crate::category::Category;
use crate::error::TypedError;
use crate::location::TraceEntry;

// ============================================================================
// AsDynError - uniform view of sized and unsized errors
// ============================================================================

/// Borrow any error as `&(dyn Error + 'static)`.
///
/// Implemented for every sized `Error + 'static` type and for the
/// `dyn Error` trait objects, so the accessors take both `&io::Error` and
/// `&dyn Error` (e.g. from `anyhow::Error::as_ref`).
pub trait AsDynError {
    /// Borrow as a trait object.
    fn as_dyn_error(&self) -> &(dyn Error + 'static);
}

impl<E: Error + 'static> AsDynError for E {
    #[inline]
    fn as_dyn_error(&self) -> &(dyn Error + 'static) {
        self
    }
}

impl AsDynError for dyn Error + 'static {
    #[inline]
    fn as_dyn_error(&self) -> &(dyn Error + 'static) {
        self
    }
}

impl AsDynError for dyn Error + Send + Sync + 'static {
    #[inline]
    fn as_dyn_error(&self) -> &(dyn Error + 'static) {
        self
    }
}

/// `err` itself as a [`TypedError`], without looking at its causes.
#[inline]
pub fn as_typed<E: AsDynError + ?Sized>(err: &E) -> Option<&TypedError> {
    err.as_dyn_error().downcast_ref::<TypedError>()
}

// ============================================================================
// Trace appends
// ============================================================================

/// Append `entry` to `err`'s trace and hand `err` back.
///
/// A no-op for `None` and for errors that are not a [`TypedError`].
///
/// ## Example
///
/// ```rust
/// use typed_errors::{here, stack, stack_of, TypedError};
///
/// let err = TypedError::not_found([]);
/// let same = stack(Some(&err), here!());
/// stack(same, here!());
/// assert_eq!(stack_of(Some(&err)).len(), 2);
/// ```
pub fn stack<E: AsDynError + ?Sized>(err: Option<&E>, entry: TraceEntry) -> Option<&E> {
    if let Some(e) = err {
        match as_typed(e) {
            Some(typed) => typed.push_trace(entry),
            None => skipped(e.as_dyn_error()),
        }
    }
    err
}

/// Like [`stack`], and also replaces the stack message.
pub fn stack_with_message<E: AsDynError + ?Sized>(
    err: Option<&E>,
    message: impl Into<String>,
    entry: TraceEntry,
) -> Option<&E> {
    if let Some(e) = err {
        match as_typed(e) {
            Some(typed) => typed.push_trace_with_message(message, entry),
            None => skipped(e.as_dyn_error()),
        }
    }
    err
}

#[cfg(feature = "tracing")]
fn skipped(err: &(dyn Error + 'static)) {
    tracing::trace!(error = %err, "trace entry dropped: not a TypedError");
}

#[cfg(not(feature = "tracing"))]
#[inline(always)]
fn skipped(_err: &(dyn Error + 'static)) {}

// ============================================================================
// Accessors
// ============================================================================

/// Cause text, falling back to the message and then to `Display`.
pub fn cause_of<E: AsDynError + ?Sized>(err: Option<&E>) -> String {
    let Some(err) = err else {
        return String::new();
    };
    match as_typed(err) {
        Some(typed) => typed.cause().into_owned(),
        None => err.as_dyn_error().to_string(),
    }
}

/// Message, falling back to `Display`.
pub fn message_of<E: AsDynError + ?Sized>(err: Option<&E>) -> String {
    let Some(err) = err else {
        return String::new();
    };
    match as_typed(err) {
        Some(typed) => typed.message().into_owned(),
        None => err.as_dyn_error().to_string(),
    }
}

/// Resolved status code; 0 when `err` is absent or not a [`TypedError`].
///
/// Only `err` itself is checked. Use [`find_typed`] to look through
/// wrappers.
pub fn code_of<E: AsDynError + ?Sized>(err: Option<&E>) -> u16 {
    err.and_then(as_typed).map_or(0, TypedError::code)
}

/// Initial trace entry; the zero value when there is none.
pub fn trace_of<E: AsDynError + ?Sized>(err: Option<&E>) -> TraceEntry {
    err.and_then(as_typed)
        .map(TypedError::trace)
        .unwrap_or_default()
}

/// Copy of the trace history; empty when there is none.
pub fn stack_of<E: AsDynError + ?Sized>(err: Option<&E>) -> Vec<TraceEntry> {
    err.and_then(as_typed)
        .map(TypedError::stack)
        .unwrap_or_default()
}

/// The wrapped error if there is one, else `err` itself.
///
/// Only `None` in, `None` out.
pub fn wrapped_cause_of<E: AsDynError + ?Sized>(
    err: Option<&E>,
) -> Option<&(dyn Error + 'static)> {
    let err = err?;
    let wrapped = as_typed(err)
        .and_then(TypedError::wrapped_cause_ref)
        .map(|w| w as &(dyn Error + 'static));
    Some(wrapped.unwrap_or_else(|| err.as_dyn_error()))
}

/// One level down the cause chain.
///
/// For a [`TypedError`] this is the wrapped error (`None` if it has none);
/// for anything else it is `source()`.
pub fn unwrap<E: AsDynError + ?Sized>(err: Option<&E>) -> Option<&(dyn Error + 'static)> {
    let err = err?;
    match as_typed(err) {
        Some(typed) => typed
            .wrapped_cause_ref()
            .map(|w| w as &(dyn Error + 'static)),
        None => err.as_dyn_error().source(),
    }
}

/// Multi-line dump; see [`TypedError::full_trace`].
pub fn render_full<E: AsDynError + ?Sized>(err: Option<&E>) -> String {
    let Some(err) = err else {
        return String::new();
    };
    match as_typed(err) {
        Some(typed) => typed.render_full(),
        None => err.as_dyn_error().to_string(),
    }
}

/// Trace history as JSON: `""` for `None`, `"{}"` for untyped errors and
/// empty histories, else an array of `{file, function, line}` objects.
#[cfg(feature = "serde")]
pub fn stack_json<E: AsDynError + ?Sized>(err: Option<&E>) -> String {
    let Some(err) = err else {
        return String::new();
    };
    match as_typed(err) {
        Some(typed) => typed.stack_json(),
        None => "{}".into(),
    }
}

// ============================================================================
// Category identity
// ============================================================================

/// Iterate `err` and its causes, outermost first.
pub fn chain<E: AsDynError + ?Sized>(err: &E) -> impl Iterator<Item = &(dyn Error + 'static)> {
    iter::successors(Some(err.as_dyn_error()), |&e| e.source())
}

/// The first [`TypedError`] in `err`'s cause chain, starting with `err`.
///
/// ## Example
///
/// ```rust
/// use typed_errors::{find_typed, Category, TypedError};
///
/// #[derive(Debug, thiserror::Error)]
/// #[error("handler failed")]
/// struct HandlerError(#[source] TypedError);
///
/// let err = HandlerError(TypedError::conflict([]));
/// assert_eq!(find_typed(&err).map(|t| t.category()), Some(Category::Conflict));
/// ```
pub fn find_typed<E: AsDynError + ?Sized>(err: &E) -> Option<&TypedError> {
    chain(err).find_map(|e| e.downcast_ref::<TypedError>())
}

/// Category of the first [`TypedError`] in `err`'s cause chain.
pub fn category_of<E: AsDynError + ?Sized>(err: &E) -> Option<Category> {
    find_typed(err).map(TypedError::category)
}

/// True if any [`TypedError`] in `err`'s cause chain has `category`.
pub fn is_category<E: AsDynError + ?Sized>(err: &E, category: Category) -> bool {
    chain(err)
        .filter_map(|e| e.downcast_ref::<TypedError>())
        .any(|typed| typed.is(category))
}

/// True if the cause chain holds a [`Category::BadRequest`] error.
pub fn is_bad_request<E: AsDynError + ?Sized>(err: &E) -> bool {
    is_category(err, Category::BadRequest)
}

/// True if the cause chain holds a [`Category::Unauthorized`] error.
pub fn is_unauthorized<E: AsDynError + ?Sized>(err: &E) -> bool {
    is_category(err, Category::Unauthorized)
}

/// True if the cause chain holds a [`Category::NotFound`] error.
pub fn is_not_found<E: AsDynError + ?Sized>(err: &E) -> bool {
    is_category(err, Category::NotFound)
}

/// True if the cause chain holds a [`Category::Conflict`] error.
pub fn is_conflict<E: AsDynError + ?Sized>(err: &E) -> bool {
    is_category(err, Category::Conflict)
}

/// True if the cause chain holds a [`Category::Internal`] error.
pub fn is_internal<E: AsDynError + ?Sized>(err: &E) -> bool {
    is_category(err, Category::Internal)
}

/// True if the cause chain holds a [`Category::Fatal`] error.
pub fn is_fatal<E: AsDynError + ?Sized>(err: &E) -> bool {
    is_category(err, Category::Fatal)
}

/// True if the cause chain holds a [`Category::NoContent`] error.
pub fn is_no_content<E: AsDynError + ?Sized>(err: &E) -> bool {
    is_category(err, Category::NoContent)
}
