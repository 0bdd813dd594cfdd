//! Extension trait for appending trace entries on `Result`s.

use crate::error::TypedError;
use crate::location::TraceEntry;

/// Append trace entries to the error side of a `Result<T, TypedError>`.
///
/// Each method is a no-op on `Ok`.
///
/// ## Example
///
/// ```rust
/// use typed_errors::{here, opt, ResultStackExt, TypedError};
///
/// fn query() -> Result<u64, TypedError> {
///     Err(TypedError::internal([opt::message("query failed"), opt::trace(here!())]))
/// }
///
/// fn load_profile() -> Result<u64, TypedError> {
///     let rows = query().stack_with_message("loading profile", here!())?;
///     Ok(rows)
/// }
///
/// let err = load_profile().unwrap_err();
/// assert_eq!(err.stack().len(), 2);
/// assert_eq!(err.stack_message().as_deref(), Some("loading profile"));
/// ```
pub trait ResultStackExt<T> {
    /// Append `entry` to the error's trace.
    fn stack(self, entry: TraceEntry) -> Result<T, TypedError>;

    /// Append `entry` and replace the error's stack message.
    fn stack_with_message(
        self,
        message: impl Into<String>,
        entry: TraceEntry,
    ) -> Result<T, TypedError>;

    /// Append an entry for the caller (see [`TraceEntry::caller()`]).
    #[track_caller]
    fn stack_here(self) -> Result<T, TypedError>;
}

impl<T> ResultStackExt<T> for Result<T, TypedError> {
    #[inline]
    fn stack(self, entry: TraceEntry) -> Result<T, TypedError> {
        self.map_err(|e| e.at(entry))
    }

    #[inline]
    fn stack_with_message(
        self,
        message: impl Into<String>,
        entry: TraceEntry,
    ) -> Result<T, TypedError> {
        self.map_err(|e| e.at_with_message(message, entry))
    }

    #[track_caller]
    #[inline]
    fn stack_here(self) -> Result<T, TypedError> {
        match self {
            Ok(v) => Ok(v),
            Err(e) => Err(e.at(TraceEntry::caller())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::here;

    #[test]
    fn ok_is_untouched() {
        let ok: Result<u8, TypedError> = Ok(7);
        assert_eq!(ok.stack(here!()).stack_here().unwrap(), 7);
    }

    #[test]
    fn stack_here_records_this_line() {
        let line = line!() + 1;
        let err = Err::<(), _>(TypedError::not_found([])).stack_here().unwrap_err();
        let stack = err.stack();
        assert_eq!(stack.len(), 1);
        assert_eq!(stack[0].line, line);
        assert!(stack[0].file.ends_with("ext.rs"));
    }
}
