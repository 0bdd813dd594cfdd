//! # typed-errors - categorized errors with status codes and call-site traces
//!
//! ```text
//! Error [Code: 404]
//!   Cause:   no rows in result set
//!   Message: user 42 not found
//!   Stack:   loading profile
//!
//! Stack Trace:
//!   1. src/db.rs:142 in my_app::db::find_user
//!   2. src/api.rs:89 in my_app::api::profile
//! ```
//!
//! ## Try It Now
//!
//! Build a [`TypedError`] for one of seven categories, hand it any
//! construction options in any order, and append a trace entry wherever it
//! passes through:
//!
//! ```rust
//! use typed_errors::{here, opt, ResultStackExt, TypedError};
//!
//! fn find_user(id: u64) -> Result<String, TypedError> {
//!     Err(TypedError::not_found([
//!         opt::message(format!("user {id} not found")),
//!         opt::trace(here!()),
//!     ]))
//! }
//!
//! fn profile(id: u64) -> Result<String, TypedError> {
//!     find_user(id).stack_with_message("loading profile", here!())
//! }
//!
//! let err = profile(42).unwrap_err();
//! assert_eq!(err.code(), 404);
//! assert_eq!(err.stack().len(), 2);
//! println!("{}", err.full_trace());
//! ```
//!
//! ## Categories
//!
//! | Constructor | Category | Default code |
//! |-------------|----------|--------------|
//! | [`TypedError::bad_request`] | [`Category::BadRequest`] | 400 |
//! | [`TypedError::unauthorized`] | [`Category::Unauthorized`] | 403 |
//! | [`TypedError::not_found`] | [`Category::NotFound`] | 404 |
//! | [`TypedError::conflict`] | [`Category::Conflict`] | 409 |
//! | [`TypedError::internal`] | [`Category::Internal`] | 500 |
//! | [`TypedError::fatal`] | [`Category::Fatal`] | 500 |
//! | [`TypedError::no_content`] | [`Category::NoContent`] | 204 |
//!
//! Branch on a category several layers away with [`is_not_found`] and
//! friends. They walk the `source()` chain, so the check still works after
//! the error has been wrapped by `thiserror` variants or `anyhow` context.
//!
//! ## Construction Options
//!
//! | Option | Effect |
//! |--------|--------|
//! | [`opt::cause(err)`](opt::cause) | wrap `err`; its text becomes the cause |
//! | [`opt::message(text)`](opt::message) | user-facing message |
//! | [`opt::trace(here!())`](opt::trace) | first trace is the initial trace; all go to the stack |
//! | [`opt::with_trace()`](opt::with_trace) | same, captured for the caller |
//! | [`opt::code(422)`](opt::code) | override the category's default code |
//!
//! ## Sharing Across Threads
//!
//! A `TypedError` is a cheap handle: clones alias one record. Trace appends
//! ([`TypedError::push_trace`], [`stack`]) go through a per-error lock, so
//! fanning one error out to many workers that each append their call site
//! loses nothing.
//!
//! ## Inspecting Anything
//!
//! [`cause_of`], [`message_of`], [`code_of`], [`trace_of`], [`stack_of`],
//! [`wrapped_cause_of`], [`unwrap`] and [`render_full`] accept
//! `Option<&E>` for any error and never panic, so they can be called on
//! errors that never touched this crate.
//!
//! ## Features
//!
//! | Feature | Default | Adds |
//! |---------|---------|------|
//! | `backtrace` | yes | function names for [`TraceEntry::caller()`] and [`current_location()`] |
//! | `serde` | yes | `Serialize`/`Deserialize`, [`stack_json`] |
//! | `tracing` | yes | [`TypedError::log`], [`Category::level`] |
//! | `smallvec-4` / `smallvec-8` | no | inline trace storage |

#![deny(unsafe_code)]

mod category;
mod error;
mod ext;
mod inspect;
mod location;
mod options;
pub mod prelude;
mod record;
mod report;

pub use category::Category;
pub use error::TypedError;
pub use ext::ResultStackExt;
#[cfg(feature = "serde")]
pub use inspect::stack_json;
pub use inspect::{
    AsDynError, as_typed, category_of, cause_of, chain, code_of, find_typed, is_bad_request,
    is_category, is_conflict, is_fatal, is_internal, is_no_content, is_not_found,
    is_unauthorized, message_of, render_full, stack, stack_of, stack_with_message, trace_of,
    unwrap, wrapped_cause_of,
};
#[doc(hidden)]
pub use location::function_path as __function_path;
pub use location::{TraceEntry, UNKNOWN, current_location};
pub use options::{ErrOption, ErrorBuilder};
pub use record::MAX_CAUSE_DISPLAY_LEN;
pub use report::ErrorReport;

/// Construction options for [`TypedError`] constructors.
///
/// ```rust
/// use typed_errors::{here, opt, TypedError};
///
/// let err = TypedError::internal([
///     opt::code(503),
///     opt::cause(std::io::Error::other("connection reset")),
///     opt::trace(here!()),
///     opt::message("upstream unavailable"),
/// ]);
/// assert_eq!(err.code(), 503);
/// assert_eq!(err.cause(), "connection reset");
/// ```
pub mod opt {
    pub use crate::options::{cause, code, message, shared_cause, trace, with_trace};
}
