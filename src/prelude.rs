//! Convenient re-exports for common usage.
//!
//! ## Usage
//!
//! ```rust
//! use typed_errors::prelude::*;
//!
//! fn inner() -> Result<(), TypedError> {
//!     Err(TypedError::not_found([opt::message("missing"), opt::trace(here!())]))
//! }
//!
//! fn outer() -> Result<(), TypedError> {
//!     inner().stack(here!())?;
//!     Ok(())
//! }
//!
//! assert!(is_not_found(&outer().unwrap_err()));
//! ```

pub use crate::opt;
pub use crate::{Category, ResultStackExt, TraceEntry, TypedError};
pub use crate::{here, is_category, is_not_found};
