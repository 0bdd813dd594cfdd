//! Error categories and their default status codes.

use core::fmt;

/// The kind of a [`TypedError`](crate::TypedError).
///
/// A category is fixed when the error is constructed and never changes.
/// Each one maps to a default HTTP-style status code, used whenever the
/// error was built without an explicit [`code`](crate::opt::code).
///
/// | Category | Default code |
/// |---|---|
/// | `BadRequest` | 400 |
/// | `Unauthorized` | 403 |
/// | `NotFound` | 404 |
/// | `Conflict` | 409 |
/// | `Internal` | 500 |
/// | `Fatal` | 500 |
/// | `NoContent` | 204 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// The caller sent something invalid.
    BadRequest,
    /// The caller is not allowed to do this.
    Unauthorized,
    /// The requested thing does not exist.
    NotFound,
    /// The request collides with current state.
    Conflict,
    /// Something broke on our side.
    Internal,
    /// Something broke on our side and the process should not carry on.
    Fatal,
    /// Nothing to return. Not a failure so much as an early exit.
    NoContent,
}

impl Category {
    /// All categories, in declaration order.
    pub const ALL: [Category; 7] = [
        Category::BadRequest,
        Category::Unauthorized,
        Category::NotFound,
        Category::Conflict,
        Category::Internal,
        Category::Fatal,
        Category::NoContent,
    ];

    /// Status code reported when the error carries no explicit code.
    #[inline]
    pub const fn default_code(self) -> u16 {
        match self {
            Category::BadRequest => 400,
            Category::Unauthorized => 403,
            Category::NotFound => 404,
            Category::Conflict => 409,
            Category::Internal => 500,
            Category::Fatal => 500,
            Category::NoContent => 204,
        }
    }

    /// Returns the category name as a static string.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::BadRequest => "BadRequest",
            Category::Unauthorized => "Unauthorized",
            Category::NotFound => "NotFound",
            Category::Conflict => "Conflict",
            Category::Internal => "Internal",
            Category::Fatal => "Fatal",
            Category::NoContent => "NoContent",
        }
    }

    /// Level at which [`TypedError::log`](crate::TypedError::log) reports
    /// errors of this category.
    #[cfg(feature = "tracing")]
    pub const fn level(self) -> tracing::Level {
        match self {
            Category::Fatal | Category::Internal => tracing::Level::ERROR,
            Category::Conflict | Category::Unauthorized => tracing::Level::WARN,
            Category::BadRequest | Category::NotFound => tracing::Level::INFO,
            Category::NoContent => tracing::Level::DEBUG,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
