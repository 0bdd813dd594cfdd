//! Call-site capture for trace entries.
//!
//! Three ways to get a [`TraceEntry`] for "where am I":
//!
//! | Provider | File/line | Function | Cost |
//! |----------|-----------|----------|------|
//! | [`here!()`](crate::here) | compile time | compile time | free |
//! | [`TraceEntry::caller()`] | `#[track_caller]` | call stack walk | a backtrace walk |
//! | [`current_location()`] | call stack walk | call stack walk | a backtrace walk |
//!
//! The stack-walking providers skip this crate's own capture and option
//! frames, so the reported location is always the code that asked for the
//! entry. They need the `backtrace` feature (on by default). Without it,
//! or without symbols, they degrade to [`TraceEntry::unknown()`].

use std::borrow::Cow;
use std::fmt;
use std::panic::Location;

/// Placeholder used for any field that could not be resolved.
pub const UNKNOWN: &str = "unknown";

/// One call site in an error's propagation history.
///
/// The zero value (`TraceEntry::default()`) has empty strings and line 0
/// and stands for "no trace". [`TraceEntry::unknown()`] is the sentinel for
/// a capture that was attempted but could not be resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceEntry {
    /// Source file of the call site.
    pub file: Cow<'static, str>,
    /// Path of the enclosing function, e.g. `my_app::db::load_user`.
    pub function: Cow<'static, str>,
    /// 1-based line number, or 0 when unknown.
    pub line: u32,
}

impl TraceEntry {
    /// Build an entry from its parts.
    pub fn new(
        file: impl Into<Cow<'static, str>>,
        function: impl Into<Cow<'static, str>>,
        line: u32,
    ) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
        }
    }

    /// The `{unknown, unknown, 0}` sentinel.
    #[inline]
    pub const fn unknown() -> Self {
        Self {
            file: Cow::Borrowed(UNKNOWN),
            function: Cow::Borrowed(UNKNOWN),
            line: 0,
        }
    }

    /// Capture the caller's file and line.
    ///
    /// The function name comes from walking the call stack (with the
    /// `backtrace` feature), so it is only as good as the available symbols.
    /// Prefer [`here!()`](crate::here) where the call site can use a macro.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use typed_errors::TraceEntry;
    ///
    /// let entry = TraceEntry::caller();
    /// assert!(entry.file.ends_with(".rs"));
    /// assert!(entry.line > 0);
    /// ```
    #[track_caller]
    pub fn caller() -> Self {
        let loc = Location::caller();
        let function = resolve(0)
            .map(|entry| entry.function)
            .unwrap_or(Cow::Borrowed(UNKNOWN));
        Self {
            file: Cow::Borrowed(loc.file()),
            function,
            line: loc.line(),
        }
    }

    /// True for the zero value.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.line == 0 && self.file.is_empty() && self.function.is_empty()
    }
}

impl From<&'static Location<'static>> for TraceEntry {
    /// File and line from a `Location`; the function is [`UNKNOWN`].
    fn from(loc: &'static Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(loc.file()),
            function: Cow::Borrowed(UNKNOWN),
            line: loc.line(),
        }
    }
}

impl fmt::Display for TraceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} in {}", self.file, self.line, self.function)
    }
}

/// Capture the location of the code that called into this crate.
///
/// Frames belonging to this crate's capture machinery (this module, the
/// option helpers and the `Result` extension) are skipped first, then
/// `skip_frames` more. `current_location(0)` therefore names the function
/// that called `current_location`, or that called
/// [`opt::with_trace()`](crate::opt::with_trace).
///
/// Returns [`TraceEntry::unknown()`] when the stack is too shallow, symbols
/// are unavailable, or the `backtrace` feature is disabled.
///
/// ## Example
///
/// ```rust
/// use typed_errors::current_location;
///
/// fn load_user() -> typed_errors::TraceEntry {
///     current_location(0)
/// }
///
/// let entry = load_user();
/// assert!(!entry.function.is_empty());
/// ```
#[inline(never)]
pub fn current_location(skip_frames: usize) -> TraceEntry {
    resolve(skip_frames).unwrap_or_else(TraceEntry::unknown)
}

#[cfg(feature = "backtrace")]
#[inline(never)]
fn resolve(skip_frames: usize) -> Option<TraceEntry> {
    let mut remaining = skip_frames;
    let mut entered_crate = false;
    let mut found: Option<TraceEntry> = None;

    backtrace::trace(|frame| {
        // A frame can resolve to several symbols when calls were inlined.
        backtrace::resolve_frame(frame, |symbol| {
            if found.is_some() {
                return;
            }
            let Some(name) = symbol.name() else {
                return;
            };
            let name = format!("{name:#}");
            if is_internal_frame(&name) {
                entered_crate = true;
                return;
            }
            // Unwinder and backtrace frames sit above ours.
            if !entered_crate {
                return;
            }
            if remaining > 0 {
                remaining -= 1;
                return;
            }
            let file = symbol
                .filename()
                .map(|path| Cow::Owned(relative_path(path)))
                .unwrap_or(Cow::Borrowed(UNKNOWN));
            found = Some(TraceEntry {
                file,
                function: Cow::Owned(trim_function_name(&name).into()),
                line: symbol.lineno().unwrap_or(0),
            });
        });
        found.is_none()
    });

    found
}

/// `path` relative to the working directory, the form `file!()` uses.
#[cfg(feature = "backtrace")]
fn relative_path(path: &std::path::Path) -> String {
    let dir = std::env::current_dir().unwrap_or_default();
    let relative = path.strip_prefix(&dir).unwrap_or(path);
    relative.display().to_string()
}

#[cfg(not(feature = "backtrace"))]
#[inline(always)]
fn resolve(_skip_frames: usize) -> Option<TraceEntry> {
    None
}

/// Module prefixes whose frames are capture machinery, not call sites.
#[cfg(feature = "backtrace")]
const INTERNAL_PREFIXES: [&str; 3] = [
    concat!(env!("CARGO_CRATE_NAME"), "::location::"),
    concat!(env!("CARGO_CRATE_NAME"), "::options::"),
    concat!(env!("CARGO_CRATE_NAME"), "::ext::"),
];

#[cfg(feature = "backtrace")]
fn is_internal_frame(name: &str) -> bool {
    // Trait impls render as `<Type as crate::module::Trait>::method`.
    let bare = name.trim_start_matches('<');
    INTERNAL_PREFIXES.iter().any(|prefix| {
        bare.starts_with(prefix)
            || name
                .find(" as ")
                .is_some_and(|at| name[at + 4..].starts_with(prefix))
    })
}

/// Strip closure segments from a symbol path.
fn trim_function_name(mut name: &str) -> &str {
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    name
}

/// Turn the type name of the marker fn declared by [`here!()`](crate::here)
/// into the path of the function that contains it.
#[doc(hidden)]
pub fn function_path(marker: &'static str) -> &'static str {
    let name = marker.strip_suffix("::__here").unwrap_or(marker);
    trim_function_name(name)
}

/// Build a [`TraceEntry`] for the current line at compile time.
///
/// Captures `file!()`, `line!()` and the path of the enclosing function.
/// This is the cheapest and most reliable way to get a trace entry.
///
/// ## Example
///
/// ```rust
/// use typed_errors::{here, opt, TypedError};
///
/// fn find_user(id: u64) -> Result<String, TypedError> {
///     Err(TypedError::not_found([
///         opt::message(format!("user {id} not found")),
///         opt::trace(here!()),
///     ]))
/// }
///
/// let err = find_user(7).unwrap_err();
/// assert!(err.trace().function.ends_with("find_user"));
/// ```
#[macro_export]
macro_rules! here {
    () => {{
        fn __here() {}
        $crate::TraceEntry::new(
            ::core::file!(),
            $crate::__function_path(::core::any::type_name_of_val(&__here)),
            ::core::line!(),
        )
    }};
}
