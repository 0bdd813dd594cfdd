//! Integration tests for call-site capture.
//!
//! Debug builds with the `backtrace` feature always carry symbols, so there
//! stack-walked function names must resolve exactly. Elsewhere the
//! `unknown` fallback is accepted.

use typed_errors::{ResultStackExt, TraceEntry, TypedError, current_location, here, opt};

/// Stack-walked names must resolve exactly.
#[cfg(all(feature = "backtrace", debug_assertions))]
fn assert_function(entry: &TraceEntry, expected: &str) {
    assert_eq!(entry.function, expected);
}

/// Stack-walked names may fall back to `unknown`.
#[cfg(not(all(feature = "backtrace", debug_assertions)))]
fn assert_function(entry: &TraceEntry, expected: &str) {
    assert!(
        entry.function == typed_errors::UNKNOWN || entry.function == expected,
        "got {}",
        entry.function
    );
}

// ============================================================================
// here!()
// ============================================================================

#[test]
fn here_is_exact() {
    let line = line!() + 1;
    let entry = here!();
    assert_eq!(entry.function, "location::here_is_exact");
    assert_eq!(entry.line, line);
    assert!(entry.file.ends_with("location.rs"));
}

mod nested {
    pub fn capture() -> typed_errors::TraceEntry {
        typed_errors::here!()
    }
}

#[test]
fn here_includes_module_path() {
    assert_eq!(nested::capture().function, "location::nested::capture");
}

#[test]
fn here_in_method() {
    struct Repo;
    impl Repo {
        fn load(&self) -> TraceEntry {
            here!()
        }
    }
    let entry = Repo.load();
    assert!(entry.function.ends_with("::load"), "got {}", entry.function);
}

// ============================================================================
// Stack walking
// ============================================================================

#[inline(never)]
fn load_user() -> TraceEntry {
    current_location(0)
}

#[inline(never)]
fn outer_caller() -> TraceEntry {
    skip_one()
}

#[inline(never)]
fn skip_one() -> TraceEntry {
    current_location(1)
}

#[test]
fn current_location_names_caller() {
    let entry = load_user();
    assert_function(&entry, "location::load_user");
}

#[test]
fn current_location_skips_frames() {
    let entry = outer_caller();
    assert_function(&entry, "location::outer_caller");
}

#[test]
fn current_location_past_the_stack_is_unknown() {
    let entry = current_location(100_000);
    assert_eq!(entry, TraceEntry::unknown());
}

#[test]
fn caller_line_is_exact() {
    let line = line!() + 1;
    let entry = TraceEntry::caller();
    assert_eq!(entry.line, line);
    assert!(entry.file.ends_with("location.rs"));
    assert_function(&entry, "location::caller_line_is_exact");
}

#[inline(never)]
fn build_with_trace() -> TypedError {
    TypedError::internal([opt::with_trace()])
}

#[test]
fn with_trace_names_constructing_function() {
    let err = build_with_trace();
    let trace = err.trace();
    assert!(trace.file.ends_with("location.rs"));
    assert_function(&trace, "location::build_with_trace");
}

#[test]
fn stack_here_records_call_site() {
    let err = build_with_trace();
    let line = line!() + 1;
    let result: Result<(), _> = Err(err.at(here!()));
    let err = result.stack_here().unwrap_err();
    let stack = err.stack();
    assert_eq!(stack.len(), 3);
    assert_eq!(stack[1].line, line);
    assert_eq!(stack[2].line, line + 1);
    assert_eq!(stack[2].file, stack[1].file);
    assert_function(&stack[2], "location::stack_here_records_call_site");
}

// ============================================================================
// One path form for every provider
// ============================================================================

#[cfg(all(feature = "backtrace", debug_assertions))]
#[test]
fn stack_walked_file_matches_compile_time_file() {
    let walked = current_location(0);
    let caller = TraceEntry::caller();
    let fixed = here!();
    assert_eq!(walked.file, fixed.file);
    assert_eq!(caller.file, fixed.file);
}

#[cfg(all(feature = "backtrace", debug_assertions))]
#[test]
fn mixed_providers_share_path_form() {
    let err = build_with_trace().at(here!()).at(current_location(0));
    let files: Vec<_> = err.stack().into_iter().map(|e| e.file).collect();
    assert_eq!(files.len(), 3);
    assert!(files.iter().all(|f| *f == files[0]), "got {files:?}");
}
