//! Shared test utilities for the cmip-catalogue workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Workspace and temporary directory helpers
//! - Archive layout generators for both storage backends
//! - Common fixture names
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then build a synthetic archive in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, ArchiveTree};
//!
//! let files = ArchiveTree::new(fixtures::bases::CMIP, "NCC", "NorCPM1", "historical")
//!     .members(&["r1i1p1f1", "r2i1p1f1"])
//!     .files();
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Assert that a string contains every listed fragment.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_contains_all;
///
/// assert_contains_all!(output, ["model", "NorCPM1"]);
/// ```
#[macro_export]
macro_rules! assert_contains_all {
    ($haystack:expr, [$($needle:expr),+ $(,)?]) => {{
        let haystack: &str = &$haystack;
        $(
            if !haystack.contains($needle) {
                panic!(
                    "assertion failed: output does not contain `{}`\n  output: `{}`",
                    $needle, haystack
                );
            }
        )+
    }};
}
