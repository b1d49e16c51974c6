//! Path utilities for tests.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// This is determined by walking up from the test-utils manifest directory.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the path to the workspace `config/` directory.
pub fn config_dir() -> PathBuf {
    workspace_root().join("config")
}

/// Re-roots an absolute archive path under `root`.
///
/// `rooted("/tmp/x", "/badc/cmip6")` gives `/tmp/x/badc/cmip6`, keeping the
/// backend markers of the original path intact.
pub fn rooted(root: &Path, archive_path: &str) -> String {
    root.join(archive_path.trim_start_matches('/'))
        .to_string_lossy()
        .into_owned()
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}
