//! Pattern-queryable stores.
//!
//! A [`Store`] answers glob-style pattern queries (`*` and `?` within a path
//! segment) with the ordered list of matching paths. It is the only I/O
//! boundary of the catalogue engine.

use glob::{MatchOptions, Pattern};
use lru::LruCache;
use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Faults raised by a store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("I/O error at {path}: {message}")]
    Io { path: String, message: String },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("No such file: {0}")]
    NotFound(String),
}

/// A queryable listing of archive paths.
pub trait Store {
    /// Return every path matching `pattern`, sorted lexicographically.
    ///
    /// An empty vector means nothing matched; it is not an error.
    fn query(&self, pattern: &str) -> Result<Vec<String>, StoreError>;

    /// Size in bytes of the file at `path`.
    fn file_size(&self, path: &str) -> Result<u64, StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn query(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        (**self).query(pattern)
    }

    fn file_size(&self, path: &str) -> Result<u64, StoreError> {
        (**self).file_size(path)
    }
}

/// Match options shared by every store: wildcards never cross `/`.
fn match_options() -> MatchOptions {
    MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    }
}

// ============================================================================
// Filesystem store
// ============================================================================

/// Store backed by the mounted filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobStore;

impl GlobStore {
    pub fn new() -> Self {
        Self
    }
}

impl Store for GlobStore {
    fn query(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        let paths =
            glob::glob_with(pattern, match_options()).map_err(|e| StoreError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            })?;

        let mut matches = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| {
                let path = e.path().display().to_string();
                if e.error().kind() == std::io::ErrorKind::PermissionDenied {
                    StoreError::PermissionDenied(path)
                } else {
                    StoreError::Io {
                        path,
                        message: e.error().to_string(),
                    }
                }
            })?;
            matches.push(path.to_string_lossy().into_owned());
        }
        matches.sort();

        debug!(pattern = %pattern, matches = matches.len(), "Filesystem query");
        Ok(matches)
    }

    fn file_size(&self, path: &str) -> Result<u64, StoreError> {
        std::fs::metadata(path)
            .map(|m| m.len())
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => StoreError::NotFound(path.to_string()),
                std::io::ErrorKind::PermissionDenied => {
                    StoreError::PermissionDenied(path.to_string())
                }
                _ => StoreError::Io {
                    path: path.to_string(),
                    message: e.to_string(),
                },
            })
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-memory listing of files and their implied parent directories.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    /// path -> size; directories carry `None`
    entries: BTreeMap<String, Option<u64>>,
    /// queries whose pattern starts with one of these prefixes fail
    denied_prefixes: Vec<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(path, size)` file entries.
    pub fn from_files<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = (P, u64)>,
        P: AsRef<str>,
    {
        let mut store = Self::new();
        for (path, size) in files {
            store.insert_file(path.as_ref(), size);
        }
        store
    }

    /// Snapshot the directory trees under `roots`.
    ///
    /// Roots that do not exist contribute nothing, matching what a
    /// [`GlobStore`] query below them would return.
    pub fn snapshot<I, P>(roots: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut store = Self::new();
        for root in roots {
            let root = root.as_ref();
            if !root.exists() {
                debug!(root = %root.display(), "Snapshot root missing");
                continue;
            }
            store.insert_tree(root)?;
        }
        debug!(entries = store.len(), "Snapshot complete");
        Ok(store)
    }

    fn insert_tree(&mut self, root: &Path) -> Result<(), StoreError> {
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().map(|p| p.display().to_string()).unwrap_or_default();
                match e.io_error().map(std::io::Error::kind) {
                    Some(std::io::ErrorKind::PermissionDenied) => StoreError::PermissionDenied(path),
                    _ => StoreError::Io {
                        path,
                        message: e.to_string(),
                    },
                }
            })?;
            let path = entry.path().to_string_lossy().into_owned();
            if entry.file_type().is_file() {
                let size = entry
                    .metadata()
                    .map(|m| m.len())
                    .map_err(|e| StoreError::Io {
                        path: path.clone(),
                        message: e.to_string(),
                    })?;
                self.insert_file(&path, size);
            } else if entry.file_type().is_dir() {
                self.insert_dir(&path);
            }
        }
        Ok(())
    }

    /// Add a file and all of its ancestor directories.
    pub fn insert_file(&mut self, path: &str, size: u64) {
        if let Some((parent, _)) = path.rsplit_once('/') {
            self.insert_dir(parent);
        }
        self.entries.insert(path.to_string(), Some(size));
    }

    /// Add a directory and all of its ancestors.
    pub fn insert_dir(&mut self, path: &str) {
        let path = path.trim_end_matches('/');
        if path.is_empty() {
            return;
        }
        let mut end = 0;
        while let Some(offset) = path[end + 1..].find('/') {
            end += offset + 1;
            self.entries.entry(path[..end].to_string()).or_insert(None);
        }
        self.entries.entry(path.to_string()).or_insert(None);
    }

    /// Make every query whose pattern starts with `prefix` fail with
    /// [`StoreError::PermissionDenied`].
    pub fn deny(&mut self, prefix: &str) {
        self.denied_prefixes.push(prefix.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Store for MemoryStore {
    fn query(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        if self.denied_prefixes.iter().any(|p| pattern.starts_with(p)) {
            return Err(StoreError::PermissionDenied(pattern.to_string()));
        }

        let compiled = Pattern::new(pattern).map_err(|e| StoreError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        let options = match_options();

        let matches: Vec<String> = self
            .entries
            .keys()
            .filter(|path| compiled.matches_with(path.as_str(), options))
            .cloned()
            .collect();

        debug!(pattern = %pattern, matches = matches.len(), "Memory query");
        Ok(matches)
    }

    fn file_size(&self, path: &str) -> Result<u64, StoreError> {
        match self.entries.get(path) {
            Some(Some(size)) => Ok(*size),
            _ => Err(StoreError::NotFound(path.to_string())),
        }
    }
}

// ============================================================================
// Pattern cache
// ============================================================================

/// Hit/miss counters for [`CachingStore`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// LRU memoisation of pattern queries keyed on the literal pattern string.
///
/// Only successful queries are cached; faults are re-queried each time.
pub struct CachingStore<S> {
    inner: S,
    cache: Mutex<LruCache<String, Vec<String>>>,
    stats: Mutex<CacheStats>,
}

impl<S: Store> CachingStore<S> {
    /// Default number of cached patterns.
    pub const DEFAULT_CAPACITY: usize = 4096;

    pub fn new(inner: S, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            stats: Mutex::new(CacheStats::default()),
        }
    }

    pub fn stats(&self) -> CacheStats {
        *self.stats.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<S: Store> Store for CachingStore<S> {
    fn query(&self, pattern: &str) -> Result<Vec<String>, StoreError> {
        {
            let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(matches) = cache.get(pattern) {
                self.stats.lock().unwrap_or_else(|e| e.into_inner()).hits += 1;
                return Ok(matches.clone());
            }
        }

        let matches = self.inner.query(pattern)?;
        self.stats.lock().unwrap_or_else(|e| e.into_inner()).misses += 1;
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .put(pattern.to_string(), matches.clone());
        Ok(matches)
    }

    fn file_size(&self, path: &str) -> Result<u64, StoreError> {
        self.inner.file_size(path)
    }
}
