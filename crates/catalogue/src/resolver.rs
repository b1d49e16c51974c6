//! Pattern execution against a store.

use tracing::{debug, warn};

use crate::store::Store;

/// Paths matched by one pattern, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    paths: Vec<String>,
}

impl MatchSet {
    pub fn new(paths: Vec<String>) -> Self {
        Self { paths }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn first(&self) -> Option<&str> {
        self.paths.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Final path segment (file or directory name) of every match.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|p| segment_from_end(p, 0).unwrap_or(p))
    }
}

/// Path segment `n` places before the last one (`0` is the last segment).
pub fn segment_from_end(path: &str, n: usize) -> Option<&str> {
    path.trim_end_matches('/').rsplit('/').nth(n)
}

/// Outcome of one store query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// The query succeeded; the set may be empty.
    Matches(MatchSet),
    /// The store faulted; nothing is known about availability.
    Unavailable { pattern: String, reason: String },
}

impl Resolved {
    pub fn matches(&self) -> Option<&MatchSet> {
        match self {
            Resolved::Matches(set) => Some(set),
            Resolved::Unavailable { .. } => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Resolved::Unavailable { .. })
    }
}

/// Executes patterns, turning store faults into [`Resolved::Unavailable`].
pub struct DirectoryResolver<'s> {
    store: &'s dyn Store,
}

impl<'s> DirectoryResolver<'s> {
    pub fn new(store: &'s dyn Store) -> Self {
        Self { store }
    }

    /// Run one query. No retries.
    pub fn resolve(&self, pattern: &str) -> Resolved {
        match self.store.query(pattern) {
            Ok(paths) => {
                debug!(pattern = %pattern, matches = paths.len(), "Resolved pattern");
                Resolved::Matches(MatchSet::new(paths))
            }
            Err(e) => {
                warn!(pattern = %pattern, error = %e, "Store query failed");
                Resolved::Unavailable {
                    pattern: pattern.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Number of zero-byte files; `None` if any size lookup faults.
    pub fn count_empty_files(&self, resolved: &Resolved) -> Option<usize> {
        let files = resolved.matches()?;
        let mut empty = 0;
        for path in files.iter() {
            match self.store.file_size(path) {
                Ok(0) => empty += 1,
                Ok(_) => {}
                Err(e) => {
                    warn!(path = %path, error = %e, "File size lookup failed");
                    return None;
                }
            }
        }
        Some(empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    #[test]
    fn test_segment_from_end() {
        let path = "/a/NCC/NorCPM1/historical/r1i1p1f1/Amon/psl";
        assert_eq!(segment_from_end(path, 0), Some("psl"));
        assert_eq!(segment_from_end(path, 2), Some("r1i1p1f1"));
        assert_eq!(segment_from_end("/a/b/", 0), Some("b"));
    }

    #[test]
    fn test_resolve_empty_is_matches() {
        let store = MemoryStore::new();
        let resolver = DirectoryResolver::new(&store);
        let resolved = resolver.resolve("/nothing/*");
        assert_eq!(resolved, Resolved::Matches(MatchSet::default()));
        assert!(resolved.matches().unwrap().is_empty());
    }

    #[test]
    fn test_resolve_fault_is_unavailable() {
        let mut store = MemoryStore::from_files([("/locked/a.nc", 1)]);
        store.deny("/locked");
        let resolver = DirectoryResolver::new(&store);
        let resolved = resolver.resolve("/locked/*.nc");
        assert!(resolved.is_unavailable());
        assert!(resolved.matches().is_none());
    }

    #[test]
    fn test_count_empty_files() {
        let store = MemoryStore::from_files([("/d/a.nc", 0), ("/d/b.nc", 12), ("/d/c.nc", 0)]);
        let resolver = DirectoryResolver::new(&store);
        let files = resolver.resolve("/d/*.nc");
        assert_eq!(resolver.count_empty_files(&files), Some(2));
    }

    #[test]
    fn test_count_empty_files_on_directories_is_unavailable() {
        let store = MemoryStore::from_files([("/d/sub/a.nc", 0)]);
        let resolver = DirectoryResolver::new(&store);
        let dirs = resolver.resolve("/d/*");
        assert_eq!(resolver.count_empty_files(&dirs), None);
    }

    #[test]
    fn test_names() {
        let set = MatchSet::new(vec!["/x/r1i1p1f1".into(), "/x/r2i1p1f1".into()]);
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["r1i1p1f1", "r2i1p1f1"]);
    }
}
