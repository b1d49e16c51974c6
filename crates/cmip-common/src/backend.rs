//! Storage backend detection.
//!
//! Two archives are catalogued: the centrally curated CMIP6 archive
//! (`/badc/cmip6/data/CMIP6/...`) and a group workspace mirror
//! (`/gws/nopw/j04/canari/...`) that flattens the directory tree and encodes
//! ensemble metadata in filenames instead.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CatalogueError, CatalogueResult};

/// Physical storage layout of a base location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Curated archive: `institution/model/experiment/member/table/variable/grid/files/version`
    Archive,
    /// Workspace mirror: `experiment/data/variable/model/<filename with encoded metadata>`
    Workspace,
}

impl Backend {
    /// Detect the backend of a base location.
    ///
    /// Detection happens once per base location; callers thread the result
    /// through every lookup instead of re-deriving it.
    pub fn detect(base_location: &str, markers: &BackendMarkers) -> CatalogueResult<Self> {
        let is_archive = base_location.contains(&markers.archive);
        let is_workspace = base_location.contains(&markers.workspace);

        match (is_archive, is_workspace) {
            (true, false) => Ok(Backend::Archive),
            (false, true) => Ok(Backend::Workspace),
            _ => Err(CatalogueError::UnrecognizedBackend(base_location.to_string())),
        }
    }

    /// Label written to the `data_source` column.
    pub fn data_source(&self) -> &'static str {
        match self {
            Backend::Archive => "badc",
            Backend::Workspace => "canari",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.data_source())
    }
}

/// Substrings that identify each backend within a base location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendMarkers {
    pub archive: String,
    pub workspace: String,
}

impl Default for BackendMarkers {
    fn default() -> Self {
        Self {
            archive: "/badc/".to_string(),
            workspace: "/canari/".to_string(),
        }
    }
}
