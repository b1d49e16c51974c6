//! Field extraction from matched paths and filenames.
//!
//! The curated archive encodes metadata in directory names at fixed depths
//! below the base location; the workspace mirror encodes it in
//! underscore-separated filename fields.

use std::collections::{BTreeSet, HashSet};
use std::path::{Component, Path};

use cmip_common::{Backend, CatalogueResult, EnsembleMemberKey, MemberComponent};
use tracing::warn;

use crate::consistency::check_table_id;
use crate::coordinate::Coordinate;
use crate::resolver::{segment_from_end, MatchSet, Resolved};

/// Institution reported for backends that do not record one.
pub const INSTITUTION_PLACEHOLDER: &str = "unknown";

/// Appended to the requested table id when no member carries it.
pub const NOT_AVAILABLE_SUFFIX: &str = " not available";

/// Appended to the requested table id when the store faulted.
pub const UNAVAILABLE_SUFFIX: &str = " unavailable";

/// Curated archive directory depths, counted from the first segment below the base.
pub mod archive_depth {
    pub const INSTITUTION: usize = 0;
    pub const MODEL: usize = 1;
    pub const EXPERIMENT: usize = 2;
    pub const MEMBER: usize = 3;
    pub const TABLE: usize = 4;
    pub const VARIABLE: usize = 5;
}

/// Underscore-separated filename fields of the workspace mirror.
pub mod workspace_field {
    pub const VARIABLE: usize = 0;
    pub const TABLE: usize = 1;
    pub const MODEL: usize = 2;
    pub const EXPERIMENT: usize = 3;
    pub const MEMBER: usize = 4;
    pub const GRID: usize = 5;
    pub const DATE_RANGE: usize = 6;
}

/// Path segments with root, prefix, `.` and repeated separators dropped.
fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    Path::new(path).components().filter_map(|component| match component {
        Component::Normal(segment) => segment.to_str(),
        Component::ParentDir => Some(".."),
        Component::RootDir | Component::CurDir | Component::Prefix(_) => None,
    })
}

/// Filename with its `.nc` extension removed.
fn file_stem(file_name: &str) -> &str {
    file_name.strip_suffix(".nc").unwrap_or(file_name)
}

/// Underscore-separated field of a filename.
pub fn filename_field(file_name: &str, index: usize) -> Option<&str> {
    file_stem(file_name)
        .split('_')
        .nth(index)
        .filter(|field| !field.is_empty())
}

/// Last underscore-separated field of a filename.
pub fn last_filename_field(file_name: &str) -> Option<&str> {
    file_stem(file_name)
        .rsplit('_')
        .next()
        .filter(|field| !field.is_empty())
}

/// Variable name, member count and member tokens for one coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableResolution {
    pub name: String,
    pub member_count: Option<usize>,
    pub members: Vec<String>,
}

/// Extracts row fields for one coordinate.
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor<'a> {
    coordinate: &'a Coordinate,
    base_depth: usize,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(coordinate: &'a Coordinate) -> Self {
        let base_depth = path_segments(coordinate.base_location()).count();
        Self {
            coordinate,
            base_depth,
        }
    }

    /// Curated-archive path segment at a depth below the base location.
    fn archive_segment<'p>(&self, path: &'p str, depth: usize) -> Option<&'p str> {
        path_segments(path).nth(self.base_depth + depth)
    }

    /// Member token (`r1i1p1f1`, `s1960-r1i1p1f1`) of a matched path.
    pub fn member_token<'p>(&self, path: &'p str) -> Option<&'p str> {
        match self.coordinate.backend() {
            Backend::Archive => self.archive_segment(path, archive_depth::MEMBER),
            Backend::Workspace => segment_from_end(path, 0)
                .and_then(|name| filename_field(name, workspace_field::MEMBER)),
        }
    }

    /// Parsed member keys of a match set, skipping unparsable tokens.
    pub fn member_keys<'p>(&self, set: &'p MatchSet) -> Vec<(&'p str, EnsembleMemberKey)> {
        set.iter()
            .filter_map(|path| {
                let Some(token) = self.member_token(path) else {
                    warn!(path = %path, "No member token in path");
                    return None;
                };
                match EnsembleMemberKey::parse(token) {
                    Ok(key) => Some((token, key)),
                    Err(e) => {
                        warn!(path = %path, error = %e, "Skipping unparsable member token");
                        None
                    }
                }
            })
            .collect()
    }

    /// Institution of the model.
    ///
    /// The workspace mirror does not record institutions and always reports
    /// [`INSTITUTION_PLACEHOLDER`].
    pub fn institution(&self, resolved: &Resolved) -> Option<String> {
        match self.coordinate.backend() {
            Backend::Workspace => Some(INSTITUTION_PLACEHOLDER.to_string()),
            Backend::Archive => resolved
                .matches()?
                .first()
                .and_then(|path| self.archive_segment(path, archive_depth::INSTITUTION))
                .map(str::to_string),
        }
    }

    /// Number of distinct values of one member component.
    ///
    /// Counts distinct single-component values, not distinct members: members
    /// `r1i1p1f1` and `r1i2p1f1` give a run count of 1.
    pub fn component_count(&self, resolved: &Resolved, component: MemberComponent) -> Option<usize> {
        let set = resolved.matches()?;
        let keys = self.member_keys(set);
        if keys.is_empty() {
            return None;
        }

        let values: BTreeSet<u32> = keys.iter().map(|(_, key)| key.component(component)).collect();
        Some(values.len())
    }

    /// Total ensemble members.
    ///
    /// Matched member directories on the curated archive; distinct member
    /// keys among matched files on the workspace mirror.
    pub fn total_members(&self, resolved: &Resolved) -> Option<usize> {
        let set = resolved.matches()?;
        Some(match self.coordinate.backend() {
            Backend::Archive => set.len(),
            Backend::Workspace => self.distinct_members(set).len(),
        })
    }

    /// Distinct member tokens in match order, deduplicated on the parsed key.
    fn distinct_members(&self, set: &MatchSet) -> Vec<String> {
        let mut seen = HashSet::new();
        self.member_keys(set)
            .into_iter()
            .filter(|(_, key)| seen.insert(*key))
            .map(|(token, _)| token.to_string())
            .collect()
    }

    /// Resolve the requested variable.
    ///
    /// Without matches the requested name comes back unchanged with a count of
    /// zero; a store fault leaves the count unavailable.
    pub fn variable(&self, resolved: &Resolved) -> VariableResolution {
        let requested = self.coordinate.variable().to_string();

        let Some(set) = resolved.matches() else {
            return VariableResolution {
                name: requested,
                member_count: None,
                members: Vec::new(),
            };
        };

        let Some(first) = set.first() else {
            return VariableResolution {
                name: requested,
                member_count: Some(0),
                members: Vec::new(),
            };
        };

        match self.coordinate.backend() {
            Backend::Archive => {
                let name = self
                    .archive_segment(first, archive_depth::VARIABLE)
                    .unwrap_or(requested.as_str())
                    .to_string();
                let members: Vec<String> = set
                    .iter()
                    .filter_map(|path| self.member_token(path))
                    .map(str::to_string)
                    .collect();
                VariableResolution {
                    name,
                    member_count: Some(set.len()),
                    members,
                }
            }
            Backend::Workspace => {
                let name = segment_from_end(first, 0)
                    .and_then(|file| filename_field(file, workspace_field::VARIABLE))
                    .unwrap_or(requested.as_str())
                    .to_string();
                let members = self.distinct_members(set);
                VariableResolution {
                    name,
                    member_count: Some(members.len()),
                    members,
                }
            }
        }
    }

    /// Resolve the table id.
    ///
    /// Fails with a layout violation when curated-archive members disagree on
    /// the table directory.
    pub fn table_id(&self, resolved: &Resolved) -> CatalogueResult<String> {
        let requested = self.coordinate.table_id();

        let Some(set) = resolved.matches() else {
            return Ok(format!("{}{}", requested, UNAVAILABLE_SUFFIX));
        };
        if set.is_empty() {
            return Ok(format!("{}{}", requested, NOT_AVAILABLE_SUFFIX));
        }

        match self.coordinate.backend() {
            Backend::Archive => Ok(check_table_id(set.paths())?
                .unwrap_or_else(|| format!("{}{}", requested, NOT_AVAILABLE_SUFFIX))),
            Backend::Workspace => Ok(requested.to_string()),
        }
    }

    /// Names of the matched files.
    pub fn file_names(&self, resolved: &Resolved) -> Vec<String> {
        resolved
            .matches()
            .map(|set| set.names().map(str::to_string).collect())
            .unwrap_or_default()
    }
}
