//! Experiment kinds and base-location families.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CatalogueError, CatalogueResult};

/// How an experiment lays out its ensemble members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentKind {
    /// Free-running retrospective simulation (`historical`).
    Retrospective,
    /// Decadal hindcast with one member directory per start year (`dcppA-hindcast`).
    Hindcast,
}

impl ExperimentKind {
    /// Ensemble-member wildcard used when globbing member directories or filenames.
    pub fn member_wildcard(&self) -> &'static str {
        match self {
            ExperimentKind::Retrospective => "r*i*p*f*",
            ExperimentKind::Hindcast => "s*-r*i*p*f*",
        }
    }

    /// Final path segment of a curated-archive base location hosting this kind.
    pub fn activity_suffix(&self) -> &'static str {
        match self {
            ExperimentKind::Retrospective => "CMIP",
            ExperimentKind::Hindcast => "DCPP",
        }
    }

    /// Resolve the kind hosted by a curated-archive base location from its final segment.
    pub fn from_base_location(base_location: &str) -> CatalogueResult<Self> {
        let suffix = base_location
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default();

        [ExperimentKind::Retrospective, ExperimentKind::Hindcast]
            .into_iter()
            .find(|kind| kind.activity_suffix() == suffix)
            .ok_or_else(|| CatalogueError::UnrecognizedBaseLocation {
                location: base_location.to_string(),
                reason: format!("unknown activity suffix '{}'", suffix),
            })
    }
}

/// A named experiment with its resolved kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Experiment {
    name: String,
    kind: ExperimentKind,
}

impl Experiment {
    /// Parse an experiment name.
    ///
    /// `historical` is retrospective and any `*-hindcast` name is a hindcast;
    /// everything else is a configuration error.
    pub fn parse(name: &str) -> CatalogueResult<Self> {
        let kind = if name == "historical" {
            ExperimentKind::Retrospective
        } else if name.ends_with("-hindcast") && name.len() > "-hindcast".len() {
            ExperimentKind::Hindcast
        } else {
            return Err(CatalogueError::UnrecognizedExperiment(name.to_string()));
        };

        Ok(Self {
            name: name.to_string(),
            kind,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ExperimentKind {
        self.kind
    }
}

impl fmt::Display for Experiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
