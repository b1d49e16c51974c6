//! Backend-specific search patterns.
//!
//! Curated archive layout:
//!
//! ```text
//! <base>/<institution>/<model>/<experiment>/<member>/<table>/<variable>/<grid>/files/<version>/<file>.nc
//! ```
//!
//! Workspace mirror layout:
//!
//! ```text
//! <base>/<experiment>/data/<variable>/<model>/<variable>_<table>_<model>_<experiment>_<member>_<grid>_<dates>.nc
//! ```
//!
//! Building a pattern performs no I/O and cannot fail.

use cmip_common::{Backend, ExperimentKind};

use crate::coordinate::Coordinate;

/// What a pattern is used to look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupPurpose {
    /// Model directory, whose parent names the institution.
    Institution,
    /// Every ensemble member of the model/experiment, independent of table and variable.
    Members,
    /// Members carrying the requested table.
    TableId,
    /// Members carrying the requested variable within the table.
    Variable,
    /// Data files of the requested variable.
    Files,
    /// Entries the covered years are read from.
    Years,
}

/// Builds search patterns for one coordinate.
#[derive(Debug, Clone)]
pub struct PatternBuilder<'a> {
    coordinate: &'a Coordinate,
    member_wildcard: &'a str,
}

impl<'a> PatternBuilder<'a> {
    /// Builder using the experiment's default member wildcard.
    pub fn new(coordinate: &'a Coordinate) -> Self {
        let member_wildcard = coordinate.experiment().kind().member_wildcard();
        Self::with_member_wildcard(coordinate, member_wildcard)
    }

    pub fn with_member_wildcard(coordinate: &'a Coordinate, member_wildcard: &'a str) -> Self {
        Self {
            coordinate,
            member_wildcard,
        }
    }

    /// Pattern for a lookup purpose.
    pub fn pattern(&self, purpose: LookupPurpose) -> String {
        match self.coordinate.backend() {
            Backend::Archive => self.archive_pattern(purpose),
            Backend::Workspace => self.workspace_pattern(purpose),
        }
    }

    fn archive_pattern(&self, purpose: LookupPurpose) -> String {
        let c = self.coordinate;
        let model_dir = format!("{}/*/{}", c.base_location(), c.model());
        let members = format!(
            "{}/{}/{}",
            model_dir,
            c.experiment().name(),
            self.member_wildcard
        );
        let table = format!("{}/{}", members, c.table_id());
        let variable = format!("{}/{}", table, c.variable());

        match purpose {
            LookupPurpose::Institution => model_dir,
            LookupPurpose::Members => members,
            LookupPurpose::TableId => table,
            LookupPurpose::Variable => variable,
            LookupPurpose::Files => format!("{}/*/files/*/*.nc", variable),
            LookupPurpose::Years => match c.experiment().kind() {
                ExperimentKind::Hindcast => variable,
                ExperimentKind::Retrospective => format!("{}/*/files/*/*.nc", variable),
            },
        }
    }

    fn workspace_pattern(&self, purpose: LookupPurpose) -> String {
        let c = self.coordinate;
        let experiment_dir = format!("{}/{}/data", c.base_location(), c.experiment().name());

        match purpose {
            LookupPurpose::Institution => format!("{}/*/{}", experiment_dir, c.model()),
            LookupPurpose::Members => format!(
                "{}/*/{}/*_*_{}_{}_{}_*.nc",
                experiment_dir,
                c.model(),
                c.model(),
                c.experiment().name(),
                self.member_wildcard
            ),
            LookupPurpose::TableId
            | LookupPurpose::Variable
            | LookupPurpose::Files
            | LookupPurpose::Years => format!(
                "{}/{}/{}/{}_{}_{}_{}_{}_*.nc",
                experiment_dir,
                c.variable(),
                c.model(),
                c.variable(),
                c.table_id(),
                c.model(),
                c.experiment().name(),
                self.member_wildcard
            ),
        }
    }
}
