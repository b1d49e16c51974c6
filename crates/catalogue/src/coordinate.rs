//! Catalogue coordinates.

use cmip_common::{Backend, Experiment};
use std::fmt;

/// Identifies one catalogue row before any store lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    backend: Backend,
    base_location: String,
    experiment: Experiment,
    model: String,
    table_id: String,
    variable: String,
}

impl Coordinate {
    /// Create a coordinate; trailing `/` on the base location is dropped.
    pub fn new(
        backend: Backend,
        base_location: &str,
        experiment: Experiment,
        model: &str,
        table_id: &str,
        variable: &str,
    ) -> Self {
        Self {
            backend,
            base_location: base_location.trim_end_matches('/').to_string(),
            experiment,
            model: model.to_string(),
            table_id: table_id.to_string(),
            variable: variable.to_string(),
        }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub fn base_location(&self) -> &str {
        &self.base_location
    }

    pub fn experiment(&self) -> &Experiment {
        &self.experiment
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{}/{}/{}",
            self.backend, self.experiment, self.model, self.table_id, self.variable
        )
    }
}
