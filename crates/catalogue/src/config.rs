//! Catalogue configuration.
//!
//! Everything a build iterates over travels in one [`CatalogueConfig`];
//! there are no process-wide defaults for experiment or table id.

use serde::{Deserialize, Serialize};

use cmip_common::{
    Backend, BackendMarkers, CatalogueError, CatalogueResult, Column, Experiment, ExperimentKind,
};

/// Lists and switches driving one catalogue build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogueConfig {
    /// Base locations, visited in order
    pub base_locations: Vec<String>,

    /// Model (source) identifiers
    pub models: Vec<String>,

    /// Variable identifiers
    pub variables: Vec<String>,

    /// Experiment identifiers
    pub experiments: Vec<String>,

    /// Table identifiers (`Amon`, `day`, `6hr`, ...)
    pub table_ids: Vec<String>,

    /// Output columns in order; all columns when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    /// Substrings identifying each backend
    #[serde(default)]
    pub backend_markers: BackendMarkers,

    /// Memoise store queries keyed on the literal pattern
    #[serde(default)]
    pub cache_patterns: bool,
}

impl CatalogueConfig {
    /// Configuration of the JASMIN deployment: the curated BADC archive and
    /// the CANARI group workspace mirror.
    pub fn jasmin_defaults() -> Self {
        Self {
            base_locations: strings(&[
                "/badc/cmip6/data/CMIP6/CMIP",
                "/badc/cmip6/data/CMIP6/DCPP",
                "/gws/nopw/j04/canari/users/benhutch/",
            ]),
            models: strings(&[
                "BCC-CSM2-MR",
                "MPI-ESM1-2-HR",
                "CanESM5",
                "CMCC-CM2-SR5",
                "HadGEM3-GC31-MM",
                "EC-Earth3",
                "MPI-ESM1-2-LR",
                "FGOALS-f3-L",
                "MIROC6",
                "IPSL-CM6A-LR",
                "CESM1-1-CAM5-CMIP5",
                "NorCPM1",
            ]),
            variables: strings(&["psl", "tas", "tos", "rsds", "sfcWind"]),
            experiments: strings(&["historical", "dcppA-hindcast"]),
            table_ids: strings(&["Amon", "day", "6hr"]),
            columns: None,
            backend_markers: BackendMarkers::default(),
            cache_patterns: false,
        }
    }

    /// Check the configuration before any store query.
    pub fn validate(&self) -> CatalogueResult<()> {
        ensure_non_empty("base_locations", &self.base_locations)?;
        ensure_non_empty("models", &self.models)?;
        ensure_non_empty("variables", &self.variables)?;
        ensure_non_empty("experiments", &self.experiments)?;
        ensure_non_empty("table_ids", &self.table_ids)?;

        if self.backend_markers.archive.is_empty() || self.backend_markers.workspace.is_empty() {
            return Err(CatalogueError::InvalidConfig(
                "backend markers must not be empty".to_string(),
            ));
        }

        self.parsed_experiments()?;
        self.columns()?;

        for base in &self.base_locations {
            if Backend::detect(base, &self.backend_markers)? == Backend::Archive {
                ExperimentKind::from_base_location(base)?;
            }
        }

        Ok(())
    }

    /// Configured experiments with their kinds, in configured order.
    pub fn parsed_experiments(&self) -> CatalogueResult<Vec<Experiment>> {
        self.experiments
            .iter()
            .map(|name| Experiment::parse(name))
            .collect()
    }

    /// Selected output columns, in output order.
    pub fn columns(&self) -> CatalogueResult<Vec<Column>> {
        match &self.columns {
            None => Ok(Column::ALL.to_vec()),
            Some(names) if names.is_empty() => Err(CatalogueError::InvalidConfig(
                "columns must name at least one column when present".to_string(),
            )),
            Some(names) => names.iter().map(|name| Column::from_name(name)).collect(),
        }
    }

    /// Replace the model list when `models` is non-empty.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        if !models.is_empty() {
            self.models = models;
        }
        self
    }

    /// Replace the variable list when `variables` is non-empty.
    pub fn with_variables(mut self, variables: Vec<String>) -> Self {
        if !variables.is_empty() {
            self.variables = variables;
        }
        self
    }
}

impl Default for CatalogueConfig {
    fn default() -> Self {
        Self::jasmin_defaults()
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn ensure_non_empty(field: &str, values: &[String]) -> CatalogueResult<()> {
    if values.is_empty() {
        return Err(CatalogueError::InvalidConfig(format!(
            "{} must not be empty",
            field
        )));
    }
    if values.iter().any(|v| v.trim().is_empty()) {
        return Err(CatalogueError::InvalidConfig(format!(
            "{} must not contain blank entries",
            field
        )));
    }
    Ok(())
}
