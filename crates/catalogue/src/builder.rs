//! Catalogue construction.
//!
//! Visits base location x table id x experiment x model x variable in
//! configured order and appends one [`CatalogueRow`] per tuple.

use std::collections::BTreeMap;

use cmip_common::{
    Backend, CatalogueError, CatalogueResult, CatalogueRow, Experiment, ExperimentKind,
    MemberComponent,
};
use tracing::{debug, error, info, warn};

use crate::config::CatalogueConfig;
use crate::consistency::{check_partial_availability, PartialAvailability};
use crate::coordinate::Coordinate;
use crate::extract::{FieldExtractor, INSTITUTION_PLACEHOLDER};
use crate::pattern::{LookupPurpose, PatternBuilder};
use crate::resolver::{DirectoryResolver, Resolved};
use crate::store::Store;
use crate::years::YearRangeResolver;

/// Table id written when members disagree on the table directory.
pub const LAYOUT_VIOLATION: &str = "layout violation";

/// Side-channel findings of a build; none of them alter row contents beyond
/// the documented sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Fewer members carry the variable than exist for the model/experiment.
    PartialAvailability(PartialAvailability),
    /// Members disagree on the table directory.
    LayoutViolation { coordinate: String, message: String },
    /// A store query faulted.
    StoreUnavailable {
        coordinate: String,
        pattern: String,
        reason: String,
    },
}

/// Result of one build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalogue {
    pub rows: Vec<CatalogueRow>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Catalogue {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One base location with its detected backend and hosted experiments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePlan {
    pub base_location: String,
    pub backend: Backend,
    pub experiments: Vec<Experiment>,
}

/// Detect backends and experiment families for every base location.
///
/// Any unrecognized value fails the whole plan.
pub fn plan(config: &CatalogueConfig) -> CatalogueResult<Vec<BasePlan>> {
    config.validate()?;
    let experiments = config.parsed_experiments()?;

    config
        .base_locations
        .iter()
        .map(|base| {
            let backend = Backend::detect(base, &config.backend_markers)?;
            let hosted: Vec<Experiment> = match backend {
                Backend::Archive => {
                    let kind = ExperimentKind::from_base_location(base)?;
                    experiments
                        .iter()
                        .filter(|e| e.kind() == kind)
                        .cloned()
                        .collect()
                }
                Backend::Workspace => experiments.clone(),
            };

            if hosted.is_empty() {
                warn!(base_location = %base, "No configured experiment is hosted by base location");
            }

            Ok(BasePlan {
                base_location: base.clone(),
                backend,
                experiments: hosted,
            })
        })
        .collect()
}

/// Builds a [`Catalogue`] from a configuration and a store.
pub struct CatalogueBuilder<'a> {
    config: &'a CatalogueConfig,
    store: &'a dyn Store,
}

impl<'a> CatalogueBuilder<'a> {
    pub fn new(config: &'a CatalogueConfig, store: &'a dyn Store) -> Self {
        Self { config, store }
    }

    /// Run the build.
    ///
    /// Configuration errors abort before the first store query; everything
    /// else resolves to sentinels and diagnostics.
    pub fn build(&self) -> CatalogueResult<Catalogue> {
        let plan = plan(self.config)?;
        let resolver = DirectoryResolver::new(self.store);
        let mut catalogue = Catalogue::default();

        info!(
            base_locations = plan.len(),
            models = self.config.models.len(),
            variables = self.config.variables.len(),
            table_ids = self.config.table_ids.len(),
            "Starting catalogue build"
        );

        for base in &plan {
            for table_id in &self.config.table_ids {
                for experiment in &base.experiments {
                    for model in &self.config.models {
                        for variable in &self.config.variables {
                            let coordinate = Coordinate::new(
                                base.backend,
                                &base.base_location,
                                experiment.clone(),
                                model,
                                table_id,
                                variable,
                            );
                            let row =
                                build_row(&resolver, &coordinate, &mut catalogue.diagnostics);
                            catalogue.rows.push(row);
                        }
                    }
                }
            }
        }

        info!(
            rows = catalogue.rows.len(),
            diagnostics = catalogue.diagnostics.len(),
            "Catalogue build complete"
        );

        Ok(catalogue)
    }
}

/// Per-row pattern results; purposes sharing a pattern query the store once.
struct RowLookups<'r, 's> {
    resolver: &'r DirectoryResolver<'s>,
    patterns: PatternBuilder<'r>,
    results: BTreeMap<String, Resolved>,
}

impl<'r, 's> RowLookups<'r, 's> {
    fn new(resolver: &'r DirectoryResolver<'s>, coordinate: &'r Coordinate) -> Self {
        Self {
            resolver,
            patterns: PatternBuilder::new(coordinate),
            results: BTreeMap::new(),
        }
    }

    fn get(&mut self, purpose: LookupPurpose) -> Resolved {
        let pattern = self.patterns.pattern(purpose);
        let resolver = self.resolver;
        self.results
            .entry(pattern)
            .or_insert_with_key(|pattern| resolver.resolve(pattern))
            .clone()
    }

    fn faults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.values().filter_map(|resolved| match resolved {
            Resolved::Unavailable { pattern, reason } => Some((pattern.as_str(), reason.as_str())),
            Resolved::Matches(_) => None,
        })
    }
}

fn build_row(
    resolver: &DirectoryResolver<'_>,
    coordinate: &Coordinate,
    diagnostics: &mut Vec<Diagnostic>,
) -> CatalogueRow {
    let extractor = FieldExtractor::new(coordinate);
    let mut lookups = RowLookups::new(resolver, coordinate);

    // The workspace mirror records no institution; nothing to query there
    let institution = match coordinate.backend() {
        Backend::Archive => extractor.institution(&lookups.get(LookupPurpose::Institution)),
        Backend::Workspace => Some(INSTITUTION_PLACEHOLDER.to_string()),
    };

    let members = lookups.get(LookupPurpose::Members);
    let [run_count, init_count, physics_count, forcing_count] =
        MemberComponent::ALL.map(|component| extractor.component_count(&members, component));
    let total_members = extractor.total_members(&members);

    let table_id = match extractor.table_id(&lookups.get(LookupPurpose::TableId)) {
        Ok(table_id) => table_id,
        Err(err @ CatalogueError::LayoutViolation { .. }) => {
            error!(coordinate = %coordinate, error = %err, "Archive layout violation");
            diagnostics.push(Diagnostic::LayoutViolation {
                coordinate: coordinate.to_string(),
                message: err.to_string(),
            });
            LAYOUT_VIOLATION.to_string()
        }
        Err(err) => {
            warn!(coordinate = %coordinate, error = %err, "Table id lookup failed");
            format!("{} {}", coordinate.table_id(), cmip_common::UNAVAILABLE)
        }
    };

    let variable = extractor.variable(&lookups.get(LookupPurpose::Variable));
    if let (Some(all), Some(with_variable)) = (total_members, variable.member_count) {
        if let Some(partial) = check_partial_availability(coordinate, all, with_variable) {
            diagnostics.push(Diagnostic::PartialAvailability(partial));
        }
    }

    let files = lookups.get(LookupPurpose::Files);
    let file_name_list = extractor.file_names(&files);
    let empty_file_count = resolver.count_empty_files(&files);

    let years_range = YearRangeResolver::new(coordinate).resolve(&lookups.get(LookupPurpose::Years));

    for (pattern, reason) in lookups.faults() {
        diagnostics.push(Diagnostic::StoreUnavailable {
            coordinate: coordinate.to_string(),
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        });
    }

    debug!(
        coordinate = %coordinate,
        total_members = ?total_members,
        files = file_name_list.len(),
        years = %years_range,
        "Built catalogue row"
    );

    CatalogueRow {
        data_source: coordinate.backend().data_source().to_string(),
        institution,
        source: coordinate.model().to_string(),
        experiment: coordinate.experiment().name().to_string(),
        table_id,
        run_count,
        init_count,
        physics_count,
        forcing_count,
        total_members,
        member_count_for_variable: variable.member_count,
        member_key_list: variable.members,
        resolved_variable_name: variable.name,
        model: coordinate.model().to_string(),
        file_name_list,
        years_range,
        empty_file_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use cmip_common::YearsRange;

    const CMIP: &str = "/badc/cmip6/data/CMIP6/CMIP";
    const DCPP: &str = "/badc/cmip6/data/CMIP6/DCPP";
    const CANARI: &str = "/gws/nopw/j04/canari/users/benhutch/";

    fn config(bases: &[&str], experiments: &[&str]) -> CatalogueConfig {
        CatalogueConfig {
            base_locations: bases.iter().map(|s| s.to_string()).collect(),
            models: vec!["NorCPM1".into()],
            variables: vec!["psl".into()],
            experiments: experiments.iter().map(|s| s.to_string()).collect(),
            table_ids: vec!["Amon".into()],
            ..CatalogueConfig::jasmin_defaults()
        }
    }

    fn archive_file(member: &str, size: u64) -> (String, u64) {
        (
            format!(
                "{}/NCC/NorCPM1/historical/{}/Amon/psl/gn/files/d20190914/psl_Amon_NorCPM1_historical_{}_gn_185001-201412.nc",
                CMIP, member, member
            ),
            size,
        )
    }

    #[test]
    fn test_plan_dispatches_experiment_families() {
        let plan = plan(&config(&[CMIP, DCPP, CANARI], &["historical", "dcppA-hindcast"])).unwrap();
        assert_eq!(plan.len(), 3);
        assert_eq!(plan[0].backend, Backend::Archive);
        assert_eq!(plan[0].experiments[0].name(), "historical");
        assert_eq!(plan[0].experiments.len(), 1);
        assert_eq!(plan[1].experiments[0].name(), "dcppA-hindcast");
        assert_eq!(plan[2].backend, Backend::Workspace);
        assert_eq!(plan[2].experiments.len(), 2);
    }

    #[test]
    fn test_unrecognized_configuration_aborts() {
        let store = MemoryStore::new();
        let cfg = config(&["/data/cmip6"], &["historical"]);
        let err = CatalogueBuilder::new(&cfg, &store).build().unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_archive_row() {
        let store = MemoryStore::from_files([
            archive_file("r1i1p1f1", 1024),
            archive_file("r2i1p1f1", 0),
            archive_file("r3i1p1f1", 2048),
        ]);
        let cfg = config(&[CMIP], &["historical"]);
        let catalogue = CatalogueBuilder::new(&cfg, &store).build().unwrap();

        assert_eq!(catalogue.len(), 1);
        let row = &catalogue.rows[0];
        assert_eq!(row.data_source, "badc");
        assert_eq!(row.institution.as_deref(), Some("NCC"));
        assert_eq!(row.table_id, "Amon");
        assert_eq!(row.run_count, Some(3));
        assert_eq!(row.init_count, Some(1));
        assert_eq!(row.total_members, Some(3));
        assert_eq!(row.member_count_for_variable, Some(3));
        assert_eq!(row.member_key_list, vec!["r1i1p1f1", "r2i1p1f1", "r3i1p1f1"]);
        assert_eq!(row.file_name_list.len(), 3);
        assert_eq!(row.years_range, YearsRange::Span { min: 1850, max: 2014 });
        assert_eq!(row.empty_file_count, Some(1));
        assert!(catalogue.diagnostics.is_empty());
    }

    #[test]
    fn test_partial_availability_diagnostic() {
        let mut store = MemoryStore::from_files([archive_file("r1i1p1f1", 10)]);
        store.insert_dir(&format!("{}/NCC/NorCPM1/historical/r2i1p1f1/Amon", CMIP));
        let cfg = config(&[CMIP], &["historical"]);
        let catalogue = CatalogueBuilder::new(&cfg, &store).build().unwrap();

        assert_eq!(catalogue.rows[0].total_members, Some(2));
        assert_eq!(catalogue.rows[0].member_count_for_variable, Some(1));
        assert!(matches!(
            catalogue.diagnostics.as_slice(),
            [Diagnostic::PartialAvailability(PartialAvailability {
                members: 2,
                members_with_variable: 1,
                ..
            })]
        ));
    }

    /// Reports an extra member under a different table for table-id queries.
    struct MisfiledStore(MemoryStore);

    impl Store for MisfiledStore {
        fn query(&self, pattern: &str) -> Result<Vec<String>, crate::store::StoreError> {
            let mut paths = self.0.query(pattern)?;
            if pattern.ends_with("/Amon") && !paths.is_empty() {
                paths.push(format!("{}/NCC/NorCPM1/historical/r9i1p1f1/day", CMIP));
            }
            Ok(paths)
        }

        fn file_size(&self, path: &str) -> Result<u64, crate::store::StoreError> {
            self.0.file_size(path)
        }
    }

    #[test]
    fn test_layout_violation_is_contained() {
        let store = MisfiledStore(MemoryStore::from_files([archive_file("r1i1p1f1", 10)]));
        let mut cfg = config(&[CMIP], &["historical"]);
        cfg.variables = vec!["psl".into(), "tas".into()];
        let catalogue = CatalogueBuilder::new(&cfg, &store).build().unwrap();

        assert_eq!(catalogue.len(), 2);
        assert_eq!(catalogue.rows[0].table_id, LAYOUT_VIOLATION);
        assert_eq!(catalogue.rows[0].member_count_for_variable, Some(1));
        assert_eq!(catalogue.rows[0].years_range, YearsRange::Span { min: 1850, max: 2014 });
        assert_eq!(
            catalogue
                .diagnostics
                .iter()
                .filter(|d| matches!(d, Diagnostic::LayoutViolation { .. }))
                .count(),
            2
        );
    }

    /// Faults every query for a model directory.
    struct ModelDirFaultStore(MemoryStore);

    impl Store for ModelDirFaultStore {
        fn query(&self, pattern: &str) -> Result<Vec<String>, crate::store::StoreError> {
            if pattern.ends_with("/NorCPM1") {
                return Err(crate::store::StoreError::PermissionDenied(pattern.to_string()));
            }
            self.0.query(pattern)
        }

        fn file_size(&self, path: &str) -> Result<u64, crate::store::StoreError> {
            self.0.file_size(path)
        }
    }

    #[test]
    fn test_workspace_row_skips_institution_lookup() {
        let store = ModelDirFaultStore(MemoryStore::from_files([(
            format!(
                "{}historical/data/psl/NorCPM1/psl_Amon_NorCPM1_historical_r1i1p1f1_gn_185001-201412.nc",
                CANARI
            ),
            10,
        )]));
        let catalogue = CatalogueBuilder::new(&config(&[CANARI], &["historical"]), &store)
            .build()
            .unwrap();

        assert_eq!(catalogue.rows[0].institution.as_deref(), Some("unknown"));
        assert_eq!(catalogue.rows[0].total_members, Some(1));
        assert!(catalogue
            .diagnostics
            .iter()
            .all(|d| !matches!(d, Diagnostic::StoreUnavailable { .. })));
    }

    #[test]
    fn test_store_fault_rows_use_sentinels() {
        let mut store = MemoryStore::from_files([archive_file("r1i1p1f1", 10)]);
        store.deny(CMIP);
        let cfg = config(&[CMIP], &["historical"]);
        let catalogue = CatalogueBuilder::new(&cfg, &store).build().unwrap();

        let row = &catalogue.rows[0];
        assert_eq!(row.institution, None);
        assert_eq!(row.run_count, None);
        assert_eq!(row.total_members, None);
        assert_eq!(row.table_id, "Amon unavailable");
        assert_eq!(row.years_range, YearsRange::Unavailable);
        assert!(row.file_name_list.is_empty());
        assert!(catalogue
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::StoreUnavailable { .. })));
    }

    #[test]
    fn test_iteration_order() {
        let mut cfg = config(&[CMIP], &["historical"]);
        cfg.models = vec!["B".into(), "A".into()];
        cfg.variables = vec!["tas".into(), "psl".into()];
        cfg.table_ids = vec!["day".into(), "Amon".into()];
        let store = MemoryStore::new();
        let catalogue = CatalogueBuilder::new(&cfg, &store).build().unwrap();

        let order: Vec<(String, String, String)> = catalogue
            .rows
            .iter()
            .map(|r| {
                (
                    r.table_id.replace(" not available", ""),
                    r.model.clone(),
                    r.resolved_variable_name.clone(),
                )
            })
            .collect();
        assert_eq!(
            order,
            vec![
                ("day".into(), "B".into(), "tas".into()),
                ("day".into(), "B".into(), "psl".into()),
                ("day".into(), "A".into(), "tas".into()),
                ("day".into(), "A".into(), "psl".into()),
                ("Amon".into(), "B".into(), "tas".into()),
                ("Amon".into(), "B".into(), "psl".into()),
                ("Amon".into(), "A".into(), "tas".into()),
                ("Amon".into(), "A".into(), "psl".into()),
            ]
        );
    }
}
