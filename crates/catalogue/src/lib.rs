//! CMIP6 availability catalogue engine.
//!
//! Given a configuration of base locations, models, variables, experiments
//! and table ids, builds one [`CatalogueRow`](cmip_common::CatalogueRow) per
//! combination by globbing a [`Store`] with backend-specific patterns and
//! extracting ensemble, year and file metadata from the matched paths.

pub mod builder;
pub mod config;
pub mod consistency;
pub mod coordinate;
pub mod extract;
pub mod output;
pub mod pattern;
pub mod resolver;
pub mod store;
pub mod years;

pub use builder::{plan, BasePlan, Catalogue, CatalogueBuilder, Diagnostic, LAYOUT_VIOLATION};
pub use config::CatalogueConfig;
pub use consistency::PartialAvailability;
pub use coordinate::Coordinate;
pub use extract::{FieldExtractor, VariableResolution};
pub use output::{write_catalogue, write_csv, write_json, OutputFormat};
pub use pattern::{LookupPurpose, PatternBuilder};
pub use resolver::{DirectoryResolver, MatchSet, Resolved};
pub use store::{CacheStats, CachingStore, GlobStore, MemoryStore, Store, StoreError};
pub use years::YearRangeResolver;
