//! Common types shared by the catalogue engine and its command-line front end.

pub mod backend;
pub mod error;
pub mod experiment;
pub mod member;
pub mod row;
pub mod table;
pub mod years;

pub use backend::{Backend, BackendMarkers};
pub use error::{CatalogueError, CatalogueResult};
pub use experiment::{Experiment, ExperimentKind};
pub use member::{EnsembleMemberKey, MemberComponent, MemberKeyParseError};
pub use row::{CatalogueRow, Column, LIST_SEPARATOR, UNAVAILABLE};
pub use table::Granularity;
pub use years::YearsRange;
