//! Cross-checks between match sets of one coordinate.

use cmip_common::{CatalogueError, CatalogueResult};
use tracing::warn;

use crate::coordinate::Coordinate;
use crate::resolver::segment_from_end;

/// Fewer members carry the variable than exist for the model/experiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartialAvailability {
    pub coordinate: String,
    pub members: usize,
    pub members_with_variable: usize,
}

/// Check that every matched path ends in the same table id.
///
/// Returns `Ok(None)` for an empty set and the shared table id otherwise.
pub fn check_table_id<S: AsRef<str>>(paths: &[S]) -> CatalogueResult<Option<String>> {
    let Some(first) = paths.first() else {
        return Ok(None);
    };
    let expected = segment_from_end(first.as_ref(), 0).unwrap_or_default();

    for path in paths {
        let path = path.as_ref();
        let found = segment_from_end(path, 0).unwrap_or_default();
        if found != expected {
            return Err(CatalogueError::LayoutViolation {
                expected: expected.to_string(),
                found: found.to_string(),
                path: path.to_string(),
            });
        }
    }

    Ok(Some(expected.to_string()))
}

/// Compare the member count with the count of members carrying the variable.
///
/// Logs and returns a diagnostic when they differ; the row itself is unaffected.
pub fn check_partial_availability(
    coordinate: &Coordinate,
    members: usize,
    members_with_variable: usize,
) -> Option<PartialAvailability> {
    if members == members_with_variable {
        return None;
    }

    warn!(
        coordinate = %coordinate,
        members,
        members_with_variable,
        "Not all runs are available for the variable"
    );

    Some(PartialAvailability {
        coordinate: coordinate.to_string(),
        members,
        members_with_variable,
    })
}
