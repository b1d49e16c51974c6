//! Covered-years resolution.
//!
//! Hindcasts on the curated archive carry their start year in the member
//! directory name (`s1960-r1i1p1f1`). Everything else carries a date range
//! in the filename (`..._185001-201412.nc`) whose code width depends on the
//! table's temporal granularity.

use cmip_common::{Backend, ExperimentKind, Granularity, YearsRange};
use tracing::debug;

use crate::coordinate::Coordinate;
use crate::extract::{filename_field, last_filename_field, workspace_field, FieldExtractor};
use crate::resolver::Resolved;

/// Non-overlapping runs of exactly `width` ASCII digits, scanning left to right.
///
/// A position that does not start a full run is skipped one character at a
/// time, so `185001-201412` at width 4 yields `1850` and `2014`.
pub fn date_codes(token: &str, width: usize) -> Vec<&str> {
    let bytes = token.as_bytes();
    let mut codes = Vec::new();
    let mut i = 0;

    while width > 0 && i + width <= bytes.len() {
        if bytes[i..i + width].iter().all(u8::is_ascii_digit) {
            codes.push(&token[i..i + width]);
            i += width;
        } else {
            i += 1;
        }
    }

    codes
}

/// Start and end year of a date-range token; `None` unless exactly two codes are found.
pub fn year_span(token: &str, granularity: Granularity) -> Option<(u32, u32)> {
    let codes = date_codes(token, granularity.date_code_width());
    match codes.as_slice() {
        [start, end] => Some((year_of(start)?, year_of(end)?)),
        _ => None,
    }
}

fn year_of(code: &str) -> Option<u32> {
    code.get(..4)?.parse().ok()
}

/// Start year of a hindcast member token (`s1960-r1i1p1f1` -> 1960).
pub fn hindcast_start_year(token: &str) -> Option<u32> {
    let rest = token.strip_prefix('s')?;
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }
    rest[..end].parse().ok()
}

/// Resolves the years range of one coordinate.
pub struct YearRangeResolver<'a> {
    coordinate: &'a Coordinate,
}

impl<'a> YearRangeResolver<'a> {
    pub fn new(coordinate: &'a Coordinate) -> Self {
        Self { coordinate }
    }

    /// Resolve from the [`LookupPurpose::Years`](crate::pattern::LookupPurpose::Years) match set.
    pub fn resolve(&self, resolved: &Resolved) -> YearsRange {
        let Some(set) = resolved.matches() else {
            return YearsRange::Unavailable;
        };

        let years: Vec<u32> = match (
            self.coordinate.backend(),
            self.coordinate.experiment().kind(),
        ) {
            (Backend::Archive, ExperimentKind::Hindcast) => {
                if set.is_empty() {
                    return YearsRange::NoFiles;
                }
                let extractor = FieldExtractor::new(self.coordinate);
                set.iter()
                    .filter_map(|path| extractor.member_token(path))
                    .filter_map(hindcast_start_year)
                    .collect()
            }
            (Backend::Archive, ExperimentKind::Retrospective) => {
                if set.is_empty() {
                    return YearsRange::NoFiles;
                }
                let Some(granularity) = self.granularity() else {
                    return YearsRange::Unavailable;
                };
                self.file_years(set.names(), granularity, last_filename_field)
            }
            (Backend::Workspace, _) => {
                if set.is_empty() {
                    return YearsRange::NoFiles;
                }
                let Some(granularity) = self.granularity() else {
                    return YearsRange::Unavailable;
                };
                self.file_years(set.names(), granularity, |name| {
                    filename_field(name, workspace_field::DATE_RANGE)
                })
            }
        };

        YearsRange::from_years(years).unwrap_or(YearsRange::Unavailable)
    }

    fn granularity(&self) -> Option<Granularity> {
        let granularity = Granularity::of_table(self.coordinate.table_id());
        if granularity.is_none() {
            debug!(table_id = %self.coordinate.table_id(), "Table has no known granularity");
        }
        granularity
    }

    /// Start and end years of every file whose date range yields exactly two codes.
    fn file_years<'n, I, F>(&self, names: I, granularity: Granularity, date_range: F) -> Vec<u32>
    where
        I: Iterator<Item = &'n str>,
        F: Fn(&'n str) -> Option<&'n str>,
    {
        let mut years = Vec::new();
        for name in names {
            match date_range(name).and_then(|token| year_span(token, granularity)) {
                Some((start, end)) => {
                    years.push(start);
                    years.push(end);
                }
                None => debug!(file = %name, ?granularity, "Skipping file without a date range"),
            }
        }
        years
    }
}
