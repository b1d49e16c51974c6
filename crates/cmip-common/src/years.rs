//! Covered time span of a catalogue row.

use serde::{Serialize, Serializer};
use std::fmt;

/// Years covered by the files (or hindcast start dates) of one coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearsRange {
    /// Inclusive span with `min <= max`.
    Span { min: u32, max: u32 },
    /// The match set used for year extraction was empty.
    NoFiles,
    /// The backend/experiment/table combination has no year rule, or the store faulted.
    Unavailable,
}

impl YearsRange {
    /// Build a span from an iterator of years; `None` when the iterator is empty.
    pub fn from_years<I: IntoIterator<Item = u32>>(years: I) -> Option<Self> {
        let mut bounds: Option<(u32, u32)> = None;
        for year in years {
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(year), max.max(year)),
                None => (year, year),
            });
        }
        bounds.map(|(min, max)| YearsRange::Span { min, max })
    }
}

impl fmt::Display for YearsRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearsRange::Span { min, max } => write!(f, "{:04}-{:04}", min, max),
            YearsRange::NoFiles => f.write_str("no files"),
            YearsRange::Unavailable => f.write_str("unavailable"),
        }
    }
}

impl Serialize for YearsRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_years() {
        let range = YearsRange::from_years([1980, 1960, 2010, 1975]).unwrap();
        assert_eq!(range, YearsRange::Span { min: 1960, max: 2010 });
        assert_eq!(range.to_string(), "1960-2010");
    }

    #[test]
    fn test_from_no_years() {
        assert_eq!(YearsRange::from_years(Vec::new()), None);
    }

    #[test]
    fn test_display_zero_padded() {
        let range = YearsRange::Span { min: 850, max: 1849 };
        assert_eq!(range.to_string(), "0850-1849");
        assert_eq!(YearsRange::NoFiles.to_string(), "no files");
        assert_eq!(YearsRange::Unavailable.to_string(), "unavailable");
    }

    #[test]
    fn test_serialize_as_string() {
        let json = serde_json::to_string(&YearsRange::Span { min: 1850, max: 2014 }).unwrap();
        assert_eq!(json, "\"1850-2014\"");
    }
}
