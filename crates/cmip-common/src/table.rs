//! Table identifiers and their temporal granularity.

use serde::{Deserialize, Serialize};

/// Temporal sampling of a CMIP table (`Amon`, `day`, `6hrPlev`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    Monthly,
    Daily,
    SubDaily,
}

impl Granularity {
    /// Classify a table id.
    ///
    /// Returns `None` for tables without a time axis (`fx`) or unknown names.
    pub fn of_table(table_id: &str) -> Option<Self> {
        if table_id.ends_with("mon") {
            Some(Granularity::Monthly)
        } else if table_id.ends_with("day") {
            Some(Granularity::Daily)
        } else if table_id.contains("hr") {
            Some(Granularity::SubDaily)
        } else {
            None
        }
    }

    /// Digit width of one date code in a filename date range.
    ///
    /// Monthly codes are matched four digits at a time; daily (`YYYYMMDD`) and
    /// sub-daily (`YYYYMMDDhhmm`) codes are matched whole.
    pub fn date_code_width(&self) -> usize {
        match self {
            Granularity::Monthly => 4,
            Granularity::Daily => 8,
            Granularity::SubDaily => 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_granularity_of_table() {
        assert_eq!(Granularity::of_table("Amon"), Some(Granularity::Monthly));
        assert_eq!(Granularity::of_table("Omon"), Some(Granularity::Monthly));
        assert_eq!(Granularity::of_table("day"), Some(Granularity::Daily));
        assert_eq!(Granularity::of_table("CFday"), Some(Granularity::Daily));
        assert_eq!(Granularity::of_table("6hr"), Some(Granularity::SubDaily));
        assert_eq!(Granularity::of_table("6hrPlev"), Some(Granularity::SubDaily));
        assert_eq!(Granularity::of_table("fx"), None);
    }

    #[test]
    fn test_date_code_width() {
        assert_eq!(Granularity::Monthly.date_code_width(), 4);
        assert_eq!(Granularity::Daily.date_code_width(), 8);
        assert_eq!(Granularity::SubDaily.date_code_width(), 12);
    }
}
