//! Common test fixtures for catalogue tests.
//!
//! Names mirror the JASMIN deployment so that generated trees look like the
//! real archive.

/// Base locations.
pub mod bases {
    /// Curated archive, retrospective experiments
    pub const CMIP: &str = "/badc/cmip6/data/CMIP6/CMIP";

    /// Curated archive, decadal hindcasts
    pub const DCPP: &str = "/badc/cmip6/data/CMIP6/DCPP";

    /// Group workspace mirror
    pub const CANARI: &str = "/gws/nopw/j04/canari/users/benhutch";

    /// Matches neither backend
    pub const UNKNOWN: &str = "/home/user/cmip6";
}

/// Model, institution and experiment names.
pub mod names {
    pub const NORCPM: &str = "NorCPM1";
    pub const NORCPM_INSTITUTION: &str = "NCC";
    pub const CANESM: &str = "CanESM5";
    pub const CANESM_INSTITUTION: &str = "CCCma";
    pub const HISTORICAL: &str = "historical";
    pub const HINDCAST: &str = "dcppA-hindcast";
}

/// Date-range tokens by table granularity.
pub mod date_ranges {
    /// Monthly, 4-digit codes after truncation: 1850-2014
    pub const MONTHLY: &str = "185001-201412";

    /// Daily, 8-digit codes: 1975-1999
    pub const DAILY: &str = "19750101-19991231";

    /// Sub-daily, 12-digit codes: 1850-2014
    pub const SUB_DAILY: &str = "185001010000-201412312100";
}
