//! Synthetic archive layouts.
//!
//! Generators return `(path, size)` entries that can seed an in-memory store
//! directly or be written to disk with [`materialize`].

use std::fs;
use std::io;
use std::path::Path;

/// A generated file: absolute archive path and size in bytes.
pub type FileEntry = (String, u64);

/// Files of one model/experiment/table/variable on the curated archive.
///
/// Layout:
/// `<base>/<institution>/<model>/<experiment>/<member>/<table>/<variable>/<grid>/files/<version>/<file>.nc`
#[derive(Debug, Clone)]
pub struct ArchiveTree {
    base: String,
    institution: String,
    model: String,
    experiment: String,
    table: String,
    variable: String,
    grid: String,
    version: String,
    members: Vec<String>,
    date_ranges: Vec<String>,
    size: u64,
}

impl ArchiveTree {
    /// Tree with one `r1i1p1f1` member holding a monthly `psl` file.
    pub fn new(base: &str, institution: &str, model: &str, experiment: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            institution: institution.to_string(),
            model: model.to_string(),
            experiment: experiment.to_string(),
            table: "Amon".to_string(),
            variable: "psl".to_string(),
            grid: "gn".to_string(),
            version: "d20190914".to_string(),
            members: vec!["r1i1p1f1".to_string()],
            date_ranges: vec![crate::fixtures::date_ranges::MONTHLY.to_string()],
            size: 1024,
        }
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    pub fn variable(mut self, variable: &str) -> Self {
        self.variable = variable.to_string();
        self
    }

    pub fn members(mut self, members: &[&str]) -> Self {
        self.members = members.iter().map(|m| m.to_string()).collect();
        self
    }

    /// One file per member per date range.
    pub fn date_ranges(mut self, ranges: &[&str]) -> Self {
        self.date_ranges = ranges.iter().map(|r| r.to_string()).collect();
        self
    }

    /// Size of every generated file; `0` produces empty files.
    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Directory of one member, without the table.
    pub fn member_dir(&self, member: &str) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.base, self.institution, self.model, self.experiment, member
        )
    }

    pub fn files(&self) -> Vec<FileEntry> {
        let mut entries = Vec::new();
        for member in &self.members {
            let dir = format!(
                "{}/{}/{}/{}/files/{}",
                self.member_dir(member),
                self.table,
                self.variable,
                self.grid,
                self.version
            );
            for range in &self.date_ranges {
                let name = format!(
                    "{}_{}_{}_{}_{}_{}_{}.nc",
                    self.variable, self.table, self.model, self.experiment, member, self.grid, range
                );
                entries.push((format!("{}/{}", dir, name), self.size));
            }
        }
        entries
    }
}

/// Files of one model/experiment/table/variable on the workspace mirror.
///
/// Layout: `<base>/<experiment>/data/<variable>/<model>/<variable>_<table>_<model>_<experiment>_<member>_<grid>_<dates>.nc`
#[derive(Debug, Clone)]
pub struct WorkspaceTree {
    base: String,
    model: String,
    experiment: String,
    table: String,
    variable: String,
    grid: String,
    members: Vec<String>,
    date_ranges: Vec<String>,
    size: u64,
}

impl WorkspaceTree {
    /// Tree with one `r1i1p1f1` member holding a monthly `psl` file.
    pub fn new(base: &str, model: &str, experiment: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            experiment: experiment.to_string(),
            table: "Amon".to_string(),
            variable: "psl".to_string(),
            grid: "gn".to_string(),
            members: vec!["r1i1p1f1".to_string()],
            date_ranges: vec![crate::fixtures::date_ranges::MONTHLY.to_string()],
            size: 1024,
        }
    }

    pub fn table(mut self, table: &str) -> Self {
        self.table = table.to_string();
        self
    }

    pub fn variable(mut self, variable: &str) -> Self {
        self.variable = variable.to_string();
        self
    }

    pub fn members(mut self, members: &[&str]) -> Self {
        self.members = members.iter().map(|m| m.to_string()).collect();
        self
    }

    pub fn date_ranges(mut self, ranges: &[&str]) -> Self {
        self.date_ranges = ranges.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn files(&self) -> Vec<FileEntry> {
        let dir = format!(
            "{}/{}/data/{}/{}",
            self.base, self.experiment, self.variable, self.model
        );
        let mut entries = Vec::new();
        for member in &self.members {
            for range in &self.date_ranges {
                let name = format!(
                    "{}_{}_{}_{}_{}_{}_{}.nc",
                    self.variable, self.table, self.model, self.experiment, member, self.grid, range
                );
                entries.push((format!("{}/{}", dir, name), self.size));
            }
        }
        entries
    }
}

/// Hindcast member tokens for every start year and run (`s1960-r1i1p1f1`, ...).
pub fn hindcast_members(start_years: &[u32], runs: u32) -> Vec<String> {
    let mut members = Vec::new();
    for year in start_years {
        for run in 1..=runs {
            members.push(format!("s{}-r{}i1p1f1", year, run));
        }
    }
    members
}

/// Write entries under `root`, filling each file with `size` zero bytes.
pub fn materialize(root: &Path, entries: &[FileEntry]) -> io::Result<()> {
    for (path, size) in entries {
        let target = root.join(path.trim_start_matches('/'));
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, vec![0u8; *size as usize])?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{bases, names};

    #[test]
    fn test_archive_tree_paths() {
        let files = ArchiveTree::new(bases::CMIP, names::NORCPM_INSTITUTION, names::NORCPM, names::HISTORICAL)
            .members(&["r1i1p1f1", "r2i1p1f1"])
            .files();
        assert_eq!(files.len(), 2);
        assert_eq!(
            files[0].0,
            "/badc/cmip6/data/CMIP6/CMIP/NCC/NorCPM1/historical/r1i1p1f1/Amon/psl/gn/files/d20190914/psl_Amon_NorCPM1_historical_r1i1p1f1_gn_185001-201412.nc"
        );
    }

    #[test]
    fn test_workspace_tree_paths() {
        let files = WorkspaceTree::new(bases::CANARI, names::CANESM, names::HISTORICAL)
            .date_ranges(&["185001-194912", "195001-201412"])
            .files();
        assert_eq!(files.len(), 2);
        assert!(files[1].0.ends_with("/historical/data/psl/CanESM5/psl_Amon_CanESM5_historical_r1i1p1f1_gn_195001-201412.nc"));
    }

    #[test]
    fn test_hindcast_members() {
        assert_eq!(
            hindcast_members(&[1960, 1961], 2),
            vec!["s1960-r1i1p1f1", "s1960-r2i1p1f1", "s1961-r1i1p1f1", "s1961-r2i1p1f1"]
        );
    }

    #[test]
    fn test_materialize() {
        let dir = crate::temp_test_dir();
        let files = ArchiveTree::new(bases::CMIP, "NCC", "NorCPM1", "historical")
            .size(0)
            .files();
        materialize(dir.path(), &files).unwrap();

        let on_disk = dir.path().join(files[0].0.trim_start_matches('/'));
        assert!(on_disk.is_file());
        assert_eq!(fs::metadata(on_disk).unwrap().len(), 0);
    }
}
