//! Catalogue rows and output columns.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::{CatalogueError, CatalogueResult};
use crate::years::YearsRange;

/// Text written for a count that could not be computed.
pub const UNAVAILABLE: &str = "unavailable";

/// Separator used when a list cell is flattened to text.
pub const LIST_SEPARATOR: &str = ";";

/// One catalogue record per (base location, table id, experiment, model, variable).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogueRow {
    pub data_source: String,
    pub institution: Option<String>,
    pub source: String,
    pub experiment: String,
    pub table_id: String,
    pub run_count: Option<usize>,
    pub init_count: Option<usize>,
    pub physics_count: Option<usize>,
    pub forcing_count: Option<usize>,
    pub total_members: Option<usize>,
    pub member_count_for_variable: Option<usize>,
    pub member_key_list: Vec<String>,
    pub resolved_variable_name: String,
    pub model: String,
    pub file_name_list: Vec<String>,
    pub years_range: YearsRange,
    pub empty_file_count: Option<usize>,
}

impl CatalogueRow {
    /// Render one cell as text.
    pub fn text(&self, column: Column) -> String {
        match column {
            Column::DataSource => self.data_source.clone(),
            Column::Institution => optional_text(self.institution.as_deref()),
            Column::Source => self.source.clone(),
            Column::Experiment => self.experiment.clone(),
            Column::TableId => self.table_id.clone(),
            Column::Runs => count_text(self.run_count),
            Column::Inits => count_text(self.init_count),
            Column::Physics => count_text(self.physics_count),
            Column::Forcing => count_text(self.forcing_count),
            Column::TotalMembers => count_text(self.total_members),
            Column::MemberCount => count_text(self.member_count_for_variable),
            Column::MembersList => self.member_key_list.join(LIST_SEPARATOR),
            Column::Variable => self.resolved_variable_name.clone(),
            Column::Model => self.model.clone(),
            Column::FilesList => self.file_name_list.join(LIST_SEPARATOR),
            Column::YearsRange => self.years_range.to_string(),
            Column::EmptyFiles => count_text(self.empty_file_count),
        }
    }

    /// Render one cell as a JSON value; unavailable counts become `null`.
    pub fn value(&self, column: Column) -> Value {
        match column {
            Column::Institution => self
                .institution
                .as_ref()
                .map(|s| Value::String(s.clone()))
                .unwrap_or(Value::Null),
            Column::Runs => count_value(self.run_count),
            Column::Inits => count_value(self.init_count),
            Column::Physics => count_value(self.physics_count),
            Column::Forcing => count_value(self.forcing_count),
            Column::TotalMembers => count_value(self.total_members),
            Column::MemberCount => count_value(self.member_count_for_variable),
            Column::EmptyFiles => count_value(self.empty_file_count),
            Column::MembersList => string_list(&self.member_key_list),
            Column::FilesList => string_list(&self.file_name_list),
            other => Value::String(self.text(other)),
        }
    }
}

fn optional_text(value: Option<&str>) -> String {
    value.unwrap_or(UNAVAILABLE).to_string()
}

fn count_text(count: Option<usize>) -> String {
    count
        .map(|c| c.to_string())
        .unwrap_or_else(|| UNAVAILABLE.to_string())
}

fn count_value(count: Option<usize>) -> Value {
    count.map(Value::from).unwrap_or(Value::Null)
}

fn string_list(items: &[String]) -> Value {
    Value::Array(items.iter().cloned().map(Value::String).collect())
}

/// Output column of the catalogue table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Column {
    DataSource,
    Institution,
    Source,
    Experiment,
    TableId,
    Runs,
    Inits,
    Physics,
    Forcing,
    TotalMembers,
    MemberCount,
    MembersList,
    Variable,
    Model,
    FilesList,
    YearsRange,
    EmptyFiles,
}

impl Column {
    /// Every column in default output order.
    pub const ALL: [Column; 17] = [
        Column::DataSource,
        Column::Institution,
        Column::Source,
        Column::Experiment,
        Column::TableId,
        Column::Runs,
        Column::Inits,
        Column::Physics,
        Column::Forcing,
        Column::TotalMembers,
        Column::MemberCount,
        Column::MembersList,
        Column::Variable,
        Column::Model,
        Column::FilesList,
        Column::YearsRange,
        Column::EmptyFiles,
    ];

    /// Header name written to output.
    pub fn name(&self) -> &'static str {
        match self {
            Column::DataSource => "data_source",
            Column::Institution => "institution",
            Column::Source => "source",
            Column::Experiment => "experiment",
            Column::TableId => "table_id",
            Column::Runs => "runs",
            Column::Inits => "inits",
            Column::Physics => "physics",
            Column::Forcing => "forcing",
            Column::TotalMembers => "total ensemble members",
            Column::MemberCount => "no_members",
            Column::MembersList => "members_list",
            Column::Variable => "variable",
            Column::Model => "model",
            Column::FilesList => "files_list",
            Column::YearsRange => "years_range",
            Column::EmptyFiles => "empty_files",
        }
    }

    /// Parse a column name; also accepts the field names of [`CatalogueRow`].
    pub fn from_name(name: &str) -> CatalogueResult<Self> {
        let column = match name.trim() {
            "data_source" => Column::DataSource,
            "institution" => Column::Institution,
            "source" => Column::Source,
            "experiment" => Column::Experiment,
            "table_id" => Column::TableId,
            "runs" | "run_count" => Column::Runs,
            "inits" | "init_count" => Column::Inits,
            "physics" | "physics_count" => Column::Physics,
            "forcing" | "forcing_count" => Column::Forcing,
            "total ensemble members" | "total_members" => Column::TotalMembers,
            "no_members" | "member_count_for_variable" => Column::MemberCount,
            "members_list" | "member_key_list" => Column::MembersList,
            "variable" | "resolved_variable_name" => Column::Variable,
            "model" => Column::Model,
            "files_list" | "file_name_list" => Column::FilesList,
            "years_range" => Column::YearsRange,
            "empty_files" | "empty_file_count" => Column::EmptyFiles,
            other => return Err(CatalogueError::UnknownColumn(other.to_string())),
        };
        Ok(column)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<String> for Column {
    type Error = CatalogueError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Column::from_name(&value)
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        column.name().to_string()
    }
}
