//! Catalogue writers.

use std::io::Write;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use cmip_common::{CatalogueError, CatalogueResult, CatalogueRow, Column};

/// Serialisation format of a written catalogue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Header row plus one record per row; list cells joined with `;`.
    #[default]
    Csv,
    /// Array of objects keyed by column name.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CatalogueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(CatalogueError::InvalidConfig(format!(
                "unknown output format '{}'",
                other
            ))),
        }
    }
}

/// Write rows in the given format.
pub fn write_catalogue<W: Write>(
    writer: W,
    rows: &[CatalogueRow],
    columns: &[Column],
    format: OutputFormat,
) -> CatalogueResult<()> {
    match format {
        OutputFormat::Csv => write_csv(writer, rows, columns),
        OutputFormat::Json => write_json(writer, rows, columns),
    }
}

/// Write rows as CSV with a header of column names.
pub fn write_csv<W: Write>(writer: W, rows: &[CatalogueRow], columns: &[Column]) -> CatalogueResult<()> {
    let mut csv_writer = csv::WriterBuilder::new().from_writer(writer);

    csv_writer.write_record(columns.iter().map(Column::name))?;
    for row in rows {
        csv_writer.write_record(columns.iter().map(|column| row.text(*column)))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Write rows as a pretty-printed JSON array.
pub fn write_json<W: Write>(mut writer: W, rows: &[CatalogueRow], columns: &[Column]) -> CatalogueResult<()> {
    let records: Vec<Value> = rows
        .iter()
        .map(|row| {
            let record: Map<String, Value> = columns
                .iter()
                .map(|column| (column.name().to_string(), row.value(*column)))
                .collect();
            Value::Object(record)
        })
        .collect();

    serde_json::to_writer_pretty(&mut writer, &records)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmip_common::YearsRange;

    fn row() -> CatalogueRow {
        CatalogueRow {
            data_source: "badc".into(),
            institution: Some("NCC".into()),
            source: "NorCPM1".into(),
            experiment: "historical".into(),
            table_id: "Amon".into(),
            run_count: Some(2),
            init_count: Some(1),
            physics_count: Some(1),
            forcing_count: None,
            total_members: Some(2),
            member_count_for_variable: Some(2),
            member_key_list: vec!["r1i1p1f1".into(), "r2i1p1f1".into()],
            resolved_variable_name: "psl".into(),
            model: "NorCPM1".into(),
            file_name_list: vec!["a.nc".into(), "b.nc".into()],
            years_range: YearsRange::Span { min: 1850, max: 2014 },
            empty_file_count: Some(0),
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("parquet".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_csv_output() {
        let mut buf = Vec::new();
        let columns = [Column::Model, Column::Forcing, Column::MembersList, Column::YearsRange];
        write_csv(&mut buf, &[row()], &columns).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "model,forcing,members_list,years_range");
        assert_eq!(lines[1], "NorCPM1,unavailable,r1i1p1f1;r2i1p1f1,1850-2014");
    }

    #[test]
    fn test_csv_quotes_header_with_spaces_only_when_needed() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[], &[Column::TotalMembers]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "total ensemble members\n");
    }

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        let columns = [Column::Institution, Column::Forcing, Column::FilesList, Column::YearsRange];
        write_json(&mut buf, &[row()], &columns).unwrap();

        let parsed: Value = serde_json::from_slice(&buf).unwrap();
        let record = &parsed[0];
        assert_eq!(record["institution"], "NCC");
        assert!(record["forcing"].is_null());
        assert_eq!(record["files_list"], serde_json::json!(["a.nc", "b.nc"]));
        assert_eq!(record["years_range"], "1850-2014");
    }

    #[test]
    fn test_output_is_deterministic() {
        let rows = vec![row(), row()];
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_catalogue(&mut first, &rows, &Column::ALL, OutputFormat::Json).unwrap();
        write_catalogue(&mut second, &rows, &Column::ALL, OutputFormat::Json).unwrap();
        assert_eq!(first, second);
    }
}
