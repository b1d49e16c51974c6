//! Command-line tests for the cmip-catalogue binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use test_utils::{bases, materialize, names, rooted, temp_test_dir, ArchiveTree, WorkspaceTree};

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cmip-catalogue"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("CATALOGUE_CONFIG")
        .output()
        .expect("Failed to run cmip-catalogue")
}

fn write_config(dir: &Path, base_locations: &[String], extra: &str) -> String {
    let bases: Vec<String> = base_locations.iter().map(|b| format!("  - {}", b)).collect();
    let yaml = format!(
        "base_locations:\n{}\nmodels: [{}, {}]\nvariables: [psl]\nexperiments: [historical]\ntable_ids: [Amon]\n{}",
        bases.join("\n"),
        names::NORCPM,
        names::CANESM,
        extra
    );
    let path = dir.join("catalogue.yaml");
    fs::write(&path, yaml).unwrap();
    path.to_string_lossy().into_owned()
}

fn sample_archive(root: &Path) {
    let mut files = ArchiveTree::new(bases::CMIP, names::NORCPM_INSTITUTION, names::NORCPM, names::HISTORICAL)
        .members(&["r1i1p1f1", "r2i1p1f1"])
        .files();
    files.extend(
        WorkspaceTree::new(bases::CANARI, names::CANESM, names::HISTORICAL)
            .members(&["r1i1p1f1"])
            .files(),
    );
    materialize(root, &files).unwrap();
}

// ============================================================================
// Successful runs
// ============================================================================

#[test]
fn test_csv_to_stdout() {
    let dir = temp_test_dir();
    sample_archive(dir.path());
    let config = write_config(
        dir.path(),
        &[rooted(dir.path(), bases::CMIP), rooted(dir.path(), bases::CANARI)],
        "columns: [data_source, model, runs, years_range]\n",
    );

    let output = run(&["--config", &config, "--log-level", "error"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "data_source,model,runs,years_range");
    assert_eq!(lines[1], "badc,NorCPM1,2,1850-2014");
    assert_eq!(lines[2], "badc,CanESM5,unavailable,no files");
    assert_eq!(lines[3], "canari,NorCPM1,unavailable,no files");
    assert_eq!(lines[4], "canari,CanESM5,1,1850-2014");
}

#[test]
fn test_json_to_file_with_model_filter() {
    let dir = temp_test_dir();
    sample_archive(dir.path());
    let config = write_config(dir.path(), &[rooted(dir.path(), bases::CMIP)], "");
    let out = dir.path().join("catalogue.json");

    let output = run(&[
        "--config",
        &config,
        "--format",
        "json",
        "--model",
        names::NORCPM,
        "--cache",
        "--output",
        &out.to_string_lossy(),
    ]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let parsed: serde_json::Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    let rows = parsed.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["institution"], "NCC");
    assert_eq!(rows[0]["total ensemble members"], 2);
    assert_eq!(rows[0]["members_list"], serde_json::json!(["r1i1p1f1", "r2i1p1f1"]));
}

#[test]
fn test_snapshot_matches_filesystem_queries() {
    let dir = temp_test_dir();
    sample_archive(dir.path());
    let config = write_config(
        dir.path(),
        &[rooted(dir.path(), bases::CMIP), rooted(dir.path(), bases::CANARI)],
        "",
    );

    let direct = run(&["--config", &config, "--log-level", "error"]);
    let snapshot = run(&["--config", &config, "--log-level", "error", "--snapshot"]);
    assert!(snapshot.status.success(), "stderr: {}", String::from_utf8_lossy(&snapshot.stderr));
    assert_eq!(direct.stdout, snapshot.stdout);
}

// ============================================================================
// Configuration failures
// ============================================================================

#[test]
fn test_unknown_base_location_exits_with_configuration_status() {
    let dir = temp_test_dir();
    let config = write_config(dir.path(), &[bases::UNKNOWN.to_string()], "");

    let output = run(&["--config", &config, "--log-format", "pretty"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_column_exits_with_configuration_status() {
    let dir = temp_test_dir();
    let config = write_config(dir.path(), &[bases::CMIP.to_string()], "columns: [colour]\n");

    let output = run(&["--config", &config]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_config_file_is_general_failure() {
    let output = run(&["--config", "/nonexistent/catalogue.yaml"]);
    assert_eq!(output.status.code(), Some(1));
}
