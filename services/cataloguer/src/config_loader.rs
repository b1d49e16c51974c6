//! YAML configuration loading.
//!
//! Supports `${VAR}` and `${VAR:-default}` substitution before parsing.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use catalogue::CatalogueConfig;

/// Load and validate a catalogue configuration file.
pub fn load_catalogue_config<P: AsRef<Path>>(path: P) -> Result<CatalogueConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_catalogue_config(&content)
        .with_context(|| format!("Failed to load config file: {}", path.display()))?;

    Ok(config)
}

/// Parse and validate configuration text.
pub fn parse_catalogue_config(content: &str) -> Result<CatalogueConfig> {
    let expanded = expand_env_vars(content)?;
    let config: CatalogueConfig =
        serde_yaml::from_str(&expanded).context("Failed to parse catalogue YAML")?;

    // Keeps the CatalogueError type for exit-status mapping
    config.validate()?;
    Ok(config)
}

/// Replace every `${VAR}` or `${VAR:-default}` with its value.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut expanded = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(open) = rest.find("${") {
        expanded.push_str(&rest[..open]);
        let expr = &rest[open + 2..];
        let Some(close) = expr.find('}') else {
            anyhow::bail!("Unclosed variable substitution: {}", &rest[open..]);
        };
        expanded.push_str(&lookup_var(&expr[..close])?);
        rest = &expr[close + 1..];
    }
    expanded.push_str(rest);

    Ok(expanded)
}

/// Value of `VAR` or `VAR:-default`; an empty variable falls back to the default.
fn lookup_var(expr: &str) -> Result<String> {
    let (name, default) = match expr.split_once(":-") {
        Some((name, default)) => (name.trim(), Some(default)),
        None => (expr.trim(), None),
    };

    match (std::env::var(name), default) {
        (Ok(value), _) if !value.is_empty() => Ok(value),
        (_, Some(default)) => Ok(default.to_string()),
        (Ok(value), None) => Ok(value),
        (Err(_), None) => anyhow::bail!("Environment variable {} not set", name),
    }
}

// ============================================================================
// Tests
// ============================================================================
