//! Matrix file loading
//!
//! Each non-blank line is one process; whitespace-separated non-negative
//! integers are its per-class values.

use crate::config::Config;
use crate::error::CliError;
use banker_core::{ResourceState, Units};
use std::path::Path;

/// Parse whitespace-separated unit counts from one line
pub fn parse_units(line: &str, source_name: &str, line_no: usize) -> Result<Vec<Units>, CliError> {
    line.split_whitespace()
        .map(|token| {
            token.parse::<Units>().map_err(|e| CliError::Parse {
                source_name: source_name.to_string(),
                line: line_no,
                message: format!("'{}': {}", token, e),
            })
        })
        .collect()
}

/// Parse a matrix, skipping blank lines
///
/// Row lengths are not checked here; shape validation belongs to
/// [`ResourceState`] construction.
pub fn parse_matrix(text: &str, source_name: &str) -> Result<Vec<Vec<Units>>, CliError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| parse_units(line, source_name, i + 1))
        .collect()
}

/// Read and parse a matrix file
pub fn read_matrix(path: &Path) -> Result<Vec<Vec<Units>>, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_matrix(&text, &path.display().to_string())?;
    tracing::debug!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}

/// Load the state named by `config`
pub fn load_state(config: &Config) -> Result<ResourceState, CliError> {
    let max = read_matrix(&config.max_path)?;
    let allocation = read_matrix(&config.allocation_path)?;
    let state = ResourceState::from_rows(&max, &allocation, config.total.clone())?;
    tracing::info!(
        "Loaded {} processes x {} resource classes",
        state.process_count(),
        state.resource_count()
    );
    Ok(state)
}
