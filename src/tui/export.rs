use crate::model::Report;
use crate::symbol::Symbol;
use anyhow::{Context, Result};
use std::path::PathBuf;

use super::state::UiState;

/// File name for an on-demand export: `volatility-SPY-2024-01-15_14-03-22.json`.
pub fn export_file_name(symbol: &Symbol, timestamp_utc: &str) -> String {
    let stamp: String = timestamp_utc
        .chars()
        .take(19)
        .map(|c| match c {
            ':' => '-',
            'T' => '_',
            other => other,
        })
        .collect();
    format!("volatility-{}-{}.json", symbol.as_str().replace('/', "-"), stamp)
}

/// Export a report as JSON into the current directory.
/// Returns the absolute path of the exported file.
pub fn export_report_json(symbol: &Symbol, report: &Report) -> Result<PathBuf> {
    let timestamp = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "now".into());
    let current_dir = std::env::current_dir().context("get current directory")?;
    let path = current_dir.join(export_file_name(symbol, &timestamp));
    crate::storage::export_json(&path, report)?;
    Ok(path)
}

/// Export the report on screen and update `state.info` with the outcome.
pub fn export_and_show_path(state: &mut UiState) {
    let crate::model::SessionState::Loaded { symbol, report } = &state.session else {
        state.info = "No report to export yet.".into();
        return;
    };
    match export_report_json(symbol, report) {
        Ok(path) => {
            state.info = format!("Exported JSON: {}", path.display());
        }
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), "export failed");
            state.info = format!("Export failed: {e:#}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_filesystem_safe() {
        let sym = Symbol::parse("brk/b").unwrap();
        assert_eq!(
            export_file_name(&sym, "2024-01-15T14:03:22.123456Z"),
            "volatility-BRK-B-2024-01-15_14-03-22.json"
        );
    }

    #[test]
    fn nothing_loaded_reports_info() {
        let mut state = UiState::default();
        export_and_show_path(&mut state);
        assert_eq!(state.info, "No report to export yet.");
    }
}
