//! Post-lookup processing.
//!
//! Handles exports after a report loads successfully.

use crate::model::{InfoEvent, SessionState};
use crate::storage;
use std::path::Path;

/// Export the loaded report when an export path is configured.
/// Returns info events describing what happened; never fails.
pub(crate) fn process_lookup_completion(
    export_json: Option<&Path>,
    state: &SessionState,
) -> Vec<InfoEvent> {
    let mut messages = Vec::new();
    let (Some(path), Some(report)) = (export_json, state.report()) else {
        return messages;
    };
    match storage::export_json(path, report) {
        Ok(()) => messages.push(InfoEvent::Exported {
            path: path.to_path_buf(),
        }),
        Err(e) => {
            tracing::warn!(error = %format!("{e:#}"), path = %path.display(), "export failed");
            messages.push(InfoEvent::ExportFailed {
                error: format!("{e:#}"),
            })
        }
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Report;
    use crate::symbol::Symbol;
    use serde_json::json;

    fn loaded() -> SessionState {
        SessionState::Loaded {
            symbol: Symbol::parse("SPY").unwrap(),
            report: Report::new(json!({ "ticker": "SPY" })),
        }
    }

    #[test]
    fn exports_loaded_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spy.json");
        let msgs = process_lookup_completion(Some(&path), &loaded());
        assert!(matches!(msgs.as_slice(), [InfoEvent::Exported { .. }]));
        assert!(path.exists());
    }

    #[test]
    fn nothing_to_do_without_path_or_report() {
        assert!(process_lookup_completion(None, &loaded()).is_empty());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.json");
        assert!(process_lookup_completion(Some(&path), &SessionState::Idle).is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn export_failure_becomes_info() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be overwritten with a file.
        let msgs = process_lookup_completion(Some(dir.path()), &loaded());
        assert!(matches!(msgs.as_slice(), [InfoEvent::ExportFailed { .. }]));
    }
}
