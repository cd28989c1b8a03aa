use crate::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for talking to the volatility service.
#[derive(Debug, Clone)]
pub struct LookupConfig {
    pub base_url: String,
    pub lookback_years: u32,
    pub timeout: Duration,
    pub user_agent: String,
}

/// Volatility report as returned by the service.
///
/// The session layer passes it through untouched; presentation code reads
/// fields leniently so a missing or null value is `None`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Report(serde_json::Value);

impl Report {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn ticker(&self) -> Option<&str> {
        self.0.get("ticker").and_then(|v| v.as_str())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(|v| v.as_f64())
    }

    /// Read a nested number by JSON pointer, e.g. `/returns/ytd`.
    pub fn pointer_number(&self, pointer: &str) -> Option<f64> {
        self.0.pointer(pointer).and_then(|v| v.as_f64())
    }

    /// Number of daily points in the embedded volatility history, if any.
    pub fn history_len(&self) -> usize {
        self.0
            .get("history")
            .and_then(|v| v.as_array())
            .map(|a| a.len())
            .unwrap_or(0)
    }
}

/// Exactly one of these is active for a session at any time.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Idle,
    Loading { symbol: Symbol },
    Loaded { symbol: Symbol, report: Report },
    Failed { symbol: Symbol, message: String },
}

impl SessionState {
    pub fn report(&self) -> Option<&Report> {
        match self {
            SessionState::Loaded { report, .. } => Some(report),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading { .. })
    }
}

/// Snapshots published by the controller to presentation layers.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    State(SessionState),
    History(Vec<Symbol>),
    Info(InfoEvent),
}

/// Structured info events consumed by UI/CLI layers.
#[derive(Debug, Clone)]
pub enum InfoEvent {
    Exported { path: std::path::PathBuf },
    ExportFailed { error: String },
    HistoryCleared,
}

impl InfoEvent {
    /// Render a human-readable message for UI/CLI layers.
    pub fn to_message(&self) -> String {
        match self {
            InfoEvent::Exported { path } => format!("Exported JSON: {}", path.display()),
            InfoEvent::ExportFailed { error } => format!("Export JSON failed: {error}"),
            InfoEvent::HistoryCleared => "History cleared".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn report_accessors_are_lenient() {
        let report = Report::new(json!({
            "ticker": "SPY",
            "current_price": 450.25,
            "daily_open": null,
            "returns": { "ytd": 0.0831, "week": null },
            "history": [{ "date": "2024-01-15" }, { "date": "2024-01-16" }],
        }));
        assert_eq!(report.ticker(), Some("SPY"));
        assert_eq!(report.number("current_price"), Some(450.25));
        assert_eq!(report.number("daily_open"), None);
        assert_eq!(report.number("vol_30d"), None);
        assert_eq!(report.pointer_number("/returns/ytd"), Some(0.0831));
        assert_eq!(report.pointer_number("/returns/week"), None);
        assert_eq!(report.history_len(), 2);
    }

    #[test]
    fn report_serializes_as_raw_payload() {
        let value = json!({ "ticker": "QQQ", "vol_30d": 0.21 });
        let report: Report = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(serde_json::to_value(&report).unwrap(), value);
    }

    #[test]
    fn state_exposes_report_only_when_loaded() {
        let spy = Symbol::parse("spy").unwrap();
        assert_eq!(SessionState::Idle.report(), None);
        let loading = SessionState::Loading { symbol: spy.clone() };
        assert!(loading.is_loading());
        assert_eq!(loading.report(), None);
        let failed = SessionState::Failed {
            symbol: spy.clone(),
            message: "nope".into(),
        };
        assert_eq!(failed.report(), None);
        let report = Report::new(json!({ "ticker": "SPY" }));
        let loaded = SessionState::Loaded {
            symbol: spy,
            report: report.clone(),
        };
        assert!(!loaded.is_loading());
        assert_eq!(loaded.report(), Some(&report));
    }
}
