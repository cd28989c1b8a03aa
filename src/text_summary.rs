//! Text summary builder for CLI output.
//!
//! Formats a loaded report into human-readable lines for text mode.

use crate::format;
use crate::model::Report;

/// Pre-formatted lines for text output.
pub(crate) struct TextSummary {
    pub lines: Vec<String>,
}

pub(crate) const RETURN_PERIODS: [(&str, &str); 4] = [
    ("daily", "Daily"),
    ("week", "1 Week"),
    ("month", "1 Month"),
    ("ytd", "YTD"),
];

/// "15.20% (15th percentile, LOW)" style cell for one volatility window.
pub(crate) fn volatility_cell(report: &Report, window: &str) -> String {
    let vol = report.number(&format!("vol_{window}"));
    let pct = report.number(&format!("vol_{window}_percentile"));
    let band = format::severity_band(pct)
        .map(|b| b.label())
        .unwrap_or(format::UNKNOWN);
    format!(
        "{} ({} percentile, {})",
        format::percent(vol),
        format::ordinal(pct),
        band
    )
}

pub(crate) fn rsi_cell(report: &Report) -> String {
    let rsi = report.number("rsi_14d");
    match (rsi.filter(|v| v.is_finite()), format::rsi_signal(rsi)) {
        (Some(v), Some(signal)) => format!("{:.2} {}", v, signal.label()),
        _ => format::UNKNOWN.to_string(),
    }
}

/// Build a text summary for `symbol` from its report.
pub(crate) fn build_text_summary(symbol: &str, report: &Report) -> TextSummary {
    let mut lines = Vec::new();

    let ticker = report.ticker().unwrap_or(symbol);
    lines.push(format!(
        "{ticker}  {}",
        format::price(report.number("current_price"))
    ));
    lines.push(format!(
        "Daily range:   O {}  H {}  L {}",
        format::price(report.number("daily_open")),
        format::price(report.number("daily_high")),
        format::price(report.number("daily_low")),
    ));
    for (label, prefix) in [("Monthly range", "monthly"), ("Yearly range", "yearly")] {
        let high = report.number(&format!("{prefix}_high"));
        let low = report.number(&format!("{prefix}_low"));
        if high.is_some() || low.is_some() {
            lines.push(format!(
                "{label}: H {}  L {}",
                format::price(high),
                format::price(low)
            ));
        }
    }

    let returns: Vec<String> = RETURN_PERIODS
        .iter()
        .map(|(key, label)| {
            let v = report.pointer_number(&format!("/returns/{key}"));
            format!("{label} {}", format::signed_percent(v))
        })
        .collect();
    lines.push(format!("Returns: {}", returns.join("  ")));

    lines.push(format!("14-day RSI: {}", rsi_cell(report)));
    lines.push(format!("30-day volatility: {}", volatility_cell(report, "30d")));
    lines.push(format!("90-day volatility: {}", volatility_cell(report, "90d")));

    for window in ["30d", "90d"] {
        let pick = |p: &str| report.pointer_number(&format!("/percentile_thresholds/{window}/{p}"));
        if ["p50", "p90", "p99"].iter().any(|&p| pick(p).is_some()) {
            lines.push(format!(
                "{} thresholds: p50 {}  p90 {}  p99 {}",
                window.to_uppercase(),
                format::percent(pick("p50")),
                format::percent(pick("p90")),
                format::percent(pick("p99")),
            ));
        }
    }

    TextSummary { lines }
}
