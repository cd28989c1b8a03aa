//! Display helpers shared by the text summary and the TUI.
//!
//! Every function is total: a missing or non-finite input renders as [`UNKNOWN`]
//! (or maps to `None`) instead of being treated as zero.

/// Placeholder rendered for values the report does not carry.
pub const UNKNOWN: &str = "—";

fn known(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Round to two decimals with ties away from zero; `{:.2}` alone rounds
/// exact halves to even (`0.125` -> `0.12`).
fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Format a fractional return as a signed percentage: `0.0125` -> `+1.25%`.
pub fn signed_percent(value: Option<f64>) -> String {
    match known(value) {
        Some(v) => {
            let pct = v * 100.0;
            if pct >= 0.0 {
                // abs() folds -0.0 into +0.00%
                format!("+{:.2}%", round_cents(pct).abs())
            } else {
                format!("{:.2}%", round_cents(pct))
            }
        }
        None => UNKNOWN.to_string(),
    }
}

/// Format a fraction as an unsigned percentage: `0.152` -> `15.20%`.
pub fn percent(value: Option<f64>) -> String {
    match known(value) {
        Some(v) => format!("{:.2}%", round_cents(v * 100.0)),
        None => UNKNOWN.to_string(),
    }
}

pub fn price(value: Option<f64>) -> String {
    match known(value) {
        Some(v) => format!("{:.2}", round_cents(v)),
        None => UNKNOWN.to_string(),
    }
}

/// English ordinal suffix for a whole number.
pub fn ordinal_suffix(n: u64) -> &'static str {
    match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Render a percentile rank as an ordinal, rounding half up: `32.5` -> `33rd`.
pub fn ordinal(value: Option<f64>) -> String {
    let Some(v) = known(value) else {
        return UNKNOWN.to_string();
    };
    let n = (v + 0.5).floor() as i64;
    format!("{}{}", n, ordinal_suffix(n.unsigned_abs()))
}

/// Where a percentile rank sits relative to its own history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeverityBand {
    Low,
    Moderate,
    Elevated,
    High,
    Extreme,
}

impl SeverityBand {
    pub fn label(self) -> &'static str {
        match self {
            SeverityBand::Low => "LOW",
            SeverityBand::Moderate => "MODERATE",
            SeverityBand::Elevated => "ELEVATED",
            SeverityBand::High => "HIGH",
            SeverityBand::Extreme => "EXTREME",
        }
    }
}

/// Map a percentile rank (0-100) onto a band using thresholds 25/50/75/90.
/// `None` means the rank is unknown.
pub fn severity_band(percentile: Option<f64>) -> Option<SeverityBand> {
    let p = known(percentile)?;
    Some(if p < 25.0 {
        SeverityBand::Low
    } else if p < 50.0 {
        SeverityBand::Moderate
    } else if p < 75.0 {
        SeverityBand::Elevated
    } else if p < 90.0 {
        SeverityBand::High
    } else {
        SeverityBand::Extreme
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiSignal {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiSignal {
    pub fn label(self) -> &'static str {
        match self {
            RsiSignal::Oversold => "OVERSOLD",
            RsiSignal::Neutral => "NEUTRAL",
            RsiSignal::Overbought => "OVERBOUGHT",
        }
    }
}

/// Classify a 14-day RSI reading: above 70 overbought, below 30 oversold.
pub fn rsi_signal(rsi: Option<f64>) -> Option<RsiSignal> {
    let v = known(rsi)?;
    Some(if v > 70.0 {
        RsiSignal::Overbought
    } else if v < 30.0 {
        RsiSignal::Oversold
    } else {
        RsiSignal::Neutral
    })
}

/// Position of `price` inside `[low, high]` as a percentage, clamped to 2..=98
/// so a marker stays visible. Falls back to the midpoint when the range is undefined.
pub fn range_position(price: Option<f64>, low: Option<f64>, high: Option<f64>) -> f64 {
    match (known(price), known(low), known(high)) {
        (Some(p), Some(l), Some(h)) if h > l => (((p - l) / (h - l)) * 100.0).clamp(2.0, 98.0),
        _ => 50.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_follow_english_rules() {
        let cases = [
            (1.0, "1st"),
            (2.0, "2nd"),
            (3.0, "3rd"),
            (4.0, "4th"),
            (11.0, "11th"),
            (12.0, "12th"),
            (13.0, "13th"),
            (21.0, "21st"),
            (22.0, "22nd"),
            (23.0, "23rd"),
            (100.0, "100th"),
            (101.0, "101st"),
            (111.0, "111th"),
        ];
        for (input, expected) in cases {
            assert_eq!(ordinal(Some(input)), expected, "input {input}");
        }
    }

    #[test]
    fn ordinal_rounds_half_up() {
        assert_eq!(ordinal(Some(32.5)), "33rd");
        assert_eq!(ordinal(Some(95.4)), "95th");
        assert_eq!(ordinal(Some(0.2)), "0th");
        assert_eq!(ordinal(None), UNKNOWN);
        assert_eq!(ordinal(Some(f64::NAN)), UNKNOWN);
    }

    #[test]
    fn signed_percent_formatting() {
        assert_eq!(signed_percent(Some(0.0125)), "+1.25%");
        assert_eq!(signed_percent(Some(-0.0215)), "-2.15%");
        assert_eq!(signed_percent(Some(0.0)), "+0.00%");
        assert_eq!(signed_percent(Some(-0.0)), "+0.00%");
        assert_eq!(signed_percent(None), "—");
    }

    #[test]
    fn two_decimal_ties_round_away_from_zero() {
        assert_eq!(signed_percent(Some(0.00125)), "+0.13%");
        assert_eq!(signed_percent(Some(0.00625)), "+0.63%");
        assert_eq!(signed_percent(Some(-0.00625)), "-0.63%");
        assert_eq!(percent(Some(0.00125)), "0.13%");
        assert_eq!(price(Some(2.125)), "2.13");
        assert_eq!(price(Some(-2.125)), "-2.13");
    }

    #[test]
    fn unsigned_and_price_formatting() {
        assert_eq!(percent(Some(0.152)), "15.20%");
        assert_eq!(percent(None), UNKNOWN);
        assert_eq!(price(Some(450.25)), "450.25");
        assert_eq!(price(Some(0.0)), "0.00");
        assert_eq!(price(None), UNKNOWN);
    }

    #[test]
    fn severity_bands_use_quartile_and_p90_thresholds() {
        assert_eq!(severity_band(Some(0.0)), Some(SeverityBand::Low));
        assert_eq!(severity_band(Some(24.9)), Some(SeverityBand::Low));
        assert_eq!(severity_band(Some(25.0)), Some(SeverityBand::Moderate));
        assert_eq!(severity_band(Some(50.0)), Some(SeverityBand::Elevated));
        assert_eq!(severity_band(Some(75.0)), Some(SeverityBand::High));
        assert_eq!(severity_band(Some(90.0)), Some(SeverityBand::Extreme));
        assert_eq!(severity_band(Some(100.0)), Some(SeverityBand::Extreme));
        assert_eq!(severity_band(None), None);
        assert!(SeverityBand::Low < SeverityBand::Extreme);
    }

    #[test]
    fn rsi_signal_thresholds() {
        assert_eq!(rsi_signal(Some(70.0)), Some(RsiSignal::Neutral));
        assert_eq!(rsi_signal(Some(70.1)), Some(RsiSignal::Overbought));
        assert_eq!(rsi_signal(Some(29.9)), Some(RsiSignal::Oversold));
        assert_eq!(rsi_signal(None), None);
    }

    #[test]
    fn range_position_clamps_and_defaults() {
        assert_eq!(range_position(Some(450.0), Some(400.0), Some(500.0)), 50.0);
        assert_eq!(range_position(Some(400.0), Some(400.0), Some(500.0)), 2.0);
        assert_eq!(range_position(Some(600.0), Some(400.0), Some(500.0)), 98.0);
        assert_eq!(range_position(Some(1.0), None, Some(2.0)), 50.0);
        assert_eq!(range_position(Some(1.0), Some(2.0), Some(2.0)), 50.0);
    }
}
