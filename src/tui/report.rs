use crate::format::{self, RsiSignal, SeverityBand};
use crate::model::Report;
use crate::text_summary::RETURN_PERIODS;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const ORANGE: Color = Color::Rgb(249, 115, 22);

pub fn band_color(band: Option<SeverityBand>) -> Color {
    match band {
        Some(SeverityBand::Low) => Color::Green,
        Some(SeverityBand::Moderate) => Color::LightGreen,
        Some(SeverityBand::Elevated) => Color::Yellow,
        Some(SeverityBand::High) => ORANGE,
        Some(SeverityBand::Extreme) => Color::Red,
        None => Color::DarkGray,
    }
}

fn signed_color(value: Option<f64>) -> Color {
    match value.filter(|v| v.is_finite()) {
        Some(v) if v > 0.0 => Color::Green,
        Some(v) if v < 0.0 => Color::Red,
        Some(_) => Color::Gray,
        None => Color::DarkGray,
    }
}

fn rsi_color(signal: Option<RsiSignal>) -> Color {
    match signal {
        Some(RsiSignal::Overbought) => Color::Red,
        Some(RsiSignal::Oversold) => Color::Green,
        Some(RsiSignal::Neutral) => Color::White,
        None => Color::DarkGray,
    }
}

/// Text bar with a marker at `position` percent.
pub fn range_bar(position: f64, width: usize) -> String {
    let width = width.max(3);
    let idx = ((position / 100.0) * (width - 1) as f64).round() as usize;
    (0..width)
        .map(|i| if i == idx.min(width - 1) { '●' } else { '─' })
        .collect()
}

fn label(text: &str) -> Span<'static> {
    Span::styled(text.to_string(), Style::default().fg(Color::DarkGray))
}

fn draw_quote(area: Rect, f: &mut Frame, symbol: &str, report: &Report, loaded_at: Option<&str>) {
    let ticker = report.ticker().unwrap_or(symbol).to_string();
    let low = report.number("daily_low");
    let high = report.number("daily_high");
    let position = format::range_position(report.number("current_price"), low, high);
    let bar_width = (area.width as usize).saturating_sub(24).clamp(10, 60);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(ticker, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format::price(report.number("current_price")),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(vec![
            label("DAILY    O "),
            Span::raw(format::price(report.number("daily_open"))),
            label("  H "),
            Span::styled(format::price(high), Style::default().fg(Color::Green)),
            label("  L "),
            Span::styled(format::price(low), Style::default().fg(Color::Red)),
        ]),
    ];
    for (title, prefix) in [("MONTHLY    ", "monthly"), ("YEARLY     ", "yearly")] {
        let h = report.number(&format!("{prefix}_high"));
        let l = report.number(&format!("{prefix}_low"));
        if h.is_some() || l.is_some() {
            lines.push(Line::from(vec![
                label(title),
                label("H "),
                Span::styled(format::price(h), Style::default().fg(Color::Green)),
                label("  L "),
                Span::styled(format::price(l), Style::default().fg(Color::Red)),
            ]));
        }
    }
    lines.push(Line::from(vec![
        Span::styled(format::price(low), Style::default().fg(Color::DarkGray)),
        Span::raw(" "),
        Span::raw(range_bar(position, bar_width)),
        Span::raw(" "),
        Span::styled(format::price(high), Style::default().fg(Color::DarkGray)),
    ]));

    let title = match loaded_at {
        Some(stamp) => format!("Quote · updated {stamp}"),
        None => "Quote".to_string(),
    };
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}

fn draw_returns(area: Rect, f: &mut Frame, report: &Report) {
    let mut spans = Vec::new();
    for (key, name) in RETURN_PERIODS {
        let v = report.pointer_number(&format!("/returns/{key}"));
        spans.push(label(&format!("{} ", name.to_uppercase())));
        spans.push(Span::styled(
            format::signed_percent(v),
            Style::default().fg(signed_color(v)),
        ));
        spans.push(Span::raw("    "));
    }

    let rsi = report.number("rsi_14d");
    let signal = format::rsi_signal(rsi);
    let rsi_line = Line::from(vec![
        label("14-DAY RSI  "),
        Span::styled(
            crate::text_summary::rsi_cell(report),
            Style::default().fg(rsi_color(signal)),
        ),
    ]);

    let p = Paragraph::new(vec![Line::from(spans), rsi_line])
        .block(Block::default().borders(Borders::ALL).title("Returns"));
    f.render_widget(p, area);
}

fn draw_window(area: Rect, f: &mut Frame, report: &Report, window: &str) {
    let vol = report.number(&format!("vol_{window}"));
    let pct = report.number(&format!("vol_{window}_percentile"));
    let band = format::severity_band(pct);
    let color = band_color(band);
    let pick = |p: &str| report.pointer_number(&format!("/percentile_thresholds/{window}/{p}"));

    let lines = vec![
        Line::from(Span::styled(
            format::percent(vol),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled(
                format!("{} percentile", format::ordinal(pct)),
                Style::default().fg(color),
            ),
            Span::raw("  "),
            Span::styled(
                band.map(|b| b.label()).unwrap_or(format::UNKNOWN),
                Style::default().fg(color),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            label("p50 "),
            Span::raw(format::percent(pick("p50"))),
            label("  p90 "),
            Span::raw(format::percent(pick("p90"))),
            label("  p99 "),
            Span::raw(format::percent(pick("p99"))),
        ]),
    ];
    let title = format!("{}-DAY VOLATILITY", window.trim_end_matches('d'));
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(p, area);
}

pub fn draw_report(
    area: Rect,
    f: &mut Frame,
    symbol: &str,
    report: &Report,
    loaded_at: Option<&str>,
) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(7),
                Constraint::Length(4),
                Constraint::Length(6),
                Constraint::Min(0),
            ]
            .as_ref(),
        )
        .split(area);

    draw_quote(rows[0], f, symbol, report, loaded_at);
    draw_returns(rows[1], f, report);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(rows[2]);
    draw_window(cols[0], f, report, "30d");
    draw_window(cols[1], f, report, "90d");

    let points = report.history_len();
    if points > 0 && rows[3].height > 0 {
        let p = Paragraph::new(Line::from(label(&format!(
            "{points} daily volatility points in report"
        ))));
        f.render_widget(p, rows[3]);
    }
}
