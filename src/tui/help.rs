use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn keybind(key: &'static str, pad: usize, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(key, Style::default().fg(Color::Magenta)),
        Span::raw(" ".repeat(pad)),
        Span::raw(action),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        keybind("Esc / Ctrl-C", 2, "Quit"),
        keybind("Enter", 9, "Look up typed symbol / selected history entry"),
        keybind("Tab", 11, "Switch focus between input and history"),
        keybind("F2..F6", 8, "Quick pick SPY, QQQ, IWM, DIA, VIX"),
        keybind("Ctrl-E", 8, "Export current report as JSON"),
        keybind("Ctrl-L", 8, "Clear history"),
        keybind("F1", 12, "Toggle this help"),
        Line::from(""),
        Line::from("History (when focused):"),
        keybind("↑/↓ or j/k", 4, "Navigate"),
        keybind("c", 13, "Clear history"),
        keybind("?", 13, "Toggle this help"),
        Line::from(""),
        Line::from("Volatility = annualized standard deviation of daily log returns."),
        Line::from("Percentile bands: <25 low, <50 moderate, <75 elevated, <90 high, else extreme."),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}
