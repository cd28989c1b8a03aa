mod export;
mod help;
mod report;
mod state;

use crate::cli::{build_config, Cli};
use crate::model::{SessionEvent, SessionState};
use crate::orchestrator::{self, ControllerOptions, SessionController, UiCommand};
use crate::service::{HttpReportFetcher, ReportFetcher};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Terminal,
};
use state::{Focus, UiState, QUICK_PICKS};
use std::sync::Arc;
use std::{io, time::Duration, time::Instant};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

pub async fn run(args: Cli, session: SessionController) -> Result<()> {
    // Unbounded channels keep the UI thread from ever blocking on the controller.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<SessionEvent>();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<UiCommand>();

    let fetcher: Arc<dyn ReportFetcher> = Arc::new(HttpReportFetcher::new(&build_config(&args))?);

    if let Some(symbol) = args.symbol.clone() {
        let _ = cmd_tx.send(UiCommand::Submit(symbol));
    }

    // TUI runs in a dedicated thread to keep all blocking I/O out of the Tokio runtime.
    let ui_handle = std::thread::spawn(move || run_threaded(event_rx, cmd_tx));

    let opts = ControllerOptions {
        cancel_superseded: args.cancel_superseded,
        export_json: args.export_json.clone(),
    };
    let res = orchestrator::run_controller(session, fetcher, opts, event_tx, cmd_rx).await;

    let join_res = tokio::task::spawn_blocking(move || ui_handle.join()).await;
    if let Ok(joined) = join_res {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e),
            Err(_) => return Err(anyhow::anyhow!("TUI thread panicked")),
        }
    }

    res.map(|_| ())
}

/// Run the TUI loop on a dedicated thread.
fn run_threaded(
    mut event_rx: UnboundedReceiver<SessionEvent>,
    cmd_tx: UnboundedSender<UiCommand>,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).ok();

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;
    terminal.clear().ok();

    // UiState is owned by the UI thread only; the controller only sends snapshots.
    let mut state = UiState::default();

    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();
    let mut dirty = true;

    let res = loop {
        while let Ok(ev) = event_rx.try_recv() {
            state.apply_event(ev);
            dirty = true;
        }

        if dirty || last_tick.elapsed() >= tick_rate {
            terminal.draw(|f| draw(f.area(), f, &state)).ok();
            last_tick = Instant::now();
            dirty = false;
        }

        // Poll input with a short timeout to avoid blocking the render loop.
        if !event::poll(Duration::from_millis(10)).unwrap_or(false) {
            continue;
        }
        let Ok(Event::Key(k)) = event::read() else {
            continue;
        };
        if k.kind != KeyEventKind::Press {
            continue;
        }
        dirty = true;

        match (k.modifiers, k.code) {
            (_, KeyCode::Esc) | (KeyModifiers::CONTROL, KeyCode::Char('c')) => {
                let _ = cmd_tx.send(UiCommand::Quit);
                break Ok(());
            }
            (KeyModifiers::CONTROL, KeyCode::Char('l')) => {
                let _ = cmd_tx.send(UiCommand::ClearHistory);
            }
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                export::export_and_show_path(&mut state);
            }
            (_, KeyCode::F(1)) => {
                state.tab = if state.tab == 0 { 1 } else { 0 };
            }
            (_, KeyCode::F(n @ 2..=6)) => {
                let pick = QUICK_PICKS[usize::from(n - 2)];
                let _ = cmd_tx.send(UiCommand::Submit(pick.to_string()));
            }
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => state.toggle_focus(),
            (_, KeyCode::Up) => state.select_prev(),
            (_, KeyCode::Down) => state.select_next(),
            (_, KeyCode::Enter) => {
                let raw = match state.focus {
                    Focus::Input => state.take_input(),
                    Focus::History => state
                        .selected_symbol()
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                };
                // Blank input is dropped by the controller.
                let _ = cmd_tx.send(UiCommand::Submit(raw));
            }
            (_, KeyCode::Backspace) if state.focus == Focus::Input => state.input_pop(),
            (_, KeyCode::Char(c)) if state.focus == Focus::History => match c {
                'k' => state.select_prev(),
                'j' => state.select_next(),
                'c' => {
                    let _ = cmd_tx.send(UiCommand::ClearHistory);
                }
                '?' => state.tab = if state.tab == 0 { 1 } else { 0 },
                _ => {}
            },
            (m, KeyCode::Char(c)) if !m.contains(KeyModifiers::CONTROL) => state.input_push(c),
            _ => {}
        }
    };

    disable_raw_mode().ok();
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen).ok();
    res
}

fn draw(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(area);

    draw_header(chunks[0], f, state);
    match state.tab {
        0 => draw_dashboard(chunks[1], f, state),
        _ => help::draw_help(chunks[1], f),
    }
    draw_status(chunks[2], f, state);
}

fn draw_header(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let focused = state.focus == Focus::Input;
    let cursor = if focused { "▏" } else { "" };
    let input = if state.input.is_empty() && !focused {
        Span::styled("SYMBOL", Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(
            format!("{}{cursor}", state.input),
            Style::default().add_modifier(Modifier::BOLD),
        )
    };
    let go = if state.session.is_loading() { "  …" } else { "  ⏎ GO" };
    let border = if focused { Color::Blue } else { Color::DarkGray };
    let p = Paragraph::new(Line::from(vec![
        input,
        Span::styled(go, Style::default().fg(Color::DarkGray)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title("VOLATILITY TERMINAL"),
    );
    f.render_widget(p, area);
}

fn draw_dashboard(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(22), Constraint::Min(0)].as_ref())
        .split(area);

    draw_history(cols[0], f, state);
    draw_main(cols[1], f, state);
}

fn draw_history(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let focused = state.focus == Focus::History;
    let items: Vec<ListItem> = if state.history.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No history yet",
            Style::default().fg(Color::DarkGray),
        )))]
    } else {
        state
            .history
            .iter()
            .enumerate()
            .map(|(rank, symbol)| {
                let active = state.active_symbol() == Some(symbol);
                let selected = focused && rank == state.history_selected;
                let mut style = if active {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                if selected {
                    style = style.bg(Color::DarkGray);
                }
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:>2} ", rank + 1), Style::default().fg(Color::DarkGray)),
                    Span::styled(symbol.to_string(), style),
                ]))
            })
            .collect()
    };

    let border = if focused { Color::Blue } else { Color::DarkGray };
    let title = format!("RECENT ({}/{})", state.history.len(), crate::history::MAX_HISTORY);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title),
    );
    f.render_widget(list, area);
}

fn draw_main(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    match &state.session {
        SessionState::Loaded { symbol, report } => {
            report::draw_report(area, f, symbol.as_str(), report, state.loaded_at.as_deref());
        }
        SessionState::Failed { symbol, message } => {
            let p = Paragraph::new(vec![
                Line::from(Span::styled(
                    message.clone(),
                    Style::default().fg(Color::LightRed),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    format!("Lookup for {symbol} failed. Enter another symbol to retry."),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title("Error"),
            );
            f.render_widget(p, area);
        }
        SessionState::Loading { symbol } => {
            let p = Paragraph::new(Line::from(Span::styled(
                format!("Fetching {symbol}…"),
                Style::default().fg(Color::Gray),
            )))
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(p, area);
        }
        SessionState::Idle => {
            let mut picks = vec![Span::styled(
                "Quick picks: ",
                Style::default().fg(Color::DarkGray),
            )];
            for (i, pick) in QUICK_PICKS.iter().enumerate() {
                picks.push(Span::styled(
                    format!("F{} ", i + 2),
                    Style::default().fg(Color::Magenta),
                ));
                picks.push(Span::raw(format!("{pick}  ")));
            }
            let p = Paragraph::new(vec![
                Line::from(Span::styled(
                    "ENTER SYMBOL TO ANALYZE",
                    Style::default().fg(Color::Gray),
                )),
                Line::from(""),
                Line::from(picks),
            ])
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(p, area);
        }
    }
}

fn draw_status(area: Rect, f: &mut ratatui::Frame, state: &UiState) {
    let p = Paragraph::new(Line::from(vec![
        Span::styled(state.info.clone(), Style::default().fg(Color::Gray)),
        Span::raw("  "),
        Span::styled("F1 help · Esc quit", Style::default().fg(Color::DarkGray)),
    ]));
    f.render_widget(p, area);
}
