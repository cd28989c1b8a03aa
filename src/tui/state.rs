use crate::model::{SessionEvent, SessionState};
use crate::symbol::Symbol;

/// Longest symbol the input box accepts.
pub const MAX_INPUT_LEN: usize = 12;

/// Quick picks offered on the empty screen, bound to F2..F6.
pub const QUICK_PICKS: [&str; 5] = ["SPY", "QQQ", "IWM", "DIA", "VIX"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input,
    History,
}

pub struct UiState {
    pub tab: usize,
    pub focus: Focus,
    pub input: String,
    pub session: SessionState,
    pub history: Vec<Symbol>,
    pub history_selected: usize, // 0 = most recent
    pub info: String,
    pub loaded_at: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: 0,
            focus: Focus::Input,
            input: String::new(),
            session: SessionState::Idle,
            history: Vec::new(),
            history_selected: 0,
            info: String::new(),
            loaded_at: None,
        }
    }
}

impl UiState {
    /// Fold a controller snapshot into the UI state.
    pub fn apply_event(&mut self, ev: SessionEvent) {
        match ev {
            SessionEvent::State(state) => {
                match &state {
                    SessionState::Loading { symbol } => {
                        self.info = format!("Loading {symbol}…");
                    }
                    SessionState::Loaded { .. } => {
                        let stamp = local_time_stamp();
                        self.info = format!("Updated {stamp}");
                        self.loaded_at = Some(stamp);
                    }
                    SessionState::Failed { .. } => {
                        self.info.clear();
                        self.loaded_at = None;
                    }
                    SessionState::Idle => {}
                }
                self.session = state;
            }
            SessionEvent::History(history) => {
                self.history = history;
                if self.history_selected >= self.history.len() {
                    self.history_selected = self.history.len().saturating_sub(1);
                }
                if self.history.is_empty() && self.focus == Focus::History {
                    self.focus = Focus::Input;
                }
            }
            SessionEvent::Info(info) => {
                self.info = info.to_message();
            }
        }
    }

    /// Append a typed character, uppercased. Whitespace and overflow are ignored.
    pub fn input_push(&mut self, c: char) {
        if c.is_whitespace() || self.input.chars().count() >= MAX_INPUT_LEN {
            return;
        }
        self.input.extend(c.to_uppercase());
    }

    pub fn input_pop(&mut self) {
        self.input.pop();
    }

    /// Take the typed text, leaving the box empty.
    pub fn take_input(&mut self) -> String {
        std::mem::take(&mut self.input)
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input if !self.history.is_empty() => Focus::History,
            _ => Focus::Input,
        };
    }

    pub fn select_prev(&mut self) {
        self.history_selected = self.history_selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.history_selected + 1 < self.history.len() {
            self.history_selected += 1;
        }
    }

    pub fn selected_symbol(&self) -> Option<&Symbol> {
        self.history.get(self.history_selected)
    }

    /// Symbol whose report is on screen, used to highlight its history row.
    pub fn active_symbol(&self) -> Option<&Symbol> {
        match &self.session {
            SessionState::Loaded { symbol, .. } => Some(symbol),
            _ => None,
        }
    }
}

fn local_time_stamp() -> String {
    let format = time::macros::format_description!("[hour]:[minute]:[second]");
    let now = time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc());
    now.format(&format).unwrap_or_else(|_| "now".into())
}
