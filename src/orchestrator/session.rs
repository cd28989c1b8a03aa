//! Lookup state machine.
//!
//! `Idle -> Loading -> {Loaded, Failed}`; any valid submission re-enters
//! `Loading`. Every submission gets a fresh [`RequestToken`] and only the
//! outcome carrying the latest token is applied.

use crate::error::FetchError;
use crate::history::HistoryStore;
use crate::model::{Report, SessionState};
use crate::symbol::Symbol;

/// Monotonic id of an issued lookup. The first lookup gets token 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What the runtime needs to issue the fetch for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    pub token: RequestToken,
    pub symbol: Symbol,
}

/// Effect of delivering an outcome to [`SessionController::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Loaded,
    Failed,
    /// Superseded or already settled; state untouched.
    Stale,
}

pub struct SessionController {
    state: SessionState,
    latest: RequestToken,
    history: HistoryStore,
}

impl SessionController {
    pub fn new(history: HistoryStore) -> Self {
        Self {
            state: SessionState::Idle,
            latest: RequestToken(0),
            history,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Accept raw input. Blank input is ignored and returns `None`.
    pub fn submit(&mut self, raw_input: &str) -> Option<LookupTicket> {
        let symbol = Symbol::parse(raw_input).ok()?;
        self.latest = RequestToken(self.latest.0 + 1);
        self.state = SessionState::Loading {
            symbol: symbol.clone(),
        };
        tracing::debug!(token = self.latest.get(), %symbol, "lookup issued");
        Some(LookupTicket {
            token: self.latest,
            symbol,
        })
    }

    /// Apply a settled fetch if it belongs to the lookup still in progress.
    pub fn complete(
        &mut self,
        token: RequestToken,
        outcome: Result<Report, FetchError>,
    ) -> Applied {
        let symbol = match &self.state {
            SessionState::Loading { symbol } if token == self.latest => symbol.clone(),
            _ => {
                tracing::debug!(
                    token = token.get(),
                    latest = self.latest.get(),
                    "dropping stale lookup outcome"
                );
                return Applied::Stale;
            }
        };

        match outcome {
            Ok(report) => {
                tracing::info!(%symbol, "report loaded");
                self.history.record(&symbol);
                self.state = SessionState::Loaded { symbol, report };
                Applied::Loaded
            }
            Err(e) => {
                tracing::info!(%symbol, error = %e, "lookup failed");
                self.state = SessionState::Failed {
                    symbol,
                    message: e.message(),
                };
                Applied::Failed
            }
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
