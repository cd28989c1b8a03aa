//! Recently viewed symbols, most recent first.
//!
//! The in-memory list is authoritative; the persisted copy is rewritten after
//! every mutation and read back only by [`HistoryStore::load`].

use crate::storage::KeyValueStore;
use crate::symbol::Symbol;

/// Storage key holding the JSON array of symbols.
pub const HISTORY_KEY: &str = "volatility_history";
pub const MAX_HISTORY: usize = 10;

/// A symbol and its recency rank (0 = most recently used).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub rank: usize,
    pub symbol: Symbol,
}

pub struct HistoryStore {
    entries: Vec<Symbol>,
    store: Box<dyn KeyValueStore>,
}

impl HistoryStore {
    /// Create a store backed by `store` and load whatever it already holds.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let mut history = Self {
            entries: Vec::new(),
            store,
        };
        history.load();
        history
    }

    /// Re-read the persisted list. Missing or unparsable data yields an empty list.
    pub fn load(&mut self) -> Vec<Symbol> {
        let raw = match self.store.get(HISTORY_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "history read failed; starting empty");
                None
            }
        };
        self.entries = raw.as_deref().map(parse_history).unwrap_or_default();
        self.entries.clone()
    }

    /// Move `symbol` to the front, dropping any older occurrence and anything past capacity.
    pub fn record(&mut self, symbol: &Symbol) {
        self.entries.retain(|s| s != symbol);
        self.entries.insert(0, symbol.clone());
        self.entries.truncate(MAX_HISTORY);
        self.persist();
    }

    /// Forget everything, including the persisted key.
    pub fn clear(&mut self) {
        self.entries.clear();
        if let Err(e) = self.store.remove(HISTORY_KEY) {
            tracing::warn!(error = %format!("{e:#}"), "history remove failed");
        }
    }

    pub fn entries(&self) -> &[Symbol] {
        &self.entries
    }

    pub fn ranked(&self) -> impl Iterator<Item = HistoryEntry> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(rank, symbol)| HistoryEntry {
                rank,
                symbol: symbol.clone(),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) {
        let body = match serde_json::to_string(&self.entries) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "history serialize failed");
                return;
            }
        };
        if let Err(e) = self.store.set(HISTORY_KEY, &body) {
            tracing::warn!(error = %format!("{e:#}"), "history write failed");
        }
    }
}

/// Parse the stored JSON array. Entries are re-normalized; blanks, non-strings
/// and duplicates are dropped and the result is capped at [`MAX_HISTORY`].
fn parse_history(raw: &str) -> Vec<Symbol> {
    let values: Vec<serde_json::Value> = match serde_json::from_str(raw) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(error = %e, "stored history is corrupt; ignoring it");
            return Vec::new();
        }
    };
    let mut out: Vec<Symbol> = Vec::with_capacity(values.len().min(MAX_HISTORY));
    for symbol in values
        .iter()
        .filter_map(|v| v.as_str())
        .filter_map(|s| Symbol::parse(s).ok())
    {
        if !out.contains(&symbol) {
            out.push(symbol);
        }
        if out.len() == MAX_HISTORY {
            break;
        }
    }
    out
}
