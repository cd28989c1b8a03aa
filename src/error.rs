use thiserror::Error;

/// Shown when a failure carries no usable text of its own.
pub const GENERIC_FETCH_ERROR: &str = "Failed to fetch volatility data";

/// Why a report lookup failed. Both variants are terminal; nothing retries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The service answered with a non-success status.
    #[error("{detail}")]
    Service { status: u16, detail: String },
    /// The service could not be reached or its body could not be read.
    #[error("{0}")]
    Transport(String),
}

impl FetchError {
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            FetchError::Transport(GENERIC_FETCH_ERROR.to_string())
        } else {
            FetchError::Transport(message)
        }
    }

    /// User-facing message for the failed state.
    pub fn message(&self) -> String {
        self.to_string()
    }
}
