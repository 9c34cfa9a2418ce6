use thiserror::Error;

/// Unified error type for the entire purchase-dashboard-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Transport / Backend ─────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({endpoint}): {message}")]
    Api {
        endpoint: String,
        message: String,
    },

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── User input ──────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Purchase not found: {0}")]
    PurchaseNotFound(String),

    // ── Setup / Lifecycle ───────────────────────────────────────────
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Dashboard is no longer running")]
    Unavailable,
}

impl CoreError {
    /// True for failures the user caused (bad input), as opposed to
    /// transport or backend failures. Drives the notice styling.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::Validation(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors carry the full URL; drop the query string so
        // market filters and tokens don't end up in user-facing notices.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}

impl<T> From<tokio::sync::mpsc::error::SendError<T>> for CoreError {
    fn from(_: tokio::sync::mpsc::error::SendError<T>) -> Self {
        CoreError::Unavailable
    }
}
