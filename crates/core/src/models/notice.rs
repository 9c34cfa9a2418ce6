use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Styling class of a user-visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Success,
    /// Neutral information, e.g. an update that changed nothing
    Info,
    /// Rejected input
    Warning,
    /// Transport or backend failure
    Danger,
}

impl std::fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoticeLevel::Success => write!(f, "success"),
            NoticeLevel::Info => write!(f, "info"),
            NoticeLevel::Warning => write!(f, "warning"),
            NoticeLevel::Danger => write!(f, "danger"),
        }
    }
}

/// A non-blocking notification for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }

    /// Validation failures become warnings, everything else is a danger notice.
    pub fn from_error(error: &CoreError) -> Self {
        let level = match error {
            CoreError::Validation(_) | CoreError::PurchaseNotFound(_) => NoticeLevel::Warning,
            _ => NoticeLevel::Danger,
        };
        Self::new(level, error.to_string())
    }
}
