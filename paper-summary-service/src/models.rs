use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ApiKey;

/// The hosted models offered in the selector, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ModelId {
    #[default]
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,
    #[serde(rename = "gemini-2.0-flash")]
    Gemini20Flash,
}

impl ModelId {
    pub const ALL: [ModelId; 3] = [
        ModelId::Gemini25Pro,
        ModelId::Gemini25Flash,
        ModelId::Gemini20Flash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Gemini25Pro => "gemini-2.5-pro",
            ModelId::Gemini25Flash => "gemini-2.5-flash",
            ModelId::Gemini20Flash => "gemini-2.0-flash",
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown model: {0}")]
pub struct UnknownModel(pub String);

impl FromStr for ModelId {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelId::ALL
            .into_iter()
            .find(|model| model.as_str() == s.trim())
            .ok_or_else(|| UnknownModel(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Error,
    Warning,
}

/// A user-visible notification produced while handling one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }
}

/// Everything one run action produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub notices: Vec<Notice>,
    pub summary: Option<String>,
    pub extracted_chars: Option<usize>,
}

impl RunOutcome {
    pub fn with_notice(notice: Notice) -> Self {
        Self {
            notices: vec![notice],
            ..Default::default()
        }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|notice| notice.level == NoticeLevel::Error)
    }
}

/// Decided once at startup from the secret store.
#[derive(Debug, Clone)]
pub enum ShellState {
    /// No API key: terminal, nothing but the administrator message is served.
    Blocked,
    Ready { api_key: ApiKey },
}

impl ShellState {
    pub fn from_api_key(api_key: Option<ApiKey>) -> Self {
        match api_key {
            Some(api_key) => ShellState::Ready { api_key },
            None => ShellState::Blocked,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, ShellState::Blocked)
    }
}
