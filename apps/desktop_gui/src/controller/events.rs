//! UI/backend events and error modeling for desktop GUI controller.

use client_core::{FetchError, FetchErrorKind};
use shared::domain::{CharacterId, CharacterPage, EpisodePage};

use crate::ui::portraits::PortraitImage;

pub enum UiEvent {
    Info(String),
    Error(UiError),
    EpisodesLoaded {
        generation: u64,
        page: u32,
        result: Result<EpisodePage, UiError>,
    },
    CharactersLoaded {
        generation: u64,
        result: Result<CharacterPage, UiError>,
    },
    PortraitLoaded {
        character_id: CharacterId,
        image: PortraitImage,
    },
    PortraitFailed {
        character_id: CharacterId,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Decode,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    EpisodeList,
    CharacterGrid,
    Portrait,
    General,
}

pub fn err_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Transport => "Network",
        UiErrorCategory::Decode => "Data",
        UiErrorCategory::Validation => "Input",
        UiErrorCategory::Unknown => "Unexpected",
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_fetch(context: UiErrorContext, err: &FetchError) -> Self {
        let category = match err.kind() {
            FetchErrorKind::Network => UiErrorCategory::Transport,
            FetchErrorKind::Decode => UiErrorCategory::Decode,
        };
        Self {
            category,
            context,
            message: err.to_string(),
        }
    }

    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("malformed")
            || message_lower.contains("decode")
            || message_lower.contains("expected value")
        {
            UiErrorCategory::Decode
        } else if message_lower.contains("invalid")
            || message_lower.contains("out of range")
            || message_lower.contains("must use")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("dns")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Text shown in the pane that issued the failed request.
    pub fn summary(&self) -> String {
        format!("{} error: {}", err_label(self.category), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_status_errors_are_transport() {
        let err = FetchError::Status {
            url: "http://catalog.test/episode/9".to_string(),
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        let ui_err = UiError::from_fetch(UiErrorContext::CharacterGrid, &err);
        assert_eq!(ui_err.category(), UiErrorCategory::Transport);
        assert_eq!(ui_err.context(), UiErrorContext::CharacterGrid);
        assert!(ui_err.summary().starts_with("Network error: "));
    }

    #[test]
    fn classifies_backend_command_processor_disconnect_as_transport_error() {
        let err = UiError::from_message(
            UiErrorContext::General,
            "Backend command processor disconnected (possible startup failure)",
        );
        assert_eq!(err.category(), UiErrorCategory::Transport);
    }

    #[test]
    fn classifies_config_problems_as_validation() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "base url 'ftp://x' must use http or https",
        );
        assert_eq!(err.category(), UiErrorCategory::Validation);
        assert_eq!(err.message(), "base url 'ftp://x' must use http or https");
    }
}
