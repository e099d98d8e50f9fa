//! Error handling and custom error types
//!
//! Provides unified error handling across the client using thiserror. Every
//! failed capability call resolves to one of these variants; [`Error::kind`]
//! collapses them into the coarse [`FailureKind`] the bot transport branches on.

use reqwest::StatusCode;
use thiserror::Error;

/// Coarse failure category surfaced to callers of the capability facade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    RetriesExhausted,
    ProviderRejected,
    MalformedResponse,
    InvalidVoice,
    EmptyResponse,
    EmptyInput,
    Config,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("API call failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: usize, last_error: String },

    #[error("Provider rejected the request: {0}")]
    ProviderRejected(String),

    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),

    #[error("Unknown voice '{0}'")]
    InvalidVoice(String),

    #[error("Provider response contained no usable payload: {0}")]
    EmptyResponse(String),

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::Http(_) | Error::Status { .. } | Error::Io(_) => FailureKind::Transport,
            Error::RetriesExhausted { .. } => FailureKind::RetriesExhausted,
            Error::ProviderRejected(_) => FailureKind::ProviderRejected,
            Error::MalformedResponse(_) => FailureKind::MalformedResponse,
            Error::InvalidVoice(_) => FailureKind::InvalidVoice,
            Error::EmptyResponse(_) => FailureKind::EmptyResponse,
            Error::EmptyInput(_) => FailureKind::EmptyInput,
            Error::Config(_) => FailureKind::Config,
        }
    }

    /// Text suitable for replying to the end user in the chat.
    pub fn user_message(&self) -> String {
        match self {
            Error::ProviderRejected(message) => {
                format!("Sorry, the image model rejected that prompt: {}", message)
            }
            Error::InvalidVoice(voice) => format!(
                "Invalid voice name '{}'. Available voices are:\n{}",
                voice,
                crate::voices::VoiceCatalog::names().join(", ")
            ),
            Error::EmptyInput(what) => format!("Please provide {}.", what),
            Error::RetriesExhausted { .. } => {
                "The AI service is busy right now. Please try again in a minute.".to_string()
            }
            Error::Http(_) | Error::Status { .. } => {
                "Sorry, I couldn't connect to the AI service.".to_string()
            }
            Error::Io(_) => "Sorry, I couldn't save the result.".to_string(),
            Error::EmptyResponse(_) => "Sorry, the AI service returned an empty answer.".to_string(),
            Error::MalformedResponse(_) => {
                "Sorry, the AI service returned something I couldn't understand.".to_string()
            }
            Error::Config(_) => {
                "The bot is misconfigured. Please contact the operator.".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
