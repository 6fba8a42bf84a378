//! Error types for the Azure AD profile provider

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AadError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Fetch error for {uri}: {message}")]
    FetchError {
        uri: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Handler error for entity {path}: {message}")]
    HandlerError { path: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AadError {
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn fetch_error(
        uri: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self::FetchError {
            uri: uri.into(),
            status,
            message: message.into(),
        }
    }

    pub fn handler_error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::HandlerError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status of a failed fetch, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::FetchError { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<config::ConfigError> for AadError {
    fn from(err: config::ConfigError) -> Self {
        Self::config_error(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AadError>;
