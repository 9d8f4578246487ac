//! Error taxonomy for upstream searches
//!
//! Errors travel as values all the way to the rendering layer, which shows them
//! inline. An empty result set is not an error.

use serde::Serialize;
use serde_json::Value;

/// Longest upstream body excerpt kept in an [`BvsError::HttpStatus`] message
pub const MAX_ERROR_BODY_CHARS: usize = 200;

/// Failure of a single search render
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BvsError {
    #[error("Configuration error for {resource}: {message}")]
    Configuration { resource: String, message: String },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("HTTP error [{code}]: {message}")]
    HttpStatus { code: u16, message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },
}

impl BvsError {
    pub fn configuration(resource: impl Into<String>, message: impl Into<String>) -> Self {
        BvsError::Configuration {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        BvsError::Connection {
            message: message.into(),
        }
    }

    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            BvsError::Configuration { .. } => "configuration",
            BvsError::Connection { .. } => "connection",
            BvsError::HttpStatus { .. } => "http_status",
            BvsError::Decode { .. } => "decode",
        }
    }
}

/// Classify a completed HTTP exchange
///
/// Anything but 200 becomes [`BvsError::HttpStatus`]; a 200 whose body is not
/// JSON becomes [`BvsError::Decode`].
pub fn classify_response(status: u16, body: &str) -> Result<Value, BvsError> {
    if status != 200 {
        return Err(BvsError::HttpStatus {
            code: status,
            message: excerpt(body),
        });
    }

    serde_json::from_str(body).map_err(|e| BvsError::Decode {
        message: e.to_string(),
    })
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        return trimmed.to_string();
    }
    let mut cut: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
    cut.push('…');
    cut
}
