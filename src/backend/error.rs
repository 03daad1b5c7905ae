//! Backend error types.
//!
//! Errors returned by the managed backend (PostgREST, auth, functions) and
//! by the in-memory implementation share this type, so callers never need
//! to know which storage they talk to.

use miette::Diagnostic;
use thiserror::Error;

/// PostgREST code for "single row requested, zero (or many) returned".
pub const ROW_NOT_FOUND_CODE: &str = "PGRST116";

/// Managed backend operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum BackendError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(tutorhub::backend::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Backend error ({status}): {message}")]
    #[diagnostic(code(tutorhub::backend::api_error))]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Unauthorized: {message}")]
    #[diagnostic(
        code(tutorhub::backend::unauthorized),
        help("The access token is missing, expired or was issued for another project.")
    )]
    Unauthorized { message: String },

    #[error("Validation error: {message}")]
    #[diagnostic(code(tutorhub::backend::validation_error))]
    Validation { message: String },

    #[error("Failed to reach backend: {source}")]
    #[diagnostic(
        code(tutorhub::backend::http),
        help("Check SUPABASE_URL and network connectivity.")
    )]
    Http {
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response from backend: {message}")]
    #[diagnostic(code(tutorhub::backend::decode))]
    Decode { message: String },
}

impl BackendError {
    pub fn not_found(entity_type: &str, id: impl Into<String>) -> Self {
        BackendError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        BackendError::Validation {
            message: message.into(),
        }
    }

    /// True for the "row not found" case, however the backend reported it.
    pub fn is_not_found(&self) -> bool {
        match self {
            BackendError::NotFound { .. } => true,
            BackendError::Api { code, .. } => code.as_deref() == Some(ROW_NOT_FOUND_CODE),
            _ => false,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            BackendError::Decode {
                message: e.to_string(),
            }
        } else {
            BackendError::Http { source: e }
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Decode {
            message: e.to_string(),
        }
    }
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
