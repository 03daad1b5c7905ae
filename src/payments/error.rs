use miette::Diagnostic;
use thiserror::Error;

use crate::backend::BackendError;

/// Checkout, verification and payment email errors.
#[derive(Error, Diagnostic, Debug)]
pub enum PaymentError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Backend(#[from] BackendError),

    /// Error reported by the payment processor; the message is passed through verbatim.
    #[error("{message}")]
    #[diagnostic(code(tutorhub::payments::processor))]
    Processor { status: u16, message: String },

    #[error("Payment processor is not configured")]
    #[diagnostic(
        code(tutorhub::payments::not_configured),
        help("Set STRIPE_SECRET_KEY to enable paid checkout.")
    )]
    NotConfigured,

    #[error("Already enrolled")]
    #[diagnostic(code(tutorhub::payments::already_enrolled))]
    AlreadyEnrolled,

    #[error("Invalid amount: {amount}")]
    #[diagnostic(
        code(tutorhub::payments::invalid_amount),
        help("Amounts must be positive and finite.")
    )]
    InvalidAmount { amount: f64 },

    #[error("Checkout session {session_id} is missing metadata field '{field}'")]
    #[diagnostic(code(tutorhub::payments::missing_metadata))]
    MissingMetadata { session_id: String, field: String },

    #[error("Invalid request: {message}")]
    #[diagnostic(code(tutorhub::payments::validation))]
    Validation { message: String },

    #[error("HTTP request failed: {source}")]
    #[diagnostic(code(tutorhub::payments::http))]
    Http {
        #[source]
        source: reqwest::Error,
    },

    #[error("Email delivery failed ({status}): {message}")]
    #[diagnostic(code(tutorhub::payments::mail))]
    Mail { status: u16, message: String },
}

impl PaymentError {
    pub fn validation(message: impl Into<String>) -> Self {
        PaymentError::Validation {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(source: reqwest::Error) -> Self {
        PaymentError::Http { source }
    }
}

pub type PaymentResult<T> = Result<T, PaymentError>;
