use miette::Diagnostic;
use thiserror::Error;

use crate::backend::BackendError;
use crate::config::ConfigError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Backend(#[from] BackendError),

    #[error("Supabase is not configured")]
    #[diagnostic(
        code(tutorhub::cli::backend_missing),
        help(
            "Set SUPABASE_URL, SUPABASE_ANON_KEY and SUPABASE_SERVICE_ROLE_KEY.\nTo run the server without a project, use: tutorhub serve --in-memory"
        )
    )]
    BackendNotConfigured,

    #[error("No profile found for {email}")]
    #[diagnostic(
        code(tutorhub::cli::profile_not_found),
        help("The user must sign up before it can be promoted.")
    )]
    ProfileNotFound { email: String },

    #[error("Invalid input: {message}")]
    #[diagnostic(code(tutorhub::cli::invalid_input))]
    InvalidInput { message: String },

    #[error("Server error: {message}")]
    #[diagnostic(code(tutorhub::cli::server))]
    Server { message: String },
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::InvalidInput {
            message: e.to_string(),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
