//! Runtime configuration read from the process environment.
//!
//! A `.env` file in the working directory is loaded first if present;
//! variables already set in the environment win. CLI flags are applied on
//! top by the caller.

use std::env;
use std::net::IpAddr;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_PORT: u16 = 3737;
pub const DEFAULT_SITE_URL: &str = "http://localhost:5173";
pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";
pub const DEFAULT_RESEND_API_BASE: &str = "https://api.resend.com";
pub const DEFAULT_CURRENCY: &str = "usd";
pub const DEFAULT_MAIL_FROM: &str = "Tutorhub <noreply@tutorhub.app>";

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing environment variable {var}")]
    #[diagnostic(
        code(tutorhub::config::missing),
        help("Set {var} in the environment or in a .env file.")
    )]
    Missing { var: String },

    #[error("Invalid value for {var}: {message}")]
    #[diagnostic(code(tutorhub::config::invalid))]
    Invalid { var: String, message: String },
}

/// Managed backend project credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseSettings {
    /// Project URL, without trailing slash
    pub url: String,
    /// Public anon key, used for user-scoped auth calls
    pub anon_key: String,
    /// Service-role key, used for table access from functions and the CLI
    pub service_role_key: String,
}

/// Payment processor settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripeSettings {
    pub secret_key: Option<String>,
    pub api_base: String,
    pub currency: String,
}

/// Outgoing email settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailSettings {
    /// Delivery is skipped (logged only) when unset
    pub api_key: Option<String>,
    pub api_base: String,
    pub from: String,
}

/// Everything the server and CLI read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub supabase: Option<SupabaseSettings>,
    pub stripe: StripeSettings,
    pub mail: MailSettings,
    /// Fallback origin for checkout redirects and payment links
    pub site_url: String,
    pub host: IpAddr,
    pub port: u16,
}

impl Settings {
    /// Load settings from `.env` and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => warn!("Ignoring unreadable .env file: {}", e),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let supabase = match var("SUPABASE_URL") {
            Some(url) => Some(SupabaseSettings {
                url: url.trim_end_matches('/').to_string(),
                anon_key: var("SUPABASE_ANON_KEY").ok_or_else(|| missing("SUPABASE_ANON_KEY"))?,
                service_role_key: var("SUPABASE_SERVICE_ROLE_KEY")
                    .ok_or_else(|| missing("SUPABASE_SERVICE_ROLE_KEY"))?,
            }),
            None => None,
        };

        let host = match var("TUTORHUB_HOST") {
            Some(h) => h.parse().map_err(|e| invalid("TUTORHUB_HOST", e))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let port = match var("TUTORHUB_PORT") {
            Some(p) => p.parse().map_err(|e| invalid("TUTORHUB_PORT", e))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            supabase,
            stripe: StripeSettings {
                secret_key: var("STRIPE_SECRET_KEY"),
                api_base: var("STRIPE_API_BASE")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_string()),
                currency: var("PAYMENT_CURRENCY")
                    .map(|c| c.to_ascii_lowercase())
                    .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            },
            mail: MailSettings {
                api_key: var("RESEND_API_KEY"),
                api_base: var("RESEND_API_BASE")
                    .map(|u| u.trim_end_matches('/').to_string())
                    .unwrap_or_else(|| DEFAULT_RESEND_API_BASE.to_string()),
                from: var("MAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.to_string()),
            },
            site_url: var("SITE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_SITE_URL.to_string()),
            host,
            port,
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            supabase: None,
            stripe: StripeSettings {
                secret_key: None,
                api_base: DEFAULT_STRIPE_API_BASE.to_string(),
                currency: DEFAULT_CURRENCY.to_string(),
            },
            mail: MailSettings {
                api_key: None,
                api_base: DEFAULT_RESEND_API_BASE.to_string(),
                from: DEFAULT_MAIL_FROM.to_string(),
            },
            site_url: DEFAULT_SITE_URL.to_string(),
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
        }
    }
}

fn missing(var: &str) -> ConfigError {
    ConfigError::Missing {
        var: var.to_string(),
    }
}

fn invalid(var: &str, e: impl std::fmt::Display) -> ConfigError {
    ConfigError::Invalid {
        var: var.to_string(),
        message: e.to_string(),
    }
}
