mod auth;
mod error;
pub mod functions;
pub mod routes;
mod state;
pub mod v1;

#[cfg(test)]
mod mod_test;

use std::net::IpAddr;

use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::backend::Backend;
use crate::config::Settings;

pub use auth::Caller;
pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

/// API server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Host address to bind to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Serve interactive API docs at /docs
    pub enable_docs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl Config {
    /// Bind address from the environment settings; docs off.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            host: settings.host,
            port: settings.port,
            enable_docs: false,
        }
    }

    pub fn with_host(mut self, host: Option<IpAddr>) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn with_docs(mut self, enable_docs: bool) -> Self {
        self.enable_docs = enable_docs;
        self
    }
}

/// Initialize tracing subscriber with env filter
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutorhub=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Run the API server with the given configuration
pub async fn run<B: Backend>(config: Config, state: AppState<B>) -> Result<(), Box<dyn std::error::Error>> {
    let app = routes::create_router(state, config.enable_docs).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
