//! Serve command - starts the marketplace API and payment functions

use std::net::IpAddr;

use crate::api::{self, AppState, Config};
use crate::backend::{Backend, MemoryBackend, SupabaseBackend};
use crate::cli::error::{CliError, CliResult};
use crate::config::Settings;

/// Flags for `tutorhub serve`; each overrides its environment value.
#[derive(Debug, Default, Clone)]
pub struct ServeOptions {
    pub host: Option<IpAddr>,
    pub port: Option<u16>,
    pub docs: bool,
    pub in_memory: bool,
}

/// Which backend the server will talk to.
pub(crate) fn backend_label(settings: &Settings, in_memory: bool) -> CliResult<String> {
    if in_memory {
        return Ok("in-memory (data is lost on exit)".to_string());
    }
    settings
        .supabase
        .as_ref()
        .map(|s| s.url.clone())
        .ok_or(CliError::BackendNotConfigured)
}

fn print_banner(config: &Config, settings: &Settings, backend: &str) {
    let base = format!("http://{}:{}", config.host, config.port);
    println!();
    println!("🚀 tutorhub server starting...");
    println!("   API:       {}/api/v1", base);
    println!("   Functions: {}/functions/v1", base);
    if config.enable_docs {
        println!("   Docs:      {}/docs", base);
    }
    println!();
    println!("   Backend:   {}", backend);
    if settings.stripe.secret_key.is_none() {
        println!("   Payments:  STRIPE_SECRET_KEY not set, paid checkout disabled");
    }
    if settings.mail.api_key.is_none() {
        println!("   Mail:      RESEND_API_KEY not set, payment emails are only logged");
    }
    println!();
}

async fn run_with<B: Backend>(config: Config, backend: B, settings: Settings) -> CliResult<()> {
    let state = AppState::new(backend, settings);
    api::run(config, state).await.map_err(|e| CliError::Server {
        message: e.to_string(),
    })
}

/// Run the HTTP server until it fails or the process is stopped.
pub async fn run(settings: Settings, options: ServeOptions) -> CliResult<()> {
    let config = Config::from_settings(&settings)
        .with_host(options.host)
        .with_port(options.port)
        .with_docs(options.docs);

    let label = backend_label(&settings, options.in_memory)?;
    print_banner(&config, &settings, &label);

    let supabase = settings
        .supabase
        .as_ref()
        .filter(|_| !options.in_memory)
        .map(SupabaseBackend::new);

    match supabase {
        Some(backend) => run_with(config, backend, settings).await,
        None => run_with(config, MemoryBackend::new(), settings).await,
    }
}
