//! Application state for the API server.

use std::sync::Arc;

use crate::backend::Backend;
use crate::config::Settings;
use crate::payments::{Mailer, StripeClient};

/// Shared application state.
///
/// Generic over `B: Backend` so handlers run unchanged against the managed
/// backend or the in-memory store. The payment processor and mailer are
/// concrete clients configured from [`Settings`].
pub struct AppState<B: Backend> {
    backend: Arc<B>,
    stripe: StripeClient,
    mailer: Mailer,
    settings: Arc<Settings>,
}

// Manual Clone impl - only the Arcs and clients are cloned, not B
impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            stripe: self.stripe.clone(),
            mailer: self.mailer.clone(),
            settings: Arc::clone(&self.settings),
        }
    }
}

impl<B: Backend> AppState<B> {
    /// Create state with processor and mailer clients built from `settings`.
    pub fn new(backend: B, settings: Settings) -> Self {
        let stripe = StripeClient::new(&settings.stripe);
        Self::with_stripe(backend, stripe, settings)
    }

    /// Create state with an explicit processor client.
    pub fn with_stripe(backend: B, stripe: StripeClient, settings: Settings) -> Self {
        Self {
            backend: Arc::new(backend),
            stripe,
            mailer: Mailer::new(&settings.mail),
            settings: Arc::new(settings),
        }
    }

    /// Get a reference to the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn stripe(&self) -> &StripeClient {
        &self.stripe
    }

    pub fn mailer(&self) -> &Mailer {
        &self.mailer
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
