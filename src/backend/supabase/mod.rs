//! Supabase implementation of the backend traits.

mod auth;
mod client;
mod repositories;


pub use auth::{SignUpMetadata, SupabaseAuth};
pub use client::SupabaseClient;
pub use repositories::*;

use crate::backend::repository::Backend;
use crate::config::SupabaseSettings;

/// Managed backend reached over HTTP.
#[derive(Clone)]
pub struct SupabaseBackend {
    client: SupabaseClient,
    auth: SupabaseAuth,
    profiles: SupabaseProfiles,
    catalog: SupabaseCatalog,
    enrollments: SupabaseEnrollments,
    payments: SupabasePayments,
    donations: SupabaseDonations,
    chat: SupabaseChat,
}

impl SupabaseBackend {
    pub fn new(settings: &SupabaseSettings) -> Self {
        Self::with_client(SupabaseClient::new(settings))
    }

    pub fn with_client(client: SupabaseClient) -> Self {
        Self {
            auth: SupabaseAuth::new(client.clone()),
            profiles: SupabaseProfiles::new(client.clone()),
            catalog: SupabaseCatalog::new(client.clone()),
            enrollments: SupabaseEnrollments::new(client.clone()),
            payments: SupabasePayments::new(client.clone()),
            donations: SupabaseDonations::new(client.clone()),
            chat: SupabaseChat::new(client.clone()),
            client,
        }
    }

    /// The underlying HTTP client, for raw table, RPC and function calls.
    pub fn client(&self) -> &SupabaseClient {
        &self.client
    }
}

impl Backend for SupabaseBackend {
    type Auth = SupabaseAuth;
    type Profiles = SupabaseProfiles;
    type Catalog = SupabaseCatalog;
    type Enrollments = SupabaseEnrollments;
    type Payments = SupabasePayments;
    type Donations = SupabaseDonations;
    type Chat = SupabaseChat;

    fn auth(&self) -> &Self::Auth {
        &self.auth
    }

    fn profiles(&self) -> &Self::Profiles {
        &self.profiles
    }

    fn catalog(&self) -> &Self::Catalog {
        &self.catalog
    }

    fn enrollments(&self) -> &Self::Enrollments {
        &self.enrollments
    }

    fn payments(&self) -> &Self::Payments {
        &self.payments
    }

    fn donations(&self) -> &Self::Donations {
        &self.donations
    }

    fn chat(&self) -> &Self::Chat {
        &self.chat
    }
}
