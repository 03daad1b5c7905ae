//! GoTrue auth API.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::instrument;

use super::client::SupabaseClient;
use crate::backend::models::{AuthSession, AuthUser, Role};
use crate::backend::repository::AuthRepository;
use crate::backend::BackendResult;

/// Sign-up metadata copied into `profiles` by the project's trigger.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SignUpMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
}

/// Sign-up answers with a session when email confirmation is off, and with
/// the bare user otherwise.
#[derive(Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(AuthSession),
    User(AuthUser),
}

#[derive(Clone)]
pub struct SupabaseAuth {
    client: SupabaseClient,
}

impl SupabaseAuth {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    /// Password sign-in.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthSession> {
        let response = self
            .client
            .auth_request(Method::POST, "/token", None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        SupabaseClient::handle_response(response).await
    }

    /// Register a new user. Returns the created user.
    #[instrument(skip(self, password))]
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: &SignUpMetadata,
    ) -> BackendResult<AuthUser> {
        let response = self
            .client
            .auth_request(Method::POST, "/signup", None)
            .json(&json!({ "email": email, "password": password, "data": metadata }))
            .send()
            .await?;
        let parsed: SignUpResponse = SupabaseClient::handle_response(response).await?;
        Ok(match parsed {
            SignUpResponse::Session(session) => session.user,
            SignUpResponse::User(user) => user,
        })
    }

    /// Revoke the session behind an access token.
    #[instrument(skip(self, access_token))]
    pub async fn sign_out(&self, access_token: &str) -> BackendResult<()> {
        let response = self
            .client
            .auth_request(Method::POST, "/logout", Some(access_token))
            .send()
            .await?;
        SupabaseClient::handle_response(response).await
    }

    /// Create a confirmed user through the admin API (service role).
    #[instrument(skip(self, password))]
    pub async fn admin_create_user(
        &self,
        email: &str,
        password: &str,
        full_name: Option<&str>,
    ) -> BackendResult<AuthUser> {
        let response = self
            .client
            .auth_admin_request(Method::POST, "/users")
            .json(&json!({
                "email": email,
                "password": password,
                "email_confirm": true,
                "user_metadata": { "full_name": full_name, "role": Role::Admin },
            }))
            .send()
            .await?;
        SupabaseClient::handle_response(response).await
    }
}

impl AuthRepository for SupabaseAuth {
    #[instrument(skip_all)]
    async fn user_from_token(&self, access_token: &str) -> BackendResult<AuthUser> {
        let response = self
            .client
            .auth_request(Method::GET, "/user", Some(access_token))
            .send()
            .await?;
        SupabaseClient::handle_response(response).await
    }
}
