use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backend::query::Query;
use crate::backend::{BackendError, BackendResult};
use crate::config::SupabaseSettings;

const OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

/// HTTP client for a Supabase project: PostgREST tables, RPC, auth and
/// edge functions.
///
/// Table and RPC calls authenticate with the service-role key. Auth calls
/// use the anon key plus the caller's access token where one applies.
#[derive(Clone)]
pub struct SupabaseClient {
    base_url: String,
    anon_key: String,
    service_role_key: String,
    client: Client,
}

/// Error body shapes returned by PostgREST and GoTrue.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

impl ErrorBody {
    fn message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .map(|m| match &self.details {
                Some(details) if !details.is_empty() => format!("{} ({})", m, details),
                _ => m,
            })
    }

    fn code(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl SupabaseClient {
    pub fn new(settings: &SupabaseSettings) -> Self {
        Self {
            base_url: settings.url.trim_end_matches('/').to_string(),
            anon_key: settings.anon_key.clone(),
            service_role_key: settings.service_role_key.clone(),
            client: Client::new(),
        }
    }

    /// Get the project URL being used
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Request builder authenticated as the service role.
    fn service(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    /// Request builder for auth endpoints: anon key plus an optional user token.
    pub(crate) fn auth_request(
        &self,
        method: reqwest::Method,
        path: &str,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        let url = format!("{}/auth/v1{}", self.base_url, path);
        let builder = self
            .client
            .request(method, &url)
            .header("apikey", &self.anon_key);
        match access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder.bearer_auth(&self.anon_key),
        }
    }

    /// Request builder for admin auth endpoints (service role).
    pub(crate) fn auth_admin_request(&self, method: reqwest::Method, path: &str) -> RequestBuilder {
        let url = format!("{}/auth/v1/admin{}", self.base_url, path);
        self.service(self.client.request(method, &url))
    }

    /// `GET /rest/v1/{table}` returning every matching row.
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> BackendResult<Vec<T>> {
        debug!(table, "select");
        let response = self
            .service(self.client.get(self.rest_url(table)))
            .query(&query.to_pairs())
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// `GET /rest/v1/{table}` expecting exactly one row.
    ///
    /// Zero rows surfaces as a `PGRST116` API error; see
    /// [`BackendError::is_not_found`].
    pub async fn select_single<T: DeserializeOwned>(&self, table: &str, query: &Query) -> BackendResult<T> {
        debug!(table, "select single");
        let response = self
            .service(self.client.get(self.rest_url(table)))
            .header("Accept", OBJECT_MEDIA_TYPE)
            .query(&query.to_pairs())
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// First matching row, if any.
    pub async fn select_maybe<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &Query,
    ) -> BackendResult<Option<T>> {
        let rows: Vec<T> = self.select(table, &query.clone().limit(1)).await?;
        Ok(rows.into_iter().next())
    }

    /// `POST /rest/v1/{table}` returning the inserted row.
    pub async fn insert<B, T>(&self, table: &str, row: &B) -> BackendResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, "insert");
        let response = self
            .service(self.client.post(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .header("Accept", OBJECT_MEDIA_TYPE)
            .json(row)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// `PATCH /rest/v1/{table}` on the single row matched by `query`,
    /// returning the updated row.
    pub async fn update<B, T>(&self, table: &str, query: &Query, patch: &B) -> BackendResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(table, "update");
        let response = self
            .service(self.client.patch(self.rest_url(table)))
            .header("Prefer", "return=representation")
            .header("Accept", OBJECT_MEDIA_TYPE)
            .query(&query.to_pairs())
            .json(patch)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// `POST /rest/v1/rpc/{function}`.
    pub async fn rpc<A, T>(&self, function: &str, args: &A) -> BackendResult<T>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(function, "rpc");
        let response = self
            .service(self.client.post(self.rest_url(&format!("rpc/{}", function))))
            .json(args)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// `POST /functions/v1/{name}` with a JSON body.
    ///
    /// Uses the caller's access token when given, the anon key otherwise.
    pub async fn invoke<A, T>(&self, name: &str, body: &A, access_token: Option<&str>) -> BackendResult<T>
    where
        A: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!(function = name, "invoke");
        let url = format!("{}/functions/v1/{}", self.base_url, name);
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token.unwrap_or(&self.anon_key))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Handle a backend response with standardized error handling
    ///
    /// Returns the deserialized response body on success, otherwise maps the
    /// error body onto [`BackendError`].
    pub(crate) async fn handle_response<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
        let status = response.status();
        if status.is_success() {
            let bytes = response.bytes().await?;
            // 204 from endpoints like logout: let unit-like targets decode from `null`.
            let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
            return Ok(serde_json::from_slice(body)?);
        }

        let text = response.text().await.unwrap_or_default();
        let body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = body.message().unwrap_or_else(|| {
            if text.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                text.clone()
            }
        });

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized { message });
        }

        Err(BackendError::Api {
            status: status.as_u16(),
            code: body.code(),
            message,
        })
    }
}
