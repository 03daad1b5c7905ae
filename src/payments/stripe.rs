//! Stripe Checkout client.
//!
//! Only the two calls the checkout flow needs: create a hosted checkout
//! session and retrieve it afterwards. Requests are form-encoded and
//! authenticated with the secret key as a bearer token.

use std::collections::HashMap;

use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::StripeSettings;
use crate::payments::{PaymentError, PaymentResult};

/// One-item checkout session to create.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    pub product_name: String,
    /// Price in minor currency units
    pub unit_amount: i64,
    pub currency: String,
    pub customer_email: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
    pub metadata: Vec<(String, String)>,
}

impl CheckoutRequest {
    /// Flatten into Stripe's bracketed form fields.
    pub fn to_form(&self) -> Vec<(String, String)> {
        let mut form = vec![
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            (
                "line_items[0][price_data][currency]".to_string(),
                self.currency.clone(),
            ),
            (
                "line_items[0][price_data][product_data][name]".to_string(),
                self.product_name.clone(),
            ),
            (
                "line_items[0][price_data][unit_amount]".to_string(),
                self.unit_amount.to_string(),
            ),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("success_url".to_string(), self.success_url.clone()),
            ("cancel_url".to_string(), self.cancel_url.clone()),
        ];
        if let Some(email) = &self.customer_email {
            form.push(("customer_email".to_string(), email.clone()));
        }
        for (key, value) in &self.metadata {
            form.push((format!("metadata[{}]", key), value.clone()));
        }
        form
    }
}

/// The fields of a checkout session this crate reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    /// `paid`, `unpaid` or `no_payment_required`
    pub payment_status: String,
    /// `open`, `complete` or `expired`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.payment_status == "paid"
    }

    pub fn is_expired(&self) -> bool {
        self.status.as_deref() == Some("expired")
    }

    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// Convert a decimal price to minor units (cents).
pub fn to_minor_units(amount: f64) -> PaymentResult<i64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(PaymentError::InvalidAmount { amount });
    }
    Ok((amount * 100.0).round() as i64)
}

#[derive(Clone)]
pub struct StripeClient {
    api_base: String,
    secret_key: Option<String>,
    currency: String,
    client: Client,
}

impl StripeClient {
    pub fn new(settings: &StripeSettings) -> Self {
        Self {
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            secret_key: settings.secret_key.clone(),
            currency: settings.currency.clone(),
            client: Client::new(),
        }
    }

    /// Currency used for new checkout sessions.
    pub fn currency(&self) -> &str {
        &self.currency
    }

    fn secret_key(&self) -> PaymentResult<&str> {
        self.secret_key
            .as_deref()
            .ok_or(PaymentError::NotConfigured)
    }

    #[instrument(skip(self, request), fields(amount = request.unit_amount))]
    pub async fn create_checkout_session(&self, request: &CheckoutRequest) -> PaymentResult<CheckoutSession> {
        let key = self.secret_key()?;
        let url = format!("{}/v1/checkout/sessions", self.api_base);
        let response = self
            .client
            .post(&url)
            .bearer_auth(key)
            .form(&request.to_form())
            .send()
            .await?;
        let session: CheckoutSession = Self::handle_response(response).await?;
        debug!(session_id = %session.id, "Created checkout session");
        Ok(session)
    }

    #[instrument(skip(self))]
    pub async fn retrieve_session(&self, session_id: &str) -> PaymentResult<CheckoutSession> {
        let key = self.secret_key()?;
        if session_id.is_empty() || !session_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PaymentError::validation("Invalid session id"));
        }
        let url = format!("{}/v1/checkout/sessions/{}", self.api_base, session_id);
        let response = self.client.get(&url).bearer_auth(key).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: DeserializeOwned>(response: Response) -> PaymentResult<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }
        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&text)
            .ok()
            .and_then(|e| e.error)
            .and_then(|e| e.message)
            .unwrap_or(text);
        Err(PaymentError::Processor {
            status: status.as_u16(),
            message,
        })
    }
}
