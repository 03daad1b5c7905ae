//! Payment request emails.
//!
//! Delivered through the Resend HTTP API when a key is configured. Without
//! a key the composed message is logged instead, so local setups work
//! without mail credentials.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::MailSettings;
use crate::payments::{PaymentError, PaymentResult};

/// What the caller asks us to send.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentEmailRequest {
    pub student_email: String,
    pub course_title: String,
    pub amount: f64,
    pub payment_request_id: String,
}

/// A composed message, ready to deliver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub pay_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by the mail API, with its message id
    Sent { id: String },
    /// No API key; the message was written to the log
    Logged,
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Deserialize)]
struct ResendResponse {
    #[serde(default)]
    id: String,
}

/// Build the payment email for a request.
pub fn compose_payment_email(
    request: &PaymentEmailRequest,
    site_url: &str,
    currency: &str,
) -> OutgoingEmail {
    let pay_link = format!(
        "{}/payment/{}",
        site_url.trim_end_matches('/'),
        request.payment_request_id
    );
    let amount = format!("{:.2} {}", request.amount, currency.to_ascii_uppercase());
    let subject = format!("Payment request: {}", request.course_title);
    let html = format!(
        "<h2>Payment request</h2>\
         <p>You have a pending payment for <strong>{}</strong>.</p>\
         <p>Amount due: <strong>{}</strong></p>\
         <p><a href=\"{}\">Pay now</a></p>",
        request.course_title, amount, pay_link
    );

    OutgoingEmail {
        to: request.student_email.clone(),
        subject,
        html,
        pay_link,
    }
}

#[derive(Clone)]
pub struct Mailer {
    api_key: Option<String>,
    api_base: String,
    from: String,
    client: Client,
}

impl Mailer {
    pub fn new(settings: &MailSettings) -> Self {
        Self {
            api_key: settings.api_key.clone(),
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            from: settings.from.clone(),
            client: Client::new(),
        }
    }

    #[instrument(skip(self, email), fields(to = %email.to))]
    pub async fn send(&self, email: &OutgoingEmail) -> PaymentResult<Delivery> {
        let Some(key) = &self.api_key else {
            info!(
                subject = %email.subject,
                pay_link = %email.pay_link,
                "Mail delivery not configured; payment email logged only"
            );
            return Ok(Delivery::Logged);
        };

        let response = self
            .client
            .post(format!("{}/emails", self.api_base))
            .bearer_auth(key)
            .json(&ResendRequest {
                from: &self.from,
                to: [&email.to],
                subject: &email.subject,
                html: &email.html,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PaymentError::Mail {
                status: status.as_u16(),
                message,
            });
        }

        let body: ResendResponse = response.json().await?;
        info!(id = %body.id, "Payment email sent");
        Ok(Delivery::Sent { id: body.id })
    }
}
