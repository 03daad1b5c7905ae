use axum::{Json, Router, http::HeaderMap, routing::post};
use serde_json::{Value, json};

use crate::config::MailSettings;
use crate::payments::mailer::{Delivery, Mailer, PaymentEmailRequest, compose_payment_email};
use crate::payments::PaymentError;
use crate::test_support::{init_crypto, spawn_server};

fn request() -> PaymentEmailRequest {
    PaymentEmailRequest {
        student_email: "dan@example.com".to_string(),
        course_title: "Torah Basics".to_string(),
        amount: 49.5,
        payment_request_id: "pr-7".to_string(),
    }
}

fn settings(api_key: Option<&str>, api_base: &str) -> MailSettings {
    MailSettings {
        api_key: api_key.map(str::to_string),
        api_base: api_base.to_string(),
        from: "Tutorhub <noreply@tutorhub.app>".to_string(),
    }
}

#[test]
fn email_names_course_amount_and_link() {
    let email = compose_payment_email(&request(), "https://tutorhub.app/", "usd");
    assert_eq!(email.to, "dan@example.com");
    assert_eq!(email.pay_link, "https://tutorhub.app/payment/pr-7");
    assert!(email.subject.contains("Torah Basics"));
    assert!(email.html.contains("49.50 USD"));
    assert!(email.html.contains("href=\"https://tutorhub.app/payment/pr-7\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn without_key_the_email_is_only_logged() {
    init_crypto();
    let mailer = Mailer::new(&settings(None, "http://127.0.0.1:9"));
    let email = compose_payment_email(&request(), "http://localhost:5173", "usd");
    assert_eq!(mailer.send(&email).await.unwrap(), Delivery::Logged);
}

#[tokio::test(flavor = "multi_thread")]
async fn with_key_the_email_is_posted() {
    init_crypto();
    let app = Router::new().route(
        "/emails",
        post(|headers: HeaderMap, Json(body): Json<Value>| async move {
            assert_eq!(
                headers.get("authorization").and_then(|v| v.to_str().ok()),
                Some("Bearer re_test")
            );
            assert_eq!(body["to"], json!(["dan@example.com"]));
            Json(json!({ "id": "email-1" }))
        }),
    );
    let (url, _handle) = spawn_server(app).await;

    let mailer = Mailer::new(&settings(Some("re_test"), &url));
    let email = compose_payment_email(&request(), "http://localhost:5173", "usd");
    assert_eq!(
        mailer.send(&email).await.unwrap(),
        Delivery::Sent {
            id: "email-1".to_string()
        }
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn rejected_delivery_surfaces_status() {
    init_crypto();
    let app = Router::new().route(
        "/emails",
        post(|| async {
            (
                axum::http::StatusCode::UNPROCESSABLE_ENTITY,
                "invalid from address",
            )
        }),
    );
    let (url, _handle) = spawn_server(app).await;

    let mailer = Mailer::new(&settings(Some("re_test"), &url));
    let email = compose_payment_email(&request(), "http://localhost:5173", "usd");
    match mailer.send(&email).await.unwrap_err() {
        PaymentError::Mail { status, message } => {
            assert_eq!(status, 422);
            assert_eq!(message, "invalid from address");
        }
        other => panic!("expected Mail, got {:?}", other),
    }
}
