use crate::config::StripeSettings;
use crate::payments::stripe::{CheckoutRequest, StripeClient, to_minor_units};
use crate::payments::PaymentError;
use crate::test_support::{FakeStripe, init_crypto};

fn request() -> CheckoutRequest {
    CheckoutRequest {
        product_name: "Intro to Hebrew".to_string(),
        unit_amount: 1999,
        currency: "usd".to_string(),
        customer_email: Some("dan@example.com".to_string()),
        success_url: "http://app/payment-success?session_id={CHECKOUT_SESSION_ID}".to_string(),
        cancel_url: "http://app/courses/c-1".to_string(),
        metadata: vec![("user_id".to_string(), "s-1".to_string())],
    }
}

#[test]
fn minor_units_round_to_nearest_cent() {
    assert_eq!(to_minor_units(19.99).unwrap(), 1999);
    assert_eq!(to_minor_units(0.1 + 0.2).unwrap(), 30);
    assert_eq!(to_minor_units(50.0).unwrap(), 5000);
    assert!(matches!(
        to_minor_units(0.0),
        Err(PaymentError::InvalidAmount { .. })
    ));
    assert!(to_minor_units(-5.0).is_err());
    assert!(to_minor_units(f64::NAN).is_err());
}

#[test]
fn form_uses_bracketed_keys() {
    let form = request().to_form();
    let get = |key: &str| {
        form.iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };
    assert_eq!(get("mode"), Some("payment"));
    assert_eq!(get("line_items[0][price_data][unit_amount]"), Some("1999"));
    assert_eq!(
        get("line_items[0][price_data][product_data][name]"),
        Some("Intro to Hebrew")
    );
    assert_eq!(get("line_items[0][quantity]"), Some("1"));
    assert_eq!(get("customer_email"), Some("dan@example.com"));
    assert_eq!(get("metadata[user_id]"), Some("s-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn create_and_retrieve_session() {
    let (fake, client) = FakeStripe::spawn().await;

    let session = client.create_checkout_session(&request()).await.unwrap();
    assert_eq!(session.id, "cs_test_1");
    assert!(session.url.is_some());
    assert!(!session.is_paid());
    assert_eq!(fake.created_count(), 1);

    fake.set_status("cs_test_1", "paid", "complete");
    let fetched = client.retrieve_session("cs_test_1").await.unwrap();
    assert!(fetched.is_paid());
    assert_eq!(fetched.metadata("user_id"), Some("s-1"));
    assert_eq!(fetched.amount_total, Some(1999));
}

#[tokio::test(flavor = "multi_thread")]
async fn processor_errors_pass_through_verbatim() {
    let (_fake, client) = FakeStripe::spawn().await;

    let err = client.retrieve_session("cs_missing").await.unwrap_err();
    match err {
        PaymentError::Processor { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "No such checkout.session: 'cs_missing'");
        }
        other => panic!("expected Processor, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_key_is_not_configured() {
    init_crypto();
    let client = StripeClient::new(&StripeSettings {
        secret_key: None,
        api_base: "http://127.0.0.1:9".to_string(),
        currency: "usd".to_string(),
    });
    let err = client.create_checkout_session(&request()).await.unwrap_err();
    assert!(matches!(err, PaymentError::NotConfigured));
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_session_ids_are_rejected_locally() {
    let (_fake, client) = FakeStripe::spawn().await;
    let err = client.retrieve_session("../customers").await.unwrap_err();
    assert!(matches!(err, PaymentError::Validation { .. }));
}
