//! Shared helpers for tests: local HTTP servers, a fake payment
//! processor and row fixtures.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::{
    Form, Json, Router,
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, Request, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use http_body_util::BodyExt;
use dashmap::DashMap;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::backend::{
    ApprovalStatus, Audience, AuthUser, Course, Gender, LiveClass, MemoryBackend, Profile, Role,
    Teacher,
};
use crate::api::{AppState, routes};
use crate::config::{Settings, StripeSettings};
use crate::payments::StripeClient;

/// Install the rustls crypto provider; reqwest clients need one.
pub fn init_crypto() {
    crate::install_crypto_provider();
}

/// Serve `app` on an ephemeral local port and return its base URL.
pub async fn spawn_server(app: Router) -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = format!("http://{}", addr);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (url, handle)
}

pub fn profile(id: &str, role: Role, status: Option<ApprovalStatus>) -> Profile {
    Profile {
        id: id.to_string(),
        email: Some(format!("{}@example.com", id)),
        full_name: None,
        role,
        approval_status: status,
        gender: None,
        audiences: Vec::new(),
        created_at: None,
    }
}

pub fn teacher(id: &str, name: &str, gender: Option<Gender>, audiences: &[Audience]) -> Teacher {
    Teacher {
        id: id.to_string(),
        user_id: None,
        full_name: name.to_string(),
        gender,
        audiences: audiences.to_vec(),
        specialization: None,
        bio: None,
        hourly_rate: None,
        avatar_url: None,
        is_active: true,
        created_at: None,
    }
}

pub fn course(id: &str, price: Option<f64>, is_free: bool) -> Course {
    Course {
        id: id.to_string(),
        title: format!("Course {}", id),
        description: None,
        teacher_id: None,
        price,
        is_free,
        audiences: Vec::new(),
        is_published: true,
        created_at: None,
    }
}

pub fn live_class(id: &str, price: Option<f64>) -> LiveClass {
    LiveClass {
        id: id.to_string(),
        title: format!("Live {}", id),
        description: None,
        teacher_id: None,
        price,
        is_free: false,
        scheduled_at: None,
        meeting_url: None,
        created_at: None,
    }
}

/// Seed a profile and register `"{id}-token"` as its access token.
pub fn sign_in(backend: &MemoryBackend, profile: Profile) -> String {
    let token = format!("{}-token", profile.id);
    backend.add_session(
        &token,
        AuthUser {
            id: profile.id.clone(),
            email: profile.email.clone(),
        },
    );
    backend.seed_profile(profile);
    token
}

/// Stand-in for the Stripe Checkout API.
///
/// Created sessions start `unpaid`/`open`; tests flip them with
/// [`FakeStripe::set_status`].
#[derive(Clone, Default)]
pub struct FakeStripe {
    created: Arc<Mutex<Vec<HashMap<String, String>>>>,
    sessions: Arc<DashMap<String, Value>>,
    omit_urls: Arc<AtomicBool>,
}

pub const STRIPE_TEST_KEY: &str = "sk_test_123";

impl FakeStripe {
    /// Start the fake server and return a client pointed at it.
    pub async fn spawn() -> (Self, StripeClient) {
        init_crypto();
        let fake = FakeStripe::default();
        let app = Router::new()
            .route("/v1/checkout/sessions", post(fake_create_session))
            .route("/v1/checkout/sessions/{id}", get(fake_retrieve_session))
            .with_state(fake.clone());
        let (url, _handle) = spawn_server(app).await;

        let client = StripeClient::new(&StripeSettings {
            secret_key: Some(STRIPE_TEST_KEY.to_string()),
            api_base: url,
            currency: "usd".to_string(),
        });
        (fake, client)
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    /// Form fields of the most recent create call.
    pub fn last_created(&self) -> Option<HashMap<String, String>> {
        self.created.lock().unwrap().last().cloned()
    }

    pub fn set_status(&self, session_id: &str, payment_status: &str, status: &str) {
        if let Some(mut session) = self.sessions.get_mut(session_id) {
            session["payment_status"] = json!(payment_status);
            session["status"] = json!(status);
        }
    }

    /// Make later create calls return sessions with a null `url`.
    pub fn omit_urls(&self) {
        self.omit_urls.store(true, Ordering::SeqCst);
    }

    /// Register a session directly, bypassing the create call.
    pub fn insert_session(&self, session_id: &str, payment_status: &str, metadata: Value) {
        self.sessions.insert(
            session_id.to_string(),
            json!({
                "id": session_id,
                "url": null,
                "payment_status": payment_status,
                "status": "complete",
                "metadata": metadata
            }),
        );
    }
}

fn stripe_error(status: StatusCode, message: &str) -> axum::response::Response {
    (
        status,
        Json(json!({ "error": { "message": message, "type": "invalid_request_error" } })),
    )
        .into_response()
}

fn stripe_authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok())
        == Some(format!("Bearer {}", STRIPE_TEST_KEY).as_str())
}

async fn fake_create_session(
    State(fake): State<FakeStripe>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> axum::response::Response {
    if !stripe_authorized(&headers) {
        return stripe_error(StatusCode::UNAUTHORIZED, "Invalid API Key provided");
    }
    if form.get("line_items[0][price_data][unit_amount]").map(String::as_str) == Some("0") {
        return stripe_error(StatusCode::BAD_REQUEST, "Invalid integer: 0");
    }

    let id = {
        let mut created = fake.created.lock().unwrap();
        created.push(form.clone());
        format!("cs_test_{}", created.len())
    };
    let metadata: serde_json::Map<String, Value> = form
        .iter()
        .filter_map(|(k, v)| {
            k.strip_prefix("metadata[")
                .and_then(|rest| rest.strip_suffix(']'))
                .map(|key| (key.to_string(), json!(v)))
        })
        .collect();
    let session = json!({
        "id": id,
        "url": (!fake.omit_urls.load(Ordering::SeqCst))
            .then(|| format!("https://checkout.stripe.test/c/pay/{}", id)),
        "payment_status": "unpaid",
        "status": "open",
        "amount_total": form
            .get("line_items[0][price_data][unit_amount]")
            .and_then(|a| a.parse::<i64>().ok()),
        "customer_email": form.get("customer_email"),
        "metadata": metadata
    });
    fake.sessions.insert(id, session.clone());
    Json(session).into_response()
}

async fn fake_retrieve_session(
    State(fake): State<FakeStripe>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> axum::response::Response {
    if !stripe_authorized(&headers) {
        return stripe_error(StatusCode::UNAUTHORIZED, "Invalid API Key provided");
    }
    match fake.sessions.get(&id) {
        Some(session) => Json(session.value().clone()).into_response(),
        None => stripe_error(
            StatusCode::NOT_FOUND,
            &format!("No such checkout.session: '{}'", id),
        ),
    }
}

/// Router over an in-memory backend with the given processor client.
pub fn test_app_with_stripe(backend: MemoryBackend, stripe: StripeClient) -> Router {
    let state = AppState::with_stripe(backend, stripe, Settings::default());
    routes::create_router(state, false)
}

/// Router over an in-memory backend; the processor is unconfigured.
pub fn test_app(backend: MemoryBackend) -> Router {
    init_crypto();
    let state = AppState::new(backend, Settings::default());
    routes::create_router(state, false)
}

/// Helper to parse JSON response body
pub async fn json_body(response: axum::response::Response) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}
