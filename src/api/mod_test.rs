use std::net::IpAddr;

use axum::http::StatusCode;
use tower::ServiceExt;

use super::{AppState, Config, routes};
use crate::backend::MemoryBackend;
use crate::config::{DEFAULT_PORT, Settings};
use crate::test_support::{get_request, json_body, spawn_server, test_app};

#[test]
fn config_defaults_follow_settings() {
    let config = Config::default();
    assert_eq!(config.host, IpAddr::from([0, 0, 0, 0]));
    assert_eq!(config.port, DEFAULT_PORT);
    assert!(!config.enable_docs);
}

#[test]
fn config_builders_override_only_given_values() {
    let settings = Settings {
        port: 9000,
        ..Settings::default()
    };

    let config = Config::from_settings(&settings)
        .with_host(None)
        .with_port(None)
        .with_docs(true);
    assert_eq!(config.port, 9000);
    assert!(config.enable_docs);

    let local: IpAddr = "127.0.0.1".parse().unwrap();
    let config = config.with_host(Some(local)).with_port(Some(8123));
    assert_eq!(config.host, local);
    assert_eq!(config.port, 8123);
}

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_version() {
    let app = test_app(MemoryBackend::new());

    let response = app.oneshot(get_request("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test(flavor = "multi_thread")]
async fn docs_are_only_mounted_when_enabled() {
    crate::test_support::init_crypto();
    let state = AppState::new(MemoryBackend::new(), Settings::default());

    let disabled = routes::create_router(state.clone(), false);
    let response = disabled.oneshot(get_request("/docs", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let enabled = routes::create_router(state, true);
    let response = enabled.oneshot(get_request("/docs", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[test]
fn openapi_document_lists_both_surfaces() {
    use utoipa::OpenApi;

    let doc = routes::ApiDoc::openapi();
    let paths: Vec<&String> = doc.paths.paths.keys().collect();
    assert!(paths.iter().any(|p| p.as_str() == "/v1/teachers"));
    assert!(
        paths
            .iter()
            .any(|p| p.as_str() == "/functions/v1/create-payment")
    );
    assert!(
        doc.components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer"))
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn router_serves_over_tcp() {
    let app = test_app(MemoryBackend::new());
    let (url, handle) = spawn_server(app).await;

    crate::test_support::init_crypto();
    let response = reqwest::get(format!("{}/health", url)).await.unwrap();
    assert!(response.status().is_success());

    handle.abort();
}
