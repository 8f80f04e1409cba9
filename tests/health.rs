//! Integration tests for the /health endpoint.
//!
//! Verifies that:
//! - An unconfigured relay reports "ok" with gemini_configured false and no models
//! - A configured relay lists only models supporting generateContent
//! - A failing model listing degrades to an empty list, never a non-200
//! - The listing is fetched live on every call

use axum::body::Body;
use http::Request;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gemini_relay::bootstrap::{bootstrap, Bootstrap, BootstrapError};
use gemini_relay::config::{ApiKey, Config, GeminiConfig};
use gemini_relay::relay::{create_router, AppState};

fn test_config(server: &MockServer) -> Config {
    Config {
        gemini: GeminiConfig {
            api_key: Some(ApiKey::from("test-key")),
            base_url: format!("{}/v1beta", server.uri()),
            models: vec!["gemini-2.0-flash".to_string()],
            request_timeout_secs: None,
        },
        ..Default::default()
    }
}

fn models_page() -> serde_json::Value {
    serde_json::json!({
        "models": [
            { "name": "models/gemini-2.0-flash", "supportedGenerationMethods": ["generateContent", "countTokens"] },
            { "name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"] },
            { "name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent"] }
        ]
    })
}

async fn mount_model_lookup(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1beta/models/gemini-2.0-flash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "models/gemini-2.0-flash",
            "supportedGenerationMethods": ["generateContent"]
        })))
        .mount(server)
        .await;
}

async fn get_health(app: axum::Router) -> (http::StatusCode, serde_json::Value) {
    let request = Request::get("/health").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
        .await
        .expect("read body");
    let json: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap_or_default();
    (status, json)
}

#[tokio::test]
async fn test_health_unconfigured() {
    let state = AppState::new(Bootstrap::unconfigured(BootstrapError::MissingApiKey));
    let (status, json) = get_health(create_router(state)).await;

    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(
        json,
        serde_json::json!({
            "status": "ok",
            "gemini_configured": false,
            "available_models": []
        })
    );
}

#[tokio::test]
async fn test_health_configured_lists_generation_models() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(models_page()))
        .mount(&server)
        .await;
    mount_model_lookup(&server).await;

    let config = test_config(&server);
    let boot = bootstrap(&config.gemini, reqwest::Client::new()).await;
    let (status, json) = get_health(create_router(AppState::new(boot))).await;

    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["gemini_configured"], true);
    assert_eq!(
        json["available_models"],
        serde_json::json!(["models/gemini-2.0-flash", "models/gemini-2.5-flash"])
    );
}

#[tokio::test]
async fn test_health_listing_failure_reports_empty_list() {
    let server = MockServer::start().await;
    // First listing serves bootstrap; later ones fail.
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(models_page()))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .with_priority(2)
        .mount(&server)
        .await;
    mount_model_lookup(&server).await;

    let config = test_config(&server);
    let boot = bootstrap(&config.gemini, reqwest::Client::new()).await;
    assert!(boot.is_configured());

    let (status, json) = get_health(create_router(AppState::new(boot))).await;

    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(json["gemini_configured"], true);
    assert_eq!(json["available_models"], serde_json::json!([]));
}

#[tokio::test]
async fn test_health_after_failed_authentication() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": { "code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT" }
        })))
        .mount(&server)
        .await;

    let config = test_config(&server);
    let boot = bootstrap(&config.gemini, reqwest::Client::new()).await;
    assert!(!boot.is_configured());

    let (status, json) = get_health(create_router(AppState::new(boot))).await;

    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(json["gemini_configured"], false);
    assert_eq!(json["available_models"], serde_json::json!([]));
}

#[tokio::test]
async fn test_health_fetches_models_on_every_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1beta/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(models_page()))
        // One for bootstrap, one per health call.
        .expect(3)
        .mount(&server)
        .await;
    mount_model_lookup(&server).await;

    let config = test_config(&server);
    let boot = bootstrap(&config.gemini, reqwest::Client::new()).await;
    let app = create_router(AppState::new(boot));

    for _ in 0..2 {
        let (status, _) = get_health(app.clone()).await;
        assert_eq!(status, http::StatusCode::OK);
    }
}
