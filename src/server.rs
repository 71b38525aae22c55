use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::error::GatewayError;
use crate::gateway::{Gateway, GatewayReply, GenerationRequest, RawRequest};
use crate::gemini::GeminiClient;

/// Shared server state. The gateway is absent when no API key is
/// configured; requests then fail with the credential error, mirroring a
/// misconfigured deployment rather than refusing to boot.
pub struct AppState {
    gateway: Option<Gateway<GeminiClient>>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let gateway = config
            .api_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(|key| Gateway::new(GeminiClient::new(key.clone(), config.model.clone())));
        AppState { gateway }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    // Single POST endpoint; axum answers 405 for every other method.
    Router::new()
        .route("/api/generate", post(generate))
        .layer(
            ServiceBuilder::new().layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET, Method::POST])
                    .allow_headers(Any),
            ),
        )
        .with_state(state)
}

pub async fn serve(config: Config, port: u16) -> Result<()> {
    if config.api_key.is_none() {
        log::warn!("GEMINI_API_KEY is not set; generation requests will fail");
    }

    let state = Arc::new(AppState::from_config(&config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .context("Failed to bind to address")?;

    println!("🚀 Generation gateway listening on http://0.0.0.0:{}", port);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

fn error_body(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

async fn generate(State(state): State<Arc<AppState>>, body: String) -> (StatusCode, Json<Value>) {
    let body = if body.trim().is_empty() { "{}" } else { body.as_str() };
    let raw: RawRequest = match serde_json::from_str(body) {
        Ok(raw) => raw,
        Err(_) => {
            return error_body(StatusCode::BAD_REQUEST, "'type' and 'payload' are required.")
        }
    };

    let request = match GenerationRequest::from_raw(raw) {
        Ok(request) => request,
        Err(e) => return error_body(StatusCode::BAD_REQUEST, e.to_string()),
    };

    let gateway = match &state.gateway {
        Some(gateway) => gateway,
        None => {
            return error_body(
                StatusCode::INTERNAL_SERVER_ERROR,
                GatewayError::MissingApiKey.to_string(),
            )
        }
    };

    match gateway.handle(request).await {
        Ok(reply) => {
            let body = match reply {
                GatewayReply::Text { text } => json!({ "text": text }),
                GatewayReply::Insights(value) => value,
                GatewayReply::Trends { trends, sources } => {
                    json!({ "trends": trends, "sources": sources })
                }
            };
            (StatusCode::OK, Json(body))
        }
        Err(e) if e.is_client_error() => error_body(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            log::error!("AI error: {}", e);
            error_body(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn keyless_router() -> Router {
        router(Arc::new(AppState { gateway: None }))
    }

    fn post_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn non_post_methods_are_rejected() {
        let response = keyless_router()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/generate")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn missing_type_is_a_bad_request() {
        let response = keyless_router().oneshot(post_request("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_payload_is_a_bad_request() {
        let response = keyless_router()
            .oneshot(post_request("{\"type\": \"content\", \"payload\": {}}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn valid_request_without_credentials_is_a_server_error() {
        let body = "{\"type\": \"trending\"}";
        let response = keyless_router().oneshot(post_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
