//! Web server module for hosting the interactions endpoint.
//!
//! For deployments that run a long-lived HTTP server instead of a
//! function-as-a-service handler:
//! - `POST /interactions` verifies and dispatches Discord interactions
//! - `GET /health` reports liveness

pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::adapter::InteractionHandler;
use crate::error::CommandError;
use crate::interaction::Interaction;
use crate::response::InteractionResponse;

pub use handlers::{health, interactions, AppState, HealthResponse};

/// Build the router serving `handler`.
pub fn router<F>(handler: InteractionHandler<F>) -> Router
where
    F: Fn(&Interaction) -> Result<InteractionResponse, CommandError> + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/interactions", post(interactions::<F>))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::signature::tests::{public_key_hex, sign};

    const TIMESTAMP: &str = "1700000000";

    fn config() -> Config {
        Config::new(public_key_hex()).unwrap()
    }

    fn interaction_request(body: &'static str, signature: String) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/interactions")
            .header("X-Signature-Ed25519", signature)
            .header("X-Signature-Timestamp", TIMESTAMP)
            .header("Content-Type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(InteractionHandler::new(config(), |_: &Interaction| {
            Ok(InteractionResponse::pong())
        }));

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn test_ping() {
        let app = router(InteractionHandler::new(config(), |_: &Interaction| {
            Ok(InteractionResponse::channel_message("unused"))
        }));
        let body = r#"{"type":1}"#;

        let response = app
            .oneshot(interaction_request(body, sign(TIMESTAMP, body.as_bytes())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()["content-type"],
            "application/json"
        );
        assert_eq!(body_json(response).await, json!({"type": 1}));
    }

    #[tokio::test]
    async fn test_command() {
        let app = router(InteractionHandler::new(config(), |interaction: &Interaction| {
            Ok(InteractionResponse::message(
                4,
                format!("Hi there <@{}>", interaction.user_id().unwrap_or_default()),
            ))
        }));
        let body = r#"{"type":2,"data":{"name":"greet"},"member":{"user":{"id":"42"}}}"#;

        let response = app
            .oneshot(interaction_request(body, sign(TIMESTAMP, body.as_bytes())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            json!({"type": 4, "data": {"content": "Hi there <@42>"}})
        );
    }

    #[tokio::test]
    async fn test_bad_signature_never_invokes_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let app = router(InteractionHandler::new(config(), move |_: &Interaction| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(InteractionResponse::channel_message("ran"))
        }));
        let body = r#"{"type":2,"data":{"name":"greet"}}"#;

        let response = app
            .oneshot(interaction_request(body, "00".repeat(64)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
