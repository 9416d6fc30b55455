//! Interaction endpoint handlers.
//!
//! The endpoint takes the body as raw bytes so the signature is checked
//! against exactly what Discord sent, then hands the request to the shared
//! [`InteractionHandler`] on the blocking pool since command callbacks are
//! synchronous.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info};

use crate::adapter::{InteractionHandler, RawRequest};
use crate::error::{CommandError, DispatchError};
use crate::interaction::Interaction;
use crate::response::{InteractionResponse, WebhookResponse};

/// Shared application state.
pub struct AppState<F> {
    pub handler: Arc<InteractionHandler<F>>,
}

impl<F> AppState<F> {
    pub fn new(handler: InteractionHandler<F>) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
        }
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Discord Interactions
// =============================================================================

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        match self.content_type() {
            Some(content_type) => (
                self.status,
                [(header::CONTENT_TYPE, content_type)],
                self.body_string(),
            )
                .into_response(),
            None => self.status.into_response(),
        }
    }
}

/// Discord interactions endpoint.
///
/// This endpoint:
/// 1. Verifies the Ed25519 signature over the raw body
/// 2. Answers pings
/// 3. Runs the command handler for application commands
pub async fn interactions<F>(
    State(state): State<AppState<F>>,
    headers: HeaderMap,
    body: Bytes,
) -> WebhookResponse
where
    F: Fn(&Interaction) -> Result<InteractionResponse, CommandError> + Send + Sync + 'static,
{
    info!(body_length = body.len(), "interaction_webhook_received");

    let request = RawRequest::new(body.to_vec(), headers);
    let handler = Arc::clone(&state.handler);

    let response = match tokio::task::spawn_blocking(move || handler.handle(&request)).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "interaction_handler_join_failed");
            WebhookResponse::failure(&DispatchError::HandlerPanicked)
        }
    };

    if response.status == StatusCode::OK {
        info!("interaction_webhook_answered");
    }

    response
}
