//! AWS Lambda preset.
//!
//! Works with API Gateway (REST and HTTP APIs) proxy integrations and Lambda
//! function URLs, which all deliver `headers`, `body` and `isBase64Encoded`
//! and accept a `{statusCode, headers, body}` response.

use std::collections::HashMap;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::adapter::{webhook_handler, RawRequest, WebhookAdapter};
use crate::config::Config;
use crate::error::{CommandError, ExtractError};
use crate::interaction::Interaction;
use crate::response::{InteractionResponse, WebhookResponse};

/// Inbound Lambda proxy event; fields this crate does not need are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaEvent {
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,

    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// Lambda proxy response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LambdaResponse {
    pub status_code: u16,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    pub body: String,
}

pub type LambdaExtract = fn(&LambdaEvent) -> Result<RawRequest, ExtractError>;
pub type LambdaWrap = fn(WebhookResponse) -> LambdaResponse;

/// Interaction handler bound to Lambda's event and response shapes.
pub type LambdaHandler<F> = WebhookAdapter<F, LambdaExtract, LambdaWrap>;

/// Build a Lambda handler that verifies Discord interactions, answers pings,
/// and passes application commands to `command_handler`.
pub fn lambda_handler<F>(config: Config, command_handler: F) -> LambdaHandler<F>
where
    F: Fn(&Interaction) -> Result<InteractionResponse, CommandError>,
{
    webhook_handler(
        config,
        command_handler,
        extract_lambda_request as LambdaExtract,
        wrap_lambda_response as LambdaWrap,
    )
}

impl<F> WebhookAdapter<F, LambdaExtract, LambdaWrap>
where
    F: Fn(&Interaction) -> Result<InteractionResponse, CommandError>,
{
    /// Handle an event given as untyped JSON, as some runtimes deliver it.
    ///
    /// Events that do not look like a proxy event are rejected with 401.
    pub fn handle_json(&self, event: Value) -> Value {
        let response = match serde_json::from_value::<LambdaEvent>(event) {
            Ok(event) => self.handle(&event),
            Err(e) => {
                warn!(error = %e, "lambda_event_invalid");
                wrap_lambda_response(WebhookResponse::unauthorized())
            }
        };

        serde_json::to_value(response).unwrap_or(Value::Null)
    }
}

/// Pull the exact body bytes and headers out of a proxy event.
pub fn extract_lambda_request(event: &LambdaEvent) -> Result<RawRequest, ExtractError> {
    let body = event.body.as_deref().ok_or(ExtractError::MissingBody)?;

    let body = if event.is_base64_encoded {
        STANDARD
            .decode(body)
            .map_err(|e| ExtractError::InvalidBase64(e.to_string()))?
    } else {
        body.as_bytes().to_vec()
    };

    let headers = event.headers.iter().flatten();

    Ok(RawRequest::from_pairs(body, headers))
}

/// Turn a [`WebhookResponse`] into a proxy response.
pub fn wrap_lambda_response(response: WebhookResponse) -> LambdaResponse {
    let mut headers = HashMap::new();
    if let Some(content_type) = response.content_type() {
        headers.insert("Content-Type".to_string(), content_type.to_string());
    }

    LambdaResponse {
        status_code: response.status.as_u16(),
        headers,
        body: response.body_string(),
    }
}
