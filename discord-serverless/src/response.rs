//! Response types.
//!
//! [`InteractionResponse`] is what a command handler produces; the adapter
//! turns it into an HTTP-shaped [`WebhookResponse`] which each hosting preset
//! then maps onto its native response type.

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::error::DispatchError;

/// Interaction callback type acknowledging a ping.
pub const PONG: u64 = 1;

/// Interaction callback type replying with a channel message.
pub const CHANNEL_MESSAGE_WITH_SOURCE: u64 = 4;

/// Message flag making a reply visible only to the invoking user.
pub const EPHEMERAL_FLAG: u64 = 1 << 6;

/// Reply to a single interaction.
///
/// Use the simple content form via [`InteractionResponse::message`], or supply
/// a fully custom body with [`InteractionResponse::raw`].
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionResponse {
    /// Interaction callback type
    pub kind: u64,

    /// Message content
    pub content: Option<String>,

    /// Message flags
    pub flags: Option<u64>,

    /// Custom body, sent verbatim in place of `kind`/`content`
    pub raw: Option<Value>,
}

impl InteractionResponse {
    /// Acknowledge a ping.
    pub fn pong() -> Self {
        Self {
            kind: PONG,
            content: None,
            flags: None,
            raw: None,
        }
    }

    /// Reply with `{"type": kind, "data": {"content": content}}`.
    pub fn message(kind: u64, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: Some(content.into()),
            flags: None,
            raw: None,
        }
    }

    /// Reply with a channel message containing `content`.
    pub fn channel_message(content: impl Into<String>) -> Self {
        Self::message(CHANNEL_MESSAGE_WITH_SOURCE, content)
    }

    /// Reply with a fully custom body.
    pub fn raw(body: Value) -> Self {
        let kind = body.get("type").and_then(Value::as_u64).unwrap_or_default();
        Self {
            kind,
            content: None,
            flags: None,
            raw: Some(body),
        }
    }

    /// Show the reply only to the invoking user.
    pub fn ephemeral(mut self) -> Self {
        self.flags = Some(self.flags.unwrap_or_default() | EPHEMERAL_FLAG);
        self
    }

    /// Check the response can be sent to Discord.
    pub fn validate(&self) -> Result<(), DispatchError> {
        match &self.raw {
            Some(raw) => {
                let object = raw
                    .as_object()
                    .ok_or(DispatchError::InvalidResponse("raw body is not an object"))?;
                match object.get("type").and_then(Value::as_u64) {
                    Some(kind) if kind > 0 => Ok(()),
                    _ => Err(DispatchError::InvalidResponse(
                        "raw body has no interaction type",
                    )),
                }
            }
            None if self.kind == 0 => Err(DispatchError::InvalidResponse(
                "missing interaction type",
            )),
            None => Ok(()),
        }
    }

    /// JSON body sent back to Discord.
    pub fn to_body(&self) -> Value {
        if let Some(raw) = &self.raw {
            return raw.clone();
        }

        let mut body = json!({ "type": self.kind });

        if self.content.is_some() || self.flags.is_some() {
            let mut data = serde_json::Map::new();
            if let Some(content) = &self.content {
                data.insert("content".to_string(), Value::from(content.as_str()));
            }
            if let Some(flags) = self.flags {
                data.insert("flags".to_string(), Value::from(flags));
            }
            body["data"] = Value::Object(data);
        }

        body
    }
}

/// HTTP-shaped response, independent of any hosting fabric.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookResponse {
    pub status: StatusCode,

    /// JSON body; `None` sends an empty body
    pub body: Option<Value>,
}

impl WebhookResponse {
    /// 200 with the interaction response as body.
    pub fn success(response: &InteractionResponse) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(response.to_body()),
        }
    }

    /// 401 for any verification failure.
    ///
    /// The body never says which check failed.
    pub fn unauthorized() -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            body: Some(json!({ "error": "invalid request signature" })),
        }
    }

    /// 400 for any dispatch failure.
    pub fn failure(error: &DispatchError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: Some(json!({ "error": error.public_message() })),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn content_type(&self) -> Option<&'static str> {
        self.body.as_ref().map(|_| "application/json")
    }

    /// Body serialized as a JSON string, empty when there is no body.
    pub fn body_string(&self) -> String {
        self.body
            .as_ref()
            .map(Value::to_string)
            .unwrap_or_default()
    }
}
