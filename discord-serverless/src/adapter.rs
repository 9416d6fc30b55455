//! Hosting-fabric adapter.
//!
//! [`InteractionHandler`] runs verify → parse → dispatch on a [`RawRequest`].
//! [`WebhookAdapter`] wraps it with two plain functions, one pulling a
//! `RawRequest` out of a platform event and one turning the
//! [`WebhookResponse`] into the platform's native response, so any serverless
//! fabric can be supported without touching the core.

use std::sync::Arc;

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use tracing::warn;

use crate::config::Config;
use crate::dispatch::dispatch;
use crate::error::{CommandError, ExtractError};
use crate::interaction::Interaction;
use crate::response::{InteractionResponse, WebhookResponse};
use crate::signature::{verify_with_key, SIGNATURE_HEADER, TIMESTAMP_HEADER};

/// The exact bytes and headers of an inbound webhook request.
#[derive(Debug, Clone, Default)]
pub struct RawRequest {
    /// Body exactly as received
    pub body: Vec<u8>,

    /// Headers; lookups are case-insensitive
    pub headers: HeaderMap,
}

impl RawRequest {
    pub fn new(body: impl Into<Vec<u8>>, headers: HeaderMap) -> Self {
        Self {
            body: body.into(),
            headers,
        }
    }

    /// Build from `(name, value)` pairs in any casing.
    ///
    /// Pairs that are not valid HTTP header names or values are skipped.
    pub fn from_pairs<I, K, V>(body: impl Into<Vec<u8>>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            let name = match HeaderName::from_bytes(name.as_ref().as_bytes()) {
                Ok(n) => n,
                Err(_) => {
                    warn!(header = name.as_ref(), "request_header_invalid_name");
                    continue;
                }
            };
            let value = match HeaderValue::from_str(value.as_ref()) {
                Ok(v) => v,
                Err(_) => {
                    warn!(header = %name, "request_header_invalid_value");
                    continue;
                }
            };
            headers.append(name, value);
        }

        Self::new(body, headers)
    }

    /// Header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Verifies, parses and dispatches Discord interactions.
pub struct InteractionHandler<F> {
    config: Arc<Config>,
    on_command: F,
}

impl<F> InteractionHandler<F>
where
    F: Fn(&Interaction) -> Result<InteractionResponse, CommandError>,
{
    /// Wrap a command callback with signature verification and ping handling.
    pub fn new(config: Config, on_command: F) -> Self {
        Self {
            config: Arc::new(config),
            on_command,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Handle one request.
    ///
    /// Requests failing verification get a 401 without `on_command` ever
    /// running.
    pub fn handle(&self, request: &RawRequest) -> WebhookResponse {
        // Missing headers verify as empty strings, which never pass
        let signature = request.header(SIGNATURE_HEADER).unwrap_or_default();
        let timestamp = request.header(TIMESTAMP_HEADER).unwrap_or_default();

        if !verify_with_key(
            self.config.verifying_key(),
            &request.body,
            timestamp,
            signature,
        ) {
            warn!(
                has_signature = !signature.is_empty(),
                has_timestamp = !timestamp.is_empty(),
                body_length = request.body.len(),
                "interaction_rejected"
            );
            return WebhookResponse::unauthorized();
        }

        dispatch(&request.body, &self.on_command)
    }
}

/// An [`InteractionHandler`] bound to one hosting fabric's event and response
/// shapes.
pub struct WebhookAdapter<F, E, W> {
    handler: InteractionHandler<F>,
    extract: E,
    wrap: W,
}

impl<F, E, W> WebhookAdapter<F, E, W>
where
    F: Fn(&Interaction) -> Result<InteractionResponse, CommandError>,
{
    pub fn interaction_handler(&self) -> &InteractionHandler<F> {
        &self.handler
    }

    /// Handle one platform event, always producing a native response.
    pub fn handle<Ev, Out>(&self, event: &Ev) -> Out
    where
        E: Fn(&Ev) -> Result<RawRequest, ExtractError>,
        W: Fn(WebhookResponse) -> Out,
    {
        let response = match (self.extract)(event) {
            Ok(request) => self.handler.handle(&request),
            Err(e) => {
                warn!(error = %e, "interaction_extract_failed");
                WebhookResponse::unauthorized()
            }
        };

        (self.wrap)(response)
    }
}

/// Build a handler for an arbitrary hosting fabric.
///
/// # Arguments
///
/// * `config` - Public key configuration
/// * `on_command` - Callback for application commands
/// * `extract` - Pulls the raw body and headers out of a platform event
/// * `wrap` - Builds the platform's native response
pub fn webhook_handler<F, E, W, Ev, Out>(
    config: Config,
    on_command: F,
    extract: E,
    wrap: W,
) -> WebhookAdapter<F, E, W>
where
    F: Fn(&Interaction) -> Result<InteractionResponse, CommandError>,
    E: Fn(&Ev) -> Result<RawRequest, ExtractError>,
    W: Fn(WebhookResponse) -> Out,
{
    WebhookAdapter {
        handler: InteractionHandler::new(config, on_command),
        extract,
        wrap,
    }
}
