//! Error types.
//!
//! Nothing in here ever reaches the hosting fabric as a fault: the adapter
//! converts every variant into a response value.

use thiserror::Error;

/// Setup-time configuration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Public key is not valid hexadecimal.
    #[error("public key is not valid hex: {0}")]
    InvalidHex(String),

    /// Public key decoded to the wrong number of bytes.
    #[error("public key must be 32 bytes, got {0}")]
    InvalidLength(usize),

    /// Public key bytes are not a valid Ed25519 point.
    #[error("public key is not a valid ed25519 key")]
    InvalidKey,

    /// Required environment variable is not set.
    #[error("missing environment variable: {0}")]
    MissingEnv(&'static str),
}

/// Shape errors in an otherwise valid JSON interaction body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PayloadError {
    /// Body is JSON but not an object.
    #[error("interaction is not a JSON object")]
    NotAnObject,

    /// `type` is absent or not a non-negative integer.
    #[error("interaction has no integer type")]
    MissingType,
}

/// Errors an integrator's command callback may return.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The command name is not one the integrator handles.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// Any other failure inside the integrator's code.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures between a verified request and a successful response.
///
/// All of these render as HTTP 400.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Body is not JSON, or lacks an integer `type`.
    #[error("malformed interaction payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// Interaction type is neither ping nor application command.
    #[error("unhandled request type: {0}")]
    UnhandledType(u64),

    /// The command callback returned an error.
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The command callback returned a response that cannot be sent.
    #[error("invalid command response: {0}")]
    InvalidResponse(&'static str),

    /// The command callback panicked.
    #[error("command handler panicked")]
    HandlerPanicked,
}

impl DispatchError {
    /// Message placed in the `{"error": ...}` body.
    ///
    /// Integrator internals are not echoed back to Discord.
    pub fn public_message(&self) -> String {
        match self {
            DispatchError::MalformedPayload(_) => "malformed interaction payload".to_string(),
            DispatchError::UnhandledType(kind) => format!("unhandled request type: {}", kind),
            DispatchError::Command(CommandError::UnknownCommand(name)) => {
                format!("Unknown command: {}", name)
            }
            DispatchError::Command(CommandError::Other(_))
            | DispatchError::InvalidResponse(_)
            | DispatchError::HandlerPanicked => "command failed".to_string(),
        }
    }
}

/// Errors extracting a raw request out of a platform event.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The event carries no body.
    #[error("event has no body")]
    MissingBody,

    /// A base64-flagged body failed to decode.
    #[error("body is not valid base64: {0}")]
    InvalidBase64(String),
}
