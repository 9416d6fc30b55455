//! Discord Serverless - Discord interaction webhooks for function handlers.
//!
//! Verifies Discord's Ed25519 request signatures, answers liveness pings, and
//! passes application commands to a plain callback, so a serverless function
//! only has to implement its commands.
//!
//! ## Request Flow
//!
//! ```text
//! Event → extract raw body + headers → verify → parse → dispatch → wrap → Response
//!                                        │ fail                     │ fail
//!                                        └→ 401                     └→ 400
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use discord_serverless::{lambda_handler, CommandError, Config, InteractionResponse};
//!
//! let handler = lambda_handler(Config::new("<public key hex>")?, |interaction| {
//!     match interaction.command_name() {
//!         Some("greet") => Ok(InteractionResponse::channel_message(format!(
//!             "Hi there <@{}>",
//!             interaction.user_id().unwrap_or_default()
//!         ))),
//!         Some(other) => Err(CommandError::UnknownCommand(other.to_string())),
//!         None => Err(anyhow::anyhow!("no command data").into()),
//!     }
//! });
//! # let event = discord_serverless::lambda::LambdaEvent::default();
//! let response = handler.handle(&event);
//! # Ok::<(), discord_serverless::ConfigError>(())
//! ```

pub mod adapter;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod interaction;
pub mod lambda;
pub mod response;
pub mod signature;
pub mod web;

// Re-export commonly used types
pub use adapter::{webhook_handler, InteractionHandler, RawRequest, WebhookAdapter};
pub use config::{Config, ServerConfig};
pub use dispatch::{dispatch, handle_interaction};
pub use error::{CommandError, ConfigError, DispatchError, ExtractError, PayloadError};
pub use interaction::Interaction;
pub use lambda::{lambda_handler, LambdaEvent, LambdaHandler, LambdaResponse};
pub use response::{InteractionResponse, WebhookResponse};
pub use signature::verify_signature;
