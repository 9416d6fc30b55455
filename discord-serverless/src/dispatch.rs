//! Interaction dispatch.
//!
//! Routes a verified interaction to the right reply:
//!
//! ```text
//! type 1 (ping)    → pong, command handler never runs
//! type 2 (command) → command handler → its response, or 400 on failure
//! anything else    → 400
//! ```

use std::panic::{self, AssertUnwindSafe};

use tracing::{info, warn};

use crate::error::{CommandError, DispatchError};
use crate::interaction::{Interaction, APPLICATION_COMMAND, PING};
use crate::response::{InteractionResponse, WebhookResponse};

/// Handle a parsed interaction, taking care of pings.
///
/// Application commands are passed to `on_command`. Its errors, panics and
/// unsendable responses all come back as [`DispatchError`].
///
/// The adapters call this after verifying and parsing the request; call it
/// directly for a custom flow.
pub fn handle_interaction<F>(
    interaction: &Interaction,
    on_command: &F,
) -> Result<InteractionResponse, DispatchError>
where
    F: Fn(&Interaction) -> Result<InteractionResponse, CommandError>,
{
    match interaction.kind {
        PING => {
            info!("interaction_ping");
            Ok(InteractionResponse::pong())
        }
        APPLICATION_COMMAND => {
            info!(
                command = interaction.command_name().unwrap_or_default(),
                user_id = interaction.user_id().unwrap_or_default(),
                option_count = interaction.options().len(),
                "interaction_command_received"
            );

            let response = match panic::catch_unwind(AssertUnwindSafe(|| on_command(interaction)))
            {
                Ok(result) => result?,
                Err(_) => return Err(DispatchError::HandlerPanicked),
            };

            response.validate()?;
            Ok(response)
        }
        other => Err(DispatchError::UnhandledType(other)),
    }
}

/// Parse a verified raw body and dispatch it.
///
/// Always produces a response: 200 on success, 400 on any failure.
pub fn dispatch<F>(raw_body: &[u8], on_command: &F) -> WebhookResponse
where
    F: Fn(&Interaction) -> Result<InteractionResponse, CommandError>,
{
    let result = Interaction::from_slice(raw_body)
        .map_err(DispatchError::from)
        .and_then(|interaction| handle_interaction(&interaction, on_command));

    match result {
        Ok(response) => {
            info!(response_type = response.kind, "interaction_dispatch_complete");
            WebhookResponse::success(&response)
        }
        Err(e) => {
            warn!(error = %e, "interaction_dispatch_failed");
            WebhookResponse::failure(&e)
        }
    }
}
