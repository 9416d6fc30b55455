//! Discord Serverless Web Server - interactions endpoint as a plain HTTP server.
//!
//! This binary hosts the same verify → dispatch pipeline the Lambda preset
//! uses, behind axum, with a small demo command set:
//! - `/greet` replies with a mention of the invoking user
//! - `/echo text:<...>` repeats its option back, visible only to the caller

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use discord_serverless::{
    web, CommandError, Interaction, InteractionHandler, InteractionResponse, ServerConfig,
};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = ServerConfig::from_env().context("Failed to load configuration")?;
    info!(
        port = config.port,
        public_key = %config.interactions.public_key_hex(),
        "interactions_server_configured"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let app = web::router(InteractionHandler::new(config.interactions, demo_commands));

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind interactions server to {}", addr))?;
    info!(address = %addr, "interactions_server_listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown())
        .await
        .context("Interactions server failed")?;

    info!("interactions_server_stopped");
    Ok(())
}

/// JSON logs, filtered by `RUST_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().flatten_event(true))
        .init();
}

fn demo_commands(interaction: &Interaction) -> Result<InteractionResponse, CommandError> {
    match interaction.command_name() {
        Some("greet") => {
            let user_id = interaction
                .user_id()
                .context("interaction has no invoking user")?;
            Ok(InteractionResponse::channel_message(format!(
                "Hi there <@{}>",
                user_id
            )))
        }
        Some("echo") => {
            let text = interaction
                .option("text")
                .and_then(|v| v.as_str())
                .context("missing text option")?;
            Ok(InteractionResponse::channel_message(text).ephemeral())
        }
        Some(other) => Err(CommandError::UnknownCommand(other.to_string())),
        None => Err(anyhow::anyhow!("application command without data").into()),
    }
}

/// Resolve on SIGINT, or SIGTERM on unix.
async fn wait_for_shutdown() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!(signal = "SIGINT", "interactions_server_draining"),
                    _ = sigterm.recv() => info!(signal = "SIGTERM", "interactions_server_draining"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "sigterm_handler_unavailable"),
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c_handler_unavailable");
        std::future::pending::<()>().await;
    }
    info!(signal = "SIGINT", "interactions_server_draining");
}
