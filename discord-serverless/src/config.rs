//! Configuration.
//!
//! [`Config`] is the only process-wide state the interaction core holds: the
//! application's public key, decoded once and read-only afterwards.
//! [`ServerConfig`] adds the environment-driven settings of the bundled web
//! server binary.

use std::env;
use std::fmt;

use ed25519_dalek::VerifyingKey;
use tracing::warn;

use crate::error::ConfigError;
use crate::signature::parse_public_key;

/// Interaction core configuration.
#[derive(Clone)]
pub struct Config {
    /// Hex-encoded public key, as supplied
    public_key_hex: String,

    /// Decoded public key
    verifying_key: VerifyingKey,
}

impl Config {
    /// Build a configuration from a hex-encoded Discord application public key.
    pub fn new(public_key_hex: impl Into<String>) -> Result<Self, ConfigError> {
        let public_key_hex: String = public_key_hex.into();
        let public_key_hex = public_key_hex.trim().to_string();
        let verifying_key = parse_public_key(&public_key_hex)?;

        Ok(Config {
            public_key_hex,
            verifying_key,
        })
    }

    pub fn public_key_hex(&self) -> &str {
        &self.public_key_hex
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("public_key_hex", &self.public_key_hex)
            .finish()
    }
}

/// Web server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Interaction core configuration
    pub interactions: Config,

    /// Port for the web server to listen on
    pub port: u16,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// `DISCORD_PUBLIC_KEY` is required; `PORT` defaults to 8080.
    pub fn from_env() -> Result<Self, ConfigError> {
        let public_key = env::var("DISCORD_PUBLIC_KEY")
            .map_err(|_| ConfigError::MissingEnv("DISCORD_PUBLIC_KEY"))?;

        Ok(ServerConfig {
            interactions: Config::new(public_key)?,
            port: parse_port("PORT", 8080),
        })
    }
}

/// Parse a port number, falling back to the default on absence or garbage.
fn parse_port(name: &str, default: u16) -> u16 {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<u16>() {
        Ok(port) => port,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid port, using default");
            default
        }
    }
}
