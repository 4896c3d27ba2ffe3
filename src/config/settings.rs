//! Configuration structures.
//!
//! These structures hold the validated process configuration. Values come
//! from the environment (see the parent module), never from disk.

use crate::error::ConfigError;

/// Default listening port for the HTTP transport.
pub const DEFAULT_PORT: u16 = 8080;

/// Validated process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Nexar OAuth2 client identifier.
    pub client_id: String,
    /// Nexar OAuth2 client secret.
    pub client_secret: String,
    /// Listening port for the HTTP transport.
    pub port: u16,
    /// Whether the process runs in production mode.
    ///
    /// Production binds `0.0.0.0` and keeps startup output terse;
    /// development binds `localhost` and prints a client config snippet.
    pub is_production: bool,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either credential is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "NEXAR_CLIENT_ID",
            });
        }
        if self.client_secret.is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "NEXAR_CLIENT_SECRET",
            });
        }
        Ok(())
    }

    /// Returns the bind address for the HTTP transport.
    #[must_use]
    pub const fn bind_host(&self) -> &'static str {
        if self.is_production {
            "0.0.0.0"
        } else {
            "127.0.0.1"
        }
    }
}
