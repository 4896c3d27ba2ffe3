//! Configuration loading from the environment.
//!
//! All configuration is supplied through environment variables; there is no
//! configuration file.
//!
//! # Variables
//!
//! | Variable              | Required | Default | Meaning                         |
//! |-----------------------|----------|---------|---------------------------------|
//! | `NEXAR_CLIENT_ID`     | yes      | —       | OAuth2 client identifier        |
//! | `NEXAR_CLIENT_SECRET` | yes      | —       | OAuth2 client secret            |
//! | `PORT`                | no       | 8080    | HTTP transport listening port   |
//! | `NODE_ENV`            | no       | —       | `production` enables prod mode  |

mod settings;

pub use settings::{Config, DEFAULT_PORT};

use crate::error::ConfigError;

/// Loads and validates configuration from the process environment.
///
/// # Errors
///
/// Returns an error if a required credential is missing or empty, or if
/// `PORT` is set but unparseable.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(|name| std::env::var(name).ok())
}

/// Loads configuration through an arbitrary variable lookup.
///
/// Split out from [`load_config`] so tests can supply variables without
/// touching the process-global environment.
///
/// # Errors
///
/// Same conditions as [`load_config`].
pub fn load_config_from<F>(lookup: F) -> Result<Config, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let client_id = lookup("NEXAR_CLIENT_ID").unwrap_or_default();
    let client_secret = lookup("NEXAR_CLIENT_SECRET").unwrap_or_default();

    let port = match lookup("PORT") {
        Some(raw) => raw
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|p| *p != 0)
            .ok_or(ConfigError::InvalidPort { value: raw })?,
        None => DEFAULT_PORT,
    };

    let is_production = lookup("NODE_ENV").as_deref() == Some("production");

    let config = Config {
        client_id,
        client_secret,
        port,
        is_production,
    };

    config.validate()?;

    Ok(config)
}
