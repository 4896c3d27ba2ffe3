//! Error types for nexar-supply-mcp.
//!
//! # Security Note
//!
//! Error messages are carefully crafted to NEVER include credentials.
//! Authentication failures report the transport error only; the client
//! identifier and secret are never echoed back.

use thiserror::Error;

/// Errors that can occur while loading configuration from the environment.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required credential variable is missing or empty.
    #[error("{name} environment variable is required")]
    MissingCredential {
        /// Name of the missing environment variable.
        name: &'static str,
    },

    /// The listening port could not be parsed.
    #[error("invalid PORT value '{value}': must be a number between 1 and 65535")]
    InvalidPort {
        /// The raw value found in the environment.
        value: String,
    },
}

/// Errors from the Nexar Supply API client.
#[derive(Error, Debug)]
pub enum NexarError {
    /// The identity endpoint was unreachable or rejected the credentials.
    #[error("Nexar authentication failed: {source}")]
    Authentication {
        /// The underlying transport or decode error.
        #[source]
        source: reqwest::Error,
    },

    /// The catalog endpoint returned a structured GraphQL error payload.
    #[error("Nexar API errors: {messages}")]
    Api {
        /// Comma-joined upstream error messages.
        messages: String,
    },

    /// Transport-level failure calling the catalog endpoint.
    #[error("Nexar API request failed: {source}")]
    Request {
        /// The underlying transport or decode error.
        #[source]
        source: reqwest::Error,
    },
}

/// Errors raised at the tool adapter boundary.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool arguments were missing or of the wrong type.
    #[error("{0}")]
    InvalidArgument(String),

    /// The requested tool does not exist.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The tool ran but the underlying operation failed.
    #[error("Failed to search components: {0}")]
    Execution(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_display() {
        let error = ConfigError::MissingCredential {
            name: "NEXAR_CLIENT_ID",
        };
        let msg = error.to_string();
        assert!(msg.contains("NEXAR_CLIENT_ID"));
        assert!(msg.contains("required"));
    }

    #[test]
    fn invalid_port_display() {
        let error = ConfigError::InvalidPort {
            value: "eighty".to_string(),
        };
        assert!(error.to_string().contains("eighty"));
    }

    #[test]
    fn api_error_joins_messages() {
        let error = NexarError::Api {
            messages: "bad query, also slow".to_string(),
        };
        let msg = error.to_string();
        assert!(msg.starts_with("Nexar API errors:"));
        assert!(msg.contains("bad query"));
    }

    #[test]
    fn unknown_tool_display() {
        let error = ToolError::UnknownTool("do_magic".to_string());
        assert_eq!(error.to_string(), "Unknown tool: do_magic");
    }

    #[test]
    fn execution_error_prefix() {
        let error = ToolError::Execution("timed out".to_string());
        assert_eq!(error.to_string(), "Failed to search components: timed out");
    }
}
