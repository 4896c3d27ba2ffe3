//! Transports delivering MCP messages to the server core.
//!
//! - [`stdio`] — newline-delimited JSON-RPC on stdin/stdout
//! - [`http`] — session-based streamable HTTP

pub mod http;
pub mod stdio;
