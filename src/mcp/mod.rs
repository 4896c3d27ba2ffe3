//! Model Context Protocol (MCP) server implementation.
//!
//! The server core is a transport-agnostic lifecycle state machine; the
//! stdio and HTTP transports both feed it one raw JSON-RPC message at a
//! time and relay at most one reply.
//!
//! ```text
//! stdio loop ──┐
//!              ├──▶ McpServer::handle_raw ──▶ tools ──▶ NexarClient
//! HTTP session ┘
//! ```
//!
//! # Protocol Version
//!
//! This implementation targets MCP protocol version 2024-11-05.

pub mod protocol;
pub mod server;
pub mod session;
pub mod transport;

pub use protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, MCP_PROTOCOL_VERSION};
pub use server::McpServer;
pub use session::{Session, SessionTable};
