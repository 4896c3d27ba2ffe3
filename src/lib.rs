//! nexar-supply-mcp: MCP server for electronic component search.
//!
//! Exposes the Nexar Supply parts catalog to AI assistants as a single
//! MCP tool, `search_components`. The server is a thin protocol adapter:
//! it authenticates against the Nexar identity provider, issues one
//! parameterised GraphQL query, and flattens the nested results into a
//! stable `Part` record shape.
//!
//! # Modules
//!
//! - [`config`] — Environment-based configuration and validation
//! - [`error`] — Error types
//! - [`nexar`] — Nexar Supply API client and result normalisation
//! - [`tools`] — Tool descriptors and invocation dispatch
//! - [`mcp`] — MCP protocol implementation and transports

pub mod config;
pub mod error;
pub mod mcp;
pub mod nexar;
pub mod tools;
