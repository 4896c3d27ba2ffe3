//! Nexar Supply API integration.
//!
//! - [`client`] — OAuth2 authentication and GraphQL search
//! - [`types`] — wire types and the normalised [`Part`] record
//! - [`normalize`] — response flattening

pub mod client;
pub mod normalize;
pub mod types;

pub use client::NexarClient;
pub use types::Part;
