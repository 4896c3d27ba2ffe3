//! Session table for the HTTP transport.
//!
//! Each HTTP session owns an independent [`McpServer`] instance, keyed by
//! an opaque session identifier. A key exists in the table exactly between
//! the session's successful initialisation and its close event; a server
//! whose initialisation never completes is never registered, and any
//! request quoting such an identifier is treated as not-found (a narrow,
//! documented race inherited from the design).
//!
//! The table is the only shared mutable state in the HTTP transport. It is
//! passed into the request handlers explicitly; there is no global.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::mcp::server::McpServer;

/// One live HTTP session.
pub struct Session {
    /// The session identifier.
    pub id: String,
    /// The server instance owned by this session.
    ///
    /// An async mutex: requests for the same session are serialised, while
    /// distinct sessions proceed concurrently.
    pub server: tokio::sync::Mutex<McpServer>,
}

impl Session {
    /// Creates a session wrapping an initialised server.
    #[must_use]
    pub fn new(id: String, server: McpServer) -> Self {
        Self {
            id,
            server: tokio::sync::Mutex::new(server),
        }
    }
}

/// Concurrency-safe mapping from session identifier to live session.
///
/// Cloning is cheap; all clones share one table.
#[derive(Clone, Default)]
pub struct SessionTable {
    inner: Arc<RwLock<HashMap<String, Arc<Session>>>>,
}

impl SessionTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session. Fires on the session-initialised event.
    pub fn insert(&self, session: Arc<Session>) {
        if let Ok(mut map) = self.inner.write() {
            map.insert(session.id.clone(), session);
        }
    }

    /// Looks up a session by identifier.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.inner.read().ok().and_then(|map| map.get(id).cloned())
    }

    /// Removes a session. Fires on the close event.
    ///
    /// Returns the removed session, if it was registered.
    pub fn remove(&self, id: &str) -> Option<Arc<Session>> {
        self.inner.write().ok().and_then(|mut map| map.remove(id))
    }

    /// Returns the number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |map| map.len())
    }

    /// Returns `true` when no sessions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
