//! Server state management
//!
//! Shared state handed to every route handler.

use seega_core::SessionCoordinator;

/// Server-wide shared state
pub struct ServerState {
    /// The one game this server hosts
    pub session: SessionCoordinator,
}

impl ServerState {
    pub fn new() -> Self {
        Self::with_session(SessionCoordinator::new())
    }

    pub fn with_session(session: SessionCoordinator) -> Self {
        Self { session }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
