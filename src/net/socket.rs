//! Accepted socket view exposed to listener filters

use tracing::trace;

/// Mutable view of an accepted socket that listener filters may
/// annotate before the connection is handed onward.
pub trait AcceptSocket: Send {
    /// Replace the application protocols requested for this
    /// connection, as a TLS transport would later consume them.
    fn set_requested_application_protocols(&mut self, protocols: Vec<String>);

    /// Protocols currently requested for this connection.
    fn requested_application_protocols(&self) -> &[String];
}

/// In-memory socket standing in for a real accepted socket.
///
/// Records the protocol annotations filters apply so tests can assert
/// on them after the chain has run.
#[derive(Debug, Default)]
pub struct HarnessSocket {
    requested_protocols: Vec<String>,
}

impl HarnessSocket {
    /// Create a socket with no requested protocols.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Protocols filters have requested so far. Same view as the
    /// [`AcceptSocket`] accessor, reachable without the trait.
    #[must_use]
    pub fn requested_application_protocols(&self) -> &[String] {
        &self.requested_protocols
    }
}

impl AcceptSocket for HarnessSocket {
    fn set_requested_application_protocols(&mut self, protocols: Vec<String>) {
        trace!(protocols = ?protocols, "updating requested application protocols");
        self.requested_protocols = protocols;
    }

    fn requested_application_protocols(&self) -> &[String] {
        &self.requested_protocols
    }
}
