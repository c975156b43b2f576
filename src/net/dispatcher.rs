//! Event loop handle recorded at accept time

use tokio::runtime::Handle;

/// Handle to the event loop a connection was accepted on.
///
/// Filters record which loop invoked them so assertion code can check
/// that accept processing stayed on the expected runtime. The handle
/// is held opaquely; nothing is spawned through it here.
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    handle: Handle,
}

impl DispatcherHandle {
    /// Handle for the runtime the caller is currently on, if any.
    ///
    /// Returns `None` outside a tokio runtime, which is the normal
    /// situation in synchronous test drivers.
    #[must_use]
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(|handle| Self { handle })
    }

    /// Raw handle to the wrapped runtime.
    #[must_use]
    pub fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl From<Handle> for DispatcherHandle {
    fn from(handle: Handle) -> Self {
        Self { handle }
    }
}
