//! Accept-time context handed to listener filters

use crate::net::{AcceptSocket, DispatcherHandle, HarnessSocket};
use crate::state::FilterStateStore;

use super::traits::ListenerFilterCallbacks;

/// Everything a filter chain touches while accepting one connection.
///
/// Bundles the accepted socket, the per-connection state store, and
/// the event loop handle captured at construction. The context is the
/// crate's [`ListenerFilterCallbacks`] implementation; the inherent
/// accessors give assertion code a read-only view of the same data
/// after the chain has run.
#[derive(Debug)]
pub struct AcceptContext {
    socket: HarnessSocket,
    filter_state: FilterStateStore,
    dispatcher: Option<DispatcherHandle>,
}

impl AcceptContext {
    /// Create a context for one accepted connection, capturing the
    /// current event loop when called from inside one.
    #[must_use]
    pub fn new() -> Self {
        Self {
            socket: HarnessSocket::new(),
            filter_state: FilterStateStore::new(),
            dispatcher: DispatcherHandle::current(),
        }
    }

    /// Replace the recorded event loop handle.
    #[must_use]
    pub fn with_dispatcher(mut self, dispatcher: DispatcherHandle) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Read-only view of the accepted socket.
    #[must_use]
    pub fn socket(&self) -> &HarnessSocket {
        &self.socket
    }

    /// Read-only view of the per-connection state.
    #[must_use]
    pub fn filter_state(&self) -> &FilterStateStore {
        &self.filter_state
    }

    /// Event loop recorded for this connection, when one exists.
    #[must_use]
    pub fn dispatcher(&self) -> Option<&DispatcherHandle> {
        self.dispatcher.as_ref()
    }
}

impl Default for AcceptContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ListenerFilterCallbacks for AcceptContext {
    fn socket(&mut self) -> &mut dyn AcceptSocket {
        &mut self.socket
    }

    fn filter_state(&mut self) -> &mut FilterStateStore {
        &mut self.filter_state
    }

    fn dispatcher(&self) -> Option<&DispatcherHandle> {
        self.dispatcher.as_ref()
    }
}
