//! ALPN injection at accept time

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::traits::{FilterVerdict, ListenerFilter, ListenerFilterCallbacks};

/// Shared cell holding the ALPN value the next accepted connection
/// must request.
///
/// The driver stages a value, the injector consumes it during accept.
/// An empty string means "unset"; consuming an unset cell is a usage
/// error and panics. The lock is held only for the swap, never across
/// a filter callback.
#[derive(Debug, Clone)]
pub struct AlpnCell {
    value: Arc<Mutex<String>>,
}

impl AlpnCell {
    /// Create an unset cell.
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: Arc::new(Mutex::new(String::new())),
        }
    }

    /// Stage `alpn` for the next accepted connection, replacing any
    /// staged value.
    pub fn set(&self, alpn: impl Into<String>) {
        *self.value.lock() = alpn.into();
    }

    /// Check whether a value is currently staged.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.value.lock().is_empty()
    }

    /// Take the staged value, leaving the cell unset.
    #[must_use]
    pub fn take(&self) -> String {
        std::mem::take(&mut *self.value.lock())
    }
}

impl Default for AlpnCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the staged ALPN value to each accepted connection's socket.
///
/// # Panics
///
/// Accepting a connection while the cell is unset panics: the driver
/// must stage a value before every accept.
#[derive(Debug)]
pub struct AlpnInjector {
    alpn: AlpnCell,
}

impl AlpnInjector {
    /// Create an injector drawing from `alpn`.
    #[must_use]
    pub fn new(alpn: AlpnCell) -> Self {
        Self { alpn }
    }
}

impl ListenerFilter for AlpnInjector {
    fn name(&self) -> &'static str {
        "alpn_injector"
    }

    fn on_accept(&mut self, callbacks: &mut dyn ListenerFilterCallbacks) -> FilterVerdict {
        let alpn = self.alpn.take();
        assert!(
            !alpn.is_empty(),
            "no ALPN value staged; call AlpnCell::set before each accepted connection"
        );
        debug!(alpn = %alpn, "requesting application protocol on accepted socket");
        callbacks
            .socket()
            .set_requested_application_protocols(vec![alpn]);
        FilterVerdict::Continue
    }
}
