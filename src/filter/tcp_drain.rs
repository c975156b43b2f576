//! TCP prefix drain filter

use tracing::{debug, trace};

use crate::net::AcceptBuffer;

use super::traits::{FilterVerdict, ListenerFilter, ListenerFilterCallbacks};

/// Read-ahead window the drain filter requests, in bytes.
pub const TCP_DRAIN_READ_AHEAD: usize = 1024;

/// Discards a fixed-length prefix of each connection's initial bytes.
///
/// The filter pauses the chain at accept and releases it on the first
/// data event: when at least `drain_bytes` are buffered by then,
/// exactly that many leading bytes are discarded; otherwise the buffer
/// is left intact. With `drain_bytes` of zero the filter still pauses
/// and releases without touching the buffer.
#[derive(Debug)]
pub struct TcpDrainFilter {
    drain_bytes: usize,
}

impl TcpDrainFilter {
    /// Create a filter that discards `drain_bytes` leading bytes.
    #[must_use]
    pub fn new(drain_bytes: usize) -> Self {
        Self { drain_bytes }
    }

    /// Number of leading bytes this filter discards.
    #[must_use]
    pub fn drain_bytes(&self) -> usize {
        self.drain_bytes
    }
}

impl ListenerFilter for TcpDrainFilter {
    fn name(&self) -> &'static str {
        "tcp_drain"
    }

    fn on_accept(&mut self, _callbacks: &mut dyn ListenerFilterCallbacks) -> FilterVerdict {
        trace!(drain_bytes = self.drain_bytes, "pausing for initial data");
        FilterVerdict::StopIteration
    }

    fn on_data(&mut self, buffer: &mut AcceptBuffer) -> FilterVerdict {
        if self.drain_bytes > 0 {
            if buffer.drain(self.drain_bytes) {
                debug!(
                    drained = self.drain_bytes,
                    remaining = buffer.len(),
                    "drained connection prefix"
                );
            } else {
                trace!(
                    buffered = buffer.len(),
                    wanted = self.drain_bytes,
                    "not enough data to drain; leaving buffer intact"
                );
            }
        }
        FilterVerdict::Continue
    }

    fn max_read_bytes(&self) -> usize {
        TCP_DRAIN_READ_AHEAD
    }
}
