//! UDP passthrough filter

use std::io;

use tracing::trace;

use crate::net::Datagram;

use super::traits::{DatagramFilter, FilterVerdict};

/// Datagram filter that observes traffic without altering it.
///
/// Every datagram and every receive error is passed through, keeping
/// the listener's behavior identical to having no filter installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpPassthroughFilter;

impl UdpPassthroughFilter {
    /// Create a passthrough filter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DatagramFilter for UdpPassthroughFilter {
    fn on_data(&mut self, datagram: &Datagram) -> FilterVerdict {
        trace!(
            peer = %datagram.peer_addr,
            local = %datagram.local_addr,
            bytes = datagram.len(),
            "passing datagram through"
        );
        FilterVerdict::Continue
    }

    fn on_receive_error(&mut self, error: io::ErrorKind) -> FilterVerdict {
        trace!(error = ?error, "ignoring receive error");
        FilterVerdict::Continue
    }
}
