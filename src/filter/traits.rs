//! Core listener filter traits

use std::fmt;
use std::io;
use std::net::SocketAddr;

use crate::net::{AcceptBuffer, AcceptSocket, Connection, Datagram, DispatcherHandle, ReceivedPacket};
use crate::state::FilterStateStore;

/// Verdict a filter returns from each callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterVerdict {
    /// Hand control to the next filter in the chain.
    Continue,
    /// Halt iteration; the chain stays parked on the current filter.
    StopIteration,
}

impl FilterVerdict {
    /// Check if this verdict lets iteration proceed
    #[must_use]
    pub const fn is_continue(self) -> bool {
        matches!(self, Self::Continue)
    }
}

impl fmt::Display for FilterVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Continue => write!(f, "continue"),
            Self::StopIteration => write!(f, "stop-iteration"),
        }
    }
}

/// Callbacks a listener filter may invoke during accept processing.
pub trait ListenerFilterCallbacks {
    /// Socket of the connection being accepted.
    fn socket(&mut self) -> &mut dyn AcceptSocket;

    /// State store scoped to the connection being accepted.
    fn filter_state(&mut self) -> &mut FilterStateStore;

    /// Event loop delivering this accept, when one exists.
    fn dispatcher(&self) -> Option<&DispatcherHandle>;
}

/// A filter consulted while a connection is being accepted.
///
/// Filters run in installation order. A filter that needs to inspect
/// initial bytes stops iteration from [`on_accept`](Self::on_accept)
/// and declares a read-ahead window through
/// [`max_read_bytes`](Self::max_read_bytes); buffered data is then
/// delivered to [`on_data`](Self::on_data) until the filter continues.
pub trait ListenerFilter: Send {
    /// Short name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    /// Called once when the connection is accepted.
    fn on_accept(&mut self, callbacks: &mut dyn ListenerFilterCallbacks) -> FilterVerdict;

    /// Called with the buffered prefix while this filter holds the
    /// chain paused. The default continues immediately.
    fn on_data(&mut self, _buffer: &mut AcceptBuffer) -> FilterVerdict {
        FilterVerdict::Continue
    }

    /// Read-ahead window in bytes this filter wants before its
    /// [`on_data`](Self::on_data) runs. A filter that stops iteration
    /// with a zero window can never be resumed.
    fn max_read_bytes(&self) -> usize {
        0
    }
}

/// Additional callbacks for filters installed on QUIC listeners.
///
/// All QUIC-aware filters still participate in the accept walk through
/// their [`ListenerFilter`] methods; the methods here are delivered by
/// the transport outside that walk, before the chain completes.
pub trait QuicListenerFilter: ListenerFilter {
    /// Whether this filter keeps working if the server later migrates
    /// the connection to `server_preferred_address`.
    fn is_compatible_with_server_preferred_address(
        &self,
        _server_preferred_address: SocketAddr,
    ) -> bool {
        true
    }

    /// Called when the peer's source address changes before the chain
    /// completes. A filter that stops iteration here has taken
    /// responsibility for `connection`, typically by closing it.
    fn on_peer_address_changed(
        &mut self,
        _new_address: SocketAddr,
        _connection: &mut dyn Connection,
    ) -> FilterVerdict {
        FilterVerdict::Continue
    }

    /// Called for each packet observed before the chain completes.
    fn on_first_packet_received(&mut self, _packet: &ReceivedPacket) -> FilterVerdict {
        FilterVerdict::Continue
    }
}

/// A filter consulted for each datagram arriving on a UDP listener.
pub trait DatagramFilter: Send {
    /// Called for each received datagram.
    fn on_data(&mut self, datagram: &Datagram) -> FilterVerdict;

    /// Called when the listener fails to receive, with the error
    /// category the socket reported.
    fn on_receive_error(&mut self, error: io::ErrorKind) -> FilterVerdict;
}
