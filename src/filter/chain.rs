//! Ordered filter chain with explicit accept phases

use std::fmt;
use std::net::SocketAddr;

use tracing::{debug, trace, warn};

use crate::error::ChainError;
use crate::net::{AcceptBuffer, Connection, ReceivedPacket};

use super::traits::{FilterVerdict, ListenerFilter, ListenerFilterCallbacks, QuicListenerFilter};

/// Phase of a filter chain over one accepted connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    /// Ready for the accept event.
    AwaitingAccept,
    /// A filter paused the chain and is waiting for buffered data.
    AwaitingData,
    /// Every filter has run; the connection may proceed.
    Done,
}

impl fmt::Display for ChainState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AwaitingAccept => write!(f, "awaiting-accept"),
            Self::AwaitingData => write!(f, "awaiting-data"),
            Self::Done => write!(f, "done"),
        }
    }
}

/// Ordered set of listener filters driven over one accepted connection.
///
/// The chain is an explicit state machine. It starts in
/// [`ChainState::AwaitingAccept`]; the accept event walks filters in
/// installation order until one pauses for data or all complete. While
/// paused, data events go to the paused filter only, and a continue
/// verdict resumes the walk from the next filter. Events delivered in
/// the wrong phase are rejected rather than misrouted.
///
/// The type parameter selects the filter contract; [`QuicFilterChain`]
/// carries QUIC-aware filters and adds migration dispatch.
pub struct FilterChain<F: ?Sized = dyn ListenerFilter> {
    filters: Vec<Box<F>>,
    state: ChainState,
    position: usize,
}

/// Chain of QUIC-aware filters.
pub type QuicFilterChain = FilterChain<dyn QuicListenerFilter>;

impl<F: ListenerFilter + ?Sized> FilterChain<F> {
    /// Create a chain from filters in installation order.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Empty`] when `filters` is empty.
    pub fn new(filters: Vec<Box<F>>) -> Result<Self, ChainError> {
        if filters.is_empty() {
            return Err(ChainError::Empty);
        }
        Ok(Self {
            filters,
            state: ChainState::AwaitingAccept,
            position: 0,
        })
    }

    /// Start building a chain.
    #[must_use]
    pub fn builder() -> FilterChainBuilder<F> {
        FilterChainBuilder::new()
    }

    /// Current phase of the chain.
    #[must_use]
    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Number of installed filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Check if no filters are installed. Construction rejects empty
    /// chains, so this is false for any chain that exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Names of the installed filters, in installation order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Read-ahead window of the filter the chain is paused on.
    ///
    /// Zero when the chain is not paused.
    #[must_use]
    pub fn read_ahead(&self) -> usize {
        if self.state == ChainState::AwaitingData {
            self.filters[self.position].max_read_bytes()
        } else {
            0
        }
    }

    /// Largest read-ahead window any installed filter may request.
    #[must_use]
    pub fn max_read_bytes(&self) -> usize {
        self.filters
            .iter()
            .map(|f| f.max_read_bytes())
            .max()
            .unwrap_or(0)
    }

    /// Deliver the accept event and walk the chain.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidPhase`] unless the chain is in
    /// [`ChainState::AwaitingAccept`], and [`ChainError::Stalled`] if
    /// a filter stops iteration without a read-ahead window.
    pub fn on_accept(
        &mut self,
        callbacks: &mut dyn ListenerFilterCallbacks,
    ) -> Result<ChainState, ChainError> {
        if self.state != ChainState::AwaitingAccept {
            return Err(ChainError::invalid_phase(
                ChainState::AwaitingAccept,
                self.state,
            ));
        }
        self.run_from_position(callbacks)
    }

    /// Deliver buffered data to the paused filter.
    ///
    /// A continue verdict resumes the accept walk from the next
    /// filter; a stop verdict leaves the chain paused for more data.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidPhase`] unless the chain is in
    /// [`ChainState::AwaitingData`], and [`ChainError::Stalled`] if a
    /// later filter stops iteration without a read-ahead window.
    pub fn on_data(
        &mut self,
        callbacks: &mut dyn ListenerFilterCallbacks,
        buffer: &mut AcceptBuffer,
    ) -> Result<ChainState, ChainError> {
        if self.state != ChainState::AwaitingData {
            return Err(ChainError::invalid_phase(
                ChainState::AwaitingData,
                self.state,
            ));
        }

        let window = self.filters[self.position].max_read_bytes();
        if buffer.len() > window {
            warn!(
                filter = self.filters[self.position].name(),
                buffered = buffer.len(),
                window,
                "data event exceeds the paused filter's read-ahead window"
            );
        }

        match self.filters[self.position].on_data(buffer) {
            FilterVerdict::StopIteration => {
                trace!(
                    filter = self.filters[self.position].name(),
                    buffered = buffer.len(),
                    "filter still waiting for data"
                );
                Ok(self.state)
            }
            FilterVerdict::Continue => {
                self.position += 1;
                self.run_from_position(callbacks)
            }
        }
    }

    /// Walk filters from the current position until one pauses or the
    /// chain completes.
    fn run_from_position(
        &mut self,
        callbacks: &mut dyn ListenerFilterCallbacks,
    ) -> Result<ChainState, ChainError> {
        while self.position < self.filters.len() {
            match self.filters[self.position].on_accept(callbacks) {
                FilterVerdict::Continue => {
                    trace!(filter = self.filters[self.position].name(), "filter continued");
                    self.position += 1;
                }
                FilterVerdict::StopIteration => {
                    let window = self.filters[self.position].max_read_bytes();
                    if window == 0 {
                        return Err(ChainError::stalled(
                            self.position,
                            self.filters[self.position].name(),
                        ));
                    }
                    self.state = ChainState::AwaitingData;
                    debug!(
                        filter = self.filters[self.position].name(),
                        read_ahead = window,
                        "filter paused for data"
                    );
                    return Ok(self.state);
                }
            }
        }
        self.state = ChainState::Done;
        debug!(filters = self.filters.len(), "filter chain completed");
        Ok(self.state)
    }
}

impl<F: QuicListenerFilter + ?Sized> FilterChain<F> {
    /// Whether every installed filter tolerates the server later
    /// migrating traffic to its preferred address.
    #[must_use]
    pub fn is_compatible_with_server_preferred_address(
        &self,
        server_preferred_address: SocketAddr,
    ) -> bool {
        self.filters
            .iter()
            .all(|f| f.is_compatible_with_server_preferred_address(server_preferred_address))
    }

    /// Deliver a peer address change to each filter in order.
    ///
    /// Dispatch halts at the first filter that stops iteration; that
    /// filter has taken responsibility for the connection.
    pub fn on_peer_address_changed(
        &mut self,
        new_address: SocketAddr,
        connection: &mut dyn Connection,
    ) -> FilterVerdict {
        for filter in &mut self.filters {
            if filter.on_peer_address_changed(new_address, connection)
                == FilterVerdict::StopIteration
            {
                debug!(
                    filter = filter.name(),
                    new_address = %new_address,
                    "filter halted peer address migration"
                );
                return FilterVerdict::StopIteration;
            }
        }
        FilterVerdict::Continue
    }

    /// Deliver an early packet observation to each filter in order,
    /// halting at the first filter that stops iteration.
    pub fn on_first_packet_received(&mut self, packet: &ReceivedPacket) -> FilterVerdict {
        for filter in &mut self.filters {
            if filter.on_first_packet_received(packet) == FilterVerdict::StopIteration {
                return FilterVerdict::StopIteration;
            }
        }
        FilterVerdict::Continue
    }
}

impl<F: ListenerFilter + ?Sized> fmt::Debug for FilterChain<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterChain")
            .field("state", &self.state)
            .field("position", &self.position)
            .field("filters", &self.names())
            .finish()
    }
}

/// Builder assembling a [`FilterChain`] in installation order.
pub struct FilterChainBuilder<F: ?Sized = dyn ListenerFilter> {
    filters: Vec<Box<F>>,
}

impl<F: ListenerFilter + ?Sized> FilterChainBuilder<F> {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Install a filter at the end of the chain.
    #[must_use]
    pub fn add(mut self, filter: Box<F>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Assemble the chain.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Empty`] when no filter was installed.
    pub fn build(self) -> Result<FilterChain<F>, ChainError> {
        FilterChain::new(self.filters)
    }
}

impl<F: ListenerFilter + ?Sized> Default for FilterChainBuilder<F> {
    fn default() -> Self {
        Self::new()
    }
}
