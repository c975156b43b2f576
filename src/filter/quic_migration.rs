//! QUIC connection migration gate

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::net::{CloseMode, Connection, DispatcherHandle, ReceivedPacket};
use crate::state::{FirstPacketStats, LifeSpan, StateValue, StringAccessor};

use super::traits::{FilterVerdict, ListenerFilter, ListenerFilterCallbacks, QuicListenerFilter};

/// QUIC filter that publishes connection state and polices migration.
///
/// At accept time the gate publishes a configured string and a shared
/// first-packet statistics object into filter state, and records the
/// event loop it ran on. Until the chain completes it also decides
/// whether server preferred address usage and peer address changes are
/// allowed, and keeps the statistics current as early packets arrive.
pub struct QuicMigrationGate {
    added_value: String,
    allow_server_migration: bool,
    allow_client_migration: bool,
    first_packet: Arc<FirstPacketStats>,
    dispatcher: Option<DispatcherHandle>,
}

impl QuicMigrationGate {
    /// Key the configured string is published under.
    pub const STRING_STATE_KEY: &'static str = "test.filter_state.string";

    /// Close reason given to connections whose peer address change was
    /// disallowed.
    pub const MIGRATION_CLOSE_REASON: &'static str =
        "migration to a new peer address is not allowed by this filter";

    /// Create a gate.
    ///
    /// `added_value` is the string published into filter state.
    /// `allow_server_migration` controls server preferred address
    /// compatibility; `allow_client_migration` controls peer address
    /// changes.
    pub fn new(
        added_value: impl Into<String>,
        allow_server_migration: bool,
        allow_client_migration: bool,
    ) -> Self {
        Self {
            added_value: added_value.into(),
            allow_server_migration,
            allow_client_migration,
            first_packet: Arc::new(FirstPacketStats::new()),
            dispatcher: None,
        }
    }

    /// Shared handle to the statistics this gate keeps updating.
    #[must_use]
    pub fn first_packet_stats(&self) -> Arc<FirstPacketStats> {
        Arc::clone(&self.first_packet)
    }

    /// Event loop recorded at accept time, when one existed.
    #[must_use]
    pub fn dispatcher(&self) -> Option<&DispatcherHandle> {
        self.dispatcher.as_ref()
    }
}

impl ListenerFilter for QuicMigrationGate {
    fn name(&self) -> &'static str {
        "quic_migration_gate"
    }

    fn on_accept(&mut self, callbacks: &mut dyn ListenerFilterCallbacks) -> FilterVerdict {
        if let Err(err) = callbacks.filter_state().set_data(
            Self::STRING_STATE_KEY,
            StateValue::read_only(StringAccessor::new(self.added_value.clone())),
            LifeSpan::Connection,
        ) {
            warn!(error = %err, "failed to publish string state");
        }
        if let Err(err) = callbacks.filter_state().set_data(
            FirstPacketStats::KEY,
            StateValue::mutable(self.first_packet.clone()),
            LifeSpan::Connection,
        ) {
            warn!(error = %err, "failed to publish first-packet statistics");
        }
        self.dispatcher = callbacks.dispatcher().cloned();
        debug!(value = %self.added_value, "published connection state");
        FilterVerdict::Continue
    }
}

impl QuicListenerFilter for QuicMigrationGate {
    fn is_compatible_with_server_preferred_address(
        &self,
        server_preferred_address: SocketAddr,
    ) -> bool {
        trace!(
            address = %server_preferred_address,
            allowed = self.allow_server_migration,
            "checked server preferred address compatibility"
        );
        self.allow_server_migration
    }

    fn on_peer_address_changed(
        &mut self,
        new_address: SocketAddr,
        connection: &mut dyn Connection,
    ) -> FilterVerdict {
        if self.allow_client_migration {
            debug!(new_address = %new_address, "allowing peer address change");
            return FilterVerdict::Continue;
        }
        warn!(
            new_address = %new_address,
            "closing connection on disallowed peer address change"
        );
        connection.close(CloseMode::NoFlush, Self::MIGRATION_CLOSE_REASON);
        FilterVerdict::StopIteration
    }

    fn on_first_packet_received(&mut self, packet: &ReceivedPacket) -> FilterVerdict {
        self.first_packet
            .record_packet(packet.length(), packet.headers_length());
        if packet.headers_length() > 0 {
            if let Some(headers) = packet.headers() {
                // Header bytes are only valid during this callback; inspect
                // a scratch copy sized to the reported header length.
                let scratch = headers.to_vec();
                trace!(copied = scratch.len(), "inspected first packet headers");
            }
        }
        trace!(
            length = packet.length(),
            headers_length = packet.headers_length(),
            "recorded early packet"
        );
        FilterVerdict::Continue
    }
}
