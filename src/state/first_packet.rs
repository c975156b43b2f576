//! First-packet statistics for QUIC connections

use std::any::Any;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use super::object::FilterStateObject;

/// Atomic statistics describing the first packets seen on a QUIC
/// connection before a filter chain completes.
///
/// The packet count accumulates across observations; the two length
/// fields always hold the most recent observation.
#[derive(Debug, Default)]
pub struct FirstPacketStats {
    /// Packets observed so far
    packet_count: AtomicU32,
    /// Payload length of the most recent packet
    packet_length: AtomicUsize,
    /// Header length of the most recent packet
    packet_headers_length: AtomicUsize,
}

impl FirstPacketStats {
    /// Filter state key these statistics are published under
    pub const KEY: &'static str = "test.filter_state.quic_first_packet_received";

    /// Create new first-packet statistics
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observed packet
    pub fn record_packet(&self, packet_length: usize, headers_length: usize) {
        self.packet_count.fetch_add(1, Ordering::Relaxed);
        self.packet_length.store(packet_length, Ordering::Relaxed);
        self.packet_headers_length
            .store(headers_length, Ordering::Relaxed);
    }

    /// Get the number of packets observed
    #[must_use]
    pub fn packet_count(&self) -> u32 {
        self.packet_count.load(Ordering::Relaxed)
    }

    /// Get the payload length of the most recent packet
    #[must_use]
    pub fn packet_length(&self) -> usize {
        self.packet_length.load(Ordering::Relaxed)
    }

    /// Get the header length of the most recent packet
    #[must_use]
    pub fn packet_headers_length(&self) -> usize {
        self.packet_headers_length.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all statistics
    #[must_use]
    pub fn snapshot(&self) -> FirstPacketSnapshot {
        FirstPacketSnapshot {
            packet_count: self.packet_count(),
            packet_length: self.packet_length(),
            packet_headers_length: self.packet_headers_length(),
        }
    }
}

impl FilterStateObject for FirstPacketStats {
    /// Renders as `count,length,headers_length`.
    fn serialize_to_string(&self) -> Option<String> {
        Some(format!(
            "{},{},{}",
            self.packet_count(),
            self.packet_length(),
            self.packet_headers_length()
        ))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Snapshot of first-packet statistics at a point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstPacketSnapshot {
    /// Packets observed
    pub packet_count: u32,
    /// Payload length of the most recent packet
    pub packet_length: usize,
    /// Header length of the most recent packet
    pub packet_headers_length: usize,
}
