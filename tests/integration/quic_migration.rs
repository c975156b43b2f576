//! QUIC migration integration tests
//!
//! Exercises the migration gate the way a QUIC listener would: accept
//! publishes connection state, early packets update the shared
//! statistics, and address migration events consult the configured
//! policy.
//!
//! Covers:
//! - Filter state published during the accept walk
//! - First-packet statistics accumulation and text rendering
//! - Peer address changes under permissive and strict policies
//! - Server preferred address compatibility across multi-gate chains
//! - Event-loop handle capture inside and outside a runtime
//!
//! # Usage
//!
//! ```bash
//! cargo test --test integration_tests quic_migration
//! ```

use std::net::SocketAddr;

use listener_probe::config::load_config_str;
use listener_probe::filter::{
    AcceptContext, ChainState, FilterVerdict, ListenerFilter, QuicMigrationGate,
};
use listener_probe::net::{CloseMode, HarnessConnection, ReceivedPacket};
use listener_probe::state::{FirstPacketStats, StateType, StringAccessor};

/// Single gate that tolerates server migration but refuses the peer
/// moving to a new address.
const STRICT_GATE: &str = r#"{
    "quic": [
        {
            "type": "migration_gate",
            "added_value": "x",
            "allow_server_migration": true,
            "allow_client_migration": false
        }
    ]
}"#;

fn addr(s: &str) -> SocketAddr {
    s.parse().unwrap()
}

// ============================================================================
// Gate lifecycle
// ============================================================================

mod gate_lifecycle {
    use super::*;

    /// The complete scenario: accept publishes state, a first packet
    /// is recorded into the shared statistics, and a peer address
    /// change is refused by closing the connection.
    #[test]
    fn test_accept_record_then_refused_migration() {
        crate::integration::init_logging();

        let config = load_config_str(STRICT_GATE).unwrap();
        let mut chain = config.build_quic_chain().unwrap();
        let mut ctx = AcceptContext::new();

        assert_eq!(chain.on_accept(&mut ctx).unwrap(), ChainState::Done);

        // Accept published the configured string and zeroed statistics.
        let state = ctx.filter_state();
        assert_eq!(
            state
                .get::<StringAccessor>(QuicMigrationGate::STRING_STATE_KEY)
                .unwrap()
                .as_str(),
            "x"
        );
        assert_eq!(
            state.state_type(QuicMigrationGate::STRING_STATE_KEY),
            Some(StateType::ReadOnly)
        );
        assert_eq!(
            state.state_type(FirstPacketStats::KEY),
            Some(StateType::Mutable)
        );
        assert_eq!(state.serialize(FirstPacketStats::KEY).as_deref(), Some("0,0,0"));

        // An early packet updates the stored statistics in place.
        let packet = ReceivedPacket::new(100).with_headers(vec![0u8; 20]);
        assert_eq!(
            chain.on_first_packet_received(&packet),
            FilterVerdict::Continue
        );
        assert_eq!(
            ctx.filter_state().serialize(FirstPacketStats::KEY).as_deref(),
            Some("1,100,20")
        );

        // Server preferred address usage is tolerated, peer moves are not.
        assert!(chain.is_compatible_with_server_preferred_address(addr("203.0.113.9:4443")));

        let mut connection = HarnessConnection::new();
        assert_eq!(
            chain.on_peer_address_changed(addr("198.51.100.20:40000"), &mut connection),
            FilterVerdict::StopIteration
        );
        let record = connection.close_record().unwrap();
        assert_eq!(record.mode, CloseMode::NoFlush);
        assert_eq!(record.reason, QuicMigrationGate::MIGRATION_CLOSE_REASON);
    }

    /// With the default policy both migration directions stay open.
    #[test]
    fn test_permissive_gate_keeps_connection_open() {
        let config = load_config_str(
            r#"{ "quic": [{ "type": "migration_gate", "added_value": "x" }] }"#,
        )
        .unwrap();
        let mut chain = config.build_quic_chain().unwrap();
        let mut ctx = AcceptContext::new();
        chain.on_accept(&mut ctx).unwrap();

        let mut connection = HarnessConnection::new();
        assert_eq!(
            chain.on_peer_address_changed(addr("198.51.100.20:40000"), &mut connection),
            FilterVerdict::Continue
        );
        assert!(connection.close_record().is_none());
        assert!(chain.is_compatible_with_server_preferred_address(addr("203.0.113.9:4443")));
    }
}

// ============================================================================
// First-packet statistics
// ============================================================================

mod first_packet {
    use super::*;

    /// The packet count accumulates while the length fields keep only
    /// the most recent observation.
    #[test]
    fn test_count_accumulates_lengths_track_latest() {
        let config = load_config_str(STRICT_GATE).unwrap();
        let mut chain = config.build_quic_chain().unwrap();
        let mut ctx = AcceptContext::new();
        chain.on_accept(&mut ctx).unwrap();

        for (length, headers) in [(1200, 32), (800, 24), (1350, 40)] {
            let packet = ReceivedPacket::new(length).with_headers(vec![0u8; headers]);
            assert_eq!(
                chain.on_first_packet_received(&packet),
                FilterVerdict::Continue
            );
        }

        assert_eq!(
            ctx.filter_state().serialize(FirstPacketStats::KEY).as_deref(),
            Some("3,1350,40")
        );
    }

    /// A packet delivered without header bytes still counts, with a
    /// zero headers length.
    #[test]
    fn test_headerless_packet_records_zero_headers() {
        let config = load_config_str(STRICT_GATE).unwrap();
        let mut chain = config.build_quic_chain().unwrap();
        let mut ctx = AcceptContext::new();
        chain.on_accept(&mut ctx).unwrap();

        assert_eq!(
            chain.on_first_packet_received(&ReceivedPacket::new(55)),
            FilterVerdict::Continue
        );
        assert_eq!(
            ctx.filter_state().serialize(FirstPacketStats::KEY).as_deref(),
            Some("1,55,0")
        );
    }
}

// ============================================================================
// Multi-gate chains
// ============================================================================

mod multi_gate {
    use super::*;

    /// One strict gate makes the whole chain refuse the server's
    /// preferred address.
    #[test]
    fn test_preferred_address_needs_every_gate() {
        let config = load_config_str(
            r#"{
                "quic": [
                    { "type": "migration_gate", "added_value": "lenient" },
                    {
                        "type": "migration_gate",
                        "added_value": "strict",
                        "allow_server_migration": false
                    }
                ]
            }"#,
        )
        .unwrap();
        let chain = config.build_quic_chain().unwrap();

        assert!(!chain.is_compatible_with_server_preferred_address(addr("203.0.113.9:4443")));
    }

    /// Peer address dispatch halts at the first gate that refuses,
    /// closing the connection exactly once.
    #[test]
    fn test_peer_change_halts_at_first_refusal() {
        let config = load_config_str(
            r#"{
                "quic": [
                    {
                        "type": "migration_gate",
                        "added_value": "strict",
                        "allow_client_migration": false
                    },
                    { "type": "migration_gate", "added_value": "lenient" }
                ]
            }"#,
        )
        .unwrap();
        let mut chain = config.build_quic_chain().unwrap();

        let mut connection = HarnessConnection::new();
        assert_eq!(
            chain.on_peer_address_changed(addr("198.51.100.20:40000"), &mut connection),
            FilterVerdict::StopIteration
        );
        assert_eq!(
            connection.close_record().unwrap().reason,
            QuicMigrationGate::MIGRATION_CLOSE_REASON
        );
    }
}

// ============================================================================
// Event-loop capture
// ============================================================================

mod event_loop_capture {
    use super::*;

    /// Inside a runtime the accept walk hands the gate a handle to the
    /// event loop driving the connection.
    #[tokio::test]
    async fn test_gate_records_dispatcher_inside_runtime() {
        let mut gate = QuicMigrationGate::new("x", true, true);
        let mut ctx = AcceptContext::new();
        assert!(ctx.dispatcher().is_some());

        assert_eq!(gate.on_accept(&mut ctx), FilterVerdict::Continue);
        assert!(gate.dispatcher().is_some());
    }

    /// Outside a runtime there is no event loop to record; the accept
    /// walk still succeeds.
    #[test]
    fn test_gate_tolerates_missing_dispatcher() {
        let mut gate = QuicMigrationGate::new("x", true, true);
        let mut ctx = AcceptContext::new();
        assert!(ctx.dispatcher().is_none());

        assert_eq!(gate.on_accept(&mut ctx), FilterVerdict::Continue);
        assert!(gate.dispatcher().is_none());
    }
}
