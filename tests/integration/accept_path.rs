//! Accept-path integration tests
//!
//! Drives configuration-built filter chains through the harness
//! context the way a listener would: one accept event per connection,
//! then data events until the chain completes.
//!
//! Covers:
//! - Full accept walks through heterogeneous chains
//! - Chain phase enforcement across the public API
//! - ALPN staging from the driving thread and from control threads
//! - The datagram passthrough path
//!
//! # Usage
//!
//! ```bash
//! cargo test --test integration_tests accept_path
//! ```

use listener_probe::config::{load_config_str, HarnessConfig};
use listener_probe::filter::{
    AcceptContext, AlpnCell, ChainState, DatagramFilter, FilterVerdict, UdpPassthroughFilter,
    TCP_DRAIN_READ_AHEAD,
};
use listener_probe::net::{AcceptBuffer, Datagram};
use listener_probe::ChainError;

/// Chain with an ALPN injector followed by a six-byte drain.
const ALPN_THEN_DRAIN: &str = r#"{
    "chain": [
        { "type": "alpn" },
        { "type": "tcp_drain", "drain_bytes": 6 }
    ]
}"#;

// ============================================================================
// Full accept walk
// ============================================================================

mod accept_walk {
    use super::*;

    /// One connection through an ALPN injector and a drain filter: the
    /// injector stamps the socket, the drain filter pauses for data,
    /// and the first data event strips the prefix and completes.
    #[test]
    fn test_alpn_then_drain_completes_after_one_data_event() {
        crate::integration::init_logging();

        let config = load_config_str(ALPN_THEN_DRAIN).unwrap();
        let alpn = AlpnCell::new();
        let mut chain = config.build_chain(&alpn).unwrap();

        alpn.set("h3-29");
        let mut ctx = AcceptContext::new();

        assert_eq!(chain.on_accept(&mut ctx).unwrap(), ChainState::AwaitingData);
        assert_eq!(ctx.socket().requested_application_protocols(), ["h3-29"]);
        assert_eq!(chain.read_ahead(), TCP_DRAIN_READ_AHEAD);

        let mut buffer = AcceptBuffer::from(&b"PROXY tcp4 192.0.2.1"[..]);
        assert_eq!(chain.on_data(&mut ctx, &mut buffer).unwrap(), ChainState::Done);
        assert_eq!(buffer.as_slice(), b"tcp4 192.0.2.1");
        assert_eq!(chain.state(), ChainState::Done);
    }

    /// A data event shorter than the configured drain still releases
    /// the chain, leaving the buffered bytes untouched.
    #[test]
    fn test_short_read_releases_without_draining() {
        let config =
            load_config_str(r#"{ "chain": [{ "type": "tcp_drain", "drain_bytes": 512 }] }"#)
                .unwrap();
        let alpn = AlpnCell::new();
        let mut chain = config.build_chain(&alpn).unwrap();
        let mut ctx = AcceptContext::new();

        assert_eq!(chain.on_accept(&mut ctx).unwrap(), ChainState::AwaitingData);

        let mut buffer = AcceptBuffer::from(&b"tiny"[..]);
        assert_eq!(chain.on_data(&mut ctx, &mut buffer).unwrap(), ChainState::Done);
        assert_eq!(buffer.as_slice(), b"tiny");
    }

    /// Draining exactly the buffered length leaves an empty buffer for
    /// whatever reads the connection next.
    #[test]
    fn test_exact_drain_empties_the_buffer() {
        let config = load_config_str(ALPN_THEN_DRAIN).unwrap();
        let alpn = AlpnCell::new();
        let mut chain = config.build_chain(&alpn).unwrap();

        alpn.set("h2");
        let mut ctx = AcceptContext::new();
        chain.on_accept(&mut ctx).unwrap();

        let mut buffer = AcceptBuffer::from(&b"abcdef"[..]);
        assert_eq!(chain.on_data(&mut ctx, &mut buffer).unwrap(), ChainState::Done);
        assert!(buffer.is_empty());
    }

    /// The default configuration builds a chain that pauses at accept
    /// and completes after a single data event.
    #[test]
    fn test_default_config_connection_completes() {
        let config = HarnessConfig::default_config();
        let alpn = AlpnCell::new();
        let mut chain = config.build_chain(&alpn).unwrap();
        let mut ctx = AcceptContext::new();

        assert_eq!(chain.on_accept(&mut ctx).unwrap(), ChainState::AwaitingData);

        let mut buffer = AcceptBuffer::from(&b"client hello"[..]);
        assert_eq!(chain.on_data(&mut ctx, &mut buffer).unwrap(), ChainState::Done);
        assert_eq!(buffer.as_slice(), b"client hello");
    }
}

// ============================================================================
// Phase enforcement
// ============================================================================

mod phase_enforcement {
    use super::*;

    /// Accept must not be delivered twice for one connection.
    #[test]
    fn test_second_accept_is_rejected() {
        let config = load_config_str(ALPN_THEN_DRAIN).unwrap();
        let alpn = AlpnCell::new();
        let mut chain = config.build_chain(&alpn).unwrap();

        alpn.set("h3");
        let mut ctx = AcceptContext::new();
        chain.on_accept(&mut ctx).unwrap();

        let err = chain.on_accept(&mut ctx).unwrap_err();
        assert!(matches!(err, ChainError::InvalidPhase { .. }));
    }

    /// Data before the accept walk has run is a driver bug.
    #[test]
    fn test_data_before_accept_is_rejected() {
        let config = load_config_str(ALPN_THEN_DRAIN).unwrap();
        let alpn = AlpnCell::new();
        let mut chain = config.build_chain(&alpn).unwrap();
        let mut ctx = AcceptContext::new();

        let mut buffer = AcceptBuffer::from(&b"early"[..]);
        let err = chain.on_data(&mut ctx, &mut buffer).unwrap_err();
        assert!(matches!(err, ChainError::InvalidPhase { .. }));
    }

    /// Once the chain completes, further data events are rejected
    /// rather than silently swallowed.
    #[test]
    fn test_data_after_completion_is_rejected() {
        let config = load_config_str(ALPN_THEN_DRAIN).unwrap();
        let alpn = AlpnCell::new();
        let mut chain = config.build_chain(&alpn).unwrap();

        alpn.set("h3");
        let mut ctx = AcceptContext::new();
        chain.on_accept(&mut ctx).unwrap();

        let mut buffer = AcceptBuffer::from(&b"PROXY tcp4 192.0.2.1"[..]);
        chain.on_data(&mut ctx, &mut buffer).unwrap();

        let mut late = AcceptBuffer::from(&b"late"[..]);
        let err = chain.on_data(&mut ctx, &mut late).unwrap_err();
        assert!(matches!(err, ChainError::InvalidPhase { .. }));
    }
}

// ============================================================================
// ALPN staging
// ============================================================================

mod alpn_staging {
    use super::*;

    /// A control thread stages the value; the accept walk on the test
    /// thread observes it through the shared cell.
    #[test]
    fn test_value_staged_from_control_thread() {
        let config = load_config_str(r#"{ "chain": [{ "type": "alpn" }] }"#).unwrap();
        let alpn = AlpnCell::new();

        let staging = alpn.clone();
        std::thread::spawn(move || staging.set("h3"))
            .join()
            .unwrap();

        let mut chain = config.build_chain(&alpn).unwrap();
        let mut ctx = AcceptContext::new();
        assert_eq!(chain.on_accept(&mut ctx).unwrap(), ChainState::Done);
        assert_eq!(ctx.socket().requested_application_protocols(), ["h3"]);
    }

    /// Consecutive connections each consume exactly one staged value,
    /// with a fresh chain built from the same configuration every time.
    #[test]
    fn test_each_connection_consumes_one_staged_value() {
        let config = load_config_str(r#"{ "chain": [{ "type": "alpn" }] }"#).unwrap();
        let alpn = AlpnCell::new();

        for protocol in ["h2", "h3", "h3-29"] {
            alpn.set(protocol);

            let mut chain = config.build_chain(&alpn).unwrap();
            let mut ctx = AcceptContext::new();
            assert_eq!(chain.on_accept(&mut ctx).unwrap(), ChainState::Done);
            assert_eq!(ctx.socket().requested_application_protocols(), [protocol]);
            assert!(!alpn.is_set());
        }
    }
}

// ============================================================================
// Datagram path
// ============================================================================

mod datagram_path {
    use super::*;

    /// The passthrough filter accepts datagrams and receive errors
    /// without altering the traffic.
    #[test]
    fn test_udp_passthrough_leaves_traffic_untouched() {
        let mut filter = UdpPassthroughFilter::new();
        let datagram = Datagram::new(
            "198.51.100.7:40000".parse().unwrap(),
            "127.0.0.1:443".parse().unwrap(),
            &b"quic initial"[..],
        );

        assert_eq!(filter.on_data(&datagram), FilterVerdict::Continue);
        assert_eq!(datagram.payload.as_ref(), b"quic initial");
        assert_eq!(
            filter.on_receive_error(std::io::ErrorKind::ConnectionReset),
            FilterVerdict::Continue
        );
    }
}
