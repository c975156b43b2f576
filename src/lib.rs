//! listener-probe: Listener-filter harness for a proxy's accept path
//!
//! This crate provides an injectable listener-filter pipeline used to
//! observe and steer the earliest stage of inbound connection
//! establishment, before any application protocol is parsed. A test
//! driver feeds accept and data events into a filter chain and asserts
//! on the socket, connection, and filter-state effects.
//!
//! # Features
//!
//! - **ALPN Injection**: stamp a staged protocol value onto an accepted socket
//! - **TCP Draining**: pause the accept path and discard a prefix of initial data
//! - **UDP Passthrough**: observe datagrams and receive errors without altering them
//! - **QUIC Migration Gating**: publish connection state and police address migration
//! - **Explicit Chain Phases**: out-of-phase events are reported, not misrouted
//!
//! # Architecture
//!
//! ```text
//! Driver → accept event → FilterChain → filters (in order)
//!            data event ──────┘│
//!                              ▼
//!               AcceptContext (socket, filter state, dispatcher)
//! ```
//!
//! # Quick Start
//!
//! ```
//! use listener_probe::config::load_config_str;
//! use listener_probe::filter::{AcceptContext, AlpnCell, ChainState};
//! use listener_probe::net::AcceptBuffer;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config_str(
//!     r#"{ "chain": [
//!         { "type": "alpn" },
//!         { "type": "tcp_drain", "drain_bytes": 4 }
//!     ] }"#,
//! )?;
//!
//! let alpn = AlpnCell::new();
//! let mut chain = config.build_chain(&alpn)?;
//!
//! alpn.set("h3");
//! let mut ctx = AcceptContext::new();
//! assert_eq!(chain.on_accept(&mut ctx)?, ChainState::AwaitingData);
//! assert_eq!(ctx.socket().requested_application_protocols(), ["h3"]);
//!
//! let mut buffer = AcceptBuffer::from(&b"ping payload"[..]);
//! assert_eq!(chain.on_data(&mut ctx, &mut buffer)?, ChainState::Done);
//! assert_eq!(buffer.as_slice(), b" payload");
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration types and loading
//! - [`error`]: Error types
//! - [`filter`]: Filter traits, chain state machine, and shipped filters
//! - [`net`]: Socket, connection, buffer, and packet collaborators
//! - [`state`]: Connection-scoped filter state store

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod error;
pub mod filter;
pub mod net;
pub mod state;

// Re-export commonly used types at the crate root
pub use config::{load_config, HarnessConfig};
pub use error::{ChainError, ConfigError, ListenerProbeError, StateError};
pub use filter::{
    AcceptContext, AlpnCell, ChainState, FilterChain, FilterVerdict, ListenerFilter,
    QuicFilterChain, QuicListenerFilter,
};
pub use net::{AcceptBuffer, CloseMode, Datagram, ReceivedPacket};
pub use state::{FilterStateStore, FirstPacketStats, StateValue};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
