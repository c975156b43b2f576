//! Listener filter pipeline
//!
//! This module provides the filter traits, the chain state machine
//! that drives them, and the concrete filters the harness installs:
//!
//! - `AlpnInjector`: applies a staged ALPN value at accept time
//! - `TcpDrainFilter`: discards a fixed prefix of initial bytes
//! - `UdpPassthroughFilter`: observes datagrams without altering them
//! - `QuicMigrationGate`: publishes connection state and polices QUIC
//!   address migration
//!
//! # Example
//!
//! ```
//! use listener_probe::filter::{
//!     AcceptContext, AlpnCell, AlpnInjector, ChainState, FilterChain, FilterChainBuilder,
//!     TcpDrainFilter,
//! };
//! use listener_probe::net::AcceptBuffer;
//!
//! # fn main() -> Result<(), listener_probe::error::ChainError> {
//! let alpn = AlpnCell::new();
//! let builder: FilterChainBuilder = FilterChain::builder();
//! let mut chain = builder
//!     .add(Box::new(AlpnInjector::new(alpn.clone())))
//!     .add(Box::new(TcpDrainFilter::new(4)))
//!     .build()?;
//!
//! alpn.set("h3");
//! let mut ctx = AcceptContext::new();
//! assert_eq!(chain.on_accept(&mut ctx)?, ChainState::AwaitingData);
//!
//! let mut buffer = AcceptBuffer::from(&b"ping actual-payload"[..]);
//! assert_eq!(chain.on_data(&mut ctx, &mut buffer)?, ChainState::Done);
//! assert_eq!(buffer.as_slice(), b" actual-payload");
//! # Ok(())
//! # }
//! ```

mod alpn;
mod chain;
mod context;
mod quic_migration;
mod tcp_drain;
mod traits;
mod udp;

pub use alpn::{AlpnCell, AlpnInjector};
pub use chain::{ChainState, FilterChain, FilterChainBuilder, QuicFilterChain};
pub use context::AcceptContext;
pub use quic_migration::QuicMigrationGate;
pub use tcp_drain::{TcpDrainFilter, TCP_DRAIN_READ_AHEAD};
pub use traits::{
    DatagramFilter, FilterVerdict, ListenerFilter, ListenerFilterCallbacks, QuicListenerFilter,
};
pub use udp::UdpPassthroughFilter;
