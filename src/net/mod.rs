//! Connection-facing collaborators handed to listener filters
//!
//! This module provides the in-memory stand-ins for the network
//! objects a listener filter touches during accept processing:
//! - The accepted socket and its requested-protocol annotations
//! - The server connection and its close modes
//! - The buffered prefix delivered to data callbacks
//! - Datagram and QUIC packet views
//! - The event loop handle recorded at accept time
//!
//! None of these touch a real transport; they capture what filters did
//! so assertion code can inspect it afterwards.

mod buffer;
mod connection;
mod dispatcher;
mod packet;
mod socket;

pub use buffer::AcceptBuffer;
pub use connection::{CloseMode, CloseRecord, Connection, HarnessConnection};
pub use dispatcher::DispatcherHandle;
pub use packet::{Datagram, ReceivedPacket};
pub use socket::{AcceptSocket, HarnessSocket};
