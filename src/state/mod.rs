//! Per-connection filter state
//!
//! This module provides the keyed object store that listener filters
//! use to publish facts about an accepted connection:
//! - Typed objects behind the `FilterStateObject` trait
//! - Read-only vs. mutable ownership, declared at insertion time
//! - Lifetime scoping (currently connection-scoped only)
//!
//! # Example
//!
//! ```
//! use listener_probe::state::{FilterStateStore, LifeSpan, StateValue, StringAccessor};
//!
//! let mut store = FilterStateStore::new();
//! store
//!     .set_data(
//!         "sniffed.server_name",
//!         StateValue::read_only(StringAccessor::new("example.com")),
//!         LifeSpan::Connection,
//!     )
//!     .unwrap();
//!
//! let name = store.get::<StringAccessor>("sniffed.server_name").unwrap();
//! assert_eq!(name.as_str(), "example.com");
//! ```

mod first_packet;
mod object;
mod store;

pub use first_packet::{FirstPacketSnapshot, FirstPacketStats};
pub use object::{FilterStateObject, LifeSpan, StateType, StateValue, StringAccessor};
pub use store::FilterStateStore;
