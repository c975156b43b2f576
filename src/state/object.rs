//! Typed objects stored in per-connection filter state

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Mutability contract attached to a stored object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateType {
    /// The object is frozen once stored and only handed out by
    /// shared reference.
    ReadOnly,
    /// The object may keep changing after insertion, either through
    /// replacement or through a handle the installing filter retained.
    Mutable,
}

impl fmt::Display for StateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadOnly => write!(f, "read-only"),
            Self::Mutable => write!(f, "mutable"),
        }
    }
}

/// Lifetime scope of a stored object.
///
/// Only connection scope exists today; entries vanish when the store
/// owning them is dropped at connection teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifeSpan {
    /// Entry lives exactly as long as the accepted connection.
    Connection,
}

impl fmt::Display for LifeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection => write!(f, "connection"),
        }
    }
}

/// Object that can live in a [`FilterStateStore`](super::FilterStateStore).
///
/// Implementations must be thread safe: mutable entries are typically
/// shared between a filter callback and assertion code on another thread.
pub trait FilterStateObject: Send + Sync {
    /// Render the object as text for logging and assertions.
    ///
    /// Objects without a sensible text form return `None`, which is
    /// the default.
    fn serialize_to_string(&self) -> Option<String> {
        None
    }

    /// Upcast used by the store for typed retrieval.
    fn as_any(&self) -> &dyn Any;
}

/// A stored object together with its ownership contract.
///
/// Read-only entries are owned exclusively by the store. Mutable
/// entries are reference counted so the installing filter can keep a
/// handle and update the object after insertion.
pub enum StateValue {
    /// Exclusively owned, immutable after insertion.
    ReadOnly(Box<dyn FilterStateObject>),
    /// Shared with the installing filter.
    Mutable(Arc<dyn FilterStateObject>),
}

impl StateValue {
    /// Wrap an object as a read-only entry.
    pub fn read_only(object: impl FilterStateObject + 'static) -> Self {
        Self::ReadOnly(Box::new(object))
    }

    /// Wrap a shared object as a mutable entry.
    #[must_use]
    pub fn mutable(object: Arc<dyn FilterStateObject>) -> Self {
        Self::Mutable(object)
    }

    /// The mutability contract this value was stored under.
    #[must_use]
    pub fn state_type(&self) -> StateType {
        match self {
            Self::ReadOnly(_) => StateType::ReadOnly,
            Self::Mutable(_) => StateType::Mutable,
        }
    }

    /// Borrow the stored object regardless of ownership flavor.
    pub(crate) fn object(&self) -> &dyn FilterStateObject {
        match self {
            Self::ReadOnly(object) => object.as_ref(),
            Self::Mutable(object) => object.as_ref(),
        }
    }
}

impl fmt::Debug for StateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.object().serialize_to_string() {
            Some(text) => write!(f, "StateValue({}, {text:?})", self.state_type()),
            None => write!(f, "StateValue({})", self.state_type()),
        }
    }
}

/// A plain string published into filter state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringAccessor {
    value: String,
}

impl StringAccessor {
    /// Create a new string accessor.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Get the stored string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl FilterStateObject for StringAccessor {
    fn serialize_to_string(&self) -> Option<String> {
        Some(self.value.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
