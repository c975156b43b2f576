//! Keyed store for per-connection filter state

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::error::StateError;

use super::object::{FilterStateObject, LifeSpan, StateType, StateValue};

struct StateEntry {
    value: StateValue,
    life_span: LifeSpan,
}

/// Keyed store of typed objects scoped to one accepted connection.
///
/// Filters publish facts about the connection here during accept
/// processing; later filters and assertion code read them back. The
/// store is dropped at connection teardown, which is what gives
/// [`LifeSpan::Connection`] entries their lifetime.
#[derive(Default)]
pub struct FilterStateStore {
    entries: HashMap<String, StateEntry>,
}

impl FilterStateStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `value` under `key` with the given lifetime scope.
    ///
    /// An existing mutable entry may be replaced by another mutable
    /// entry. Every other collision is rejected and the stored entry
    /// is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::DuplicateKey`] when `key` is already
    /// occupied and the replacement is not mutable-over-mutable.
    pub fn set_data(
        &mut self,
        key: impl Into<String>,
        value: StateValue,
        life_span: LifeSpan,
    ) -> Result<(), StateError> {
        let key = key.into();
        if let Some(existing) = self.entries.get(&key) {
            if existing.value.state_type() != StateType::Mutable
                || value.state_type() != StateType::Mutable
            {
                return Err(StateError::duplicate_key(key));
            }
            debug!(key = %key, "replacing mutable filter state entry");
        } else {
            trace!(
                key = %key,
                state_type = %value.state_type(),
                life_span = %life_span,
                "storing filter state entry"
            );
        }
        self.entries.insert(key, StateEntry { value, life_span });
        Ok(())
    }

    /// Retrieve the entry under `key`, downcast to `T`.
    ///
    /// Returns `None` when the key is absent or holds an object of a
    /// different concrete type.
    #[must_use]
    pub fn get<T>(&self, key: &str) -> Option<&T>
    where
        T: FilterStateObject + 'static,
    {
        self.entries
            .get(key)?
            .value
            .object()
            .as_any()
            .downcast_ref::<T>()
    }

    /// Check whether `key` holds an entry.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Mutability contract of the entry under `key`, if present.
    #[must_use]
    pub fn state_type(&self, key: &str) -> Option<StateType> {
        self.entries.get(key).map(|e| e.value.state_type())
    }

    /// Lifetime scope of the entry under `key`, if present.
    #[must_use]
    pub fn life_span(&self, key: &str) -> Option<LifeSpan> {
        self.entries.get(key).map(|e| e.life_span)
    }

    /// Render the entry under `key` as text.
    ///
    /// Returns `None` when the key is absent or the object has no
    /// text form.
    #[must_use]
    pub fn serialize(&self, key: &str) -> Option<String> {
        self.entries.get(key)?.value.object().serialize_to_string()
    }

    /// Number of stored entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys of all stored entries, in no particular order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Drop every entry, as happens at connection teardown.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for FilterStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStateStore")
            .field("entries", &self.keys())
            .finish()
    }
}
