//! Error types for listener-probe
//!
//! This module defines the error hierarchy for the listener filter harness.
//! All errors are categorized by subsystem and include recovery hints.

use std::io;

use thiserror::Error;

use crate::filter::ChainState;

/// Top-level error type for listener-probe
#[derive(Debug, Error)]
pub enum ListenerProbeError {
    /// Configuration errors (file parsing, validation)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Filter chain sequencing errors
    #[error("Filter chain error: {0}")]
    Chain(#[from] ChainError),

    /// Per-connection filter state errors
    #[error("Filter state error: {0}")]
    State(#[from] StateError),

    /// I/O errors not covered by other categories
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ListenerProbeError {
    /// Check if this error is recoverable (can retry operation)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Config(_) => false,
            // A chain driven out of phase or a state collision means the
            // driver sequence itself is wrong; retrying the same event
            // cannot succeed.
            Self::Chain(e) => e.is_recoverable(),
            Self::State(e) => e.is_recoverable(),
            Self::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::TimedOut
                    | io::ErrorKind::Interrupted
                    | io::ErrorKind::WouldBlock
                    | io::ErrorKind::ConnectionReset
            ),
        }
    }
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File not found or inaccessible
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Validation error (invalid values, missing required fields)
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// I/O error while reading config
    #[error("I/O error reading configuration: {0}")]
    IoError(#[from] io::Error),
}

impl ConfigError {
    /// Config errors are generally not recoverable without user intervention
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }
}

/// Filter chain sequencing errors
#[derive(Debug, Error)]
pub enum ChainError {
    /// Chain was assembled with no filters installed
    #[error("Filter chain has no filters installed")]
    Empty,

    /// An event was delivered while the chain was in the wrong phase
    #[error("Chain event delivered in {actual} phase (expected {expected})")]
    InvalidPhase {
        expected: ChainState,
        actual: ChainState,
    },

    /// A filter stopped iteration without requesting any data, so no
    /// future event can resume the chain
    #[error("Filter {name:?} at index {index} stopped iteration without requesting data")]
    Stalled { index: usize, name: String },
}

impl ChainError {
    /// Chain errors indicate driver misuse, never a transient condition
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }

    /// Create an invalid phase error
    #[must_use]
    pub const fn invalid_phase(expected: ChainState, actual: ChainState) -> Self {
        Self::InvalidPhase { expected, actual }
    }

    /// Create a stalled filter error
    pub fn stalled(index: usize, name: impl Into<String>) -> Self {
        Self::Stalled {
            index,
            name: name.into(),
        }
    }
}

/// Per-connection filter state errors
#[derive(Debug, Error)]
pub enum StateError {
    /// Insertion collided with an existing entry that is not eligible
    /// for overwrite
    #[error("Filter state key {key:?} already holds an object that cannot be replaced")]
    DuplicateKey { key: String },
}

impl StateError {
    /// State collisions require fixing the filter arrangement, not a retry
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        false
    }

    /// Create a duplicate key error
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }
}

/// Type alias for Result with ListenerProbeError
pub type Result<T> = std::result::Result<T, ListenerProbeError>;
