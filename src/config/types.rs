//! Configuration types for listener-probe
//!
//! This module defines the filter arrangement loaded from JSON. A
//! configuration names the accept-path filters and the QUIC filters in
//! execution order; a validated configuration builds runnable chains.

use serde::{Deserialize, Serialize};

use crate::error::{ChainError, ConfigError};
use crate::filter::{
    AlpnCell, AlpnInjector, FilterChain, FilterChainBuilder, QuicFilterChain, QuicMigrationGate,
    TcpDrainFilter, TCP_DRAIN_READ_AHEAD,
};

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HarnessConfig {
    /// Accept-path filters, in installation order
    #[serde(default)]
    pub chain: Vec<FilterConfig>,

    /// QUIC filters, in installation order
    #[serde(default)]
    pub quic: Vec<QuicFilterConfig>,
}

impl HarnessConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain.is_empty() && self.quic.is_empty() {
            return Err(ConfigError::ValidationError(
                "At least one filter must be configured".into(),
            ));
        }

        for filter in &self.chain {
            filter.validate()?;
        }
        for filter in &self.quic {
            filter.validate()?;
        }

        Ok(())
    }

    /// Build the accept-path chain described by this configuration.
    ///
    /// Every `alpn` entry shares `alpn`, so a value staged there feeds
    /// the next accepted connection.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Empty` if no accept-path filters are
    /// configured.
    pub fn build_chain(&self, alpn: &AlpnCell) -> Result<FilterChain, ChainError> {
        let mut builder: FilterChainBuilder = FilterChain::builder();
        for filter in &self.chain {
            builder = match filter {
                FilterConfig::Alpn => builder.add(Box::new(AlpnInjector::new(alpn.clone()))),
                FilterConfig::TcpDrain { drain_bytes } => {
                    builder.add(Box::new(TcpDrainFilter::new(*drain_bytes)))
                }
            };
        }
        builder.build()
    }

    /// Build the QUIC chain described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ChainError::Empty` if no QUIC filters are configured.
    pub fn build_quic_chain(&self) -> Result<QuicFilterChain, ChainError> {
        let mut builder = QuicFilterChain::builder();
        for filter in &self.quic {
            builder = match filter {
                QuicFilterConfig::MigrationGate {
                    added_value,
                    allow_server_migration,
                    allow_client_migration,
                } => builder.add(Box::new(QuicMigrationGate::new(
                    added_value.clone(),
                    *allow_server_migration,
                    *allow_client_migration,
                ))),
            };
        }
        builder.build()
    }

    /// Create a minimal default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self {
            chain: vec![FilterConfig::TcpDrain { drain_bytes: 0 }],
            quic: vec![QuicFilterConfig::MigrationGate {
                added_value: "probe".into(),
                allow_server_migration: true,
                allow_client_migration: true,
            }],
        }
    }
}

/// A single accept-path filter entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Stamp a staged ALPN value onto the accepted socket
    Alpn,

    /// Pause for data and discard a prefix of it
    TcpDrain {
        /// Bytes to discard from the front of the first data chunk
        #[serde(default)]
        drain_bytes: usize,
    },
}

impl FilterConfig {
    /// Validate a single filter entry
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the entry could never
    /// behave as configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Alpn => Ok(()),
            Self::TcpDrain { drain_bytes } => {
                // More than one window of data is never buffered, so a
                // larger drain could never happen.
                if *drain_bytes > TCP_DRAIN_READ_AHEAD {
                    return Err(ConfigError::ValidationError(format!(
                        "drain_bytes {drain_bytes} exceeds the \
                         {TCP_DRAIN_READ_AHEAD}-byte read-ahead window"
                    )));
                }
                Ok(())
            }
        }
    }
}

/// A single QUIC filter entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuicFilterConfig {
    /// Publish connection state and police address migration
    MigrationGate {
        /// String published into the connection's filter state
        added_value: String,

        /// Tolerate the server moving traffic to its preferred address
        #[serde(default = "default_true")]
        allow_server_migration: bool,

        /// Tolerate the peer changing its address mid-connection
        #[serde(default = "default_true")]
        allow_client_migration: bool,
    },
}

impl QuicFilterConfig {
    /// Validate a single QUIC filter entry
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if the entry is missing a
    /// usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::MigrationGate { added_value, .. } => {
                if added_value.is_empty() {
                    return Err(ConfigError::ValidationError(
                        "added_value cannot be empty".into(),
                    ));
                }
                Ok(())
            }
        }
    }
}

// Default value functions for serde
const fn default_true() -> bool {
    true
}
