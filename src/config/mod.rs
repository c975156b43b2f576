//! Configuration module for listener-probe
//!
//! This module provides configuration types and loading utilities.
//!
//! # Example
//!
//! ```no_run
//! use listener_probe::config::load_config;
//!
//! let config = load_config("/etc/listener-probe/config.json").unwrap();
//! println!("Accept filters: {}", config.chain.len());
//! ```

mod loader;
mod types;

pub use loader::{create_default_config, load_config, load_config_str};
pub use types::{FilterConfig, HarnessConfig, QuicFilterConfig};
