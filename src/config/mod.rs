//! Configuration module for the harvester
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Everything the harvest needs (release version, worker cap,
//! browser executable, output paths) is injected here; there are no
//! process-wide defaults.
//!
//! # Example
//!
//! ```no_run
//! use icd_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Harvesting release: {}", config.harvest.version);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{BrowserConfig, Config, HarvestConfig, OutputConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
