//! icd-harvest: a scraper for the WHO ICD-10 classification hierarchy
//!
//! This crate harvests the chapter → block → category tree from the public
//! ICD-10 browser, fanning per-code fetches across a bounded worker pool and
//! assembling the results into tabular records.

pub mod browser;
pub mod config;
pub mod harvest;
pub mod output;
pub mod pool;
pub mod record;

use thiserror::Error;

/// Main error type for harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Fetch for {code} timed out after {seconds}s")]
    FetchTimeout { code: ConceptCode, seconds: u64 },

    #[error("Run deadline of {seconds}s exceeded")]
    DeadlineExceeded { seconds: u64 },

    #[error("Worker for {code} failed: {source}")]
    Worker {
        code: ConceptCode,
        #[source]
        source: Box<HarvestError>,
    },

    #[error("Browser error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("Failed to launch browser: {0}")]
    BrowserLaunch(String),

    #[error("Timed out waiting for {selector} to render at {url}")]
    RenderTimeout { url: String, selector: String },

    #[error("HTML parse error in {context}: {message}")]
    HtmlParse { context: String, message: String },

    #[error("JSON parse error in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use pool::{fan_out, PoolOptions};
pub use record::{ConceptCode, Level, Record};
