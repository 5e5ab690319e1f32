use crate::pool::PoolOptions;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for the harvester
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub harvest: HarvestConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub browser: BrowserConfig,
    pub output: OutputConfig,
}

/// Harvest behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestConfig {
    /// ICD-10 release to harvest (e.g. "2019")
    pub version: String,

    /// Override for the site base URL (tests, mirrors). When unset, the URL
    /// is derived from the version.
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Maximum number of concurrent fetches per level
    #[serde(rename = "max-workers")]
    pub max_workers: usize,

    /// Timeout for a single fetch (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Optional wall-clock limit for a whole fan-out run (seconds)
    #[serde(rename = "run-deadline-secs")]
    pub run_deadline_secs: Option<u64>,

    /// Abort the run on the first unexpected worker failure instead of
    /// degrading it to a Failed record
    #[serde(rename = "fail-fast")]
    pub fail_fast: bool,
}

impl HarvestConfig {
    /// The version-specific base URL all endpoints hang off
    pub fn endpoint_base(&self) -> String {
        match &self.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://icd.who.int/browse10/{}/en", self.version),
        }
    }

    /// Pool tuning derived from this configuration
    pub fn pool_options(&self) -> PoolOptions {
        PoolOptions {
            max_workers: self.max_workers,
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
            run_deadline: self.run_deadline_secs.map(Duration::from_secs),
            fail_fast: self.fail_fast,
        }
    }
}

/// Headless browser configuration for the chapter level
#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    /// Path to a Chrome/Chromium executable. When unset, well-known install
    /// locations and $CHROMIUM_PATH are searched.
    #[serde(rename = "chrome-path")]
    pub chrome_path: Option<PathBuf>,

    /// Run the browser headless
    pub headless: bool,

    /// Timeout for navigation plus client-side rendering (seconds)
    #[serde(rename = "navigation-timeout-secs")]
    pub navigation_timeout_secs: u64,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the scraper
    #[serde(rename = "scraper-name")]
    pub scraper_name: String,

    /// Version of the scraper
    #[serde(rename = "scraper-version")]
    pub scraper_version: String,

    /// URL with information about the scraper
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for scraper-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: ScraperName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.scraper_name, self.scraper_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the chapters CSV file
    #[serde(rename = "chapters-path")]
    pub chapters_path: String,

    /// Path to the blocks CSV file
    #[serde(rename = "blocks-path")]
    pub blocks_path: String,

    /// Path to the categories CSV file
    #[serde(rename = "categories-path")]
    pub categories_path: String,

    /// Path to the markdown run summary
    #[serde(rename = "summary-path")]
    pub summary_path: String,
}
