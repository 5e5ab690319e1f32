//! HTTP client construction for the block and category levels

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;

/// Builds the HTTP client shared by all pool workers
///
/// The client carries the identifying user agent and sane timeouts; workers
/// clone it cheaply (reqwest clients share their connection pool).
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}
