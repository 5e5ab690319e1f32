//! Headless browser session for client-rendered pages
//!
//! The chapter tree on the classification site is rendered client-side, so
//! the chapter level cannot be harvested with a plain HTTP GET. This module
//! wraps a single headless Chromium session: launch, fetch-rendered-HTML,
//! graceful shutdown. Sessions are never shared across pool workers; a
//! harvest run creates one session for the chapter level and tears it down
//! before the HTTP levels start.

use crate::config::BrowserConfig;
use crate::{HarvestError, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// A running browser process plus the task driving its event stream
///
/// The handler task must stay alive for the CDP connection to make
/// progress; [`BrowserSession::shutdown`] closes the process and aborts it.
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launches a browser from the configured executable
    ///
    /// When no `chrome-path` is configured, `$CHROMIUM_PATH` and a set of
    /// well-known install locations are searched.
    pub async fn launch(config: &BrowserConfig, user_agent: &str) -> Result<Self> {
        let executable = match &config.chrome_path {
            Some(path) if path.exists() => path.clone(),
            Some(path) => {
                return Err(HarvestError::BrowserLaunch(format!(
                    "configured chrome_path does not exist: {}",
                    path.display()
                )))
            }
            None => find_browser_executable().ok_or_else(|| {
                HarvestError::BrowserLaunch(
                    "no Chrome/Chromium executable found; set browser.chrome-path or $CHROMIUM_PATH"
                        .to_string(),
                )
            })?,
        };

        tracing::info!("Launching browser: {}", executable.display());

        let mut builder = BrowserConfigBuilder::default()
            .request_timeout(Duration::from_secs(config.navigation_timeout_secs))
            .window_size(1280, 1024)
            .chrome_executable(executable)
            .arg(format!("--user-agent={}", user_agent))
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .arg("--disable-background-networking")
            .arg("--mute-audio");

        if config.headless {
            builder = builder.headless_mode(HeadlessMode::default());
        } else {
            builder = builder.with_head();
        }

        let browser_config = builder.build().map_err(HarvestError::BrowserLaunch)?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler event error: {:?}", e);
                }
            }
            tracing::debug!("Browser event handler finished");
        });

        Ok(Self {
            browser,
            handler: handler_task,
        })
    }

    /// Navigates to `url` and returns the page HTML once `ready_selector`
    /// has rendered
    ///
    /// Navigation completing only means the HTTP response arrived; the
    /// content this crate cares about is built by JavaScript afterwards, so
    /// the DOM is polled for the readiness selector until `timeout`.
    pub async fn fetch_rendered(
        &self,
        url: &str,
        ready_selector: &str,
        timeout: Duration,
    ) -> Result<String> {
        let page = self.browser.new_page("about:blank").await?;
        page.goto(url).await?;
        page.wait_for_navigation().await?;

        let start = Instant::now();
        let poll_interval = Duration::from_millis(200);
        while page.find_element(ready_selector).await.is_err() {
            if start.elapsed() >= timeout {
                return Err(HarvestError::RenderTimeout {
                    url: url.to_string(),
                    selector: ready_selector.to_string(),
                });
            }
            tokio::time::sleep(poll_interval).await;
        }
        tracing::debug!(
            "{} rendered after {:.2}s",
            ready_selector,
            start.elapsed().as_secs_f64()
        );

        let html = page.content().await?;
        Ok(html)
    }

    /// Closes the browser process and stops the event handler task
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser cleanly: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
    }
}

/// Searches $CHROMIUM_PATH and well-known install locations for a browser
/// executable
fn find_browser_executable() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
        tracing::warn!(
            "CHROMIUM_PATH points to a non-existent file: {}",
            path.display()
        );
    }

    let candidates: &[&str] = if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
        ]
    };

    candidates.iter().map(PathBuf::from).find(|p| p.exists())
}
