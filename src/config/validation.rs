use crate::config::types::{BrowserConfig, Config, HarvestConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// ICD-10 releases published on the browser site
const SUPPORTED_VERSIONS: &[&str] = &["2019", "2016", "2015", "2014", "2010", "2008"];

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_harvest_config(&config.harvest)?;
    validate_browser_config(&config.browser)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates harvest configuration
fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    if !SUPPORTED_VERSIONS.contains(&config.version.as_str()) {
        return Err(ConfigError::Validation(format!(
            "version must be one of {}, got '{}'",
            SUPPORTED_VERSIONS.join(", "),
            config.version
        )));
    }

    if config.max_workers < 1 || config.max_workers > 100 {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and 100, got {}",
            config.max_workers
        )));
    }

    if config.fetch_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_secs must be >= 1, got {}",
            config.fetch_timeout_secs
        )));
    }

    if let Some(deadline) = config.run_deadline_secs {
        if deadline < config.fetch_timeout_secs {
            return Err(ConfigError::Validation(format!(
                "run_deadline_secs ({}) must not be shorter than fetch_timeout_secs ({})",
                deadline, config.fetch_timeout_secs
            )));
        }
    }

    if let Some(base_url) = &config.base_url {
        Url::parse(base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;
    }

    Ok(())
}

/// Validates browser configuration
fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if config.navigation_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "navigation_timeout_secs must be >= 1, got {}",
            config.navigation_timeout_secs
        )));
    }

    if let Some(path) = &config.chrome_path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "chrome_path must not be empty when set".to_string(),
            ));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate scraper name: non-empty, alphanumeric + hyphens only
    if config.scraper_name.is_empty() {
        return Err(ConfigError::Validation(
            "scraper_name cannot be empty".to_string(),
        ));
    }

    if !config
        .scraper_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "scraper_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.scraper_name
        )));
    }

    // Validate contact URL
    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    // Validate contact email (basic validation)
    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    for (name, path) in [
        ("chapters_path", &config.chapters_path),
        ("blocks_path", &config.blocks_path),
        ("categories_path", &config.categories_path),
        ("summary_path", &config.summary_path),
    ] {
        if path.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    Ok(())
}

/// Basic email validation: one '@' with non-empty local part and a domain
/// containing a dot
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "contact_email must be a valid email address, got '{}'",
            email
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn valid_config() -> Config {
        Config {
            harvest: HarvestConfig {
                version: "2019".to_string(),
                base_url: None,
                max_workers: 20,
                fetch_timeout_secs: 30,
                run_deadline_secs: Some(900),
                fail_fast: true,
            },
            browser: BrowserConfig {
                chrome_path: Some(PathBuf::from("/usr/bin/chromium")),
                headless: true,
                navigation_timeout_secs: 30,
            },
            user_agent: UserAgentConfig {
                scraper_name: "TestHarvester".to_string(),
                scraper_version: "1.0".to_string(),
                contact_url: "https://example.com/about".to_string(),
                contact_email: "admin@example.com".to_string(),
            },
            output: OutputConfig {
                chapters_path: "./chapters.csv".to_string(),
                blocks_path: "./blocks.csv".to_string(),
                categories_path: "./categories.csv".to_string(),
                summary_path: "./summary.md".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_unknown_version_rejected() {
        let mut config = valid_config();
        config.harvest.version = "2021".to_string();
        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = valid_config();
        config.harvest.max_workers = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_deadline_shorter_than_fetch_timeout_rejected() {
        let mut config = valid_config();
        config.harvest.run_deadline_secs = Some(10);
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = valid_config();
        config.harvest.base_url = Some("not a url".to_string());
        assert!(matches!(
            validate(&config),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_scraper_name_with_spaces_rejected() {
        let mut config = valid_config();
        config.user_agent.scraper_name = "Test Harvester".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_bad_email_rejected() {
        let mut config = valid_config();
        config.user_agent.contact_email = "not-an-email".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_output_path_rejected() {
        let mut config = valid_config();
        config.output.blocks_path = String::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_user_agent_header_value() {
        let config = valid_config();
        assert_eq!(
            config.user_agent.header_value(),
            "TestHarvester/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_endpoint_base_from_version() {
        let config = valid_config();
        assert_eq!(
            config.harvest.endpoint_base(),
            "https://icd.who.int/browse10/2019/en"
        );
    }

    #[test]
    fn test_endpoint_base_override_trims_trailing_slash() {
        let mut config = valid_config();
        config.harvest.base_url = Some("http://127.0.0.1:8080/en/".to_string());
        assert_eq!(config.harvest.endpoint_base(), "http://127.0.0.1:8080/en");
    }
}
