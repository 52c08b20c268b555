use crate::constants;
use crate::error::{AuditError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Run configuration, read from an optional TOML file.
///
/// Every section and field has a default, so an empty file (or no file at all)
/// yields the stock limits.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    pub crawl: CrawlConfig,
    pub audit: PageAuditConfig,
    pub http: HttpConfig,
    pub checkers: CheckersConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Traversal stops once this many pages have been accumulated
    pub max_results: usize,
    /// Number of discovered URLs handed to the audit stage
    pub max_returned: usize,
    /// Visited-page budget per unit of depth
    pub pages_per_depth: usize,
    pub navigation_timeout_secs: u64,
    /// Optional cap on URLs taken from a sitemap
    pub max_sitemap_urls: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_results: constants::CRAWL_MAX_RESULTS,
            max_returned: constants::CRAWL_MAX_RETURNED,
            pages_per_depth: constants::CRAWL_PAGES_PER_DEPTH,
            navigation_timeout_secs: constants::CRAWL_NAVIGATION_TIMEOUT_SECS,
            max_sitemap_urls: None,
        }
    }
}

impl CrawlConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PageAuditConfig {
    pub navigation_timeout_secs: u64,
    /// Pages audited at once; 1 keeps the run strictly sequential
    pub concurrency: usize,
    /// Upper bound on page handles the browser keeps open
    pub max_open_pages: usize,
}

impl Default for PageAuditConfig {
    fn default() -> Self {
        Self {
            navigation_timeout_secs: constants::AUDIT_NAVIGATION_TIMEOUT_SECS,
            concurrency: constants::AUDIT_CONCURRENCY,
            max_open_pages: constants::MAX_OPEN_PAGES,
        }
    }
}

impl PageAuditConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub request_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: constants::DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: constants::HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CheckersConfig {
    pub axe_command: String,
    pub pa11y_command: String,
    pub pa11y_standard: String,
    /// Wall-clock limit for one engine run against one page
    pub timeout_secs: u64,
}

impl Default for CheckersConfig {
    fn default() -> Self {
        Self {
            axe_command: constants::DEFAULT_AXE_COMMAND.to_string(),
            pa11y_command: constants::DEFAULT_PA11Y_COMMAND.to_string(),
            pa11y_standard: constants::DEFAULT_PA11Y_STANDARD.to_string(),
            timeout_secs: constants::CHECKER_TIMEOUT_SECS,
        }
    }
}

impl CheckersConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory receiving the daily-rolled JSON log
    pub directory: PathBuf,
    pub file_name: String,
    /// Used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from(constants::DEFAULT_LOG_DIR),
            file_name: constants::DEFAULT_LOG_FILE.to_string(),
            filter: constants::DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl AuditConfig {
    /// Load the config file at `path`. A missing file falls back to defaults;
    /// an unreadable or malformed one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AuditConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.audit.concurrency == 0 {
            return Err(AuditError::Config("audit.concurrency must be at least 1".into()));
        }
        if self.audit.max_open_pages == 0 {
            return Err(AuditError::Config("audit.max_open_pages must be at least 1".into()));
        }
        if self.logging.file_name.trim().is_empty() {
            return Err(AuditError::Config("logging.file_name must not be empty".into()));
        }
        if self.crawl.pages_per_depth == 0 {
            return Err(AuditError::Config("crawl.pages_per_depth must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = AuditConfig::from_toml_str("").unwrap();
        assert_eq!(config.crawl.max_results, 50);
        assert_eq!(config.crawl.max_returned, 20);
        assert_eq!(config.crawl.pages_per_depth, 10);
        assert_eq!(config.audit.navigation_timeout_secs, 60);
        assert_eq!(config.audit.concurrency, 1);
        assert_eq!(config.checkers.pa11y_standard, "WCAG2AA");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = AuditConfig::from_toml_str(
            r#"
            [audit]
            concurrency = 3

            [checkers]
            pa11y_command = "/opt/pa11y/bin/pa11y"
            "#,
        )
        .unwrap();
        assert_eq!(config.audit.concurrency, 3);
        assert_eq!(config.audit.navigation_timeout_secs, 60);
        assert_eq!(config.checkers.pa11y_command, "/opt/pa11y/bin/pa11y");
        assert_eq!(config.checkers.axe_command, "axe");
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = AuditConfig::from_toml_str("[audit]\nconcurrency = 0\n").unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(AuditConfig::from_toml_str("[crawl\nmax_results = ").is_err());
    }

    #[test]
    fn logging_section_moves_the_log_file() {
        let config = AuditConfig::from_toml_str(
            r#"
            [logging]
            directory = "/var/log/rgaa"
            filter = "rgaa_auditor=debug"
            "#,
        )
        .unwrap();
        assert_eq!(config.logging.directory, PathBuf::from("/var/log/rgaa"));
        assert_eq!(config.logging.file_name, "auditor.log");
        assert_eq!(config.logging.filter, "rgaa_auditor=debug");

        let defaults = AuditConfig::default().logging;
        assert_eq!(defaults.directory, PathBuf::from("logs"));
        assert_eq!(defaults.filter, "rgaa_auditor=info,warn");
    }

    #[test]
    fn blank_log_file_name_is_rejected() {
        let err = AuditConfig::from_toml_str("[logging]\nfile_name = \"\"\n").unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AuditConfig::load("/nonexistent/rgaa.toml").unwrap();
        assert_eq!(config.crawl.navigation_timeout_secs, 30);
    }
}
