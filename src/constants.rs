//! Defaults shared by the CLI, the config layer and the pipeline stages.

// Output and static resources
pub const DEFAULT_REPORT_PATH: &str = "rgaa-full-report.json";
pub const DEFAULT_MAPPING_PATH: &str = "rgaa-mapping.json";
pub const DEFAULT_CONFIG_PATH: &str = "rgaa.toml";
pub const DEFAULT_DEPTH: usize = 1;

// Logging
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_LOG_FILE: &str = "auditor.log";
pub const DEFAULT_LOG_FILTER: &str = "rgaa_auditor=info,warn";

// Sitemap discovery
pub const SITEMAP_PATH: &str = "/sitemap.xml";

// Crawl fallback limits
pub const CRAWL_MAX_RESULTS: usize = 50;
pub const CRAWL_MAX_RETURNED: usize = 20;
pub const CRAWL_PAGES_PER_DEPTH: usize = 10;
pub const CRAWL_NAVIGATION_TIMEOUT_SECS: u64 = 30;

// Page audits
pub const AUDIT_NAVIGATION_TIMEOUT_SECS: u64 = 60;
pub const AUDIT_CONCURRENCY: usize = 1;
pub const MAX_OPEN_PAGES: usize = 4;

// HTTP
pub const DEFAULT_USER_AGENT: &str = concat!("rgaa_auditor/", env!("CARGO_PKG_VERSION"));
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

// Check engines
pub const AXE_ENGINE: &str = "axe";
pub const PA11Y_ENGINE: &str = "pa11y";
pub const DEFAULT_AXE_COMMAND: &str = "axe";
pub const DEFAULT_PA11Y_COMMAND: &str = "pa11y";
pub const DEFAULT_PA11Y_STANDARD: &str = "WCAG2AA";
pub const CHECKER_TIMEOUT_SECS: u64 = 120;

// Rule mapping
pub const NO_MAPPING_EXPLANATION: &str = "No mapping found";

// Compliance thresholds (lower bounds, inclusive)
pub const COMPLIANT_THRESHOLD: f64 = 85.0;
pub const PARTIALLY_COMPLIANT_THRESHOLD: f64 = 60.0;
