pub mod auditor;
pub mod config;
pub mod constants;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod mapping;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod scoring;
pub mod types;

// Ports the pipeline depends on, and the adapters that implement them
pub mod app;
pub mod infra;

pub use auditor::PageAuditor;
pub use discovery::UrlDiscoverer;
pub use error::{AuditError, Result};
pub use mapping::RuleMapper;
pub use normalize::IssueNormalizer;
pub use pipeline::ReportAggregator;
pub use types::{ComplianceStatus, Impact, IssueSource, NormalizedIssue, PageResult, RawFinding, Report};
