use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Accessibility engine a finding came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSource {
    Axe,
    Pa11y,
}

impl IssueSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSource::Axe => crate::constants::AXE_ENGINE,
            IssueSource::Pa11y => crate::constants::PA11Y_ENGINE,
        }
    }
}

impl fmt::Display for IssueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a normalized issue.
///
/// Engines report free-form labels; anything that is not one of the known
/// levels resolves to `Unknown` instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Critical,
    Serious,
    Moderate,
    Minor,
    Notice,
    Unknown,
}

impl Impact {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "critical" => Impact::Critical,
            "serious" => Impact::Serious,
            "moderate" => Impact::Moderate,
            "minor" => Impact::Minor,
            "notice" => Impact::Notice,
            _ => Impact::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Critical => "critical",
            Impact::Serious => "serious",
            Impact::Moderate => "moderate",
            Impact::Minor => "minor",
            Impact::Notice => "notice",
            Impact::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violation entry from axe-core's `violations` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AxeViolation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub impact: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub help: String,
    #[serde(default, rename = "helpUrl")]
    pub help_url: Option<String>,
}

/// One entry from pa11y's `issues` array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pa11yIssue {
    #[serde(default)]
    pub code: String,
    #[serde(default, rename = "type")]
    pub issue_type: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub selector: Option<String>,
    #[serde(default)]
    pub runner: Option<String>,
}

/// A raw finding, tagged with the engine that produced it
#[derive(Debug, Clone, PartialEq)]
pub enum RawFinding {
    Axe(AxeViolation),
    Pa11y(Pa11yIssue),
}

impl RawFinding {
    pub fn source(&self) -> IssueSource {
        match self {
            RawFinding::Axe(_) => IssueSource::Axe,
            RawFinding::Pa11y(_) => IssueSource::Pa11y,
        }
    }
}

/// Clause references attached to an issue identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleEntry {
    #[serde(default, rename = "rgaa_items")]
    pub clause_references: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

/// Uniform issue record produced from either engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedIssue {
    pub source: IssueSource,
    pub id: String,
    pub impact: Impact,
    pub description: String,
    #[serde(rename = "rgaa_items")]
    pub clause_references: Vec<String>,
    #[serde(rename = "rgaa_explanation")]
    pub explanation: String,
}

/// Outcome of auditing one page: a score, or the error that stopped the audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResult {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default)]
    pub issues: Vec<NormalizedIssue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageResult {
    pub fn scored(url: impl Into<String>, score: f64, issues: Vec<NormalizedIssue>) -> Self {
        Self {
            url: url.into(),
            score: Some(score),
            issues,
            error: None,
        }
    }

    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            score: None,
            issues: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Three-tier compliance label derived from an average score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComplianceStatus {
    #[serde(rename = "Compliant")]
    Compliant,
    #[serde(rename = "Partially compliant")]
    PartiallyCompliant,
    #[serde(rename = "Non-compliant")]
    NonCompliant,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => "Compliant",
            ComplianceStatus::PartiallyCompliant => "Partially compliant",
            ComplianceStatus::NonCompliant => "Non-compliant",
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    #[serde(rename = "startUrl")]
    pub start_url: String,
    #[serde(rename = "date")]
    pub timestamp: DateTime<Utc>,
    pub pages_audited: usize,
    #[serde(rename = "avg_score")]
    pub average_score: f64,
    #[serde(rename = "status")]
    pub compliance_status: ComplianceStatus,
}

/// Site-wide audit report; the run's only output artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub pages: Vec<PageResult>,
}
