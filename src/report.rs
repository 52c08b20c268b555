use crate::error::Result;
use crate::scoring;
use crate::types::{PageResult, Report, ReportMetadata};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;

impl Report {
    /// Aggregate per-page results; `pages` keeps its order.
    ///
    /// Only pages without an error count towards `pages_audited` and the
    /// average score.
    pub fn from_pages(start_url: impl Into<String>, timestamp: DateTime<Utc>, pages: Vec<PageResult>) -> Self {
        let scores: Vec<f64> = pages
            .iter()
            .filter(|page| !page.is_error())
            .filter_map(|page| page.score)
            .collect();
        let average_score = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        Report {
            metadata: ReportMetadata {
                start_url: start_url.into(),
                timestamp,
                pages_audited: scores.len(),
                average_score,
                compliance_status: scoring::classify(average_score),
            },
            pages,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report as pretty JSON, creating parent directories as needed
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Short human-readable summary, derived only from the report itself
    pub fn summary(&self) -> String {
        format!(
            "RGAA average score: {:.2} ({})\nPages audited: {} of {}",
            self.metadata.average_score,
            self.metadata.compliance_status,
            self.metadata.pages_audited,
            self.pages.len(),
        )
    }
}
