use crate::app::ports::{AccessibilityChecker, PageHandle};
use crate::config::CheckersConfig;
use crate::constants::PA11Y_ENGINE;
use crate::error::Result;
use crate::infra::command::{checker_error, run_engine};
use crate::types::{IssueSource, Pa11yIssue, RawFinding};
use async_trait::async_trait;
use std::time::Duration;

/// pa11y exits with 2 when the page has issues; the JSON report is still on stdout
const PA11Y_OK_CODES: &[i32] = &[0, 2];

/// pa11y through its command-line runner, JSON reporter
pub struct Pa11yCli {
    command: String,
    standard: String,
    timeout: Duration,
}

impl Pa11yCli {
    pub fn new(config: &CheckersConfig) -> Self {
        Self {
            command: config.pa11y_command.clone(),
            standard: config.pa11y_standard.clone(),
            timeout: config.timeout(),
        }
    }
}

pub fn parse_output(stdout: &str) -> Result<Vec<RawFinding>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    let issues: Vec<Pa11yIssue> = serde_json::from_str(trimmed)
        .map_err(|e| checker_error(PA11Y_ENGINE, format!("unreadable output: {}", e)))?;
    Ok(issues.into_iter().map(RawFinding::Pa11y).collect())
}

#[async_trait]
impl AccessibilityChecker for Pa11yCli {
    fn source(&self) -> IssueSource {
        IssueSource::Pa11y
    }

    async fn check(&self, page: &dyn PageHandle) -> Result<Vec<RawFinding>> {
        let url = page
            .url()
            .ok_or_else(|| checker_error(PA11Y_ENGINE, "page has not been loaded"))?;
        let args = vec![
            "--reporter".to_string(),
            "json".to_string(),
            "--standard".to_string(),
            self.standard.clone(),
            url.to_string(),
        ];
        let stdout = run_engine(PA11Y_ENGINE, &self.command, &args, PA11Y_OK_CODES, self.timeout).await?;
        parse_output(&stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issues_keep_code_type_and_message() {
        let stdout = r##"[
          {
            "code": "WCAG2AA.Principle1.Guideline1_1.1_1_1.H37",
            "type": "error",
            "typeCode": 1,
            "message": "Img element missing an alt attribute.",
            "context": "<img src=\"logo.png\">",
            "selector": "#logo",
            "runner": "htmlcs"
          }
        ]"##;
        let findings = parse_output(stdout).unwrap();
        assert_eq!(findings.len(), 1);
        match &findings[0] {
            RawFinding::Pa11y(issue) => {
                assert_eq!(issue.code, "WCAG2AA.Principle1.Guideline1_1.1_1_1.H37");
                assert_eq!(issue.issue_type, "error");
                assert_eq!(issue.selector.as_deref(), Some("#logo"));
            }
            other => panic!("unexpected finding {:?}", other),
        }
    }

    #[test]
    fn empty_stdout_means_no_issues() {
        assert!(parse_output("  \n").unwrap().is_empty());
    }
}
