use crate::app::ports::{AccessibilityChecker, PageHandle};
use crate::config::CheckersConfig;
use crate::constants::AXE_ENGINE;
use crate::error::Result;
use crate::infra::command::{checker_error, run_engine};
use crate::types::{AxeViolation, IssueSource, RawFinding};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

/// One entry of `axe --stdout` output (one per analysed URL)
#[derive(Debug, Deserialize)]
struct AxeRun {
    #[serde(default)]
    violations: Vec<AxeViolation>,
}

/// axe-core through `@axe-core/cli`
pub struct AxeCli {
    command: String,
    timeout: Duration,
}

impl AxeCli {
    pub fn new(config: &CheckersConfig) -> Self {
        Self {
            command: config.axe_command.clone(),
            timeout: config.timeout(),
        }
    }
}

/// Violations from every run in an `axe --stdout` document
pub fn parse_output(stdout: &str) -> Result<Vec<RawFinding>> {
    let runs: Vec<AxeRun> = serde_json::from_str(stdout.trim())
        .map_err(|e| checker_error(AXE_ENGINE, format!("unreadable output: {}", e)))?;
    Ok(runs
        .into_iter()
        .flat_map(|run| run.violations)
        .map(RawFinding::Axe)
        .collect())
}

#[async_trait]
impl AccessibilityChecker for AxeCli {
    fn source(&self) -> IssueSource {
        IssueSource::Axe
    }

    async fn check(&self, page: &dyn PageHandle) -> Result<Vec<RawFinding>> {
        let url = page
            .url()
            .ok_or_else(|| checker_error(AXE_ENGINE, "page has not been loaded"))?;
        let args = vec![url.to_string(), "--stdout".to_string()];
        let stdout = run_engine(AXE_ENGINE, &self.command, &args, &[0], self.timeout).await?;
        parse_output(&stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn violations_are_collected_across_runs() {
        let stdout = r#"[
          {
            "url": "https://example.com/",
            "violations": [
              { "id": "image-alt", "impact": "critical",
                "description": "Ensures <img> elements have alternate text",
                "help": "Images must have alternate text", "nodes": [] },
              { "id": "region", "impact": null, "description": "", "help": "All content should be contained by landmarks" }
            ],
            "passes": []
          },
          { "url": "https://example.com/b", "violations": [] }
        ]"#;
        let findings = parse_output(stdout).unwrap();
        assert_eq!(findings.len(), 2);
        match &findings[0] {
            RawFinding::Axe(v) => {
                assert_eq!(v.id, "image-alt");
                assert_eq!(v.impact.as_deref(), Some("critical"));
            }
            other => panic!("unexpected finding {:?}", other),
        }
        match &findings[1] {
            RawFinding::Axe(v) => assert_eq!(v.impact, None),
            other => panic!("unexpected finding {:?}", other),
        }
    }

    #[test]
    fn garbage_output_is_a_checker_error() {
        assert!(parse_output("Error: Chrome failed to start").is_err());
    }
}
