use crate::app::ports::{AccessibilityChecker, BrowserSession, NavigationOptions, PageHandle, WaitUntil};
use crate::error::Result;
use crate::metrics;
use crate::normalize::IssueNormalizer;
use crate::scoring;
use crate::types::{NormalizedIssue, PageResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Audits a single page with every configured check engine.
///
/// Failures never escape `audit`: they become an errored `PageResult` so the
/// run can move on to the next page.
pub struct PageAuditor {
    normalizer: IssueNormalizer,
    checkers: Vec<Arc<dyn AccessibilityChecker>>,
    navigation_timeout: Duration,
}

impl PageAuditor {
    /// Findings are concatenated in `checkers` order.
    pub fn new(
        normalizer: IssueNormalizer,
        checkers: Vec<Arc<dyn AccessibilityChecker>>,
        navigation_timeout: Duration,
    ) -> Self {
        Self {
            normalizer,
            checkers,
            navigation_timeout,
        }
    }

    #[instrument(skip(self, session))]
    pub async fn audit(&self, url: &str, session: &dyn BrowserSession) -> PageResult {
        let started = Instant::now();
        let mut page = match session.new_page().await {
            Ok(page) => page,
            Err(e) => {
                warn!("Could not open a page: {}", e);
                metrics::audit::page_failed();
                return PageResult::failed(url, e.to_string());
            }
        };

        let outcome = self.audit_loaded(url, page.as_mut()).await;
        page.close().await;

        match outcome {
            Ok(issues) => {
                let score = scoring::score(&issues);
                info!(score, issues = issues.len(), "Page audited");
                metrics::audit::page_audited(score, issues.len(), started.elapsed().as_secs_f64());
                PageResult::scored(url, score, issues)
            }
            Err(e) => {
                warn!("Audit failed: {}", e);
                metrics::audit::page_failed();
                PageResult::failed(url, e.to_string())
            }
        }
    }

    async fn audit_loaded(&self, url: &str, page: &mut dyn PageHandle) -> Result<Vec<NormalizedIssue>> {
        let options = NavigationOptions {
            wait_until: WaitUntil::NetworkIdle,
            timeout: self.navigation_timeout,
        };
        page.goto(url, options).await?;

        let mut batches = Vec::with_capacity(self.checkers.len());
        for checker in &self.checkers {
            let findings = checker.check(&*page).await?;
            debug!(engine = %checker.source(), findings = findings.len(), "Check finished");
            batches.push(findings);
        }
        Ok(self.normalizer.normalize_batches(batches))
    }
}
