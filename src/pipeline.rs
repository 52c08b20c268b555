use crate::app::ports::{BrowserLauncher, BrowserSession};
use crate::auditor::PageAuditor;
use crate::discovery::UrlDiscoverer;
use crate::error::{AuditError, Result};
use crate::metrics;
use crate::types::{PageResult, Report};
use chrono::Utc;
use reqwest::Url;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tracing::{error, info, instrument};

/// Runs discovery, audits every discovered page and builds the site report.
///
/// With `concurrency == 1` pages are audited one after another. Higher values
/// audit up to that many pages at once; results still come back in discovery
/// order and a failed (or panicking) audit only affects its own page.
pub struct ReportAggregator {
    discoverer: UrlDiscoverer,
    auditor: Arc<PageAuditor>,
    launcher: Arc<dyn BrowserLauncher>,
    concurrency: usize,
}

impl ReportAggregator {
    pub fn new(
        discoverer: UrlDiscoverer,
        auditor: PageAuditor,
        launcher: Arc<dyn BrowserLauncher>,
        concurrency: usize,
    ) -> Self {
        Self {
            discoverer,
            auditor: Arc::new(auditor),
            launcher,
            concurrency: concurrency.max(1),
        }
    }

    #[instrument(skip(self))]
    pub async fn run(&self, start_url: &str, max_depth: usize) -> Result<Report> {
        let started = Instant::now();
        let base_url = Url::parse(start_url).map_err(|e| AuditError::InvalidUrl {
            url: start_url.to_string(),
            message: e.to_string(),
        })?;

        info!("🔍 Collecting URLs...");
        let urls = self.discoverer.discover(&base_url, max_depth).await?;
        info!("Pages to audit ({})", urls.len());

        let session = self.launcher.launch().await?;
        let pages = if self.concurrency == 1 {
            self.audit_sequential(&urls, session.as_ref()).await
        } else {
            self.audit_pooled(&urls, session.clone()).await
        };
        session.close().await;

        let report = Report::from_pages(start_url, Utc::now(), pages);
        info!(
            pages_audited = report.metadata.pages_audited,
            failed = report.pages.len() - report.metadata.pages_audited,
            "✅ Audit run finished: {:.2} ({})",
            report.metadata.average_score,
            report.metadata.compliance_status
        );
        metrics::audit::run_completed(report.metadata.average_score, started.elapsed().as_secs_f64());
        Ok(report)
    }

    async fn audit_sequential(&self, urls: &[String], session: &dyn BrowserSession) -> Vec<PageResult> {
        let mut pages = Vec::with_capacity(urls.len());
        for (i, url) in urls.iter().enumerate() {
            info!("→ Audit {}/{}: {}", i + 1, urls.len(), url);
            pages.push(self.auditor.audit(url, session).await);
        }
        pages
    }

    async fn audit_pooled(&self, urls: &[String], session: Arc<dyn BrowserSession>) -> Vec<PageResult> {
        let permits = Arc::new(Semaphore::new(self.concurrency));
        let handles: Vec<_> = urls
            .iter()
            .map(|url| {
                let auditor = self.auditor.clone();
                let session = session.clone();
                let permits = permits.clone();
                let url = url.clone();
                tokio::spawn(async move {
                    let _permit = match permits.acquire_owned().await {
                        Ok(permit) => permit,
                        Err(e) => return PageResult::failed(url, e.to_string()),
                    };
                    info!("→ Audit: {}", url);
                    auditor.audit(&url, session.as_ref()).await
                })
            })
            .collect();

        let mut pages = Vec::with_capacity(urls.len());
        for (url, handle) in urls.iter().zip(handles) {
            match handle.await {
                Ok(page) => pages.push(page),
                Err(e) => {
                    error!(url = %url, "Audit task aborted: {}", e);
                    metrics::audit::page_failed();
                    pages.push(PageResult::failed(url.as_str(), format!("audit task aborted: {}", e)));
                }
            }
        }
        pages
    }
}
