use crate::app::ports::{BrowserLauncher, BrowserSession, NavigationOptions, PageHandle};
use crate::config::HttpConfig;
use crate::error::{AuditError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{Html, Selector};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::debug;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector"));
static BASE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("base[href]").expect("static selector"));

/// Browser that fetches documents over HTTP without executing scripts.
///
/// Both wait conditions are satisfied once the response body has been read.
/// Each session caps how many pages may be open at once.
pub struct StaticBrowserLauncher {
    http: HttpConfig,
    max_open_pages: usize,
}

impl StaticBrowserLauncher {
    pub fn new(http: HttpConfig, max_open_pages: usize) -> Self {
        Self {
            http,
            max_open_pages: max_open_pages.max(1),
        }
    }
}

#[async_trait]
impl BrowserLauncher for StaticBrowserLauncher {
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>> {
        let client = reqwest::Client::builder()
            .user_agent(self.http.user_agent.clone())
            .build()?;
        debug!(max_open_pages = self.max_open_pages, "Launched static browser session");
        Ok(Arc::new(StaticBrowserSession {
            client,
            open_pages: Arc::new(Semaphore::new(self.max_open_pages)),
            closed: AtomicBool::new(false),
        }))
    }
}

pub struct StaticBrowserSession {
    client: reqwest::Client,
    open_pages: Arc<Semaphore>,
    closed: AtomicBool,
}

#[async_trait]
impl BrowserSession for StaticBrowserSession {
    async fn new_page(&self) -> Result<Box<dyn PageHandle>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(AuditError::Browser("session is closed".into()));
        }
        let permit = self
            .open_pages
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AuditError::Browser("session is closed".into()))?;
        Ok(Box::new(StaticPage {
            client: self.client.clone(),
            permit: Some(permit),
            url: None,
            html: None,
        }))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.open_pages.close();
    }
}

/// An open page. Its slot in the session's page budget is held by `permit`
/// and returned when the page is closed or dropped.
pub struct StaticPage {
    client: reqwest::Client,
    permit: Option<OwnedSemaphorePermit>,
    url: Option<String>,
    html: Option<String>,
}

impl StaticPage {
    async fn fetch(&self, url: &str) -> Result<(String, String)> {
        let resp = self.client.get(url).send().await.map_err(|e| AuditError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        let final_url = resp.url().to_string();
        if !resp.status().is_success() {
            debug!(url, status = resp.status().as_u16(), "Page loaded with error status");
        }
        let body = resp.text().await.map_err(|e| AuditError::Navigation {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok((final_url, body))
    }
}

#[async_trait]
impl PageHandle for StaticPage {
    async fn goto(&mut self, url: &str, options: NavigationOptions) -> Result<()> {
        if self.permit.is_none() {
            return Err(AuditError::Browser("page is closed".into()));
        }
        debug!(url, wait_until = ?options.wait_until, "Navigating");
        let (final_url, body) = tokio::time::timeout(options.timeout, self.fetch(url))
            .await
            .map_err(|_| AuditError::Timeout {
                url: url.to_string(),
                timeout_secs: options.timeout.as_secs(),
            })??;
        self.url = Some(final_url);
        self.html = Some(body);
        Ok(())
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    async fn anchor_hrefs(&self) -> Result<Vec<String>> {
        match (&self.url, &self.html) {
            (Some(url), Some(html)) => extract_anchor_hrefs(url, html),
            _ => Err(AuditError::Browser("no document loaded".into())),
        }
    }

    async fn close(&mut self) {
        self.html = None;
        self.permit.take();
    }
}

/// Absolute targets of every `<a href>`, resolved the way a browser resolves
/// `a.href` (honouring `<base href>`). Unresolvable hrefs are dropped.
pub fn extract_anchor_hrefs(document_url: &str, html: &str) -> Result<Vec<String>> {
    let document_url = Url::parse(document_url).map_err(|e| AuditError::InvalidUrl {
        url: document_url.to_string(),
        message: e.to_string(),
    })?;
    let document = Html::parse_document(html);
    let base = document
        .select(&BASE_SELECTOR)
        .next()
        .and_then(|base| base.value().attr("href"))
        .and_then(|href| document_url.join(href.trim()).ok())
        .unwrap_or(document_url);

    Ok(document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|anchor| anchor.value().attr("href"))
        .filter_map(|href| base.join(href.trim()).ok())
        .map(|url| url.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::WaitUntil;
    use std::time::Duration;

    #[test]
    fn hrefs_resolve_against_document_url() {
        let html = r#"<html><body>
            <a href="/contact">Contact</a>
            <a href="plan-du-site">Plan</a>
            <a href="https://other.example.org/">Ailleurs</a>
            <a href="mailto:a@example.com">Mail</a>
            <a>no href</a>
        </body></html>"#;
        let hrefs = extract_anchor_hrefs("https://example.com/pages/index.html", html).unwrap();
        assert_eq!(
            hrefs,
            vec![
                "https://example.com/contact",
                "https://example.com/pages/plan-du-site",
                "https://other.example.org/",
                "mailto:a@example.com",
            ]
        );
    }

    #[test]
    fn base_element_changes_resolution() {
        let html = r#"<html><head><base href="https://example.com/docs/"></head>
            <body><a href="guide">Guide</a></body></html>"#;
        let hrefs = extract_anchor_hrefs("https://example.com/", html).unwrap();
        assert_eq!(hrefs, vec!["https://example.com/docs/guide"]);
    }

    #[tokio::test]
    async fn closed_session_refuses_new_pages() {
        let launcher = StaticBrowserLauncher::new(HttpConfig::default(), 1);
        let session = launcher.launch().await.unwrap();
        session.close().await;
        assert!(session.new_page().await.is_err());
    }

    #[tokio::test]
    async fn closing_a_page_frees_its_slot() {
        let launcher = StaticBrowserLauncher::new(HttpConfig::default(), 1);
        let session = launcher.launch().await.unwrap();

        let mut first = session.new_page().await.unwrap();
        let blocked = tokio::time::timeout(Duration::from_millis(50), session.new_page()).await;
        assert!(blocked.is_err(), "second page must wait for a free slot");

        first.close().await;
        let second = tokio::time::timeout(Duration::from_millis(50), session.new_page()).await;
        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn dropped_page_frees_its_slot() {
        let launcher = StaticBrowserLauncher::new(HttpConfig::default(), 1);
        let session = launcher.launch().await.unwrap();

        drop(session.new_page().await.unwrap());
        let next = tokio::time::timeout(Duration::from_millis(50), session.new_page()).await;
        assert!(next.is_ok());
    }

    #[tokio::test]
    async fn closed_page_cannot_navigate() {
        let launcher = StaticBrowserLauncher::new(HttpConfig::default(), 1);
        let session = launcher.launch().await.unwrap();
        let mut page = session.new_page().await.unwrap();
        page.close().await;
        let options = NavigationOptions {
            wait_until: WaitUntil::NetworkIdle,
            timeout: Duration::from_secs(1),
        };
        assert!(matches!(
            page.goto("https://example.com/", options).await,
            Err(AuditError::Browser(_))
        ));
    }
}
