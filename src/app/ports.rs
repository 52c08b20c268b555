use crate::error::Result;
use crate::types::{IssueSource, RawFinding};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// When a navigation is considered finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    DomContentLoaded,
    NetworkIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationOptions {
    pub wait_until: WaitUntil,
    pub timeout: Duration,
}

// Browser-side ports
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Arc<dyn BrowserSession>>;
}

#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Open a page handle. Implementations may wait here when their open-page
    /// budget is exhausted.
    async fn new_page(&self) -> Result<Box<dyn PageHandle>>;

    async fn close(&self);
}

#[async_trait]
pub trait PageHandle: Send + Sync {
    async fn goto(&mut self, url: &str, options: NavigationOptions) -> Result<()>;

    /// URL of the loaded document, after redirects
    fn url(&self) -> Option<&str>;

    /// Absolute `href` of every anchor in the loaded document
    async fn anchor_hrefs(&self) -> Result<Vec<String>>;

    /// Release the page. Must be safe to call more than once.
    async fn close(&mut self);
}

// Check-engine port
#[async_trait]
pub trait AccessibilityChecker: Send + Sync {
    fn source(&self) -> IssueSource;

    async fn check(&self, page: &dyn PageHandle) -> Result<Vec<RawFinding>>;
}

// Sitemap-side port
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}
