use crate::app::ports::{BrowserLauncher, BrowserSession, HttpClientPort, NavigationOptions, PageHandle, WaitUntil};
use crate::config::CrawlConfig;
use crate::constants::SITEMAP_PATH;
use crate::error::{AuditError, Result};
use crate::infra::sitemap;
use crate::metrics;
use reqwest::Url;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Resolves the pages to audit: the site's sitemap when it has one, otherwise
/// a bounded breadth-first crawl from the start URL.
pub struct UrlDiscoverer {
    http: Arc<dyn HttpClientPort>,
    launcher: Arc<dyn BrowserLauncher>,
    config: CrawlConfig,
}

impl UrlDiscoverer {
    pub fn new(http: Arc<dyn HttpClientPort>, launcher: Arc<dyn BrowserLauncher>, config: CrawlConfig) -> Self {
        Self { http, launcher, config }
    }

    /// Deduplicated URLs in discovery order.
    ///
    /// Sitemap problems are never raised; the only error is failing to start
    /// the browser for the crawl fallback.
    #[instrument(skip(self, base_url), fields(base = %base_url))]
    pub async fn discover(&self, base_url: &Url, max_depth: usize) -> Result<Vec<String>> {
        let from_sitemap = self.sitemap_urls(base_url).await;
        if !from_sitemap.is_empty() {
            info!("Using {} URLs from sitemap", from_sitemap.len());
            return Ok(from_sitemap);
        }
        info!("No sitemap detected, crawling DOM (depth {})", max_depth);
        self.crawl(base_url, max_depth).await
    }

    /// URLs listed in `{origin}/sitemap.xml`, or nothing when the sitemap is
    /// missing, unreachable or unparseable.
    pub async fn sitemap_urls(&self, base_url: &Url) -> Vec<String> {
        match self.fetch_sitemap(base_url).await {
            Ok(locations) => {
                let mut urls = dedupe_preserving_order(locations);
                if let Some(cap) = self.config.max_sitemap_urls {
                    urls.truncate(cap);
                }
                metrics::discovery::sitemap_hit(urls.len());
                urls
            }
            Err(e) => {
                debug!("No usable sitemap: {}", e);
                metrics::discovery::sitemap_miss();
                Vec::new()
            }
        }
    }

    async fn fetch_sitemap(&self, base_url: &Url) -> Result<Vec<String>> {
        let sitemap_url = base_url.join(SITEMAP_PATH).map_err(|e| AuditError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        let response = self.http.get(sitemap_url.as_str()).await?;
        if !response.is_success() {
            return Err(AuditError::Sitemap(format!(
                "{} responded with status {}",
                sitemap_url, response.status
            )));
        }
        sitemap::parse_locations(&response.text())
    }

    /// Breadth-first crawl over same-origin links.
    ///
    /// Stops when the frontier drains, when `max_results` pages have been
    /// collected, or when `max_depth * pages_per_depth` pages have been
    /// visited. The visit budget stands in for depth; it does not track how
    /// many links away from the start a page is.
    pub async fn crawl(&self, base_url: &Url, max_depth: usize) -> Result<Vec<String>> {
        let session = self.launcher.launch().await?;
        let urls = self.traverse(base_url, max_depth, session.as_ref()).await;
        session.close().await;
        Ok(urls)
    }

    async fn traverse(&self, base_url: &Url, max_depth: usize, session: &dyn BrowserSession) -> Vec<String> {
        let visit_budget = max_depth.saturating_mul(self.config.pages_per_depth);
        let mut visited: HashSet<String> = HashSet::new();
        let mut frontier: VecDeque<String> = VecDeque::from([strip_fragment(base_url).to_string()]);
        let mut results: Vec<String> = Vec::new();

        while let Some(current) = frontier.pop_front() {
            if results.len() >= self.config.max_results || visited.len() >= visit_budget {
                break;
            }
            let current_url = match Url::parse(&current) {
                Ok(url) => url,
                Err(_) => continue,
            };
            if visited.contains(&current) || current_url.origin() != base_url.origin() {
                continue;
            }
            visited.insert(current.clone());
            results.push(current.clone());
            metrics::discovery::crawl_node_visited();

            match self.outlinks(&current, session).await {
                Ok(links) => {
                    for link in links {
                        if let Some(link) = same_origin_http_link(&link, base_url) {
                            if !visited.contains(&link) {
                                frontier.push_back(link);
                            }
                        }
                    }
                }
                Err(e) => {
                    warn!(url = %current, "Skipping links of page that failed to load: {}", e);
                    metrics::discovery::crawl_node_failed();
                }
            }
        }

        let mut urls = dedupe_preserving_order(results);
        urls.truncate(self.config.max_returned);
        info!(visited = visited.len(), returned = urls.len(), "Crawl finished");
        urls
    }

    async fn outlinks(&self, url: &str, session: &dyn BrowserSession) -> Result<Vec<String>> {
        let mut page = session.new_page().await?;
        let links = self.load_and_collect(url, page.as_mut()).await;
        page.close().await;
        links
    }

    async fn load_and_collect(&self, url: &str, page: &mut dyn PageHandle) -> Result<Vec<String>> {
        let options = NavigationOptions {
            wait_until: WaitUntil::DomContentLoaded,
            timeout: self.config.navigation_timeout(),
        };
        page.goto(url, options).await?;
        page.anchor_hrefs().await
    }
}

/// `href` as a crawlable URL: http(s), same origin as `base_url`, fragment removed
fn same_origin_http_link(href: &str, base_url: &Url) -> Option<String> {
    let url = Url::parse(href).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.origin() != base_url.origin() {
        return None;
    }
    Some(strip_fragment(&url).to_string())
}

fn strip_fragment(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_fragment(None);
    url
}

fn dedupe_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.into_iter().filter(|url| seen.insert(url.clone())).collect()
}
