use std::net::SocketAddr;
use tracing::{info, warn};

/// Install the Prometheus exporter when `RGAA_METRICS_PORT` is set.
///
/// Without it the `metrics` macros below are no-ops.
pub fn init_metrics() {
    let port: u16 = match std::env::var("RGAA_METRICS_PORT").ok().and_then(|s| s.parse().ok()) {
        Some(port) => port,
        None => return,
    };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => info!("Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => warn!("Prometheus exporter install failed: {}", e),
    }
}

pub mod discovery {
    pub fn sitemap_hit(url_count: usize) {
        ::metrics::counter!("rgaa_sitemap_hits_total").increment(1);
        ::metrics::histogram!("rgaa_sitemap_urls").record(url_count as f64);
    }

    pub fn sitemap_miss() {
        ::metrics::counter!("rgaa_sitemap_misses_total").increment(1);
    }

    pub fn crawl_node_visited() {
        ::metrics::counter!("rgaa_crawl_nodes_visited_total").increment(1);
    }

    pub fn crawl_node_failed() {
        ::metrics::counter!("rgaa_crawl_nodes_failed_total").increment(1);
    }
}

pub mod audit {
    pub fn page_audited(score: f64, issue_count: usize, duration_secs: f64) {
        ::metrics::counter!("rgaa_pages_audited_total").increment(1);
        ::metrics::histogram!("rgaa_page_score").record(score);
        ::metrics::histogram!("rgaa_page_issues").record(issue_count as f64);
        ::metrics::histogram!("rgaa_page_audit_duration_seconds").record(duration_secs);
    }

    pub fn page_failed() {
        ::metrics::counter!("rgaa_pages_failed_total").increment(1);
    }

    pub fn run_completed(average_score: f64, duration_secs: f64) {
        ::metrics::counter!("rgaa_runs_total").increment(1);
        ::metrics::gauge!("rgaa_last_run_average_score").set(average_score);
        ::metrics::histogram!("rgaa_run_duration_seconds").record(duration_secs);
    }
}
