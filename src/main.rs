use anyhow::Context;
use clap::{Parser, Subcommand};
use rgaa_auditor::app::ports::{AccessibilityChecker, BrowserLauncher};
use rgaa_auditor::config::AuditConfig;
use rgaa_auditor::constants;
use rgaa_auditor::infra::axe_cli::AxeCli;
use rgaa_auditor::infra::http_client::ReqwestHttp;
use rgaa_auditor::infra::pa11y_cli::Pa11yCli;
use rgaa_auditor::infra::static_browser::StaticBrowserLauncher;
use rgaa_auditor::{logging, metrics};
use rgaa_auditor::{IssueNormalizer, PageAuditor, ReportAggregator, Report, RuleMapper, UrlDiscoverer};
use reqwest::Url;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "rgaa_auditor")]
#[command(about = "Site-wide RGAA accessibility audit")]
#[command(version)]
struct Cli {
    /// Optional TOML config file
    #[arg(long, global = true, default_value = constants::DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover a site's pages, audit each one and write the JSON report
    Audit {
        /// Start URL of the site to audit
        #[arg(short = 'u', long)]
        url: String,
        /// Crawl depth hint, used only when the site has no sitemap
        #[arg(short, long, default_value_t = constants::DEFAULT_DEPTH)]
        depth: usize,
        /// Report output path
        #[arg(short, long, default_value = constants::DEFAULT_REPORT_PATH)]
        out: PathBuf,
        /// RGAA rule mapping (JSON)
        #[arg(long, default_value = constants::DEFAULT_MAPPING_PATH)]
        mapping: PathBuf,
        /// Pages audited at once (overrides audit.concurrency)
        #[arg(long)]
        concurrency: Option<usize>,
    },
    /// Print the summary of a previously written report
    Summarize {
        /// Report to read
        #[arg(default_value = constants::DEFAULT_REPORT_PATH)]
        file: PathBuf,
    },
}

fn build_aggregator(config: &AuditConfig, mapper: RuleMapper) -> anyhow::Result<ReportAggregator> {
    let http = Arc::new(ReqwestHttp::new(&config.http)?);
    let launcher: Arc<dyn BrowserLauncher> = Arc::new(StaticBrowserLauncher::new(
        config.http.clone(),
        config.audit.max_open_pages,
    ));
    let checkers: Vec<Arc<dyn AccessibilityChecker>> = vec![
        Arc::new(AxeCli::new(&config.checkers)),
        Arc::new(Pa11yCli::new(&config.checkers)),
    ];

    let discoverer = UrlDiscoverer::new(http, launcher.clone(), config.crawl.clone());
    let auditor = PageAuditor::new(
        IssueNormalizer::new(mapper),
        checkers,
        config.audit.navigation_timeout(),
    );
    Ok(ReportAggregator::new(discoverer, auditor, launcher, config.audit.concurrency))
}

async fn run_audit(
    url: String,
    depth: usize,
    out: PathBuf,
    mapping: PathBuf,
    mut config: AuditConfig,
    concurrency: Option<usize>,
) -> anyhow::Result<()> {
    // Usage and configuration problems abort before any network activity
    Url::parse(&url).with_context(|| format!("invalid start URL '{}'", url))?;
    if let Some(concurrency) = concurrency {
        anyhow::ensure!(concurrency > 0, "--concurrency must be at least 1");
        config.audit.concurrency = concurrency;
    }
    let mapper = RuleMapper::from_path(&mapping)?;

    let aggregator = build_aggregator(&config, mapper)?;
    let report = aggregator.run(&url, depth).await?;

    report
        .write_to(&out)
        .with_context(|| format!("failed to write report to {}", out.display()))?;
    info!("Report written to {}", out.display());
    println!("✅ Report written to {}", out.display());
    println!("{}", report.summary());
    Ok(())
}

fn summarize(file: PathBuf) -> anyhow::Result<()> {
    let report = Report::read_from(&file)
        .with_context(|| format!("cannot read report {}", file.display()))?;
    println!("📊 RGAA score: {:.1} / 100", report.metadata.average_score);
    println!("📄 Pages audited: {}", report.metadata.pages_audited);
    println!("📈 Status: {}", report.metadata.compliance_status);
    println!("📁 Report: {}", file.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let config = AuditConfig::load(&cli.config)
        .with_context(|| format!("invalid config file {}", cli.config.display()))?;
    let _log_guard = logging::init_logging(&config.logging);
    metrics::init_metrics();

    let outcome = match cli.command {
        Commands::Audit { url, depth, out, mapping, concurrency } => {
            run_audit(url, depth, out, mapping, config, concurrency).await
        }
        Commands::Summarize { file } => summarize(file),
    };
    if let Err(e) = &outcome {
        error!("{:#}", e);
    }
    outcome
}
