//! Agent Directory maintenance CLI
//!
//! The `agentdir` command keeps the directory's YAML records healthy.
//!
//! ## Commands
//!
//! - `validate`: Check records against their schemas, category references
//!   and duplicate URLs or repositories
//! - `check-links`: Probe every URL in the repository and report broken ones

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use agentdir_core::{validate_data_root, KindFilter};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use link_checker::{
    check_all_urls, collect_all_urls, draft_issues, GithubIssueFiler, IssueConfig,
    LinkCheckConfig, LinkCheckError, LinkReport, ReqwestProber,
};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "agentdir")]
#[command(version = agentdir_core::VERSION)]
#[command(about = "Validate and link-check the agent directory", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate YAML records under the data directory
    Validate(ValidateArgs),

    /// Check every link in the repository
    CheckLinks(CheckLinksArgs),
}

#[derive(Args)]
struct ValidateArgs {
    /// Files or directories to validate (default: the whole data directory)
    paths: Vec<PathBuf>,

    /// Validate agent entries
    #[arg(long)]
    agents: bool,

    /// Validate agent categories
    #[arg(long)]
    categories: bool,

    /// Validate boilerplate entries
    #[arg(long)]
    boilerplates: bool,

    /// Validate boilerplate categories
    #[arg(long)]
    boilerplate_categories: bool,

    /// Data directory holding the records
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

impl ValidateArgs {
    fn filter(&self) -> KindFilter {
        KindFilter {
            agents: self.agents,
            categories: self.categories,
            boilerplates: self.boilerplates,
            boilerplate_categories: self.boilerplate_categories,
        }
    }
}

#[derive(Args)]
struct CheckLinksArgs {
    /// Request timeout in seconds
    #[arg(long, env = "AGENTDIR_TIMEOUT_SECS", default_value_t = 10)]
    timeout: u64,

    /// Attempts per URL
    #[arg(long, env = "AGENTDIR_RETRIES", default_value_t = 3)]
    retries: u32,

    /// Max requests per second per host
    #[arg(long, env = "AGENTDIR_RATE_LIMIT", default_value_t = 5)]
    rate_limit: usize,

    /// Check only YAML records (skips docs, templates and assets)
    #[arg(long)]
    yaml_only: bool,

    /// Skip GitHub issue creation
    #[arg(long)]
    no_issues: bool,

    /// Repository root to scan
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// JSON report path, relative to the root unless absolute
    #[arg(long, default_value = "reports/link-check-report.json")]
    report: PathBuf,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    agentdir_core::telemetry::init_tracing(cli.json, level);

    match cli.command {
        Commands::Validate(args) => cmd_validate(&args),
        Commands::CheckLinks(args) => cmd_check_links(&args, cli.verbose).await,
    }
}

fn exit_code(code: i32) -> ExitCode {
    if code == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Validate records and print the report
fn cmd_validate(args: &ValidateArgs) -> Result<ExitCode> {
    match validate_data_root(&args.data_dir, &args.paths, &args.filter()) {
        Ok(outcome) => {
            println!("{}", outcome.render());
            Ok(exit_code(outcome.exit_code()))
        }
        Err(errors) => {
            for error in &errors {
                println!("ERROR {error}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn resolve_report_path(root: &Path, report: &Path) -> PathBuf {
    if report.is_absolute() {
        report.to_path_buf()
    } else {
        root.join(report)
    }
}

/// Scan, probe, report and optionally file issues
async fn cmd_check_links(args: &CheckLinksArgs, verbose: bool) -> Result<ExitCode> {
    let config = LinkCheckConfig::from_env()
        .with_timeout(Duration::from_secs(args.timeout))
        .with_retries(args.retries)
        .with_rate_limit(args.rate_limit);

    println!("{}", "=".repeat(60));
    println!("  Agent Directory - Link Checker");
    println!("{}", "=".repeat(60));

    let url_map = collect_all_urls(&args.root, args.yaml_only);
    if url_map.is_empty() {
        println!("No URLs found to check.");
        return Ok(ExitCode::SUCCESS);
    }
    let total: usize = url_map.values().map(Vec::len).sum();
    println!("Found {total} URLs in {} files", url_map.len());

    let prober = ReqwestProber::new(&config).context("Failed to build HTTP client")?;
    let results = check_all_urls(&prober, &url_map, &config).await;
    let report = LinkReport::new(results);
    println!("\n{}", report.render(verbose));

    let report_path = resolve_report_path(&args.root, &args.report);
    report
        .write_to(&report_path)
        .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
    println!("Report saved to: {}", report_path.display());

    if !args.no_issues {
        file_issues(&report).await;
    }

    if report.has_errors() {
        println!(
            "\nLink check FAILED: {} broken links found",
            report.summary.errors
        );
    } else {
        println!("\nAll links are valid!");
    }
    Ok(exit_code(report.exit_code()))
}

async fn file_issues(report: &LinkReport) {
    let drafts = draft_issues(report);
    if drafts.is_empty() {
        println!("No broken links to report!");
        return;
    }

    let filer = match GithubIssueFiler::new(IssueConfig::from_env()) {
        Ok(filer) => filer,
        Err(LinkCheckError::MissingToken) => {
            warn!("GITHUB_TOKEN not found, skipping issue creation");
            return;
        }
        Err(e) => {
            warn!(error = %e, "issue filing unavailable");
            return;
        }
    };
    let summary = filer.file_all(&drafts).await;
    info!(
        created = summary.created,
        existing = summary.existing,
        failed = summary.failed,
        "issue filing finished"
    );
}
