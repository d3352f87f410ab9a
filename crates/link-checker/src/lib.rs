//! Link checker for the agent directory
//!
//! Scans record files, documentation, templates and static assets for
//! URLs, probes each distinct URL once under a per-host rate limit, and
//! classifies the results into a report.
//!
//! - [`scan`] and [`extract`] find URLs.
//! - [`checker`] probes one URL with retry and backoff through a [`Prober`].
//! - [`orchestrator`] batches probes and fans results out per occurrence.
//! - [`report`] and [`issues`] turn results into output.

pub mod checker;
pub mod config;
pub mod error;
pub mod extract;
pub mod fakes;
pub mod issues;
pub mod orchestrator;
pub mod probe;
pub mod rate_limit;
pub mod report;
pub mod scan;

pub use checker::{check_url, CheckOutcome};
pub use config::{IssueConfig, LinkCheckConfig};
pub use error::LinkCheckError;
pub use extract::{extract_urls, extract_yaml_urls, ExtractedUrl, ExtractedUrls, SourceFormat};
pub use issues::{draft_issues, FilingSummary, GithubIssueFiler, IssueDraft};
pub use orchestrator::check_all_urls;
pub use probe::{ProbeError, ProbeMethod, Prober, ReqwestProber};
pub use rate_limit::RateLimiter;
pub use report::{LinkReport, LinkStatus, SourceType, Summary, UrlCheck};
pub use scan::{collect_all_urls, UrlMap};

/// Result type for link-checker operations
pub type Result<T> = std::result::Result<T, LinkCheckError>;
