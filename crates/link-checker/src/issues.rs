//! Broken-link issue filing on GitHub.
//!
//! Drafting is pure; [`GithubIssueFiler`] only sends what was drafted.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::IssueConfig;
use crate::error::LinkCheckError;
use crate::report::{LinkReport, UrlCheck};
use crate::Result;

const TITLE_URL_CHARS: usize = 80;
const LABELS: &[&str] = &["broken-link", "automated"];

/// Issue to be opened for one broken URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDraft {
    #[serde(skip)]
    pub url: String,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

fn issue_body(url: &str, occurrences: &[&UrlCheck], detected: &str) -> String {
    let first = occurrences[0];
    let status = first
        .status_code
        .map_or_else(|| "N/A".to_string(), |c| c.to_string());
    let error = first
        .error_message
        .as_deref()
        .unwrap_or("Link is not accessible");
    let sources: Vec<String> = occurrences
        .iter()
        .map(|r| {
            format!(
                "- `{}` (field: `{}`)",
                r.source_file,
                r.field_name.as_deref().unwrap_or("-")
            )
        })
        .collect();

    format!(
        "## Broken Link Detected\n\n\
         **URL:** {url}\n\n\
         **Status Code:** {status}\n\n\
         **Error:** {error}\n\n\
         **Found in:**\n{}\n\n\
         **Detected:** {detected}\n\n\
         ---\n\
         This issue was automatically created by the link checker.\n",
        sources.join("\n")
    )
}

/// One draft per distinct broken URL, in first-seen order.
pub fn draft_issues(report: &LinkReport) -> Vec<IssueDraft> {
    let mut grouped: Vec<(&str, Vec<&UrlCheck>)> = Vec::new();
    for result in report.errors() {
        match grouped.iter_mut().find(|(url, _)| *url == result.url) {
            Some((_, occurrences)) => occurrences.push(result),
            None => grouped.push((result.url.as_str(), vec![result])),
        }
    }

    grouped
        .into_iter()
        .map(|(url, occurrences)| IssueDraft {
            url: url.to_string(),
            title: format!(
                "Broken link: {}",
                url.chars().take(TITLE_URL_CHARS).collect::<String>()
            ),
            body: issue_body(url, &occurrences, &report.timestamp),
            labels: LABELS.iter().map(|l| l.to_string()).collect(),
        })
        .collect()
}

/// Counts from one filing pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilingSummary {
    pub created: usize,
    pub existing: usize,
    pub failed: usize,
}

#[derive(Deserialize)]
struct SearchResponse {
    total_count: u64,
}

#[derive(Deserialize)]
struct CreatedIssue {
    html_url: String,
}

/// Client for the GitHub issues API
pub struct GithubIssueFiler {
    config: IssueConfig,
    token: String,
    http_client: reqwest::Client,
}

impl GithubIssueFiler {
    /// Fails with `MissingToken` when the config has no token.
    pub fn new(config: IssueConfig) -> Result<Self> {
        let token = config.token.clone().ok_or(LinkCheckError::MissingToken)?;
        let http_client = reqwest::Client::builder()
            .user_agent(concat!("agentdir-link-checker/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(GithubIssueFiler {
            config,
            token,
            http_client,
        })
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("Authorization", format!("token {}", self.token))
            .header("Accept", "application/vnd.github.v3+json")
    }

    /// Whether an open issue already mentions `url` in its title.
    pub async fn issue_exists(&self, url: &str) -> Result<bool> {
        let query = format!(
            "repo:{} is:issue is:open {} in:title",
            self.config.repository, url
        );
        let response = self
            .authorized(
                self.http_client
                    .get(format!("{}/search/issues", self.config.api_base)),
            )
            .query(&[("q", query)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(LinkCheckError::Issue {
                url: url.to_string(),
                reason: format!("search returned {}", response.status()),
            });
        }
        let found: SearchResponse = response.json().await?;
        Ok(found.total_count > 0)
    }

    /// Open an issue and return its web URL.
    pub async fn create_issue(&self, draft: &IssueDraft) -> Result<String> {
        let response = self
            .authorized(self.http_client.post(format!(
                "{}/repos/{}/issues",
                self.config.api_base, self.config.repository
            )))
            .json(draft)
            .send()
            .await?;
        if response.status() != reqwest::StatusCode::CREATED {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            debug!(url = %draft.url, response = %text, "issue creation rejected");
            return Err(LinkCheckError::Issue {
                url: draft.url.clone(),
                reason: format!("create returned {status}"),
            });
        }
        let created: CreatedIssue = response.json().await?;
        Ok(created.html_url)
    }

    /// File every draft that has no open issue yet. Failures are logged and
    /// counted, never returned.
    pub async fn file_all(&self, drafts: &[IssueDraft]) -> FilingSummary {
        let mut summary = FilingSummary::default();
        info!(count = drafts.len(), repository = %self.config.repository, "filing broken-link issues");
        for draft in drafts {
            match self.issue_exists(&draft.url).await {
                Ok(true) => {
                    debug!(url = %draft.url, "issue already exists");
                    summary.existing += 1;
                    continue;
                }
                Ok(false) => {}
                Err(e) => warn!(url = %draft.url, error = %e, "could not check for existing issue"),
            }
            match self.create_issue(draft).await {
                Ok(issue_url) => {
                    info!(url = %draft.url, issue = %issue_url, "created issue");
                    summary.created += 1;
                }
                Err(e) => {
                    warn!(url = %draft.url, error = %e, "failed to create issue");
                    summary.failed += 1;
                }
            }
        }
        summary
    }
}
