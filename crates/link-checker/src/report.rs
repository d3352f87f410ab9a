//! Per-occurrence results, their classification and the persisted report.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    Success,
    Warning,
    Error,
}

impl LinkStatus {
    /// Classify a status code; 0 means no response was obtained.
    ///
    /// Auth-gated, rate-limited and server-side failures are ambiguous and
    /// only warn.
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => LinkStatus::Error,
            c if c < 400 => LinkStatus::Success,
            401 | 403 | 429 => LinkStatus::Warning,
            c if c >= 500 => LinkStatus::Warning,
            _ => LinkStatus::Error,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Yaml,
    Markdown,
    Template,
    Static,
}

impl SourceType {
    pub fn for_path(path: &str) -> Self {
        if path.ends_with(".yml") || path.ends_with(".yaml") {
            SourceType::Yaml
        } else if path.ends_with(".md") {
            SourceType::Markdown
        } else if path.contains(".jinja") || path.ends_with(".html") {
            SourceType::Template
        } else {
            SourceType::Static
        }
    }
}

/// Outcome for one occurrence of a URL in one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlCheck {
    pub url: String,
    pub status: LinkStatus,
    /// `None` when no response was obtained.
    pub status_code: Option<u16>,
    pub error_message: Option<String>,
    pub source_file: String,
    pub source_type: SourceType,
    /// Record field or extraction context.
    pub field_name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub success: usize,
    pub warnings: usize,
    pub errors: usize,
}

impl Summary {
    pub fn of(results: &[UrlCheck]) -> Self {
        let count = |status: LinkStatus| results.iter().filter(|r| r.status == status).count();
        Summary {
            total: results.len(),
            success: count(LinkStatus::Success),
            warnings: count(LinkStatus::Warning),
            errors: count(LinkStatus::Error),
        }
    }
}

/// The JSON document written at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    pub timestamp: String,
    pub summary: Summary,
    pub results: Vec<UrlCheck>,
}

/// One URL with every file that referenced it.
struct UrlGroup<'a> {
    first: &'a UrlCheck,
    sources: BTreeSet<&'a str>,
}

fn group_by_url(results: &[UrlCheck], status: LinkStatus) -> Vec<UrlGroup<'_>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<UrlGroup<'_>> = Vec::new();
    for result in results.iter().filter(|r| r.status == status) {
        let i = *index.entry(result.url.as_str()).or_insert_with(|| {
            groups.push(UrlGroup {
                first: result,
                sources: BTreeSet::new(),
            });
            groups.len() - 1
        });
        groups[i].sources.insert(result.source_file.as_str());
    }
    groups
}

impl LinkReport {
    pub fn new(results: Vec<UrlCheck>) -> Self {
        LinkReport {
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            summary: Summary::of(&results),
            results,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    pub fn exit_code(&self) -> i32 {
        if self.has_errors() {
            1
        } else {
            0
        }
    }

    /// Error results, in the order they were produced.
    pub fn errors(&self) -> impl Iterator<Item = &UrlCheck> {
        self.results.iter().filter(|r| r.status == LinkStatus::Error)
    }

    /// Write the report as pretty JSON, creating parent directories.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Terminal summary. Failed links are listed once per URL with every
    /// referencing file; warnings are listed only when `verbose`.
    pub fn render(&self, verbose: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Link Check Results ===\n");
        let _ = writeln!(out, "✓ Passed: {}", self.summary.success);
        let _ = writeln!(out, "⚠ Warnings: {}", self.summary.warnings);
        let _ = writeln!(out, "✗ Failed: {}", self.summary.errors);

        let failed = group_by_url(&self.results, LinkStatus::Error);
        if !failed.is_empty() {
            let _ = writeln!(out, "\nFailed Links:");
            for group in &failed {
                let status = group
                    .first
                    .status_code
                    .map_or_else(|| "N/A".to_string(), |c| c.to_string());
                let _ = writeln!(out, "  ✗ {}", group.first.url);
                let _ = writeln!(out, "    Status: {status}");
                if let Some(message) = &group.first.error_message {
                    let _ = writeln!(out, "    Error: {message}");
                }
                let sources: Vec<&str> = group.sources.iter().copied().collect();
                let _ = writeln!(out, "    Found in: {}", sources.join(", "));
            }
        }

        let warned = group_by_url(&self.results, LinkStatus::Warning);
        if verbose && !warned.is_empty() {
            let _ = writeln!(out, "\nWarnings:");
            for group in &warned {
                let status = group
                    .first
                    .status_code
                    .map_or_else(|| "N/A".to_string(), |c| c.to_string());
                let _ = writeln!(out, "  ⚠ {}", group.first.url);
                let _ = writeln!(out, "    Status: {status}");
                let sources: Vec<&str> = group.sources.iter().copied().collect();
                let _ = writeln!(out, "    Found in: {}", sources.join(", "));
            }
        }
        out
    }
}
