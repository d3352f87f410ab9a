//! URL extraction from repository files.
//!
//! Text extraction is lazy: [`extract_urls`] returns an iterator that runs
//! the format's regex passes one after another. Calling it again on the
//! same content yields the same sequence.

use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

use agentdir_core::{load_yaml_file, scalar_field, ValidationError};
use regex::{CaptureMatches, Captures, Regex};
use serde::{Deserialize, Serialize};

/// Record fields that hold a URL directly.
const YAML_URL_FIELDS: &[&str] = &["url", "documentation_url", "demo_url"];
const GITHUB_REPO_FIELD: &str = "github_repo";

/// Kind of text being scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Markdown prose
    Markdown,
    /// Jinja2 or HTML templates
    Template,
    /// CSS and JavaScript assets
    Static,
}

/// A URL found in a file with a label describing where it was found.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedUrl {
    pub url: String,
    pub context: String,
}

impl ExtractedUrl {
    pub fn new(url: impl Into<String>, context: impl Into<String>) -> Self {
        ExtractedUrl {
            url: url.into(),
            context: context.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Inline,
    Reference,
    Direct,
    Literal,
    Static,
}

const MARKDOWN_PASSES: &[Pass] = &[Pass::Inline, Pass::Reference, Pass::Direct];
const TEMPLATE_PASSES: &[Pass] = &[Pass::Literal];
const STATIC_PASSES: &[Pass] = &[Pass::Static];

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("static URL pattern"))
}

impl Pass {
    fn regex(self) -> &'static Regex {
        static INLINE: OnceLock<Regex> = OnceLock::new();
        static REFERENCE: OnceLock<Regex> = OnceLock::new();
        static DIRECT: OnceLock<Regex> = OnceLock::new();
        static LITERAL: OnceLock<Regex> = OnceLock::new();
        static STATIC: OnceLock<Regex> = OnceLock::new();
        match self {
            Pass::Inline => regex(&INLINE, r"\[([^\]]+)\]\(([^)]+)\)"),
            Pass::Reference => regex(&REFERENCE, r"(?m)^\[([^\]]+)\]:\s*(.+)$"),
            Pass::Direct => regex(&DIRECT, r#"https?://[^\s<>"{}|\\^`\[\]]+"#),
            Pass::Literal => regex(&LITERAL, r#"https?://[^\s"'<>]+"#),
            Pass::Static => regex(&STATIC, r#"https?://[^\s"'<>)\]};]+"#),
        }
    }

    /// Whether duplicates within this pass are dropped as well.
    fn dedups_within(self) -> bool {
        matches!(self, Pass::Direct)
    }

    fn candidate(self, caps: &Captures<'_>, content: &str) -> Option<ExtractedUrl> {
        match self {
            Pass::Inline => {
                let url = caps.get(2)?.as_str();
                is_absolute_http(url).then(|| ExtractedUrl::new(url, format!("inline:[{}]", &caps[1])))
            }
            Pass::Reference => {
                let url = caps.get(2)?.as_str().trim();
                is_absolute_http(url)
                    .then(|| ExtractedUrl::new(url, format!("reference:[{}]", &caps[1])))
            }
            Pass::Direct => {
                let m = caps.get(0)?;
                if content[..m.start()].ends_with('(') {
                    return None;
                }
                Some(ExtractedUrl::new(m.as_str(), "direct"))
            }
            Pass::Literal => {
                let url = caps.get(0)?.as_str();
                (!url.contains("{{") && !url.contains("}}")).then(|| ExtractedUrl::new(url, "literal"))
            }
            Pass::Static => Some(ExtractedUrl::new(caps.get(0)?.as_str(), "static")),
        }
    }
}

fn is_absolute_http(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// Lazy sequence of URLs found in one piece of content.
pub struct ExtractedUrls<'a> {
    content: &'a str,
    passes: &'static [Pass],
    index: usize,
    matches: Option<CaptureMatches<'static, 'a>>,
    /// URLs captured by completed passes.
    earlier: HashSet<String>,
    /// URLs captured by the running pass.
    current: HashSet<String>,
}

impl<'a> ExtractedUrls<'a> {
    fn new(content: &'a str, format: SourceFormat) -> Self {
        let passes = match format {
            SourceFormat::Markdown => MARKDOWN_PASSES,
            SourceFormat::Template => TEMPLATE_PASSES,
            SourceFormat::Static => STATIC_PASSES,
        };
        ExtractedUrls {
            content,
            passes,
            index: 0,
            matches: None,
            earlier: HashSet::new(),
            current: HashSet::new(),
        }
    }

    fn finish_pass(&mut self) {
        self.earlier.extend(self.current.drain());
        self.matches = None;
        self.index += 1;
    }
}

impl Iterator for ExtractedUrls<'_> {
    type Item = ExtractedUrl;

    fn next(&mut self) -> Option<ExtractedUrl> {
        loop {
            let pass = *self.passes.get(self.index)?;
            let content = self.content;
            let matches = self
                .matches
                .get_or_insert_with(|| pass.regex().captures_iter(content));

            let Some(caps) = matches.next() else {
                self.finish_pass();
                continue;
            };
            let Some(found) = pass.candidate(&caps, content) else {
                continue;
            };
            if self.earlier.contains(&found.url) {
                continue;
            }
            if self.current.contains(&found.url) && pass.dedups_within() {
                continue;
            }
            self.current.insert(found.url.clone());
            return Some(found);
        }
    }
}

/// Extract URLs from `content` according to its format.
pub fn extract_urls(content: &str, format: SourceFormat) -> ExtractedUrls<'_> {
    ExtractedUrls::new(content, format)
}

/// URLs named by a record file's fields, labelled with the field name.
///
/// `github_repo` is expanded to its GitHub URL.
pub fn extract_yaml_urls(path: &Path) -> Result<Vec<ExtractedUrl>, ValidationError> {
    let data = load_yaml_file(path)?;
    let mut urls: Vec<ExtractedUrl> = YAML_URL_FIELDS
        .iter()
        .filter_map(|field| scalar_field(&data, field).map(|url| ExtractedUrl::new(url, *field)))
        .collect();
    if let Some(repo) = scalar_field(&data, GITHUB_REPO_FIELD) {
        urls.push(ExtractedUrl::new(
            format!("https://github.com/{repo}"),
            GITHUB_REPO_FIELD,
        ));
    }
    Ok(urls)
}
