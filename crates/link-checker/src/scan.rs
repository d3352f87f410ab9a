//! Repository scan: which files are read and how.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use agentdir_core::is_record_file;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::extract::{extract_urls, extract_yaml_urls, ExtractedUrl, SourceFormat};

/// URLs found per file, keyed by path relative to the repository root.
pub type UrlMap = BTreeMap<String, Vec<ExtractedUrl>>;

const DATA_DIR: &str = "data";
const DOCS_DIR: &str = "docs";
const TEMPLATES_DIR: &str = "templates";
const STATIC_DIR: &str = "static";
/// Generated from the records, so scanning it would only repeat them.
const GENERATED_README: &str = "README.md";

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e))
}

fn files_in(dir: &Path, max_depth: usize, keep: impl Fn(&Path) -> bool) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| keep(p))
        .collect();
    files.sort();
    files
}

fn relative_key(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

fn scan_text(path: &Path, format: SourceFormat) -> Vec<ExtractedUrl> {
    match std::fs::read_to_string(path) {
        Ok(content) => extract_urls(&content, format).collect(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "could not read file");
            Vec::new()
        }
    }
}

fn insert(map: &mut UrlMap, root: &Path, path: &Path, urls: Vec<ExtractedUrl>) {
    if !urls.is_empty() {
        map.insert(relative_key(root, path), urls);
    }
}

/// Collect URLs from the repository at `root`.
///
/// Record files under `data/` are always scanned. Unless `yaml_only` is
/// set, root Markdown (except the generated README), `docs/*.md`,
/// templates and static assets are scanned too. Files that cannot be read
/// or parsed are logged and skipped; files without URLs are omitted.
pub fn collect_all_urls(root: &Path, yaml_only: bool) -> UrlMap {
    let mut map = UrlMap::new();

    let yaml_files = files_in(&root.join(DATA_DIR), usize::MAX, is_record_file);
    debug!(count = yaml_files.len(), "scanning YAML files");
    for path in &yaml_files {
        match extract_yaml_urls(path) {
            Ok(urls) => insert(&mut map, root, path, urls),
            Err(e) => warn!(path = %path.display(), error = %e, "could not parse file"),
        }
    }
    if yaml_only {
        return map;
    }

    let mut markdown = files_in(root, 1, |p| {
        has_extension(p, &["md"]) && p.file_name().is_some_and(|n| n != GENERATED_README)
    });
    markdown.extend(files_in(&root.join(DOCS_DIR), 1, |p| has_extension(p, &["md"])));
    let templates = files_in(&root.join(TEMPLATES_DIR), 1, |p| {
        has_extension(p, &["jinja2", "html"])
    });
    let assets = files_in(&root.join(STATIC_DIR), usize::MAX, |p| {
        has_extension(p, &["css", "js"])
    });
    debug!(
        markdown = markdown.len(),
        templates = templates.len(),
        assets = assets.len(),
        "scanning text files"
    );

    for (files, format) in [
        (markdown, SourceFormat::Markdown),
        (templates, SourceFormat::Template),
        (assets, SourceFormat::Static),
    ] {
        for path in files {
            let urls = scan_text(&path, format);
            insert(&mut map, root, &path, urls);
        }
    }
    map
}
