//! A complete validation run over a data root.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::classify::{collect_files, KindFilter};
use crate::duplicates::{check_duplicates, DuplicateGroup};
use crate::error::{PathError, ValidationError};
use crate::kind::RecordKind;
use crate::references::{check_category_references, load_category_ids, ReferenceError};
use crate::validator::{validate_file, ValidatedEntry};

/// Fields checked for duplicates across agents and boilerplates, in order.
const DUPLICATE_FIELDS: &[&str] = &["url", "github_repo"];

const RULE_WIDTH: usize = 60;

/// One reported problem.
#[derive(Debug)]
pub enum Finding {
    /// A file that could not be loaded or failed its schema.
    File {
        path: PathBuf,
        error: ValidationError,
    },
    Reference(ReferenceError),
    Duplicate(DuplicateGroup),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::File { path, error } => write!(f, "ERROR {}: {error}", path.display()),
            Finding::Reference(e) => fmt::Display::fmt(e, f),
            Finding::Duplicate(g) => fmt::Display::fmt(g, f),
        }
    }
}

/// Everything a validation run found.
#[derive(Debug, Default)]
pub struct ValidationOutcome {
    /// Number of files collected per kind.
    pub collected: BTreeMap<RecordKind, usize>,
    /// Files that passed their schema, in processing order.
    pub passed: Vec<PathBuf>,
    pub findings: Vec<Finding>,
}

impl ValidationOutcome {
    pub fn files_checked(&self) -> usize {
        self.collected.values().sum()
    }

    pub fn is_success(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    /// File-level findings only.
    pub fn file_errors(&self) -> impl Iterator<Item = (&Path, &ValidationError)> {
        self.findings.iter().filter_map(|f| match f {
            Finding::File { path, error } => Some((path.as_path(), error)),
            _ => None,
        })
    }

    /// Human-readable report: one line per passing file, then the error
    /// block and a final summary line.
    pub fn render(&self) -> String {
        if self.files_checked() == 0 {
            return "WARNING: No YAML files found to validate".to_string();
        }

        let count = |kind: RecordKind| self.collected.get(&kind).copied().unwrap_or(0);
        let mut lines = vec![format!(
            "Validating {} agent files, {} category files, {} boilerplate files, {} boilerplate category files...",
            count(RecordKind::Agent),
            count(RecordKind::Category),
            count(RecordKind::Boilerplate),
            count(RecordKind::BoilerplateCategory),
        )];
        lines.extend(self.passed.iter().map(|p| format!("OK {}", p.display())));

        let rule = "=".repeat(RULE_WIDTH);
        if self.findings.is_empty() {
            lines.push(String::new());
            lines.push(format!("OK: All {} files passed validation", self.passed.len()));
        } else {
            lines.push(String::new());
            lines.push(rule.clone());
            lines.push("VALIDATION ERRORS:".to_string());
            lines.push(rule);
            lines.extend(self.findings.iter().map(ToString::to_string));
            lines.push(String::new());
            lines.push(format!("{} error(s) found", self.findings.len()));
        }
        lines.join("\n")
    }
}

/// Validate the files selected by `paths` and `filter` under `data_root`.
///
/// Path resolution problems abort before any file is read. Otherwise every
/// file is checked and all findings are collected: per-file schema errors
/// first (kinds in processing order), then category references, then
/// duplicate `url` and `github_repo` values across agents and boilerplates.
pub fn validate_data_root(
    data_root: &Path,
    paths: &[PathBuf],
    filter: &KindFilter,
) -> Result<ValidationOutcome, Vec<PathError>> {
    if !data_root.is_dir() {
        return Err(vec![PathError::DataRootMissing(data_root.to_path_buf())]);
    }
    let files = collect_files(paths, data_root, filter)?;

    let mut outcome = ValidationOutcome::default();
    let mut entries: BTreeMap<RecordKind, Vec<ValidatedEntry>> = BTreeMap::new();

    for kind in RecordKind::ALL {
        outcome.collected.insert(kind, files.count(kind));
        for path in files.files(kind) {
            match validate_file(path, kind) {
                Ok(entry) => {
                    debug!(path = %path.display(), %kind, "record valid");
                    outcome.passed.push(path.to_path_buf());
                    if kind.category_kind().is_some() {
                        entries.entry(kind).or_default().push(entry);
                    }
                }
                Err(error) => {
                    debug!(path = %path.display(), %kind, %error, "record invalid");
                    outcome.findings.push(Finding::File {
                        path: path.to_path_buf(),
                        error,
                    });
                }
            }
        }
    }

    let mut combined = Vec::new();
    for kind in [RecordKind::Agent, RecordKind::Boilerplate] {
        if !filter.includes(kind) {
            continue;
        }
        let kind_entries = entries.remove(&kind).unwrap_or_default();
        if let Some(category_kind) = kind.category_kind() {
            let known = load_category_ids(&data_root.join(category_kind.dir_name()));
            outcome.findings.extend(
                check_category_references(&kind_entries, &known)
                    .into_iter()
                    .map(Finding::Reference),
            );
        }
        combined.extend(kind_entries);
    }

    for field in DUPLICATE_FIELDS {
        outcome.findings.extend(
            check_duplicates(&combined, field, true)
                .into_iter()
                .map(Finding::Duplicate),
        );
    }

    info!(
        files = outcome.files_checked(),
        passed = outcome.passed.len(),
        findings = outcome.findings.len(),
        "validation finished"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(root: &Path, rel: &str, body: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, body).unwrap();
        path
    }

    fn agent(name: &str, url: &str, category: &str) -> String {
        format!(
            "name: {name}\nurl: {url}\ndescription: A description long enough for the schema.\ncategory: {category}\n"
        )
    }

    #[test]
    fn missing_data_root_is_a_path_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("data");
        let errors = validate_data_root(&missing, &[], &KindFilter::all()).unwrap_err();
        assert_eq!(errors, vec![PathError::DataRootMissing(missing)]);
    }

    #[test]
    fn empty_root_renders_warning() {
        let dir = tempdir().unwrap();
        let outcome = validate_data_root(dir.path(), &[], &KindFilter::all()).unwrap();
        assert_eq!(outcome.files_checked(), 0);
        assert_eq!(outcome.exit_code(), 0);
        assert_eq!(outcome.render(), "WARNING: No YAML files found to validate");
    }

    #[test]
    fn reference_and_duplicate_findings_fail_the_run() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            "categories/tools.yml",
            "id: tools\ntitle: Tools\ndescription: Developer tooling for agents.\n",
        );
        write(root, "agents/tools/a.yml", &agent("A", "https://a.dev/x/", "tools"));
        write(root, "agents/tools/b.yml", &agent("B", "http://A.dev/x", "tools"));
        write(root, "agents/misc/c.yml", &agent("C", "https://c.dev", "nowhere"));

        let outcome = validate_data_root(root, &[], &KindFilter::all()).unwrap();
        assert_eq!(outcome.passed.len(), 4);
        assert_eq!(outcome.findings.len(), 2);
        assert!(matches!(&outcome.findings[0], Finding::Reference(e) if e.category == "nowhere"));
        assert!(matches!(&outcome.findings[1], Finding::Duplicate(g) if g.members.len() == 2));
        assert_eq!(outcome.exit_code(), 1);

        let report = outcome.render();
        assert!(report.contains("VALIDATION ERRORS:"));
        assert!(report.ends_with("2 error(s) found"));
    }

    #[test]
    fn category_filter_skips_reference_checks() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        write(root, "agents/a.yml", &agent("A", "https://a.dev", "unknown"));
        write(
            root,
            "categories/tools.yml",
            "id: tools\ntitle: Tools\ndescription: Developer tooling for agents.\n",
        );

        let filter = KindFilter {
            categories: true,
            ..Default::default()
        };
        let outcome = validate_data_root(root, &[], &filter).unwrap();
        assert!(outcome.is_success());
        assert!(outcome.render().ends_with("OK: All 1 files passed validation"));
    }
}
