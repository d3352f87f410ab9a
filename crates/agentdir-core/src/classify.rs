//! File classification and collection under a data root.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use crate::error::PathError;
use crate::kind::RecordKind;

const YAML_EXTENSIONS: &[&str] = &["yml", "yaml"];
const SENTINEL_FILES: &[&str] = &[".gitkeep"];

/// Whether `path` carries one of the recognised YAML suffixes.
pub fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| YAML_EXTENSIONS.contains(&e))
}

fn is_sentinel(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| SENTINEL_FILES.contains(&n))
}

/// Whether `path` is a candidate record file at all.
pub fn is_record_file(path: &Path) -> bool {
    !is_sentinel(path) && is_yaml_file(path)
}

/// Kind of `path` by its first component relative to `data_root`.
///
/// Both paths are canonicalised when possible so relative and absolute
/// spellings of the same location agree.
pub fn classify(path: &Path, data_root: &Path) -> Option<RecordKind> {
    let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let root = std::fs::canonicalize(data_root).unwrap_or_else(|_| data_root.to_path_buf());
    let relative = resolved.strip_prefix(&root).ok()?;
    let first = relative.components().next()?;
    RecordKind::from_dir_name(first.as_os_str().to_str()?)
}

/// Which kinds a run includes. All kinds when no flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindFilter {
    pub agents: bool,
    pub categories: bool,
    pub boilerplates: bool,
    pub boilerplate_categories: bool,
}

impl KindFilter {
    pub fn all() -> Self {
        KindFilter {
            agents: true,
            categories: true,
            boilerplates: true,
            boilerplate_categories: true,
        }
    }

    fn any_set(&self) -> bool {
        self.agents || self.categories || self.boilerplates || self.boilerplate_categories
    }

    pub fn includes(&self, kind: RecordKind) -> bool {
        if !self.any_set() {
            return true;
        }
        match kind {
            RecordKind::Agent => self.agents,
            RecordKind::Category => self.categories,
            RecordKind::Boilerplate => self.boilerplates,
            RecordKind::BoilerplateCategory => self.boilerplate_categories,
        }
    }
}

/// Record files grouped by kind, each list sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedFiles {
    by_kind: BTreeMap<RecordKind, BTreeSet<PathBuf>>,
}

impl CollectedFiles {
    fn add(&mut self, kind: RecordKind, path: PathBuf) {
        self.by_kind.entry(kind).or_default().insert(path);
    }

    pub fn files(&self, kind: RecordKind) -> Vec<&Path> {
        self.by_kind
            .get(&kind)
            .map(|set| set.iter().map(PathBuf::as_path).collect())
            .unwrap_or_default()
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        self.by_kind.get(&kind).map_or(0, BTreeSet::len)
    }

    pub fn total(&self) -> usize {
        self.by_kind.values().map(BTreeSet::len).sum()
    }
}

/// Collect record files for a run.
///
/// With no explicit `paths`, each included kind is discovered under its
/// directory in `data_root`. Explicit directories are walked recursively and
/// files outside the data root are skipped silently; an explicit file that
/// does not exist or lies outside the data root is a usage error. All usage
/// errors are returned together.
pub fn collect_files(
    paths: &[PathBuf],
    data_root: &Path,
    filter: &KindFilter,
) -> std::result::Result<CollectedFiles, Vec<PathError>> {
    let mut collected = CollectedFiles::default();
    let mut errors = Vec::new();

    if paths.is_empty() {
        for kind in RecordKind::ALL {
            if !filter.includes(kind) {
                continue;
            }
            let dir = data_root.join(kind.dir_name());
            let depth = if kind.is_nested() { usize::MAX } else { 1 };
            for file in walk_record_files(&dir, depth) {
                collected.add(kind, file);
            }
        }
        return Ok(collected);
    }

    for path in paths {
        if !path.exists() {
            errors.push(PathError::NotFound(path.clone()));
            continue;
        }
        if path.is_dir() {
            for file in walk_record_files(path, usize::MAX) {
                match classify(&file, data_root) {
                    Some(kind) if filter.includes(kind) => collected.add(kind, file),
                    Some(_) => {}
                    None => debug!(path = %file.display(), "skipping file outside data root"),
                }
            }
        } else if is_record_file(path) {
            match classify(path, data_root) {
                Some(kind) if filter.includes(kind) => collected.add(kind, path.clone()),
                Some(_) => {}
                None => errors.push(PathError::OutsideDataRoot(path.clone())),
            }
        }
    }

    if errors.is_empty() {
        Ok(collected)
    } else {
        Err(errors)
    }
}

fn walk_record_files(dir: &Path, max_depth: usize) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| is_record_file(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "x: 1\n").unwrap();
    }

    #[test]
    fn classifies_by_top_level_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let cases = [
            ("agents/frameworks/a.yml", Some(RecordKind::Agent)),
            ("categories/c.yml", Some(RecordKind::Category)),
            ("boilerplates/js/b.yml", Some(RecordKind::Boilerplate)),
            ("boilerplate-categories/bc.yml", Some(RecordKind::BoilerplateCategory)),
            ("misc/m.yml", None),
        ];
        for (rel, expected) in cases {
            let path = root.join(rel);
            touch(&path);
            assert_eq!(classify(&path, root), expected, "{rel}");
        }
    }

    #[test]
    fn outside_root_is_undetermined() {
        let data = tempdir().unwrap();
        let other = tempdir().unwrap();
        let path = other.path().join("agents/a.yml");
        touch(&path);
        assert_eq!(classify(&path, data.path()), None);
    }

    #[test]
    fn yaml_suffixes_only() {
        assert!(is_yaml_file(Path::new("a.yml")));
        assert!(is_yaml_file(Path::new("a.yaml")));
        assert!(!is_yaml_file(Path::new("a.json")));
        assert!(!is_yaml_file(Path::new("a.yml.txt")));
        assert!(!is_yaml_file(Path::new("yml")));
        assert!(!is_record_file(Path::new("agents/.gitkeep")));
    }

    #[test]
    fn empty_filter_includes_everything() {
        let none = KindFilter::default();
        assert!(RecordKind::ALL.iter().all(|k| none.includes(*k)));

        let agents = KindFilter {
            agents: true,
            ..Default::default()
        };
        assert!(agents.includes(RecordKind::Agent));
        assert!(!agents.includes(RecordKind::Category));
    }

    #[test]
    fn default_discovery_respects_nesting_and_filter() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("agents/frameworks/a.yml"));
        touch(&root.join("agents/b.yaml"));
        touch(&root.join("agents/.gitkeep"));
        touch(&root.join("categories/c.yml"));
        touch(&root.join("categories/nested/ignored.yml"));
        touch(&root.join("boilerplates/js/d.yml"));

        let all = collect_files(&[], root, &KindFilter::all()).unwrap();
        assert_eq!(all.count(RecordKind::Agent), 2);
        assert_eq!(all.count(RecordKind::Category), 1);
        assert_eq!(all.count(RecordKind::Boilerplate), 1);
        assert_eq!(all.total(), 4);

        let only = KindFilter {
            categories: true,
            ..Default::default()
        };
        let some = collect_files(&[], root, &only).unwrap();
        assert_eq!(some.total(), 1);
    }

    #[test]
    fn explicit_paths_report_usage_errors() {
        let data = tempdir().unwrap();
        let other = tempdir().unwrap();
        let outside = other.path().join("x.yml");
        touch(&outside);
        let missing = data.path().join("agents/missing.yml");

        let errors = collect_files(&[outside.clone(), missing.clone()], data.path(), &KindFilter::all())
            .unwrap_err();
        assert_eq!(
            errors,
            vec![PathError::OutsideDataRoot(outside), PathError::NotFound(missing)]
        );
    }

    #[test]
    fn explicit_directory_skips_foreign_files_silently() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("agents/a.yml"));
        touch(&root.join("misc/m.yml"));

        let collected = collect_files(&[root.to_path_buf()], root, &KindFilter::all()).unwrap();
        assert_eq!(collected.total(), 1);
        assert_eq!(collected.files(RecordKind::Agent).len(), 1);
    }
}
