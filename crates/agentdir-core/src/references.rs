//! Cross-file category reference checking.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::classify::is_record_file;
use crate::kind::RecordKind;
use crate::validator::{load_yaml_file, ValidatedEntry};

/// An entry whose `category` does not resolve to a known id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ERROR {}: Unknown {kind} category '{category}'", .path.display())]
pub struct ReferenceError {
    pub path: PathBuf,
    pub kind: RecordKind,
    pub category: String,
}

/// Collect the `id` of every category file directly inside `dir`.
///
/// Files that fail to parse or have no `id` are skipped. A missing
/// directory yields an empty set.
pub fn load_category_ids(dir: &Path) -> HashSet<String> {
    let mut ids = HashSet::new();
    let Ok(read_dir) = std::fs::read_dir(dir) else {
        return ids;
    };
    for entry in read_dir.filter_map(|e| e.ok()) {
        let path = entry.path();
        if !path.is_file() || !is_record_file(&path) {
            continue;
        }
        match load_yaml_file(&path) {
            Ok(map) => {
                let entry = ValidatedEntry::new(&path, map, RecordKind::Category);
                if let Some(id) = entry.field("id") {
                    ids.insert(id);
                }
            }
            Err(e) => debug!(path = %path.display(), error = %e, "skipping unreadable category file"),
        }
    }
    ids
}

/// One error per entry whose non-empty `category` is not in `known_ids`.
pub fn check_category_references(
    entries: &[ValidatedEntry],
    known_ids: &HashSet<String>,
) -> Vec<ReferenceError> {
    entries
        .iter()
        .filter_map(|entry| {
            let category = entry.field("category")?;
            if known_ids.contains(&category) {
                return None;
            }
            Some(ReferenceError {
                path: entry.path.clone(),
                kind: entry.kind,
                category,
            })
        })
        .collect()
}
