//! Cross-file duplicate detection over validated entries.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::kind::RecordKind;
use crate::url_norm::normalize_url;
use crate::validator::ValidatedEntry;

/// Field whose values are normalized before grouping.
const URL_FIELD: &str = "url";

/// Two or more entries sharing a value for `field`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub field: String,
    /// Grouping key, normalized when the field is `url`.
    pub value: String,
    pub members: Vec<(PathBuf, RecordKind)>,
}

impl fmt::Display for DuplicateGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR Duplicate {} '{}' found in:", self.field, self.value)?;
        for (path, kind) in &self.members {
            write!(f, "\n  - {} ({kind})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for DuplicateGroup {}

/// Group `entries` by `field` and return every group with more than one
/// member, ordered by key.
///
/// Normalization applies to the `url` field only; other fields such as
/// `github_repo` always compare exactly.
pub fn check_duplicates(
    entries: &[ValidatedEntry],
    field: &str,
    normalize: bool,
) -> Vec<DuplicateGroup> {
    let mut groups: BTreeMap<String, Vec<&ValidatedEntry>> = BTreeMap::new();
    for entry in entries {
        let Some(value) = entry.field(field) else {
            continue;
        };
        let key = if normalize && field == URL_FIELD {
            normalize_url(&value)
        } else {
            value
        };
        groups.entry(key).or_default().push(entry);
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(value, members)| DuplicateGroup {
            field: field.to_string(),
            value,
            members: members
                .into_iter()
                .map(|e| (e.path.clone(), e.kind))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Mapping;

    fn entry(path: &str, kind: RecordKind, yaml: &str) -> ValidatedEntry {
        let data: Mapping = serde_yaml::from_str(yaml).unwrap();
        ValidatedEntry::new(path, data, kind)
    }

    #[test]
    fn equivalent_urls_form_one_group() {
        let entries = vec![
            entry("a.yml", RecordKind::Agent, "url: http://EXAMPLE.com/a/\n"),
            entry("b.yml", RecordKind::Boilerplate, "url: https://example.com/a\n"),
            entry("c.yml", RecordKind::Agent, "url: https://other.dev\n"),
        ];

        let groups = check_duplicates(&entries, "url", true);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].value, "https://example.com/a");
        assert_eq!(
            groups[0].members,
            vec![
                (PathBuf::from("a.yml"), RecordKind::Agent),
                (PathBuf::from("b.yml"), RecordKind::Boilerplate),
            ]
        );
        assert_eq!(
            groups[0].to_string(),
            "ERROR Duplicate url 'https://example.com/a' found in:\n  - a.yml (agent)\n  - b.yml (boilerplate)"
        );
    }

    #[test]
    fn without_normalization_urls_compare_exactly() {
        let entries = vec![
            entry("a.yml", RecordKind::Agent, "url: http://example.com/\n"),
            entry("b.yml", RecordKind::Agent, "url: https://example.com\n"),
        ];
        assert!(check_duplicates(&entries, "url", false).is_empty());
    }

    #[test]
    fn repo_comparison_is_case_sensitive_even_when_normalizing() {
        let entries = vec![
            entry("a.yml", RecordKind::Agent, "github_repo: Owner/Repo\n"),
            entry("b.yml", RecordKind::Agent, "github_repo: owner/repo\n"),
        ];
        assert!(check_duplicates(&entries, "github_repo", true).is_empty());

        let same = vec![
            entry("a.yml", RecordKind::Agent, "github_repo: owner/repo\n"),
            entry("b.yml", RecordKind::Boilerplate, "github_repo: owner/repo\n"),
        ];
        assert_eq!(check_duplicates(&same, "github_repo", true).len(), 1);
    }

    #[test]
    fn missing_values_never_group() {
        let entries = vec![
            entry("a.yml", RecordKind::Agent, "name: a\n"),
            entry("b.yml", RecordKind::Agent, "github_repo: null\n"),
            entry("c.yml", RecordKind::Agent, "github_repo: ''\n"),
        ];
        assert!(check_duplicates(&entries, "github_repo", true).is_empty());
    }

    #[test]
    fn groups_are_ordered_by_key() {
        let entries = vec![
            entry("1.yml", RecordKind::Agent, "url: https://z.dev\n"),
            entry("2.yml", RecordKind::Agent, "url: https://a.dev\n"),
            entry("3.yml", RecordKind::Agent, "url: http://Z.dev\n"),
            entry("4.yml", RecordKind::Agent, "url: https://a.dev\n"),
        ];
        let groups = check_duplicates(&entries, "url", true);
        let keys: Vec<_> = groups.iter().map(|g| g.value.as_str()).collect();
        assert_eq!(keys, ["https://a.dev", "https://z.dev"]);
    }
}
