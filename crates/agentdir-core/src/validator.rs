//! File-level validation: read, parse, check against the kind's schema.

use serde_yaml::{Mapping, Value};
use std::path::{Path, PathBuf};

use crate::error::{Result, ValidationError};
use crate::kind::RecordKind;
use crate::schema::{normalized_mapping, validate_mapping, value_type_name, Record};

/// A successfully validated file, the unit of cross-file checks.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedEntry {
    pub path: PathBuf,
    /// Parsed mapping with tags normalized.
    pub data: Mapping,
    pub kind: RecordKind,
}

impl ValidatedEntry {
    pub fn new(path: impl Into<PathBuf>, data: Mapping, kind: RecordKind) -> Self {
        ValidatedEntry {
            path: path.into(),
            data,
            kind,
        }
    }

    /// Present, non-empty scalar value of `field` rendered as a string.
    pub fn field(&self, field: &str) -> Option<String> {
        scalar_field(&self.data, field)
    }
}

/// Present, non-empty scalar value of `field` in `data` as a string.
///
/// Null, empty strings, `false` and collections count as absent.
pub fn scalar_field(data: &Mapping, field: &str) -> Option<String> {
    match data.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Parse YAML text that must hold a single top-level mapping.
pub fn parse_document(text: &str) -> Result<Mapping> {
    let has_content = text.lines().any(|line| {
        let line = line.trim();
        !line.is_empty() && !line.starts_with('#')
    });
    if !has_content {
        return Err(ValidationError::empty());
    }

    let value: Value =
        serde_yaml::from_str(text).map_err(|e| ValidationError::Syntax(e.to_string()))?;
    match value {
        Value::Mapping(map) => Ok(map),
        Value::Null => Err(ValidationError::empty()),
        other => Err(ValidationError::not_mapping(value_type_name(&other))),
    }
}

/// Read and parse a YAML file into its top-level mapping.
pub fn load_yaml_file(path: &Path) -> Result<Mapping> {
    let text = std::fs::read_to_string(path)?;
    parse_document(&text)
}

/// Validate YAML text as a record of `kind`, returning the typed record
/// and the normalized mapping.
pub fn validate_text(text: &str, kind: RecordKind) -> Result<(Record, Mapping)> {
    let map = parse_document(text)?;
    let record = validate_mapping(&map, kind)?;
    let normalized = normalized_mapping(&map, &record);
    Ok((record, normalized))
}

/// Validate one file as a record of `kind`.
pub fn validate_file(path: &Path, kind: RecordKind) -> Result<ValidatedEntry> {
    let text = std::fs::read_to_string(path)?;
    let (_, data) = validate_text(&text, kind)?;
    Ok(ValidatedEntry::new(path, data, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const AGENT: &str = "\
name: CrewAI
url: https://github.com/crewAIInc/crewAI
description: Framework for orchestrating role-playing autonomous agents.
category: open-source-frameworks
tags: [Multi Agent]
";

    #[test]
    fn empty_and_comment_only_are_structure_errors() {
        assert!(parse_document("").unwrap_err().is_structure());
        assert!(parse_document("  \n\n").unwrap_err().is_structure());
        assert!(parse_document("# just a comment\n# another\n")
            .unwrap_err()
            .is_structure());
    }

    #[test]
    fn scalar_and_list_are_structure_errors() {
        let err = parse_document("- one\n- two\n").unwrap_err();
        assert!(err.is_structure());
        assert!(err.to_string().contains("must be a mapping"));
        assert!(parse_document("just a string\n").unwrap_err().is_structure());
    }

    #[test]
    fn malformed_yaml_is_syntax_error() {
        let err = parse_document("name: [unclosed\n").unwrap_err();
        assert!(err.is_syntax());
        assert!(err.to_string().starts_with("YAML syntax error"));
    }

    #[test]
    fn validate_text_returns_normalized_data() {
        let (record, data) = validate_text(AGENT, RecordKind::Agent).unwrap();
        assert_eq!(record.tags(), ["multi-agent".to_string()]);
        let entry = ValidatedEntry::new("a.yml", data, RecordKind::Agent);
        assert_eq!(entry.field("name").as_deref(), Some("CrewAI"));
        assert_eq!(entry.field("github_repo"), None);
    }

    #[test]
    fn validate_file_reads_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("crewai.yml");
        std::fs::write(&path, AGENT).unwrap();

        let entry = validate_file(&path, RecordKind::Agent).unwrap();
        assert_eq!(entry.path, path);
        assert_eq!(entry.kind, RecordKind::Agent);

        let missing = validate_file(&dir.path().join("missing.yml"), RecordKind::Agent);
        assert!(matches!(missing, Err(ValidationError::Io(_))));
    }

    #[test]
    fn field_skips_empty_and_null_values() {
        let data: Mapping = serde_yaml::from_str("url: ''\ngithub_repo: null\nstars: 5\n").unwrap();
        let entry = ValidatedEntry::new("x.yml", data, RecordKind::Agent);
        assert_eq!(entry.field("url"), None);
        assert_eq!(entry.field("github_repo"), None);
        assert_eq!(entry.field("stars").as_deref(), Some("5"));
        assert_eq!(entry.field("absent"), None);
    }
}
