//! Typed field access over a closed YAML mapping.

use chrono::NaiveDate;
use serde_yaml::{Mapping, Value};

use crate::error::{Result, SchemaViolation, ValidationError};
use crate::url_norm::is_http_url;

/// Reader over one record mapping.
///
/// Construction rejects keys outside `allowed`; accessors enforce the
/// per-field constraint and report violations under `prefix.field`.
pub(crate) struct Fields<'a> {
    map: &'a Mapping,
    prefix: String,
}

impl<'a> Fields<'a> {
    pub(crate) fn closed(map: &'a Mapping, allowed: &[&str]) -> Result<Self> {
        Self::closed_at(map, allowed, String::new())
    }

    pub(crate) fn closed_at(map: &'a Mapping, allowed: &[&str], prefix: String) -> Result<Self> {
        let fields = Fields { map, prefix };
        for key in map.keys() {
            match key.as_str() {
                Some(name) if allowed.contains(&name) => {}
                Some(name) => {
                    return Err(ValidationError::schema(
                        fields.path(name),
                        SchemaViolation::UnknownField,
                    ))
                }
                None => {
                    return Err(ValidationError::schema(
                        fields.path(&describe_key(key)),
                        SchemaViolation::UnknownField,
                    ))
                }
            }
        }
        Ok(fields)
    }

    fn path(&self, name: &str) -> String {
        if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.prefix, name)
        }
    }

    fn err(&self, name: &str, violation: SchemaViolation) -> ValidationError {
        ValidationError::schema(self.path(name), violation)
    }

    /// Present, non-null value for `name`.
    fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|v| !v.is_null())
    }

    pub(crate) fn required_str(&self, name: &str, min: usize, max: Option<usize>) -> Result<String> {
        match self.optional_str(name, min, max)? {
            Some(s) => Ok(s),
            None => Err(self.err(name, SchemaViolation::Missing)),
        }
    }

    pub(crate) fn optional_str(
        &self,
        name: &str,
        min: usize,
        max: Option<usize>,
    ) -> Result<Option<String>> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let s = value.as_str().ok_or_else(|| {
            self.err(name, SchemaViolation::InvalidType { expected: "a string" })
        })?;
        let len = s.chars().count();
        if len < min {
            return Err(self.err(name, SchemaViolation::TooShort { min }));
        }
        if let Some(max) = max {
            if len > max {
                return Err(self.err(name, SchemaViolation::TooLong { max }));
            }
        }
        Ok(Some(s.to_string()))
    }

    pub(crate) fn required_url(&self, name: &str) -> Result<String> {
        match self.optional_url(name)? {
            Some(s) => Ok(s),
            None => Err(self.err(name, SchemaViolation::Missing)),
        }
    }

    pub(crate) fn optional_url(&self, name: &str) -> Result<Option<String>> {
        let Some(url) = self.optional_str(name, 0, None)? else {
            return Ok(None);
        };
        if !is_http_url(&url) {
            return Err(self.err(name, SchemaViolation::InvalidUrl));
        }
        Ok(Some(url))
    }

    /// `owner/repo` with exactly one separator and both halves non-empty.
    pub(crate) fn optional_repo(&self, name: &str) -> Result<Option<String>> {
        let Some(repo) = self.optional_str(name, 0, None)? else {
            return Ok(None);
        };
        let mut halves = repo.split('/');
        let valid = matches!(
            (halves.next(), halves.next(), halves.next()),
            (Some(owner), Some(repo_name), None) if !owner.is_empty() && !repo_name.is_empty()
        );
        if !valid {
            return Err(self.err(
                name,
                SchemaViolation::Pattern {
                    pattern: "'owner/repo'",
                },
            ));
        }
        Ok(Some(repo))
    }

    pub(crate) fn optional_str_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        let Some(value) = self.get(name) else {
            return Ok(None);
        };
        let items = value.as_sequence().ok_or_else(|| {
            self.err(name, SchemaViolation::InvalidType { expected: "a list of strings" })
        })?;
        items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    self.err(
                        &format!("{name}[{i}]"),
                        SchemaViolation::InvalidType { expected: "a string" },
                    )
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub(crate) fn str_list(&self, name: &str) -> Result<Vec<String>> {
        Ok(self.optional_str_list(name)?.unwrap_or_default())
    }

    /// Sequence of nested mappings, each handed to `item` with its index path.
    pub(crate) fn mapping_list<T>(
        &self,
        name: &str,
        item: impl Fn(&Mapping, String) -> Result<T>,
    ) -> Result<Vec<T>> {
        let Some(value) = self.get(name) else {
            return Ok(Vec::new());
        };
        let items = value.as_sequence().ok_or_else(|| {
            self.err(name, SchemaViolation::InvalidType { expected: "a list" })
        })?;
        items
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let path = self.path(&format!("{name}[{i}]"));
                match entry.as_mapping() {
                    Some(map) => item(map, path),
                    None => Err(ValidationError::schema(
                        path,
                        SchemaViolation::InvalidType { expected: "a mapping" },
                    )),
                }
            })
            .collect()
    }

    pub(crate) fn bool_or(&self, name: &str, default: bool) -> Result<bool> {
        match self.get(name) {
            None => Ok(default),
            Some(v) => v.as_bool().ok_or_else(|| {
                self.err(name, SchemaViolation::InvalidType { expected: "a boolean" })
            }),
        }
    }

    pub(crate) fn optional_int(&self, name: &str) -> Result<Option<i64>> {
        match self.get(name) {
            None => Ok(None),
            Some(v) => v.as_i64().map(Some).ok_or_else(|| {
                self.err(name, SchemaViolation::InvalidType { expected: "an integer" })
            }),
        }
    }

    pub(crate) fn int_or(&self, name: &str, default: i64) -> Result<i64> {
        Ok(self.optional_int(name)?.unwrap_or(default))
    }

    pub(crate) fn optional_date(&self, name: &str) -> Result<Option<NaiveDate>> {
        let Some(raw) = self.optional_str(name, 0, None)? else {
            return Ok(None);
        };
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| self.err(name, SchemaViolation::InvalidDate))
    }

    /// Value drawn from a fixed set, parsed by `parse`.
    pub(crate) fn optional_choice<T>(
        &self,
        name: &str,
        allowed: &'static [&'static str],
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<Option<T>> {
        let Some(raw) = self.optional_str(name, 0, None)? else {
            return Ok(None);
        };
        if !allowed.contains(&raw.as_str()) {
            return Err(self.err(name, SchemaViolation::NotOneOf { allowed }));
        }
        parse(&raw)
            .map(Some)
            .ok_or_else(|| self.err(name, SchemaViolation::NotOneOf { allowed }))
    }
}

fn describe_key(key: &Value) -> String {
    match key {
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => "<non-string key>".to_string(),
    }
}

/// Lower-case a tag and turn spaces into hyphens. Idempotent.
pub fn normalize_tag(tag: &str) -> String {
    tag.to_lowercase().replace(' ', "-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn unknown_key_rejected() {
        let map = mapping("name: x\nbogus: 1\n");
        let err = Fields::closed(&map, &["name"]).err().unwrap();
        assert_eq!(err.field(), Some("bogus"));
    }

    #[test]
    fn null_counts_as_absent() {
        let map = mapping("license: null\n");
        let fields = Fields::closed(&map, &["license"]).unwrap();
        assert_eq!(fields.optional_str("license", 0, None).unwrap(), None);
    }

    #[test]
    fn lengths_are_counted_in_chars() {
        let map = mapping("name: \"ééé\"\n");
        let fields = Fields::closed(&map, &["name"]).unwrap();
        assert!(fields.required_str("name", 1, Some(3)).is_ok());
        assert!(fields.required_str("name", 1, Some(2)).is_err());
    }

    #[test]
    fn repo_requires_exactly_one_slash() {
        for (repo, ok) in [
            ("owner/repo", true),
            ("ownerrepo", false),
            ("a/b/c", false),
            ("/repo", false),
            ("owner/", false),
        ] {
            let map = mapping(&format!("github_repo: \"{repo}\"\n"));
            let fields = Fields::closed(&map, &["github_repo"]).unwrap();
            assert_eq!(fields.optional_repo("github_repo").is_ok(), ok, "{repo}");
        }
    }

    #[test]
    fn nested_paths_carry_prefix() {
        let map = mapping("component: x\nextra: y\n");
        let err = Fields::closed_at(&map, &["component"], "technical_stack[0]".to_string())
            .err()
            .unwrap();
        assert_eq!(err.field(), Some("technical_stack[0].extra"));
    }

    #[test]
    fn tag_normalization_is_idempotent() {
        let once = normalize_tag("Multi Agent");
        assert_eq!(once, "multi-agent");
        assert_eq!(normalize_tag(&once), once);
    }

    #[test]
    fn dates_must_be_iso() {
        let map = mapping("added_date: \"2024-02-30\"\n");
        let fields = Fields::closed(&map, &["added_date"]).unwrap();
        assert!(fields.optional_date("added_date").is_err());
    }
}
