//! Record schemas for the four directory kinds.
//!
//! Each kind has an explicit validator that walks the YAML mapping field by
//! field and either yields a typed record or a `ValidationError::Schema`
//! naming the offending field. Schemas are closed: unknown keys fail.

mod categories;
mod entries;
mod fields;

pub use categories::{BoilerplateCategory, Category};
pub use entries::{AgentEntry, AgentType, BoilerplateEntry, BoilerplateType, Pricing, TechStackComponent};
pub use fields::normalize_tag;

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::{Result, ValidationError};
use crate::kind::RecordKind;

/// A validated record of any kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Agent(AgentEntry),
    Category(Category),
    Boilerplate(BoilerplateEntry),
    BoilerplateCategory(BoilerplateCategory),
}

impl Record {
    pub fn kind(&self) -> RecordKind {
        match self {
            Record::Agent(_) => RecordKind::Agent,
            Record::Category(_) => RecordKind::Category,
            Record::Boilerplate(_) => RecordKind::Boilerplate,
            Record::BoilerplateCategory(_) => RecordKind::BoilerplateCategory,
        }
    }

    /// Normalized tags; empty for category kinds.
    pub fn tags(&self) -> &[String] {
        match self {
            Record::Agent(a) => &a.tags,
            Record::Boilerplate(b) => &b.tags,
            _ => &[],
        }
    }

    /// Category id referenced by an entry.
    pub fn category_ref(&self) -> Option<&str> {
        match self {
            Record::Agent(a) => Some(&a.category),
            Record::Boilerplate(b) => Some(&b.category),
            _ => None,
        }
    }

    /// Identifier of a category record.
    pub fn category_id(&self) -> Option<&str> {
        match self {
            Record::Category(c) => Some(&c.id),
            Record::BoilerplateCategory(c) => Some(&c.id),
            _ => None,
        }
    }
}

/// Validate an already-parsed YAML value as a record of `kind`.
pub fn validate_value(value: &Value, kind: RecordKind) -> Result<Record> {
    match value {
        Value::Null => Err(ValidationError::empty()),
        Value::Mapping(map) => validate_mapping(map, kind),
        other => Err(ValidationError::not_mapping(value_type_name(other))),
    }
}

/// Validate a YAML mapping as a record of `kind`.
pub fn validate_mapping(map: &Mapping, kind: RecordKind) -> Result<Record> {
    Ok(match kind {
        RecordKind::Agent => Record::Agent(AgentEntry::from_mapping(map)?),
        RecordKind::Category => Record::Category(Category::from_mapping(map)?),
        RecordKind::Boilerplate => Record::Boilerplate(BoilerplateEntry::from_mapping(map)?),
        RecordKind::BoilerplateCategory => {
            Record::BoilerplateCategory(BoilerplateCategory::from_mapping(map)?)
        }
    })
}

/// Copy of `map` with the `tags` sequence replaced by the record's
/// normalized tags.
pub fn normalized_mapping(map: &Mapping, record: &Record) -> Mapping {
    let mut out = map.clone();
    if matches!(out.get("tags"), Some(Value::Sequence(_))) {
        let tags = record
            .tags()
            .iter()
            .map(|t| Value::String(t.clone()))
            .collect();
        out.insert(Value::String("tags".to_string()), Value::Sequence(tags));
    }
    out
}

pub(crate) fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SchemaViolation;

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    const AGENT: &str = "\
name: LangChain
url: https://github.com/langchain-ai/langchain
description: Framework for building applications with large language models.
category: open-source-frameworks
";

    const BOILERPLATE: &str = "\
name: Next SaaS Starter
url: https://github.com/example/next-saas
description: Production ready SaaS starter kit with auth and billing.
category: javascript
";

    const CATEGORY: &str = "\
id: open-source-frameworks
title: Open Source Frameworks
description: Frameworks for building agents.
";

    fn schema_field(err: ValidationError) -> (String, SchemaViolation) {
        match err {
            ValidationError::Schema { field, violation } => (field, violation),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn minimal_agent_is_valid_with_defaults() {
        let record = validate_value(&yaml(AGENT), RecordKind::Agent).unwrap();
        let Record::Agent(agent) = record else {
            panic!("expected agent")
        };
        assert_eq!(agent.name, "LangChain");
        assert_eq!(agent.entry_type, AgentType::Framework);
        assert!(agent.tags.is_empty());
        assert!(!agent.featured);
    }

    #[test]
    fn full_agent_fields_parse() {
        let text = format!(
            "{AGENT}type: tool\ntags: [Multi Agent, RAG]\ngithub_repo: langchain-ai/langchain\n\
             documentation_url: https://docs.langchain.com\npricing: freemium\ngithub_stars: 90000\n\
             last_updated: 2024-06-01\nplatform: [Python, TypeScript]\nverified: true\n"
        );
        let Record::Agent(agent) = validate_value(&yaml(&text), RecordKind::Agent).unwrap() else {
            panic!("expected agent")
        };
        assert_eq!(agent.entry_type, AgentType::Tool);
        assert_eq!(agent.tags, vec!["multi-agent", "rag"]);
        assert_eq!(agent.pricing, Some(Pricing::Freemium));
        assert_eq!(agent.github_stars, Some(90000));
        assert!(agent.last_updated.is_some());
        assert!(agent.verified);
    }

    #[test]
    fn missing_required_field_names_field() {
        for field in ["name", "url", "description", "category"] {
            let text: String = AGENT
                .lines()
                .filter(|l| !l.starts_with(&format!("{field}:")))
                .map(|l| format!("{l}\n"))
                .collect();
            let err = validate_value(&yaml(&text), RecordKind::Agent).unwrap_err();
            let (name, violation) = schema_field(err);
            assert_eq!(name, field);
            assert_eq!(violation, SchemaViolation::Missing);
        }
    }

    #[test]
    fn description_bounds_differ_by_kind() {
        let long = "x".repeat(1500);
        let agent = AGENT.replace(
            "Framework for building applications with large language models.",
            &long,
        );
        let (field, violation) =
            schema_field(validate_value(&yaml(&agent), RecordKind::Agent).unwrap_err());
        assert_eq!(field, "description");
        assert_eq!(violation, SchemaViolation::TooLong { max: 1000 });

        let boilerplate = BOILERPLATE.replace(
            "Production ready SaaS starter kit with auth and billing.",
            &long,
        );
        assert!(validate_value(&yaml(&boilerplate), RecordKind::Boilerplate).is_ok());

        let short = AGENT.replace(
            "Framework for building applications with large language models.",
            "Too short",
        );
        let (_, violation) =
            schema_field(validate_value(&yaml(&short), RecordKind::Agent).unwrap_err());
        assert_eq!(violation, SchemaViolation::TooShort { min: 20 });
    }

    #[test]
    fn exact_length_bounds_pass() {
        let text = AGENT.replace(
            "Framework for building applications with large language models.",
            &"d".repeat(20),
        );
        assert!(validate_value(&yaml(&text), RecordKind::Agent).is_ok());
        let text = AGENT.replace("LangChain", &"n".repeat(100));
        assert!(validate_value(&yaml(&text), RecordKind::Agent).is_ok());
        let text = AGENT.replace("LangChain", &"n".repeat(101));
        assert!(validate_value(&yaml(&text), RecordKind::Agent).is_err());
    }

    #[test]
    fn invalid_url_rejected() {
        let text = AGENT.replace("https://github.com/langchain-ai/langchain", "not-a-url");
        let (field, violation) =
            schema_field(validate_value(&yaml(&text), RecordKind::Agent).unwrap_err());
        assert_eq!(field, "url");
        assert_eq!(violation, SchemaViolation::InvalidUrl);
    }

    #[test]
    fn github_repo_pattern_enforced() {
        let text = format!("{AGENT}github_repo: langchain\n");
        let (field, _) = schema_field(validate_value(&yaml(&text), RecordKind::Agent).unwrap_err());
        assert_eq!(field, "github_repo");
    }

    #[test]
    fn enum_membership_enforced() {
        let text = format!("{AGENT}type: widget\n");
        let (field, violation) =
            schema_field(validate_value(&yaml(&text), RecordKind::Agent).unwrap_err());
        assert_eq!(field, "type");
        assert!(matches!(violation, SchemaViolation::NotOneOf { .. }));

        // open-core is a boilerplate-only pricing model
        let agent = format!("{AGENT}pricing: open-core\n");
        assert!(validate_value(&yaml(&agent), RecordKind::Agent).is_err());
        let boilerplate = format!("{BOILERPLATE}pricing: open-core\n");
        assert!(validate_value(&yaml(&boilerplate), RecordKind::Boilerplate).is_ok());
    }

    #[test]
    fn unknown_field_rejected() {
        let text = format!("{AGENT}stars: 10\n");
        let (field, violation) =
            schema_field(validate_value(&yaml(&text), RecordKind::Agent).unwrap_err());
        assert_eq!(field, "stars");
        assert_eq!(violation, SchemaViolation::UnknownField);

        // subcategory exists on agents only
        let text = format!("{BOILERPLATE}subcategory: web\n");
        assert!(validate_value(&yaml(&text), RecordKind::Boilerplate).is_err());
    }

    #[test]
    fn technical_stack_errors_carry_index_path() {
        let text = format!(
            "{BOILERPLATE}technical_stack:\n  - component: Frontend\n    technology: Next.js\n  - component: {}\n    technology: Postgres\n",
            "c".repeat(51)
        );
        let (field, violation) =
            schema_field(validate_value(&yaml(&text), RecordKind::Boilerplate).unwrap_err());
        assert_eq!(field, "technical_stack[1].component");
        assert_eq!(violation, SchemaViolation::TooLong { max: 50 });
    }

    #[test]
    fn category_defaults_applied() {
        let Record::Category(cat) = validate_value(&yaml(CATEGORY), RecordKind::Category).unwrap()
        else {
            panic!("expected category")
        };
        assert_eq!(cat.order, 0);
        assert_eq!(cat.emoji, "📦");
        assert!(cat.show_github_stats);
        assert_eq!(cat.table_columns, vec!["name", "url", "description"]);
    }

    #[test]
    fn boilerplate_category_requires_ecosystem() {
        let (field, violation) = schema_field(
            validate_value(&yaml(CATEGORY), RecordKind::BoilerplateCategory).unwrap_err(),
        );
        assert_eq!(field, "ecosystem");
        assert_eq!(violation, SchemaViolation::Missing);

        let text = format!("{CATEGORY}ecosystem: Rust\norder: 3\n");
        let record = validate_value(&yaml(&text), RecordKind::BoilerplateCategory).unwrap();
        assert_eq!(record.category_id(), Some("open-source-frameworks"));
    }

    #[test]
    fn non_mapping_is_structure_error() {
        let err = validate_value(&yaml("- a\n- b\n"), RecordKind::Agent).unwrap_err();
        assert!(err.is_structure());
        assert!(err.to_string().contains("must be a mapping"));
        assert!(validate_value(&Value::Null, RecordKind::Agent)
            .unwrap_err()
            .is_structure());
    }

    #[test]
    fn normalized_mapping_rewrites_tags_only() {
        let map: Mapping = serde_yaml::from_str(&format!("{AGENT}tags: [Multi Agent]\n")).unwrap();
        let record = validate_mapping(&map, RecordKind::Agent).unwrap();
        let normalized = normalized_mapping(&map, &record);
        assert_eq!(
            normalized.get("tags"),
            Some(&yaml("[multi-agent]"))
        );
        assert_eq!(normalized.get("name"), map.get("name"));

        // already-normalized input is unchanged
        let again = validate_mapping(&normalized, RecordKind::Agent).unwrap();
        assert_eq!(normalized_mapping(&normalized, &again), normalized);
    }
}
