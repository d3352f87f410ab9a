//! Agent and boilerplate entry schemas.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use super::fields::{normalize_tag, Fields};
use crate::error::Result;

const AGENT_FIELDS: &[&str] = &[
    "name",
    "url",
    "description",
    "category",
    "subcategory",
    "type",
    "tags",
    "github_repo",
    "documentation_url",
    "demo_url",
    "platform",
    "license",
    "pricing",
    "github_stars",
    "last_updated",
    "is_archived",
    "featured",
    "verified",
    "added_date",
    "last_verified",
];

const BOILERPLATE_FIELDS: &[&str] = &[
    "name",
    "url",
    "description",
    "category",
    "type",
    "tags",
    "github_repo",
    "documentation_url",
    "demo_url",
    "technical_stack",
    "platform",
    "license",
    "pricing",
    "github_stars",
    "last_updated",
    "is_archived",
    "key_features",
    "use_case",
    "pros",
    "cons",
    "community",
    "deployment",
    "featured",
    "verified",
    "added_date",
    "last_verified",
];

const TECH_STACK_FIELDS: &[&str] = &["component", "technology", "reasoning"];

const AGENT_TYPES: &[&str] = &[
    "framework",
    "platform",
    "tool",
    "course",
    "community",
    "research",
];
const BOILERPLATE_TYPES: &[&str] = &["starter", "boilerplate", "template", "scaffold", "toolkit"];
const AGENT_PRICING: &[&str] = &["free", "freemium", "paid", "enterprise"];
const BOILERPLATE_PRICING: &[&str] = &["free", "freemium", "paid", "enterprise", "open-core"];

/// What an agent entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    #[default]
    Framework,
    Platform,
    Tool,
    Course,
    Community,
    Research,
}

impl AgentType {
    fn from_label(s: &str) -> Option<Self> {
        Some(match s {
            "framework" => AgentType::Framework,
            "platform" => AgentType::Platform,
            "tool" => AgentType::Tool,
            "course" => AgentType::Course,
            "community" => AgentType::Community,
            "research" => AgentType::Research,
            _ => return None,
        })
    }
}

/// What a boilerplate entry provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoilerplateType {
    Starter,
    #[default]
    Boilerplate,
    Template,
    Scaffold,
    Toolkit,
}

impl BoilerplateType {
    fn from_label(s: &str) -> Option<Self> {
        Some(match s {
            "starter" => BoilerplateType::Starter,
            "boilerplate" => BoilerplateType::Boilerplate,
            "template" => BoilerplateType::Template,
            "scaffold" => BoilerplateType::Scaffold,
            "toolkit" => BoilerplateType::Toolkit,
            _ => return None,
        })
    }
}

/// Pricing model. `OpenCore` is only accepted on boilerplates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pricing {
    Free,
    Freemium,
    Paid,
    Enterprise,
    OpenCore,
}

impl Pricing {
    fn from_label(s: &str) -> Option<Self> {
        Some(match s {
            "free" => Pricing::Free,
            "freemium" => Pricing::Freemium,
            "paid" => Pricing::Paid,
            "enterprise" => Pricing::Enterprise,
            "open-core" => Pricing::OpenCore,
            _ => return None,
        })
    }
}

/// A single agent, tool or platform listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentEntry {
    pub name: String,
    pub url: String,
    pub description: String,
    pub category: String,
    pub subcategory: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: AgentType,
    pub tags: Vec<String>,
    pub github_repo: Option<String>,
    pub documentation_url: Option<String>,
    pub demo_url: Option<String>,
    pub platform: Option<Vec<String>>,
    pub license: Option<String>,
    pub pricing: Option<Pricing>,
    pub github_stars: Option<i64>,
    pub last_updated: Option<NaiveDate>,
    pub is_archived: bool,
    pub featured: bool,
    pub verified: bool,
    pub added_date: Option<NaiveDate>,
    pub last_verified: Option<NaiveDate>,
}

impl AgentEntry {
    pub(crate) fn from_mapping(map: &Mapping) -> Result<Self> {
        let f = Fields::closed(map, AGENT_FIELDS)?;
        Ok(AgentEntry {
            name: f.required_str("name", 1, Some(100))?,
            url: f.required_url("url")?,
            description: f.required_str("description", 20, Some(1000))?,
            category: f.required_str("category", 1, None)?,
            subcategory: f.optional_str("subcategory", 0, None)?,
            entry_type: f
                .optional_choice("type", AGENT_TYPES, AgentType::from_label)?
                .unwrap_or_default(),
            tags: f.str_list("tags")?.iter().map(|t| normalize_tag(t)).collect(),
            github_repo: f.optional_repo("github_repo")?,
            documentation_url: f.optional_url("documentation_url")?,
            demo_url: f.optional_url("demo_url")?,
            platform: f.optional_str_list("platform")?,
            license: f.optional_str("license", 0, None)?,
            pricing: f.optional_choice("pricing", AGENT_PRICING, Pricing::from_label)?,
            github_stars: f.optional_int("github_stars")?,
            last_updated: f.optional_date("last_updated")?,
            is_archived: f.bool_or("is_archived", false)?,
            featured: f.bool_or("featured", false)?,
            verified: f.bool_or("verified", false)?,
            added_date: f.optional_date("added_date")?,
            last_verified: f.optional_date("last_verified")?,
        })
    }
}

/// One technology in a boilerplate's stack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechStackComponent {
    pub component: String,
    pub technology: String,
    pub reasoning: Option<String>,
}

impl TechStackComponent {
    fn from_mapping(map: &Mapping, path: String) -> Result<Self> {
        let f = Fields::closed_at(map, TECH_STACK_FIELDS, path)?;
        Ok(TechStackComponent {
            component: f.required_str("component", 1, Some(50))?,
            technology: f.required_str("technology", 1, Some(100))?,
            reasoning: f.optional_str("reasoning", 0, Some(500))?,
        })
    }
}

/// A starter kit or project template listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoilerplateEntry {
    pub name: String,
    pub url: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub entry_type: BoilerplateType,
    pub tags: Vec<String>,
    pub github_repo: Option<String>,
    pub documentation_url: Option<String>,
    pub demo_url: Option<String>,
    pub technical_stack: Vec<TechStackComponent>,
    pub platform: Option<Vec<String>>,
    pub license: Option<String>,
    pub pricing: Option<Pricing>,
    pub github_stars: Option<i64>,
    pub last_updated: Option<NaiveDate>,
    pub is_archived: bool,
    pub key_features: Option<Vec<String>>,
    pub use_case: Option<String>,
    pub pros: Option<Vec<String>>,
    pub cons: Option<Vec<String>>,
    pub community: Option<String>,
    pub deployment: Option<Vec<String>>,
    pub featured: bool,
    pub verified: bool,
    pub added_date: Option<NaiveDate>,
    pub last_verified: Option<NaiveDate>,
}

impl BoilerplateEntry {
    pub(crate) fn from_mapping(map: &Mapping) -> Result<Self> {
        let f = Fields::closed(map, BOILERPLATE_FIELDS)?;
        Ok(BoilerplateEntry {
            name: f.required_str("name", 1, Some(100))?,
            url: f.required_url("url")?,
            description: f.required_str("description", 20, Some(2000))?,
            category: f.required_str("category", 1, None)?,
            entry_type: f
                .optional_choice("type", BOILERPLATE_TYPES, BoilerplateType::from_label)?
                .unwrap_or_default(),
            tags: f.str_list("tags")?.iter().map(|t| normalize_tag(t)).collect(),
            github_repo: f.optional_repo("github_repo")?,
            documentation_url: f.optional_url("documentation_url")?,
            demo_url: f.optional_url("demo_url")?,
            technical_stack: f.mapping_list("technical_stack", TechStackComponent::from_mapping)?,
            platform: f.optional_str_list("platform")?,
            license: f.optional_str("license", 0, None)?,
            pricing: f.optional_choice("pricing", BOILERPLATE_PRICING, Pricing::from_label)?,
            github_stars: f.optional_int("github_stars")?,
            last_updated: f.optional_date("last_updated")?,
            is_archived: f.bool_or("is_archived", false)?,
            key_features: f.optional_str_list("key_features")?,
            use_case: f.optional_str("use_case", 0, Some(1000))?,
            pros: f.optional_str_list("pros")?,
            cons: f.optional_str_list("cons")?,
            community: f.optional_str("community", 0, Some(500))?,
            deployment: f.optional_str_list("deployment")?,
            featured: f.bool_or("featured", false)?,
            verified: f.bool_or("verified", false)?,
            added_date: f.optional_date("added_date")?,
            last_verified: f.optional_date("last_verified")?,
        })
    }
}
