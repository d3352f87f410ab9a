//! Category and boilerplate-category schemas.

use serde::{Deserialize, Serialize};
use serde_yaml::Mapping;

use super::fields::Fields;
use crate::error::Result;

const CATEGORY_FIELDS: &[&str] = &[
    "id",
    "title",
    "emoji",
    "description",
    "order",
    "parent",
    "show_github_stats",
    "table_columns",
];

const BOILERPLATE_CATEGORY_FIELDS: &[&str] = &[
    "id",
    "title",
    "emoji",
    "description",
    "ecosystem",
    "order",
    "show_github_stats",
    "table_columns",
];

const DEFAULT_EMOJI: &str = "📦";

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// A section of the agent directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub emoji: String,
    pub description: String,
    /// Display order, lower first.
    pub order: i64,
    pub parent: Option<String>,
    pub show_github_stats: bool,
    pub table_columns: Vec<String>,
}

impl Category {
    pub(crate) fn from_mapping(map: &Mapping) -> Result<Self> {
        let f = Fields::closed(map, CATEGORY_FIELDS)?;
        Ok(Category {
            id: f.required_str("id", 0, None)?,
            title: f.required_str("title", 0, None)?,
            emoji: f
                .optional_str("emoji", 0, None)?
                .unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
            description: f.required_str("description", 10, Some(500))?,
            order: f.int_or("order", 0)?,
            parent: f.optional_str("parent", 0, None)?,
            show_github_stats: f.bool_or("show_github_stats", true)?,
            table_columns: f
                .optional_str_list("table_columns")?
                .unwrap_or_else(|| columns(&["name", "url", "description"])),
        })
    }
}

/// A language or framework ecosystem grouping boilerplates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoilerplateCategory {
    pub id: String,
    pub title: String,
    pub emoji: String,
    pub description: String,
    pub ecosystem: String,
    pub order: i64,
    pub show_github_stats: bool,
    pub table_columns: Vec<String>,
}

impl BoilerplateCategory {
    pub(crate) fn from_mapping(map: &Mapping) -> Result<Self> {
        let f = Fields::closed(map, BOILERPLATE_CATEGORY_FIELDS)?;
        Ok(BoilerplateCategory {
            id: f.required_str("id", 0, None)?,
            title: f.required_str("title", 0, None)?,
            emoji: f
                .optional_str("emoji", 0, None)?
                .unwrap_or_else(|| DEFAULT_EMOJI.to_string()),
            description: f.required_str("description", 10, Some(500))?,
            ecosystem: f.required_str("ecosystem", 0, None)?,
            order: f.int_or("order", 0)?,
            show_github_stats: f.bool_or("show_github_stats", true)?,
            table_columns: f
                .optional_str_list("table_columns")?
                .unwrap_or_else(|| columns(&["name", "url", "description", "github_stars"])),
        })
    }
}
