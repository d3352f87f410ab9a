//! Record kinds and their storage directories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Discriminant for a record's schema and storage location.
///
/// Ordering follows the order in which a validation run processes kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    Agent,
    Category,
    Boilerplate,
    BoilerplateCategory,
}

impl RecordKind {
    pub const ALL: [RecordKind; 4] = [
        RecordKind::Agent,
        RecordKind::Category,
        RecordKind::Boilerplate,
        RecordKind::BoilerplateCategory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Agent => "agent",
            RecordKind::Category => "category",
            RecordKind::Boilerplate => "boilerplate",
            RecordKind::BoilerplateCategory => "boilerplate-category",
        }
    }

    /// Top-level directory under the data root holding this kind.
    pub fn dir_name(&self) -> &'static str {
        match self {
            RecordKind::Agent => "agents",
            RecordKind::Category => "categories",
            RecordKind::Boilerplate => "boilerplates",
            RecordKind::BoilerplateCategory => "boilerplate-categories",
        }
    }

    pub fn from_dir_name(name: &str) -> Option<Self> {
        RecordKind::ALL.into_iter().find(|k| k.dir_name() == name)
    }

    /// Whether files of this kind are discovered recursively.
    pub fn is_nested(&self) -> bool {
        matches!(self, RecordKind::Agent | RecordKind::Boilerplate)
    }

    /// Category kind that entries of this kind reference, if any.
    pub fn category_kind(&self) -> Option<RecordKind> {
        match self {
            RecordKind::Agent => Some(RecordKind::Category),
            RecordKind::Boilerplate => Some(RecordKind::BoilerplateCategory),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_names_round_trip() {
        for kind in RecordKind::ALL {
            assert_eq!(RecordKind::from_dir_name(kind.dir_name()), Some(kind));
        }
        assert_eq!(RecordKind::from_dir_name("other"), None);
    }

    #[test]
    fn entries_reference_their_category_kind() {
        assert_eq!(RecordKind::Agent.category_kind(), Some(RecordKind::Category));
        assert_eq!(
            RecordKind::Boilerplate.category_kind(),
            Some(RecordKind::BoilerplateCategory)
        );
        assert_eq!(RecordKind::Category.category_kind(), None);
    }
}
