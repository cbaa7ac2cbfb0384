//! Static catalogs: the fixed author directory and the priority levels.
//!
//! Both are known at process start and never change at runtime. Clients
//! select authors by display name; notes store the author id.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

/// An entry in the author directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Author {
    pub id: &'static str,
    pub name: &'static str,
}

/// The fixed author directory.
pub const AUTHORS: &[Author] = &[
    Author {
        id: "user01",
        name: "User 1",
    },
    Author {
        id: "user02",
        name: "User 2",
    },
    Author {
        id: "user03",
        name: "User 3",
    },
    Author {
        id: "user04",
        name: "User 4",
    },
];

/// Look up an author id by exact display name.
pub fn author_id_for_name(name: &str) -> Result<&'static str, CoreError> {
    AUTHORS
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.id)
        .ok_or_else(|| CoreError::UnknownAuthor(name.to_string()))
}

/// Translate a list of display names into author ids, failing on the first
/// name that is not in the directory.
pub fn translate_author_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>, CoreError> {
    names
        .iter()
        .map(|n| author_id_for_name(n.as_ref()).map(str::to_string))
        .collect()
}

/// Whether `id` references a known author.
pub fn is_known_author_id(id: &str) -> bool {
    AUTHORS.iter().any(|a| a.id == id)
}

// ---------------------------------------------------------------------------
// Priorities
// ---------------------------------------------------------------------------

/// Note priority. Serialized as its label (`"High"`, `"Medium"`, `"Low"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// All priorities, highest first.
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }

    /// Parse an exact label.
    pub fn from_label(label: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == label)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid priority '{label}'. Must be one of: {}",
                    priority_labels().join(", ")
                ))
            })
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Priority labels in catalog order, as exposed to clients.
pub fn priority_labels() -> Vec<&'static str> {
    Priority::ALL.iter().map(|p| p.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
