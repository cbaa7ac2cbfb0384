//! Filter/sort engine.
//!
//! A [`FilterRequest`] arrives with human-readable selections (author
//! display names, priority labels, a sort label). [`NoteFilter::resolve`]
//! translates it into ids and typed values; [`NoteFilter::apply`] runs the
//! membership predicate, the comparator and the limit over a candidate set.
//! Stores use the same [`NoteFilter`] to build their queries so the HTTP
//! query path and the broadcast path agree on ordering.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::catalog::{translate_author_names, Priority};
use crate::error::CoreError;
use crate::note::Note;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Check a user-provided limit. `0` selects nothing; negatives are rejected.
pub fn checked_limit(limit: i64) -> Result<usize, CoreError> {
    usize::try_from(limit)
        .map_err(|_| CoreError::Validation(format!("limit must not be negative, got {limit}")))
}

// ---------------------------------------------------------------------------
// Sort modes
// ---------------------------------------------------------------------------

pub const SORT_ALPHABETICAL: &str = "Alphabetical Order";
pub const SORT_CREATED_AT: &str = "Created At";
pub const SORT_UPDATED_AT: &str = "Updated At";

/// How a result set is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Ascending on the note body.
    Alphabetical,
    /// Most recently created first.
    CreatedAt,
    /// Most recently updated first.
    UpdatedAt,
    /// No mode requested. Orders like [`SortMode::UpdatedAt`].
    #[default]
    Unspecified,
}

impl SortMode {
    /// Selectable modes, in the order clients list them.
    pub const OPTIONS: [SortMode; 3] = [
        SortMode::Alphabetical,
        SortMode::CreatedAt,
        SortMode::UpdatedAt,
    ];

    /// Parse a sort label. Missing or unrecognized labels yield
    /// [`SortMode::Unspecified`].
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(SORT_ALPHABETICAL) => SortMode::Alphabetical,
            Some(SORT_CREATED_AT) => SortMode::CreatedAt,
            Some(SORT_UPDATED_AT) => SortMode::UpdatedAt,
            _ => SortMode::Unspecified,
        }
    }

    pub fn label(self) -> Option<&'static str> {
        match self {
            SortMode::Alphabetical => Some(SORT_ALPHABETICAL),
            SortMode::CreatedAt => Some(SORT_CREATED_AT),
            SortMode::UpdatedAt => Some(SORT_UPDATED_AT),
            SortMode::Unspecified => None,
        }
    }

    pub fn compare(self, a: &Note, b: &Note) -> Ordering {
        match self {
            SortMode::Alphabetical => a.note.cmp(&b.note),
            SortMode::CreatedAt => b.created_at.cmp(&a.created_at),
            SortMode::UpdatedAt | SortMode::Unspecified => b.updated_at.cmp(&a.updated_at),
        }
    }
}

/// Labels of the selectable sort modes.
pub fn sort_labels() -> Vec<&'static str> {
    SortMode::OPTIONS.iter().filter_map(|m| m.label()).collect()
}

// ---------------------------------------------------------------------------
// Request / resolved filter
// ---------------------------------------------------------------------------

/// Body of a filter query.
///
/// `{ "selectedUsers": [...], "selectedPriorities": [...], "sort": "...", "limit": n }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterRequest {
    #[serde(default)]
    pub selected_users: Vec<String>,
    #[serde(default)]
    pub selected_priorities: Vec<String>,
    #[serde(default)]
    pub sort: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// A filter with author names translated to ids and labels parsed.
///
/// Empty `author_ids` / `priorities` mean "no restriction".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NoteFilter {
    pub author_ids: Vec<String>,
    pub priorities: Vec<Priority>,
    pub sort: SortMode,
    pub limit: Option<usize>,
}

impl NoteFilter {
    /// Translate a request.
    ///
    /// Fails with [`CoreError::UnknownAuthor`] when a selected name is not
    /// in the directory, and with [`CoreError::Validation`] on an unknown
    /// priority label or a negative limit.
    pub fn resolve(request: &FilterRequest) -> Result<Self, CoreError> {
        let author_ids = translate_author_names(&request.selected_users)?;
        let priorities = request
            .selected_priorities
            .iter()
            .map(|label| Priority::from_label(label))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            author_ids,
            priorities,
            sort: SortMode::from_label(request.sort.as_deref()),
            limit: request.limit.map(checked_limit).transpose()?,
        })
    }

    /// The canonical broadcast view: every note, most recently updated first.
    pub fn canonical(limit: Option<usize>) -> Self {
        Self {
            sort: SortMode::UpdatedAt,
            limit,
            ..Self::default()
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        let author_ok = self.author_ids.is_empty() || self.author_ids.contains(&note.created_by);
        let priority_ok = self.priorities.is_empty() || self.priorities.contains(&note.priority);
        author_ok && priority_ok
    }

    /// Stable sort: ties keep the candidate order.
    pub fn sort(&self, notes: &mut [Note]) {
        let mode = self.sort;
        notes.sort_by(|a, b| mode.compare(a, b));
    }

    /// Predicate, then comparator, then limit.
    pub fn apply(&self, notes: Vec<Note>) -> Vec<Note> {
        let mut selected: Vec<Note> = notes.into_iter().filter(|n| self.matches(n)).collect();
        self.sort(&mut selected);
        if let Some(limit) = self.limit {
            selected.truncate(limit);
        }
        selected
    }
}

/// Resolve `request` and apply it to `notes`.
pub fn filter_notes(request: &FilterRequest, notes: Vec<Note>) -> Result<Vec<Note>, CoreError> {
    Ok(NoteFilter::resolve(request)?.apply(notes))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
