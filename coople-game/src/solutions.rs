//! Date to answer mapping.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::catalog::CatalogError;
use crate::date::DateKey;

/// What the solution map says about one date.
///
/// The three cases are deliberately distinct: a date can have an answer,
/// be explicitly marked as having no puzzle, or be missing altogether
/// because it has not been published yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solution<'a> {
    Song(&'a str),
    NoPuzzle,
    Unpublished,
}

/// Mapping from date key to a song id, or `null` for a no-puzzle day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SolutionMap {
    days: BTreeMap<DateKey, Option<String>>,
}

impl SolutionMap {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse `{ "YYYYMMDD": "id" | null }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a key is not a valid date.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string(self)?)
    }

    #[must_use]
    pub fn lookup(&self, date: DateKey) -> Solution<'_> {
        match self.days.get(&date) {
            Some(Some(id)) => Solution::Song(id),
            Some(None) => Solution::NoPuzzle,
            None => Solution::Unpublished,
        }
    }

    /// Set the answer for a date, returning the previous assignment.
    pub fn assign(&mut self, date: DateKey, id: impl Into<String>) -> Option<Option<String>> {
        self.days.insert(date, Some(id.into()))
    }

    /// Mark a date as an explicit no-puzzle day.
    pub fn mark_no_puzzle(&mut self, date: DateKey) {
        self.days.insert(date, None);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.days.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Most recent published date, if any.
    #[must_use]
    pub fn last_date(&self) -> Option<DateKey> {
        self.days.keys().next_back().copied()
    }
}
