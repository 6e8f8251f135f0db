//! Ordered-token fuzzy name search used for autocomplete.
//!
//! A query is split on whitespace. Each token must appear in the display
//! name with its characters in order, separated only by word characters
//! (so `ni` matches the `n..i` of "Dancing"), and the tokens themselves must
//! appear in query order with anything between them. Matching ignores case.
use regex::{Regex, RegexBuilder};

use crate::catalog::{Catalog, SongEntry};

/// Compiled matcher for one query.
#[derive(Debug, Clone)]
pub struct NameQuery {
    pattern: Regex,
}

impl NameQuery {
    /// Compile `query`. Blank queries yield `None`: there is no implicit
    /// "show everything".
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let tokens: Vec<String> = query.split_whitespace().map(token_pattern).collect();
        if tokens.is_empty() {
            return None;
        }
        let source = tokens.join(".*");
        match RegexBuilder::new(&source).case_insensitive(true).build() {
            Ok(pattern) => Some(Self { pattern }),
            Err(err) => {
                log::warn!("search pattern for {query:?} rejected: {err}");
                None
            }
        }
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.pattern.is_match(name)
    }
}

fn token_pattern(token: &str) -> String {
    let chars: Vec<String> = token
        .chars()
        .map(|c| regex::escape(c.encode_utf8(&mut [0; 4])))
        .collect();
    format!(r"\w*{}\w*", chars.join(r"\w*"))
}

/// Walk the catalog in order and return the first `max_results` entries whose
/// name matches `query`. Scanning stops as soon as the limit is reached, so
/// results follow catalog order rather than match quality.
#[must_use]
pub fn search<'a>(query: &str, catalog: &'a Catalog, max_results: usize) -> Vec<&'a SongEntry> {
    if max_results == 0 {
        return Vec::new();
    }
    let Some(matcher) = NameQuery::new(query) else {
        return Vec::new();
    };
    let mut found = Vec::with_capacity(max_results);
    for song in catalog {
        if matcher.matches(&song.display_name) {
            found.push(song);
            if found.len() >= max_results {
                break;
            }
        }
    }
    log::debug!("search {query:?}: {} match(es)", found.len());
    found
}
