//! Song catalog: every guessable track, in a stable order.
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single guessable song.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SongEntry {
    /// Opaque track identifier (e.g. a streaming URI).
    pub id: String,
    /// Name shown to players and typed as a guess.
    pub display_name: String,
}

impl SongEntry {
    #[must_use]
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
        }
    }
}

// Stored on disk as a two-element `[id, displayName]` array.
impl Serialize for SongEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.id, &self.display_name).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SongEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (id, display_name) = <(String, String)>::deserialize(deserializer)?;
        Ok(Self { id, display_name })
    }
}

/// Errors raised while reading catalog or solution data files.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog data is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered, read-only list of songs with an id index.
///
/// Iteration order is the order the data source supplied, and is the
/// tie-break order for search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<SongEntry>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Create an empty catalog (useful for tests)
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a catalog from entries. A repeated id replaces the earlier entry
    /// in its original position.
    #[must_use]
    pub fn from_entries(entries: impl IntoIterator<Item = SongEntry>) -> Self {
        let mut catalog = Self::empty();
        catalog.merge(entries);
        catalog
    }

    /// Parse catalog JSON, either `[[id, name], ...]` or `{ id: name | [name] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON matches neither shape.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to the canonical list shape.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string(self)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SongEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn entries(&self) -> &[SongEntry] {
        &self.entries
    }

    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&SongEntry> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// First entry whose display name equals `name` exactly (case-sensitive).
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&SongEntry> {
        self.entries.iter().find(|song| song.display_name == name)
    }

    /// Update entries by id or append new ones. Returns how many were new.
    pub fn merge(&mut self, entries: impl IntoIterator<Item = SongEntry>) -> usize {
        let mut added = 0;
        for entry in entries {
            if let Some(&idx) = self.by_id.get(&entry.id) {
                self.entries[idx] = entry;
            } else {
                self.by_id.insert(entry.id.clone(), self.entries.len());
                self.entries.push(entry);
                added += 1;
            }
        }
        added
    }

    /// Drop every entry whose id is listed. Returns how many were removed.
    pub fn exclude<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> usize {
        let drop: HashSet<&str> = ids.into_iter().collect();
        let before = self.entries.len();
        self.entries.retain(|song| !drop.contains(song.id.as_str()));
        self.reindex();
        before - self.entries.len()
    }

    fn reindex(&mut self) {
        self.by_id = self
            .entries
            .iter()
            .enumerate()
            .map(|(idx, song)| (song.id.clone(), idx))
            .collect();
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a SongEntry;
    type IntoIter = std::slice::Iter<'a, SongEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            seq.serialize_element(entry)?;
        }
        seq.end()
    }
}

/// Value side of the object-shaped catalog: a bare name or `[name, ...]`.
#[derive(Deserialize)]
#[serde(untagged)]
enum NameField {
    Bare(String),
    Listed(Vec<String>),
}

struct CatalogVisitor;

impl<'de> Visitor<'de> for CatalogVisitor {
    type Value = Catalog;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of [id, name] pairs or an object of id to name")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(entry) = seq.next_element::<SongEntry>()? {
            entries.push(entry);
        }
        Ok(Catalog::from_entries(entries))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((id, name)) = map.next_entry::<String, NameField>()? {
            let display_name = match name {
                NameField::Bare(name) => name,
                NameField::Listed(names) => names
                    .into_iter()
                    .next()
                    .ok_or_else(|| de::Error::custom(format!("song '{id}' has no name")))?,
            };
            entries.push(SongEntry { id, display_name });
        }
        Ok(Catalog::from_entries(entries))
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(CatalogVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_shape_preserves_order() {
        let catalog =
            Catalog::from_json(r#"[["b", "Beta"], ["a", "Alpha"], ["c", "Gamma"]]"#).unwrap();
        let names: Vec<_> = catalog.iter().map(|s| s.display_name.as_str()).collect();
        assert_eq!(names, ["Beta", "Alpha", "Gamma"]);
        assert_eq!(catalog.by_id("a").unwrap().display_name, "Alpha");
    }

    #[test]
    fn object_shape_accepts_bare_and_listed_names() {
        let catalog = Catalog::from_json(r#"{"z": "Zulu", "y": ["Yankee", "extra"]}"#).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0], SongEntry::new("z", "Zulu"));
        assert_eq!(catalog.by_id("y").unwrap().display_name, "Yankee");
    }

    #[test]
    fn object_shape_rejects_empty_name_list() {
        assert!(Catalog::from_json(r#"{"z": []}"#).is_err());
        assert!(Catalog::from_json("42").is_err());
    }

    #[test]
    fn duplicate_ids_replace_in_place() {
        let catalog = Catalog::from_entries([
            SongEntry::new("1", "One"),
            SongEntry::new("2", "Two"),
            SongEntry::new("1", "Uno"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0].display_name, "Uno");
    }

    #[test]
    fn name_lookup_is_exact_and_case_sensitive() {
        let catalog = Catalog::from_entries([SongEntry::new("1", "Alpha")]);
        assert!(catalog.by_name("Alpha").is_some());
        assert!(catalog.by_name("alpha").is_none());
        assert!(catalog.by_name("Alph").is_none());
    }

    #[test]
    fn merge_and_exclude_keep_index_consistent() {
        let mut catalog = Catalog::from_entries([
            SongEntry::new("1", "One"),
            SongEntry::new("2", "Two"),
            SongEntry::new("3", "Three"),
        ]);
        let added = catalog.merge([SongEntry::new("4", "Four"), SongEntry::new("2", "Deux")]);
        assert_eq!(added, 1);
        assert_eq!(catalog.exclude(["1", "missing"]), 1);
        assert!(!catalog.contains_id("1"));
        assert_eq!(catalog.by_id("2").unwrap().display_name, "Deux");
        assert_eq!(catalog.by_id("4").unwrap().display_name, "Four");
        let json = catalog.to_json().unwrap();
        assert_eq!(json, r#"[["2","Deux"],["3","Three"],["4","Four"]]"#);
    }
}
