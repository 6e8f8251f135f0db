//! Playlist export (CSV) import for the song database.
use anyhow::{Context, Result};
use coople_game::SongEntry;
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

pub const DEFAULT_MIN_POPULARITY: u32 = 75;

/// Filter applied to imported rows.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    pub min_popularity: u32,
    /// Always accepted, even below the threshold or when excluded.
    pub include: HashSet<String>,
    pub exclude: HashSet<String>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            min_popularity: DEFAULT_MIN_POPULARITY,
            include: HashSet::new(),
            exclude: HashSet::new(),
        }
    }
}

impl ImportConfig {
    /// Read a JSON config; unknown keys are an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| {
            format!(
                "parsing {} (allowed options: 'min_popularity', 'include', 'exclude')",
                path.display()
            )
        })
    }

    pub fn accepts(&self, uri: &str, popularity: u32) -> bool {
        if self.include.contains(uri) {
            return true;
        }
        !self.exclude.contains(uri) && popularity >= self.min_popularity
    }
}

/// The columns used from an exported playlist; others are ignored.
#[derive(Debug, Deserialize)]
struct ExportRow {
    #[serde(rename = "Track URI")]
    track_uri: String,
    #[serde(rename = "Popularity")]
    popularity: u32,
    #[serde(rename = "Track Name")]
    track_name: String,
    #[serde(rename = "Artist Name(s)")]
    artists: String,
}

impl ExportRow {
    fn into_entry(self) -> SongEntry {
        SongEntry::new(
            self.track_uri,
            format!("{} - {}", self.track_name, self.artists),
        )
    }
}

/// Parse exported rows, keeping those `config` accepts.
pub fn parse_export(reader: impl Read, config: &ImportConfig) -> Result<Vec<SongEntry>> {
    let mut rows = csv::Reader::from_reader(reader);
    let mut accepted = Vec::new();
    for (line, row) in rows.deserialize::<ExportRow>().enumerate() {
        let row = row.with_context(|| format!("row {}", line + 1))?;
        if config.accepts(&row.track_uri, row.popularity) {
            accepted.push(row.into_entry());
        } else {
            log::debug!("skipping {} (popularity {})", row.track_uri, row.popularity);
        }
    }
    Ok(accepted)
}

pub fn read_export_file(path: &Path, config: &ImportConfig) -> Result<Vec<SongEntry>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_export(file, config)
        .with_context(|| format!("Unable to read CSV file '{}'", path.display()))
}

pub fn is_export_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}
