//! File-backed data loading and persistence.
use anyhow::{Context, Result};
use coople_game::{
    Catalog, PuzzleConfig, PuzzleData, PuzzleStorage, SolutionMap, StorageKey, join_loads,
};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SONGDB_FILE: &str = "songdb.json";
pub const SOLUTIONS_FILE: &str = "solutions.json";

/// Locations of the static data files.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub songdb: PathBuf,
    pub solutions: PathBuf,
}

impl DataPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            songdb: dir.join(SONGDB_FILE),
            solutions: dir.join(SOLUTIONS_FILE),
        }
    }
}

async fn read_text(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

async fn read_catalog(path: &Path) -> Result<Catalog> {
    let text = read_text(path).await?;
    let catalog =
        Catalog::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
    log::info!("Songdb loaded! ({} songs)", catalog.len());
    Ok(catalog)
}

async fn read_solutions(path: &Path) -> Result<SolutionMap> {
    let text = read_text(path).await?;
    let solutions =
        SolutionMap::from_json(&text).with_context(|| format!("parsing {}", path.display()))?;
    log::info!("Solutions loaded! ({} dates)", solutions.len());
    Ok(solutions)
}

/// Load the catalog and solution map concurrently.
pub async fn load_puzzle_data(paths: &DataPaths) -> Result<PuzzleData> {
    join_loads(read_catalog(&paths.songdb), read_solutions(&paths.solutions)).await
}

pub fn load_config(path: Option<&Path>) -> Result<PuzzleConfig> {
    let Some(path) = path else {
        return Ok(PuzzleConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    PuzzleConfig::from_json(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Read a catalog file, or `None` if it does not exist yet.
pub fn read_catalog_file(path: &Path) -> Result<Option<Catalog>> {
    match fs::read_to_string(path) {
        Ok(text) => Catalog::from_json(&text)
            .map(Some)
            .with_context(|| format!("parsing {}", path.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

/// Read a solutions file, or `None` if it does not exist yet.
pub fn read_solutions_file(path: &Path) -> Result<Option<SolutionMap>> {
    match fs::read_to_string(path) {
        Ok(text) => SolutionMap::from_json(&text)
            .map(Some)
            .with_context(|| format!("parsing {}", path.display())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
    }
}

/// Write `contents` beside `path` and rename it into place.
pub fn write_replacing(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)
}

#[derive(Debug, thiserror::Error)]
pub enum FileStorageError {
    #[error("state file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("state file is not a JSON object: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persists every key as one entry of a single JSON object file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<Map<String, Value>, FileStorageError> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(Map::new()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PuzzleStorage for FileStorage {
    type Error = FileStorageError;

    fn read(&self, key: &StorageKey) -> Result<Option<Value>, Self::Error> {
        Ok(self.read_all()?.remove(&key.to_string()))
    }

    fn write(&self, key: &StorageKey, value: Value) -> Result<(), Self::Error> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value);
        let text = serde_json::to_string_pretty(&all)?;
        write_replacing(&self.path, &text)?;
        log::debug!("saved {key} to {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coople_game::{Completion, SessionState, SessionStore, StatsStore};

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "coople-files-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn file_storage_roundtrips_sessions_and_stats() {
        let path = temp_path("state.json");
        let storage = FileStorage::new(&path);
        let date = "20240110".parse().unwrap();

        let sessions = SessionStore::new(&storage);
        assert_eq!(sessions.load(date).unwrap(), SessionState::new());
        let mut state = SessionState::new();
        state.guesses.push("Alpha".into());
        sessions.save(date, &state).unwrap();
        StatsStore::new(&storage)
            .log_completion(Completion::Lose, 6)
            .unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(SessionStore::new(&reopened).load(date).unwrap(), state);
        assert_eq!(StatsStore::new(&reopened).load().unwrap().lose, 1);

        let raw: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("20240110:state").is_some());
        assert!(raw.get("stats:counts").is_some());
        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_files_read_as_none() {
        let path = temp_path("absent.json");
        assert!(read_catalog_file(&path).unwrap().is_none());
        assert!(read_solutions_file(&path).unwrap().is_none());
    }

    #[tokio::test]
    async fn loads_both_data_files() {
        let dir = temp_path("data");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(SONGDB_FILE), r#"[["s1", "Alpha"]]"#).unwrap();
        fs::write(dir.join(SOLUTIONS_FILE), r#"{"20240101": "s1"}"#).unwrap();
        let data = load_puzzle_data(&DataPaths::in_dir(&dir)).await.unwrap();
        assert_eq!(data.catalog.len(), 1);
        assert_eq!(data.solutions.len(), 1);

        fs::remove_file(dir.join(SOLUTIONS_FILE)).unwrap();
        assert!(load_puzzle_data(&DataPaths::in_dir(&dir)).await.is_err());
        let _ = fs::remove_dir_all(dir);
    }
}
