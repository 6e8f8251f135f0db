//! Coople Puzzle Engine
//!
//! Platform-agnostic core logic for the Coople daily song-guessing puzzle.
//! This crate provides the session state machine, audio reveal windows, name
//! search, lifetime stats and share text without UI or platform-specific
//! dependencies.

pub mod audio;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod data;
pub mod date;
pub mod guess;
pub mod numbers;
pub mod search;
pub mod session;
pub mod share;
pub mod solutions;
pub mod state;
pub mod stats;
pub mod storage;

// Re-export commonly used types
pub use audio::{
    AudioPlayer, AudioSprite, Playback, PlaybackProgress, RevealWindow, StageLengths, Tick,
    format_clock, reveal_window, sprite_table,
};
pub use catalog::{Catalog, CatalogError, SongEntry};
pub use config::PuzzleConfig;
pub use data::{DataJoin, PuzzleData};
#[cfg(feature = "async")]
pub use data::join_loads;
pub use date::{DateKey, DateKeyError};
pub use guess::{GuessError, evaluate};
pub use search::{NameQuery, search};
pub use session::{DailySession, GuessOutcome, PuzzleUnavailable, SessionError, resolve_answer};
pub use share::{
    ShareError, ShareGlyph, ShareSink, ShareSinkFailure, render_share, score_label, share_row,
};
pub use solutions::{Solution, SolutionMap};
pub use state::{Completion, Guesses, SessionState, StateViolation};
pub use stats::StatsRecord;
pub use storage::{
    MemoryStorage, Namespace, PuzzleStorage, SessionStore, StatsStore, StorageKey, StoreError,
};

/// Trait for abstracting data loading operations
/// Platform-specific implementations should provide this
pub trait DataLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the song catalog from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    fn load_catalog(&self) -> Result<Catalog, Self::Error>;

    /// Load the date to answer mapping
    ///
    /// # Errors
    ///
    /// Returns an error if the solutions cannot be loaded.
    fn load_solutions(&self) -> Result<SolutionMap, Self::Error>;

    /// Load puzzle configuration, falling back to defaults when absent
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration exists but cannot be parsed.
    fn load_config(&self) -> Result<PuzzleConfig, Self::Error> {
        Ok(PuzzleConfig::default())
    }
}

/// Main engine owning reference data, storage and configuration
pub struct PuzzleEngine<S>
where
    S: PuzzleStorage,
{
    data: PuzzleData,
    storage: S,
    config: PuzzleConfig,
}

impl<S> PuzzleEngine<S>
where
    S: PuzzleStorage,
{
    /// Create an engine from already loaded data
    pub const fn new(data: PuzzleData, storage: S, config: PuzzleConfig) -> Self {
        Self {
            data,
            storage,
            config,
        }
    }

    /// Load data and configuration through `loader` and build an engine
    ///
    /// # Errors
    ///
    /// Returns an error if any of the data sets cannot be loaded.
    pub fn from_loader<L: DataLoader>(loader: &L, storage: S) -> Result<Self, L::Error> {
        let catalog = loader.load_catalog()?;
        let solutions = loader.load_solutions()?;
        let config = loader.load_config()?;
        Ok(Self::new(PuzzleData::new(catalog, solutions), storage, config))
    }

    /// Open the puzzle for `date`
    ///
    /// # Errors
    ///
    /// Returns an error if the date has no playable puzzle or its saved
    /// progress cannot be read.
    pub fn session(&self, date: DateKey) -> Result<DailySession<'_, S>, SessionError> {
        DailySession::open(
            date,
            &self.data.catalog,
            &self.data.solutions,
            &self.storage,
            &self.config,
        )
    }

    /// Autocomplete suggestions for `query`, limited by configuration
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&SongEntry> {
        search::search(query, &self.data.catalog, self.config.search_limit)
    }

    /// Lifetime stats
    ///
    /// # Errors
    ///
    /// Returns an error if stored stats cannot be read.
    pub fn stats(&self) -> Result<StatsRecord, StoreError> {
        StatsStore::new(&self.storage).load()
    }

    #[must_use]
    pub const fn data(&self) -> &PuzzleData {
        &self.data
    }

    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    #[must_use]
    pub const fn config(&self) -> &PuzzleConfig {
        &self.config
    }
}
