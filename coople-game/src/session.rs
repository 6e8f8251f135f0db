use crate::audio::{self, AudioSprite, RevealWindow};
use crate::catalog::{Catalog, SongEntry};
use crate::config::PuzzleConfig;
use crate::date::DateKey;
use crate::guess::{GuessError, evaluate};
use crate::share::{ShareError, render_share};
use crate::solutions::{Solution, SolutionMap};
use crate::state::{Completion, SessionState};
use crate::storage::{PuzzleStorage, SessionStore, StatsStore, StoreError};

/// Why no puzzle can be played for a date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleUnavailable {
    #[error(
        "There is no data for today's date (meaning Cooper is lazy and needs to update the site).\nPlease try again later."
    )]
    NotYetPublished { date: DateKey },
    #[error("There is no puzzle for today's date.\nHave a great day and see you tomorrow! :)")]
    NoPuzzleToday { date: DateKey },
    #[error("Internal data error. Please contact coop.rocks.123e <at> gmail.com for help.")]
    CatalogIntegrity { date: DateKey, song_id: String },
}

impl PuzzleUnavailable {
    /// Heading shown above the message.
    #[must_use]
    pub const fn headline(&self) -> &'static str {
        match self {
            Self::NoPuzzleToday { .. } => "No Coople today!",
            Self::NotYetPublished { .. } | Self::CatalogIntegrity { .. } => "An error occurred!",
        }
    }
}

/// Failure while opening or advancing a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Unavailable(#[from] PuzzleUnavailable),
    #[error(transparent)]
    Guess(#[from] GuessError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What a successful guess did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuessOutcome {
    /// Wrong, attempts remain
    Continue { remaining: usize },
    Won { attempts: usize },
    Lost,
}

/// Resolve the answer for `date` against the catalog.
///
/// # Errors
///
/// Returns the matching [`PuzzleUnavailable`] case when the date has no
/// playable puzzle.
pub fn resolve_answer<'c>(
    date: DateKey,
    catalog: &'c Catalog,
    solutions: &SolutionMap,
) -> Result<&'c SongEntry, PuzzleUnavailable> {
    match solutions.lookup(date) {
        Solution::Song(id) => {
            catalog
                .by_id(id)
                .ok_or_else(|| PuzzleUnavailable::CatalogIntegrity {
                    date,
                    song_id: id.to_string(),
                })
        }
        Solution::NoPuzzle => Err(PuzzleUnavailable::NoPuzzleToday { date }),
        Solution::Unpublished => Err(PuzzleUnavailable::NotYetPublished { date }),
    }
}

/// One date's puzzle bound to its catalog, storage and configuration.
#[derive(Debug)]
pub struct DailySession<'a, S: ?Sized> {
    date: DateKey,
    answer: &'a SongEntry,
    catalog: &'a Catalog,
    storage: &'a S,
    config: &'a PuzzleConfig,
    state: SessionState,
}

impl<'a, S: PuzzleStorage + ?Sized> DailySession<'a, S> {
    /// Resolve the answer for `date` and load any saved progress.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Unavailable`] if the date has no playable
    /// puzzle, or [`SessionError::Store`] if saved progress cannot be read.
    pub fn open(
        date: DateKey,
        catalog: &'a Catalog,
        solutions: &SolutionMap,
        storage: &'a S,
        config: &'a PuzzleConfig,
    ) -> Result<Self, SessionError> {
        let answer = resolve_answer(date, catalog, solutions)?;
        let state = SessionStore::new(storage).load(date)?;
        log::debug!(
            "opened {date}: {} guess(es), {}",
            state.guess_count(),
            state.completion
        );
        Ok(Self {
            date,
            answer,
            catalog,
            storage,
            config,
            state,
        })
    }

    /// Submit a guess.
    ///
    /// On success the new state is persisted. When the guess ends the
    /// puzzle, lifetime stats are updated first, exactly once, since a
    /// finished session accepts no further guesses.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Guess`] for unknown names or a finished
    /// session (state untouched), or [`SessionError::Store`] if persisting
    /// fails.
    pub fn submit_guess(&mut self, guess: &str) -> Result<GuessOutcome, SessionError> {
        let next = evaluate(&self.state, guess, self.catalog, &self.answer.id)?;
        let attempts = next.guess_count();
        if next.is_complete() {
            let record = StatsStore::new(self.storage).log_completion(next.completion, attempts)?;
            log::info!(
                "{} finished: {} in {attempts} (lifetime total {})",
                self.date,
                next.completion,
                record.total
            );
        }
        SessionStore::new(self.storage).save(self.date, &next)?;
        self.state = next;

        Ok(match self.state.completion {
            Completion::InProgress => GuessOutcome::Continue {
                remaining: self.state.remaining(),
            },
            Completion::Win => GuessOutcome::Won { attempts },
            Completion::Lose => GuessOutcome::Lost,
        })
    }

    #[must_use]
    pub const fn date(&self) -> DateKey {
        self.date
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn completion(&self) -> Completion {
        self.state.completion
    }

    #[must_use]
    pub const fn config(&self) -> &PuzzleConfig {
        self.config
    }

    /// The answer, revealed only once the session has finished.
    #[must_use]
    pub fn revealed_answer(&self) -> Option<&'a SongEntry> {
        self.state.is_complete().then_some(self.answer)
    }

    #[must_use]
    pub fn reveal_window(&self) -> RevealWindow {
        audio::reveal_window(
            &self.config.stages,
            self.state.guess_count(),
            self.state.completion,
        )
    }

    #[must_use]
    pub fn current_sprite(&self) -> AudioSprite {
        audio::current_sprite(&self.config.stages, &self.state)
    }

    /// Where the front end should load this puzzle's audio from.
    #[must_use]
    pub fn audio_path(&self) -> String {
        audio::audio_path(self.config, &self.answer.id)
    }

    /// Embeddable player link, available once the session has finished.
    #[must_use]
    pub fn embed_url(&self) -> Option<String> {
        self.revealed_answer()
            .map(|answer| audio::embed_url(self.config, &answer.id))
    }

    /// Player-facing result line for a finished session.
    #[must_use]
    pub const fn result_message(&self) -> Option<&'static str> {
        match self.state.completion {
            Completion::InProgress => None,
            Completion::Win => Some(crate::constants::MSG_WIN),
            Completion::Lose => Some(crate::constants::MSG_LOSE),
        }
    }

    /// # Errors
    ///
    /// Returns [`ShareError::InProgress`] until the session has finished.
    pub fn share_text(&self) -> Result<String, ShareError> {
        render_share(self.config, self.date, &self.state)
    }

    /// Consume the session, returning its state.
    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }
}
