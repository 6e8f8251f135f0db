//! Per-day puzzle session state.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::MAX_GUESSES;

/// Outcome of a puzzle session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Completion {
    /// Still guessing
    #[default]
    InProgress,
    /// Solution found
    Win,
    /// All attempts used without finding the solution
    Lose,
}

impl Completion {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

impl std::fmt::Display for Completion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "inProgress"),
            Self::Win => write!(f, "win"),
            Self::Lose => write!(f, "lose"),
        }
    }
}

/// A stored state that no sequence of guesses could have produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StateViolation {
    #[error("{count} guesses recorded, at most {MAX_GUESSES} allowed")]
    TooManyGuesses { count: usize },
    #[error("all {MAX_GUESSES} guesses used but the puzzle is still in progress")]
    UnfinishedAfterLastGuess,
    #[error("loss recorded after {count} guesses instead of {MAX_GUESSES}")]
    EarlyLoss { count: usize },
    #[error("win recorded without any guess")]
    WinWithoutGuess,
}

/// Guesses recorded for a session, in attempt order.
pub type Guesses = SmallVec<[String; MAX_GUESSES]>;

/// Progress of one date's puzzle.
///
/// The date is not stored here: it is the storage key (`<date>:state`) and
/// lives on the owning [`DailySession`](crate::DailySession), which keeps
/// the JSON shape `{gameGuesses, gameCompletion}`. Pair a state with its
/// date through the session rather than by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(rename = "gameGuesses", default)]
    pub guesses: Guesses,
    #[serde(rename = "gameCompletion", default)]
    pub completion: Completion,
}

impl SessionState {
    /// Fresh state: no guesses, in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn guess_count(&self) -> usize {
        self.guesses.len()
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.completion.is_terminal()
    }

    /// Attempts still available.
    #[must_use]
    pub fn remaining(&self) -> usize {
        if self.is_complete() {
            0
        } else {
            MAX_GUESSES.saturating_sub(self.guesses.len())
        }
    }

    /// Check the guess count against the completion.
    ///
    /// # Errors
    ///
    /// Returns the first [`StateViolation`] found.
    pub fn validate(&self) -> Result<(), StateViolation> {
        let count = self.guesses.len();
        if count > MAX_GUESSES {
            return Err(StateViolation::TooManyGuesses { count });
        }
        match self.completion {
            Completion::InProgress if count == MAX_GUESSES => {
                Err(StateViolation::UnfinishedAfterLastGuess)
            }
            Completion::Lose if count != MAX_GUESSES => Err(StateViolation::EarlyLoss { count }),
            Completion::Win if count == 0 => Err(StateViolation::WinWithoutGuess),
            _ => Ok(()),
        }
    }

    /// Guesses paired with whether each was the winning attempt.
    pub fn marked_guesses(&self) -> impl Iterator<Item = (&str, bool)> {
        let last = self.guesses.len();
        let won = self.completion == Completion::Win;
        self.guesses
            .iter()
            .enumerate()
            .map(move |(idx, guess)| (guess.as_str(), won && idx + 1 == last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_is_empty_and_in_progress() {
        let state = SessionState::new();
        assert_eq!(state.guess_count(), 0);
        assert_eq!(state.completion, Completion::InProgress);
        assert_eq!(state.remaining(), MAX_GUESSES);
    }

    #[test]
    fn json_uses_legacy_field_names() {
        let mut state = SessionState::new();
        state.guesses.push("Alpha".to_string());
        state.completion = Completion::Win;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"gameGuesses":["Alpha"],"gameCompletion":"win"}"#);
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn missing_fields_default() {
        let state: SessionState = serde_json::from_str("{}").unwrap();
        assert_eq!(state, SessionState::new());
    }

    fn with_guesses(count: usize, completion: Completion) -> SessionState {
        SessionState {
            guesses: (0..count).map(|n| format!("Song {n}")).collect(),
            completion,
        }
    }

    #[test]
    fn reachable_states_validate() {
        for count in 0..MAX_GUESSES {
            assert_eq!(with_guesses(count, Completion::InProgress).validate(), Ok(()));
        }
        for count in 1..=MAX_GUESSES {
            assert_eq!(with_guesses(count, Completion::Win).validate(), Ok(()));
        }
        assert_eq!(with_guesses(MAX_GUESSES, Completion::Lose).validate(), Ok(()));
    }

    #[test]
    fn impossible_states_are_rejected() {
        assert_eq!(
            with_guesses(MAX_GUESSES, Completion::InProgress).validate(),
            Err(StateViolation::UnfinishedAfterLastGuess)
        );
        assert_eq!(
            with_guesses(10, Completion::Win).validate(),
            Err(StateViolation::TooManyGuesses { count: 10 })
        );
        assert_eq!(
            with_guesses(2, Completion::Lose).validate(),
            Err(StateViolation::EarlyLoss { count: 2 })
        );
        assert_eq!(
            with_guesses(0, Completion::Win).validate(),
            Err(StateViolation::WinWithoutGuess)
        );
    }

    #[test]
    fn only_last_guess_of_a_win_is_marked() {
        let mut state = SessionState::new();
        state.guesses.push("A".into());
        state.guesses.push("B".into());
        let marks: Vec<bool> = state.marked_guesses().map(|(_, ok)| ok).collect();
        assert_eq!(marks, [false, false]);
        state.completion = Completion::Win;
        let marks: Vec<bool> = state.marked_guesses().map(|(_, ok)| ok).collect();
        assert_eq!(marks, [false, true]);
        assert_eq!(state.remaining(), 0);
    }
}
