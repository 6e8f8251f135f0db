//! Guess validation and session state transitions.
use crate::catalog::Catalog;
use crate::constants::{MAX_GUESSES, MSG_GUESS_UNKNOWN};
use crate::state::{Completion, SessionState, StateViolation};

/// Reasons a guess is not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GuessError {
    /// The text does not name a catalog song. Recoverable: the player
    /// simply tries again.
    #[error("{}", MSG_GUESS_UNKNOWN)]
    NotFound { guess: String },
    /// The session already finished; guessing again is a caller bug.
    #[error("this puzzle is already finished ({completion})")]
    AlreadyComplete { completion: Completion },
    /// The incoming state could not have been reached by guessing.
    #[error("session state is inconsistent: {0}")]
    Inconsistent(#[from] StateViolation),
}

/// Apply one guess to `state`, returning the next state.
///
/// The guess must be an exact, case-sensitive display name from the catalog.
/// A match is appended; it wins if its id is `solution_id`, and the sixth
/// wrong guess loses. `state` itself is never modified, so a rejected guess
/// leaves the caller's state exactly as it was.
///
/// Repeating an earlier guess is allowed and costs an attempt.
///
/// # Errors
///
/// Returns [`GuessError::NotFound`] for unknown names,
/// [`GuessError::AlreadyComplete`] if the session has already ended, and
/// [`GuessError::Inconsistent`] if `state` breaks the guess-count rules.
pub fn evaluate(
    state: &SessionState,
    guess: &str,
    catalog: &Catalog,
    solution_id: &str,
) -> Result<SessionState, GuessError> {
    state.validate()?;
    if state.completion.is_terminal() {
        return Err(GuessError::AlreadyComplete {
            completion: state.completion,
        });
    }
    let Some(song) = catalog.by_name(guess) else {
        log::debug!("guess {guess:?} not in catalog");
        return Err(GuessError::NotFound {
            guess: guess.to_string(),
        });
    };

    let mut next = state.clone();
    next.guesses.push(song.display_name.clone());
    next.completion = if song.id == solution_id {
        Completion::Win
    } else if next.guesses.len() >= MAX_GUESSES {
        Completion::Lose
    } else {
        Completion::InProgress
    };
    log::debug!(
        "guess {} of {MAX_GUESSES} ({:?}) -> {}",
        next.guesses.len(),
        song.display_name,
        next.completion
    );
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SongEntry;

    fn catalog() -> Catalog {
        Catalog::from_entries([
            SongEntry::new("1", "Alpha"),
            SongEntry::new("2", "Beta"),
            SongEntry::new("3", "Gamma"),
        ])
    }

    #[test]
    fn unknown_guess_leaves_state_alone() {
        let state = SessionState::new();
        let err = evaluate(&state, "alpha", &catalog(), "2").unwrap_err();
        assert_eq!(
            err,
            GuessError::NotFound {
                guess: "alpha".into()
            }
        );
        assert_eq!(err.to_string(), MSG_GUESS_UNKNOWN);
        assert_eq!(state.guess_count(), 0);
    }

    #[test]
    fn correct_guess_wins() {
        let state = evaluate(&SessionState::new(), "Alpha", &catalog(), "2").unwrap();
        assert_eq!(state.completion, Completion::InProgress);
        let state = evaluate(&state, "Beta", &catalog(), "2").unwrap();
        assert_eq!(state.completion, Completion::Win);
        assert_eq!(state.guesses.as_slice(), ["Alpha", "Beta"]);
    }

    #[test]
    fn sixth_wrong_guess_loses() {
        let cat = catalog();
        let mut state = SessionState::new();
        for n in 1..=MAX_GUESSES {
            state = evaluate(&state, "Gamma", &cat, "2").unwrap();
            let expected = if n == MAX_GUESSES {
                Completion::Lose
            } else {
                Completion::InProgress
            };
            assert_eq!(state.completion, expected);
        }
        assert_eq!(state.guess_count(), MAX_GUESSES);
    }

    #[test]
    fn winning_on_last_attempt_is_a_win() {
        let cat = catalog();
        let mut state = SessionState::new();
        for _ in 1..MAX_GUESSES {
            state = evaluate(&state, "Alpha", &cat, "3").unwrap();
        }
        let state = evaluate(&state, "Gamma", &cat, "3").unwrap();
        assert_eq!(state.completion, Completion::Win);
    }

    #[test]
    fn finished_sessions_reject_guesses() {
        let state = evaluate(&SessionState::new(), "Beta", &catalog(), "2").unwrap();
        let err = evaluate(&state, "Alpha", &catalog(), "2").unwrap_err();
        assert_eq!(
            err,
            GuessError::AlreadyComplete {
                completion: Completion::Win
            }
        );
    }

    #[test]
    fn overfull_state_takes_no_seventh_guess() {
        let mut state = SessionState::new();
        for _ in 0..MAX_GUESSES {
            state.guesses.push("Alpha".into());
        }
        let err = evaluate(&state, "Beta", &catalog(), "9").unwrap_err();
        assert_eq!(
            err,
            GuessError::Inconsistent(StateViolation::UnfinishedAfterLastGuess)
        );
        assert_eq!(state.guess_count(), MAX_GUESSES);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let cat = catalog();
        let start = evaluate(&SessionState::new(), "Gamma", &cat, "1").unwrap();
        let a = evaluate(&start, "Beta", &cat, "1");
        let b = evaluate(&start, "Beta", &cat, "1");
        assert_eq!(a, b);
    }
}
