//! Shareable emoji summary of a finished puzzle.
use crate::config::PuzzleConfig;
use crate::constants::{
    GLYPH_FILLER, GLYPH_NOT_YET, GLYPH_WIN, MAX_GUESSES, MSG_SHARE_FAILED, SHARE_DENOMINATOR,
    SHARE_LOSE_LABEL,
};
use crate::date::DateKey;
use crate::state::{Completion, SessionState};

/// One cell of the share row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareGlyph {
    /// The winning attempt
    Win,
    /// Slot after the win
    Filler,
    /// Slot before the win, or any slot of a loss
    NotYet,
}

impl ShareGlyph {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Win => GLYPH_WIN,
            Self::Filler => GLYPH_FILLER,
            Self::NotYet => GLYPH_NOT_YET,
        }
    }
}

impl std::fmt::Display for ShareGlyph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ShareError {
    #[error("results can only be shared once the puzzle is finished")]
    InProgress,
}

/// The clipboard (or other sink) refused the share text. Non-fatal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", MSG_SHARE_FAILED)]
pub struct ShareSinkFailure {
    pub reason: String,
}

/// Write-only destination for share text.
pub trait ShareSink {
    /// # Errors
    ///
    /// Returns [`ShareSinkFailure`] if the text could not be delivered.
    fn write_text(&mut self, text: &str) -> Result<(), ShareSinkFailure>;
}

/// Numerator of the `n/6` score: the attempt count, or `X` for a loss.
#[must_use]
pub fn score_label(state: &SessionState) -> String {
    match state.completion {
        Completion::Lose => SHARE_LOSE_LABEL.to_string(),
        Completion::Win | Completion::InProgress => state.guess_count().to_string(),
    }
}

/// Six glyphs, left to right: not-yet cells, the winning cell, then filler.
#[must_use]
pub fn share_row(state: &SessionState) -> [ShareGlyph; MAX_GUESSES] {
    let mut row = [ShareGlyph::NotYet; MAX_GUESSES];
    let mut won = false;
    for (idx, cell) in row.iter_mut().enumerate() {
        if state.completion != Completion::Lose && idx + 1 == state.guess_count() {
            won = true;
            *cell = ShareGlyph::Win;
        } else if won {
            *cell = ShareGlyph::Filler;
        }
    }
    row
}

/// Render `"<name> <date> <n>/6\n\n<row>\n\n<url>"` for a finished session.
///
/// # Errors
///
/// Returns [`ShareError::InProgress`] while the session is still open.
pub fn render_share(
    config: &PuzzleConfig,
    date: DateKey,
    state: &SessionState,
) -> Result<String, ShareError> {
    if !state.is_complete() {
        return Err(ShareError::InProgress);
    }
    let row: String = share_row(state).iter().map(|g| g.as_str()).collect();
    Ok(format!(
        "{} {date} {}/{SHARE_DENOMINATOR}\n\n{row}\n\n{}",
        config.puzzle_name,
        score_label(state),
        config.share_url
    ))
}
