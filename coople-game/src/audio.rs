//! Audio reveal windows and the playback seam.
//!
//! The puzzle never decodes audio itself. It computes how much of the track
//! a player may hear, names the matching sprite, and drives an opaque
//! [`AudioPlayer`] supplied by the front end.
use serde::{Deserialize, Serialize};

use crate::config::PuzzleConfig;
use crate::constants::{MAX_GUESSES, SPRITE_PREFIX, STAGE_LENGTHS_MS};
use crate::numbers::{fraction, millis_to_secs, secs_to_millis};
use crate::state::{Completion, SessionState};

/// Per-guess audio increments in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StageLengths([u32; MAX_GUESSES]);

impl Default for StageLengths {
    fn default() -> Self {
        Self(STAGE_LENGTHS_MS)
    }
}

impl StageLengths {
    #[must_use]
    pub const fn new(lengths: [u32; MAX_GUESSES]) -> Self {
        Self(lengths)
    }

    #[must_use]
    pub const fn as_array(&self) -> &[u32; MAX_GUESSES] {
        &self.0
    }

    /// Sum of the first `count` stages.
    #[must_use]
    pub fn cumulative_ms(&self, count: usize) -> u64 {
        self.0.iter().take(count).map(|&l| u64::from(l)).sum()
    }

    /// Length of the whole reveal, i.e. all stages.
    #[must_use]
    pub fn total_ms(&self) -> u64 {
        self.cumulative_ms(MAX_GUESSES)
    }
}

/// The `[0, end_ms)` range a player may currently hear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RevealWindow {
    pub end_ms: u64,
}

impl RevealWindow {
    #[must_use]
    pub const fn start_ms(&self) -> u64 {
        0
    }

    #[must_use]
    pub fn contains(&self, position_ms: u64) -> bool {
        position_ms < self.end_ms
    }
}

/// Compute the playable window for a guess count and completion.
///
/// While in progress, zero guesses unlock the first stage and every guess
/// adds the next stage. A finished session unlocks the whole reveal.
#[must_use]
pub fn reveal_window(stages: &StageLengths, guesses: usize, completion: Completion) -> RevealWindow {
    let end_ms = if completion.is_terminal() {
        stages.total_ms()
    } else {
        stages.cumulative_ms(guesses.saturating_add(1).min(MAX_GUESSES))
    };
    RevealWindow { end_ms }
}

/// Index of the sprite that should play for a session.
#[must_use]
pub fn sprite_index(guesses: usize, completion: Completion) -> usize {
    if completion.is_terminal() {
        MAX_GUESSES
    } else {
        guesses.min(MAX_GUESSES - 1)
    }
}

/// A named sub-range of the puzzle's audio asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSprite {
    pub name: String,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl AudioSprite {
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }
}

#[must_use]
pub fn sprite_name(index: usize) -> String {
    format!("{SPRITE_PREFIX}{index}")
}

/// Sprite table handed to the audio engine: one cumulative sprite per guess
/// slot followed by the full-reveal sprite.
#[must_use]
pub fn sprite_table(stages: &StageLengths) -> Vec<AudioSprite> {
    (0..=MAX_GUESSES)
        .map(|index| AudioSprite {
            name: sprite_name(index),
            start_ms: 0,
            end_ms: stages.cumulative_ms((index + 1).min(MAX_GUESSES)),
        })
        .collect()
}

/// The sprite a session is currently allowed to play.
#[must_use]
pub fn current_sprite(stages: &StageLengths, state: &SessionState) -> AudioSprite {
    let index = sprite_index(state.guess_count(), state.completion);
    let window = reveal_window(stages, state.guess_count(), state.completion);
    AudioSprite {
        name: sprite_name(index),
        start_ms: window.start_ms(),
        end_ms: window.end_ms,
    }
}

/// Opaque audio engine: plays sprites and reports its position.
pub trait AudioPlayer {
    type SoundId: Copy;

    /// Whether the audio asset has finished loading.
    fn is_loaded(&self) -> bool;

    fn play(&mut self, sprite: &AudioSprite) -> Self::SoundId;

    fn stop(&mut self);

    /// Current position of `sound` in seconds, if known.
    fn seek(&self, sound: Self::SoundId) -> Option<f64>;

    fn is_playing(&self) -> bool;
}

/// Snapshot of playback within the reveal window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackProgress {
    pub position_ms: u64,
    pub window_ms: u64,
}

impl PlaybackProgress {
    /// Fraction of the window already played, `0.0..=1.0`.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        fraction(self.position_ms, self.window_ms)
    }

    /// `m:ss / m:ss` meter text.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} / {}",
            format_clock(millis_to_secs(self.position_ms)),
            format_clock(millis_to_secs(self.window_ms))
        )
    }
}

/// Format seconds as `m:ss`, truncating fractions.
#[must_use]
pub fn format_clock(secs: f64) -> String {
    let whole = secs_to_millis(secs) / 1000;
    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Result of one progress tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub progress: PlaybackProgress,
    /// Whether the caller should schedule another tick.
    pub reschedule: bool,
}

/// Play/stop control bound to one session's reveal window.
///
/// The progress loop has no cancel token: each tick reports whether the
/// player is still playing, and the loop stops scheduling once it is not.
pub struct Playback<P: AudioPlayer> {
    player: P,
    sound: Option<P::SoundId>,
}

impl<P: AudioPlayer> Playback<P> {
    pub fn new(player: P) -> Self {
        Self {
            player,
            sound: None,
        }
    }

    pub fn player(&self) -> &P {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Start the sprite if idle, stop if playing. Returns whether audio is
    /// now playing. Does nothing until the asset has loaded.
    pub fn toggle(&mut self, sprite: &AudioSprite) -> bool {
        if !self.player.is_loaded() {
            return false;
        }
        if self.player.is_playing() {
            self.player.stop();
            false
        } else {
            log::debug!("playing {} ({} ms)", sprite.name, sprite.duration_ms());
            self.sound = Some(self.player.play(sprite));
            true
        }
    }

    /// Stop playback and forget the current sound, e.g. after a guess.
    pub fn reset(&mut self) {
        self.player.stop();
        self.sound = None;
    }

    /// Sample progress within `window`.
    pub fn tick(&self, window: RevealWindow) -> Tick {
        let position_ms = self
            .sound
            .and_then(|id| self.player.seek(id))
            .map_or(0, secs_to_millis);
        Tick {
            progress: PlaybackProgress {
                position_ms: position_ms.min(window.end_ms),
                window_ms: window.end_ms,
            },
            reschedule: self.player.is_loaded() && self.player.is_playing(),
        }
    }
}

/// Track id for a solution URI: the configured prefix is stripped.
#[must_use]
pub fn track_id<'a>(config: &PuzzleConfig, uri: &'a str) -> &'a str {
    uri.strip_prefix(config.track_uri_prefix.as_str())
        .unwrap_or(uri)
}

/// Location of the audio asset for a solution.
#[must_use]
pub fn audio_path(config: &PuzzleConfig, uri: &str) -> String {
    format!(
        "{}/{}.{}",
        config.audio_dir.trim_end_matches('/'),
        track_id(config, uri),
        config.audio_extension
    )
}

/// Embeddable player link revealed once a session is complete.
#[must_use]
pub fn embed_url(config: &PuzzleConfig, uri: &str) -> String {
    format!("{}{}", config.embed_url_prefix, track_id(config, uri))
}
