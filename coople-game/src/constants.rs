//! Fixed parameters of the daily puzzle format.
//!
//! These values define the shape of every puzzle: how many attempts a player
//! gets, how the audio reveal grows, and how results are shared. Runtime
//! overrides go through [`crate::PuzzleConfig`]; the constants here are its
//! defaults.

// Puzzle shape -------------------------------------------------------------
/// Number of guesses allowed per puzzle.
pub const MAX_GUESSES: usize = 6;
/// Audio stage increments in milliseconds, one per guess slot.
pub const STAGE_LENGTHS_MS: [u32; MAX_GUESSES] = [2000, 2000, 3000, 3000, 5000, 5000];
/// Maximum number of autocomplete suggestions returned by the matcher.
pub const SEARCH_MAX_MATCHES: usize = 5;

// Sharing ------------------------------------------------------------------
pub const PUZZLE_NAME: &str = "coople";
pub const SHARE_URL: &str = "https://coopers.casa/coople/";
pub const SHARE_DENOMINATOR: usize = MAX_GUESSES;
pub const SHARE_LOSE_LABEL: &str = "X";
pub const GLYPH_WIN: &str = "🟩";
pub const GLYPH_FILLER: &str = "⬜";
pub const GLYPH_NOT_YET: &str = "🟧";

// Audio assets -------------------------------------------------------------
pub const TRACK_URI_PREFIX: &str = "spotify:track:";
pub const AUDIO_DIR: &str = "./data/audio";
pub const AUDIO_EXTENSION: &str = "mp3";
pub const EMBED_URL_PREFIX: &str = "https://open.spotify.com/embed/track/";
pub(crate) const SPRITE_PREFIX: &str = "aspr_";

// Storage ------------------------------------------------------------------
pub(crate) const STATS_NAMESPACE: &str = "stats";
pub(crate) const ITEM_STATE: &str = "state";
pub(crate) const ITEM_COUNTS: &str = "counts";

// Player-facing copy -------------------------------------------------------
pub const MSG_GUESS_UNKNOWN: &str = "Don't know that one. Pick from the list.";
pub const MSG_WIN: &str = "Yay! You did it! :)";
pub const MSG_LOSE: &str = "Sorry. Better luck tomorrow!";
pub const MSG_SHARE_COPIED: &str = "Link copied to clipboard!";
pub const MSG_SHARE_FAILED: &str = "Error: Link could not be copied to clipboard :(";
