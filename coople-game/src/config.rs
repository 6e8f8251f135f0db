//! Runtime-tunable puzzle configuration.
use serde::{Deserialize, Serialize};

use crate::audio::StageLengths;
use crate::constants::{
    AUDIO_DIR, AUDIO_EXTENSION, EMBED_URL_PREFIX, PUZZLE_NAME, SEARCH_MAX_MATCHES, SHARE_URL,
    TRACK_URI_PREFIX,
};

/// Presentation and asset settings for a puzzle deployment.
///
/// Every field has a default, so a partial JSON document only overrides the
/// keys it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Name used as the first word of the share text.
    pub puzzle_name: String,
    /// Link appended to the share text.
    pub share_url: String,
    pub stages: StageLengths,
    /// Autocomplete suggestion limit
    pub search_limit: usize,
    pub track_uri_prefix: String,
    pub audio_dir: String,
    pub audio_extension: String,
    pub embed_url_prefix: String,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            puzzle_name: PUZZLE_NAME.to_string(),
            share_url: SHARE_URL.to_string(),
            stages: StageLengths::default(),
            search_limit: SEARCH_MAX_MATCHES,
            track_uri_prefix: TRACK_URI_PREFIX.to_string(),
            audio_dir: AUDIO_DIR.to_string(),
            audio_extension: AUDIO_EXTENSION.to_string(),
            embed_url_prefix: EMBED_URL_PREFIX.to_string(),
        }
    }
}

impl PuzzleConfig {
    /// Parse configuration JSON, filling missing keys from defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = PuzzleConfig::from_json(r#"{"puzzle_name": "tunele", "search_limit": 8}"#)
            .unwrap();
        assert_eq!(cfg.puzzle_name, "tunele");
        assert_eq!(cfg.search_limit, 8);
        assert_eq!(cfg.share_url, SHARE_URL);
        assert_eq!(cfg.stages, StageLengths::default());
    }

    #[test]
    fn stage_override_requires_six_values() {
        let ok = PuzzleConfig::from_json(r#"{"stages": [1, 1, 1, 1, 1, 1]}"#).unwrap();
        assert_eq!(ok.stages.total_ms(), 6);
        assert!(PuzzleConfig::from_json(r#"{"stages": [1, 2]}"#).is_err());
    }
}
