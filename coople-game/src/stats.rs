//! Lifetime guess-distribution counters.
use serde::{Deserialize, Serialize};

use crate::constants::MAX_GUESSES;
use crate::numbers::percent;
use crate::state::Completion;

/// Win counts per attempt number plus losses and a running total.
///
/// Serialized with the keys `"1"`..`"6"`, `"lose"` and `"total"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsRecord {
    #[serde(rename = "1")]
    pub won_in_1: u32,
    #[serde(rename = "2")]
    pub won_in_2: u32,
    #[serde(rename = "3")]
    pub won_in_3: u32,
    #[serde(rename = "4")]
    pub won_in_4: u32,
    #[serde(rename = "5")]
    pub won_in_5: u32,
    #[serde(rename = "6")]
    pub won_in_6: u32,
    pub lose: u32,
    pub total: u32,
}

impl StatsRecord {
    /// Count one finished session.
    ///
    /// Losses go to `lose`; wins go to the bucket for `attempts`. Callers must
    /// invoke this once per completed session: nothing here deduplicates.
    /// A win with an attempt count outside `1..=6` is ignored entirely so the
    /// total stays equal to the sum of the buckets.
    pub fn log_completion(&mut self, completion: Completion, attempts: usize) {
        let bucket = match completion {
            Completion::InProgress => {
                log::warn!("ignoring stats update for an unfinished session");
                return;
            }
            Completion::Lose => &mut self.lose,
            Completion::Win => match self.bucket_mut(attempts) {
                Some(bucket) => bucket,
                None => {
                    log::warn!("ignoring win recorded with {attempts} attempts");
                    return;
                }
            },
        };
        *bucket = bucket.saturating_add(1);
        self.total = self.total.saturating_add(1);
    }

    /// Wins on attempt `attempts` (1-based).
    #[must_use]
    pub const fn bucket(&self, attempts: usize) -> Option<u32> {
        match attempts {
            1 => Some(self.won_in_1),
            2 => Some(self.won_in_2),
            3 => Some(self.won_in_3),
            4 => Some(self.won_in_4),
            5 => Some(self.won_in_5),
            6 => Some(self.won_in_6),
            _ => None,
        }
    }

    fn bucket_mut(&mut self, attempts: usize) -> Option<&mut u32> {
        match attempts {
            1 => Some(&mut self.won_in_1),
            2 => Some(&mut self.won_in_2),
            3 => Some(&mut self.won_in_3),
            4 => Some(&mut self.won_in_4),
            5 => Some(&mut self.won_in_5),
            6 => Some(&mut self.won_in_6),
            _ => None,
        }
    }

    /// Win buckets in attempt order.
    #[must_use]
    pub const fn distribution(&self) -> [u32; MAX_GUESSES] {
        [
            self.won_in_1,
            self.won_in_2,
            self.won_in_3,
            self.won_in_4,
            self.won_in_5,
            self.won_in_6,
        ]
    }

    #[must_use]
    pub fn wins(&self) -> u32 {
        self.distribution().iter().sum()
    }

    /// Whole-number win percentage; zero before any game is played.
    #[must_use]
    pub fn win_percent(&self) -> u64 {
        percent(u64::from(self.wins()), u64::from(self.total))
    }

    /// Whether `total` equals the sum of all buckets.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        u64::from(self.wins()) + u64::from(self.lose) == u64::from(self.total)
    }
}
