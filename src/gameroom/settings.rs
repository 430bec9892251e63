use crate::BANK_CAPACITY;
use crate::MAX_WORD_LEN;
use crate::MULTIPLIERS;
use crate::YOINK_COOLDOWN;
use serde::Deserialize;
use serde::Serialize;
use std::time::Duration;

/// Host-adjustable room settings. Every inbound value clamps on arrival;
/// the fixed fields are included so clients render limits without
/// hardcoding them.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub rounds: usize,
    pub round_duration_sec: u64,
    pub intermission_sec: u64,
    pub min_len: usize,
    pub max_len: usize,
    pub bank_capacity: usize,
    pub yoink_cooldown_ms: u64,
}

/// Partial update from `settings:update`; absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patch {
    pub rounds: Option<usize>,
    pub round_duration_sec: Option<u64>,
    pub intermission_sec: Option<u64>,
    pub min_len: Option<usize>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rounds: 3,
            round_duration_sec: 60,
            intermission_sec: 10,
            min_len: 3,
            max_len: MAX_WORD_LEN,
            bank_capacity: BANK_CAPACITY,
            yoink_cooldown_ms: YOINK_COOLDOWN.as_millis() as u64,
        }
    }
}

impl Settings {
    pub fn apply(&mut self, patch: &Patch) {
        if let Some(rounds) = patch.rounds {
            self.rounds = rounds.clamp(1, 5);
        }
        if let Some(secs) = patch.round_duration_sec {
            self.round_duration_sec = secs.clamp(15, 300);
        }
        if let Some(secs) = patch.intermission_sec {
            self.intermission_sec = secs.clamp(3, 30);
        }
        if let Some(len) = patch.min_len {
            self.min_len = len.clamp(2, 6);
        }
    }

    pub fn round_duration(&self) -> Duration {
        Duration::from_secs(self.round_duration_sec)
    }
    pub fn intermission(&self) -> Duration {
        Duration::from_secs(self.intermission_sec)
    }

    /// score multiplier for a 1-based round; rounds past the table reuse
    /// the final entry, round 0 (lobby) reads 1.0
    pub fn multiplier(&self, round: usize) -> f64 {
        match round {
            0 => 1.0,
            r => MULTIPLIERS
                .get(r - 1)
                .copied()
                .unwrap_or(MULTIPLIERS[MULTIPLIERS.len() - 1]),
        }
    }
}
