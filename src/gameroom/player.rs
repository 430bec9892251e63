use super::Bank;
use super::Bucket;
use crate::ConnId;
use crate::MAX_NAME_LEN;
use crate::Points;
use crate::YOINK_COOLDOWN;
use tokio::time::Instant;

/// A connected player's room-scoped state. Created on join, dropped on
/// disconnect. The outbox is the send half of the session task that owns
/// the WebSocket; the room never touches the transport directly.
#[derive(Debug)]
pub struct Player {
    pub id: ConnId,
    pub name: String,
    pub bank: Bank,
    pub round_score: Points,
    pub cumulative_score: Points,
    pub words: Vec<String>,
    pub last_yoink: Option<Instant>,
    pub bucket: Bucket,
    pub outbox: tokio::sync::mpsc::UnboundedSender<String>,
}

impl Player {
    pub fn new(
        id: ConnId,
        name: &str,
        outbox: tokio::sync::mpsc::UnboundedSender<String>,
        now: Instant,
    ) -> Self {
        Self {
            id,
            name: Self::sanitize(name),
            bank: Bank::default(),
            round_score: 0,
            cumulative_score: 0,
            words: Vec::new(),
            last_yoink: None,
            bucket: Bucket::new(now),
            outbox,
        }
    }

    /// trimmed, capped at 16 chars, never empty
    pub fn sanitize(name: &str) -> String {
        let name = name.trim().chars().take(MAX_NAME_LEN).collect::<String>();
        match name.is_empty() {
            true => "anon".to_string(),
            false => name,
        }
    }

    /// clear per-round state at round start
    pub fn reset_round(&mut self) {
        self.bank.clear();
        self.round_score = 0;
        self.words.clear();
    }

    /// clear game-scoped state at game start
    pub fn reset_game(&mut self) {
        self.reset_round();
        self.cumulative_score = 0;
        self.last_yoink = None;
    }

    /// a yoink exactly at the cooldown boundary is allowed
    pub fn off_cooldown(&self, now: Instant) -> bool {
        self.last_yoink
            .map(|at| now.saturating_duration_since(at) >= YOINK_COOLDOWN)
            .unwrap_or(true)
    }
}
