use crate::SUBMIT_BURST;
use crate::SUBMIT_REFILL_PER_SEC;
use tokio::time::Instant;

/// Token bucket gating `word:submit` per connection: burst of 10, 5
/// tokens/sec refill, one token per submit. Starved submits are dropped
/// with no reply. Yoinks are governed by their own cooldown instead.
#[derive(Debug, Clone)]
pub struct Bucket {
    tokens: f64,
    filled: Instant,
}

impl Bucket {
    pub fn new(now: Instant) -> Self {
        Self {
            tokens: SUBMIT_BURST,
            filled: now,
        }
    }

    pub fn allow(&mut self, now: Instant) -> bool {
        let elapsed = now.saturating_duration_since(self.filled).as_secs_f64();
        self.tokens = (self.tokens + elapsed * SUBMIT_REFILL_PER_SEC).min(SUBMIT_BURST);
        self.filled = now;
        match self.tokens >= 1.0 {
            true => {
                self.tokens -= 1.0;
                true
            }
            false => false,
        }
    }
}
