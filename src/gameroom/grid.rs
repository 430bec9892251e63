use crate::GRID_SIZE;
use crate::SPAWN_CEILING_MS;
use crate::SPAWN_FLOOR_MS;
use crate::letters::Bag;
use crate::letters::Letter;
use std::time::Duration;
use tokio::time::Instant;

/// The 16-slot shared pool. Slot identity is the index: a yoinked slot
/// goes empty and is later refilled in place, possibly with a different
/// letter. All mutation happens inside the owning room task.
#[derive(Debug, Clone)]
pub struct Grid {
    slots: [Option<Letter>; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            slots: [None; GRID_SIZE],
        }
    }
}

impl Grid {
    pub fn slots(&self) -> &[Option<Letter>; GRID_SIZE] {
        &self.slots
    }
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }
    pub fn vacancies(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    /// Empty a slot and return what it held. None when out of range or
    /// already empty: the losing side of a yoink race.
    pub fn take(&mut self, index: usize) -> Option<Letter> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Fill one uniformly-chosen empty slot from the bag.
    /// Returns the filled index, or None when there was nothing to fill.
    pub fn spawn(&mut self, bag: &mut Bag) -> Option<usize> {
        let vacancies = self.vacancies();
        match vacancies.is_empty() {
            true => None,
            false => {
                let index = vacancies[bag.index(vacancies.len())];
                self.slots[index] = Some(bag.letter());
                Some(index)
            }
        }
    }

    /// Fill every slot. Rounds begin with a full grid so the spawn loop
    /// starts idle.
    pub fn refill(&mut self, bag: &mut Bag) {
        for slot in self.slots.iter_mut() {
            *slot = Some(bag.letter());
        }
    }

    /// Replenishment curve: 500ms when empty scaling linearly up to 10s
    /// at 15/16 full. Undefined at n = 16; callers schedule no spawn then.
    pub fn interval(n: usize) -> Duration {
        let span = (SPAWN_CEILING_MS - SPAWN_FLOOR_MS) as f64;
        let ms = SPAWN_FLOOR_MS as f64 + span * (n as f64 / (GRID_SIZE - 1) as f64);
        Duration::from_millis(ms as u64)
    }

    /// Next spawn deadline given current contents; None when full.
    pub fn next_spawn(&self, now: Instant) -> Option<Instant> {
        match self.is_full() {
            true => None,
            false => Some(now + Self::interval(self.count())),
        }
    }
}
