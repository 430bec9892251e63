use crate::BANK_CAPACITY;
use crate::letters::Letter;

/// A player's private ordered letter sequence, capacity 7. New letters
/// append at the tail; removal compacts survivors in order, so indices
/// shift down after every accepted word.
#[derive(Debug, Clone, Default)]
pub struct Bank {
    letters: Vec<Letter>,
}

impl Bank {
    pub fn letters(&self) -> &[Letter] {
        &self.letters
    }
    pub fn len(&self) -> usize {
        self.letters.len()
    }
    pub fn is_empty(&self) -> bool {
        self.letters.is_empty()
    }
    pub fn is_full(&self) -> bool {
        self.letters.len() >= BANK_CAPACITY
    }
    pub fn clear(&mut self) {
        self.letters.clear();
    }

    /// Append at the tail; refused at capacity.
    pub fn append(&mut self, letter: Letter) -> bool {
        match self.is_full() {
            true => false,
            false => {
                self.letters.push(letter);
                true
            }
        }
    }

    /// Letters at the given positions, in selection order. None if any
    /// position is out of range.
    pub fn spell(&self, indices: &[usize]) -> Option<Vec<Letter>> {
        indices
            .iter()
            .map(|&i| self.letters.get(i).copied())
            .collect()
    }

    /// Remove the given positions; survivors keep relative order.
    /// Refused wholesale when positions repeat or fall out of range.
    pub fn remove(&mut self, indices: &[usize]) -> bool {
        let distinct = indices
            .iter()
            .enumerate()
            .all(|(i, x)| !indices[..i].contains(x));
        if !distinct || indices.iter().any(|&i| i >= self.letters.len()) {
            return false;
        }
        let mut position = 0;
        self.letters.retain(|_| {
            let keep = !indices.contains(&position);
            position += 1;
            keep
        });
        true
    }

    /// Positions that spell `word` in order, greedily leftmost, when the
    /// bank can build it without reusing a tile.
    pub fn rebuild(&self, word: &str) -> Option<Vec<usize>> {
        let mut used = vec![false; self.letters.len()];
        let mut indices = Vec::with_capacity(word.len());
        for ch in word.chars() {
            let found = self
                .letters
                .iter()
                .enumerate()
                .find(|(i, l)| !used[*i] && char::from(**l) == ch)
                .map(|(i, _)| i)?;
            used[found] = true;
            indices.push(found);
        }
        Some(indices)
    }
}
