use super::Letter;
use crate::Points;

/// Sum of letter point tiers across a word. Case-insensitive; anything
/// outside A..Z contributes nothing.
pub fn tally(word: &str) -> Points {
    word.chars()
        .filter_map(|c| Letter::try_from(c).ok())
        .map(|l| l.points())
        .sum()
}

/// Word score under a round multiplier:
/// round(points · (1 + 0.20·len) · multiplier), half away from zero.
pub fn score(word: &str, multiplier: f64) -> Points {
    let letters = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .count();
    let base = tally(word) as f64;
    (base * (1.0 + 0.20 * letters as f64) * multiplier).round() as Points
}
