use super::Bank;
use crate::MAX_WORD_LEN;
use crate::dictionary::Dictionary;

/// Why a submission was refused. Rendered verbatim into `word:rejected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooShort,
    TooLong,
    NotAWord,
    NotInBank,
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::TooShort => write!(f, "too short"),
            Self::TooLong => write!(f, "too long (max {})", MAX_WORD_LEN),
            Self::NotAWord => write!(f, "not a word"),
            Self::NotInBank => write!(f, "not in bank"),
        }
    }
}

/// Why a yoink was refused with a reply. Lost races stay silent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Cooldown,
    BankFull,
}

impl std::fmt::Display for Denial {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Cooldown => write!(f, "cooldown"),
            Self::BankFull => write!(f, "bank full"),
        }
    }
}

/// A submission that passed every gate: the uppercased word and the bank
/// positions that spell it, in selection order.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub word: String,
    pub indices: Vec<usize>,
}

/// Gate a raw submission: charset, length bounds, dictionary membership,
/// then an exact bank spelling. Claimed indices must spell the word in
/// the claimed order; when omitted, a greedy leftmost reconstruction
/// stands in and rejects if no exact match exists.
pub fn validate(
    raw: &str,
    indices: Option<&[usize]>,
    bank: &Bank,
    dictionary: &Dictionary,
    min_len: usize,
) -> Result<Validated, Rejection> {
    let word = raw.trim().to_uppercase();
    if word.is_empty() || !word.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(Rejection::NotAWord);
    }
    if word.chars().count() < min_len {
        return Err(Rejection::TooShort);
    }
    if word.chars().count() > MAX_WORD_LEN {
        return Err(Rejection::TooLong);
    }
    if !dictionary.contains(&word) {
        return Err(Rejection::NotAWord);
    }
    let indices = match indices {
        Some(claimed) => {
            let distinct = claimed
                .iter()
                .enumerate()
                .all(|(i, x)| !claimed[..i].contains(x));
            let spelled = bank.spell(claimed).map(|letters| {
                letters.iter().map(|l| char::from(*l)).collect::<String>()
            });
            match (distinct, spelled) {
                (true, Some(spelled)) if spelled == word => claimed.to_vec(),
                _ => return Err(Rejection::NotInBank),
            }
        }
        None => bank.rebuild(&word).ok_or(Rejection::NotInBank)?,
    };
    Ok(Validated { word, indices })
}
