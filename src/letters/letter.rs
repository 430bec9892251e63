use crate::Points;
use serde::Deserialize;
use serde::Serialize;

/// A letter of the fixed A..Z alphabet.
/// Internally an index 0..26, isomorphic to its uppercase char, which is
/// also its wire representation. Point tiers and spawn weights are fixed
/// tables over the alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "char", try_from = "char")]
pub struct Letter(u8);

impl Letter {
    pub const COUNT: u8 = 26;
    pub const TOTAL_WEIGHT: u32 = Self::total();

    pub fn all() -> impl Iterator<Item = Self> {
        (0..Self::COUNT).map(Self)
    }

    /// point tier, one of {10, 20, 30}
    pub const fn points(&self) -> Points {
        match (b'A' + self.0) as char {
            'A' | 'D' | 'E' | 'G' | 'I' | 'L' | 'N' | 'O' | 'R' | 'S' | 'T' | 'U' => 10,
            'B' | 'C' | 'F' | 'H' | 'K' | 'M' | 'P' | 'V' | 'W' | 'Y' => 20,
            'J' | 'Q' | 'X' | 'Z' => 30,
            _ => 0,
        }
    }

    /// relative spawn frequency in the shared pool
    pub const fn weight(&self) -> u32 {
        match (b'A' + self.0) as char {
            'E' => 12,
            'A' | 'I' => 9,
            'O' => 8,
            'N' | 'R' | 'T' => 6,
            'D' | 'L' | 'S' | 'U' => 4,
            'G' => 3,
            'B' | 'C' | 'F' | 'H' | 'M' | 'P' | 'V' | 'W' | 'Y' => 2,
            'J' | 'K' | 'Q' | 'X' | 'Z' => 1,
            _ => 0,
        }
    }

    const fn total() -> u32 {
        let mut sum = 0;
        let mut i = 0;
        while i < Self::COUNT {
            sum += Self(i).weight();
            i += 1;
        }
        sum
    }
}

// char isomorphism
impl From<Letter> for char {
    fn from(letter: Letter) -> char {
        (b'A' + letter.0) as char
    }
}
impl TryFrom<char> for Letter {
    type Error = String;
    fn try_from(c: char) -> Result<Self, Self::Error> {
        match c.to_ascii_uppercase() {
            upper @ 'A'..='Z' => Ok(Self(upper as u8 - b'A')),
            other => Err(format!("not a letter: {:?}", other)),
        }
    }
}

impl std::fmt::Display for Letter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", char::from(*self))
    }
}

impl crate::Arbitrary for Letter {
    fn random() -> Self {
        use rand::Rng;
        Self(rand::rng().random_range(0..Self::COUNT))
    }
}
