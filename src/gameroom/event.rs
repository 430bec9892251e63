use super::Patch;
use super::Phase;
use super::Settings;
use crate::ConnId;
use crate::Points;
use crate::letters::Letter;
use serde::Deserialize;
use serde::Serialize;

/// Inbound events from clients, tagged by name. Unknown names and
/// malformed payloads fail to parse and are dropped by the session.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    #[serde(rename = "lobby:join")]
    Join { room: String, name: String },
    #[serde(rename = "game:start")]
    Start,
    #[serde(rename = "settings:update")]
    Update(Patch),
    #[serde(rename = "tile:yoink")]
    Yoink { index: usize },
    #[serde(rename = "word:submit")]
    Submit {
        word: String,
        #[serde(default)]
        indices: Option<Vec<usize>>,
    },
}

/// Outbound events. `lobby:state` is the per-viewer [`Projection`]; the
/// variants here are shared and serialize identically for every
/// recipient.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum ServerEvent {
    #[serde(rename = "tile:yoinked", rename_all = "camelCase")]
    Yoinked {
        player_id: ConnId,
        player_name: String,
        index: usize,
        letter: Letter,
    },
    #[serde(rename = "word:accepted", rename_all = "camelCase")]
    Accepted {
        player_id: ConnId,
        name: String,
        word: String,
        letters: Vec<Letter>,
        points: Points,
        feed: String,
    },
    #[serde(rename = "word:rejected")]
    Rejected { word: String, reason: String },
    #[serde(rename = "yoink:rejected")]
    Denied { reason: String },
    #[serde(rename = "round:ended", rename_all = "camelCase")]
    RoundEnded {
        round: usize,
        total_rounds: usize,
        leaderboard: Vec<Standing>,
    },
    #[serde(rename = "game:ended")]
    GameEnded { leaderboard: Vec<Standing> },
}

impl ServerEvent {
    pub fn yoinked(player_id: ConnId, player_name: String, index: usize, letter: Letter) -> Self {
        Self::Yoinked {
            player_id,
            player_name,
            index,
            letter,
        }
    }
    pub fn accepted(player_id: ConnId, name: String, word: String, points: Points) -> Self {
        let feed = format!("{} played \"{}\" for {} points", name, word, points);
        let letters = word.chars().filter_map(|c| Letter::try_from(c).ok()).collect();
        Self::Accepted {
            player_id,
            name,
            word,
            letters,
            points,
            feed,
        }
    }
    pub fn rejected(word: String, reason: impl std::fmt::Display) -> Self {
        Self::Rejected {
            word,
            reason: reason.to_string(),
        }
    }
    pub fn denied(reason: impl std::fmt::Display) -> Self {
        Self::Denied {
            reason: reason.to_string(),
        }
    }
    pub fn round_ended(round: usize, total_rounds: usize, leaderboard: Vec<Standing>) -> Self {
        Self::RoundEnded {
            round,
            total_rounds,
            leaderboard,
        }
    }
    pub fn game_ended(leaderboard: Vec<Standing>) -> Self {
        Self::GameEnded { leaderboard }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server event")
    }
}

/// One leaderboard row. Rows sort by cumulative score descending with
/// name ascending as the stable tiebreak.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub id: ConnId,
    pub name: String,
    pub round_score: Points,
    pub cumulative_score: Points,
}

/// Public roster line in the projection.
#[derive(Debug, Clone, Serialize)]
pub struct Roster {
    pub id: ConnId,
    pub name: String,
}

/// Room-wide portion of the `lobby:state` projection, computed once per
/// broadcast and shared by reference across every viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Shared {
    pub settings: Settings,
    pub players: Vec<Roster>,
    pub pool: Vec<Option<Letter>>,
    pub phase: Phase,
    pub current_round: usize,
    pub total_rounds: usize,
    pub round_multiplier: f64,
    pub scores_hidden: bool,
    pub ends_in_ms: Option<u64>,
}

/// The full `lobby:state` message for one viewer: the shared fields plus
/// the viewer's private bank and score.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename = "lobby:state", rename_all = "camelCase")]
pub struct Projection<'a> {
    pub id: ConnId,
    pub bank: &'a [Letter],
    pub my_score: Points,
    #[serde(flatten)]
    pub shared: &'a Shared,
}
