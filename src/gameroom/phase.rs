use serde::Serialize;

/// Room lifecycle phase. `game:start` moves Lobby and Finished into
/// Playing; the round clock drives the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Lobby,
    Playing,
    Intermission,
    Finished,
}

impl Phase {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "lobby"),
            Self::Playing => write!(f, "playing"),
            Self::Intermission => write!(f, "intermission"),
            Self::Finished => write!(f, "finished"),
        }
    }
}
