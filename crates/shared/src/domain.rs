use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub i64);
    };
}

id_newtype!(PlayerId);

pub const MIN_PLAYERS: i64 = 2;
pub const MAX_PLAYERS: i64 = 5;

/// Number of players seated for a round. Only {2, 3, 4, 5} are
/// constructible; wire values outside that set fail to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct PlayerCount(i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid player count {0}; must be between {MIN_PLAYERS} and {MAX_PLAYERS}")]
pub struct InvalidPlayerCount(pub i64);

impl PlayerCount {
    pub fn new(count: i64) -> Result<Self, InvalidPlayerCount> {
        if (MIN_PLAYERS..=MAX_PLAYERS).contains(&count) {
            Ok(Self(count))
        } else {
            Err(InvalidPlayerCount(count))
        }
    }

    pub fn get(self) -> i64 {
        self.0
    }

    /// Seated player ids, in table order (1..=count).
    pub fn players(self) -> impl Iterator<Item = PlayerId> {
        (1..=self.0).map(PlayerId)
    }
}

impl Default for PlayerCount {
    fn default() -> Self {
        Self(MIN_PLAYERS)
    }
}

impl TryFrom<i64> for PlayerCount {
    type Error = InvalidPlayerCount;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerCount> for i64 {
    fn from(value: PlayerCount) -> i64 {
        value.0
    }
}
