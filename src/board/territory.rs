//! Territory, player, and region types.
//!
//! A territory is identified by its index in the board's ordered territory
//! list. Ownership and army counts are the only mutable parts; neighbours
//! are fixed when the board is built.

use serde::{Deserialize, Serialize};

/// One of the two players in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    First,
    Second,
}

/// Both players in turn order.
pub const ALL_PLAYERS: [Player; 2] = [Player::First, Player::Second];

impl Player {
    /// Returns the zero-based seat index (0 for the first player).
    pub const fn index(self) -> usize {
        match self {
            Player::First => 0,
            Player::Second => 1,
        }
    }

    /// Returns the player for a zero-based seat index.
    pub fn from_index(idx: usize) -> Option<Player> {
        match idx {
            0 => Some(Player::First),
            1 => Some(Player::Second),
            _ => None,
        }
    }

    /// Returns the other player.
    pub const fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// Returns the lowercase name used in the text protocol.
    pub const fn name(self) -> &'static str {
        match self {
            Player::First => "first",
            Player::Second => "second",
        }
    }
}

/// World region a territory belongs to. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    NorthAmerica,
    SouthAmerica,
    Europe,
    Africa,
    Asia,
    Oceania,
}

impl Region {
    pub const fn name(self) -> &'static str {
        match self {
            Region::NorthAmerica => "North America",
            Region::SouthAmerica => "South America",
            Region::Europe => "Europe",
            Region::Africa => "Africa",
            Region::Asia => "Asia",
            Region::Oceania => "Oceania",
        }
    }
}

/// A single territory on the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Territory {
    pub name: String,
    pub region: Option<Region>,
    /// None only for unclaimed territories in custom maps.
    pub owner: Option<Player>,
    /// At least 1 whenever `owner` is set.
    pub armies: u32,
    /// Sorted, deduplicated neighbour indices.
    pub(crate) neighbors: Vec<usize>,
}

impl Territory {
    /// Returns the indices of adjacent territories in ascending order.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }

    /// Returns true if this territory is owned by `player`.
    pub fn is_owned_by(&self, player: Player) -> bool {
        self.owner == Some(player)
    }
}
