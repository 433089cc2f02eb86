//! Map descriptions and validation.
//!
//! A `MapSpec` is the static input to a match: the ordered territory list
//! with names, regions, adjacency, and starting owners and armies. It is
//! usually produced by a map-loading step (JSON) and turned into a
//! [`Board`] once, at match start.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::adjacency::{find_asymmetry, neighbor_lists, WORLD_BORDERS, WORLD_TERRITORY_COUNT};
use super::state::Board;
use super::territory::{Player, Region, Territory};

/// Starting armies on every territory of the built-in map.
pub const WORLD_STARTING_ARMIES: u32 = 3;

/// Names and regions of the built-in world territories, by index.
pub static WORLD_TERRITORIES: [(&str, Region); WORLD_TERRITORY_COUNT] = [
    ("North America North-West", Region::NorthAmerica),
    ("North America North-East", Region::NorthAmerica),
    ("North America South-West", Region::NorthAmerica),
    ("North America South-East", Region::NorthAmerica),
    ("South America North", Region::SouthAmerica),
    ("South America West", Region::SouthAmerica),
    ("South America South", Region::SouthAmerica),
    ("Western Europe", Region::Europe),
    ("Eastern Europe", Region::Europe),
    ("North Africa", Region::Africa),
    ("South Africa", Region::Africa),
    ("Middle East", Region::Asia),
    ("Asia", Region::Asia),
    ("Oceania", Region::Oceania),
];

/// Errors raised while loading or validating a map description.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("map has no territories")]
    Empty,

    #[error("territory {territory} lists neighbor {neighbor}, but the map has {count} territories")]
    NeighborOutOfRange {
        territory: usize,
        neighbor: usize,
        count: usize,
    },

    #[error("territory {0} lists itself as a neighbor")]
    SelfAdjacent(usize),

    #[error("territory {territory} lists neighbor {neighbor} more than once")]
    DuplicateNeighbor { territory: usize, neighbor: usize },

    #[error("territory {from} borders {to}, but {to} does not border {from}")]
    Asymmetric { from: usize, to: usize },

    #[error("territory {0} has an owner but no armies")]
    OwnedWithoutArmies(usize),

    #[error("failed to read map file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse map: {0}")]
    Json(#[from] serde_json::Error),
}

/// One territory in a map description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerritorySpec {
    pub name: String,
    #[serde(default)]
    pub region: Option<Region>,
    pub neighbors: Vec<usize>,
    #[serde(default)]
    pub owner: Option<Player>,
    #[serde(default)]
    pub armies: u32,
}

/// A complete map description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapSpec {
    pub territories: Vec<TerritorySpec>,
}

impl MapSpec {
    /// Returns the built-in 14-territory world map.
    ///
    /// Ownership alternates by index parity (even indices to the first
    /// player) and every territory starts with 3 armies.
    pub fn world() -> Self {
        let lists = neighbor_lists(WORLD_TERRITORY_COUNT, &WORLD_BORDERS);
        let territories = WORLD_TERRITORIES
            .iter()
            .zip(lists)
            .enumerate()
            .map(|(i, (&(name, region), neighbors))| TerritorySpec {
                name: name.to_string(),
                region: Some(region),
                neighbors,
                owner: Player::from_index(i % 2),
                armies: WORLD_STARTING_ARMIES,
            })
            .collect();
        MapSpec { territories }
    }

    /// Parses a map description from JSON text.
    pub fn from_json(text: &str) -> Result<Self, MapError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a map description from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Serializes the description back to JSON.
    pub fn to_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates the description and builds a board from it.
    pub fn build(&self) -> Result<Board, MapError> {
        let count = self.territories.len();
        if count == 0 {
            return Err(MapError::Empty);
        }

        let mut lists = Vec::with_capacity(count);
        for (i, t) in self.territories.iter().enumerate() {
            let mut seen = Vec::with_capacity(t.neighbors.len());
            for &n in &t.neighbors {
                if n >= count {
                    return Err(MapError::NeighborOutOfRange {
                        territory: i,
                        neighbor: n,
                        count,
                    });
                }
                if n == i {
                    return Err(MapError::SelfAdjacent(i));
                }
                if seen.contains(&n) {
                    return Err(MapError::DuplicateNeighbor {
                        territory: i,
                        neighbor: n,
                    });
                }
                seen.push(n);
            }
            if t.owner.is_some() && t.armies == 0 {
                return Err(MapError::OwnedWithoutArmies(i));
            }
            seen.sort_unstable();
            lists.push(seen);
        }

        if let Some((from, to)) = find_asymmetry(&lists) {
            return Err(MapError::Asymmetric { from, to });
        }

        let territories = self
            .territories
            .iter()
            .zip(lists)
            .map(|(t, neighbors)| Territory {
                name: t.name.clone(),
                region: t.region,
                owner: t.owner,
                armies: t.armies,
                neighbors,
            })
            .collect();
        Ok(Board::new(territories))
    }
}
