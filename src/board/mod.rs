//! Board representation.
//!
//! Contains territories, players, the built-in world adjacency graph, map
//! descriptions, and the mutable board state.

pub mod adjacency;
pub mod map;
pub mod state;
pub mod territory;

pub use adjacency::{
    find_asymmetry, neighbor_lists, WORLD_BORDERS, WORLD_BORDER_COUNT, WORLD_TERRITORY_COUNT,
};
pub use map::{MapError, MapSpec, TerritorySpec, WORLD_STARTING_ARMIES, WORLD_TERRITORIES};
pub use state::Board;
pub use territory::{Player, Region, Territory, ALL_PLAYERS};
