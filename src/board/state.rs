//! Board state.
//!
//! Holds the ordered territory list of a match. The set of territories and
//! their borders never change after construction; only owners and army
//! counts are mutated, and only by the match engine.

use super::map::MapSpec;
use super::territory::{Player, Territory};

/// Every territory of a match, indexed by territory id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    territories: Vec<Territory>,
}

impl Board {
    pub(crate) fn new(territories: Vec<Territory>) -> Self {
        Board { territories }
    }

    /// Builds the built-in 14-territory world board.
    pub fn world() -> Self {
        let territories = MapSpec::world()
            .territories
            .into_iter()
            .map(|t| Territory {
                name: t.name,
                region: t.region,
                owner: t.owner,
                armies: t.armies,
                neighbors: t.neighbors,
            })
            .collect();
        Board::new(territories)
    }

    /// Returns the number of territories.
    pub fn len(&self) -> usize {
        self.territories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.territories.is_empty()
    }

    /// Returns all territories in index order.
    pub fn territories(&self) -> &[Territory] {
        &self.territories
    }

    /// Returns the territory at `idx`, or None if out of range.
    pub fn territory(&self, idx: usize) -> Option<&Territory> {
        self.territories.get(idx)
    }

    pub(crate) fn territory_mut(&mut self, idx: usize) -> Option<&mut Territory> {
        self.territories.get_mut(idx)
    }

    /// Returns the owner of `idx`. Out-of-range indices read as unowned.
    pub fn owner(&self, idx: usize) -> Option<Player> {
        self.territory(idx).and_then(|t| t.owner)
    }

    /// Returns the army count at `idx`, or None if out of range.
    pub fn armies(&self, idx: usize) -> Option<u32> {
        self.territory(idx).map(|t| t.armies)
    }

    /// Returns the neighbours of `idx`; empty if out of range.
    pub fn neighbors(&self, idx: usize) -> &[usize] {
        self.territory(idx).map(Territory::neighbors).unwrap_or(&[])
    }

    /// Returns true if `idx` is owned by `player`.
    pub fn is_owner(&self, idx: usize, player: Player) -> bool {
        self.owner(idx) == Some(player)
    }

    /// Returns true if `a` and `b` share a border. False for any out-of-range index.
    pub fn is_adjacent(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Counts the territories owned by `player`.
    pub fn owned_count(&self, player: Player) -> usize {
        self.territories
            .iter()
            .filter(|t| t.owner == Some(player))
            .count()
    }

    /// Sums the armies of every territory owned by `player`.
    pub fn total_armies(&self, player: Player) -> u32 {
        self.territories
            .iter()
            .filter(|t| t.owner == Some(player))
            .map(|t| t.armies)
            .sum()
    }

    /// Returns the first territory breaking the army invariant: an owned
    /// territory must hold at least one army.
    pub fn army_violation(&self) -> Option<usize> {
        self.territories
            .iter()
            .position(|t| t.owner.is_some() && t.armies == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::adjacency::WORLD_TERRITORY_COUNT;

    #[test]
    fn world_board_matches_world_spec() {
        let board = Board::world();
        let built = MapSpec::world().build().unwrap();
        assert_eq!(board, built);
        assert_eq!(board.len(), WORLD_TERRITORY_COUNT);
        assert!(!board.is_empty());
    }

    #[test]
    fn adjacency_is_symmetric_for_all_pairs() {
        let board = Board::world();
        for a in 0..board.len() {
            for b in 0..board.len() {
                assert_eq!(
                    board.is_adjacent(a, b),
                    board.is_adjacent(b, a),
                    "asymmetric pair ({}, {})",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn out_of_range_queries_are_safe() {
        let board = Board::world();
        assert!(board.territory(99).is_none());
        assert_eq!(board.owner(99), None);
        assert_eq!(board.armies(99), None);
        assert!(board.neighbors(99).is_empty());
        assert!(!board.is_adjacent(0, 99));
        assert!(!board.is_adjacent(99, 0));
        assert!(!board.is_owner(99, Player::First));
    }

    #[test]
    fn initial_counts_are_even() {
        let board = Board::world();
        assert_eq!(board.owned_count(Player::First), 7);
        assert_eq!(board.owned_count(Player::Second), 7);
        assert_eq!(board.total_armies(Player::First), 21);
        assert_eq!(board.army_violation(), None);
    }

    #[test]
    fn army_violation_detects_empty_owned_territory() {
        let mut board = Board::world();
        board.territory_mut(4).unwrap().armies = 0;
        assert_eq!(board.army_violation(), Some(4));
    }
}
