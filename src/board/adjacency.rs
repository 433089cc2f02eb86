//! Adjacency graph for the built-in world map, plus helpers for building and
//! checking neighbour lists of any map.
//!
//! The world table stores each border once as an undirected pair; neighbour
//! lists are expanded in both directions, so the built-in graph is symmetric
//! by construction. Custom maps are checked with [`find_asymmetry`].

/// Number of territories on the built-in world map.
pub const WORLD_TERRITORY_COUNT: usize = 14;

/// Number of undirected borders on the built-in world map.
pub const WORLD_BORDER_COUNT: usize = 22;

/// Every border of the world map, lower index first.
///
/// Index layout:
/// - 0-3: North America (NW, NE, SW, SE)
/// - 4-6: South America (north, west, south)
/// - 7-8: Europe (west, east)
/// - 9-10: Africa (north, south)
/// - 11: Middle East
/// - 12: Asia
/// - 13: Oceania
pub static WORLD_BORDERS: [(usize, usize); WORLD_BORDER_COUNT] = [
    // North America
    (0, 1),
    (0, 2),
    (1, 3),
    (2, 3),
    // Greenland / Iceland crossing
    (1, 7),
    // Bering crossing
    (1, 12),
    // Central America
    (2, 4),
    (3, 4),
    // South America
    (4, 5),
    (5, 6),
    // South Atlantic
    (4, 9),
    (5, 9),
    // Europe
    (7, 8),
    (7, 9),
    (8, 9),
    (8, 11),
    (8, 12),
    // Africa and the Middle East
    (9, 10),
    (9, 11),
    (10, 11),
    // Asia
    (11, 12),
    (12, 13),
];

/// Expands undirected borders into per-territory neighbour lists.
///
/// Lists come back sorted and deduplicated. Pairs that reference an index
/// outside `0..count` are skipped.
pub fn neighbor_lists(count: usize, borders: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut lists = vec![Vec::new(); count];
    for &(a, b) in borders {
        if a >= count || b >= count || a == b {
            continue;
        }
        lists[a].push(b);
        lists[b].push(a);
    }
    for list in &mut lists {
        list.sort_unstable();
        list.dedup();
    }
    lists
}

/// Returns the first directed edge `(from, to)` whose reverse is missing.
pub fn find_asymmetry(lists: &[Vec<usize>]) -> Option<(usize, usize)> {
    for (from, list) in lists.iter().enumerate() {
        for &to in list {
            let back = lists.get(to).is_some_and(|l| l.contains(&from));
            if !back {
                return Some((from, to));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn border_count() {
        assert_eq!(WORLD_BORDERS.len(), WORLD_BORDER_COUNT);
    }

    #[test]
    fn world_borders_are_in_range_and_ordered() {
        for &(a, b) in WORLD_BORDERS.iter() {
            assert!(a < WORLD_TERRITORY_COUNT && b < WORLD_TERRITORY_COUNT);
            assert!(a < b, "border ({}, {}) should list the lower index first", a, b);
        }
    }

    #[test]
    fn world_borders_have_no_duplicates() {
        for (i, x) in WORLD_BORDERS.iter().enumerate() {
            for y in WORLD_BORDERS.iter().skip(i + 1) {
                assert_ne!(x, y, "duplicate border {:?}", x);
            }
        }
    }

    #[test]
    fn world_graph_is_symmetric() {
        let lists = neighbor_lists(WORLD_TERRITORY_COUNT, &WORLD_BORDERS);
        assert_eq!(find_asymmetry(&lists), None);
        let directed: usize = lists.iter().map(Vec::len).sum();
        assert_eq!(directed, WORLD_BORDER_COUNT * 2);
    }

    #[test]
    fn every_territory_has_a_neighbor() {
        let lists = neighbor_lists(WORLD_TERRITORY_COUNT, &WORLD_BORDERS);
        for (i, list) in lists.iter().enumerate() {
            assert!(!list.is_empty(), "territory {} is isolated", i);
        }
    }

    #[test]
    fn known_neighbors_sample() {
        let lists = neighbor_lists(WORLD_TERRITORY_COUNT, &WORLD_BORDERS);
        assert_eq!(lists[9], vec![4, 5, 7, 8, 10, 11]);
        assert_eq!(lists[12], vec![1, 8, 11, 13]);
        assert_eq!(lists[1], vec![0, 3, 7, 12]);
        assert_eq!(lists[6], vec![5]);
        assert_eq!(lists[13], vec![12]);
    }

    #[test]
    fn neighbor_lists_skip_bad_pairs() {
        let lists = neighbor_lists(3, &[(0, 1), (1, 1), (2, 7), (1, 0)]);
        assert_eq!(lists, vec![vec![1], vec![0], vec![]]);
    }

    #[test]
    fn find_asymmetry_reports_one_way_edge() {
        let lists = vec![vec![1], vec![], vec![]];
        assert_eq!(find_asymmetry(&lists), Some((0, 1)));
        let lists = vec![vec![5]];
        assert_eq!(find_asymmetry(&lists), Some((0, 5)));
    }
}
