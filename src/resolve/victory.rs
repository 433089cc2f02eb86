//! Win detection.

use crate::board::{Board, Player, ALL_PLAYERS};
use crate::config::MatchConfig;

/// Returns the winner if a player owns exactly the winning number of
/// territories (`territories - win_margin`).
///
/// The first player is checked before the second. The comparison is an exact
/// match: captures move ownership one territory at a time, so a count can
/// only reach the threshold by landing on it. A board too small for the
/// margin has no winning count at all.
pub fn winner(board: &Board, config: &MatchConfig) -> Option<Player> {
    let threshold = config.win_threshold(board.len())?;
    ALL_PLAYERS
        .into_iter()
        .find(|&p| board.owned_count(p) == threshold)
}
