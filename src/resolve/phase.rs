//! Turn phases and their sequencing.
//!
//! Phase flow within a turn:
//! - Reinforce -> Attack (only once the reinforcement budget is spent)
//! - Attack    -> Fortify
//! - Fortify   -> Reinforce, with the other player to move

use serde::{Deserialize, Serialize};

/// The phase within a player's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Reinforce,
    Attack,
    Fortify,
}

impl Phase {
    /// Returns the human-readable label.
    pub const fn name(self) -> &'static str {
        match self {
            Phase::Reinforce => "Reinforce",
            Phase::Attack => "Attack",
            Phase::Fortify => "Fortify",
        }
    }

    /// Returns the phase that follows this one.
    pub const fn next(self) -> Phase {
        match self {
            Phase::Reinforce => Phase::Attack,
            Phase::Attack => Phase::Fortify,
            Phase::Fortify => Phase::Reinforce,
        }
    }

    /// Returns true if leaving this phase hands the turn to the opponent.
    pub const fn ends_turn(self) -> bool {
        matches!(self, Phase::Fortify)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true if the phase may be left with `reinforcements_left` unplaced.
pub fn can_leave(phase: Phase, reinforcements_left: u32) -> bool {
    match phase {
        Phase::Reinforce => reinforcements_left == 0,
        Phase::Attack | Phase::Fortify => true,
    }
}
