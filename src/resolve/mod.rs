//! Rule resolution.
//!
//! Dice battles, phase sequencing, and win detection.

pub mod combat;
pub mod phase;
pub mod victory;

pub use combat::{
    attack_dice, defense_dice, resolve_battle, BattleReport, Dice, ScriptedDice, DIE_FACES,
};
pub use phase::{can_leave, Phase};
pub use victory::winner;
