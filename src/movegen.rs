//! Legal move generation.
//!
//! Lists the inputs each command would accept in the current match state,
//! and picks random legal commands for self-play agents. Every list here
//! agrees with what the engine accepts: feeding any returned territory to the
//! matching command succeeds.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, Player};
use crate::engine::MatchEngine;
use crate::resolve::{Dice, Phase};

/// A single engine command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Reinforce(usize),
    AttackFrom(usize),
    AttackTarget(usize),
    FortifyFrom(usize),
    FortifyTarget(usize),
    Advance,
}

impl Action {
    /// Applies the action to `engine`. Returns true if it was accepted.
    pub fn apply<D: Dice>(self, engine: &mut MatchEngine<D>) -> bool {
        match self {
            Action::Reinforce(t) => engine.place_reinforcement(t).is_ok(),
            Action::AttackFrom(t) => engine.select_attack_source(t).is_ok(),
            Action::AttackTarget(t) => engine.select_attack_target(t).is_ok(),
            Action::FortifyFrom(t) => engine.select_fortify_source(t).is_ok(),
            Action::FortifyTarget(t) => engine.select_fortify_target(t).is_ok(),
            Action::Advance => engine.advance_phase().is_ok(),
        }
    }
}

fn mobile(board: &Board, player: Player) -> impl Iterator<Item = usize> + '_ {
    board
        .territories()
        .iter()
        .enumerate()
        .filter(move |(_, t)| t.is_owned_by(player) && t.armies >= 2)
        .map(|(i, _)| i)
}

/// Territories the current player may reinforce right now.
pub fn reinforceable<D: Dice>(engine: &MatchEngine<D>) -> Vec<usize> {
    if engine.is_game_over()
        || engine.phase() != Phase::Reinforce
        || engine.reinforcements_left() == 0
    {
        return Vec::new();
    }
    let player = engine.current_player();
    engine
        .board()
        .territories()
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_owned_by(player))
        .map(|(i, _)| i)
        .collect()
}

/// Territories that could start an attack and border at least one enemy
/// or unclaimed territory holding armies.
pub fn attack_sources<D: Dice>(engine: &MatchEngine<D>) -> Vec<usize> {
    if engine.is_game_over() || engine.phase() != Phase::Attack {
        return Vec::new();
    }
    let board = engine.board();
    let player = engine.current_player();
    mobile(board, player)
        .filter(|&from| !targets_from(board, player, from).is_empty())
        .collect()
}

/// Territories that `from` could attack.
pub fn attack_targets<D: Dice>(engine: &MatchEngine<D>, from: usize) -> Vec<usize> {
    if engine.is_game_over() || engine.phase() != Phase::Attack {
        return Vec::new();
    }
    let board = engine.board();
    let player = engine.current_player();
    if !board.is_owner(from, player) || board.armies(from).unwrap_or(0) < 2 {
        return Vec::new();
    }
    targets_from(board, player, from)
}

fn targets_from(board: &Board, player: Player, from: usize) -> Vec<usize> {
    board
        .neighbors(from)
        .iter()
        .copied()
        .filter(|&n| !board.is_owner(n, player) && board.armies(n).unwrap_or(0) > 0)
        .collect()
}

/// Territories that could give an army to a friendly neighbour this turn.
pub fn fortify_sources<D: Dice>(engine: &MatchEngine<D>) -> Vec<usize> {
    if engine.is_game_over() || engine.phase() != Phase::Fortify || engine.fortify_done() {
        return Vec::new();
    }
    let board = engine.board();
    let player = engine.current_player();
    mobile(board, player)
        .filter(|&from| board.neighbors(from).iter().any(|&n| board.is_owner(n, player)))
        .collect()
}

/// Friendly neighbours of `from` that could receive its army.
pub fn fortify_targets<D: Dice>(engine: &MatchEngine<D>, from: usize) -> Vec<usize> {
    if engine.is_game_over() || engine.phase() != Phase::Fortify || engine.fortify_done() {
        return Vec::new();
    }
    let board = engine.board();
    let player = engine.current_player();
    if !board.is_owner(from, player) || board.armies(from).unwrap_or(0) < 2 {
        return Vec::new();
    }
    board
        .neighbors(from)
        .iter()
        .copied()
        .filter(|&n| board.is_owner(n, player))
        .collect()
}

/// Picks one random legal action for the player to move.
///
/// Reinforcements are spread at random until spent. In the Attack phase the
/// agent attacks with probability `aggression` while any attack is possible,
/// otherwise it advances. In Fortify it makes one random move half the time.
/// Returns None once the game is over.
pub fn random_action<D: Dice>(
    engine: &MatchEngine<D>,
    aggression: f64,
    rng: &mut impl Rng,
) -> Option<Action> {
    if engine.is_game_over() {
        return None;
    }
    let action = match engine.phase() {
        Phase::Reinforce => match reinforceable(engine).choose(rng) {
            Some(&t) => Action::Reinforce(t),
            None => Action::Advance,
        },
        Phase::Attack => {
            let source = engine
                .attack_selection()
                .source()
                .filter(|&from| !attack_targets(engine, from).is_empty());
            match source {
                Some(from) if rng.gen_bool(aggression.clamp(0.0, 1.0)) => {
                    match attack_targets(engine, from).choose(rng) {
                        Some(&to) => Action::AttackTarget(to),
                        None => Action::Advance,
                    }
                }
                Some(_) => Action::Advance,
                None => match attack_sources(engine).choose(rng) {
                    Some(&from) if rng.gen_bool(aggression.clamp(0.0, 1.0)) => {
                        Action::AttackFrom(from)
                    }
                    _ => Action::Advance,
                },
            }
        }
        Phase::Fortify => match engine.fortify_selection().source() {
            Some(from) => match fortify_targets(engine, from).choose(rng) {
                Some(&to) => Action::FortifyTarget(to),
                None => Action::Advance,
            },
            None => match fortify_sources(engine).choose(rng) {
                Some(&from) if rng.gen_bool(0.5) => Action::FortifyFrom(from),
                _ => Action::Advance,
            },
        },
    };
    Some(action)
}
