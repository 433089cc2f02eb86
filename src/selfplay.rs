//! Self-play match generation.
//!
//! Plays complete matches between two random legal-move agents and records
//! the outcome of each. Matches are independent, so batches run in parallel
//! on a rayon pool when more than one thread is configured.

use std::fmt;
use std::io::Write;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::board::{Board, Player, ALL_PLAYERS};
use crate::config::MatchConfig;
use crate::engine::{MatchEngine, MatchEvent};
use crate::movegen::random_action;

/// Errors that stop a self-play batch.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to write record: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for self-play generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of matches to play.
    pub num_games: usize,
    /// Number of parallel threads; 1 plays sequentially.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Turns after which an unfinished match is recorded as a draw.
    pub max_turns: u32,
    /// Probability that an agent keeps attacking when it can.
    pub aggression: f64,
    pub rules: MatchConfig,
    pub board: Board,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 100,
            threads: 4,
            seed: 0,
            max_turns: 200,
            aggression: 0.7,
            rules: MatchConfig::default(),
            board: Board::world(),
        }
    }
}

/// Outcome of one self-play match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub winner: Option<Player>,
    /// Turn the match ended on.
    pub turns: u32,
    pub actions: u32,
    pub battles: u32,
    pub captures: u32,
    /// Territories owned by each player at the end, by seat.
    pub territories: [usize; 2],
    /// Armies on the board for each player at the end, by seat.
    pub armies: [u32; 2],
}

fn game_rng(config: &SelfPlayConfig, game_id: usize) -> SmallRng {
    if config.seed != 0 {
        SmallRng::seed_from_u64(config.seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

/// Plays one match to completion or to the turn cap.
pub fn play_game(config: &SelfPlayConfig, game_id: usize, rng: &mut SmallRng) -> GameRecord {
    let dice = SmallRng::seed_from_u64(rng.gen());
    let mut engine = MatchEngine::with_dice(config.board.clone(), config.rules, dice);
    let mut actions = 0u32;
    let mut battles = 0u32;
    let mut captures = 0u32;

    while engine.turn() <= config.max_turns {
        let Some(action) = random_action(&engine, config.aggression, rng) else {
            break;
        };
        if !action.apply(&mut engine) {
            warn!(game_id, ?action, "agent chose a rejected action");
            break;
        }
        actions += 1;
        for event in engine.drain_events() {
            match event {
                MatchEvent::BattleResolved { .. } => battles += 1,
                MatchEvent::TerritoryCaptured { .. } => captures += 1,
                _ => {}
            }
        }
    }

    let board = engine.board();
    let record = GameRecord {
        game_id,
        winner: engine.winner(),
        turns: engine.turn(),
        actions,
        battles,
        captures,
        territories: ALL_PLAYERS.map(|p| board.owned_count(p)),
        armies: ALL_PLAYERS.map(|p| board.total_armies(p)),
    };
    debug!(game_id, winner = ?record.winner, turns = record.turns, "game finished");
    record
}

/// Plays every configured match and returns the records in game-id order.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    info!(
        games = config.num_games,
        threads = config.threads,
        seed = config.seed,
        "starting self-play"
    );
    if config.threads <= 1 {
        return Ok((0..config.num_games)
            .map(|i| play_game(config, i, &mut game_rng(config, i)))
            .collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;
    Ok(pool.install(|| {
        (0..config.num_games)
            .into_par_iter()
            .map(|i| play_game(config, i, &mut game_rng(config, i)))
            .collect()
    }))
}

/// Writes records as JSONL, one JSON object per line.
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> Result<(), SelfPlayError> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()?;
    Ok(())
}

/// Aggregate results of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub games: usize,
    pub wins: [usize; 2],
    pub draws: usize,
    pub avg_turns: f64,
    pub avg_battles: f64,
    /// Mean armies left on the board for each seat.
    pub avg_armies: [f64; 2],
}

/// Computes win counts and averages over a batch.
pub fn summarize(games: &[GameRecord]) -> Summary {
    let mut wins = [0usize; 2];
    let mut draws = 0usize;
    let mut turns = 0u64;
    let mut battles = 0u64;
    let mut armies = [0u64; 2];
    for game in games {
        match game.winner {
            Some(p) => wins[p.index()] += 1,
            None => draws += 1,
        }
        turns += u64::from(game.turns);
        battles += u64::from(game.battles);
        for p in ALL_PLAYERS {
            armies[p.index()] += u64::from(game.armies[p.index()]);
        }
    }
    let n = games.len().max(1) as f64;
    Summary {
        games: games.len(),
        wins,
        draws,
        avg_turns: turns as f64 / n,
        avg_battles: battles as f64 / n,
        avg_armies: armies.map(|a| a as f64 / n),
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.games.max(1) as f64;
        writeln!(f, "=== Self-Play Summary ===")?;
        writeln!(f, "Games: {}", self.games)?;
        writeln!(f, "Avg turns/game: {:.1}", self.avg_turns)?;
        writeln!(f, "Avg battles/game: {:.1}", self.avg_battles)?;
        writeln!(f, "Draws (turn cap): {}", self.draws)?;
        for p in ALL_PLAYERS {
            let w = self.wins[p.index()];
            writeln!(
                f,
                "  {:>6}: {} ({:.1}%), avg armies {:.1}",
                p.name(),
                w,
                100.0 * w as f64 / n,
                self.avg_armies[p.index()]
            )?;
        }
        Ok(())
    }
}
