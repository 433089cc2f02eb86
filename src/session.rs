//! Protocol session state.
//!
//! Holds the current match, the map and rule options it was started from,
//! and the dice seed, and turns parsed commands into engine calls and
//! protocol output.

use std::io::{self, Write};

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{info, warn};

use crate::board::{Board, MapError, MapSpec};
use crate::config::{ConfigError, MatchConfig};
use crate::engine::{MatchEngine, Rejection};
use crate::movegen::{attack_sources, attack_targets, fortify_sources, fortify_targets, reinforceable};
use crate::protocol::{format_event, join_list, write_state, Command};
use crate::resolve::Phase;

/// Holds the mutable state of a protocol session between commands.
pub struct Session {
    map: MapSpec,
    config: MatchConfig,
    seed: Option<u64>,
    engine: MatchEngine,
}

impl Session {
    /// Creates a session on the built-in world map with standard rules.
    pub fn new() -> Self {
        let config = MatchConfig::default();
        Session {
            map: MapSpec::world(),
            config,
            seed: None,
            engine: MatchEngine::new(Board::world(), config),
        }
    }

    /// Creates a session from a map and rules; fails if the map is invalid.
    pub fn with_setup(map: MapSpec, config: MatchConfig, seed: Option<u64>) -> Result<Self, MapError> {
        let engine = Self::start(&map, config, seed)?;
        Ok(Session {
            map,
            config,
            seed,
            engine,
        })
    }

    fn start(map: &MapSpec, config: MatchConfig, seed: Option<u64>) -> Result<MatchEngine, MapError> {
        let board = map.build()?;
        let dice = match seed {
            Some(s) => SmallRng::seed_from_u64(s),
            None => SmallRng::from_entropy(),
        };
        Ok(MatchEngine::with_dice(board, config, dice))
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Starts a fresh match with the current map, rules, and seed.
    pub fn new_game(&mut self) -> Result<(), MapError> {
        self.engine = Self::start(&self.map, self.config, self.seed)?;
        info!(territories = self.map.territories.len(), "new game");
        Ok(())
    }

    /// Loads a map file and starts a match on it. Keeps the old map on error.
    pub fn load_map(&mut self, path: &str) -> Result<(), MapError> {
        let map = MapSpec::from_path(path)?;
        let engine = Self::start(&map, self.config, self.seed)?;
        self.map = map;
        self.engine = engine;
        info!(path, "map loaded");
        Ok(())
    }

    /// Sets the dice seed used by the next `newgame`.
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = Some(seed);
    }

    /// Sets a rule option for the next `newgame`.
    pub fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        self.config.set_option(name, value)
    }

    /// Handles one command, writing responses to `out`.
    ///
    /// Returns Ok(false) when the session should end.
    pub fn handle<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<bool> {
        match cmd {
            Command::NewGame => match self.new_game() {
                Ok(()) => writeln!(out, "ok")?,
                Err(e) => writeln!(out, "error {}", e)?,
            },
            Command::Map { path } => match self.load_map(&path) {
                Ok(()) => writeln!(out, "ok")?,
                Err(e) => {
                    warn!(path = %path, error = %e, "map load failed");
                    writeln!(out, "error {}", e)?;
                }
            },
            Command::Seed { seed } => {
                self.set_seed(seed);
                writeln!(out, "ok")?;
            }
            Command::SetOption { name, value } => match self.set_option(&name, &value) {
                Ok(()) => writeln!(out, "ok")?,
                Err(e) => writeln!(out, "error {}", e)?,
            },
            Command::Reinforce(t) => {
                let result = self.engine.place_reinforcement(t);
                self.respond(result, out)?;
            }
            Command::Attack(t) => {
                let result = self.engine.select_attack_source(t);
                self.respond(result, out)?;
            }
            Command::Target(t) => {
                let result = self.engine.select_attack_target(t).map(|_| ());
                self.respond(result, out)?;
            }
            Command::Fortify(t) => {
                let result = self.engine.select_fortify_source(t);
                self.respond(result, out)?;
            }
            Command::To(t) => {
                let result = self.engine.select_fortify_target(t);
                self.respond(result, out)?;
            }
            Command::Next => {
                let result = self.engine.advance_phase().map(|_| ());
                self.respond(result, out)?;
            }
            Command::Show => write_state(&self.engine, out)?,
            Command::Moves => self.write_moves(out)?,
            Command::Quit => return Ok(false),
        }
        out.flush()?;
        Ok(true)
    }

    /// Writes pending events followed by `ok`, or the rejection reason.
    fn respond<W: Write>(&mut self, result: Result<(), Rejection>, out: &mut W) -> io::Result<()> {
        match result {
            Ok(()) => {
                for event in self.engine.drain_events() {
                    writeln!(out, "{}", format_event(&event))?;
                }
                writeln!(out, "ok")
            }
            Err(r) => writeln!(out, "rejected {}", r),
        }
    }

    /// Writes the legal inputs for the current phase as a `moves` line.
    fn write_moves<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let engine = &self.engine;
        if engine.is_game_over() {
            return writeln!(out, "moves none");
        }
        match engine.phase() {
            Phase::Reinforce => writeln!(out, "moves reinforce {}", join_list(&reinforceable(engine))),
            Phase::Attack => match engine.attack_selection().source() {
                Some(from) => writeln!(
                    out,
                    "moves target {}",
                    join_list(&attack_targets(engine, from))
                ),
                None => writeln!(out, "moves attack {}", join_list(&attack_sources(engine))),
            },
            Phase::Fortify => match engine.fortify_selection().source() {
                Some(from) => writeln!(out, "moves to {}", join_list(&fortify_targets(engine, from))),
                None => writeln!(out, "moves fortify {}", join_list(&fortify_sources(engine))),
            },
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::parse_command;

    fn run(session: &mut Session, lines: &[&str]) -> Vec<String> {
        let mut out = Vec::new();
        for line in lines {
            if let Some(cmd) = parse_command(line) {
                if !session.handle(cmd, &mut out).unwrap() {
                    break;
                }
            }
        }
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn reinforce_reports_event_and_ok() {
        let mut s = Session::new();
        let lines = run(&mut s, &["reinforce 0"]);
        assert_eq!(lines, vec!["event reinforced 0 first", "ok"]);
    }

    #[test]
    fn rejection_reports_reason() {
        let mut s = Session::new();
        let lines = run(&mut s, &["reinforce 1", "next"]);
        assert_eq!(
            lines,
            vec![
                "rejected territory 1 is not yours",
                "rejected 3 reinforcements still to place"
            ]
        );
    }

    #[test]
    fn moves_follow_the_phase() {
        let mut s = Session::new();
        let lines = run(
            &mut s,
            &["moves", "reinforce 0", "reinforce 0", "reinforce 0", "next", "moves"],
        );
        assert_eq!(lines[0], "moves reinforce 0,2,4,6,8,10,12");
        assert!(lines.contains(&"event phase first Attack".to_string()));
        assert!(lines.last().unwrap().starts_with("moves attack "));
    }

    #[test]
    fn options_apply_on_newgame() {
        let mut s = Session::new();
        let lines = run(
            &mut s,
            &["setoption name Reinforcements value 1", "newgame", "reinforce 0", "next"],
        );
        assert_eq!(lines[0], "ok");
        assert_eq!(lines[1], "ok");
        assert_eq!(s.engine().phase(), Phase::Attack);
        assert_eq!(s.config().reinforcements_per_turn, 1);
    }

    #[test]
    fn bad_option_is_an_error_line() {
        let mut s = Session::new();
        let lines = run(&mut s, &["setoption name Speed value 9"]);
        assert_eq!(lines, vec!["error unknown option 'Speed'"]);
    }

    #[test]
    fn missing_map_keeps_current_match() {
        let mut s = Session::new();
        let lines = run(&mut s, &["reinforce 0", "map /nonexistent/map.json"]);
        assert!(lines[2].starts_with("error failed to read map file"));
        assert_eq!(s.engine().reinforcements_left(), 2);
    }

    #[test]
    fn seeded_sessions_replay_identically() {
        let script = [
            "seed 9", "newgame", "reinforce 0", "reinforce 0", "reinforce 0", "next", "attack 0",
            "target 1", "target 1", "show",
        ];
        let mut a = Session::new();
        let mut b = Session::new();
        assert_eq!(run(&mut a, &script), run(&mut b, &script));
    }

    #[test]
    fn quit_stops_processing() {
        let mut s = Session::new();
        let lines = run(&mut s, &["quit", "reinforce 0"]);
        assert!(lines.is_empty());
        assert_eq!(s.engine().reinforcements_left(), 3);
    }
}
