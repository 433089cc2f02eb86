//! Command parser for the line protocol.
//!
//! Parses incoming text lines into structured `Command` variants that the
//! session loop can dispatch on. Territories are addressed by index.

use tracing::warn;

/// A parsed front-end-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Start a fresh match on the current map with the current options.
    NewGame,

    /// Load a map description from a JSON file and start a fresh match.
    Map { path: String },

    /// Seed the dice for the next match: `seed <n>`.
    Seed { seed: u64 },

    /// Set a rule option: `setoption name <id> value <x>`.
    SetOption { name: String, value: String },

    /// Place one reinforcement: `reinforce <t>`.
    Reinforce(usize),

    /// Select the attack source: `attack <t>`.
    Attack(usize),

    /// Select the attack target and fight: `target <t>`.
    Target(usize),

    /// Select the fortify source: `fortify <t>`.
    Fortify(usize),

    /// Select the fortify destination and move: `to <t>`.
    To(usize),

    /// Advance to the next phase.
    Next,

    /// Print the full match state.
    Show,

    /// Print the legal inputs for the current phase.
    Moves,

    /// Terminate the session.
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `None` for empty lines, comments starting with `#`, and
/// unrecognized commands. Malformed arguments for known commands also return
/// `None` after logging a warning.
pub fn parse_command(line: &str) -> Option<Command> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    match tokens[0] {
        "newgame" => Some(Command::NewGame),
        "next" | "advance" => Some(Command::Next),
        "show" => Some(Command::Show),
        "moves" => Some(Command::Moves),
        "quit" => Some(Command::Quit),

        "reinforce" => parse_territory(&tokens).map(Command::Reinforce),
        "attack" => parse_territory(&tokens).map(Command::Attack),
        "target" => parse_territory(&tokens).map(Command::Target),
        "fortify" => parse_territory(&tokens).map(Command::Fortify),
        "to" => parse_territory(&tokens).map(Command::To),

        "map" => parse_map(&tokens, trimmed),
        "seed" => parse_seed(&tokens),
        "setoption" => parse_setoption(&tokens),

        other => {
            warn!(command = other, "unknown command");
            None
        }
    }
}

/// Parses `<verb> <territory-index>`.
fn parse_territory(tokens: &[&str]) -> Option<usize> {
    if tokens.len() != 2 {
        warn!(command = tokens[0], "malformed command: expected '<verb> <territory>'");
        return None;
    }
    match tokens[1].parse::<usize>() {
        Ok(t) => Some(t),
        Err(_) => {
            warn!(command = tokens[0], value = tokens[1], "invalid territory index");
            None
        }
    }
}

/// Parses `map <path>`. The path is the rest of the line, so it may contain spaces.
fn parse_map(tokens: &[&str], line: &str) -> Option<Command> {
    if tokens.len() < 2 {
        warn!("malformed map: expected 'map <path>'");
        return None;
    }
    let path = line["map".len()..].trim().to_string();
    Some(Command::Map { path })
}

/// Parses `seed <n>`.
fn parse_seed(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 2 {
        warn!("malformed seed: expected 'seed <n>'");
        return None;
    }
    match tokens[1].parse::<u64>() {
        Ok(seed) => Some(Command::Seed { seed }),
        Err(_) => {
            warn!(value = tokens[1], "invalid seed value");
            None
        }
    }
}

/// Parses `setoption name <id> value <x>`.
fn parse_setoption(tokens: &[&str]) -> Option<Command> {
    if tokens.len() != 5 || tokens[1] != "name" || tokens[3] != "value" {
        warn!("malformed setoption: expected 'setoption name <id> value <x>'");
        return None;
    }
    Some(Command::SetOption {
        name: tokens[2].to_string(),
        value: tokens[4].to_string(),
    })
}
