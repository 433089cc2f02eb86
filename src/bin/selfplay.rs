//! Self-play match generation CLI.
//!
//! Plays matches between random legal-move agents and writes one JSON
//! record per match.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- [OPTIONS]

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use conquest::board::MapSpec;
use conquest::config::MatchConfig;
use conquest::selfplay::{self, SelfPlayConfig};

#[derive(Parser)]
#[command(name = "selfplay")]
#[command(about = "Play random conquest matches and emit JSONL records")]
struct Cli {
    /// Number of matches to play
    #[arg(long, default_value_t = 100)]
    games: usize,

    /// Number of parallel threads
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Turn cap; unfinished matches count as draws
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// Probability of attacking when an attack is possible
    #[arg(long, default_value_t = 0.7)]
    aggression: f64,

    /// Map description (JSON)
    #[arg(long)]
    map: Option<PathBuf>,

    /// Rule options (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Suppress summary output
    #[arg(long)]
    quiet: bool,
}

fn fail(msg: impl std::fmt::Display) -> ! {
    tracing::error!("{msg}");
    process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let cli = Cli::parse();

    let map = match &cli.map {
        Some(path) => MapSpec::from_path(path).unwrap_or_else(|e| fail(e)),
        None => MapSpec::world(),
    };
    let rules = match &cli.config {
        Some(path) => MatchConfig::from_path(path).unwrap_or_else(|e| fail(e)),
        None => MatchConfig::default(),
    };
    let board = map.build().unwrap_or_else(|e| fail(e));

    let config = SelfPlayConfig {
        num_games: cli.games,
        threads: cli.threads,
        seed: cli.seed,
        max_turns: cli.max_turns,
        aggression: cli.aggression.clamp(0.0, 1.0),
        rules,
        board,
    };

    if !cli.quiet {
        eprintln!(
            "Self-play: {} games, {} threads, max {} turns, aggression {:.2}",
            config.num_games, config.threads, config.max_turns, config.aggression
        );
    }

    let start = Instant::now();
    let games = selfplay::run_self_play(&config).unwrap_or_else(|e| fail(e));
    let elapsed = start.elapsed();

    if !cli.quiet {
        eprintln!(
            "Completed {} games in {:.2}s",
            games.len(),
            elapsed.as_secs_f64()
        );
        eprint!("{}", selfplay::summarize(&games));
    }

    let written = match &cli.output {
        Some(path) => {
            let file = File::create(path).unwrap_or_else(|e| fail(e));
            selfplay::write_jsonl(&games, &mut BufWriter::new(file))
        }
        None => {
            let stdout = io::stdout();
            selfplay::write_jsonl(&games, &mut BufWriter::new(stdout.lock()))
        }
    };
    if let Err(e) = written {
        fail(e);
    }
    if !cli.quiet {
        if let Some(path) = &cli.output {
            eprintln!("Wrote {} games to {}", games.len(), path.display());
        }
    }
}
