//! Conquest -- a two-player territorial conquest engine.
//!
//! Reads protocol commands from stdin and writes responses to stdout.
//! Logs go to stderr; set `RUST_LOG` to change the level.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use conquest::board::MapSpec;
use conquest::config::MatchConfig;
use conquest::protocol::parse_command;
use conquest::session::Session;

#[derive(Parser)]
#[command(name = "conquest")]
#[command(about = "Two-player conquest engine speaking a line protocol on stdin/stdout")]
struct Cli {
    /// Map description (JSON) for the first match
    #[arg(long)]
    map: Option<PathBuf>,

    /// Rule options (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dice seed; omit for entropy
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let map = match &cli.map {
        Some(path) => MapSpec::from_path(path).unwrap_or_else(|e| {
            tracing::error!("{}: {e}", path.display());
            process::exit(1);
        }),
        None => MapSpec::world(),
    };
    let config = match &cli.config {
        Some(path) => MatchConfig::from_path(path).unwrap_or_else(|e| {
            tracing::error!("{}: {e}", path.display());
            process::exit(1);
        }),
        None => MatchConfig::default(),
    };
    let mut session = Session::with_setup(map, config, cli.seed).unwrap_or_else(|e| {
        tracing::error!("invalid map: {e}");
        process::exit(1);
    });

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match session.handle(cmd, &mut out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                tracing::error!("write failed: {e}");
                break;
            }
        }
    }
}
