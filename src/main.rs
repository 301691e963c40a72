//! # Delve Entry Point
//!
//! Runs headless games driven by the autoexplore frontend and reports how
//! each one went.

use clap::Parser;
use delve::{AutoExplorer, DelveResult, GameConfig, GameSession, GameStatus};
use log::{error, info};
use std::path::PathBuf;

/// Command line arguments for the Delve runner.
#[derive(Parser, Debug)]
#[command(name = "delve")]
#[command(about = "Headless runner for the Delve dungeon simulation")]
#[command(version)]
struct Args {
    /// Random seed for the first game
    #[arg(short, long)]
    seed: Option<u64>,

    /// Stop a game after this many ticks
    #[arg(long, default_value_t = 2000)]
    max_turns: u64,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter (error, warn, info, debug, trace or env_logger syntax)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Number of games to play, with consecutive seeds
    #[arg(long, default_value_t = 1)]
    runs: u64,
}

fn main() -> DelveResult<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    info!("Starting Delve v{}", delve::VERSION);

    let config = match &args.config {
        Some(path) => GameConfig::load_from_path(path).inspect_err(|e| {
            error!("Could not load {}: {}", path.display(), e);
        })?,
        None => GameConfig::default(),
    };

    let first_seed = args.seed.unwrap_or_else(rand::random);
    for run in 0..args.runs {
        play_one(&config, first_seed.wrapping_add(run), args.max_turns)?;
    }
    Ok(())
}

fn play_one(config: &GameConfig, seed: u64, max_turns: u64) -> DelveResult<()> {
    let mut session = GameSession::new(config.clone(), seed)?;
    let mut explorer = AutoExplorer::new();
    let summary = session.run(&mut explorer, Some(max_turns))?;

    let outcome = match summary.status {
        GameStatus::Dead => "died",
        GameStatus::Playing if summary.quit => "quit",
        GameStatus::Playing => "out of turns",
    };
    println!(
        "seed {}: {} after {} ticks at depth {}, character level {}",
        seed, outcome, summary.ticks, summary.depth, summary.player_level
    );
    println!(
        "  {} monsters killed, {} items used, {} steps",
        session.stats.monsters_killed, session.stats.items_used, session.stats.steps_taken
    );
    let messages: Vec<_> = session.messages.iter().collect();
    for message in messages.iter().rev().take(5).rev() {
        println!("  > {}", message.text);
    }
    Ok(())
}
