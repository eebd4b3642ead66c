//! Hoops CLI
//!
//! Headless driver for the game engine: one-off simulations, seeded batches,
//! real-time playback in the terminal and the request schema.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use hoops_core::engine::{
    run_fast_forward, run_realtime, GameConfig, GameSession, GameSetup, InMemorySeasonStore,
    NoPostGameCheck, PlaybackController, QueuedScheduler, SystemWallClock,
};
use hoops_core::models::{BoxScore, Side};
use hoops_core::{game_request_schema, simulate_game_json, GameRequest};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hoops")]
#[command(about = "Simulate basketball games from JSON requests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one game and print the JSON response
    Simulate {
        /// Request JSON file
        #[arg(long)]
        request: PathBuf,

        /// Write the response here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Print the play-by-play to stderr
        #[arg(long, default_value = "false")]
        events: bool,
    },

    /// Simulate many seeds in parallel and summarize
    Batch {
        /// Request JSON file
        #[arg(long)]
        request: PathBuf,

        /// Number of games
        #[arg(long, default_value = "100")]
        games: u64,

        /// First seed (defaults to the request's seed)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Play one game in real time, printing events as they happen
    Watch {
        /// Request JSON file
        #[arg(long)]
        request: PathBuf,

        /// Playback speed: 1, 2 or 4
        #[arg(long, default_value = "1")]
        speed: u8,
    },

    /// Print the request JSON Schema
    Schema,
}

fn read_request(path: &Path) -> Result<GameRequest> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid request JSON in {}", path.display()))
}

fn prepare(request: GameRequest) -> Result<(GameSetup, GameConfig, u64)> {
    request.into_setup().context("Invalid game request")
}

#[derive(Debug, Default, PartialEq)]
struct BatchSummary {
    games: u64,
    home_wins: u64,
    away_wins: u64,
    ties: u64,
    home_points: u64,
    away_points: u64,
}

impl BatchSummary {
    fn record(&mut self, box_score: &BoxScore) {
        self.games += 1;
        self.home_points += u64::from(box_score.home_score);
        self.away_points += u64::from(box_score.away_score);
        match box_score.winner() {
            Some(Side::Home) => self.home_wins += 1,
            Some(Side::Away) => self.away_wins += 1,
            None => self.ties += 1,
        }
    }

    fn average(&self, points: u64) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            points as f64 / self.games as f64
        }
    }
}

fn run_batch(
    setup: &GameSetup,
    config: &GameConfig,
    first_seed: u64,
    games: u64,
) -> Result<(BatchSummary, InMemorySeasonStore)> {
    let mut sessions = (0..games)
        .into_par_iter()
        .map(|i| -> Result<GameSession, hoops_core::GameError> {
            let mut session = GameSession::with_seed(setup.clone(), config.clone(), first_seed.wrapping_add(i))?;
            run_fast_forward(&mut session);
            Ok(session)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut store = InMemorySeasonStore::with_players(
        setup.home.roster.players.iter().chain(setup.away.roster.players.iter()).map(|p| p.id),
    );
    let mut summary = BatchSummary::default();
    for session in &mut sessions {
        let box_score = session.finalize(&mut store, &mut NoPostGameCheck)?;
        summary.record(&box_score);
    }
    Ok((summary, store))
}

fn watch(request: GameRequest, speed: u8) -> Result<()> {
    let (setup, config, seed) = prepare(request)?;
    let playback = config.playback.clone();
    let session = GameSession::with_seed(setup, config, seed)?;
    let mut controller = PlaybackController::new(session, QueuedScheduler::new(), playback)?;
    controller.set_speed(speed)?;

    for event in controller.session().events().iter() {
        println!("{}", event);
    }
    let clock = SystemWallClock::new();
    let status = run_realtime(
        &mut controller,
        &clock,
        Duration::from_millis(16),
        std::thread::sleep,
        |report, session| {
            let events = session.events();
            for event in events.since(events.len() - report.new_events) {
                println!("{}", event);
            }
        },
    );
    let (home, away) = controller.session().score();
    tracing::info!(?status, home, away, "watch finished");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate { request, out, events } => {
            let content = fs::read_to_string(&request)
                .with_context(|| format!("Failed to read {}", request.display()))?;
            let response = match simulate_game_json(&content) {
                Ok(json) => json,
                Err(e) => bail!("Simulation failed: {}", e),
            };
            if events {
                let parsed: hoops_core::GameResponse = serde_json::from_str(&response)?;
                for event in &parsed.events {
                    eprintln!("{}", event);
                }
            }
            match out {
                Some(path) => {
                    fs::write(&path, &response)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    tracing::info!(path = %path.display(), "response written");
                }
                None => println!("{}", response),
            }
        }
        Commands::Batch { request, games, seed } => {
            let request = read_request(&request)?;
            let (setup, config, request_seed) = prepare(request)?;
            let first_seed = seed.unwrap_or(request_seed);
            let (summary, store) = run_batch(&setup, &config, first_seed, games)?;

            println!("{} vs {} over {} games", setup.home.roster.name, setup.away.roster.name, summary.games);
            println!(
                "  wins: home {} / away {} / ties {}",
                summary.home_wins, summary.away_wins, summary.ties
            );
            println!(
                "  average score: {:.1} - {:.1}",
                summary.average(summary.home_points),
                summary.average(summary.away_points)
            );
            let leader = setup
                .home
                .roster
                .players
                .iter()
                .chain(setup.away.roster.players.iter())
                .filter_map(|p| store.totals(p.id).map(|t| (p, t)))
                .filter_map(|(p, t)| t.points_per_game().map(|ppg| (p, ppg)))
                .max_by(|a, b| a.1.total_cmp(&b.1));
            if let Some((player, ppg)) = leader {
                println!("  scoring leader: {} ({:.1} ppg)", player.name, ppg);
            }
        }
        Commands::Watch { request, speed } => {
            let request = read_request(&request)?;
            watch(request, speed)?;
        }
        Commands::Schema => {
            println!("{}", game_request_schema()?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hoops_core::models::{Player, Position, Roster};
    use hoops_core::{Lineup, Tactic, TeamSetup};
    use std::io::Write;

    fn team(name: &str, first_id: u32) -> TeamSetup {
        let players: Vec<Player> = (0..10)
            .map(|i| Player::new(first_id + i, format!("{} {}", name, i), Position::ALL[(i % 5) as usize], 70))
            .collect();
        let roster = Roster::new(name, players);
        let lineup = Lineup::auto_pick(&roster);
        TeamSetup { roster, lineup, tactic: Tactic::Balanced }
    }

    #[test]
    fn test_batch_counts_every_game() {
        let setup = GameSetup { home: team("Home", 1), away: team("Away", 101), controlled_side: None };
        let (summary, store) = run_batch(&setup, &GameConfig::default(), 7, 8).unwrap();
        assert_eq!(summary.games, 8);
        assert_eq!(summary.home_wins + summary.away_wins + summary.ties, 8);
        assert_eq!(store.matchups().len(), 8);
    }

    #[test]
    fn test_batch_is_reproducible() {
        let setup = GameSetup { home: team("Home", 1), away: team("Away", 101), controlled_side: None };
        let a = run_batch(&setup, &GameConfig::default(), 100, 4).unwrap().0;
        let b = run_batch(&setup, &GameConfig::default(), 100, 4).unwrap().0;
        assert_eq!(a, b);
    }

    #[test]
    fn test_read_request_reports_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = read_request(file.path()).unwrap_err();
        assert!(err.to_string().contains("Invalid request JSON"));
    }
}
