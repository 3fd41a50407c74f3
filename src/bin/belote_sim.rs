//! Batch simulator: plays matches between strategies and writes auction and
//! trick logs for offline analysis.

use belote_rs::agents::StrategyKind;
use belote_rs::player::{Player, Seats, Team};
use belote_rs::sim::{
    run_match, ConfigRow, MatchSummary, OutputFormat, OutputWriter, SimConfig, DEFAULT_MAX_ACTIONS,
    DEFAULT_TARGET_SCORE,
};
use clap::Parser;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "belote-sim")]
#[command(about = "Play Belote matches between bots and log every bid and card")]
struct Args {
    /// Number of matches to play
    #[arg(short, long, default_value_t = 1)]
    games: u32,

    /// Score a team must reach to win a match
    #[arg(short, long, default_value_t = DEFAULT_TARGET_SCORE)]
    target: u32,

    /// Base seed; match n deals from seed + n
    #[arg(long)]
    seed: Option<u64>,

    /// Strategy for all four seats (random, highest or expert)
    #[arg(long, conflicts_with_all = ["west", "south", "east", "north"])]
    seats: Option<StrategyKind>,

    #[arg(long, default_value = "random")]
    west: StrategyKind,

    #[arg(long, default_value = "random")]
    south: StrategyKind,

    #[arg(long, default_value = "random")]
    east: StrategyKind,

    #[arg(long, default_value = "random")]
    north: StrategyKind,

    /// Abort a match after this many actions
    #[arg(long, default_value_t = DEFAULT_MAX_ACTIONS)]
    max_actions: u32,

    /// Output directory for results
    #[arg(long, default_value = "./data")]
    output_dir: PathBuf,

    /// Summary format (csv or jsonl); auction and trick tables are always CSV
    #[arg(long, default_value = "csv")]
    output_format: OutputFormat,

    /// Prefix of the output files; defaults to the start time
    #[arg(long)]
    experiment_id: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print a summary and the output file paths
    #[arg(long)]
    show_output: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // silent by default; RUST_LOG overrides
    let filter = if args.verbose {
        "debug"
    } else if args.show_output {
        "info"
    } else {
        "warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let strategies = match args.seats {
        Some(kind) => Seats::new([kind; 4]),
        None => Seats::new([args.west, args.south, args.east, args.north]),
    };
    let config = SimConfig {
        games: args.games,
        target_score: args.target,
        seed: args.seed,
        strategies,
        max_actions: args.max_actions,
    };
    let experiment_id = args.experiment_id.clone().unwrap_or_else(default_experiment_id);
    info!(
        experiment_id = %experiment_id,
        games = config.games,
        target = config.target_score,
        "starting simulation"
    );

    let mut writer = OutputWriter::new(&args.output_dir, &experiment_id, args.output_format)?;
    writer.write_config(&ConfigRow::new(&experiment_id, &config))?;

    let start = Instant::now();
    let mut summaries = Vec::new();
    let mut errors = 0;
    for game_id in 0..config.games {
        match run_match(&config, &experiment_id, game_id) {
            Ok(log) => {
                writer.write_match(&log)?;
                summaries.push(log.summary);
            }
            Err(e) => {
                errors += 1;
                warn!(game_id, error = %e, "match failed");
            }
        }
    }
    let elapsed = start.elapsed();

    let paths = writer.paths().to_vec();
    writer.finish()?;

    if args.show_output {
        for path in &paths {
            info!("written {}", path.display());
        }
        print_summary(&config, &summaries, errors, elapsed);
    }
    Ok(())
}

fn default_experiment_id() -> String {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
    format!("exp_{secs}")
}

fn print_summary(
    config: &SimConfig,
    summaries: &[MatchSummary],
    errors: u32,
    elapsed: std::time::Duration,
) {
    println!("\n=== Simulation Summary ===");
    println!("Matches completed: {}/{}", summaries.len(), config.games);
    if errors > 0 {
        println!("Errors: {errors}");
    }
    println!("Total time: {elapsed:?}");
    if summaries.is_empty() {
        return;
    }
    let n = summaries.len() as f64;
    println!("Average time per match: {:?}", elapsed / summaries.len() as u32);
    for p in Player::ALL {
        println!("{p}: {}", config.strategies[p]);
    }

    println!("\n=== Results by Team ===");
    for team in Team::ALL {
        let wins = summaries.iter().filter(|s| s.winner == team).count();
        let total: u64 = summaries
            .iter()
            .map(|s| match team {
                Team::EastWest => u64::from(s.east_west_score),
                Team::NorthSouth => u64::from(s.north_south_score),
            })
            .sum();
        println!(
            "{team}: wins={wins} ({:.1}%), avg score={:.1}",
            wins as f64 / n * 100.0,
            total as f64 / n
        );
    }
    let rounds: u64 = summaries.iter().map(|s| u64::from(s.rounds)).sum();
    let redeals: u64 = summaries.iter().map(|s| u64::from(s.redeals)).sum();
    println!("Average rounds: {:.1}, average redeals: {:.1}", rounds as f64 / n, redeals as f64 / n);
}
