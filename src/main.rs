//! GRIDIRON — NFL stats lookup with fuzzy name resolution
//!
//! Entry point. Loads configuration, initialises structured logging,
//! builds the stats service, and runs one query from the command line.
//! The chat frontend consumes the same service; this binary is the
//! minimal standalone surface.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use gridiron::config::AppConfig;
use gridiron::provider::SportsDataClient;
use gridiron::service::StatsService;
use gridiron::types::StatsError;

const USAGE: &str = "\
Usage:
  gridiron player <name>             stats for the current week
  gridiron week <name> <season> <wk> stats for a specific week
  gridiron season <name>             sampled season totals
  gridiron team <name>               franchise info
  gridiron schedule <name>           full-season schedule
  gridiron scores                    current week scoreboard
";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    let cfg = AppConfig::load("config.toml")?;
    init_logging();

    let api_key = AppConfig::resolve_env(&cfg.provider.api_key_env)?;
    let client = SportsDataClient::new(
        &cfg.provider.base_url,
        &api_key,
        Duration::from_secs(cfg.provider.timeout_secs),
    )?;
    let service = StatsService::new(
        Arc::new(client),
        Duration::from_secs(cfg.cache.ttl_secs),
        Duration::from_secs(cfg.cache.sweep_secs),
    );

    let args: Vec<String> = std::env::args().skip(1).collect();
    let outcome = run_command(&service, &args).await;

    match outcome {
        Ok(()) => Ok(()),
        Err(CommandError::Usage) => {
            eprint!("{USAGE}");
            std::process::exit(2);
        }
        Err(CommandError::Stats(e)) => {
            // Every error kind renders as one short line; NotFound is an
            // expected outcome, not a failure of the tool.
            eprintln!("{e}");
            std::process::exit(1);
        }
        Err(CommandError::Other(e)) => Err(e),
    }
}

enum CommandError {
    Usage,
    Stats(StatsError),
    Other(anyhow::Error),
}

impl From<StatsError> for CommandError {
    fn from(e: StatsError) -> Self {
        CommandError::Stats(e)
    }
}

async fn run_command(service: &StatsService, args: &[String]) -> Result<(), CommandError> {
    let mut args = args.iter().map(String::as_str);
    match args.next() {
        Some("player") => {
            let name = expect_arg(args.next())?;
            let stats = service.player_stats(name).await?;
            println!("{stats}");
        }
        Some("week") => {
            let name = expect_arg(args.next())?;
            let season = parse_number(args.next())?;
            let week = parse_number(args.next())?;
            let stats = service.player_week_stats(name, season, week).await?;
            println!("{stats}");
        }
        Some("season") => {
            let name = expect_arg(args.next())?;
            let totals = service.player_season_totals(name).await?;
            println!("{totals}");
        }
        Some("team") => {
            let name = expect_arg(args.next())?;
            let team = service.team_info(name).await?;
            println!("{team}");
        }
        Some("schedule") => {
            let name = expect_arg(args.next())?;
            let schedule = service.team_schedule(name).await?;
            info!(team = %schedule.team, season = schedule.season, "schedule resolved");
            for game in &schedule.games {
                println!("{game}");
            }
        }
        Some("scores") => {
            let scores = service.live_scores().await?;
            if scores.is_empty() {
                println!("No games this week.");
            }
            for score in &scores {
                println!("{score}");
            }
        }
        _ => return Err(CommandError::Usage),
    }
    Ok(())
}

fn expect_arg(arg: Option<&str>) -> Result<&str, CommandError> {
    arg.ok_or(CommandError::Usage)
}

fn parse_number<T: std::str::FromStr>(arg: Option<&str>) -> Result<T, CommandError> {
    let raw = expect_arg(arg)?;
    raw.parse().map_err(|_| {
        CommandError::Other(anyhow::anyhow!("'{raw}' is not a number"))
    })
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("gridiron=info"));

    if std::env::var("GRIDIRON_LOG_JSON").is_ok() {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    } else {
        fmt().with_env_filter(env_filter).with_target(true).init();
    }
}
