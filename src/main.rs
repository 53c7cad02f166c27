use anyhow::{Context, Result};
use clap::Parser;
use portal_snake::game::{GameConfig, GameEngine};
use portal_snake::modes::HumanMode;
use portal_snake::score::{FileScoreStore, HighScore};
use portal_snake::session::Session;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "portal_snake")]
#[command(version, about = "Snake with speed boosts, fire and portals")]
struct Cli {
    /// Side length of the square grid (overrides the config file)
    #[arg(long)]
    grid_size: Option<usize>,

    /// File holding the high score
    #[arg(long, default_value = "highscore.txt")]
    high_score_file: PathBuf,

    /// JSON game configuration; missing fields use defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for item and portal placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs here (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "portal_snake=info".into()))
        .init();
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(grid_size) = cli.grid_size {
        config.grid_size = grid_size;
    }
    config.validate().context("Invalid game configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let config = build_config(&cli)?;
    info!(?config, "Starting");

    let high_score = HighScore::load(FileScoreStore::new(&cli.high_score_file));
    let engine = match cli.seed {
        Some(seed) => GameEngine::seeded(config, high_score, seed),
        None => GameEngine::new(config, high_score),
    };

    let mut human_mode = HumanMode::new(Session::new(engine));
    human_mode.run().await?;

    Ok(())
}
