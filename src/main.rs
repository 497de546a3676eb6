use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use astar_snake::game::GameConfig;
use astar_snake::modes::{HeadlessConfig, HeadlessMode, PlaybackSpeed, WatchMode};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "astar_snake")]
#[command(version, about = "Snake that plans its own route to the food with A*")]
struct Cli {
    /// Watch in the terminal or run episodes headless
    #[arg(long, default_value = "watch")]
    mode: Mode,

    /// TOML file with game settings; flags below take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Grid width
    #[arg(long)]
    width: Option<usize>,

    /// Grid height
    #[arg(long)]
    height: Option<usize>,

    /// Initial snake length
    #[arg(long)]
    length: Option<usize>,

    /// Fraction of cells tried as walls
    #[arg(long)]
    density: Option<f64>,

    /// Ticks a plan may be followed before it is recomputed
    #[arg(long)]
    replan_threshold: Option<u32>,

    /// RNG seed for walls and food
    #[arg(long)]
    seed: Option<u64>,

    /// Playback speed (watch mode)
    #[arg(long, default_value = "normal")]
    speed: PlaybackSpeed,

    /// Number of episodes (headless mode)
    #[arg(long, default_value = "10")]
    episodes: usize,

    /// Tick limit per episode (headless mode)
    #[arg(long, default_value = "10000")]
    max_ticks: u64,
}

#[derive(Clone, ValueEnum)]
enum Mode {
    /// Watch the snake in the terminal
    Watch,
    /// Run episodes without a terminal and print a summary
    Headless,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_toml_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(width) = self.width {
            config.grid_width = width;
        }
        if let Some(height) = self.height {
            config.grid_height = height;
        }
        if let Some(length) = self.length {
            config.initial_snake_length = length;
        }
        if let Some(density) = self.density {
            config.obstacle_density = density;
        }
        if let Some(threshold) = self.replan_threshold {
            config.replan_threshold = threshold;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.game_config()?;

    match cli.mode {
        Mode::Watch => {
            // The TUI owns the terminal, so no log subscriber here
            let mut watch_mode =
                WatchMode::new(config, cli.speed).context("Invalid game configuration")?;
            watch_mode.run().await?;
        }
        Mode::Headless => {
            init_tracing();
            let headless_config = HeadlessConfig {
                episodes: cli.episodes,
                max_ticks: cli.max_ticks,
                game_config: config,
            };
            let mut headless_mode =
                HeadlessMode::new(headless_config).context("Invalid game configuration")?;
            headless_mode
                .run()
                .context("Headless run stopped")?
                .print();
        }
    }

    Ok(())
}
