use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use super::grid::Grid;

/// Rejected configuration values
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },
    #[error("initial_snake_length must be at least 1")]
    ZeroLength,
    #[error("a snake of length {length} does not fit left of the centre column of a grid {width} wide")]
    SnakeTooLong { length: usize, width: usize },
    #[error("obstacle_density must be in [0, 1), got {0}")]
    InvalidDensity(f64),
    #[error("grid dimensions {width}x{height} exceed the addressable range")]
    GridTooLarge { width: usize, height: usize },
    #[error("grid of {cells} cells leaves no room for food next to a snake of length {length}")]
    NoRoomForFood { cells: usize, length: usize },
    #[error("{walls} walls left no free cell for food")]
    NoFreeCell { walls: usize },
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Fraction of cells tried as wall placements at episode start
    pub obstacle_density: f64,
    /// A plan older than this many ticks is thrown away and recomputed
    pub replan_threshold: u32,
    /// Seed for wall and food placement; drawn from entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 30,
            grid_height: 23,
            initial_snake_length: 3,
            obstacle_density: 0.05,
            replan_threshold: 5,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(60, 40)
    }

    /// Same configuration with a fixed seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Same configuration without walls
    pub fn without_obstacles(mut self) -> Self {
        self.obstacle_density = 0.0;
        self
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_width, self.grid_height)
    }

    /// Number of wall placement attempts for one episode
    pub fn obstacle_attempts(&self) -> usize {
        (self.grid().cell_count() as f64 * self.obstacle_density).floor() as usize
    }

    /// Check that the values describe a playable board
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }

        // Cells are addressed with i32 coordinates
        let max_side = i32::MAX as usize;
        let cells = match self.grid().checked_cell_count() {
            Some(cells) if self.grid_width <= max_side && self.grid_height <= max_side => cells,
            _ => {
                return Err(ConfigError::GridTooLarge {
                    width: self.grid_width,
                    height: self.grid_height,
                })
            }
        };

        if self.initial_snake_length == 0 {
            return Err(ConfigError::ZeroLength);
        }

        // Head spawns on the centre column with the body trailing to the left
        if self.initial_snake_length > self.grid_width / 2 + 1 {
            return Err(ConfigError::SnakeTooLong {
                length: self.initial_snake_length,
                width: self.grid_width,
            });
        }

        if !(0.0..1.0).contains(&self.obstacle_density) {
            return Err(ConfigError::InvalidDensity(self.obstacle_density));
        }

        if cells <= self.initial_snake_length {
            return Err(ConfigError::NoRoomForFood {
                cells,
                length: self.initial_snake_length,
            });
        }

        Ok(())
    }

    /// Load configuration from a TOML file; missing keys take their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }
}
