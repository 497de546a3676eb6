//! Core game logic module for the self-driving snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The engine owns the state and is ticked by whatever driver sits on top.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod state;

// Re-export commonly used types
pub use action::Direction;
pub use config::{ConfigError, GameConfig};
pub use engine::{GameEngine, StepInfo, StepResult};
pub use grid::{Grid, Position};
pub use state::{EndReason, GameState, GameStatus, Snake};
