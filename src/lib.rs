//! A* Snake - a snake that steers itself to food with A* search
//!
//! This library provides:
//! - Core game logic and the replanning controller (game module)
//! - Grid search and occupancy (pathfinding module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Watch and headless drivers (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod pathfinding;
pub mod render;
