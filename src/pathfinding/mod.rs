//! Path planning over the game grid
//!
//! Pure functions with no game state of their own: the engine hands in the
//! grid, the endpoints and the occupancy for one planning pass.

pub mod astar;
pub mod occupancy;

pub use astar::{astar, heuristic, SearchOutcome};
pub use occupancy::blocked_cells;
