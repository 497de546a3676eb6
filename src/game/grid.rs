use serde::{Deserialize, Serialize};

use super::action::Direction;

/// A cell on the game grid (column, row)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }

    /// Manhattan distance to another cell
    pub fn manhattan(&self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Whether `other` is exactly one orthogonal step away
    pub fn is_adjacent(&self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Neighbor offsets in expansion order: +x, -x, +y, -y
const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Fixed-size rectangular grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Check if a position is within the grid bounds
    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// In-bounds 4-neighbors of `pos`
    pub fn neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dy)| pos.moved_by(dx, dy))
            .filter(move |p| self.contains(*p))
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }

    /// Number of cells; dimensions are assumed to have passed `GameConfig::validate`
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    /// Number of cells, `None` on overflow
    pub fn checked_cell_count(&self) -> Option<usize> {
        self.width.checked_mul(self.height)
    }
}
