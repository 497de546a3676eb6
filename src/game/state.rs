use std::collections::{BTreeSet, HashSet, VecDeque};

use super::action::Direction;
use super::grid::{Grid, Position};

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, head at the front
    pub body: VecDeque<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with given starting position and direction
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.delta();
        let body = (0..length as i32)
            .map(|i| head.moved_by(-dx * i, -dy * i))
            .collect();

        Self { body, direction }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(segments: impl IntoIterator<Item = Position>, direction: Direction) -> Self {
        Self {
            body: segments.into_iter().collect(),
            direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Check if `pos` hits the body once the tail has moved out of the way
    pub fn collides_after_tail_moves(&self, pos: Position) -> bool {
        self.body.iter().take(self.body.len() - 1).any(|&seg| seg == pos)
    }

    /// Advance the head to `new_head`, keeping the tail when growing
    pub fn advance_to(&mut self, new_head: Position, should_grow: bool) {
        self.body.push_front(new_head);

        if !should_grow {
            self.body.pop_back();
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// True when no cell appears twice in the body
    pub fn is_self_disjoint(&self) -> bool {
        let unique: HashSet<_> = self.body.iter().collect();
        unique.len() == self.body.len()
    }
}

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    /// Head left the grid
    Wall,
    /// Head ran into a wall cell placed on the board
    Obstacle,
    /// Head ran into the body
    SelfCollision,
    /// No neighbor of the head was free and there was no plan
    Trapped,
    /// Nowhere left to put the food
    BoardFull,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Wall => "hit the edge",
            EndReason::Obstacle => "hit a wall",
            EndReason::SelfCollision => "bit itself",
            EndReason::Trapped => "trapped",
            EndReason::BoardFull => "board full",
        }
    }
}

/// Lifecycle of an episode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    GameOver(EndReason),
}

impl GameStatus {
    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::GameOver(_))
    }
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub grid: Grid,
    pub snake: Snake,
    pub food: Position,
    pub walls: HashSet<Position>,
    /// Cells still to walk, next step first
    pub plan: VecDeque<Position>,
    /// Open set left over from the last search
    pub frontier: BTreeSet<Position>,
    /// Closed set left over from the last search
    pub visited: BTreeSet<Position>,
    pub score: u32,
    pub steps: u32,
    pub steps_since_plan: u32,
    pub status: GameStatus,
}

impl GameState {
    /// Create a new game state
    pub fn new(snake: Snake, food: Position, walls: HashSet<Position>, grid: Grid) -> Self {
        Self {
            grid,
            snake,
            food,
            walls,
            plan: VecDeque::new(),
            frontier: BTreeSet::new(),
            visited: BTreeSet::new(),
            score: 0,
            steps: 0,
            steps_since_plan: 0,
            status: GameStatus::Running,
        }
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.snake.body
    }

    pub fn plan(&self) -> &VecDeque<Position> {
        &self.plan
    }

    pub fn frontier(&self) -> &BTreeSet<Position> {
        &self.frontier
    }

    pub fn visited(&self) -> &BTreeSet<Position> {
        &self.visited
    }

    pub fn is_running(&self) -> bool {
        self.status == GameStatus::Running
    }

    /// Check if a position is within the grid bounds
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        self.grid.contains(pos)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    /// Neither snake nor wall sits on `pos`
    pub fn is_free(&self, pos: Position) -> bool {
        !self.is_occupied_by_snake(pos) && !self.walls.contains(&pos)
    }

    /// Drop whatever the last search left for display
    pub fn clear_search_sets(&mut self) {
        self.frontier.clear();
        self.visited.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(5, 5));
        assert_eq!(snake.body[1], Position::new(4, 5));
        assert_eq!(snake.tail(), Position::new(3, 5));
    }

    #[test]
    fn test_snake_creation_vertical() {
        let snake = Snake::new(Position::new(2, 2), Direction::Up, 3);
        assert_eq!(snake.body[1], Position::new(2, 3));
        assert_eq!(snake.tail(), Position::new(2, 4));
    }

    #[test]
    fn test_snake_movement() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        // Move without growing
        snake.advance_to(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));

        // Move with growing
        snake.advance_to(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert_eq!(snake.head(), Position::new(7, 5));
        assert_eq!(snake.tail(), Position::new(4, 5));
    }

    #[test]
    fn test_collision_ignores_tail() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 3);
        assert!(snake.collides_after_tail_moves(Position::new(5, 5)));
        assert!(snake.collides_after_tail_moves(Position::new(4, 5)));
        // Tail cell is vacated this tick
        assert!(!snake.collides_after_tail_moves(Position::new(3, 5)));
        assert!(!snake.collides_after_tail_moves(Position::new(9, 9)));
    }

    #[test]
    fn test_self_disjoint() {
        let snake = Snake::new(Position::new(5, 5), Direction::Right, 4);
        assert!(snake.is_self_disjoint());

        let looped = Snake::from_segments(
            [Position::new(1, 1), Position::new(2, 1), Position::new(1, 1)],
            Direction::Left,
        );
        assert!(!looped.is_self_disjoint());
    }

    #[test]
    fn test_free_cells() {
        let walls = HashSet::from([Position::new(0, 0)]);
        let state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Position::new(8, 8),
            walls,
            Grid::new(10, 10),
        );

        assert!(!state.is_free(Position::new(0, 0)));
        assert!(!state.is_free(Position::new(4, 5)));
        assert!(state.is_free(Position::new(8, 8)));
        assert!(state.is_running());
        assert!(state.is_in_bounds(Position::new(9, 9)));
        assert!(!state.is_in_bounds(Position::new(10, 9)));
    }
}
