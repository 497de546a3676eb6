use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashSet, VecDeque};
use tracing::{debug, info};

use super::{
    action::Direction,
    config::{ConfigError, GameConfig},
    grid::{Grid, Position},
    state::{EndReason, GameState, GameStatus, Snake},
};
use crate::pathfinding::{astar, blocked_cells};

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Whether a search ran this step
    pub replanned: bool,
    /// Whether that search produced a usable path
    pub path_found: bool,
    /// Whether the move came from the local fallback instead of a plan
    pub used_fallback: bool,
    /// Why the episode ended, if it ended this step
    pub end_reason: Option<EndReason>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// Drives the snake: decides when to plan, walks the plan, and applies the
/// movement rules
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
    state: GameState,
    show_search_sets: bool,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = Self::initial_state(&config, &mut rng)?;

        Ok(Self {
            config,
            rng,
            state,
            show_search_sets: true,
        })
    }

    /// Build an engine around a prepared state
    pub fn from_state(config: GameConfig, state: GameState) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            rng,
            state,
            show_search_sets: true,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn show_search_sets(&self) -> bool {
        self.show_search_sets
    }

    /// Keep or drop the frontier/visited sets of each search
    pub fn set_show_search_sets(&mut self, show: bool) {
        self.show_search_sets = show;
        if !show {
            self.state.clear_search_sets();
        }
    }

    pub fn toggle_search_sets(&mut self) {
        self.set_show_search_sets(!self.show_search_sets);
    }

    /// Reset the game to initial state
    ///
    /// Walls are redrawn, so a dense configuration can leave no cell for the
    /// food; the previous state is kept in that case.
    pub fn reset(&mut self) -> Result<(), ConfigError> {
        self.state = Self::initial_state(&self.config, &mut self.rng)?;
        debug!(
            walls = self.state.walls.len(),
            food = ?self.state.food,
            "episode reset"
        );
        Ok(())
    }

    fn initial_state(config: &GameConfig, rng: &mut StdRng) -> Result<GameState, ConfigError> {
        let grid = config.grid();
        let center = Position::new(
            (config.grid_width / 2) as i32,
            (config.grid_height / 2) as i32,
        );
        let snake = Snake::new(center, Direction::Right, config.initial_snake_length);

        let mut walls = HashSet::new();
        for _ in 0..config.obstacle_attempts() {
            let pos = random_cell(rng, grid);
            if !snake.contains(pos) {
                walls.insert(pos);
            }
        }

        let food = spawn_food(rng, grid, &snake, &walls)
            .ok_or(ConfigError::NoFreeCell { walls: walls.len() })?;

        Ok(GameState::new(snake, food, walls, grid))
    }

    /// Execute one tick of the game
    pub fn advance(&mut self) -> StepResult {
        if self.state.status.is_game_over() {
            return StepResult {
                terminated: true,
                info: StepInfo::default(),
            };
        }

        let mut info = StepInfo::default();
        let head = self.state.head();
        let blocked = blocked_cells(&self.state.snake.body, &self.state.walls);

        if self.state.plan.is_empty() || self.state.steps_since_plan > self.config.replan_threshold {
            self.replan(head, &blocked, &mut info);
        }
        // Counted after the check, so a fresh plan survives `replan_threshold + 1` ticks
        self.state.steps_since_plan += 1;

        let direction = match self.state.plan.pop_front() {
            // Plans come from a search rooted at the head and are consumed one
            // cell per move, so the next cell is always a neighbour
            Some(next) => Direction::from_delta(next.x - head.x, next.y - head.y)
                .expect("plan step adjacent to head"),
            None => {
                info.used_fallback = true;
                match self.fallback_direction(head, &blocked) {
                    Some(direction) => direction,
                    None => return self.end(EndReason::Trapped, info),
                }
            }
        };
        self.state.snake.direction = direction;

        let new_head = head.moved_in_direction(direction);
        if let Some(reason) = self.check_collision(new_head) {
            return self.end(reason, info);
        }

        let ate_food = new_head == self.state.food;
        self.state.snake.advance_to(new_head, ate_food);
        self.state.steps += 1;

        if ate_food {
            info.ate_food = true;
            self.state.score += 1;
            self.state.steps_since_plan = 0;
            info!(score = self.state.score, length = self.state.snake.len(), "food eaten");

            match spawn_food(&mut self.rng, self.state.grid, &self.state.snake, &self.state.walls) {
                Some(food) => self.state.food = food,
                None => return self.end(EndReason::BoardFull, info),
            }
        }

        StepResult {
            terminated: false,
            info,
        }
    }

    fn replan(&mut self, head: Position, blocked: &HashSet<Position>, info: &mut StepInfo) {
        let outcome = astar(&self.state.grid, head, self.state.food, blocked);
        info.replanned = true;

        debug!(
            from = ?head,
            to = ?self.state.food,
            path_len = ?outcome.path.as_ref().map(Vec::len),
            visited = outcome.visited.len(),
            frontier = outcome.frontier.len(),
            "replanned"
        );

        match outcome.path {
            Some(path) if !path.is_empty() => {
                info.path_found = true;
                self.state.plan = VecDeque::from(path);
                self.state.steps_since_plan = 0;
            }
            _ => self.state.plan.clear(),
        }

        if self.show_search_sets {
            self.state.frontier = outcome.frontier;
            self.state.visited = outcome.visited;
        } else {
            self.state.clear_search_sets();
        }
    }

    /// First candidate whose cell is on the board and unblocked
    fn fallback_direction(&self, head: Position, blocked: &HashSet<Position>) -> Option<Direction> {
        self.state
            .snake
            .direction
            .fallback_candidates()
            .into_iter()
            .find(|&dir| {
                let cell = head.moved_in_direction(dir);
                self.state.is_in_bounds(cell) && !blocked.contains(&cell)
            })
    }

    /// Check if the new head position causes a collision
    fn check_collision(&self, pos: Position) -> Option<EndReason> {
        if !self.state.is_in_bounds(pos) {
            return Some(EndReason::Wall);
        }

        if self.state.walls.contains(&pos) {
            return Some(EndReason::Obstacle);
        }

        if self.state.snake.collides_after_tail_moves(pos) {
            return Some(EndReason::SelfCollision);
        }

        None
    }

    fn end(&mut self, reason: EndReason, mut info: StepInfo) -> StepResult {
        self.state.status = GameStatus::GameOver(reason);
        info.end_reason = Some(reason);
        info!(
            reason = reason.as_str(),
            score = self.state.score,
            length = self.state.snake.len(),
            steps = self.state.steps,
            "game over"
        );

        StepResult {
            terminated: true,
            info,
        }
    }
}

fn random_cell(rng: &mut StdRng, grid: Grid) -> Position {
    let x = rng.gen_range(0..grid.width) as i32;
    let y = rng.gen_range(0..grid.height) as i32;
    Position::new(x, y)
}

/// Uniform pick of a cell free of snake and walls
///
/// Random sampling is bounded; once it gives up the first free cell in
/// row-major order is taken. `None` only when the board is full.
fn spawn_food(
    rng: &mut StdRng,
    grid: Grid,
    snake: &Snake,
    walls: &HashSet<Position>,
) -> Option<Position> {
    let is_free = |pos: Position| !snake.contains(pos) && !walls.contains(&pos);

    for _ in 0..grid.cell_count() * 4 {
        let pos = random_cell(rng, grid);
        if is_free(pos) {
            return Some(pos);
        }
    }

    grid.cells().find(|&pos| is_free(pos))
}
