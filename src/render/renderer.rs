use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, GameStatus, Position};
use crate::metrics::GameMetrics;

/// What a grid cell shows, strongest layer wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Head,
    Body,
    Food,
    Path,
    Visited,
    Frontier,
    Wall,
    Empty,
}

impl CellKind {
    /// Classify `pos`, skipping the search sets when they are hidden
    pub fn of(state: &GameState, pos: Position, show_sets: bool) -> Self {
        if pos == state.head() {
            CellKind::Head
        } else if state.snake.contains(pos) {
            CellKind::Body
        } else if pos == state.food {
            CellKind::Food
        } else if state.plan.contains(&pos) {
            CellKind::Path
        } else if show_sets && state.visited.contains(&pos) {
            CellKind::Visited
        } else if show_sets && state.frontier.contains(&pos) {
            CellKind::Frontier
        } else if state.walls.contains(&pos) {
            CellKind::Wall
        } else {
            CellKind::Empty
        }
    }

    fn span(self) -> Span<'static> {
        match self {
            CellKind::Head => Span::styled(
                "■ ",
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD),
            ),
            CellKind::Body => Span::styled("□ ", Style::default().fg(Color::Green)),
            CellKind::Food => Span::styled(
                "● ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            CellKind::Path => Span::styled("• ", Style::default().fg(Color::Yellow)),
            CellKind::Visited => Span::styled("· ", Style::default().fg(Color::Gray)),
            CellKind::Frontier => Span::styled("◦ ", Style::default().fg(Color::LightCyan)),
            CellKind::Wall => Span::styled("▓▓", Style::default().fg(Color::DarkGray)),
            CellKind::Empty => Span::styled("  ", Style::default()),
        }
    }
}

/// Driver-side flags shown next to the board
#[derive(Debug, Clone, Copy)]
pub struct HudStatus<'a> {
    pub show_sets: bool,
    pub paused: bool,
    pub speed: &'a str,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        state: &GameState,
        metrics: &GameMetrics,
        hud: &HudStatus<'_>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(chunks[0], state, metrics, hud);
        frame.render_widget(stats, chunks[0]);

        let grid = self.render_grid(chunks[1], state, hud.show_sets);
        frame.render_widget(grid, chunks[1]);

        if let GameStatus::GameOver(reason) = state.status {
            let popup = centered(chunks[1], 40, 7);
            let game_over = self.render_game_over(popup, state, reason.as_str());
            frame.render_widget(game_over, popup);
        }

        let controls = self.render_controls(chunks[2]);
        frame.render_widget(controls, chunks[2]);
    }

    fn render_grid(&self, _area: Rect, state: &GameState, show_sets: bool) -> Paragraph<'_> {
        let lines: Vec<Line> = (0..state.grid.height as i32)
            .map(|y| {
                let spans: Vec<Span> = (0..state.grid.width as i32)
                    .map(|x| CellKind::of(state, Position::new(x, y), show_sets).span())
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(" Snake* "),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        _area: Rect,
        state: &GameState,
        metrics: &GameMetrics,
        hud: &HudStatus<'_>,
    ) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let mut spans = vec![
            Span::styled("Score: ", label),
            Span::styled(
                state.score.to_string(),
                value.add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled("Length: ", label),
            Span::styled(state.snake.len().to_string(), value),
            Span::raw("  "),
            Span::styled("Steps since plan: ", label),
            Span::styled(state.steps_since_plan.to_string(), value),
            Span::raw("  "),
            Span::styled("Show sets: ", label),
            Span::styled(if hud.show_sets { "ON" } else { "OFF" }, value),
            Span::raw("  "),
            Span::styled("Best: ", label),
            Span::styled(metrics.high_score.to_string(), value),
            Span::raw("  "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("  "),
            Span::styled("Speed: ", label),
            Span::styled(hud.speed.to_string(), value),
        ];
        if hud.paused {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                "PAUSED",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ));
        }

        Paragraph::new(Line::from(spans)).alignment(Alignment::Center)
    }

    fn render_game_over(&self, _area: Rect, state: &GameState, reason: &str) -> Paragraph<'_> {
        let text = vec![
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(Span::styled(
                reason.to_string(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    state.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "R",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to restart", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect) -> Paragraph<'_> {
        let key = Style::default().fg(Color::Cyan);
        let text = vec![Line::from(vec![
            Span::styled("R", key),
            Span::raw(" restart | "),
            Span::styled("S", key),
            Span::raw(" search sets | "),
            Span::styled("Space", key),
            Span::raw(" pause | "),
            Span::styled("1-4", key),
            Span::raw(" speed | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// A `width` x `height` rectangle in the middle of `area`, clipped to it
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Grid, Snake};
    use std::collections::{BTreeSet, HashSet, VecDeque};

    fn sample_state() -> GameState {
        let mut state = GameState::new(
            Snake::new(Position::new(2, 2), Direction::Right, 2),
            Position::new(5, 2),
            HashSet::from([Position::new(0, 0)]),
            Grid::new(6, 4),
        );
        state.plan = VecDeque::from([Position::new(3, 2), Position::new(4, 2), Position::new(5, 2)]);
        state.visited = BTreeSet::from([Position::new(2, 2), Position::new(3, 2), Position::new(3, 1)]);
        state.frontier = BTreeSet::from([Position::new(3, 3), Position::new(5, 2)]);
        state
    }

    #[test]
    fn test_cell_layers() {
        let state = sample_state();

        assert_eq!(CellKind::of(&state, Position::new(2, 2), true), CellKind::Head);
        assert_eq!(CellKind::of(&state, Position::new(1, 2), true), CellKind::Body);
        assert_eq!(CellKind::of(&state, Position::new(5, 2), true), CellKind::Food);
        assert_eq!(CellKind::of(&state, Position::new(3, 2), true), CellKind::Path);
        assert_eq!(CellKind::of(&state, Position::new(3, 1), true), CellKind::Visited);
        assert_eq!(CellKind::of(&state, Position::new(3, 3), true), CellKind::Frontier);
        assert_eq!(CellKind::of(&state, Position::new(0, 0), true), CellKind::Wall);
        assert_eq!(CellKind::of(&state, Position::new(0, 3), true), CellKind::Empty);
    }

    #[test]
    fn test_hidden_sets() {
        let state = sample_state();

        assert_eq!(CellKind::of(&state, Position::new(3, 1), false), CellKind::Empty);
        assert_eq!(CellKind::of(&state, Position::new(3, 3), false), CellKind::Empty);
        // The path is drawn regardless
        assert_eq!(CellKind::of(&state, Position::new(4, 2), false), CellKind::Path);
    }

    #[test]
    fn test_centered_clips_to_area() {
        let area = Rect::new(0, 0, 20, 5);
        let rect = centered(area, 40, 3);
        assert_eq!(rect, Rect::new(0, 1, 20, 3));
    }
}
