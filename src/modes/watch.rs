//! Terminal viewer that lets the snake play itself
//!
//! Ticks the engine on a timer and redraws the board, the current plan and
//! the sets left by the last search.
//!
//! # Controls
//!
//! - R: Restart episode
//! - S: Show/hide search sets
//! - Space: Pause/unpause
//! - 1-4: Speed control (1=slow, 2=normal, 3=fast, 4=very fast)
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use clap::ValueEnum;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::{Interval, interval};

use crate::game::{ConfigError, GameConfig, GameEngine};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{HudStatus, Renderer};

/// Playback speed settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlaybackSpeed {
    /// 4 Hz
    Slow,
    /// 12 Hz
    Normal,
    /// 25 Hz
    Fast,
    /// 60 Hz
    VeryFast,
}

impl PlaybackSpeed {
    /// Get the tick interval for this speed
    pub fn tick_interval(&self) -> Duration {
        match self {
            Self::Slow => Duration::from_millis(250),
            Self::Normal => Duration::from_millis(83),
            Self::Fast => Duration::from_millis(40),
            Self::VeryFast => Duration::from_millis(16),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Slow => "Slow",
            Self::Normal => "Normal",
            Self::Fast => "Fast",
            Self::VeryFast => "Very Fast",
        }
    }
}

pub struct WatchMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    speed: PlaybackSpeed,
}

impl WatchMode {
    pub fn new(config: GameConfig, speed: PlaybackSpeed) -> Result<Self, ConfigError> {
        Ok(Self {
            engine: GameEngine::new(config)?,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            speed,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        let result = self.run_loop(&mut terminal).await;

        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(self.speed.tick_interval());

        // Render at 30 FPS (33ms per frame)
        let mut render_timer = interval(Duration::from_millis(33));

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event, &mut tick_timer)?;
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.tick();
                    }
                }

                _ = render_timer.tick() => {
                    self.metrics.update();
                    let hud = HudStatus {
                        show_sets: self.engine.show_search_sets(),
                        paused: self.paused,
                        speed: self.speed.as_str(),
                    };
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.engine.state(), &self.metrics, &hud);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn tick(&mut self) {
        if !self.engine.state().is_running() {
            return;
        }

        let result = self.engine.advance();
        self.metrics.on_step(&result.info);

        if result.terminated {
            self.metrics.on_game_over(self.engine.state().score);
        }
    }

    fn handle_event(&mut self, event: Event, tick_timer: &mut Interval) -> Result<()> {
        if let Event::Key(key) = event {
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Restart => self.restart().context("Failed to restart game")?,
                KeyAction::ToggleSearchSets => self.engine.toggle_search_sets(),
                KeyAction::TogglePause => self.paused = !self.paused,
                KeyAction::SetSpeed(speed) => {
                    self.speed = speed;
                    *tick_timer = interval(speed.tick_interval());
                }
                KeyAction::Quit => self.should_quit = true,
                KeyAction::None => {}
            }
        }
        Ok(())
    }

    fn restart(&mut self) -> Result<(), ConfigError> {
        self.engine.reset()?;
        self.metrics.on_game_start();
        Ok(())
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_speed() {
        assert_eq!(PlaybackSpeed::Slow.tick_interval(), Duration::from_millis(250));
        assert_eq!(PlaybackSpeed::Normal.tick_interval(), Duration::from_millis(83));
        assert_eq!(PlaybackSpeed::Fast.tick_interval(), Duration::from_millis(40));
        assert_eq!(PlaybackSpeed::VeryFast.tick_interval(), Duration::from_millis(16));
    }

    #[test]
    fn test_initialization() {
        let mode = WatchMode::new(GameConfig::default().with_seed(5), PlaybackSpeed::Normal).unwrap();
        assert!(mode.engine.state().is_running());
        assert_eq!(mode.engine.state().score, 0);
        assert!(!mode.paused);
    }

    #[test]
    fn test_tick_stops_counting_after_game_over() {
        let mut mode = WatchMode::new(GameConfig::small().with_seed(11), PlaybackSpeed::Fast).unwrap();
        for _ in 0..5_000 {
            mode.tick();
        }
        // Either still running or ended exactly once
        assert!(mode.metrics.games_played <= 1);
        assert_eq!(mode.metrics.games_played == 1, !mode.engine.state().is_running());
    }

    #[test]
    fn test_restart() {
        let mut mode = WatchMode::new(GameConfig::small().with_seed(4), PlaybackSpeed::Normal).unwrap();
        for _ in 0..20 {
            mode.tick();
        }
        mode.restart().unwrap();
        assert!(mode.engine.state().is_running());
        assert_eq!(mode.engine.state().score, 0);
        assert_eq!(mode.metrics.ticks, 0);
    }
}
