//! Batch runner without a terminal
//!
//! Plays a number of episodes back to back as fast as the engine allows and
//! reports how each one ended. Progress goes through `tracing`.
//!
//! # Example
//!
//! ```rust
//! use astar_snake::game::GameConfig;
//! use astar_snake::modes::{HeadlessConfig, HeadlessMode};
//!
//! let config = HeadlessConfig {
//!     episodes: 2,
//!     max_ticks: 500,
//!     game_config: GameConfig::small().with_seed(1),
//! };
//! let summary = HeadlessMode::new(config).unwrap().run().unwrap();
//! assert_eq!(summary.episodes.len(), 2);
//! ```

use tracing::{debug, info};

use crate::game::{ConfigError, EndReason, GameConfig, GameEngine};
use crate::metrics::GameMetrics;

/// Configuration for headless runs
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Number of episodes to play
    pub episodes: usize,
    /// Episodes still running after this many ticks are cut off
    pub max_ticks: u64,
    /// Game configuration (grid size, walls, seed)
    pub game_config: GameConfig,
}

impl HeadlessConfig {
    pub fn new(episodes: usize, game_config: GameConfig) -> Self {
        Self {
            episodes,
            max_ticks: 10_000,
            game_config,
        }
    }
}

/// How one episode went
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeReport {
    pub score: u32,
    pub length: usize,
    pub ticks: u64,
    pub replans: u64,
    pub failed_replans: u64,
    pub fallback_moves: u64,
    /// `None` when the tick limit was hit first
    pub end_reason: Option<EndReason>,
}

/// Results of a headless run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub episodes: Vec<EpisodeReport>,
}

impl RunSummary {
    pub fn high_score(&self) -> u32 {
        self.episodes.iter().map(|e| e.score).max().unwrap_or(0)
    }

    pub fn mean_score(&self) -> f64 {
        if self.episodes.is_empty() {
            return 0.0;
        }
        let total: u64 = self.episodes.iter().map(|e| u64::from(e.score)).sum();
        total as f64 / self.episodes.len() as f64
    }

    /// Episodes that ended for `reason`
    pub fn count_ended_by(&self, reason: EndReason) -> usize {
        self.episodes
            .iter()
            .filter(|e| e.end_reason == Some(reason))
            .count()
    }

    /// Print a human-readable summary
    pub fn print(&self) {
        println!("{}", "=".repeat(60));
        println!("Episodes: {}", self.episodes.len());
        println!("High score: {}", self.high_score());
        println!("Mean score: {:.2}", self.mean_score());
        for reason in [
            EndReason::Wall,
            EndReason::Obstacle,
            EndReason::SelfCollision,
            EndReason::Trapped,
            EndReason::BoardFull,
        ] {
            let count = self.count_ended_by(reason);
            if count > 0 {
                println!("  {}: {}", reason.as_str(), count);
            }
        }
        let cut_off = self.episodes.iter().filter(|e| e.end_reason.is_none()).count();
        if cut_off > 0 {
            println!("  tick limit: {}", cut_off);
        }
        println!("{}", "=".repeat(60));
    }
}

pub struct HeadlessMode {
    engine: GameEngine,
    metrics: GameMetrics,
    config: HeadlessConfig,
}

impl HeadlessMode {
    pub fn new(config: HeadlessConfig) -> Result<Self, ConfigError> {
        let mut engine = GameEngine::new(config.game_config.clone())?;
        // Nobody looks at the search sets here
        engine.set_show_search_sets(false);

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            config,
        })
    }

    /// Play all episodes; fails only if a reset cannot place the food
    pub fn run(&mut self) -> Result<RunSummary, ConfigError> {
        let mut summary = RunSummary::default();

        for episode in 0..self.config.episodes {
            if episode > 0 {
                self.engine.reset()?;
            }
            let report = self.run_episode();
            info!(
                episode,
                score = report.score,
                ticks = report.ticks,
                replans = report.replans,
                end = report.end_reason.map(|r| r.as_str()).unwrap_or("tick limit"),
                "episode finished"
            );
            summary.episodes.push(report);
        }

        Ok(summary)
    }

    fn run_episode(&mut self) -> EpisodeReport {
        self.metrics.on_game_start();
        let mut end_reason = None;

        while self.metrics.ticks < self.config.max_ticks {
            let result = self.engine.advance();
            self.metrics.on_step(&result.info);

            if result.terminated {
                end_reason = result.info.end_reason;
                break;
            }
        }

        let state = self.engine.state();
        self.metrics.on_game_over(state.score);
        self.metrics.update();
        debug!(elapsed = %self.metrics.format_time(), "episode wall time");

        EpisodeReport {
            score: state.score,
            length: state.snake.len(),
            ticks: self.metrics.ticks,
            replans: self.metrics.replans,
            failed_replans: self.metrics.failed_replans,
            fallback_moves: self.metrics.fallback_moves,
            end_reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_requested_episodes() {
        let config = HeadlessConfig {
            episodes: 3,
            max_ticks: 2_000,
            game_config: GameConfig::small().with_seed(17),
        };
        let summary = HeadlessMode::new(config).unwrap().run().unwrap();

        assert_eq!(summary.episodes.len(), 3);
        for report in &summary.episodes {
            assert!(report.ticks <= 2_000);
            assert!(report.replans >= 1);
            assert_eq!(report.length, 3 + report.score as usize);
        }
    }

    #[test]
    fn test_tick_limit_cuts_episode() {
        let config = HeadlessConfig {
            episodes: 1,
            max_ticks: 3,
            game_config: GameConfig::default().without_obstacles().with_seed(8),
        };
        let summary = HeadlessMode::new(config).unwrap().run().unwrap();

        let report = &summary.episodes[0];
        assert_eq!(report.ticks, 3);
        assert_eq!(report.end_reason, None);
    }

    #[test]
    fn test_same_seed_same_summary() {
        let run = || {
            let config = HeadlessConfig {
                episodes: 2,
                max_ticks: 1_000,
                game_config: GameConfig::small().with_seed(99),
            };
            HeadlessMode::new(config).unwrap().run().unwrap().episodes
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_summary_stats() {
        let report = |score, end_reason| EpisodeReport {
            score,
            length: 3,
            ticks: 10,
            replans: 1,
            failed_replans: 0,
            fallback_moves: 0,
            end_reason,
        };
        let summary = RunSummary {
            episodes: vec![
                report(4, Some(EndReason::Trapped)),
                report(2, Some(EndReason::SelfCollision)),
                report(6, None),
            ],
        };

        assert_eq!(summary.high_score(), 6);
        assert!((summary.mean_score() - 4.0).abs() < 1e-9);
        assert_eq!(summary.count_ended_by(EndReason::Trapped), 1);
        assert_eq!(summary.count_ended_by(EndReason::Wall), 0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = HeadlessConfig::new(1, GameConfig::new(0, 0));
        assert!(HeadlessMode::new(config).is_err());
    }
}
