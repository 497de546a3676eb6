use std::time::{Duration, Instant};

use crate::game::StepInfo;

pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub games_played: u32,
    /// Ticks in the current episode
    pub ticks: u64,
    /// Searches run in the current episode
    pub replans: u64,
    /// Searches that came back without a path
    pub failed_replans: u64,
    /// Moves chosen by the local fallback
    pub fallback_moves: u64,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            games_played: 0,
            ticks: 0,
            replans: 0,
            failed_replans: 0,
            fallback_moves: 0,
        }
    }

    pub fn update(&mut self) {
        self.elapsed_time = self.start_time.elapsed();
    }

    pub fn on_game_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.ticks = 0;
        self.replans = 0;
        self.failed_replans = 0;
        self.fallback_moves = 0;
    }

    pub fn on_step(&mut self, info: &StepInfo) {
        self.ticks += 1;
        if info.replanned {
            self.replans += 1;
            if !info.path_found {
                self.failed_replans += 1;
            }
        }
        if info.used_fallback {
            self.fallback_moves += 1;
        }
    }

    pub fn on_game_over(&mut self, final_score: u32) {
        self.games_played += 1;
        if final_score > self.high_score {
            self.high_score = final_score;
        }
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
