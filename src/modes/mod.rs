pub mod headless;
pub mod watch;

pub use headless::{EpisodeReport, HeadlessConfig, HeadlessMode, RunSummary};
pub use watch::{PlaybackSpeed, WatchMode};
