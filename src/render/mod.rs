pub mod renderer;

pub use renderer::{CellKind, HudStatus, Renderer};
