pub mod config;
pub mod error;
pub mod grid;
pub mod life;
pub mod render;
pub mod sim;
pub mod snapshot;
pub mod stats;
pub mod viewport;

pub use config::SimulationConfig;
pub use error::{ConfigError, GridError, LoadError, SimError};
pub use grid::{Board, Cell, Grid};
pub use sim::{Pacer, Simulation, StopFlag};
pub use stats::RunStats;
pub use viewport::Viewport;
