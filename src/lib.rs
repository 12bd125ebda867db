pub mod analysis;
pub mod audio;
pub mod chart;
pub mod config;
pub mod error;
pub mod game;

pub use error::{ChartError, Result};
