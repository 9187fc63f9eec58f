//! Level description module
//!
//! Level-wide settings tying a map file to gameplay parameters.

mod config;

pub use config::{LevelConfig, LevelError};
