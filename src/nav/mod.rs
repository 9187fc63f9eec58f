//! Navigation module
//!
//! Provides the tile grid spatial model and grid-based A* pathfinding.

mod grid;
mod pathfinding;

pub use grid::{MapError, NavGrid, Tile};
pub use pathfinding::{PathResult, find_path};
