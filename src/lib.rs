//! Grid navigation for a tile-based pick-up-and-deliver game
//!
//! This crate provides:
//! - A square occupancy grid loaded from plain-text maps
//! - Tile/world coordinate conversions centered on the origin
//! - A* routing over walkable tiles with world-space waypoint output
//! - Level configuration in RON or JSON
//!
//! Rendering, input, and the frame loop live with the host application; this
//! crate owns the spatial model and the routing.

pub mod level;
pub mod nav;

// Re-exports for convenience
pub use glam;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::level::{LevelConfig, LevelError};
    pub use crate::nav::{MapError, NavGrid, PathResult, Tile, find_path};
    pub use glam::Vec3;
}
