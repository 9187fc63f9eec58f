//! Tile grid and occupancy map
//!
//! The authoritative spatial model for navigation: a square grid of walkable
//! and wall tiles loaded from a plain-text map, centered on the world origin,
//! with conversions between tile indices and world-space positions.

use std::fmt;
use std::fs;
use std::path::Path;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Map character that marks a wall; any other character is open floor
const WALL: u8 = b'x';

/// A tile coordinate on the grid
///
/// `x` indexes columns (world X axis) and `z` indexes rows (world Z axis).
/// Coordinates are signed so out-of-range probes stay representable and can
/// be rejected instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Column index
    pub x: i32,
    /// Row index
    pub z: i32,
}

impl Tile {
    /// Create a tile coordinate
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Manhattan distance to another tile
    #[must_use]
    pub fn manhattan(self, other: Tile) -> u32 {
        self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Errors that can occur while loading a map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// The map file could not be read
    Io(String),
    /// The map contained no rows
    Empty,
    /// A row's length differs from the first row's
    RaggedRow {
        /// 1-based line number of the offending row
        line: usize,
        /// Columns in the first row
        expected: usize,
        /// Columns in this row
        found: usize,
    },
    /// Row count and column count differ
    NotSquare {
        /// Rows in the map
        rows: usize,
        /// Columns in the first row
        cols: usize,
    },
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {e}"),
            Self::Empty => write!(f, "map has no rows"),
            Self::RaggedRow {
                line,
                expected,
                found,
            } => write!(f, "row {line} has {found} columns, expected {expected}"),
            Self::NotSquare { rows, cols } => {
                write!(f, "map is {rows} rows by {cols} columns, must be square")
            }
        }
    }
}

impl std::error::Error for MapError {}

/// Square occupancy grid with a tile/world coordinate mapping
///
/// The grid covers `size x size` tiles of `tile_size` world units each and
/// is centered on the world origin, so tile `(0, 0)` sits at the corner with
/// the most negative X and Z. All tile centers lie on the `y = 0` plane.
#[derive(Debug, Clone)]
pub struct NavGrid {
    /// Tiles per side
    size: usize,
    /// World-unit edge length of one tile
    tile_size: f32,
    /// Half the grid's world extent, used to center it on the origin
    half: f32,
    /// Row-major wall flags; row = Z, column = X
    walls: Vec<bool>,
}

impl NavGrid {
    /// Create an all-open grid with every tile walkable
    #[must_use]
    pub fn new(size: usize, tile_size: f32) -> Self {
        Self {
            size,
            tile_size,
            half: size as f32 * tile_size / 2.0,
            walls: vec![false; size * size],
        }
    }

    /// Load a grid from a text map file
    ///
    /// Each non-blank line is one row; `'x'` marks a wall and any other
    /// character an open tile. The first row's length fixes the grid size.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the map has no rows, a
    /// row's length differs from the first row's, or the map is not square.
    pub fn load(path: impl AsRef<Path>, tile_size: f32) -> Result<Self, MapError> {
        let text = fs::read_to_string(path).map_err(|e| MapError::Io(e.to_string()))?;
        Self::parse(&text, tile_size)
    }

    /// Parse a grid from an in-memory text map
    ///
    /// # Errors
    ///
    /// Same format and failure rules as [`NavGrid::load`], minus the IO.
    pub fn parse(text: &str, tile_size: f32) -> Result<Self, MapError> {
        let rows: Vec<&str> = text.lines().filter(|line| !line.is_empty()).collect();
        if rows.is_empty() {
            return Err(MapError::Empty);
        }

        let size = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != size {
                return Err(MapError::RaggedRow {
                    line: i + 1,
                    expected: size,
                    found: row.len(),
                });
            }
        }
        if rows.len() != size {
            return Err(MapError::NotSquare {
                rows: rows.len(),
                cols: size,
            });
        }

        let mut walls = Vec::with_capacity(size * size);
        for row in &rows {
            walls.extend(row.bytes().map(|c| c == WALL));
        }

        Ok(Self {
            size,
            tile_size,
            half: size as f32 * tile_size / 2.0,
            walls,
        })
    }

    /// Tiles per side
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// World-unit edge length of one tile
    #[must_use]
    pub fn tile_size(&self) -> f32 {
        self.tile_size
    }

    /// Whether a tile blocks movement
    ///
    /// Out-of-range coordinates count as blocked, so callers can probe
    /// neighbors without bounds-checking first.
    #[must_use]
    pub fn is_wall(&self, x: i32, z: i32) -> bool {
        match self.index(x, z) {
            Some(i) => self.walls[i],
            None => true,
        }
    }

    /// Set one tile's wall flag; out-of-range coordinates are ignored
    pub fn set_wall(&mut self, x: i32, z: i32, wall: bool) {
        if let Some(i) = self.index(x, z) {
            self.walls[i] = wall;
        }
    }

    /// Whether a tile lies within the grid
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        self.index(tile.x, tile.z).is_some()
    }

    /// World position of a tile's center
    #[must_use]
    pub fn tile_to_world(&self, tile: Tile) -> Vec3 {
        let x = (tile.x as f32 + 0.5) * self.tile_size - self.half;
        let z = (tile.z as f32 + 0.5) * self.tile_size - self.half;
        Vec3::new(x, 0.0, z)
    }

    /// Tile containing a world position
    ///
    /// Each axis is clamped into the grid independently, so a position past
    /// the edge resolves to the nearest edge tile rather than failing.
    #[must_use]
    pub fn world_to_tile(&self, world: Vec3) -> Tile {
        let max = self.size.saturating_sub(1) as i32;
        let x = ((world.x + self.half) / self.tile_size).floor() as i32;
        let z = ((world.z + self.half) / self.tile_size).floor() as i32;
        Tile::new(x.clamp(0, max), z.clamp(0, max))
    }

    /// Iterate over all walkable tiles in row-major order
    pub fn walkable_tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let size = self.size as i32;
        (0..size).flat_map(move |z| {
            (0..size).filter_map(move |x| (!self.is_wall(x, z)).then_some(Tile::new(x, z)))
        })
    }

    /// Uniformly sample a walkable tile
    ///
    /// Returns `(0, 0)` when the map has no walkable tile at all; on such a
    /// map the result may therefore be a wall.
    pub fn random_walkable_tile(&self, rng: &mut impl Rng) -> Tile {
        let open: Vec<Tile> = self.walkable_tiles().collect();
        if open.is_empty() {
            return Tile::new(0, 0);
        }
        open[rng.gen_range(0..open.len())]
    }

    fn index(&self, x: i32, z: i32) -> Option<usize> {
        let size = self.size as i32;
        if x < 0 || z < 0 || x >= size || z >= size {
            None
        } else {
            Some(z as usize * self.size + x as usize)
        }
    }
}

impl fmt::Display for NavGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for z in 0..self.size as i32 {
            for x in 0..self.size as i32 {
                write!(f, "{}", if self.is_wall(x, z) { 'x' } else { '.' })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
