//! A* pathfinding on the tile grid
//!
//! Shortest-route search between two tiles with 4-directional unit-cost
//! movement and a Manhattan heuristic. Search nodes live in a per-call arena
//! addressed by index; the open set is a binary heap ordered by f-cost with
//! insertion-order tie-breaking, so expansion order and results are
//! deterministic. When a cheaper route to a tile still on the frontier turns
//! up, the node's cost and parent are rewritten and it is re-queued; stale
//! heap entries are skipped when popped. Routes are therefore always
//! shortest.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use glam::Vec3;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::nav::grid::{NavGrid, Tile};

/// The four orthogonal step directions, in expansion order
const DIRECTIONS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

// ============================================================================
// Path Result
// ============================================================================

/// Result of a path query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathResult {
    /// Tiles from start to goal inclusive; empty when no route exists
    pub tiles: Vec<Tile>,
}

impl PathResult {
    /// Whether no route was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Number of steps along the route, one less than the tile count
    #[must_use]
    pub fn steps(&self) -> usize {
        self.tiles.len().saturating_sub(1)
    }

    /// World-space waypoints at the centers of the route's tiles
    ///
    /// This is the sequence a movement follower consumes; the follower
    /// itself lives with the caller.
    #[must_use]
    pub fn waypoints(&self, grid: &NavGrid) -> Vec<Vec3> {
        self.tiles.iter().map(|&t| grid.tile_to_world(t)).collect()
    }
}

// ============================================================================
// Search
// ============================================================================

/// A search node in the per-call arena
struct Node {
    tile: Tile,
    /// Steps from the start along the best known route
    g: u32,
    /// Manhattan estimate to the goal
    h: u32,
    /// Arena index of the predecessor on the best known route
    parent: Option<usize>,
    /// Popped with its final cost; never revisited
    closed: bool,
}

impl Node {
    fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// Open-set entry ordered by lowest f-cost, then by insertion order
#[derive(PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    seq: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap pops the minimum; earlier pushes win ties
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Find a shortest walkable route between two tiles
///
/// Returns the tile sequence from `start` to `goal` inclusive. The result is
/// empty when either endpoint is out of range or a wall, or when no route
/// exists; `start == goal` on a walkable tile yields that single tile.
#[must_use]
pub fn find_path(grid: &NavGrid, start: Tile, goal: Tile) -> PathResult {
    if !grid.contains(start) || !grid.contains(goal) {
        return PathResult::default();
    }
    if grid.is_wall(start.x, start.z) || grid.is_wall(goal.x, goal.z) {
        return PathResult::default();
    }

    let mut arena = vec![Node {
        tile: start,
        g: 0,
        h: start.manhattan(goal),
        parent: None,
        closed: false,
    }];
    let mut by_tile: FxHashMap<Tile, usize> = FxHashMap::default();
    by_tile.insert(start, 0);

    let mut seq: u64 = 0;
    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        f: arena[0].f(),
        seq,
        node: 0,
    });

    while let Some(entry) = open.pop() {
        let current = entry.node;
        if arena[current].closed || entry.f > arena[current].f() {
            // Stale entry superseded by a cheaper re-queue
            continue;
        }
        arena[current].closed = true;

        if arena[current].tile == goal {
            let tiles = reconstruct(&arena, current);
            log::debug!(
                "path {start} -> {goal}: {} tiles ({} nodes searched)",
                tiles.len(),
                arena.len()
            );
            return PathResult { tiles };
        }

        let current_tile = arena[current].tile;
        let next_g = arena[current].g + 1;
        for next in neighbors(grid, current_tile) {
            match by_tile.get(&next).copied() {
                Some(i) if arena[i].closed => {}
                Some(i) => {
                    if next_g < arena[i].g {
                        // Cheaper route to a frontier node: relax and re-queue
                        arena[i].g = next_g;
                        arena[i].parent = Some(current);
                        seq += 1;
                        open.push(OpenEntry {
                            f: arena[i].f(),
                            seq,
                            node: i,
                        });
                    }
                }
                None => {
                    let i = arena.len();
                    arena.push(Node {
                        tile: next,
                        g: next_g,
                        h: next.manhattan(goal),
                        parent: Some(current),
                        closed: false,
                    });
                    by_tile.insert(next, i);
                    seq += 1;
                    open.push(OpenEntry {
                        f: arena[i].f(),
                        seq,
                        node: i,
                    });
                }
            }
        }
    }

    log::debug!("no path from {start} to {goal}");
    PathResult::default()
}

/// Walkable orthogonal neighbors of a tile
///
/// Out-of-range tiles read as walls, so this also enforces the grid bounds.
fn neighbors(grid: &NavGrid, tile: Tile) -> SmallVec<[Tile; 4]> {
    let mut out = SmallVec::new();
    for (dx, dz) in DIRECTIONS {
        let next = Tile::new(tile.x + dx, tile.z + dz);
        if !grid.is_wall(next.x, next.z) {
            out.push(next);
        }
    }
    out
}

/// Walk parent links back to the start, then reverse into traversal order
fn reconstruct(arena: &[Node], end: usize) -> Vec<Tile> {
    let mut tiles = Vec::new();
    let mut cursor = Some(end);
    while let Some(i) = cursor {
        tiles.push(arena[i].tile);
        cursor = arena[i].parent;
    }
    tiles.reverse();
    tiles
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;
    use std::collections::VecDeque;

    /// Brute-force shortest step count, or None when the goal is unreachable
    fn bfs_steps(grid: &NavGrid, start: Tile, goal: Tile) -> Option<usize> {
        let mut dist: FxHashMap<Tile, usize> = FxHashMap::default();
        let mut queue = VecDeque::new();
        dist.insert(start, 0);
        queue.push_back(start);
        while let Some(tile) = queue.pop_front() {
            let d = dist[&tile];
            if tile == goal {
                return Some(d);
            }
            for next in neighbors(grid, tile) {
                if !dist.contains_key(&next) {
                    dist.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }
        None
    }

    fn assert_route_valid(path: &PathResult, start: Tile, goal: Tile) {
        assert_eq!(path.tiles.first(), Some(&start));
        assert_eq!(path.tiles.last(), Some(&goal));
        for pair in path.tiles.windows(2) {
            assert_eq!(
                pair[0].manhattan(pair[1]),
                1,
                "non-orthogonal step in {:?}",
                path.tiles
            );
        }
    }

    #[test]
    fn test_crosses_open_grid() {
        let grid = NavGrid::new(3, 1.0);
        let path = find_path(&grid, Tile::new(0, 0), Tile::new(2, 2));
        assert_eq!(path.tiles.len(), 5);
        assert_eq!(path.steps(), 4);
        assert_route_valid(&path, Tile::new(0, 0), Tile::new(2, 2));
    }

    #[test]
    fn test_routes_around_center_wall() {
        let grid = NavGrid::parse("...\n.x.\n...\n", 1.0).unwrap();
        let path = find_path(&grid, Tile::new(0, 0), Tile::new(2, 2));
        assert_eq!(path.steps(), 4);
        assert_route_valid(&path, Tile::new(0, 0), Tile::new(2, 2));
        assert!(!path.tiles.contains(&Tile::new(1, 1)));
    }

    #[test]
    fn test_corridor_has_exact_route() {
        let grid = NavGrid::parse("...\nxxx\nxxx\n", 1.0).unwrap();
        let path = find_path(&grid, Tile::new(0, 0), Tile::new(2, 0));
        assert_eq!(
            path.tiles,
            vec![Tile::new(0, 0), Tile::new(1, 0), Tile::new(2, 0)]
        );
    }

    #[test]
    fn test_equal_cost_routes_resolve_deterministically() {
        // Ties on f break by insertion order and +x expands first, so the
        // open 3x3 corner route always walks the x edge before turning
        let grid = NavGrid::new(3, 1.0);
        let path = find_path(&grid, Tile::new(0, 0), Tile::new(2, 2));
        assert_eq!(
            path.tiles,
            vec![
                Tile::new(0, 0),
                Tile::new(1, 0),
                Tile::new(2, 0),
                Tile::new(2, 1),
                Tile::new(2, 2)
            ]
        );
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = NavGrid::new(3, 1.0);
        let path = find_path(&grid, Tile::new(1, 0), Tile::new(1, 0));
        assert_eq!(path.tiles, vec![Tile::new(1, 0)]);
        assert_eq!(path.steps(), 0);
    }

    #[test]
    fn test_wall_endpoints_return_empty() {
        let grid = NavGrid::parse("...\n.x.\n...\n", 1.0).unwrap();
        let wall = Tile::new(1, 1);
        assert!(find_path(&grid, Tile::new(0, 0), wall).is_empty());
        assert!(find_path(&grid, wall, Tile::new(2, 2)).is_empty());
        assert!(find_path(&grid, wall, wall).is_empty());
    }

    #[test]
    fn test_out_of_range_endpoints_return_empty() {
        let grid = NavGrid::new(3, 1.0);
        assert!(find_path(&grid, Tile::new(-1, 0), Tile::new(2, 2)).is_empty());
        assert!(find_path(&grid, Tile::new(0, 0), Tile::new(0, 3)).is_empty());
    }

    #[test]
    fn test_sealed_goal_returns_empty() {
        let grid = NavGrid::parse("...\n..x\n.x.\n", 1.0).unwrap();
        let path = find_path(&grid, Tile::new(0, 0), Tile::new(2, 2));
        assert!(path.is_empty());
        assert_eq!(path.steps(), 0);
    }

    #[test]
    fn test_threads_serpentine_maze() {
        let grid = NavGrid::parse(
            ".......\n\
             xxxxxx.\n\
             .......\n\
             .xxxxxx\n\
             .......\n\
             xxxxxx.\n\
             .......\n",
            1.0,
        )
        .unwrap();
        let start = Tile::new(0, 0);
        let goal = Tile::new(6, 6);
        let path = find_path(&grid, start, goal);
        assert_route_valid(&path, start, goal);
        assert_eq!(path.steps(), 24);
        assert_eq!(bfs_steps(&grid, start, goal), Some(24));
    }

    #[test]
    fn test_shortest_lengths_match_bfs_on_random_grids() {
        let mut rng = Pcg32::seed_from_u64(0xA5A5);
        for round in 0..40 {
            let mut grid = NavGrid::new(12, 1.0);
            for z in 0..12 {
                for x in 0..12 {
                    grid.set_wall(x, z, rng.gen_range(0..100) < 25);
                }
            }
            let start = grid.random_walkable_tile(&mut rng);
            let goal = grid.random_walkable_tile(&mut rng);
            if grid.is_wall(start.x, start.z) || grid.is_wall(goal.x, goal.z) {
                // All-wall board fell back to the origin sentinel
                continue;
            }
            let path = find_path(&grid, start, goal);
            match bfs_steps(&grid, start, goal) {
                Some(steps) => {
                    assert_route_valid(&path, start, goal);
                    assert_eq!(path.steps(), steps, "round {round}: {start} -> {goal}");
                    for tile in &path.tiles {
                        assert!(!grid.is_wall(tile.x, tile.z));
                    }
                }
                None => assert!(path.is_empty(), "round {round}: routed through walls"),
            }
        }
    }

    #[test]
    fn test_waypoints_follow_tile_centers() {
        let grid = NavGrid::parse("...\nxxx\nxxx\n", 0.5).unwrap();
        let path = find_path(&grid, Tile::new(0, 0), Tile::new(2, 0));
        let waypoints = path.waypoints(&grid);
        assert_eq!(waypoints.len(), path.tiles.len());
        let expected = [(-0.5, -0.5), (0.0, -0.5), (0.5, -0.5)];
        for (point, (x, z)) in waypoints.iter().zip(expected) {
            assert!((point.x - x).abs() < 1e-6);
            assert!((point.z - z).abs() < 1e-6);
            assert_eq!(point.y, 0.0);
        }
        assert!(PathResult::default().waypoints(&grid).is_empty());
    }
}
