//! Demo: route a courier through randomly scattered pickup items

use gridnav::prelude::*;

/// Level file consulted before falling back to defaults
const LEVEL_PATH: &str = "assets/level.ron";

/// Built-in map used when the configured map file is missing
const FALLBACK_MAP: &str = "\
........
.xx..x..
.....x..
.x......
.x..xx..
......x.
.xx...x.
........
";

fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match LevelConfig::load_ron(LEVEL_PATH) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("No level at {LEVEL_PATH} ({e}), using defaults");
            LevelConfig::default()
        }
    };
    log::info!(
        "Level '{}': map {}, {} items",
        config.name,
        config.map,
        config.item_count
    );

    let grid = match NavGrid::load(&config.map, config.tile_size) {
        Ok(grid) => grid,
        Err(e) => {
            log::warn!("Could not load {} ({e}), using built-in map", config.map);
            NavGrid::parse(FALLBACK_MAP, config.tile_size)?
        }
    };
    log::debug!("Loaded {size}x{size} map:\n{grid}", size = grid.size());

    let mut rng = rand::thread_rng();

    let mut at = config.player_start;
    if grid.is_wall(at.x, at.z) {
        at = grid.random_walkable_tile(&mut rng);
        log::warn!("Configured start is a wall, moving the courier to {at}");
    }

    let mut collected = 0;
    for _ in 0..config.item_count {
        let item = grid.random_walkable_tile(&mut rng);
        let path = find_path(&grid, at, item);
        if path.is_empty() {
            log::info!("Item at {item} is unreachable from {at}");
            continue;
        }
        let waypoints = path.waypoints(&grid);
        if let Some(dest) = waypoints.last() {
            log::info!(
                "Collected item at {item}: {} steps to ({:.2}, {:.2})",
                path.steps(),
                dest.x,
                dest.z
            );
        }
        at = item;
        collected += 1;
    }
    log::info!(
        "Run complete: {collected}/{} items collected",
        config.item_count
    );

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Demo error: {e}");
    }
}
