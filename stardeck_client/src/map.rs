//! Map materialization.
//!
//! Turns the parsed lobby map into static collision geometry inside a world
//! clamped to the canvas extent. A missing tileset skips layer creation
//! entirely; a missing layer is skipped on its own.

use stardeck_shared::config::SceneConfig;
use stardeck_shared::stage::Stage;
use stardeck_shared::tilemap::TileMap;
use tracing::debug;

pub fn build_map(stage: &mut dyn Stage, map: &TileMap, cfg: &SceneConfig) {
    let Some(tileset) = map.tileset(&cfg.tileset_name) else {
        debug!(tileset = %cfg.tileset_name, "Tileset not attached, skipping layers");
        return;
    };
    let walls = tileset.flagged_gids(&cfg.wall_property);

    stage.set_world_bounds(cfg.canvas_width, cfg.canvas_height);
    for name in &cfg.collision_layers {
        let Some(layer) = map.layer(name) else {
            debug!(layer = %name, "Layer missing from map, skipped");
            continue;
        };
        let bodies = layer.bodies_for(&walls, map.tile_width, map.tile_height);
        debug!(layer = %name, walls = bodies.len(), "Layer materialized");
        stage.add_collision_layer(name, &bodies);
    }
}
