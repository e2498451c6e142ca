//! Configuration system.
//!
//! Loads scene configuration from JSON strings/files (file IO left to app).

use serde::{Deserialize, Serialize};

/// Root configuration for the lobby scene and its host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Relay address, e.g. `127.0.0.1:40000`.
    pub relay_addr: String,
    /// Canvas extent; also the fixed world and camera bounds.
    #[serde(default = "default_canvas_width")]
    pub canvas_width: f32,
    #[serde(default = "default_canvas_height")]
    pub canvas_height: f32,
    /// Speed applied to the normalized movement vector.
    #[serde(default = "default_move_speed")]
    pub move_speed: f32,
    #[serde(default = "default_camera_zoom")]
    pub camera_zoom: f32,
    /// Camera fade duration before the scene swap.
    #[serde(default = "default_fade_ms")]
    pub fade_ms: u64,
    /// Frames between forced snapshot emissions when nothing changed.
    #[serde(default = "default_snapshot_heartbeat")]
    pub snapshot_heartbeat: u32,
    #[serde(default = "default_player_texture")]
    pub player_texture: String,
    #[serde(default = "default_player_sheet")]
    pub player_sheet: String,
    #[serde(default = "default_map_key")]
    pub map_key: String,
    #[serde(default = "default_map_path")]
    pub map_path: String,
    #[serde(default = "default_tileset_name")]
    pub tileset_name: String,
    #[serde(default = "default_tileset_image")]
    pub tileset_image: String,
    #[serde(default = "default_icon_image")]
    pub icon_image: String,
    /// Layers materialized against the world bounds, in draw order.
    #[serde(default = "default_collision_layers")]
    pub collision_layers: Vec<String>,
    /// Boolean tile property marking collidable tiles.
    #[serde(default = "default_wall_property")]
    pub wall_property: String,
}

fn default_canvas_width() -> f32 {
    800.0
}

fn default_canvas_height() -> f32 {
    600.0
}

fn default_move_speed() -> f32 {
    1.2
}

fn default_camera_zoom() -> f32 {
    2.5
}

fn default_fade_ms() -> u64 {
    2000
}

fn default_snapshot_heartbeat() -> u32 {
    10
}

fn default_player_texture() -> String {
    "player".to_string()
}

fn default_player_sheet() -> String {
    "assets/characters/player.png".to_string()
}

fn default_map_key() -> String {
    "lobby".to_string()
}

fn default_map_path() -> String {
    "assets/backgrounds/lobby.json".to_string()
}

fn default_tileset_name() -> String {
    "spaceship".to_string()
}

fn default_tileset_image() -> String {
    "assets/backgrounds/spaceship.png".to_string()
}

fn default_icon_image() -> String {
    "assets/icons/healthbar.png".to_string()
}

fn default_collision_layers() -> Vec<String> {
    vec![
        "backdrop".to_string(),
        "underlay".to_string(),
        "solid".to_string(),
    ]
}

fn default_wall_property() -> String {
    "wall".to_string()
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            relay_addr: "127.0.0.1:40000".to_string(),
            canvas_width: default_canvas_width(),
            canvas_height: default_canvas_height(),
            move_speed: default_move_speed(),
            camera_zoom: default_camera_zoom(),
            fade_ms: default_fade_ms(),
            snapshot_heartbeat: default_snapshot_heartbeat(),
            player_texture: default_player_texture(),
            player_sheet: default_player_sheet(),
            map_key: default_map_key(),
            map_path: default_map_path(),
            tileset_name: default_tileset_name(),
            tileset_image: default_tileset_image(),
            icon_image: default_icon_image(),
            collision_layers: default_collision_layers(),
            wall_property: default_wall_property(),
        }
    }
}

impl SceneConfig {
    /// Parses config from JSON.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let cfg = SceneConfig::from_json_str(r#"{"relay_addr":"10.0.0.1:5000"}"#).unwrap();
        assert_eq!(cfg.relay_addr, "10.0.0.1:5000");
        assert_eq!(cfg.move_speed, 1.2);
        assert_eq!(cfg.fade_ms, 2000);
        assert_eq!(cfg.collision_layers.len(), 3);
    }
}
