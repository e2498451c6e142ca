//! Stage abstraction.
//!
//! The scene does not depend on a concrete engine. The trait here describes
//! the capabilities it consumes (sprite/physics handles, animation playback,
//! camera control, the overlay affordance), and a recording implementation
//! backs headless tests.

use std::collections::HashMap;

use crate::anim::{AnimId, AnimSpec};
use crate::math::Vec2;

/// Handle to a sprite owned by the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteId(pub u64);

/// Visual + physics configuration applied to every player sprite, local or
/// remote.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteBody {
    pub display_w: f32,
    pub display_h: f32,
    pub body_w: f32,
    pub body_h: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    pub fixed_rotation: bool,
}

impl SpriteBody {
    /// The player rig: 70×90 display over a 20×35 collision rectangle,
    /// origin dropped to the feet, rotation locked.
    pub const PLAYER: SpriteBody = SpriteBody {
        display_w: 70.0,
        display_h: 90.0,
        body_w: 20.0,
        body_h: 35.0,
        origin_x: 0.5,
        origin_y: 0.70,
        fixed_rotation: true,
    };
}

/// One static collision rectangle in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileBody {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Engine capabilities the scene consumes.
pub trait Stage {
    // Asset loading (queued during preload).
    fn load_spritesheet(&mut self, key: &str, path: &str, frame_w: u32, frame_h: u32);
    fn load_tilemap(&mut self, key: &str, path: &str);
    fn load_image(&mut self, key: &str, path: &str);
    fn register_animation(&mut self, spec: &AnimSpec);

    // World setup.
    fn set_world_bounds(&mut self, width: f32, height: f32);
    fn add_collision_layer(&mut self, name: &str, tiles: &[TileBody]);

    // Sprites.
    fn spawn_sprite(&mut self, texture: &str, position: Vec2) -> SpriteId;
    fn configure_body(&mut self, id: SpriteId, body: &SpriteBody);
    fn set_velocity(&mut self, id: SpriteId, velocity: Vec2);
    fn position(&self, id: SpriteId) -> Vec2;
    fn set_flip_x(&mut self, id: SpriteId, flip: bool);
    fn play_looping(&mut self, id: SpriteId, anim: AnimId);
    fn play_once(&mut self, id: SpriteId, anim: AnimId);
    /// Removes the sprite from physics; a frozen body ignores velocity.
    fn set_frozen(&mut self, id: SpriteId, frozen: bool);
    fn destroy_sprite(&mut self, id: SpriteId);

    // Camera and overlay.
    fn camera_set_bounds(&mut self, width: f32, height: f32);
    fn camera_follow(&mut self, id: SpriteId);
    fn camera_zoom(&mut self, zoom: f32);
    fn camera_fade_out(&mut self, duration_ms: u64);
    fn show_start_button(&mut self, label: &str);
}

/// Observable state of one recorded sprite.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteState {
    pub texture: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub flip_x: bool,
    pub frozen: bool,
    /// Currently playing animation and whether it loops.
    pub playing: Option<(AnimId, bool)>,
    pub body: Option<SpriteBody>,
    pub alive: bool,
}

/// Headless stage that records every call for assertions.
#[derive(Default)]
pub struct RecordingStage {
    next_id: u64,
    sprites: HashMap<SpriteId, SpriteState>,
    pub loaded_assets: Vec<String>,
    pub animations: Vec<AnimId>,
    pub world_bounds: Option<(f32, f32)>,
    /// Layer name and how many tile bodies it contributed.
    pub collision_layers: Vec<(String, usize)>,
    pub camera_bounds: Option<(f32, f32)>,
    pub camera_target: Option<SpriteId>,
    pub camera_zoom: Option<f32>,
    pub fades: Vec<u64>,
    pub start_button: Option<String>,
}

impl RecordingStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&SpriteState> {
        self.sprites.get(&id)
    }

    pub fn live_sprite_count(&self) -> usize {
        self.sprites.values().filter(|s| s.alive).count()
    }
}

impl Stage for RecordingStage {
    fn load_spritesheet(&mut self, key: &str, _path: &str, _frame_w: u32, _frame_h: u32) {
        self.loaded_assets.push(key.to_string());
    }

    fn load_tilemap(&mut self, key: &str, _path: &str) {
        self.loaded_assets.push(key.to_string());
    }

    fn load_image(&mut self, key: &str, _path: &str) {
        self.loaded_assets.push(key.to_string());
    }

    fn register_animation(&mut self, spec: &AnimSpec) {
        self.animations.push(spec.id);
    }

    fn set_world_bounds(&mut self, width: f32, height: f32) {
        self.world_bounds = Some((width, height));
    }

    fn add_collision_layer(&mut self, name: &str, tiles: &[TileBody]) {
        self.collision_layers.push((name.to_string(), tiles.len()));
    }

    fn spawn_sprite(&mut self, texture: &str, position: Vec2) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.sprites.insert(
            id,
            SpriteState {
                texture: texture.to_string(),
                position,
                velocity: Vec2::ZERO,
                flip_x: false,
                frozen: false,
                playing: None,
                body: None,
                alive: true,
            },
        );
        id
    }

    fn configure_body(&mut self, id: SpriteId, body: &SpriteBody) {
        if let Some(s) = self.sprites.get_mut(&id) {
            s.body = Some(*body);
        }
    }

    fn set_velocity(&mut self, id: SpriteId, velocity: Vec2) {
        if let Some(s) = self.sprites.get_mut(&id) {
            if !s.frozen {
                s.velocity = velocity;
            }
        }
    }

    fn position(&self, id: SpriteId) -> Vec2 {
        self.sprites.get(&id).map(|s| s.position).unwrap_or(Vec2::ZERO)
    }

    fn set_flip_x(&mut self, id: SpriteId, flip: bool) {
        if let Some(s) = self.sprites.get_mut(&id) {
            s.flip_x = flip;
        }
    }

    fn play_looping(&mut self, id: SpriteId, anim: AnimId) {
        if let Some(s) = self.sprites.get_mut(&id) {
            s.playing = Some((anim, true));
        }
    }

    fn play_once(&mut self, id: SpriteId, anim: AnimId) {
        if let Some(s) = self.sprites.get_mut(&id) {
            s.playing = Some((anim, false));
        }
    }

    fn set_frozen(&mut self, id: SpriteId, frozen: bool) {
        if let Some(s) = self.sprites.get_mut(&id) {
            s.frozen = frozen;
            if frozen {
                s.velocity = Vec2::ZERO;
            }
        }
    }

    fn destroy_sprite(&mut self, id: SpriteId) {
        if let Some(s) = self.sprites.get_mut(&id) {
            s.alive = false;
        }
    }

    fn camera_set_bounds(&mut self, width: f32, height: f32) {
        self.camera_bounds = Some((width, height));
    }

    fn camera_follow(&mut self, id: SpriteId) {
        self.camera_target = Some(id);
    }

    fn camera_zoom(&mut self, zoom: f32) {
        self.camera_zoom = Some(zoom);
    }

    fn camera_fade_out(&mut self, duration_ms: u64) {
        self.fades.push(duration_ms);
    }

    fn show_start_button(&mut self, label: &str) {
        self.start_button = Some(label.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_sprite_ignores_velocity() {
        let mut stage = RecordingStage::new();
        let id = stage.spawn_sprite("player", Vec2::new(10.0, 10.0));
        stage.set_frozen(id, true);
        stage.set_velocity(id, Vec2::new(1.0, 1.0));
        assert_eq!(stage.sprite(id).unwrap().velocity, Vec2::ZERO);
    }

    #[test]
    fn destroy_marks_sprite_dead() {
        let mut stage = RecordingStage::new();
        let id = stage.spawn_sprite("player", Vec2::ZERO);
        assert_eq!(stage.live_sprite_count(), 1);
        stage.destroy_sprite(id);
        assert_eq!(stage.live_sprite_count(), 0);
    }
}
