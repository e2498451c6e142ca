//! Animation registry.
//!
//! The sprite-sheet frame ranges below are a fixed contract: every peer in a
//! session plays the same sheet, so the identifiers and frame ranges must
//! stay byte-identical across clients for remote players to render
//! correctly.

use serde::{Deserialize, Serialize};

/// Sprite-sheet frame dimensions.
pub const FRAME_WIDTH: u32 = 48;
pub const FRAME_HEIGHT: u32 = 48;

/// Cardinal facing of a player entity. Persists across idle frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

/// Identifier of one animation in the registry.
///
/// Serialized as the exact strings peers exchange in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimId {
    #[serde(rename = "attack_down")]
    AttackDown,
    #[serde(rename = "attack_right")]
    AttackRight,
    #[serde(rename = "attack_left")]
    AttackLeft,
    #[serde(rename = "attack_up")]
    AttackUp,
    #[serde(rename = "move_x")]
    MoveX,
    #[serde(rename = "up")]
    Up,
    #[serde(rename = "down")]
    Down,
    #[serde(rename = "stand_down")]
    StandDown,
    #[serde(rename = "stand_up")]
    StandUp,
    #[serde(rename = "stand_left")]
    StandLeft,
    #[serde(rename = "stand_right")]
    StandRight,
    #[serde(rename = "dead")]
    Dead,
    #[serde(rename = "laying")]
    Laying,
}

impl AnimId {
    /// Idle pose for a facing.
    pub fn stand(facing: Facing) -> Self {
        match facing {
            Facing::Up => AnimId::StandUp,
            Facing::Down => AnimId::StandDown,
            Facing::Left => AnimId::StandLeft,
            Facing::Right => AnimId::StandRight,
        }
    }

    /// Attack pose for a facing.
    pub fn attack(facing: Facing) -> Self {
        match facing {
            Facing::Up => AnimId::AttackUp,
            Facing::Down => AnimId::AttackDown,
            Facing::Left => AnimId::AttackLeft,
            Facing::Right => AnimId::AttackRight,
        }
    }
}

/// One registry entry: an inclusive frame range plus playback parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimSpec {
    pub id: AnimId,
    pub first_frame: u32,
    pub last_frame: u32,
    pub frame_rate: u32,
    /// Looping animations repeat forever; the rest play through once.
    pub looped: bool,
}

/// The full animation table for the player sheet.
pub const REGISTRY: [AnimSpec; 13] = [
    AnimSpec { id: AnimId::AttackDown, first_frame: 36, last_frame: 39, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::AttackRight, first_frame: 42, last_frame: 45, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::AttackLeft, first_frame: 42, last_frame: 45, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::AttackUp, first_frame: 48, last_frame: 51, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::MoveX, first_frame: 24, last_frame: 29, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::Up, first_frame: 30, last_frame: 35, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::Down, first_frame: 18, last_frame: 23, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::StandDown, first_frame: 0, last_frame: 5, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::StandUp, first_frame: 12, last_frame: 17, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::StandLeft, first_frame: 6, last_frame: 11, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::StandRight, first_frame: 6, last_frame: 11, frame_rate: 10, looped: true },
    AnimSpec { id: AnimId::Dead, first_frame: 54, last_frame: 56, frame_rate: 4, looped: false },
    AnimSpec { id: AnimId::Laying, first_frame: 56, last_frame: 56, frame_rate: 4, looped: false },
];

/// Looks up the spec for an animation id.
pub fn spec(id: AnimId) -> &'static AnimSpec {
    REGISTRY
        .iter()
        .find(|s| s.id == id)
        .expect("registry covers every AnimId")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_covers_every_id() {
        for entry in &REGISTRY {
            assert_eq!(spec(entry.id), entry);
        }
    }

    #[test]
    fn wire_names_match_peer_contract() {
        let json = serde_json::to_string(&AnimId::MoveX).unwrap();
        assert_eq!(json, "\"move_x\"");
        let json = serde_json::to_string(&AnimId::StandDown).unwrap();
        assert_eq!(json, "\"stand_down\"");
        let back: AnimId = serde_json::from_str("\"dead\"").unwrap();
        assert_eq!(back, AnimId::Dead);
    }

    #[test]
    fn stand_and_attack_follow_facing() {
        assert_eq!(AnimId::stand(Facing::Left), AnimId::StandLeft);
        assert_eq!(AnimId::attack(Facing::Up), AnimId::AttackUp);
    }

    #[test]
    fn terminal_poses_do_not_loop() {
        assert!(!spec(AnimId::Dead).looped);
        assert!(!spec(AnimId::Laying).looped);
        assert!(spec(AnimId::MoveX).looped);
    }
}
