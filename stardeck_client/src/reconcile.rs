//! Remote player reconciliation.
//!
//! Maps the relay's periodic all-players snapshots onto stage sprites:
//! unseen identifiers get a sprite, known ones are updated in place, and
//! only an explicit disconnect removes one. Absence from a snapshot is not
//! removal; the relay may simply have skipped a sender that frame.

use std::collections::{HashMap, HashSet};

use stardeck_shared::anim::AnimId;
use stardeck_shared::math::Vec2;
use stardeck_shared::proto::{PlayerSnapshot, SessionId};
use stardeck_shared::stage::{SpriteBody, SpriteId, Stage};
use tracing::debug;

/// Sprites standing in for the other connected sessions.
#[derive(Default)]
pub struct RemoteRoster {
    sprites: HashMap<SessionId, SpriteId>,
    /// Identifiers the relay reported disconnected. A stale snapshot that
    /// still mentions one of these must not resurrect it.
    departed: HashSet<SessionId>,
}

impl RemoteRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn sprite(&self, id: &SessionId) -> Option<SpriteId> {
        self.sprites.get(id).copied()
    }

    /// Applies one all-players snapshot delivery.
    ///
    /// Remote sprites are kinematic puppets: velocity comes straight from
    /// the snapshot, never from re-simulation.
    pub fn apply_update(
        &mut self,
        stage: &mut dyn Stage,
        local: Option<&SessionId>,
        players: &[PlayerSnapshot],
        texture: &str,
        body: &SpriteBody,
    ) {
        for player in players {
            let Some(id) = player.id.as_ref() else {
                // Nothing to key an entity on.
                continue;
            };
            if Some(id) == local {
                continue;
            }
            if let Some(&sprite) = self.sprites.get(id) {
                stage.set_velocity(sprite, Vec2::new(player.velocityx, player.velocityy));
                Self::apply_animation(stage, sprite, player);
            } else {
                if self.departed.contains(id) {
                    continue;
                }
                let sprite =
                    stage.spawn_sprite(texture, Vec2::new(player.posx, player.posy));
                stage.configure_body(sprite, body);
                self.sprites.insert(id.clone(), sprite);
                debug!(player = %id, "Remote player joined");
                Self::apply_animation(stage, sprite, player);
            }
        }
    }

    /// Selects the remote pose purely from the snapshot's `key` and the
    /// sign of its horizontal velocity.
    fn apply_animation(stage: &mut dyn Stage, sprite: SpriteId, player: &PlayerSnapshot) {
        let Some(anim) = player.animation else {
            return;
        };
        match player.key {
            None | Some(AnimId::Dead) => {
                stage.set_frozen(sprite, true);
                stage.play_once(sprite, AnimId::Laying);
            }
            Some(AnimId::MoveX) if player.velocityx < 0.0 => {
                stage.set_flip_x(sprite, true);
                stage.play_looping(sprite, anim);
            }
            Some(AnimId::MoveX) if player.velocityx > 0.0 => {
                stage.play_looping(sprite, anim);
                stage.set_flip_x(sprite, false);
            }
            Some(_) => stage.play_looping(sprite, anim),
        }
    }

    /// Handles an explicit disconnect notification for one identifier.
    pub fn apply_disconnect(&mut self, stage: &mut dyn Stage, id: &SessionId) {
        self.departed.insert(id.clone());
        if let Some(sprite) = self.sprites.remove(id) {
            stage.destroy_sprite(sprite);
            debug!(player = %id, "Remote player left");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stardeck_shared::stage::RecordingStage;

    fn snap(id: &str, vx: f32, anim: AnimId, key: Option<AnimId>) -> PlayerSnapshot {
        PlayerSnapshot {
            id: Some(id.into()),
            posx: 50.0,
            posy: 60.0,
            velocityx: vx,
            velocityy: 0.0,
            animation: Some(anim),
            key,
        }
    }

    #[test]
    fn repeated_snapshots_create_one_sprite() {
        let mut stage = RecordingStage::new();
        let mut roster = RemoteRoster::new();
        for _ in 0..5 {
            roster.apply_update(
                &mut stage,
                None,
                &[snap("a", 0.0, AnimId::StandDown, Some(AnimId::StandDown))],
                "player",
                &SpriteBody::PLAYER,
            );
        }
        assert_eq!(roster.len(), 1);
        assert_eq!(stage.live_sprite_count(), 1);
    }

    #[test]
    fn local_and_anonymous_entries_are_skipped() {
        let mut stage = RecordingStage::new();
        let mut roster = RemoteRoster::new();
        let me: SessionId = "me".into();
        let mut anonymous = snap("x", 0.0, AnimId::StandDown, Some(AnimId::StandDown));
        anonymous.id = None;
        roster.apply_update(
            &mut stage,
            Some(&me),
            &[snap("me", 0.0, AnimId::StandDown, Some(AnimId::StandDown)), anonymous],
            "player",
            &SpriteBody::PLAYER,
        );
        assert!(roster.is_empty());
        assert_eq!(stage.live_sprite_count(), 0);
    }

    #[test]
    fn absence_from_snapshot_retains_entity() {
        let mut stage = RecordingStage::new();
        let mut roster = RemoteRoster::new();
        roster.apply_update(
            &mut stage,
            None,
            &[snap("a", -1.2, AnimId::MoveX, Some(AnimId::MoveX))],
            "player",
            &SpriteBody::PLAYER,
        );
        let sprite = roster.sprite(&"a".into()).unwrap();

        // Deliveries that omit "a" leave it untouched.
        roster.apply_update(
            &mut stage,
            None,
            &[snap("b", 0.0, AnimId::StandDown, Some(AnimId::StandDown))],
            "player",
            &SpriteBody::PLAYER,
        );
        let state = stage.sprite(sprite).unwrap();
        assert!(state.alive);
        assert!(state.flip_x);
        assert_eq!(state.playing, Some((AnimId::MoveX, true)));
    }

    #[test]
    fn negative_lateral_velocity_flips_new_sprite() {
        let mut stage = RecordingStage::new();
        let mut roster = RemoteRoster::new();
        roster.apply_update(
            &mut stage,
            None,
            &[snap("a", -3.0, AnimId::MoveX, Some(AnimId::MoveX))],
            "player",
            &SpriteBody::PLAYER,
        );
        let state = stage.sprite(roster.sprite(&"a".into()).unwrap()).unwrap();
        assert!(state.flip_x);
        assert_eq!(state.playing, Some((AnimId::MoveX, true)));

        // Turning around clears the flip.
        roster.apply_update(
            &mut stage,
            None,
            &[snap("a", 2.0, AnimId::MoveX, Some(AnimId::MoveX))],
            "player",
            &SpriteBody::PLAYER,
        );
        let state = stage.sprite(roster.sprite(&"a".into()).unwrap()).unwrap();
        assert!(!state.flip_x);
    }

    #[test]
    fn dead_key_freezes_and_lays_once() {
        let mut stage = RecordingStage::new();
        let mut roster = RemoteRoster::new();
        roster.apply_update(
            &mut stage,
            None,
            &[snap("b", 0.0, AnimId::StandDown, Some(AnimId::StandDown))],
            "player",
            &SpriteBody::PLAYER,
        );
        roster.apply_update(
            &mut stage,
            None,
            &[snap("b", 0.0, AnimId::Dead, Some(AnimId::Dead))],
            "player",
            &SpriteBody::PLAYER,
        );
        let state = stage.sprite(roster.sprite(&"b".into()).unwrap()).unwrap();
        assert!(state.frozen);
        assert_eq!(state.playing, Some((AnimId::Laying, false)));
    }

    #[test]
    fn missing_key_is_treated_as_terminal() {
        let mut stage = RecordingStage::new();
        let mut roster = RemoteRoster::new();
        roster.apply_update(
            &mut stage,
            None,
            &[snap("b", 0.0, AnimId::Dead, None)],
            "player",
            &SpriteBody::PLAYER,
        );
        let state = stage.sprite(roster.sprite(&"b".into()).unwrap()).unwrap();
        assert!(state.frozen);
        assert_eq!(state.playing, Some((AnimId::Laying, false)));
    }

    #[test]
    fn disconnect_wins_over_later_snapshots() {
        let mut stage = RecordingStage::new();
        let mut roster = RemoteRoster::new();
        roster.apply_update(
            &mut stage,
            None,
            &[snap("x", 0.0, AnimId::StandDown, Some(AnimId::StandDown))],
            "player",
            &SpriteBody::PLAYER,
        );
        let sprite = roster.sprite(&"x".into()).unwrap();

        roster.apply_disconnect(&mut stage, &"x".into());
        assert!(roster.is_empty());
        assert!(!stage.sprite(sprite).unwrap().alive);

        // A stale delivery still mentioning "x" must not bring it back.
        roster.apply_update(
            &mut stage,
            None,
            &[snap("x", 0.0, AnimId::StandDown, Some(AnimId::StandDown))],
            "player",
            &SpriteBody::PLAYER,
        );
        assert!(roster.is_empty());
        assert_eq!(stage.live_sprite_count(), 0);
    }
}
