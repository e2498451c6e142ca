//! Local player controller.
//!
//! Once per frame the controller turns the pressed-button set into a
//! velocity, a facing, and an animation. Priority: knockdown, then attack,
//! then movement. The wish vector is normalized before scaling so diagonal
//! movement is exactly as fast as axis-aligned movement.

use stardeck_shared::anim::{AnimId, Facing};
use stardeck_shared::math::Vec2;

use crate::input::Buttons;

/// What the scene should do with the local entity this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlAction {
    /// Terminal state was reached on an earlier frame; nothing to apply and
    /// nothing to emit.
    Suspended,
    /// The knockdown input fired this frame: zero the body, play the dead
    /// pose once, freeze, and emit exactly one terminal snapshot.
    Knockdown,
    /// Regular frame: apply velocity and animation, emit a snapshot.
    Move {
        velocity: Vec2,
        anim: AnimId,
        /// `Some` only when a horizontal key decided the flip this frame.
        flip: Option<bool>,
    },
}

/// Per-scene controller state for the locally-owned entity.
#[derive(Debug)]
pub struct Controller {
    facing: Facing,
    knocked_down: bool,
    speed: f32,
}

impl Controller {
    pub fn new(speed: f32) -> Self {
        Self {
            facing: Facing::default(),
            knocked_down: false,
            speed,
        }
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_knocked_down(&self) -> bool {
        self.knocked_down
    }

    /// Runs one frame of input resolution.
    pub fn tick(&mut self, buttons: Buttons) -> ControlAction {
        if self.knocked_down {
            return ControlAction::Suspended;
        }
        if buttons.contains(Buttons::KNOCKDOWN) {
            self.knocked_down = true;
            return ControlAction::Knockdown;
        }

        let mut wish = Vec2::ZERO;
        let mut flip = None;
        let anim = if buttons.contains(Buttons::ATTACK) {
            // Attack wins over movement; directional keys are ignored while
            // it is held, so the facing stays whatever it last was.
            AnimId::attack(self.facing)
        } else {
            if buttons.contains(Buttons::UP) {
                wish.y = -1.0;
            } else if buttons.contains(Buttons::DOWN) {
                wish.y = 1.0;
            }
            if buttons.contains(Buttons::LEFT) {
                wish.x = -1.0;
                flip = Some(true);
            } else if buttons.contains(Buttons::RIGHT) {
                wish.x = 1.0;
                flip = Some(false);
            }

            if wish.x != 0.0 {
                // A horizontal choice overwrites the facing and plays the
                // lateral animation even when moving diagonally.
                self.facing = if wish.x < 0.0 {
                    Facing::Left
                } else {
                    Facing::Right
                };
                AnimId::MoveX
            } else if wish.y != 0.0 {
                if wish.y < 0.0 {
                    self.facing = Facing::Up;
                    AnimId::Up
                } else {
                    self.facing = Facing::Down;
                    AnimId::Down
                }
            } else {
                AnimId::stand(self.facing)
            }
        };

        ControlAction::Move {
            velocity: wish.normalized().scaled(self.speed),
            anim,
            flip,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn move_of(action: ControlAction) -> (Vec2, AnimId, Option<bool>) {
        match action {
            ControlAction::Move {
                velocity,
                anim,
                flip,
            } => (velocity, anim, flip),
            other => panic!("expected Move, got {other:?}"),
        }
    }

    #[test]
    fn left_held_flips_and_moves_laterally() {
        let mut ctl = Controller::new(1.2);
        let (velocity, anim, flip) = move_of(ctl.tick(Buttons::LEFT));
        assert_eq!(ctl.facing(), Facing::Left);
        assert_eq!(anim, AnimId::MoveX);
        assert_eq!(flip, Some(true));
        assert!((velocity.x + 1.2).abs() < 1e-6);
        assert_eq!(velocity.y, 0.0);
    }

    #[test]
    fn diagonal_speed_equals_axial_speed() {
        let mut ctl = Controller::new(1.2);
        let (diagonal, _, _) = move_of(ctl.tick(Buttons::UP | Buttons::LEFT));
        let (axial, _, _) = move_of(ctl.tick(Buttons::LEFT));
        assert!((diagonal.len() - axial.len()).abs() < 1e-6);
        assert!((axial.len() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn horizontal_wins_over_vertical_pose() {
        let mut ctl = Controller::new(1.2);
        let (_, anim, _) = move_of(ctl.tick(Buttons::UP | Buttons::RIGHT));
        assert_eq!(anim, AnimId::MoveX);
        assert_eq!(ctl.facing(), Facing::Right);

        let (_, anim, _) = move_of(ctl.tick(Buttons::UP));
        assert_eq!(anim, AnimId::Up);
        assert_eq!(ctl.facing(), Facing::Up);
    }

    #[test]
    fn attack_zeroes_velocity_and_keeps_facing() {
        let mut ctl = Controller::new(1.2);
        ctl.tick(Buttons::LEFT);
        let (velocity, anim, flip) = move_of(ctl.tick(Buttons::ATTACK | Buttons::DOWN));
        assert_eq!(velocity, Vec2::ZERO);
        assert_eq!(anim, AnimId::AttackLeft);
        assert_eq!(flip, None);
        assert_eq!(ctl.facing(), Facing::Left);
    }

    #[test]
    fn idle_plays_stand_for_last_facing() {
        let mut ctl = Controller::new(1.2);
        ctl.tick(Buttons::UP);
        let (velocity, anim, _) = move_of(ctl.tick(Buttons::empty()));
        assert_eq!(velocity, Vec2::ZERO);
        assert_eq!(anim, AnimId::StandUp);
    }

    #[test]
    fn knockdown_is_terminal_and_idempotent() {
        let mut ctl = Controller::new(1.2);
        assert_eq!(ctl.tick(Buttons::KNOCKDOWN), ControlAction::Knockdown);
        assert!(ctl.is_knocked_down());
        for _ in 0..5 {
            assert_eq!(
                ctl.tick(Buttons::LEFT | Buttons::KNOCKDOWN),
                ControlAction::Suspended
            );
        }
    }
}
