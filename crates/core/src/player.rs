//! The light-holding player.
//!
//! The player is a pointer over the field. Pressing move or rotate next to a
//! light picks it up in that mode, releasing drops it:
//!
//! - **Move**: the light glides from where it was to the pointer over
//!   [`PLAYER_LIGHT_RETRIEVE_SECS`], then sticks to it
//! - **Rotate**: the pointer x at pick-up is locked and the horizontal drag
//!   away from it sets how fast the light turns

use glam::Vec2;

use crate::light::Light;
use crate::types::{
    HoldMode, FIELD_HEIGHT, FIELD_WIDTH, PLAYER_LIGHT_RETRIEVE_SECS, PLAYER_PICKUP_DIST_SQ,
    PLAYER_RADIUS, PLAYER_ROTATE_SPEED,
};

/// One frame of pointer state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerInput {
    /// World coordinates, `y` up
    pub pointer: Vec2,
    pub move_pressed: bool,
    pub move_released: bool,
    pub rotate_pressed: bool,
    pub rotate_released: bool,
}

impl PlayerInput {
    pub fn at(pointer: Vec2) -> Self {
        Self {
            pointer,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    hold_mode: HoldMode,
    nearest_light: Option<usize>,
    held_light: Option<usize>,
    old_light_pos: Vec2,
    retrieval_time: f32,
    locked_x: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0))
    }
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            hold_mode: HoldMode::None,
            nearest_light: None,
            held_light: None,
            old_light_pos: Vec2::ZERO,
            retrieval_time: 0.0,
            locked_x: pos.x,
        }
    }

    pub fn hold_mode(&self) -> HoldMode {
        self.hold_mode
    }

    /// Slot of the closest light within pick-up range.
    pub fn nearest_light(&self) -> Option<usize> {
        self.nearest_light
    }

    /// Slot of the light in hand.
    pub fn held_light(&self) -> Option<usize> {
        self.held_light
    }

    pub fn release(&mut self) {
        self.held_light = None;
        self.hold_mode = HoldMode::None;
    }

    pub fn update(&mut self, input: &PlayerInput, lights: &mut [Light], dt: f32) {
        self.pos = input.pointer.clamp(
            Vec2::splat(PLAYER_RADIUS),
            Vec2::new(FIELD_WIDTH - PLAYER_RADIUS, FIELD_HEIGHT - PLAYER_RADIUS),
        );
        self.nearest_light = self.find_nearest(lights);

        if input.move_pressed {
            self.grab(HoldMode::Move, lights);
        } else if input.move_released {
            self.release();
        }

        if input.rotate_pressed {
            self.grab(HoldMode::Rotate, lights);
        } else if input.rotate_released {
            self.release();
        }

        let Some(light) = self.held_light.and_then(|slot| lights.get_mut(slot)) else {
            return;
        };
        match self.hold_mode {
            HoldMode::None => {}
            HoldMode::Move => {
                self.retrieval_time = (self.retrieval_time + dt).min(PLAYER_LIGHT_RETRIEVE_SECS);
                let ratio = self.retrieval_time / PLAYER_LIGHT_RETRIEVE_SECS;
                light.pos = self.old_light_pos.lerp(self.pos, ratio);
            }
            HoldMode::Rotate => {
                let drag = self.pos.x - self.locked_x;
                light.dir = Vec2::from_angle(PLAYER_ROTATE_SPEED * dt * drag).rotate(light.dir);
            }
        }
    }

    fn find_nearest(&self, lights: &[Light]) -> Option<usize> {
        let mut shortest = PLAYER_PICKUP_DIST_SQ;
        let mut nearest = None;
        for (slot, light) in lights.iter().enumerate() {
            let dist = light.pos.distance_squared(self.pos);
            if dist < shortest {
                shortest = dist;
                nearest = Some(slot);
            }
        }
        nearest
    }

    fn grab(&mut self, mode: HoldMode, lights: &[Light]) {
        if self.hold_mode != HoldMode::None {
            return;
        }
        let Some(slot) = self.nearest_light else {
            return;
        };
        if let Some(light) = lights.get(slot) {
            self.held_light = Some(slot);
            self.old_light_pos = light.pos;
            self.retrieval_time = 0.0;
            self.hold_mode = mode;
            if mode == HoldMode::Rotate {
                self.locked_x = self.pos.x;
            }
            log::debug!("player picked up light {slot} ({})", mode.as_str());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lights() -> Vec<Light> {
        vec![
            Light::new(Vec2::new(100.0, 100.0), 0xFFFF_FFFF, 360.0, 0.0),
            Light::new(Vec2::new(400.0, 400.0), 0xFFFF_FFFF, 90.0, 0.0),
        ]
    }

    #[test]
    fn pointer_is_clamped() {
        let mut player = Player::default();
        player.update(&PlayerInput::at(Vec2::new(-50.0, 900.0)), &mut [], 0.016);
        assert_eq!(player.pos, Vec2::new(PLAYER_RADIUS, FIELD_HEIGHT - PLAYER_RADIUS));
    }

    #[test]
    fn nearest_light_needs_to_be_close() {
        let mut lights = lights();
        let mut player = Player::default();
        player.update(&PlayerInput::at(Vec2::new(110.0, 110.0)), &mut lights, 0.016);
        assert_eq!(player.nearest_light(), Some(0));
        player.update(&PlayerInput::at(Vec2::new(130.0, 130.0)), &mut lights, 0.016);
        assert_eq!(player.nearest_light(), None);
    }

    #[test]
    fn move_picks_up_glides_and_drops() {
        let mut lights = lights();
        let mut player = Player::default();
        let grab = PlayerInput {
            move_pressed: true,
            ..PlayerInput::at(Vec2::new(110.0, 100.0))
        };
        player.update(&grab, &mut lights, 0.025);
        assert_eq!(player.hold_mode(), HoldMode::Move);
        assert_eq!(player.held_light(), Some(0));
        assert_relative_eq!(lights[0].pos.x, 105.0, epsilon = 1e-3);

        player.update(&PlayerInput::at(Vec2::new(200.0, 100.0)), &mut lights, 0.1);
        assert_eq!(lights[0].pos, Vec2::new(200.0, 100.0));

        let drop = PlayerInput {
            move_released: true,
            ..PlayerInput::at(Vec2::new(300.0, 100.0))
        };
        player.update(&drop, &mut lights, 0.016);
        assert_eq!(player.hold_mode(), HoldMode::None);
        assert_eq!(lights[0].pos, Vec2::new(200.0, 100.0));
    }

    #[test]
    fn grab_needs_a_light_in_reach() {
        let mut lights = lights();
        let mut player = Player::default();
        let grab = PlayerInput {
            move_pressed: true,
            ..PlayerInput::at(Vec2::new(600.0, 600.0))
        };
        player.update(&grab, &mut lights, 0.016);
        assert_eq!(player.hold_mode(), HoldMode::None);
    }

    #[test]
    fn rotate_turns_with_drag() {
        let mut lights = lights();
        let mut player = Player::default();
        let grab = PlayerInput {
            rotate_pressed: true,
            ..PlayerInput::at(Vec2::new(400.0, 400.0))
        };
        player.update(&grab, &mut lights, 0.016);
        assert_eq!(player.hold_mode(), HoldMode::Rotate);
        assert_eq!(lights[1].dir, Vec2::X);

        player.update(&PlayerInput::at(Vec2::new(410.0, 400.0)), &mut lights, 0.01);
        let expected = PLAYER_ROTATE_SPEED * 0.01 * 10.0;
        assert_relative_eq!(lights[1].dir.y.atan2(lights[1].dir.x), expected, epsilon = 1e-4);
        assert_eq!(lights[1].pos, Vec2::new(400.0, 400.0));
    }

    #[test]
    fn rotate_lock_is_set_only_by_a_pickup() {
        let mut lights = lights();
        let mut player = Player::default();
        let start_lock = player.locked_x;

        let miss = PlayerInput {
            rotate_pressed: true,
            ..PlayerInput::at(Vec2::new(600.0, 600.0))
        };
        player.update(&miss, &mut lights, 0.016);
        assert_eq!(player.locked_x, start_lock);

        let grab = PlayerInput {
            rotate_pressed: true,
            ..PlayerInput::at(Vec2::new(400.0, 400.0))
        };
        player.update(&grab, &mut lights, 0.016);
        assert_eq!(player.locked_x, 400.0);

        // Pressing again while holding keeps the lock, so the drag still turns.
        let again = PlayerInput {
            rotate_pressed: true,
            ..PlayerInput::at(Vec2::new(410.0, 400.0))
        };
        player.update(&again, &mut lights, 0.01);
        assert_eq!(player.locked_x, 400.0);
        let expected = PLAYER_ROTATE_SPEED * 0.01 * 10.0;
        assert_relative_eq!(lights[1].dir.y.atan2(lights[1].dir.x), expected, epsilon = 1e-4);
    }
}
