//! Pointer input handler for terminal environments.
//!
//! Turns key and mouse events into one [`PlayerInput`] per frame. The keyboard
//! drives a cursor with DAS/ARR repeats on held keys and supports terminals
//! that never emit key release events by using a timeout. The mouse sets the
//! pointer directly; its buttons pick up and drop lights.

use std::time::Instant;

use crossterm::event::{KeyEvent, MouseButton, MouseEventKind};
use glam::Vec2;

use crate::core::PlayerInput;
use crate::map::handle_key_event;
use crate::types::{
    HoldMode, PlayerAction, CURSOR_ARR_MS, CURSOR_DAS_MS, CURSOR_STEP, FIELD_HEIGHT, FIELD_WIDTH,
};

/// One held cursor axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct HeldAxis {
    /// -1, 0 or 1
    dir: i8,
    das_timer: u32,
    arr_accumulator: u32,
}

impl HeldAxis {
    /// Returns true when this press starts a new hold.
    fn press(&mut self, dir: i8) -> bool {
        if self.dir == dir {
            return false;
        }
        *self = HeldAxis { dir, ..HeldAxis::default() };
        true
    }

    fn release(&mut self, dir: i8) {
        if self.dir == dir {
            *self = HeldAxis::default();
        }
    }

    /// Number of repeats due after `elapsed_ms`.
    fn tick(&mut self, elapsed_ms: u32, das_delay: u32, arr_rate: u32) -> u32 {
        if self.dir == 0 {
            self.das_timer = 0;
            self.arr_accumulator = 0;
            return 0;
        }

        let prev_das = self.das_timer;
        self.das_timer += elapsed_ms;
        if self.das_timer < das_delay {
            return 0;
        }

        let excess = if prev_das < das_delay {
            self.das_timer - das_delay
        } else {
            elapsed_ms
        };
        self.arr_accumulator += excess;

        let arr_rate = arr_rate.max(1);
        let repeats = self.arr_accumulator / arr_rate;
        self.arr_accumulator -= repeats * arr_rate;
        repeats
    }
}

/// Tracks pointer state between frames.
#[derive(Debug, Clone)]
pub struct InputHandler {
    pointer: Vec2,
    horizontal: HeldAxis,
    vertical: HeldAxis,
    last_key_time: Instant,
    das_delay: u32,
    arr_rate: u32,
    key_release_timeout_ms: u32,
    /// What the keyboard grab keys believe the player is holding
    keyboard_hold: HoldMode,
    pending: PlayerInput,
}

// In terminals without key-release events, a short timeout prevents a single tap
// from turning into a sustained "held" state that triggers DAS/ARR repeats.
const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 150;

impl InputHandler {
    pub fn new() -> Self {
        Self::with_config(CURSOR_DAS_MS, CURSOR_ARR_MS)
    }

    pub fn with_config(das_delay: u32, arr_rate: u32) -> Self {
        let pointer = Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT / 2.0);
        Self {
            pointer,
            horizontal: HeldAxis::default(),
            vertical: HeldAxis::default(),
            last_key_time: Instant::now(),
            das_delay,
            arr_rate,
            key_release_timeout_ms: DEFAULT_KEY_RELEASE_TIMEOUT_MS,
            keyboard_hold: HoldMode::None,
            pending: PlayerInput::at(pointer),
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout_ms = timeout_ms;
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout_ms
    }

    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    pub fn set_pointer(&mut self, pointer: Vec2) {
        self.pointer = pointer.clamp(Vec2::ZERO, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT));
    }

    /// Tell the handler what the player actually holds, so the next grab key
    /// press picks up or drops accordingly.
    pub fn sync_hold(&mut self, mode: HoldMode) {
        self.keyboard_hold = mode;
    }

    /// Handle a key press. Returns the mapped action; cursor and grab actions
    /// are already applied, the rest are for the caller.
    pub fn handle_key_press(&mut self, key: KeyEvent) -> Option<PlayerAction> {
        let action = handle_key_event(key)?;
        match action {
            PlayerAction::CursorLeft => self.press_axis(Axis::Horizontal, -1),
            PlayerAction::CursorRight => self.press_axis(Axis::Horizontal, 1),
            PlayerAction::CursorUp => self.press_axis(Axis::Vertical, 1),
            PlayerAction::CursorDown => self.press_axis(Axis::Vertical, -1),
            _ => self.apply_action(action),
        }
        Some(action)
    }

    pub fn handle_key_release(&mut self, key: KeyEvent) {
        match handle_key_event(key) {
            Some(PlayerAction::CursorLeft) => self.horizontal.release(-1),
            Some(PlayerAction::CursorRight) => self.horizontal.release(1),
            Some(PlayerAction::CursorUp) => self.vertical.release(1),
            Some(PlayerAction::CursorDown) => self.vertical.release(-1),
            _ => {}
        }
    }

    /// Handle a mouse event already mapped to world coordinates.
    pub fn handle_mouse(&mut self, kind: MouseEventKind, world_pos: Vec2) {
        self.set_pointer(world_pos);
        match kind {
            MouseEventKind::Down(MouseButton::Left) => self.pending.move_pressed = true,
            MouseEventKind::Up(MouseButton::Left) => self.pending.move_released = true,
            MouseEventKind::Down(MouseButton::Right) => {
                self.pending.rotate_pressed = true;
            }
            MouseEventKind::Up(MouseButton::Right) => self.pending.rotate_released = true,
            _ => {}
        }
    }

    /// Apply an action without key timing; used for scripted input.
    pub fn apply_action(&mut self, action: PlayerAction) {
        match action {
            PlayerAction::CursorLeft => self.nudge(Vec2::new(-CURSOR_STEP, 0.0)),
            PlayerAction::CursorRight => self.nudge(Vec2::new(CURSOR_STEP, 0.0)),
            PlayerAction::CursorUp => self.nudge(Vec2::new(0.0, CURSOR_STEP)),
            PlayerAction::CursorDown => self.nudge(Vec2::new(0.0, -CURSOR_STEP)),
            PlayerAction::GrabMove => self.toggle_grab(HoldMode::Move),
            PlayerAction::GrabRotate => self.toggle_grab(HoldMode::Rotate),
            PlayerAction::NextLevel
            | PlayerAction::PrevLevel
            | PlayerAction::Restart
            | PlayerAction::Freeze => {}
        }
    }

    /// Advance key repeats by `elapsed_ms` and hand out this frame's input.
    pub fn update(&mut self, elapsed_ms: u32) -> PlayerInput {
        // Auto-release when terminal does not emit release events.
        let time_since_last_key = self.last_key_time.elapsed().as_millis() as u32;
        if time_since_last_key > self.key_release_timeout_ms {
            self.horizontal = HeldAxis::default();
            self.vertical = HeldAxis::default();
        }

        let h = self.horizontal.tick(elapsed_ms, self.das_delay, self.arr_rate);
        let v = self.vertical.tick(elapsed_ms, self.das_delay, self.arr_rate);
        if h > 0 || v > 0 {
            let step = Vec2::new(
                self.horizontal.dir as f32 * h as f32,
                self.vertical.dir as f32 * v as f32,
            );
            self.nudge(step * CURSOR_STEP);
        }

        let mut input = std::mem::take(&mut self.pending);
        input.pointer = self.pointer;
        self.pending.pointer = self.pointer;
        input
    }

    pub fn reset(&mut self) {
        self.horizontal = HeldAxis::default();
        self.vertical = HeldAxis::default();
        self.last_key_time = Instant::now();
        self.keyboard_hold = HoldMode::None;
        self.pending = PlayerInput::at(self.pointer);
    }

    fn press_axis(&mut self, axis: Axis, dir: i8) {
        self.last_key_time = Instant::now();
        let held = match axis {
            Axis::Horizontal => &mut self.horizontal,
            Axis::Vertical => &mut self.vertical,
        };
        if held.press(dir) {
            let step = match axis {
                Axis::Horizontal => Vec2::new(dir as f32, 0.0),
                Axis::Vertical => Vec2::new(0.0, dir as f32),
            };
            self.nudge(step * CURSOR_STEP);
        }
    }

    fn nudge(&mut self, delta: Vec2) {
        self.set_pointer(self.pointer + delta);
    }

    fn toggle_grab(&mut self, mode: HoldMode) {
        match (self.keyboard_hold, mode) {
            (HoldMode::None, HoldMode::Move) => self.pending.move_pressed = true,
            (HoldMode::None, HoldMode::Rotate) => self.pending.rotate_pressed = true,
            (HoldMode::Move, _) => self.pending.move_released = true,
            (HoldMode::Rotate, _) => self.pending.rotate_released = true,
            (HoldMode::None, HoldMode::None) => {}
        }
        self.keyboard_hold = if self.keyboard_hold == HoldMode::None {
            mode
        } else {
            HoldMode::None
        };
    }
}

#[derive(Debug, Clone, Copy)]
enum Axis {
    Horizontal,
    Vertical,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn test_press_moves_once_then_repeats_after_delay() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);
        let start = ih.pointer();

        assert_eq!(ih.handle_key_press(key(KeyCode::Left)), Some(PlayerAction::CursorLeft));
        assert_eq!(ih.pointer().x, start.x - CURSOR_STEP);

        // Repeated press events for a held key do not move again.
        ih.handle_key_press(key(KeyCode::Left));
        assert_eq!(ih.pointer().x, start.x - CURSOR_STEP);

        // Before and exactly at DAS: no repeats.
        assert_eq!(ih.update(99).pointer.x, start.x - CURSOR_STEP);
        assert_eq!(ih.update(1).pointer.x, start.x - CURSOR_STEP);

        // First ARR interval after DAS: one repeat.
        assert_eq!(ih.update(25).pointer.x, start.x - 2.0 * CURSOR_STEP);

        // Two intervals at once: two repeats.
        assert_eq!(ih.update(50).pointer.x, start.x - 4.0 * CURSOR_STEP);

        ih.handle_key_release(key(KeyCode::Left));
        assert_eq!(ih.update(100).pointer.x, start.x - 4.0 * CURSOR_STEP);
    }

    #[test]
    fn test_auto_release_triggers_after_timeout_without_key_release_events() {
        let mut ih = InputHandler::with_config(100, 25);
        ih.key_release_timeout_ms = 50;

        ih.handle_key_press(key(KeyCode::Up));
        assert_eq!(ih.vertical.dir, 1);

        // Simulate no key-release events by moving the last key time into the past.
        ih.last_key_time = Instant::now() - std::time::Duration::from_millis(51);

        let before = ih.pointer();
        let input = ih.update(500);
        assert_eq!(input.pointer, before);
        assert_eq!(ih.vertical.dir, 0);
    }

    #[test]
    fn test_default_key_release_timeout_is_non_zero() {
        let ih = InputHandler::new();
        assert!(ih.key_release_timeout_ms() > 0);
    }

    #[test]
    fn test_grab_key_toggles_pick_up_and_drop() {
        let mut ih = InputHandler::new();

        ih.handle_key_press(key(KeyCode::Char(' ')));
        let input = ih.update(16);
        assert!(input.move_pressed);
        assert!(!input.move_released);

        // Flags last one frame.
        assert_eq!(ih.update(16), PlayerInput::at(ih.pointer()));

        ih.handle_key_press(key(KeyCode::Char(' ')));
        let input = ih.update(16);
        assert!(input.move_released);
    }

    #[test]
    fn test_sync_hold_resets_failed_grab() {
        let mut ih = InputHandler::new();
        ih.apply_action(PlayerAction::GrabRotate);
        assert!(ih.update(16).rotate_pressed);

        // Nothing was in reach, so the player holds nothing.
        ih.sync_hold(HoldMode::None);
        ih.apply_action(PlayerAction::GrabRotate);
        assert!(ih.update(16).rotate_pressed);
    }

    #[test]
    fn test_mouse_sets_pointer_and_buttons() {
        let mut ih = InputHandler::new();
        ih.handle_mouse(MouseEventKind::Down(MouseButton::Right), Vec2::new(120.0, 80.0));
        let input = ih.update(16);
        assert_eq!(input.pointer, Vec2::new(120.0, 80.0));
        assert!(input.rotate_pressed);

        ih.handle_mouse(MouseEventKind::Up(MouseButton::Right), Vec2::new(900.0, -5.0));
        let input = ih.update(16);
        assert!(input.rotate_released);
        assert_eq!(input.pointer, Vec2::new(FIELD_WIDTH, 0.0));
    }

    #[test]
    fn test_reset_clears_held_state_and_stops_repeats() {
        let mut ih = InputHandler::with_config(100, 25).with_key_release_timeout_ms(10_000);

        ih.handle_key_press(key(KeyCode::Right));
        let moved = ih.update(200).pointer;
        assert!(moved.x > FIELD_WIDTH / 2.0 + CURSOR_STEP, "expected repeats before reset");

        ih.reset();
        assert_eq!(ih.update(200).pointer, moved, "reset should stop repeats");
    }
}
