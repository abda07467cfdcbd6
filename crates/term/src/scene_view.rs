//! SceneView: maps a [`World`] into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Every field cell is shaded by asking the light fans what color covers its
//! center, so what you see is exactly what the sensors see.

use glam::Vec2;

use crate::core::{light_at, World};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{HoldMode, FIELD_HEIGHT, FIELD_WIDTH};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Where the field landed on screen, inside its border.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    pub x: u16,
    pub y: u16,
    pub cols: u16,
    pub rows: u16,
}

impl FieldLayout {
    fn cell_size(&self) -> Vec2 {
        Vec2::new(FIELD_WIDTH / self.cols as f32, FIELD_HEIGHT / self.rows as f32)
    }

    /// World position at the center of field cell `(col, row)`; row 0 is the top.
    pub fn cell_center(&self, col: u16, row: u16) -> Vec2 {
        let size = self.cell_size();
        Vec2::new(
            (col as f32 + 0.5) * size.x,
            FIELD_HEIGHT - (row as f32 + 0.5) * size.y,
        )
    }

    /// Terminal coordinates of the cell containing `pos`.
    pub fn world_to_screen(&self, pos: Vec2) -> Option<(u16, u16)> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        if pos.x < 0.0 || pos.y < 0.0 || pos.x > FIELD_WIDTH || pos.y > FIELD_HEIGHT {
            return None;
        }
        // The top and right borders belong to the last cell.
        let size = self.cell_size();
        let col = ((pos.x / size.x) as u16).min(self.cols - 1);
        let row = (((FIELD_HEIGHT - pos.y) / size.y) as u16).min(self.rows - 1);
        Some((self.x + col, self.y + row))
    }

    /// World position under terminal cell `(column, row)`, for mouse input.
    /// Clicks outside the field clamp to its edge.
    pub fn screen_to_world(&self, column: u16, row: u16) -> Option<Vec2> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        let col = column.saturating_sub(self.x).min(self.cols - 1);
        let row = row.saturating_sub(self.y).min(self.rows - 1);
        Some(self.cell_center(col, row))
    }
}

/// Level-level information the world does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudView<'a> {
    pub title: &'a str,
    /// Zero-based
    pub level: usize,
    pub level_count: usize,
    pub frozen: bool,
}

const PANEL_W: u16 = 24;
const MIN_ROWS: u16 = 8;

const FLOOR: Rgb = Rgb::new(18, 18, 26);
const WALL: Rgb = Rgb::new(170, 170, 180);
const LABEL: CellStyle = CellStyle {
    fg: Rgb::new(220, 220, 220),
    bg: Rgb::new(0, 0, 0),
    bold: true,
    dim: false,
};
const VALUE: CellStyle = CellStyle::fg_on(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));

/// A terminal renderer for light puzzles.
pub struct SceneView {
    /// Terminal columns per field row; 2 roughly squares up glyphs.
    aspect: u16,
}

impl Default for SceneView {
    fn default() -> Self {
        Self { aspect: 2 }
    }
}

impl SceneView {
    /// Biggest field that fits next to the side panel.
    pub fn layout(&self, viewport: Viewport) -> FieldLayout {
        let avail_w = viewport.width.saturating_sub(PANEL_W + 3);
        let avail_h = viewport.height.saturating_sub(2);
        let rows = avail_h.min(avail_w / self.aspect);
        let cols = rows * self.aspect;

        let total_w = cols + 2 + 1 + PANEL_W;
        let start_x = viewport.width.saturating_sub(total_w) / 2;
        let start_y = viewport.height.saturating_sub(rows + 2) / 2;
        FieldLayout {
            x: start_x + 1,
            y: start_y + 1,
            cols,
            rows,
        }
    }

    /// Render the world into an existing framebuffer.
    ///
    /// Callers reuse one framebuffer across frames; nothing here allocates
    /// once it has its final size.
    pub fn render_into(&self, world: &World, hud: &HudView<'_>, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let layout = self.layout(viewport);
        if layout.rows < MIN_ROWS {
            fb.put_str(0, 0, "terminal too small", VALUE);
            return;
        }

        self.draw_border(fb, layout);
        self.draw_light(fb, world, layout);
        self.draw_edges(fb, world, layout);
        self.draw_sensors(fb, world, layout);
        self.draw_lights(fb, world, layout);
        self.draw_player(fb, world, layout);
        self.draw_side_panel(fb, world, hud, layout, viewport);

        if world.is_solved() {
            self.draw_overlay_text(fb, layout, "SOLVED");
        } else if hud.frozen {
            self.draw_overlay_text(fb, layout, "FROZEN");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, world: &World, hud: &HudView<'_>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(world, hud, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, layout: FieldLayout) {
        let style = CellStyle::fg_on(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0));
        let (x, y) = (layout.x - 1, layout.y - 1);
        let (w, h) = (layout.cols + 2, layout.rows + 2);

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);
        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    fn draw_light(&self, fb: &mut FrameBuffer, world: &World, layout: FieldLayout) {
        for row in 0..layout.rows {
            for col in 0..layout.cols {
                let color = light_at(layout.cell_center(col, row), world.lights());
                let bg = FLOOR.max(Rgb::from_packed(color));
                fb.put_char(
                    layout.x + col,
                    layout.y + row,
                    ' ',
                    CellStyle::fg_on(Rgb::new(90, 90, 100), bg),
                );
            }
        }
    }

    fn draw_edges(&self, fb: &mut FrameBuffer, world: &World, layout: FieldLayout) {
        let size = layout.cell_size();
        let step = 0.5 * size.x.min(size.y);
        for edge in world.edges() {
            let n = (edge.length() / step).ceil().max(1.0) as u32;
            for i in 0..=n {
                let pos = edge.start_pt.lerp(edge.end_pt, i as f32 / n as f32);
                if let Some((x, y)) = layout.world_to_screen(pos) {
                    fb.overlay_char(x, y, '█', WALL, false);
                }
            }
        }
    }

    fn draw_sensors(&self, fb: &mut FrameBuffer, world: &World, layout: FieldLayout) {
        for sensor in world.sensors() {
            if let Some((x, y)) = layout.world_to_screen(sensor.pos) {
                let satisfied = sensor.is_satisfied();
                let ch = if satisfied { '◉' } else { 'o' };
                fb.overlay_char(x, y, ch, Rgb::from_packed(sensor.target_color), satisfied);
            }
        }
    }

    fn draw_lights(&self, fb: &mut FrameBuffer, world: &World, layout: FieldLayout) {
        let held = world.player().held_light();
        for (i, light) in world.lights().iter().enumerate() {
            if let Some((x, y)) = layout.world_to_screen(light.pos) {
                let ch = if held == Some(i) { '@' } else { '*' };
                let fg = Rgb::from_packed(light.color).max(Rgb::new(60, 60, 60));
                fb.overlay_char(x, y, ch, fg, true);
            }
        }
    }

    fn draw_player(&self, fb: &mut FrameBuffer, world: &World, layout: FieldLayout) {
        let player = world.player();
        if player.held_light().is_some() {
            return;
        }
        if let Some((x, y)) = layout.world_to_screen(player.pos) {
            let fg = if player.nearest_light().is_some() {
                Rgb::new(255, 255, 120)
            } else {
                Rgb::new(255, 255, 255)
            };
            fb.overlay_char(x, y, '+', fg, true);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        world: &World,
        hud: &HudView<'_>,
        layout: FieldLayout,
        viewport: Viewport,
    ) {
        let panel_x = layout.x + layout.cols + 2;
        if panel_x >= viewport.width {
            return;
        }

        let mut y = layout.y - 1;
        fb.put_str(panel_x, y, hud.title, LABEL);
        y += 1;
        fb.put_str(panel_x, y, "LEVEL", VALUE);
        let w = fb.put_u32(panel_x + 6, y, hud.level as u32 + 1, VALUE);
        fb.put_char(panel_x + 6 + w, y, '/', VALUE);
        fb.put_u32(panel_x + 7 + w, y, hud.level_count as u32, VALUE);
        y += 2;

        let solved = world.groups().iter().filter(|g| g.solved).count();
        fb.put_str(panel_x, y, "GROUPS", LABEL);
        let w = fb.put_u32(panel_x + 7, y, solved as u32, VALUE);
        fb.put_char(panel_x + 7 + w, y, '/', VALUE);
        fb.put_u32(panel_x + 8 + w, y, world.groups().len() as u32, VALUE);
        y += 1;
        for group in world.groups() {
            if y + 8 >= layout.y + layout.rows {
                break;
            }
            let dim = CellStyle { dim: !group.solved, ..VALUE };
            fb.put_char(panel_x, y, if group.solved { '✓' } else { '·' }, dim);
            fb.put_char(panel_x + 2, y, '#', dim);
            let w = fb.put_u32(panel_x + 3, y, group.tag, dim);
            fb.put_u32(panel_x + 4 + w, y, group.satisfied_count as u32, dim);
            y += 1;
        }
        y += 1;

        fb.put_str(panel_x, y, "HAND", LABEL);
        let hand = match world.player().hold_mode() {
            HoldMode::None => "-",
            HoldMode::Move => "moving",
            HoldMode::Rotate => "turning",
        };
        fb.put_str(panel_x + 5, y, hand, VALUE);
        y += 2;

        let help = CellStyle { dim: true, ..VALUE };
        for line in [
            "arrows  cursor",
            "space   move light",
            "enter   turn light",
            "tab/b   next/prev",
            "r restart  p freeze",
            "q       quit",
        ] {
            if y >= viewport.height {
                break;
            }
            fb.put_str(panel_x, y, line, help);
            y += 1;
        }
    }

    fn draw_overlay_text(&self, fb: &mut FrameBuffer, layout: FieldLayout, text: &str) {
        let mid_y = layout.y + layout.rows / 2;
        let text_w = text.chars().count() as u16;
        let x = layout.x + layout.cols.saturating_sub(text_w) / 2;
        let style = CellStyle {
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        fb.put_str(x, mid_y, text, style);
    }
}
