//! Framebuffer and style types for terminal rendering.

use crate::types::channels;

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Drop the alpha byte of a packed `0xRRGGBBAA` color.
    pub const fn from_packed(color: u32) -> Self {
        let (r, g, b, _) = channels(color);
        Self { r, g, b }
    }

    /// Channel-wise maximum, used to lay light over a floor color.
    pub fn max(self, other: Rgb) -> Self {
        Self::new(self.r.max(other.r), self.g.max(other.g), self.b.max(other.b))
    }

    /// Scale every channel by `num / 256`.
    pub fn scale(self, num: u16) -> Self {
        let f = |c: u8| ((c as u16 * num) >> 8).min(255) as u8;
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

/// Minimal per-cell styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellStyle {
    pub fg: Rgb,
    pub bg: Rgb,
    pub bold: bool,
    pub dim: bool,
}

impl CellStyle {
    pub const fn fg_on(fg: Rgb, bg: Rgb) -> Self {
        Self {
            fg,
            bg,
            bold: false,
            dim: false,
        }
    }

    pub const fn into_cell(self, ch: char) -> Cell {
        Cell { ch, style: self }
    }
}

impl Default for CellStyle {
    fn default() -> Self {
        Self::fg_on(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0))
    }
}

/// A single terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: CellStyle,
}

impl Default for Cell {
    fn default() -> Self {
        CellStyle::default().into_cell(' ')
    }
}

/// 2D framebuffer of styled character cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    pub fn new(width: u16, height: u16) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Resize, keeping the allocation when it is big enough.
    pub fn resize(&mut self, width: u16, height: u16) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        let len = (width as usize) * (height as usize);
        self.cells.resize(len, Cell::default());
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline(always)]
    fn idx(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u16, y: u16) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        self.idx(x, y).map(|i| &mut self.cells[i])
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        if let Some(c) = self.get_mut(x, y) {
            *c = cell;
        }
    }

    pub fn clear(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    pub fn put_char(&mut self, x: u16, y: u16, ch: char, style: CellStyle) {
        self.set(x, y, style.into_cell(ch));
    }

    /// Replace the glyph and foreground, keeping whatever background is there.
    pub fn overlay_char(&mut self, x: u16, y: u16, ch: char, fg: Rgb, bold: bool) {
        if let Some(c) = self.get_mut(x, y) {
            c.ch = ch;
            c.style.fg = fg;
            c.style.bold = bold;
            c.style.dim = false;
        }
    }

    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: CellStyle) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.put_char(cx, y, ch, style);
            cx += 1;
        }
    }

    /// Write a number without allocating.
    pub fn put_u32(&mut self, x: u16, y: u16, mut value: u32, style: CellStyle) -> u16 {
        let mut digits = [0u8; 10];
        let mut n = 0;
        loop {
            digits[n] = b'0' + (value % 10) as u8;
            n += 1;
            value /= 10;
            if value == 0 {
                break;
            }
        }
        for (i, d) in digits[..n].iter().rev().enumerate() {
            self.put_char(x.saturating_add(i as u16), y, *d as char, style);
        }
        n as u16
    }

    pub fn fill_rect(&mut self, x: u16, y: u16, w: u16, h: u16, ch: char, style: CellStyle) {
        for dy in 0..h {
            for dx in 0..w {
                self.put_char(x.saturating_add(dx), y.saturating_add(dy), ch, style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_colors_drop_alpha() {
        assert_eq!(Rgb::from_packed(0x1122_33FF), Rgb::new(0x11, 0x22, 0x33));
        assert_eq!(Rgb::new(200, 10, 0).max(Rgb::new(20, 30, 0)), Rgb::new(200, 30, 0));
        assert_eq!(Rgb::new(200, 100, 2).scale(128), Rgb::new(100, 50, 1));
    }

    #[test]
    fn put_u32_writes_digits() {
        let mut fb = FrameBuffer::new(8, 1);
        let style = CellStyle::default();
        assert_eq!(fb.put_u32(1, 0, 307, style), 3);
        assert_eq!(fb.put_u32(5, 0, 0, style), 1);
        let text: String = fb.cells().iter().map(|c| c.ch).collect();
        assert_eq!(text, " 307 0  ");
    }

    #[test]
    fn overlay_keeps_background() {
        let mut fb = FrameBuffer::new(1, 1);
        let bg = Rgb::new(1, 2, 3);
        fb.put_char(0, 0, ' ', CellStyle::fg_on(Rgb::default(), bg));
        fb.overlay_char(0, 0, '*', Rgb::new(9, 9, 9), true);
        let cell = fb.get(0, 0).unwrap();
        assert_eq!(cell.ch, '*');
        assert_eq!(cell.style.bg, bg);
        assert!(cell.style.bold);
    }
}
