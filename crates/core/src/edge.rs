//! Opaque line segments.
//!
//! Only `end_pt` is sampled by the light pass, so a segment that must cast
//! shadows from both sides is pushed twice, once in each direction (see
//! `World::push_double_edge`). Closed shapes pushed as a chain get every
//! corner sampled once.

use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Edge {
    pub start_pt: Vec2,
    pub end_pt: Vec2,
}

impl Edge {
    pub const fn new(start_pt: Vec2, end_pt: Vec2) -> Self {
        Self { start_pt, end_pt }
    }

    /// Same segment, walked the other way.
    pub fn reversed(&self) -> Self {
        Self::new(self.end_pt, self.start_pt)
    }

    pub fn length(&self) -> f32 {
        self.start_pt.distance(self.end_pt)
    }

    /// The segment used for intersection: both ends pushed outward along the
    /// edge direction by `extent`, so a ray aimed at a vertex shared by two
    /// edges cannot slip through the gap between them.
    ///
    /// Zero-length edges stay zero-length.
    #[inline]
    pub fn ghost_line(&self, extent: f32) -> (Vec2, Vec2) {
        let pad = (self.end_pt - self.start_pt).normalize_or_zero() * extent;
        (self.start_pt - pad, self.end_pt + pad)
    }

    /// Linear blend between two poses of the same edge.
    pub fn lerp(&self, other: &Edge, alpha: f32) -> Edge {
        Edge::new(
            self.start_pt.lerp(other.start_pt, alpha),
            self.end_pt.lerp(other.end_pt, alpha),
        )
    }
}

/// The four edges of an axis-aligned box, chained counter-clockwise from
/// `(min.x, min.y)`.
pub fn box_edges(min: Vec2, max: Vec2) -> [Edge; 4] {
    let a = min;
    let b = Vec2::new(max.x, min.y);
    let c = max;
    let d = Vec2::new(min.x, max.y);
    [Edge::new(a, b), Edge::new(b, c), Edge::new(c, d), Edge::new(d, a)]
}
