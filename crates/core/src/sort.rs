//! Angular ordering of ray samples and the ring weld.
//!
//! Samples are ordered counter-clockwise by their angle from `+x` around the
//! light, then adjacent samples that land on the same spot are merged. The
//! result is the ring the fan triangulator walks.

use arrayvec::ArrayVec;
use glam::Vec2;

use crate::light::Intersection;
use crate::types::MAX_INTERSECTIONS;

/// Angle of `pt` around `origin`, measured CCW from `+x`, in `[0, 2*PI)`.
///
/// A point at the origin sorts first.
#[inline]
pub fn angular_key(origin: Vec2, pt: Vec2) -> f32 {
    let v = pt - origin;
    let len = v.length();
    if len == 0.0 {
        return 0.0;
    }
    let key = (v.x / len).clamp(-1.0, 1.0).acos();
    if v.y < 0.0 {
        std::f32::consts::TAU - key
    } else {
        key
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortEntry {
    pub key: f32,
    pub index: u16,
}

/// Per-frame working memory for sorting and welding, reused across lights.
#[derive(Debug, Clone, Default)]
pub struct RingScratch {
    entries: ArrayVec<SortEntry, MAX_INTERSECTIONS>,
    ring: ArrayVec<Intersection, MAX_INTERSECTIONS>,
}

impl RingScratch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorted `(key, index)` pairs from the last [`RingScratch::sort`].
    pub fn entries(&self) -> &[SortEntry] {
        &self.entries
    }

    /// Welded ring from the last [`RingScratch::weld`].
    pub fn ring(&self) -> &[Intersection] {
        &self.ring
    }

    pub fn sort(&mut self, origin: Vec2, samples: &[Intersection]) {
        self.entries.clear();
        // Both buffers share MAX_INTERSECTIONS, so `samples` always fits.
        self.entries.extend(
            samples
                .iter()
                .enumerate()
                .map(|(index, s)| SortEntry {
                    key: angular_key(origin, s.point),
                    index: index as u16,
                }),
        );
        self.entries.sort_unstable_by(|a, b| a.key.total_cmp(&b.key));
    }

    /// Walk the sorted entries and build the ring, merging each sample into
    /// the previous ring point when they are within
    /// `weld_ratio * distance_to_light` of each other. The last ring point is
    /// also checked against the first.
    pub fn weld(&mut self, origin: Vec2, samples: &[Intersection], weld_ratio: f32) {
        self.ring.clear();

        for entry in &self.entries {
            let sample = samples[entry.index as usize];
            if let Some(last) = self.ring.last_mut() {
                if welds(origin, last.point, sample.point, weld_ratio) {
                    merge(origin, last, sample);
                    continue;
                }
            }
            self.ring.push(sample);
        }

        let n = self.ring.len();
        if n > 2 && welds(origin, self.ring[n - 1].point, self.ring[0].point, weld_ratio) {
            if let Some(tail) = self.ring.pop() {
                merge(origin, &mut self.ring[0], tail);
            }
        }
    }
}

#[inline]
fn welds(origin: Vec2, a: Vec2, b: Vec2, weld_ratio: f32) -> bool {
    if weld_ratio <= 0.0 {
        return false;
    }
    let reach = origin.distance(a).max(origin.distance(b));
    a.distance(b) <= weld_ratio * reach
}

/// Keep the sample farther from the light; a shell sample stays a shell.
#[inline]
fn merge(origin: Vec2, into: &mut Intersection, other: Intersection) {
    if origin.distance_squared(other.point) > origin.distance_squared(into.point) {
        into.point = other.point;
    }
    into.is_shell |= other.is_shell;
}
