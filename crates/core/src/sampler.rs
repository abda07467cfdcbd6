//! Visibility sampling for a single light.
//!
//! Three passes, one per jitter offset. Each pass casts a ray through every
//! edge `end_pt` the light can see, rotated by the offset; the unrotated pass
//! is clamped to the endpoint itself so it lands exactly on the corner, while
//! the two rotated passes slip past the corner and find whatever lies behind
//! it. Cone lights add two shell rays per pass along their boundaries.

use arrayvec::ArrayVec;
use glam::Vec2;

use crate::config::GeometryConfig;
use crate::edge::Edge;
use crate::error::LitError;
use crate::intersect::nearest_hit;
use crate::light::Intersection;
use crate::types::{LightKind, MAX_INTERSECTIONS};
use crate::Result;

/// Unsigned angle between two vectors, `0` when either is zero.
#[inline]
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    let denom = a.length() * b.length();
    if denom == 0.0 {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(-1.0, 1.0).acos()
}

/// Append every sample of one light to `out`.
pub fn sample_into(
    pos: Vec2,
    dir: Vec2,
    half_angle: f32,
    edges: &[Edge],
    config: &GeometryConfig,
    out: &mut ArrayVec<Intersection, MAX_INTERSECTIONS>,
) -> Result<()> {
    let kind = LightKind::classify(half_angle);

    for (pass, offset) in config.jitter_offsets().into_iter().enumerate() {
        let turn = Vec2::from_angle(offset);

        for edge in edges {
            let to_end = edge.end_pt - pos;
            if to_end.length_squared() <= f32::EPSILON {
                continue;
            }
            if kind.is_cone() && angle_between(dir, to_end) > half_angle {
                continue;
            }

            let ray = turn.rotate(to_end);
            let t = nearest_hit(pos, ray, edges, pass == 0, config);
            let point = if t.is_finite() { pos + ray * t } else { edge.end_pt };
            push(out, point, false)?;
        }
    }

    if kind.is_cone() {
        for offset in config.jitter_offsets() {
            for side in [half_angle, -half_angle] {
                let ray = Vec2::from_angle(side + offset).rotate(dir);
                let t = nearest_hit(pos, ray, edges, false, config);
                let point = if t.is_finite() {
                    pos + ray * t
                } else {
                    pos + ray.normalize_or_zero() * config.shell_reach
                };
                push(out, point, true)?;
            }
        }
    }

    Ok(())
}

#[inline]
fn push(
    out: &mut ArrayVec<Intersection, MAX_INTERSECTIONS>,
    point: Vec2,
    is_shell: bool,
) -> Result<()> {
    out.try_push(Intersection { point, is_shell })
        .map_err(|_| LitError::full("intersection", MAX_INTERSECTIONS))
}
