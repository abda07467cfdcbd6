//! Ray vs. segment intersection.
//!
//! A ray is `origin + t1 * dir` and a (ghost) segment is `q + t2 * s` with
//! `t2` in `(0, 1)`. Both parameters come from the 2D cross product form, so
//! no component of `dir` is ever divided by and axis-aligned rays behave like
//! any other.

use glam::Vec2;

use crate::config::GeometryConfig;
use crate::edge::Edge;

/// Ray parameter of the nearest forward hit against `edges`.
///
/// Returns `f32::INFINITY` when nothing is hit. With `clamp_to_ray_max` only
/// hits closer than `origin + dir` count and the result is `1.0` when there are
/// none, so the caller lands exactly on the point it aimed at.
///
/// Near-parallel pairs (which include zero-length edges and a zero-length
/// `dir`) are skipped rather than reported.
pub fn nearest_hit(
    origin: Vec2,
    dir: Vec2,
    edges: &[Edge],
    clamp_to_ray_max: bool,
    config: &GeometryConfig,
) -> f32 {
    let mut lowest_t1 = if clamp_to_ray_max { 1.0 } else { f32::INFINITY };

    for edge in edges {
        let (q, q_end) = edge.ghost_line(config.ghost_extent);
        let s = q_end - q;

        let denom = dir.perp_dot(s);
        if denom.abs() <= config.parallel_epsilon * dir.length() * s.length() {
            continue;
        }

        let to_edge = q - origin;
        let t1 = to_edge.perp_dot(s) / denom;
        let t2 = to_edge.perp_dot(dir) / denom;

        if t1 > 0.0 && t2 > 0.0 && t2 < 1.0 && t1 < lowest_t1 {
            lowest_t1 = t1;
        }
    }

    lowest_t1
}
