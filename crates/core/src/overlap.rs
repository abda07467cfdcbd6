//! Point-in-light queries.

use glam::Vec2;

use crate::light::{Light, Triangle};
use crate::types::rgb_bits;

/// Inclusive edge-function test: points on an edge or vertex are inside.
#[inline]
pub fn point_in_triangle(tri: &Triangle, pt: Vec2) -> bool {
    let d0 = (tri.p1 - tri.p0).perp_dot(pt - tri.p0);
    let d1 = (tri.p2 - tri.p1).perp_dot(pt - tri.p1);
    let d2 = (tri.p0 - tri.p2).perp_dot(pt - tri.p2);

    let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
    let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
    !(has_neg && has_pos)
}

/// Accumulated light color at `pt`.
///
/// Every light containing `pt` adds its color once, alpha dropped. Channels
/// that overflow carry into their neighbour, the same as plain integer
/// addition of the packed values.
pub fn light_at<'a>(pt: Vec2, lights: impl IntoIterator<Item = &'a Light>) -> u32 {
    lights
        .into_iter()
        .filter(|light| light.illuminates(pt))
        .fold(0u32, |acc, light| acc.wrapping_add(rgb_bits(light.color)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> Triangle {
        Triangle {
            p0: Vec2::new(10.0, 0.0),
            p1: Vec2::new(0.0, 0.0),
            p2: Vec2::new(0.0, 10.0),
            color: 0,
        }
    }

    #[test]
    fn inside_and_outside() {
        assert!(point_in_triangle(&tri(), Vec2::new(2.0, 2.0)));
        assert!(!point_in_triangle(&tri(), Vec2::new(8.0, 8.0)));
        assert!(!point_in_triangle(&tri(), Vec2::new(-1.0, 1.0)));
    }

    #[test]
    fn boundary_counts_as_inside() {
        let t = tri();
        assert!(point_in_triangle(&t, t.p0));
        assert!(point_in_triangle(&t, t.p1));
        assert!(point_in_triangle(&t, t.p2));
        assert!(point_in_triangle(&t, Vec2::new(5.0, 0.0)));
        assert!(point_in_triangle(&t, Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn unlit_point_is_black() {
        let lights: Vec<Light> = Vec::new();
        assert_eq!(light_at(Vec2::ZERO, &lights), 0);
    }
}
