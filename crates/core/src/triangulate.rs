//! Fan triangulation of a welded ring around its light.

use arrayvec::ArrayVec;
use glam::Vec2;

use crate::error::LitError;
use crate::light::{Intersection, Triangle};
use crate::types::{LightKind, MAX_TRIANGLES};
use crate::Result;

/// Append one triangle per adjacent ring pair (last to first included).
///
/// A pair is dropped when its winding around `pos` is not strictly CCW, and for
/// wide lights when both points are shell samples, since that pair would span
/// the dark gap behind the light.
pub fn fan_into(
    pos: Vec2,
    color: u32,
    kind: LightKind,
    ring: &[Intersection],
    out: &mut ArrayVec<Triangle, MAX_TRIANGLES>,
) -> Result<()> {
    if ring.len() < 2 {
        return Ok(());
    }

    let next = ring.iter().cycle().skip(1);
    for (a, b) in ring.iter().zip(next) {
        if kind == LightKind::Wide && a.is_shell && b.is_shell {
            continue;
        }
        if (a.point - pos).perp_dot(b.point - pos) <= 0.0 {
            continue;
        }
        out.try_push(Triangle {
            p0: a.point,
            p1: pos,
            p2: b.point,
            color,
        })
        .map_err(|_| LitError::full("triangle", MAX_TRIANGLES))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f32, f32, bool)]) -> Vec<Intersection> {
        points
            .iter()
            .map(|&(x, y, is_shell)| Intersection { point: Vec2::new(x, y), is_shell })
            .collect()
    }

    fn fan(kind: LightKind, ring: &[Intersection]) -> Vec<Triangle> {
        let mut out = ArrayVec::new();
        fan_into(Vec2::ZERO, 0xFFFF_FFFF, kind, ring, &mut out).unwrap();
        out.to_vec()
    }

    #[test]
    fn square_ring_gives_four_ccw_triangles() {
        let r = ring(&[
            (1.0, 1.0, false),
            (-1.0, 1.0, false),
            (-1.0, -1.0, false),
            (1.0, -1.0, false),
        ]);
        let tris = fan(LightKind::Point, &r);
        assert_eq!(tris.len(), 4);
        for tri in &tris {
            assert!(tri.signed_area() > 0.0);
            assert_eq!(tri.p1, Vec2::ZERO);
        }
        assert_eq!(tris[3].p0, Vec2::new(1.0, -1.0));
        assert_eq!(tris[3].p2, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn wrong_winding_is_dropped_not_flipped() {
        // Cone ring spanning less than a half turn: the closing pair winds CW.
        let r = ring(&[(1.0, 0.0, true), (0.0, 1.0, true)]);
        let tris = fan(LightKind::Directional, &r);
        assert_eq!(tris.len(), 1);
        assert_eq!(tris[0].p0, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn wide_light_skips_shell_pairs() {
        let r = ring(&[
            (1.0, 1.0, false),
            (-1.0, 0.5, true),
            (-1.0, -0.5, true),
            (1.0, -1.0, false),
        ]);
        let wide = fan(LightKind::Wide, &r);
        assert_eq!(wide.len(), 3);
        assert!(wide.iter().all(|t| !(t.p0.x < 0.0 && t.p2.x < 0.0)));

        // Directional lights rely on winding alone.
        assert_eq!(fan(LightKind::Directional, &r).len(), 4);
    }

    #[test]
    fn short_rings_yield_nothing() {
        assert!(fan(LightKind::Point, &[]).is_empty());
        assert!(fan(LightKind::Point, &ring(&[(1.0, 0.0, false)])).is_empty());
    }

    #[test]
    fn collinear_pair_is_dropped() {
        let r = ring(&[(1.0, 0.0, false), (2.0, 0.0, false)]);
        assert!(fan(LightKind::Point, &r).is_empty());
    }
}
