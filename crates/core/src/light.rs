//! Lights and their per-frame geometry.
//!
//! Each light owns two bounded buffers that are cleared and refilled by
//! [`Light::generate`]: the raw ray samples and the lit triangle fan. The fan
//! is the light's visible region; everything drawn or queried afterwards reads
//! only [`Light::triangles`].

use arrayvec::ArrayVec;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::GeometryConfig;
use crate::edge::Edge;
use crate::sort::RingScratch;
use crate::types::{LightKind, MAX_INTERSECTIONS, MAX_TRIANGLES};
use crate::{sampler, triangulate, Result};

/// One ray sample around a light.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub point: Vec2,
    /// Sample taken along a cone boundary rather than through an edge endpoint
    pub is_shell: bool,
}

/// A lit triangle: `p1` is always the light position and the winding is CCW.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub p0: Vec2,
    pub p1: Vec2,
    pub p2: Vec2,
    pub color: u32,
}

impl Triangle {
    /// Signed area; positive for every triangle the fan emits.
    pub fn signed_area(&self) -> f32 {
        0.5 * (self.p0 - self.p1).perp_dot(self.p2 - self.p1)
    }
}

#[derive(Debug, Clone)]
pub struct Light {
    pub pos: Vec2,
    /// Unit facing direction (ignored by point lights)
    pub dir: Vec2,
    /// Half the cone angle in radians; `>= PI` makes a point light
    pub half_angle: f32,
    /// Packed `0xRRGGBBAA`
    pub color: u32,
    intersections: ArrayVec<Intersection, MAX_INTERSECTIONS>,
    triangles: ArrayVec<Triangle, MAX_TRIANGLES>,
}

impl Light {
    /// `full_angle_deg` is the whole cone (360 for a point light) and
    /// `facing_turns` the facing direction in turns (0.25 faces `+y`).
    pub fn new(pos: Vec2, color: u32, full_angle_deg: f32, facing_turns: f32) -> Self {
        let dir = Vec2::from_angle(facing_turns * std::f32::consts::TAU);
        Self::with_direction(pos, dir, (full_angle_deg / 2.0).to_radians(), color)
    }

    pub fn with_direction(pos: Vec2, dir: Vec2, half_angle: f32, color: u32) -> Self {
        Self {
            pos,
            dir: dir.normalize_or(Vec2::X),
            half_angle,
            color,
            intersections: ArrayVec::new(),
            triangles: ArrayVec::new(),
        }
    }

    #[inline]
    pub fn kind(&self) -> LightKind {
        LightKind::classify(self.half_angle)
    }

    /// Samples from the last [`Light::generate`], in the order they were cast.
    pub fn intersections(&self) -> &[Intersection] {
        &self.intersections
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Rebuild this light's samples and triangle fan against `edges`.
    ///
    /// On error both buffers hold whatever was produced before the overflow.
    pub fn generate(
        &mut self,
        edges: &[Edge],
        config: &GeometryConfig,
        scratch: &mut RingScratch,
    ) -> Result<()> {
        self.intersections.clear();
        self.triangles.clear();

        sampler::sample_into(
            self.pos,
            self.dir,
            self.half_angle,
            edges,
            config,
            &mut self.intersections,
        )?;
        scratch.sort(self.pos, &self.intersections);
        scratch.weld(self.pos, &self.intersections, config.weld_ratio);
        triangulate::fan_into(
            self.pos,
            self.color,
            self.kind(),
            scratch.ring(),
            &mut self.triangles,
        )
    }

    /// The first lit triangle containing `pt`, if any.
    pub fn triangle_at(&self, pt: Vec2) -> Option<&Triangle> {
        self.triangles
            .iter()
            .find(|tri| crate::overlap::point_in_triangle(tri, pt))
    }

    pub fn illuminates(&self, pt: Vec2) -> bool {
        self.triangle_at(pt).is_some()
    }

    /// Total lit area.
    pub fn lit_area(&self) -> f32 {
        self.triangles.iter().map(Triangle::signed_area).sum()
    }
}
