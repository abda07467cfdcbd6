//! Tunables of the geometry pass.
//!
//! Defaults reproduce the puzzle game's behavior. Any field may be omitted
//! from a JSON override; missing fields keep their default.

use serde::{Deserialize, Serialize};

use crate::types::{GHOST_EXTENT, JITTER_ANGLE};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Angle (radians) of the two extra rays cast beside every corner ray and
    /// shell ray.
    pub jitter_angle: f32,
    /// Each edge is lengthened by this much at both ends when intersected.
    pub ghost_extent: f32,
    /// Sine of the smallest angle between a ray and an edge still treated as
    /// crossing.
    pub parallel_epsilon: f32,
    /// Adjacent ring samples closer than `weld_ratio * distance_to_light` are
    /// merged. `0.0` keeps every sample.
    pub weld_ratio: f32,
    /// Length of a shell ray that escapes every edge.
    pub shell_reach: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            jitter_angle: JITTER_ANGLE,
            ghost_extent: GHOST_EXTENT,
            parallel_epsilon: 1e-6,
            weld_ratio: 0.004,
            shell_reach: 4096.0,
        }
    }
}

impl GeometryConfig {
    /// The three sample offsets around every ray: straight, left, right.
    #[inline]
    pub fn jitter_offsets(&self) -> [f32; 3] {
        [0.0, self.jitter_angle, -self.jitter_angle]
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
