use glam::Vec2;
use serde::Serialize;

use crate::edge::Edge;
use crate::light::Triangle;
use crate::sensor::SensorReport;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LightSnapshot {
    pub pos: Vec2,
    pub dir: Vec2,
    pub half_angle: f32,
    pub color: u32,
    pub kind: &'static str,
    pub triangles: Vec<Triangle>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SensorSnapshot {
    pub pos: Vec2,
    pub target_color: u32,
    pub current_color: u32,
    pub group: Option<u16>,
    pub satisfied: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub pos: Vec2,
    pub hold_mode: &'static str,
    pub nearest_light: Option<usize>,
    pub held_light: Option<usize>,
}

/// Everything a front end needs to draw one frame.
///
/// Filled by `World::snapshot_into`, which reuses every buffer, including the
/// per-light triangle lists, so steady-state frames do not allocate.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FrameSnapshot {
    pub frame: u64,
    pub generation: u32,
    pub edges: Vec<Edge>,
    pub lights: Vec<LightSnapshot>,
    pub sensors: Vec<SensorSnapshot>,
    pub solved: Vec<SensorReport>,
    pub player: PlayerSnapshot,
}

impl FrameSnapshot {
    pub fn triangle_count(&self) -> usize {
        self.lights.iter().map(|l| l.triangles.len()).sum()
    }

    pub fn satisfied_sensors(&self) -> usize {
        self.sensors.iter().filter(|s| s.satisfied).count()
    }
}
