//! Animators move sensors, lights, anchor points and edges over time.
//!
//! Targets are addressed with [`PointRef`] handles resolved through the
//! `World` each frame, so clearing a level invalidates them cleanly.

use arrayvec::ArrayVec;
use glam::Vec2;

use crate::edge::Edge;
use crate::types::{EdgeHandle, LightHandle, PointHandle, SensorHandle, MAX_WAYPOINTS};

/// A movable point somewhere in the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointRef {
    Sensor(SensorHandle),
    Light(LightHandle),
    Anchor(PointHandle),
    EdgeStart(EdgeHandle),
    EdgeEnd(EdgeHandle),
}

/// `0.5 - 0.5 * cos(PI * t)`
#[inline]
pub fn ease_inout_sine(t: f32) -> f32 {
    0.5 - 0.5 * (std::f32::consts::PI * t).cos()
}

/// Walks a point through its waypoints in a loop, one leg per `duration`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatrolPoint {
    pub target: PointRef,
    pub waypoints: ArrayVec<Vec2, MAX_WAYPOINTS>,
    pub duration: f32,
    timer: f32,
    current: usize,
}

impl PatrolPoint {
    pub fn new(target: PointRef, duration: f32) -> Self {
        Self {
            target,
            waypoints: ArrayVec::new(),
            duration,
            timer: 0.0,
            current: 0,
        }
    }

    /// Rewind to the first leg.
    pub fn reset(&mut self) {
        self.timer = 0.0;
        self.current = 0;
    }

    pub fn current_waypoint(&self) -> usize {
        self.current
    }

    /// Advance by `dt` and return where the target should be. `None` when
    /// there are no waypoints.
    pub fn advance(&mut self, dt: f32) -> Option<Vec2> {
        let count = self.waypoints.len();
        if count == 0 {
            return None;
        }

        self.timer += dt;
        if self.timer > self.duration {
            self.timer = 0.0;
            self.current = (self.current + 1) % count;
        }

        let start = self.waypoints[self.current];
        let end = self.waypoints[(self.current + 1) % count];
        let alpha = if self.duration > 0.0 {
            ease_inout_sine(self.timer / self.duration)
        } else {
            1.0
        };
        Some(start.lerp(end, alpha))
    }
}

/// Orbits a point around a pivot at `speed` radians per second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotatePoint {
    pub target: PointRef,
    pub pivot: PointRef,
    /// Offset from pivot to target
    pub delta: Vec2,
    pub speed: f32,
}

impl RotatePoint {
    /// Rotate the offset and return the target position for `pivot_pos`.
    pub fn advance(&mut self, pivot_pos: Vec2, dt: f32) -> Vec2 {
        self.delta = Vec2::from_angle(self.speed * dt).rotate(self.delta);
        pivot_pos + self.delta
    }
}

/// Swings an edge back and forth between two poses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatrolEdge {
    pub edge: EdgeHandle,
    pub from: Edge,
    pub to: Edge,
    pub duration: f32,
    timer: f32,
}

impl PatrolEdge {
    pub fn new(edge: EdgeHandle, from: Edge, to: Edge, duration: f32) -> Self {
        Self {
            edge,
            from,
            to,
            duration,
            timer: 0.0,
        }
    }

    /// `alpha = (cos(PI * (timer / duration - 1)) + 1) / 2`, so the edge starts
    /// at `from`, reaches `to` after one `duration` and keeps swinging.
    pub fn advance(&mut self, dt: f32) -> Edge {
        self.timer += dt;
        let phase = if self.duration > 0.0 {
            self.timer / self.duration
        } else {
            0.0
        };
        let alpha = ((std::f32::consts::PI * (phase - 1.0)).cos() + 1.0) / 2.0;
        self.from.lerp(&self.to, alpha)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Animator {
    PatrolPoint(PatrolPoint),
    RotatePoint(RotatePoint),
    PatrolEdge(PatrolEdge),
}

impl Animator {
    pub fn name(&self) -> &'static str {
        match self {
            Animator::PatrolPoint(_) => "patrol_point",
            Animator::RotatePoint(_) => "rotate_point",
            Animator::PatrolEdge(_) => "patrol_edge",
        }
    }
}
