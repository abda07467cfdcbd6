//! Sensors and sensor groups.
//!
//! A sensor is a point that wants a specific mix of light. Sensors pushed while
//! a group is open belong to it; the group is solved in every frame in which
//! all of its sensors see their target color.

use glam::Vec2;
use serde::Serialize;

use crate::types::{rgb_bits, SensorGroupId};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensor {
    pub pos: Vec2,
    /// Packed `0xRRGGBBAA`; alpha is ignored when matching
    pub target_color: u32,
    /// Light accumulated this frame, alpha always zero
    pub current_color: u32,
    /// Slot of the owning group
    pub group: Option<u16>,
}

impl Sensor {
    pub fn new(pos: Vec2, target_color: u32, group: Option<u16>) -> Self {
        Self {
            pos,
            target_color,
            current_color: 0,
            group,
        }
    }

    #[inline]
    pub fn is_satisfied(&self) -> bool {
        rgb_bits(self.current_color) == rgb_bits(self.target_color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorGroup {
    /// Caller-chosen tag naming what the group unlocks
    pub tag: u32,
    pub sensor_count: u16,
    pub satisfied_count: u16,
    /// Solved as of the last `update_sensors`
    pub solved: bool,
}

impl SensorGroup {
    pub fn new(tag: u32) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    #[inline]
    pub(crate) fn is_complete(&self) -> bool {
        self.sensor_count > 0 && self.satisfied_count == self.sensor_count
    }
}

/// A group that was solved in the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SensorReport {
    #[serde(skip)]
    pub group: SensorGroupId,
    pub tag: u32,
    /// `true` only in the first frame of a solved streak
    pub newly_solved: bool,
}
