//! World - the level being played and everything computed from it each frame
//!
//! `World` owns every store (edges, lights, sensors, sensor groups, anchor
//! points, animators), the player and the scratch memory of the light pass.
//! All stores are bounded; after a level is built, [`World::step`] runs without
//! touching the heap.
//!
//! # Frame order
//!
//! 1. [`World::update_player`] - pointer input may move or turn a light
//! 2. [`World::animate`] - animators move sensors, lights, points and edges
//! 3. [`World::generate_lights`] - sample, sort, weld and triangulate each light
//! 4. [`World::update_sensors`] - accumulate light at sensors, solve groups
//!
//! # Handles
//!
//! Builders return handles tagged with the current generation. [`World::clear`]
//! starts a new generation, so a handle kept from the previous level is
//! rejected with [`LitError::StaleHandle`] instead of pointing at whatever
//! now occupies its slot.

use std::mem;

use arrayvec::ArrayVec;
use glam::Vec2;

use crate::animator::{Animator, PatrolEdge, PatrolPoint, PointRef, RotatePoint};
use crate::config::GeometryConfig;
use crate::edge::{box_edges, Edge};
use crate::error::LitError;
use crate::light::Light;
use crate::overlap::light_at;
use crate::player::{Player, PlayerInput};
use crate::sensor::{Sensor, SensorGroup, SensorReport};
use crate::snapshot::{FrameSnapshot, LightSnapshot, PlayerSnapshot, SensorSnapshot};
use crate::sort::RingScratch;
use crate::types::{
    AnimatorHandle, EdgeHandle, LightHandle, PointHandle, SensorGroupId, SensorHandle,
    FIELD_HEIGHT, FIELD_WIDTH, MAX_ANIMATORS, MAX_EDGES, MAX_LIGHTS, MAX_POINTS,
    MAX_SENSORS, MAX_SENSOR_GROUPS, MAX_WAYPOINTS,
};
use crate::Result;

/// Summary of one [`World::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    pub frame: u64,
    /// Groups whose sensors all match this frame
    pub solved_groups: usize,
    /// Of those, groups that were not solved last frame
    pub newly_solved: usize,
    /// The level has groups and every one of them is solved
    pub level_complete: bool,
}

#[derive(Debug, Clone)]
pub struct World {
    config: GeometryConfig,
    generation: u32,
    frame: u64,
    edges: ArrayVec<Edge, MAX_EDGES>,
    // Each light carries its own sample and triangle buffers, too large to
    // keep inline; the Vec is allocated once at MAX_LIGHTS and never grows.
    lights: Vec<Light>,
    sensors: ArrayVec<Sensor, MAX_SENSORS>,
    groups: ArrayVec<SensorGroup, MAX_SENSOR_GROUPS>,
    points: ArrayVec<Vec2, MAX_POINTS>,
    animators: ArrayVec<Animator, MAX_ANIMATORS>,
    reports: ArrayVec<SensorReport, MAX_SENSOR_GROUPS>,
    open_group: Option<u16>,
    open_patrol: Option<usize>,
    /// Animators hold still while set
    frozen: bool,
    player: Player,
    scratch: RingScratch,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self::with_config(GeometryConfig::default())
    }

    pub fn with_config(config: GeometryConfig) -> Self {
        Self {
            config,
            generation: 0,
            frame: 0,
            edges: ArrayVec::new(),
            lights: Vec::with_capacity(MAX_LIGHTS),
            sensors: ArrayVec::new(),
            groups: ArrayVec::new(),
            points: ArrayVec::new(),
            animators: ArrayVec::new(),
            reports: ArrayVec::new(),
            open_group: None,
            open_patrol: None,
            frozen: false,
            player: Player::default(),
            scratch: RingScratch::new(),
        }
    }

    pub fn config(&self) -> &GeometryConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: GeometryConfig) {
        self.config = config;
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Stop or resume animators. Lights and sensors keep updating.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Drop the current level. Every handle issued so far becomes stale.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.lights.clear();
        self.sensors.clear();
        self.groups.clear();
        self.points.clear();
        self.animators.clear();
        self.reports.clear();
        self.open_group = None;
        self.open_patrol = None;
        self.player.release();
        self.frame = 0;
        self.generation = self.generation.wrapping_add(1);
    }

    // ----- builders -----

    pub fn push_edge(&mut self, start: Vec2, end: Vec2) -> Result<EdgeHandle> {
        let index = self.edges.len();
        self.edges
            .try_push(Edge::new(start, end))
            .map_err(|_| LitError::full("edge", MAX_EDGES))?;
        Ok(EdgeHandle::new(index as u16, self.generation))
    }

    /// Push a segment in both directions so both of its endpoints get sampled.
    pub fn push_double_edge(&mut self, a: Vec2, b: Vec2) -> Result<[EdgeHandle; 2]> {
        ensure_room(self.edges.len() + 2, MAX_EDGES, "edge")?;
        Ok([self.push_edge(a, b)?, self.push_edge(b, a)?])
    }

    /// Four edges chained counter-clockwise around `min..max`.
    pub fn push_box(&mut self, min: Vec2, max: Vec2) -> Result<[EdgeHandle; 4]> {
        ensure_room(self.edges.len() + 4, MAX_EDGES, "edge")?;
        let [a, b, c, d] = box_edges(min, max);
        Ok([
            self.push_edge(a.start_pt, a.end_pt)?,
            self.push_edge(b.start_pt, b.end_pt)?,
            self.push_edge(c.start_pt, c.end_pt)?,
            self.push_edge(d.start_pt, d.end_pt)?,
        ])
    }

    /// Same as [`World::push_box`], given by center and half size.
    pub fn push_aabb(&mut self, center: Vec2, half_extents: Vec2) -> Result<[EdgeHandle; 4]> {
        self.push_box(center - half_extents, center + half_extents)
    }

    /// The playfield border.
    pub fn push_boundary(&mut self) -> Result<[EdgeHandle; 4]> {
        self.push_box(Vec2::ZERO, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT))
    }

    /// `full_angle_deg` of 360 makes a point light; `facing_turns` is the
    /// facing direction in turns counter-clockwise from `+x`.
    pub fn push_light(
        &mut self,
        pos: Vec2,
        color: u32,
        full_angle_deg: f32,
        facing_turns: f32,
    ) -> Result<LightHandle> {
        let index = self.lights.len();
        if index >= MAX_LIGHTS {
            return Err(LitError::full("light", MAX_LIGHTS));
        }
        self.lights
            .push(Light::new(pos, color, full_angle_deg, facing_turns));
        Ok(LightHandle::new(index as u16, self.generation))
    }

    /// A free-standing point for animators to orbit.
    pub fn push_point(&mut self, pos: Vec2) -> Result<PointHandle> {
        let index = self.points.len();
        self.points
            .try_push(pos)
            .map_err(|_| LitError::full("point", MAX_POINTS))?;
        Ok(PointHandle::new(index as u16, self.generation))
    }

    /// Open a group; sensors pushed until [`World::end_sensor_group`] join it.
    /// Opening a group while another is open closes the first one.
    pub fn begin_sensor_group(&mut self, tag: u32) -> Result<SensorGroupId> {
        let index = self.groups.len();
        self.groups
            .try_push(SensorGroup::new(tag))
            .map_err(|_| LitError::full("sensor group", MAX_SENSOR_GROUPS))?;
        self.open_group = Some(index as u16);
        Ok(SensorGroupId::new(index as u16, self.generation))
    }

    pub fn end_sensor_group(&mut self) {
        self.open_group = None;
    }

    pub fn push_sensor(&mut self, pos: Vec2, target_color: u32) -> Result<SensorHandle> {
        let index = self.sensors.len();
        self.sensors
            .try_push(Sensor::new(pos, target_color, self.open_group))
            .map_err(|_| LitError::full("sensor", MAX_SENSORS))?;
        if let Some(group) = self.open_group.and_then(|g| self.groups.get_mut(g as usize)) {
            group.sensor_count += 1;
        }
        Ok(SensorHandle::new(index as u16, self.generation))
    }

    /// A sensor orbiting `pivot` at `speed` radians per second.
    pub fn push_rotating_sensor(
        &mut self,
        pos: Vec2,
        pivot: PointRef,
        speed: f32,
        target_color: u32,
    ) -> Result<SensorHandle> {
        self.point_of(pivot)?;
        ensure_room(self.animators.len() + 1, MAX_ANIMATORS, "animator")?;
        let sensor = self.push_sensor(pos, target_color)?;
        self.push_rotate_animator(PointRef::Sensor(sensor), pivot, speed)?;
        Ok(sensor)
    }

    /// Orbit any point around another.
    pub fn push_rotate_animator(
        &mut self,
        target: PointRef,
        pivot: PointRef,
        speed: f32,
    ) -> Result<AnimatorHandle> {
        let delta = self.point_of(target)? - self.point_of(pivot)?;
        self.push_animator(Animator::RotatePoint(RotatePoint {
            target,
            pivot,
            delta,
            speed,
        }))
    }

    /// Start a sensor that walks a loop of waypoints, `pos` being the first.
    /// Add more with [`World::push_patrol_waypoint`] and finish with
    /// [`World::end_patrolling_sensor`].
    pub fn begin_patrolling_sensor(
        &mut self,
        pos: Vec2,
        target_color: u32,
        duration_per_waypoint: f32,
    ) -> Result<SensorHandle> {
        if self.open_patrol.is_some() {
            return Err(LitError::PatrolAlreadyOpen);
        }
        ensure_room(self.animators.len() + 1, MAX_ANIMATORS, "animator")?;
        let sensor = self.push_sensor(pos, target_color)?;

        let mut patrol = PatrolPoint::new(PointRef::Sensor(sensor), duration_per_waypoint);
        patrol.waypoints.push(pos);
        let handle = self.push_animator(Animator::PatrolPoint(patrol))?;
        self.open_patrol = Some(handle.slot());
        Ok(sensor)
    }

    pub fn push_patrol_waypoint(&mut self, pos: Vec2) -> Result<()> {
        let patrol = self.open_patrol_mut()?;
        patrol
            .waypoints
            .try_push(pos)
            .map_err(|_| LitError::full("waypoint", MAX_WAYPOINTS))
    }

    /// Close the open patrol. A patrol that never got a second waypoint is an
    /// error; its sensor stays put.
    pub fn end_patrolling_sensor(&mut self) -> Result<AnimatorHandle> {
        let patrol = self.open_patrol_mut()?;
        let waypoints = patrol.waypoints.len();
        patrol.reset();
        let slot = self.open_patrol.take().ok_or(LitError::NoOpenPatrol)?;
        if waypoints < 2 {
            return Err(LitError::PatrolWithoutWaypoints);
        }
        Ok(AnimatorHandle::new(slot as u16, self.generation))
    }

    /// An edge that swings between two poses, starting at `from`.
    pub fn push_patrolling_edge(&mut self, from: Edge, to: Edge, duration: f32) -> Result<EdgeHandle> {
        ensure_room(self.animators.len() + 1, MAX_ANIMATORS, "animator")?;
        let edge = self.push_edge(from.start_pt, from.end_pt)?;
        self.push_animator(Animator::PatrolEdge(PatrolEdge::new(edge, from, to, duration)))?;
        Ok(edge)
    }

    pub fn push_patrolling_double_edge(
        &mut self,
        from: Edge,
        to: Edge,
        duration: f32,
    ) -> Result<[EdgeHandle; 2]> {
        ensure_room(self.edges.len() + 2, MAX_EDGES, "edge")?;
        ensure_room(self.animators.len() + 2, MAX_ANIMATORS, "animator")?;
        Ok([
            self.push_patrolling_edge(from, to, duration)?,
            self.push_patrolling_edge(from.reversed(), to.reversed(), duration)?,
        ])
    }

    fn push_animator(&mut self, animator: Animator) -> Result<AnimatorHandle> {
        let index = self.animators.len();
        log::debug!("animator {index}: {}", animator.name());
        self.animators
            .try_push(animator)
            .map_err(|_| LitError::full("animator", MAX_ANIMATORS))?;
        Ok(AnimatorHandle::new(index as u16, self.generation))
    }

    fn open_patrol_mut(&mut self) -> Result<&mut PatrolPoint> {
        let slot = self.open_patrol.ok_or(LitError::NoOpenPatrol)?;
        match self.animators.get_mut(slot) {
            Some(Animator::PatrolPoint(patrol)) => Ok(patrol),
            _ => Err(LitError::NoOpenPatrol),
        }
    }

    // ----- handle access -----

    fn check(&self, index: u16, generation: u32, len: usize, what: &'static str) -> Result<usize> {
        if generation != self.generation || index as usize >= len {
            return Err(LitError::stale(what));
        }
        Ok(index as usize)
    }

    pub fn edge(&self, handle: EdgeHandle) -> Result<&Edge> {
        let slot = self.check(handle.index, handle.generation, self.edges.len(), "edge")?;
        Ok(&self.edges[slot])
    }

    pub fn edge_mut(&mut self, handle: EdgeHandle) -> Result<&mut Edge> {
        let slot = self.check(handle.index, handle.generation, self.edges.len(), "edge")?;
        Ok(&mut self.edges[slot])
    }

    pub fn light(&self, handle: LightHandle) -> Result<&Light> {
        let slot = self.check(handle.index, handle.generation, self.lights.len(), "light")?;
        Ok(&self.lights[slot])
    }

    pub fn light_mut(&mut self, handle: LightHandle) -> Result<&mut Light> {
        let slot = self.check(handle.index, handle.generation, self.lights.len(), "light")?;
        Ok(&mut self.lights[slot])
    }

    pub fn sensor(&self, handle: SensorHandle) -> Result<&Sensor> {
        let slot = self.check(handle.index, handle.generation, self.sensors.len(), "sensor")?;
        Ok(&self.sensors[slot])
    }

    pub fn sensor_mut(&mut self, handle: SensorHandle) -> Result<&mut Sensor> {
        let slot = self.check(handle.index, handle.generation, self.sensors.len(), "sensor")?;
        Ok(&mut self.sensors[slot])
    }

    pub fn point(&self, handle: PointHandle) -> Result<Vec2> {
        let slot = self.check(handle.index, handle.generation, self.points.len(), "point")?;
        Ok(self.points[slot])
    }

    pub fn group(&self, id: SensorGroupId) -> Result<&SensorGroup> {
        let slot = self.check(id.index, id.generation, self.groups.len(), "sensor group")?;
        Ok(&self.groups[slot])
    }

    pub fn animator(&self, handle: AnimatorHandle) -> Result<&Animator> {
        let slot = self.check(handle.index, handle.generation, self.animators.len(), "animator")?;
        Ok(&self.animators[slot])
    }

    /// Current position of any addressable point.
    pub fn point_of(&self, point: PointRef) -> Result<Vec2> {
        Ok(match point {
            PointRef::Sensor(h) => self.sensor(h)?.pos,
            PointRef::Light(h) => self.light(h)?.pos,
            PointRef::Anchor(h) => self.point(h)?,
            PointRef::EdgeStart(h) => self.edge(h)?.start_pt,
            PointRef::EdgeEnd(h) => self.edge(h)?.end_pt,
        })
    }

    pub fn set_point(&mut self, point: PointRef, pos: Vec2) -> Result<()> {
        match point {
            PointRef::Sensor(h) => self.sensor_mut(h)?.pos = pos,
            PointRef::Light(h) => self.light_mut(h)?.pos = pos,
            PointRef::Anchor(h) => {
                let slot = self.check(h.index, h.generation, self.points.len(), "point")?;
                self.points[slot] = pos;
            }
            PointRef::EdgeStart(h) => self.edge_mut(h)?.start_pt = pos,
            PointRef::EdgeEnd(h) => self.edge_mut(h)?.end_pt = pos,
        }
        Ok(())
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    pub fn groups(&self) -> &[SensorGroup] {
        &self.groups
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn animators(&self) -> &[Animator] {
        &self.animators
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Groups solved by the last [`World::update_sensors`].
    pub fn reports(&self) -> &[SensorReport] {
        &self.reports
    }

    // ----- frame -----

    pub fn update_player(&mut self, input: &PlayerInput, dt: f32) {
        self.player.update(input, &mut self.lights, dt);
    }

    pub fn animate(&mut self, dt: f32) -> Result<()> {
        let mut animators = mem::take(&mut self.animators);
        let result = animators
            .iter_mut()
            .try_for_each(|animator| self.apply_animator(animator, dt));
        self.animators = animators;
        result
    }

    fn apply_animator(&mut self, animator: &mut Animator, dt: f32) -> Result<()> {
        match animator {
            Animator::PatrolPoint(patrol) => {
                if let Some(pos) = patrol.advance(dt) {
                    self.set_point(patrol.target, pos)?;
                }
            }
            Animator::RotatePoint(rotate) => {
                let pivot = self.point_of(rotate.pivot)?;
                let pos = rotate.advance(pivot, dt);
                self.set_point(rotate.target, pos)?;
            }
            Animator::PatrolEdge(patrol) => {
                let pose = patrol.advance(dt);
                *self.edge_mut(patrol.edge)? = pose;
            }
        }
        Ok(())
    }

    /// Rebuild every light's triangle fan against the current edges.
    pub fn generate_lights(&mut self) -> Result<()> {
        for light in self.lights.iter_mut() {
            light.generate(&self.edges, &self.config, &mut self.scratch)?;
        }
        Ok(())
    }

    /// Recompute each sensor's light and the solved groups.
    pub fn update_sensors(&mut self) -> &[SensorReport] {
        for group in self.groups.iter_mut() {
            group.satisfied_count = 0;
        }

        for sensor in self.sensors.iter_mut() {
            sensor.current_color = light_at(sensor.pos, &self.lights);
            if !sensor.is_satisfied() {
                continue;
            }
            if let Some(group) = sensor.group.and_then(|g| self.groups.get_mut(g as usize)) {
                group.satisfied_count += 1;
            }
        }

        self.reports.clear();
        for (slot, group) in self.groups.iter_mut().enumerate() {
            let complete = group.is_complete();
            if complete {
                let newly_solved = !group.solved;
                if newly_solved {
                    log::info!("sensor group {slot} (tag {}) solved", group.tag);
                }
                self.reports.push(SensorReport {
                    group: SensorGroupId::new(slot as u16, self.generation),
                    tag: group.tag,
                    newly_solved,
                });
            }
            group.solved = complete;
        }

        &self.reports
    }

    /// Run one full frame.
    pub fn step(&mut self, dt: f32, input: &PlayerInput) -> Result<FrameReport> {
        self.update_player(input, dt);
        if !self.frozen {
            self.animate(dt)?;
        }
        self.generate_lights()?;
        self.update_sensors();
        self.frame += 1;

        let solved_groups = self.reports.len();
        let report = FrameReport {
            frame: self.frame,
            solved_groups,
            newly_solved: self.reports.iter().filter(|r| r.newly_solved).count(),
            level_complete: !self.groups.is_empty() && solved_groups == self.groups.len(),
        };
        log::trace!(
            "frame {} lights={} solved={}/{}",
            report.frame,
            self.lights.len(),
            solved_groups,
            self.groups.len()
        );
        Ok(report)
    }

    /// True when the level has sensor groups and all of them are solved.
    pub fn is_solved(&self) -> bool {
        !self.groups.is_empty() && self.groups.iter().all(|g| g.solved)
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        let mut snapshot = FrameSnapshot::default();
        self.snapshot_into(&mut snapshot);
        snapshot
    }

    /// Fill `out` with the current frame, reusing its buffers.
    pub fn snapshot_into(&self, out: &mut FrameSnapshot) {
        out.frame = self.frame;
        out.generation = self.generation;

        out.edges.clear();
        out.edges.extend_from_slice(&self.edges);

        out.lights.truncate(self.lights.len());
        while out.lights.len() < self.lights.len() {
            out.lights.push(LightSnapshot::default());
        }
        for (snap, light) in out.lights.iter_mut().zip(self.lights.iter()) {
            snap.pos = light.pos;
            snap.dir = light.dir;
            snap.half_angle = light.half_angle;
            snap.color = light.color;
            snap.kind = light.kind().as_str();
            snap.triangles.clear();
            snap.triangles.extend_from_slice(light.triangles());
        }

        out.sensors.clear();
        out.sensors.extend(self.sensors.iter().map(|s| SensorSnapshot {
            pos: s.pos,
            target_color: s.target_color,
            current_color: s.current_color,
            group: s.group,
            satisfied: s.is_satisfied(),
        }));

        out.solved.clear();
        out.solved.extend_from_slice(&self.reports);

        out.player = PlayerSnapshot {
            pos: self.player.pos,
            hold_mode: self.player.hold_mode().as_str(),
            nearest_light: self.player.nearest_light(),
            held_light: self.player.held_light(),
        };
    }
}

fn ensure_room(needed: usize, capacity: usize, what: &'static str) -> Result<()> {
    if needed > capacity {
        return Err(LitError::full(what, capacity));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn stale_handles_after_clear() {
        let mut world = World::new();
        let edge = world.push_edge(Vec2::ZERO, Vec2::X).unwrap();
        let light = world.push_light(Vec2::ONE, 0xFFFF_FFFF, 360.0, 0.0).unwrap();
        assert!(world.edge(edge).is_ok());

        world.clear();
        world.push_edge(Vec2::ZERO, Vec2::Y).unwrap();
        assert!(matches!(world.edge(edge), Err(LitError::StaleHandle { what: "edge" })));
        assert!(matches!(world.light(light), Err(LitError::StaleHandle { .. })));
    }

    #[test]
    fn out_of_range_handle_is_rejected() {
        let world = World::new();
        let bogus = SensorHandle::new(5, world.generation());
        assert!(world.sensor(bogus).is_err());
    }

    #[test]
    fn every_store_reports_overflow() {
        let mut world = World::new();
        for _ in 0..MAX_EDGES {
            world.push_edge(Vec2::ZERO, Vec2::X).unwrap();
        }
        assert!(matches!(
            world.push_edge(Vec2::ZERO, Vec2::X),
            Err(LitError::CapacityExceeded { what: "edge", capacity: MAX_EDGES })
        ));
        assert!(world.push_box(Vec2::ZERO, Vec2::ONE).is_err());
        assert_eq!(world.edges().len(), MAX_EDGES);

        for _ in 0..MAX_LIGHTS {
            world.push_light(Vec2::ZERO, 0, 360.0, 0.0).unwrap();
        }
        assert!(world.push_light(Vec2::ZERO, 0, 360.0, 0.0).is_err());

        for _ in 0..MAX_SENSORS {
            world.push_sensor(Vec2::ZERO, 0).unwrap();
        }
        assert!(world.push_sensor(Vec2::ZERO, 0).is_err());

        for _ in 0..MAX_POINTS {
            world.push_point(Vec2::ZERO).unwrap();
        }
        assert!(world.push_point(Vec2::ZERO).is_err());

        for _ in 0..MAX_SENSOR_GROUPS {
            world.begin_sensor_group(0).unwrap();
        }
        assert!(world.begin_sensor_group(0).is_err());
    }

    #[test]
    fn animator_store_overflow() {
        let mut world = World::new();
        let pivot = PointRef::Anchor(world.push_point(Vec2::splat(400.0)).unwrap());
        for _ in 0..MAX_ANIMATORS {
            world
                .push_rotate_animator(pivot, pivot, 1.0)
                .unwrap();
        }
        let err = world.push_rotating_sensor(Vec2::ZERO, pivot, 1.0, 0).unwrap_err();
        assert!(matches!(err, LitError::CapacityExceeded { what: "animator", .. }));
        // Nothing half-built is left behind.
        assert!(world.sensors().is_empty());
    }

    #[test]
    fn patrol_builder_misuse() {
        let mut world = World::new();
        assert!(matches!(world.push_patrol_waypoint(Vec2::ZERO), Err(LitError::NoOpenPatrol)));
        assert!(matches!(world.end_patrolling_sensor(), Err(LitError::NoOpenPatrol)));

        world.begin_patrolling_sensor(Vec2::ZERO, 0, 1.0).unwrap();
        assert!(matches!(
            world.begin_patrolling_sensor(Vec2::ZERO, 0, 1.0),
            Err(LitError::PatrolAlreadyOpen)
        ));
        assert!(matches!(world.end_patrolling_sensor(), Err(LitError::PatrolWithoutWaypoints)));

        world.begin_patrolling_sensor(Vec2::ZERO, 0, 1.0).unwrap();
        for i in 1..MAX_WAYPOINTS {
            world.push_patrol_waypoint(Vec2::splat(i as f32)).unwrap();
        }
        assert!(matches!(
            world.push_patrol_waypoint(Vec2::ONE),
            Err(LitError::CapacityExceeded { what: "waypoint", .. })
        ));
        assert!(world.end_patrolling_sensor().is_ok());
    }

    #[test]
    fn sensors_join_open_group() {
        let mut world = World::new();
        world.push_sensor(Vec2::ZERO, 0).unwrap();
        let group = world.begin_sensor_group(42).unwrap();
        world.push_sensor(Vec2::ONE, 0).unwrap();
        world.push_sensor(Vec2::ONE, 0).unwrap();
        world.end_sensor_group();
        world.push_sensor(Vec2::ONE, 0).unwrap();

        assert_eq!(world.group(group).unwrap().sensor_count, 2);
        assert_eq!(world.group(group).unwrap().tag, 42);
        let grouped = world.sensors().iter().filter(|s| s.group.is_some()).count();
        assert_eq!(grouped, 2);
    }

    #[test]
    fn group_solves_only_when_all_match() {
        let mut world = World::new();
        world.push_boundary().unwrap();
        world.push_double_edge(Vec2::new(400.0, 100.0), Vec2::new(400.0, 700.0)).unwrap();
        world.push_light(Vec2::new(200.0, 400.0), 0x8800_00FF, 360.0, 0.0).unwrap();
        let group = world.begin_sensor_group(1).unwrap();
        world.push_sensor(Vec2::new(100.0, 400.0), 0x8800_00FF).unwrap();
        let hidden = world.push_sensor(Vec2::new(600.0, 400.0), 0x8800_00FF).unwrap();
        world.end_sensor_group();

        let report = world.step(0.016, &PlayerInput::default()).unwrap();
        assert_eq!(report.solved_groups, 0);
        assert!(!world.group(group).unwrap().solved);
        assert_eq!(world.sensor(hidden).unwrap().current_color, 0);

        world.sensor_mut(hidden).unwrap().pos = Vec2::new(300.0, 600.0);
        let report = world.step(0.016, &PlayerInput::default()).unwrap();
        assert_eq!(report.solved_groups, 1);
        assert_eq!(report.newly_solved, 1);
        assert!(report.level_complete);
        assert_eq!(world.reports()[0].tag, 1);

        let report = world.step(0.016, &PlayerInput::default()).unwrap();
        assert_eq!(report.solved_groups, 1);
        assert_eq!(report.newly_solved, 0);
    }

    #[test]
    fn aabb_matches_box_around_center() {
        let mut world = World::new();
        let aabb = world
            .push_aabb(Vec2::new(400.0, 300.0), Vec2::new(50.0, 20.0))
            .unwrap();
        world
            .push_box(Vec2::new(350.0, 280.0), Vec2::new(450.0, 320.0))
            .unwrap();
        assert_eq!(world.edges()[..4], world.edges()[4..]);
        assert_eq!(world.edge(aabb[0]).unwrap().start_pt, Vec2::new(350.0, 280.0));
        assert_eq!(world.edge(aabb[2]).unwrap().start_pt, Vec2::new(450.0, 320.0));
    }

    #[test]
    fn rotating_sensor_orbits_anchor() {
        let mut world = World::new();
        let anchor = world.push_point(Vec2::new(400.0, 400.0)).unwrap();
        let sensor = world
            .push_rotating_sensor(
                Vec2::new(500.0, 400.0),
                PointRef::Anchor(anchor),
                std::f32::consts::PI,
                0,
            )
            .unwrap();
        world.animate(0.5).unwrap();
        let pos = world.sensor(sensor).unwrap().pos;
        assert_relative_eq!(pos.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(pos.y, 500.0, epsilon = 1e-3);
    }

    #[test]
    fn patrolling_edge_moves_edge() {
        let mut world = World::new();
        let from = Edge::new(Vec2::new(100.0, 100.0), Vec2::new(100.0, 200.0));
        let to = Edge::new(Vec2::new(300.0, 100.0), Vec2::new(300.0, 200.0));
        let [forward, backward] = world.push_patrolling_double_edge(from, to, 1.0).unwrap();
        world.animate(1.0).unwrap();
        assert_relative_eq!(world.edge(forward).unwrap().start_pt.x, 300.0, epsilon = 1e-3);
        assert_relative_eq!(world.edge(backward).unwrap().end_pt.x, 300.0, epsilon = 1e-3);
        assert_eq!(world.edge(backward).unwrap().start_pt.y, 200.0);
    }

    #[test]
    fn frozen_world_holds_animators_still() {
        let mut world = World::new();
        let from = Edge::new(Vec2::new(100.0, 100.0), Vec2::new(100.0, 200.0));
        let to = Edge::new(Vec2::new(300.0, 100.0), Vec2::new(300.0, 200.0));
        let edge = world.push_patrolling_edge(from, to, 1.0).unwrap();

        world.set_frozen(true);
        world.step(0.5, &PlayerInput::default()).unwrap();
        assert_eq!(*world.edge(edge).unwrap(), from);
        assert_eq!(world.frame(), 1);

        world.set_frozen(false);
        world.step(0.5, &PlayerInput::default()).unwrap();
        assert_relative_eq!(world.edge(edge).unwrap().start_pt.x, 200.0, epsilon = 1e-3);
    }

    #[test]
    fn snapshot_reuses_buffers() {
        let mut world = World::new();
        world.push_boundary().unwrap();
        world.push_light(Vec2::splat(400.0), 0xFFFF_FFFF, 360.0, 0.0).unwrap();
        world.push_sensor(Vec2::splat(100.0), 0xFFFF_FFFF).unwrap();
        world.step(0.016, &PlayerInput::default()).unwrap();

        let mut snap = FrameSnapshot::default();
        world.snapshot_into(&mut snap);
        assert_eq!(snap.edges.len(), 4);
        assert_eq!(snap.lights.len(), 1);
        assert_eq!(snap.lights[0].kind, "point");
        assert_eq!(snap.triangle_count(), 4);
        assert_eq!(snap.satisfied_sensors(), 1);

        let cap = snap.lights[0].triangles.capacity();
        world.step(0.016, &PlayerInput::default()).unwrap();
        world.snapshot_into(&mut snap);
        assert_eq!(snap.lights[0].triangles.capacity(), cap);
        assert_eq!(snap.frame, 2);
        assert_eq!(snap, world.snapshot());
    }
}
