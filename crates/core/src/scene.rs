//! JSON level descriptions.
//!
//! ```json
//! {
//!   "title": "Obstruct",
//!   "edges": [ { "from": [400, 200], "to": [400, 600], "double": true } ],
//!   "lights": [ { "pos": [200, 400], "color": "#880000FF" } ],
//!   "groups": [
//!     { "tag": 1, "sensors": [ { "pos": [600, 400], "color": "#880000FF" } ] }
//!   ]
//! }
//! ```
//!
//! Positions are `[x, y]` in field units with `y` up. Colors are packed
//! `0xRRGGBBAA` numbers or hex strings (`"#RRGGBBAA"`, `"0xRRGGBBAA"`,
//! `"#RRGGBB"`). Light `angle` is the full cone in degrees (default 360) and
//! `turns` the facing direction (default 0, facing `+x`).

use glam::Vec2;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::animator::PointRef;
use crate::edge::Edge;
use crate::error::LitError;
use crate::types::{parse_hex_color, PointHandle};
use crate::world::World;
use crate::Result;

fn de_color<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Packed(u32),
        Hex(String),
    }

    match Repr::deserialize(deserializer)? {
        Repr::Packed(color) => Ok(color),
        Repr::Hex(text) => parse_hex_color(&text)
            .ok_or_else(|| D::Error::custom(format!("invalid color {text:?}"))),
    }
}

fn yes() -> bool {
    true
}

fn full_circle() -> f32 {
    360.0
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneDesc {
    #[serde(default)]
    pub title: String,
    /// Enclose the level in the field border
    #[serde(default = "yes")]
    pub boundary: bool,
    #[serde(default)]
    pub edges: Vec<EdgeDesc>,
    #[serde(default)]
    pub boxes: Vec<BoxDesc>,
    #[serde(default)]
    pub patrolling_edges: Vec<PatrolEdgeDesc>,
    /// Anchor points, referenced by index from orbiting sensors
    #[serde(default)]
    pub points: Vec<Vec2>,
    #[serde(default)]
    pub lights: Vec<LightDesc>,
    #[serde(default)]
    pub groups: Vec<GroupDesc>,
    /// Sensors that belong to no group
    #[serde(default)]
    pub sensors: Vec<SensorDesc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EdgeDesc {
    pub from: Vec2,
    pub to: Vec2,
    /// Cast shadows from both endpoints
    #[serde(default)]
    pub double: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoxDesc {
    pub min: Vec2,
    pub max: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SegmentDesc {
    pub from: Vec2,
    pub to: Vec2,
}

impl From<SegmentDesc> for Edge {
    fn from(value: SegmentDesc) -> Self {
        Edge::new(value.from, value.to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatrolEdgeDesc {
    pub start: SegmentDesc,
    pub end: SegmentDesc,
    /// Seconds to swing from `start` to `end`
    pub duration: f32,
    #[serde(default)]
    pub double: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LightDesc {
    pub pos: Vec2,
    #[serde(deserialize_with = "de_color")]
    pub color: u32,
    #[serde(default = "full_circle")]
    pub angle: f32,
    #[serde(default)]
    pub turns: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupDesc {
    #[serde(default)]
    pub tag: u32,
    pub sensors: Vec<SensorDesc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SensorDesc {
    pub pos: Vec2,
    #[serde(deserialize_with = "de_color")]
    pub color: u32,
    #[serde(default)]
    pub motion: Option<MotionDesc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionDesc {
    /// Walk from `pos` through `waypoints` in a loop, `duration` seconds a leg
    Patrol { waypoints: Vec<Vec2>, duration: f32 },
    /// Circle around anchor point `anchor` at `speed` radians per second
    Orbit { anchor: usize, speed: f32 },
}

impl SceneDesc {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Push everything this level describes into `world`, on top of what is
    /// already there.
    pub fn build(&self, world: &mut World) -> Result<()> {
        if self.boundary {
            world.push_boundary()?;
        }
        for edge in &self.edges {
            if edge.double {
                world.push_double_edge(edge.from, edge.to)?;
            } else {
                world.push_edge(edge.from, edge.to)?;
            }
        }
        for b in &self.boxes {
            world.push_box(b.min, b.max)?;
        }
        for patrol in &self.patrolling_edges {
            let (from, to) = (Edge::from(patrol.start), Edge::from(patrol.end));
            if patrol.double {
                world.push_patrolling_double_edge(from, to, patrol.duration)?;
            } else {
                world.push_patrolling_edge(from, to, patrol.duration)?;
            }
        }

        let mut anchors = Vec::with_capacity(self.points.len());
        for &point in &self.points {
            anchors.push(world.push_point(point)?);
        }

        for light in &self.lights {
            world.push_light(light.pos, light.color, light.angle, light.turns)?;
        }

        for group in &self.groups {
            world.begin_sensor_group(group.tag)?;
            let built = group
                .sensors
                .iter()
                .try_for_each(|sensor| push_sensor(world, sensor, &anchors));
            world.end_sensor_group();
            built?;
        }
        for sensor in &self.sensors {
            push_sensor(world, sensor, &anchors)?;
        }

        log::debug!(
            "built level {:?}: {} edges, {} lights, {} sensors, {} groups, {} animators",
            self.title,
            world.edges().len(),
            world.lights().len(),
            world.sensors().len(),
            world.groups().len(),
            world.animators().len()
        );
        Ok(())
    }

    /// Replace whatever `world` holds with this level.
    pub fn load(&self, world: &mut World) -> Result<()> {
        world.clear();
        self.build(world)
    }
}

fn push_sensor(
    world: &mut World,
    sensor: &SensorDesc,
    anchors: &[PointHandle],
) -> Result<()> {
    match &sensor.motion {
        None => {
            world.push_sensor(sensor.pos, sensor.color)?;
        }
        Some(MotionDesc::Patrol { waypoints, duration }) => {
            world.begin_patrolling_sensor(sensor.pos, sensor.color, *duration)?;
            for &waypoint in waypoints {
                world.push_patrol_waypoint(waypoint)?;
            }
            world.end_patrolling_sensor()?;
        }
        Some(MotionDesc::Orbit { anchor, speed }) => {
            let pivot = anchors
                .get(*anchor)
                .copied()
                .ok_or(LitError::UnknownAnchor { index: *anchor })?;
            world.push_rotating_sensor(sensor.pos, PointRef::Anchor(pivot), *speed, sensor.color)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animator::Animator;

    const LEVEL: &str = r##"{
        "title": "Test",
        "edges": [ { "from": [400, 200], "to": [400, 600], "double": true } ],
        "boxes": [ { "min": [100, 100], "max": [150, 150] } ],
        "points": [ [400, 400] ],
        "lights": [
            { "pos": [200, 400], "color": "#880000FF" },
            { "pos": [600, 400], "color": 8913151, "angle": 90, "turns": 0.5 }
        ],
        "groups": [
            { "tag": 3, "sensors": [
                { "pos": [100, 400], "color": "0x880000FF" },
                { "pos": [450, 400], "color": "#008800",
                  "motion": { "kind": "orbit", "anchor": 0, "speed": 1.0 } }
            ] }
        ],
        "sensors": [
            { "pos": [700, 700], "color": "#FFFFFFFF",
              "motion": { "kind": "patrol", "waypoints": [[700, 100]], "duration": 2 } }
        ]
    }"##;

    #[test]
    fn parses_and_builds() {
        let scene = SceneDesc::from_json(LEVEL).unwrap();
        assert_eq!(scene.title, "Test");
        assert!(scene.boundary);
        assert_eq!(scene.lights[0].color, 0x8800_00FF);
        assert_eq!(scene.lights[1].color, 0x0088_00FF);
        assert_eq!(scene.lights[0].angle, 360.0);
        assert_eq!(scene.groups[0].sensors[1].color, 0x0088_00FF);

        let mut world = World::new();
        scene.load(&mut world).unwrap();
        // boundary + double edge + box
        assert_eq!(world.edges().len(), 4 + 2 + 4);
        assert_eq!(world.lights().len(), 2);
        assert_eq!(world.sensors().len(), 3);
        assert_eq!(world.groups().len(), 1);
        assert_eq!(world.groups()[0].sensor_count, 2);
        assert_eq!(world.groups()[0].tag, 3);
        assert!(matches!(world.animators()[0], Animator::RotatePoint(_)));
        assert!(matches!(world.animators()[1], Animator::PatrolPoint(_)));
    }

    #[test]
    fn load_replaces_previous_level() {
        let scene = SceneDesc::from_json(r#"{ "lights": [ { "pos": [1, 1], "color": 0 } ] }"#).unwrap();
        let mut world = World::new();
        scene.load(&mut world).unwrap();
        let generation = world.generation();
        scene.load(&mut world).unwrap();
        assert_eq!(world.lights().len(), 1);
        assert_eq!(world.generation(), generation + 1);
    }

    #[test]
    fn bad_input_is_a_scene_error() {
        assert!(matches!(SceneDesc::from_json("{ oops"), Err(LitError::Scene(_))));
        let bad_color = r##"{ "lights": [ { "pos": [1, 1], "color": "#nothex00" } ] }"##;
        assert!(matches!(SceneDesc::from_json(bad_color), Err(LitError::Scene(_))));
        let unknown = r#"{ "lamps": [] }"#;
        assert!(SceneDesc::from_json(unknown).is_err());
    }

    #[test]
    fn patrol_loops_back_to_its_start() {
        let json = r#"{ "sensors": [ { "pos": [0, 0], "color": 0,
            "motion": { "kind": "patrol", "waypoints": [[100, 0], [100, 100]], "duration": 1 } } ] }"#;
        let scene = SceneDesc::from_json(json).unwrap();
        let mut world = World::new();
        scene.load(&mut world).unwrap();

        // Two full legs, then halfway through the third.
        for _ in 0..7 {
            world.animate(0.5).unwrap();
        }
        let pos = world.sensors()[0].pos;
        assert!((pos.x - 50.0).abs() < 1e-3, "{pos}");
        assert!((pos.y - 50.0).abs() < 1e-3, "{pos}");
    }

    #[test]
    fn orbit_needs_declared_anchor() {
        let json = r#"{ "sensors": [ { "pos": [1, 1], "color": 0,
            "motion": { "kind": "orbit", "anchor": 2, "speed": 1 } } ] }"#;
        let scene = SceneDesc::from_json(json).unwrap();
        let err = scene.load(&mut World::new()).unwrap_err();
        assert!(matches!(err, LitError::UnknownAnchor { index: 2 }));
    }
}
