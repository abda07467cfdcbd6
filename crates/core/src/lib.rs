//! Light engine core - shadow casting, triangulation and puzzle logic
//!
//! Given opaque line segments and a set of lights, this crate computes every
//! frame the triangles covering the region each light illuminates, and answers
//! point-in-light queries for the puzzle's sensors. It has no dependencies on
//! terminal, input or I/O:
//!
//! - **Deterministic**: same level and inputs give the same triangles
//! - **Bounded**: every store has a fixed capacity; overflow is an error
//! - **Allocation-free frames**: [`World::step`] never touches the heap once a
//!   level is built
//!
//! # Module Structure
//!
//! - [`edge`]: opaque segments and their ghost lines
//! - [`intersect`]: nearest ray/segment hit
//! - [`sampler`]: jittered corner rays and cone shell rays for one light
//! - [`sort`]: angular ordering of samples and the ring weld
//! - [`triangulate`]: CCW fan around the light
//! - [`overlap`]: point-in-triangle and accumulated light color
//! - [`light`]: lights and their per-frame buffers
//! - [`sensor`]: sensors, sensor groups, solve reports
//! - [`animator`]: patrolling and orbiting points, swinging edges
//! - [`player`]: picking up, moving and turning lights
//! - [`world`]: the level context that owns all of the above
//! - [`scene`]: JSON level descriptions
//! - [`snapshot`]: serializable view of a frame
//!
//! # Light pass
//!
//! For each light:
//!
//! 1. **Sample**: cast a ray through every visible edge `end_pt`, once straight
//!    (clamped to the endpoint) and twice rotated by a small jitter angle
//!    (unclamped, to see past corners). Cone lights add shell rays along both
//!    cone boundaries.
//! 2. **Sort** samples by angle around the light.
//! 3. **Weld** angularly adjacent samples that land on the same spot.
//! 4. **Fan**: join each adjacent pair with the light position into a CCW
//!    triangle, dropping wrongly wound pairs and, for wide cones, the pair
//!    spanning the gap behind the light.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use lit_core::{PlayerInput, World};
//!
//! let mut world = World::new();
//! world.push_boundary().unwrap();
//! world.push_light(Vec2::new(400.0, 400.0), 0xFF0000FF, 360.0, 0.0).unwrap();
//! world.begin_sensor_group(1).unwrap();
//! world.push_sensor(Vec2::new(100.0, 700.0), 0xFF0000FF).unwrap();
//! world.end_sensor_group();
//!
//! let report = world.step(1.0 / 60.0, &PlayerInput::default()).unwrap();
//! assert_eq!(world.lights()[0].triangles().len(), 4);
//! assert!(report.level_complete);
//! ```

pub mod animator;
pub mod config;
pub mod edge;
pub mod error;
pub mod intersect;
pub mod light;
pub mod overlap;
pub mod player;
pub mod sampler;
pub mod scene;
pub mod sensor;
pub mod snapshot;
pub mod sort;
pub mod triangulate;
pub mod world;

pub use lit_types as types;

// Re-export commonly used types for convenience
pub use animator::{Animator, PointRef};
pub use config::GeometryConfig;
pub use edge::Edge;
pub use error::{LitError, Result};
pub use intersect::nearest_hit;
pub use light::{Intersection, Light, Triangle};
pub use overlap::{light_at, point_in_triangle};
pub use player::{Player, PlayerInput};
pub use scene::SceneDesc;
pub use sensor::{Sensor, SensorGroup, SensorReport};
pub use snapshot::{FrameSnapshot, LightSnapshot, PlayerSnapshot, SensorSnapshot};
pub use sort::RingScratch;
pub use world::{FrameReport, World};
