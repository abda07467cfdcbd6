//! Core types module - shared constants, handles and small enums
//!
//! This crate defines the fundamental types used throughout the workspace.
//! Everything here is plain data with no external dependencies, so it can be
//! used by the geometry core, the terminal front end and the input layer alike.
//!
//! # Playfield
//!
//! Levels are authored in a fixed 800x800 world with `y` pointing up:
//!
//! - **Width**: [`FIELD_WIDTH`] units
//! - **Height**: [`FIELD_HEIGHT`] units
//! - Every level is enclosed by the field boundary box unless it opts out
//!
//! # Capacities
//!
//! All stores are bounded. Pushing past a bound is an error, never a resize:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MAX_EDGES` | 256 | Opaque segments per level |
//! | `MAX_LIGHTS` | 32 | Lights per level |
//! | `MAX_SENSORS` | 128 | Sensors per level |
//! | `MAX_SENSOR_GROUPS` | 32 | Sensor groups per level |
//! | `MAX_ANIMATORS` | 64 | Animators per level |
//! | `MAX_POINTS` | 32 | Anchor points per level |
//! | `MAX_WAYPOINTS` | 8 | Waypoints per patrol |
//! | `MAX_INTERSECTIONS` | 512 | Ray samples per light per frame |
//! | `MAX_TRIANGLES` | 512 | Lit triangles per light per frame |
//!
//! # Colors
//!
//! Colors are packed `0xRRGGBBAA`. Light accumulation ignores the alpha byte,
//! see [`SENSOR_COLOR_MASK`] and [`rgb_bits`].
//!
//! # Examples
//!
//! ```
//! use lit_types::{LightKind, PlayerAction, parse_hex_color, rgb_bits};
//! use std::f32::consts::PI;
//!
//! assert_eq!(LightKind::classify(PI), LightKind::Point);
//! assert_eq!(LightKind::classify(PI / 8.0), LightKind::Directional);
//! assert_eq!(LightKind::classify(PI * 0.75), LightKind::Wide);
//!
//! assert_eq!(parse_hex_color("#880000FF"), Some(0x8800_00FF));
//! assert_eq!(rgb_bits(0x8800_00FF), 0x8800_0000);
//!
//! assert_eq!(PlayerAction::from_str("grabMove"), Some(PlayerAction::GrabMove));
//! ```

use std::f32::consts::{FRAC_PI_2, PI};

/// Playfield width in world units
pub const FIELD_WIDTH: f32 = 800.0;

/// Playfield height in world units
pub const FIELD_HEIGHT: f32 = 800.0;

pub const MAX_EDGES: usize = 256;
pub const MAX_LIGHTS: usize = 32;
pub const MAX_SENSORS: usize = 128;
pub const MAX_SENSOR_GROUPS: usize = 32;
pub const MAX_ANIMATORS: usize = 64;
pub const MAX_POINTS: usize = 32;
pub const MAX_WAYPOINTS: usize = 8;
pub const MAX_INTERSECTIONS: usize = 512;
pub const MAX_TRIANGLES: usize = 512;

/// Angular offset (radians) of the two extra rays cast beside every corner ray
pub const JITTER_ANGLE: f32 = 0.001;

/// How far (world units) each edge is lengthened at both ends when intersected
pub const GHOST_EXTENT: f32 = 0.0001;

/// Mask applied to packed colors before accumulating or comparing (drops alpha)
pub const SENSOR_COLOR_MASK: u32 = 0xFFFF_FF00;

/// Keeps the player pointer this far away from the field border
pub const PLAYER_RADIUS: f32 = 16.0;

/// A light is in reach when its squared distance to the pointer is below this
pub const PLAYER_PICKUP_DIST_SQ: f32 = 512.0;

/// Seconds a picked-up light takes to snap onto the pointer
pub const PLAYER_LIGHT_RETRIEVE_SECS: f32 = 0.05;

/// Radians per second per world unit of horizontal pointer drag in rotate mode
pub const PLAYER_ROTATE_SPEED: f32 = 3.5;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const FRAME_MS: u32 = 16;

/// World units the keyboard cursor moves per step
pub const CURSOR_STEP: f32 = 10.0;

/// Delay before a held cursor key starts repeating (ms)
pub const CURSOR_DAS_MS: u32 = 120;

/// Interval between cursor repeats once repeating (ms)
pub const CURSOR_ARR_MS: u32 = 16;

/// Strip the alpha byte from a packed `0xRRGGBBAA` color.
#[inline]
pub const fn rgb_bits(color: u32) -> u32 {
    color & SENSOR_COLOR_MASK
}

/// Split a packed color into `(r, g, b, a)` bytes.
#[inline]
pub const fn channels(color: u32) -> (u8, u8, u8, u8) {
    (
        (color >> 24) as u8,
        (color >> 16) as u8,
        (color >> 8) as u8,
        color as u8,
    )
}

/// Parse `#RRGGBBAA`, `0xRRGGBBAA` or bare `RRGGBBAA`.
///
/// Six-digit forms (`#RRGGBB`) get an opaque alpha byte appended.
///
/// ```
/// use lit_types::parse_hex_color;
///
/// assert_eq!(parse_hex_color("0x008800FF"), Some(0x0088_00FF));
/// assert_eq!(parse_hex_color("#ff0000"), Some(0xFF00_00FF));
/// assert_eq!(parse_hex_color("red"), None);
/// ```
pub fn parse_hex_color(s: &str) -> Option<u32> {
    let s = s.trim();
    let digits = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let value = u32::from_str_radix(digits, 16).ok()?;
    match digits.len() {
        8 => Some(value),
        6 => Some((value << 8) | 0xFF),
        _ => None,
    }
}

/// Light categories, derived from the half-angle of the cone.
///
/// - **Point**: `half_angle >= PI`, shines everywhere, no shell rays
/// - **Directional**: `half_angle < PI/2`, a narrow beam
/// - **Wide**: everything in between; a beam wider than a half-plane whose two
///   boundary rays must never be joined behind the light
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    Point,
    Directional,
    Wide,
}

impl LightKind {
    pub fn classify(half_angle: f32) -> Self {
        if half_angle < FRAC_PI_2 {
            LightKind::Directional
        } else if half_angle < PI {
            LightKind::Wide
        } else {
            LightKind::Point
        }
    }

    /// Cone lights cull endpoints outside the cone and cast shell rays.
    pub fn is_cone(&self) -> bool {
        !matches!(self, LightKind::Point)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LightKind::Point => "point",
            LightKind::Directional => "directional",
            LightKind::Wide => "wide",
        }
    }
}

/// What the player's hands are doing with a light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HoldMode {
    #[default]
    None,
    /// The held light follows the pointer
    Move,
    /// Horizontal pointer drag turns the held light
    Rotate,
}

impl HoldMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldMode::None => "none",
            HoldMode::Move => "move",
            HoldMode::Rotate => "rotate",
        }
    }
}

/// Player actions produced by key mapping and scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Nudge the pointer one step left
    CursorLeft,
    /// Nudge the pointer one step right
    CursorRight,
    /// Nudge the pointer one step up
    CursorUp,
    /// Nudge the pointer one step down
    CursorDown,
    /// Pick up the nearest light to move it, or drop the held one
    GrabMove,
    /// Pick up the nearest light to rotate it, or drop the held one
    GrabRotate,
    /// Skip to the next level
    NextLevel,
    /// Go back to the previous level
    PrevLevel,
    /// Reload the current level
    Restart,
    /// Stop or resume animators
    Freeze,
}

impl PlayerAction {
    /// Parse action from string (for scripted input)
    ///
    /// # Examples
    ///
    /// ```
    /// use lit_types::PlayerAction;
    ///
    /// assert_eq!(PlayerAction::from_str("cursorLeft"), Some(PlayerAction::CursorLeft));
    /// assert_eq!(PlayerAction::from_str("GRABROTATE"), Some(PlayerAction::GrabRotate));
    /// assert_eq!(PlayerAction::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorleft" => Some(PlayerAction::CursorLeft),
            "cursorright" => Some(PlayerAction::CursorRight),
            "cursorup" => Some(PlayerAction::CursorUp),
            "cursordown" => Some(PlayerAction::CursorDown),
            "grabmove" => Some(PlayerAction::GrabMove),
            "grabrotate" => Some(PlayerAction::GrabRotate),
            "nextlevel" => Some(PlayerAction::NextLevel),
            "prevlevel" => Some(PlayerAction::PrevLevel),
            "restart" => Some(PlayerAction::Restart),
            "freeze" => Some(PlayerAction::Freeze),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerAction::CursorLeft => "cursorLeft",
            PlayerAction::CursorRight => "cursorRight",
            PlayerAction::CursorUp => "cursorUp",
            PlayerAction::CursorDown => "cursorDown",
            PlayerAction::GrabMove => "grabMove",
            PlayerAction::GrabRotate => "grabRotate",
            PlayerAction::NextLevel => "nextLevel",
            PlayerAction::PrevLevel => "prevLevel",
            PlayerAction::Restart => "restart",
            PlayerAction::Freeze => "freeze",
        }
    }
}

macro_rules! handle_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            pub index: u16,
            pub generation: u32,
        }

        impl $name {
            pub const fn new(index: u16, generation: u32) -> Self {
                Self { index, generation }
            }

            #[inline]
            pub const fn slot(&self) -> usize {
                self.index as usize
            }
        }
    };
}

handle_type!(
    /// Slot in the edge store, tagged with the level generation it belongs to.
    EdgeHandle
);
handle_type!(
    /// Stable reference to a light.
    LightHandle
);
handle_type!(
    /// Stable reference to a sensor.
    SensorHandle
);
handle_type!(
    /// Stable reference to an anchor point.
    PointHandle
);
handle_type!(
    /// Stable reference to a sensor group.
    SensorGroupId
);
handle_type!(
    /// Stable reference to an animator.
    AnimatorHandle
);
