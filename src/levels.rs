//! Built-in levels, compiled into the binaries.

use crate::core::{Result, SceneDesc};

/// `(file name, JSON)` in play order.
pub const BUILTIN: &[(&str, &str)] = &[
    ("01_move", include_str!("../levels/01_move.json")),
    ("02_obstruct", include_str!("../levels/02_obstruct.json")),
    ("03_add", include_str!("../levels/03_add.json")),
    ("04_corners", include_str!("../levels/04_corners.json")),
    ("05_mix", include_str!("../levels/05_mix.json")),
    ("06_blend", include_str!("../levels/06_blend.json")),
    ("07_rooms", include_str!("../levels/07_rooms.json")),
    ("08_onion", include_str!("../levels/08_onion.json")),
    ("09_drift", include_str!("../levels/09_drift.json")),
];

pub fn count() -> usize {
    BUILTIN.len()
}

/// Parse built-in level `index`, wrapping around the set.
pub fn builtin(index: usize) -> Result<SceneDesc> {
    let (_, json) = BUILTIN[index % BUILTIN.len()];
    SceneDesc::from_json(json)
}

/// Find a built-in level by file name (`"03_add"`) or title (`"ADD"`).
pub fn find(name: &str) -> Option<usize> {
    BUILTIN.iter().position(|(file, json)| {
        file.eq_ignore_ascii_case(name)
            || SceneDesc::from_json(json).is_ok_and(|scene| scene.title.eq_ignore_ascii_case(name))
    })
}
