/// Errors raised while building or running a level.
///
/// Degenerate geometry is never an error; it simply produces no hit.
#[derive(Debug, thiserror::Error)]
pub enum LitError {
    /// A bounded store or per-light buffer is full.
    #[error("{what} capacity exceeded (max {capacity})")]
    CapacityExceeded { what: &'static str, capacity: usize },

    /// A handle from an earlier level, or one that points past the store.
    #[error("stale or invalid {what} handle")]
    StaleHandle { what: &'static str },

    /// `push_patrol_waypoint` / `end_patrolling_sensor` without a begun patrol.
    #[error("no patrolling sensor is being built")]
    NoOpenPatrol,

    /// `begin_patrolling_sensor` while another patrol is still open.
    #[error("a patrolling sensor is already being built")]
    PatrolAlreadyOpen,

    /// A patrol animator needs at least one waypoint to walk.
    #[error("patrol has no waypoints")]
    PatrolWithoutWaypoints,

    /// A level description refers to an anchor point it never declared.
    #[error("unknown anchor point #{index}")]
    UnknownAnchor { index: usize },

    /// Malformed level description.
    #[error("level description error: {0}")]
    Scene(#[from] serde_json::Error),
}

impl LitError {
    pub(crate) fn full(what: &'static str, capacity: usize) -> Self {
        log::warn!("{what} capacity exceeded (max {capacity})");
        LitError::CapacityExceeded { what, capacity }
    }

    pub(crate) fn stale(what: &'static str) -> Self {
        LitError::StaleHandle { what }
    }
}

pub type Result<T> = std::result::Result<T, LitError>;
