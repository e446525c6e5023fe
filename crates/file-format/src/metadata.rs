use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance stored alongside the reachability data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Human-readable robot name.
    pub robot_name: String,
    /// Structure hash of the robot's kinematic description.
    pub robot_hash: String,
    /// Manipulator the data was computed for.
    pub manipulator: String,
    /// Max radius used for the spatial grid (meters).
    pub max_radius: f64,
    /// When the data was generated.
    pub created: DateTime<Utc>,
    /// Wall-clock generation time in seconds.
    pub generation_seconds: f64,
}

impl CacheMetadata {
    /// Metadata stamped with the current time.
    pub fn new(
        robot_name: impl Into<String>,
        robot_hash: impl Into<String>,
        manipulator: impl Into<String>,
        max_radius: f64,
        generation_seconds: f64,
    ) -> Self {
        Self {
            robot_name: robot_name.into(),
            robot_hash: robot_hash.into(),
            manipulator: manipulator.into(),
            max_radius,
            created: Utc::now(),
            generation_seconds,
        }
    }
}
