//! Telemetry output for the superstructure
//!
//! Records are named key/value pairs handed to a [`TelemetrySink`]. The key
//! names below are consumed by dashboards and log replay tools and must stay
//! stable.

mod sink;

use nalgebra::Isometry3;
use serde::{Deserialize, Serialize};

pub use sink::*;

/// Held game piece classification
pub const KEY_CURRENT_PIECE: &str = "SuperStructure/CurrentPiece";
/// Committed alliance
pub const KEY_ALLIANCE: &str = "SuperStructure/Alliance";
/// Pneumatic pressure (PSI)
pub const KEY_PRESSURE: &str = "SuperStructure/Pressure";
/// Five stage poses, in publication order
pub const KEY_MECHANISM: &str = "Mechanism";
/// Coral visualization pose
pub const KEY_CORAL_POSE: &str = "CoralGP";
/// Algae visualization pose
pub const KEY_ALGAE_POSE: &str = "AlgaeGP";

/// A single telemetry value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TelemetryValue {
    /// Enumerations and labels
    Text(String),
    /// Scalar measurement
    Number(f64),
    /// One 3D pose
    Pose(Isometry3<f64>),
    /// Several 3D poses published together
    Poses(Vec<Isometry3<f64>>),
}

impl From<f64> for TelemetryValue {
    fn from(value: f64) -> Self {
        TelemetryValue::Number(value)
    }
}

impl From<Isometry3<f64>> for TelemetryValue {
    fn from(pose: Isometry3<f64>) -> Self {
        TelemetryValue::Pose(pose)
    }
}

impl From<Vec<Isometry3<f64>>> for TelemetryValue {
    fn from(poses: Vec<Isometry3<f64>>) -> Self {
        TelemetryValue::Poses(poses)
    }
}

/// Destination for telemetry records
pub trait TelemetrySink {
    /// Stores or forwards one record; a later record under the same key supersedes it
    fn record(&mut self, key: &str, value: TelemetryValue);
}
