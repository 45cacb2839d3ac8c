//! Superstructure - robot state aggregation and alliance coordination
//!
//! This library provides the coordinator that sits above a competition robot's
//! subsystems. Once per control cycle it derives what the robot is holding,
//! publishes mechanism geometry and pneumatic pressure as telemetry, and while
//! disabled keeps field-relative navigation in step with the assigned alliance.

#![warn(unused_extern_crates)]

pub mod bindings;
pub mod core;
pub mod hardware;
pub mod sim;
pub mod telemetry;

// Re-export commonly used items for easier access
pub use bindings::{Action, ActionBindings, ActionFactory, Control, DriverProfiles, InputSource};
pub use crate::core::{Alliance, Collaborators, HeldObject, MechanismGeometry, Superstructure};
pub use hardware::{FieldPose, HardwareError, Subsystems};
pub use telemetry::{MemorySink, TelemetrySink, TelemetryValue};

/// Main configuration structure for the superstructure
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SuperstructureConfig {
    /// Season whose field layout is used for alliance flipping
    pub flip_season: u16,
    /// Pneumatics analog channel wired to the pressure transducer
    pub pressure_channel: u8,
    /// Odometry pose applied at startup
    pub origin: FieldPose,
    /// Driver button layouts
    pub driver_profiles: DriverProfiles,
    /// Mechanism dimensions for visualization
    pub mechanism: MechanismGeometry,
    /// Control loop settings for the simulation binary
    pub run: RunConfig,
}

/// Control loop settings
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Period of one control cycle
    pub cycle_period_ms: u64,
    /// Disabled cycles run before enabling
    pub disabled_cycles: u32,
    /// Active cycles run after enabling
    pub active_cycles: u32,
}

impl Default for SuperstructureConfig {
    fn default() -> Self {
        SuperstructureConfig {
            flip_season: 2025,
            pressure_channel: 0,
            origin: FieldPose::ORIGIN,
            driver_profiles: DriverProfiles::default(),
            mechanism: MechanismGeometry::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            cycle_period_ms: 20,
            disabled_cycles: 50,
            active_cycles: 150,
        }
    }
}

impl SuperstructureConfig {
    /// Loads a configuration from a YAML file; missing fields take their defaults
    pub fn from_yaml_file(path: &str) -> Result<Self, SuperstructureError> {
        let config_file = std::fs::File::open(path)
            .map_err(|e| SuperstructureError::ConfigError(format!("{}: {}", path, e)))?;
        let config: SuperstructureConfig = serde_yaml::from_reader(config_file)?;
        Ok(config)
    }

    /// Parses a configuration from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self, SuperstructureError> {
        Ok(serde_yaml::from_str(text)?)
    }
}

/// Superstructure error types
#[derive(Debug)]
pub enum SuperstructureError {
    /// Hardware could not be brought up or read
    Hardware(HardwareError),
    /// Configuration error
    ConfigError(String),
}

impl std::fmt::Display for SuperstructureError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            SuperstructureError::Hardware(err) => write!(f, "Hardware error: {}", err),
            SuperstructureError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for SuperstructureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SuperstructureError::Hardware(err) => Some(err),
            SuperstructureError::ConfigError(_) => None,
        }
    }
}

impl From<HardwareError> for SuperstructureError {
    fn from(err: HardwareError) -> Self {
        SuperstructureError::Hardware(err)
    }
}

impl From<serde_yaml::Error> for SuperstructureError {
    fn from(err: serde_yaml::Error) -> Self {
        SuperstructureError::ConfigError(err.to_string())
    }
}
