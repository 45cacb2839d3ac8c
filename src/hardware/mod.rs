//! Hardware collaborators for the superstructure
//!
//! This module defines the contracts the coordinator consumes from the robot's
//! physical subsystems:
//! - Drivetrain (gyro, field pose, alliance flipping)
//! - Elevator, coral handler and algae handler (mechanism readings)
//! - Pneumatics control module (pressure)
//! - Driver station alliance reporting
//!
//! Implementations live outside this crate (or in [`crate::sim`]).

use nalgebra::UnitQuaternion;
use serde::{Deserialize, Serialize};

use crate::core::Alliance;

/// Field-relative 2D pose used to reset odometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPose {
    /// X position (meters)
    pub x: f64,
    /// Y position (meters)
    pub y: f64,
    /// Heading (radians)
    pub heading: f64,
}

impl FieldPose {
    /// Field origin facing downfield
    pub const ORIGIN: FieldPose = FieldPose { x: 0.0, y: 0.0, heading: 0.0 };
}

impl Default for FieldPose {
    fn default() -> Self {
        FieldPose::ORIGIN
    }
}

/// Named pivot presets for the algae intake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlgaePivotState {
    /// Tucked inside the frame perimeter
    Stored,
    /// Angled for scoring into the processor
    Processor,
    /// Deployed for ground pickup
    Intake,
}

/// Swerve drivetrain
#[cfg_attr(test, mockall::automock)]
pub trait Drivetrain {
    /// Brings the subsystem up; calling it again must be harmless
    fn initialize(&mut self) -> Result<(), HardwareError>;
    /// Zeroes the gyro heading
    fn reset_gyro(&mut self);
    /// Resets odometry to the given field pose
    fn reset_pose(&mut self, pose: FieldPose);
    /// Mirrors field-relative navigation onto the other alliance side
    fn switch_alliances(&mut self);
    /// Selects the season-specific field layout used when flipping
    fn configure_alliance_flip(&mut self, season: u16);
}

/// Elevator carrying the carriage
#[cfg_attr(test, mockall::automock)]
pub trait Elevator {
    fn initialize(&mut self) -> Result<(), HardwareError>;
    /// Current carriage height above the hard stop (meters)
    fn current_height(&self) -> f64;
}

/// Coral end effector
#[cfg_attr(test, mockall::automock)]
pub trait CoralHandler {
    fn initialize(&mut self) -> Result<(), HardwareError>;
    fn has_coral(&self) -> bool;
    /// Live orientation of the end effector
    fn current_angle(&self) -> UnitQuaternion<f64>;
}

/// Algae intake arm
#[cfg_attr(test, mockall::automock)]
pub trait AlgaeHandler {
    fn initialize(&mut self) -> Result<(), HardwareError>;
    fn has_algae(&self) -> bool;
    /// Pivot angle relative to the stored position, in radians
    fn current_pivot_angle(&self) -> f64;
    fn set_pivot_state(&mut self, state: AlgaePivotState);
}

/// Pressure readings from an acquired pneumatics module
#[cfg_attr(test, mockall::automock)]
pub trait PressureSource {
    /// Analog pressure on `channel` (PSI)
    fn pressure(&self, channel: u8) -> f64;
}

/// Hands out exclusive access to the pneumatics module
#[cfg_attr(test, mockall::automock)]
pub trait PneumaticsProvider {
    fn acquire(&mut self) -> Result<Box<dyn PressureSource>, HardwareError>;
}

/// Driver station alliance reporting
#[cfg_attr(test, mockall::automock)]
pub trait AllianceSource {
    /// `Ok(None)` while the field has not assigned an alliance yet
    fn current_alliance(&self) -> Result<Option<Alliance>, HardwareError>;
}

/// The four mechanism subsystems owned by the coordinator
pub struct Subsystems {
    pub drivetrain: Box<dyn Drivetrain>,
    pub elevator: Box<dyn Elevator>,
    pub coral: Box<dyn CoralHandler>,
    pub algae: Box<dyn AlgaeHandler>,
}

/// Hardware error types
#[derive(Debug, Clone, PartialEq)]
pub enum HardwareError {
    /// Pneumatics module could not be opened
    PneumaticsUnavailable(String),
    /// Driver station alliance could not be read
    AllianceSource(String),
    /// A subsystem failed to come up
    SubsystemInit {
        /// Subsystem name
        subsystem: &'static str,
        /// Reported cause
        reason: String,
    },
}

impl std::fmt::Display for HardwareError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            HardwareError::PneumaticsUnavailable(msg) => write!(f, "Pneumatics unavailable: {}", msg),
            HardwareError::AllianceSource(msg) => write!(f, "Alliance source error: {}", msg),
            HardwareError::SubsystemInit { subsystem, reason } => {
                write!(f, "{} failed to initialize: {}", subsystem, reason)
            }
        }
    }
}

impl std::error::Error for HardwareError {}
