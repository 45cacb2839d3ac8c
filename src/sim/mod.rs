//! In-memory robot for running the superstructure off the field
//!
//! Every collaborator trait is implemented over one shared [`SimRobot`] so a
//! driver loop (or a test) can script sensor readings and inspect what the
//! coordinator asked the hardware to do.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, info};
use nalgebra::UnitQuaternion;

use crate::bindings::{Action, ActionFactory, Control, DriverProfiles, InputSource};
use crate::core::{Alliance, Collaborators};
use crate::hardware::{
    AlgaeHandler, AlgaePivotState, AllianceSource, CoralHandler, Drivetrain, Elevator, FieldPose,
    HardwareError, PneumaticsProvider, PressureSource, Subsystems,
};
use crate::telemetry::TelemetrySink;

/// Elevator travel speed (m/s)
const ELEVATOR_SPEED: f64 = 1.5;

/// Simulated robot state
#[derive(Debug, Clone)]
pub struct SimRobot {
    // Sensor readings
    pub height: f64,
    pub elevator_target: f64,
    pub has_coral: bool,
    pub has_algae: bool,
    pub pivot_angle: f64,
    pub effector_angle: UnitQuaternion<f64>,
    pub pressure: f64,
    pub alliance: Option<Alliance>,
    pub pressed: HashSet<Control>,
    pub pneumatics_present: bool,
    /// Subsystem that reports a fault when initialized
    pub faulted: Option<&'static str>,

    // What the coordinator did
    pub initialized: HashSet<&'static str>,
    pub pose: FieldPose,
    pub flip_season: Option<u16>,
    pub alliance_flips: u32,
    pub gyro_resets: u32,
    pub algae_pivot: AlgaePivotState,
    pub profiles: Option<DriverProfiles>,
    pub actions_run: Vec<String>,
}

impl Default for SimRobot {
    fn default() -> Self {
        SimRobot {
            height: 0.0,
            elevator_target: 0.0,
            has_coral: false,
            has_algae: false,
            pivot_angle: 0.0,
            effector_angle: UnitQuaternion::identity(),
            pressure: 110.0,
            alliance: None,
            pressed: HashSet::new(),
            pneumatics_present: true,
            faulted: None,
            initialized: HashSet::new(),
            pose: FieldPose::ORIGIN,
            flip_season: None,
            alliance_flips: 0,
            gyro_resets: 0,
            algae_pivot: AlgaePivotState::Stored,
            profiles: None,
            actions_run: Vec::new(),
        }
    }
}

impl SimRobot {
    /// Advances the elevator toward its target
    pub fn step(&mut self, dt: Duration) {
        let max_travel = ELEVATOR_SPEED * dt.as_secs_f64();
        let error = self.elevator_target - self.height;
        self.height += error.clamp(-max_travel, max_travel);
    }
}

/// Shared handle to a [`SimRobot`]
#[derive(Debug, Clone, Default)]
pub struct SimHandle {
    robot: Arc<Mutex<SimRobot>>,
}

impl SimHandle {
    pub fn new() -> Self {
        SimHandle::default()
    }

    fn lock(&self) -> MutexGuard<'_, SimRobot> {
        self.robot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Mutates the simulated robot
    pub fn update<R>(&self, f: impl FnOnce(&mut SimRobot) -> R) -> R {
        f(&mut self.lock())
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> SimRobot {
        self.lock().clone()
    }

    pub fn step(&self, dt: Duration) {
        self.lock().step(dt);
    }

    fn initialize(&self, subsystem: &'static str) -> Result<(), HardwareError> {
        self.update(|robot| {
            if robot.faulted == Some(subsystem) {
                return Err(HardwareError::SubsystemInit {
                    subsystem,
                    reason: "motor controller not responding".to_string(),
                });
            }
            robot.initialized.insert(subsystem);
            Ok(())
        })
    }

    /// Collaborators backed by this robot, publishing to `telemetry`
    pub fn collaborators(&self, telemetry: impl TelemetrySink + 'static) -> Collaborators {
        Collaborators {
            subsystems: Subsystems {
                drivetrain: Box::new(SimDrivetrain(self.clone())),
                elevator: Box::new(SimElevator(self.clone())),
                coral: Box::new(SimCoral(self.clone())),
                algae: Box::new(SimAlgae(self.clone())),
            },
            alliance_source: Box::new(SimDriverStation(self.clone())),
            pneumatics: Box::new(SimPneumatics(self.clone())),
            input: Box::new(SimInput(self.clone())),
            telemetry: Box::new(telemetry),
        }
    }
}

pub struct SimDrivetrain(SimHandle);

impl Drivetrain for SimDrivetrain {
    fn initialize(&mut self) -> Result<(), HardwareError> {
        self.0.initialize("drivetrain")
    }

    fn reset_gyro(&mut self) {
        self.0.update(|robot| {
            robot.gyro_resets += 1;
            robot.pose.heading = 0.0;
        });
    }

    fn reset_pose(&mut self, pose: FieldPose) {
        self.0.update(|robot| robot.pose = pose);
    }

    fn switch_alliances(&mut self) {
        self.0.update(|robot| robot.alliance_flips += 1);
    }

    fn configure_alliance_flip(&mut self, season: u16) {
        self.0.update(|robot| robot.flip_season = Some(season));
    }
}

pub struct SimElevator(SimHandle);

impl Elevator for SimElevator {
    fn initialize(&mut self) -> Result<(), HardwareError> {
        self.0.initialize("elevator")
    }

    fn current_height(&self) -> f64 {
        self.0.update(|robot| robot.height)
    }
}

pub struct SimCoral(SimHandle);

impl CoralHandler for SimCoral {
    fn initialize(&mut self) -> Result<(), HardwareError> {
        self.0.initialize("coral")
    }

    fn has_coral(&self) -> bool {
        self.0.update(|robot| robot.has_coral)
    }

    fn current_angle(&self) -> UnitQuaternion<f64> {
        self.0.update(|robot| robot.effector_angle)
    }
}

pub struct SimAlgae(SimHandle);

impl AlgaeHandler for SimAlgae {
    fn initialize(&mut self) -> Result<(), HardwareError> {
        self.0.initialize("algae")
    }

    fn has_algae(&self) -> bool {
        self.0.update(|robot| robot.has_algae)
    }

    fn current_pivot_angle(&self) -> f64 {
        self.0.update(|robot| robot.pivot_angle)
    }

    fn set_pivot_state(&mut self, state: AlgaePivotState) {
        self.0.update(|robot| {
            robot.algae_pivot = state;
            robot.pivot_angle = match state {
                AlgaePivotState::Stored => 0.0,
                AlgaePivotState::Processor => 0.6,
                AlgaePivotState::Intake => 1.1,
            };
        });
    }
}

pub struct SimPneumatics(SimHandle);

impl PneumaticsProvider for SimPneumatics {
    fn acquire(&mut self) -> Result<Box<dyn PressureSource>, HardwareError> {
        if !self.0.update(|robot| robot.pneumatics_present) {
            return Err(HardwareError::PneumaticsUnavailable(
                "no pneumatics module on the bus".to_string(),
            ));
        }
        Ok(Box::new(SimPressure(self.0.clone())))
    }
}

pub struct SimPressure(SimHandle);

impl PressureSource for SimPressure {
    fn pressure(&self, _channel: u8) -> f64 {
        self.0.update(|robot| robot.pressure)
    }
}

pub struct SimDriverStation(SimHandle);

impl AllianceSource for SimDriverStation {
    fn current_alliance(&self) -> Result<Option<Alliance>, HardwareError> {
        Ok(self.0.update(|robot| robot.alliance))
    }
}

pub struct SimInput(SimHandle);

impl InputSource for SimInput {
    fn configure_profiles(&mut self, profiles: &DriverProfiles) {
        info!("Driver profiles: {} / {}", profiles.primary, profiles.secondary);
        self.0.update(|robot| robot.profiles = Some(profiles.clone()));
    }

    fn button_value(&self, control: Control) -> bool {
        self.0.update(|robot| robot.pressed.contains(&control))
    }
}

/// Preset action that moves the simulated mechanism
pub struct SimAction {
    name: &'static str,
    height: f64,
    pickup: Option<bool>,
    robot: SimHandle,
}

impl Action for SimAction {
    fn name(&self) -> &str {
        self.name
    }

    fn execute(&mut self) {
        debug!("Running {}", self.name);
        self.robot.update(|robot| {
            robot.elevator_target = self.height;
            if let Some(has_coral) = self.pickup {
                robot.has_coral = has_coral;
            }
            robot.actions_run.push(self.name.to_string());
        });
    }
}

/// Builds [`SimAction`]s for each scoring and intake preset
pub struct SimActionFactory {
    robot: SimHandle,
}

impl SimActionFactory {
    pub fn new(robot: SimHandle) -> Self {
        SimActionFactory { robot }
    }

    fn preset(&self, name: &'static str, height: f64, pickup: Option<bool>) -> Box<dyn Action> {
        Box::new(SimAction {
            name,
            height,
            pickup,
            robot: self.robot.clone(),
        })
    }
}

impl ActionFactory for SimActionFactory {
    fn position_l2(&self) -> Box<dyn Action> {
        self.preset("PositionL2", 0.42, Some(false))
    }

    fn position_trough(&self) -> Box<dyn Action> {
        self.preset("PositionTrough", 0.12, Some(false))
    }

    fn position_barge(&self) -> Box<dyn Action> {
        self.preset("PositionBarge", 1.35, None)
    }

    fn processor(&self) -> Box<dyn Action> {
        self.preset("Processor", 0.0, None)
    }

    fn source(&self) -> Box<dyn Action> {
        self.preset("Source", 0.05, Some(true))
    }

    fn store_coral(&self) -> Box<dyn Action> {
        self.preset("StoreCoral", 0.0, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevator_moves_at_limited_speed() {
        let mut robot = SimRobot {
            elevator_target: 1.0,
            ..SimRobot::default()
        };
        robot.step(Duration::from_millis(100));
        assert!((robot.height - 0.15).abs() < 1e-9);

        for _ in 0..20 {
            robot.step(Duration::from_millis(100));
        }
        assert!((robot.height - 1.0).abs() < 1e-9);
    }

    #[test]
    fn repeated_init_is_harmless() {
        let handle = SimHandle::new();
        let mut drivetrain = SimDrivetrain(handle.clone());
        assert!(drivetrain.initialize().is_ok());
        assert!(drivetrain.initialize().is_ok());

        let robot = handle.snapshot();
        assert_eq!(robot.initialized.len(), 1);
        assert!(robot.initialized.contains("drivetrain"));
    }

    #[test]
    fn missing_pneumatics_module() {
        let handle = SimHandle::new();
        handle.update(|robot| robot.pneumatics_present = false);
        let mut pneumatics = SimPneumatics(handle);
        assert!(matches!(pneumatics.acquire(), Err(HardwareError::PneumaticsUnavailable(_))));
    }

    #[test]
    fn source_action_picks_up_coral() {
        let handle = SimHandle::new();
        let factory = SimActionFactory::new(handle.clone());
        factory.source().execute();

        let robot = handle.snapshot();
        assert!(robot.has_coral);
        assert_eq!(robot.actions_run, vec!["Source".to_string()]);
        assert!((robot.elevator_target - 0.05).abs() < 1e-9);
    }
}
