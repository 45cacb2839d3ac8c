// core/superstructure.rs

// The coordinator. Owns the subsystems, derives held game pieces and mechanism
// poses every active cycle, and reconciles the driver station alliance with
// field-relative navigation every disabled cycle.

use log::{debug, info, warn};

use super::mechanism::{HeldObjectPoses, MechanismGeometry, MechanismPoses};
use super::state::{Alliance, HeldObject};
use crate::bindings::{ActionBindings, ActionFactory, BindingTarget, InputSource};
use crate::hardware::{
    AlgaeHandler, AllianceSource, CoralHandler, Drivetrain, Elevator, PneumaticsProvider,
    PressureSource, Subsystems,
};
use crate::telemetry::{self, TelemetrySink, TelemetryValue};
use crate::{SuperstructureConfig, SuperstructureError};

/// Everything the coordinator talks to, handed over once at startup
pub struct Collaborators {
    pub subsystems: Subsystems,
    pub alliance_source: Box<dyn AllianceSource>,
    pub pneumatics: Box<dyn PneumaticsProvider>,
    pub input: Box<dyn InputSource>,
    pub telemetry: Box<dyn TelemetrySink>,
}

pub struct Superstructure {
    drivetrain: Box<dyn Drivetrain>,
    elevator: Box<dyn Elevator>,
    coral: Box<dyn CoralHandler>,
    algae: Box<dyn AlgaeHandler>,
    pneumatics: Box<dyn PressureSource>,
    alliance_source: Box<dyn AllianceSource>,
    input: Box<dyn InputSource>,
    telemetry: Box<dyn TelemetrySink>,
    bindings: ActionBindings,
    geometry: MechanismGeometry,
    pressure_channel: u8,
    alliance: Alliance,
    held_object: HeldObject,
}

impl Superstructure {
    /// Brings the robot up. Create exactly one per process, before the control loop starts.
    ///
    /// Fails if the pneumatics module cannot be acquired, a subsystem fails to
    /// initialize, or the alliance cannot be read.
    pub fn new(config: &SuperstructureConfig, collaborators: Collaborators) -> Result<Self, SuperstructureError> {
        let Collaborators {
            subsystems,
            alliance_source,
            mut pneumatics,
            mut input,
            telemetry,
        } = collaborators;
        let Subsystems {
            mut drivetrain,
            mut elevator,
            mut coral,
            mut algae,
        } = subsystems;

        drivetrain.configure_alliance_flip(config.flip_season);
        let alliance = Alliance::resolve(alliance_source.current_alliance()?);

        input.configure_profiles(&config.driver_profiles);
        drivetrain.initialize()?;
        elevator.initialize()?;
        coral.initialize()?;
        algae.initialize()?;

        let pneumatics = pneumatics.acquire()?;

        drivetrain.reset_pose(config.origin);

        info!(
            "Superstructure ready: alliance {}, flip season {}, drivers {}/{}",
            alliance, config.flip_season, config.driver_profiles.primary, config.driver_profiles.secondary
        );

        Ok(Superstructure {
            drivetrain,
            elevator,
            coral,
            algae,
            pneumatics,
            alliance_source,
            input,
            telemetry,
            bindings: ActionBindings::new(),
            geometry: config.mechanism.clone(),
            pressure_channel: config.pressure_channel,
            alliance,
            held_object: HeldObject::None,
        })
    }

    /// Binds every driver control. Call once at startup.
    pub fn configure_actions(&mut self, factory: &dyn ActionFactory) {
        if !self.bindings.is_empty() {
            warn!("Driver controls were already bound; replacing {} bindings", self.bindings.len());
        }
        self.bindings = ActionBindings::standard(factory, self.input.as_ref());
        info!("Bound {} driver controls", self.bindings.len());
        debug!("Bound controls: {:?}", self.bindings.controls());
    }

    /// Samples the driver controls and runs whatever was just pressed.
    /// Returns how many bindings fired.
    pub fn poll_actions(&mut self) -> usize {
        let drivetrain = &mut self.drivetrain;
        let algae = &mut self.algae;
        self.bindings.poll(self.input.as_ref(), |_, target| match target {
            BindingTarget::ResetGyro => drivetrain.reset_gyro(),
            BindingTarget::SetAlgaePivot(state) => algae.set_pivot_state(*state),
            BindingTarget::Run(action) => action.execute(),
        })
    }

    /// Active cycle: classify held pieces and publish state and mechanism poses
    pub fn periodic(&mut self) {
        self.held_object = HeldObject::classify(self.coral.has_coral(), self.algae.has_algae());
        let pressure = self.pneumatics.pressure(self.pressure_channel);

        self.telemetry.record(
            telemetry::KEY_CURRENT_PIECE,
            TelemetryValue::Text(self.held_object.to_string()),
        );
        self.telemetry
            .record(telemetry::KEY_ALLIANCE, TelemetryValue::Text(self.alliance.to_string()));
        self.telemetry.record(telemetry::KEY_PRESSURE, pressure.into());

        let mechanism = MechanismPoses::compute(
            &self.geometry,
            self.elevator.current_height(),
            self.algae.current_pivot_angle(),
            self.coral.current_angle(),
        );
        let pieces = HeldObjectPoses::select(&self.geometry, self.held_object, &mechanism);

        self.telemetry.record(telemetry::KEY_MECHANISM, mechanism.to_vec().into());
        self.telemetry.record(telemetry::KEY_CORAL_POSE, pieces.coral.into());
        self.telemetry.record(telemetry::KEY_ALGAE_POSE, pieces.algae.into());
    }

    /// Disabled cycle: commit the driver station alliance, flipping navigation
    /// when it differs from the previously committed one.
    pub fn disabled_periodic(&mut self) -> Result<(), SuperstructureError> {
        let reported = Alliance::resolve(self.alliance_source.current_alliance()?);
        let previous = self.alliance;

        self.alliance = reported;

        // Compares against the value committed last cycle, not the one just stored.
        if reported != previous {
            info!("Alliance changed {} -> {}, flipping navigation", previous, reported);
            self.drivetrain.switch_alliances();
        }
        Ok(())
    }

    /// Live pneumatic pressure (PSI)
    pub fn current_pressure(&self) -> f64 {
        self.pneumatics.pressure(self.pressure_channel)
    }

    /// Classification from the latest active cycle
    pub fn current_held_object(&self) -> HeldObject {
        self.held_object
    }

    pub fn current_alliance(&self) -> Alliance {
        self.alliance
    }
}
