//! Operator control bindings
//!
//! Pairs each logical driver control with what it does when pressed:
//! - Direct subsystem calls (gyro reset, algae pivot presets)
//! - Composite actions built by an external [`ActionFactory`]
//!
//! Every binding is edge-triggered through an [`EdgeTrigger`].

mod trigger;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::hardware::AlgaePivotState;

pub use trigger::EdgeTrigger;

/// Logical controls on the driver and operator gamepads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Control {
    ResetGyro,
    PositionL4,
    PositionL3,
    PositionL2,
    PositionTrough,
    PositionBarge,
    PositionProcessor,
    Source,
    PositionStore,
}

impl Control {
    /// Every control, in binding order
    pub const ALL: [Control; 9] = [
        Control::ResetGyro,
        Control::PositionL4,
        Control::PositionL3,
        Control::PositionL2,
        Control::PositionTrough,
        Control::PositionBarge,
        Control::PositionProcessor,
        Control::Source,
        Control::PositionStore,
    ];
}

/// Button layouts selected for the two drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverProfiles {
    /// Primary driver (drivetrain) layout name
    pub primary: String,
    /// Secondary driver (mechanism) layout name
    pub secondary: String,
}

impl Default for DriverProfiles {
    fn default() -> Self {
        DriverProfiles {
            primary: "Leo".to_string(),
            secondary: "KnollController".to_string(),
        }
    }
}

/// Gamepad input, already mapped through the driver profiles
#[cfg_attr(test, mockall::automock)]
pub trait InputSource {
    /// Selects the button layouts; called once at startup
    fn configure_profiles(&mut self, profiles: &DriverProfiles);
    /// Level of the button mapped to `control` (true while held)
    fn button_value(&self, control: Control) -> bool;
}

/// A prebuilt robot action that can be started
pub trait Action {
    fn name(&self) -> &str;
    /// Starts the action; called once per press
    fn execute(&mut self);
}

/// Builds the composite scoring and intake actions
#[cfg_attr(test, mockall::automock)]
pub trait ActionFactory {
    fn position_l2(&self) -> Box<dyn Action>;
    fn position_trough(&self) -> Box<dyn Action>;
    fn position_barge(&self) -> Box<dyn Action>;
    fn processor(&self) -> Box<dyn Action>;
    fn source(&self) -> Box<dyn Action>;
    fn store_coral(&self) -> Box<dyn Action>;
}

/// What a binding does when its control is pressed
pub enum BindingTarget {
    ResetGyro,
    SetAlgaePivot(AlgaePivotState),
    Run(Box<dyn Action>),
}

impl std::fmt::Debug for BindingTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            BindingTarget::ResetGyro => write!(f, "ResetGyro"),
            BindingTarget::SetAlgaePivot(state) => write!(f, "SetAlgaePivot({:?})", state),
            BindingTarget::Run(action) => write!(f, "Run({})", action.name()),
        }
    }
}

struct Binding {
    control: Control,
    trigger: EdgeTrigger,
    target: BindingTarget,
}

/// Control-to-target table polled once per cycle
#[derive(Default)]
pub struct ActionBindings {
    bindings: Vec<Binding>,
}

impl ActionBindings {
    pub fn new() -> Self {
        ActionBindings::default()
    }

    /// The competition layout. Triggers start from the current level of `input`.
    pub fn standard(factory: &dyn ActionFactory, input: &dyn InputSource) -> Self {
        let mut bindings = ActionBindings::new();
        bindings
            .bind(input, Control::ResetGyro, BindingTarget::ResetGyro)
            .bind(input, Control::PositionL4, BindingTarget::SetAlgaePivot(AlgaePivotState::Processor))
            .bind(input, Control::PositionL3, BindingTarget::SetAlgaePivot(AlgaePivotState::Stored))
            .bind(input, Control::PositionL2, BindingTarget::Run(factory.position_l2()))
            .bind(input, Control::PositionTrough, BindingTarget::Run(factory.position_trough()))
            .bind(input, Control::PositionBarge, BindingTarget::Run(factory.position_barge()))
            .bind(input, Control::PositionProcessor, BindingTarget::Run(factory.processor()))
            .bind(input, Control::Source, BindingTarget::Run(factory.source()))
            .bind(input, Control::PositionStore, BindingTarget::Run(factory.store_coral()));
        bindings
    }

    /// Adds a binding whose trigger is seeded with the control's current level
    pub fn bind(&mut self, input: &dyn InputSource, control: Control, target: BindingTarget) -> &mut Self {
        self.bindings.push(Binding {
            control,
            trigger: EdgeTrigger::new(input.button_value(control)),
            target,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Controls in binding order
    pub fn controls(&self) -> Vec<Control> {
        self.bindings.iter().map(|binding| binding.control).collect()
    }

    /// Samples every bound control and hands newly pressed targets to `dispatch`.
    /// Returns how many bindings fired.
    pub fn poll<F>(&mut self, input: &dyn InputSource, mut dispatch: F) -> usize
    where
        F: FnMut(Control, &mut BindingTarget),
    {
        let mut fired = 0;
        for binding in &mut self.bindings {
            if binding.trigger.update(input.button_value(binding.control)) {
                debug!("{:?} pressed -> {:?}", binding.control, binding.target);
                dispatch(binding.control, &mut binding.target);
                fired += 1;
            }
        }
        fired
    }
}
