// core/mod.rs

// Declares the superstructure's derived state, mechanism geometry and the
// coordinator that ties them to the hardware and telemetry collaborators.

pub mod mechanism;
pub mod state;
pub mod superstructure;

pub use mechanism::{HeldObjectPoses, MechanismGeometry, MechanismPoses};
pub use state::{Alliance, HeldObject};
pub use superstructure::{Collaborators, Superstructure};
