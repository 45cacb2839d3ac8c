// core/mechanism.rs

// Mechanism geometry for visualization: turns elevator height, intake pivot and
// end effector orientation into 3D poses of each moving stage, plus the poses
// at which held game pieces are drawn.

use nalgebra::{Isometry3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::state::HeldObject;

/// Fixed dimensions of the elevator and its attachments (meters, degrees)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MechanismGeometry {
    /// Second stage travel as a fraction of carriage height
    pub second_stage_ratio: f64,
    /// Inner stage travel as a fraction of carriage height
    pub inner_stage_ratio: f64,
    /// Carriage position; z is added to the elevator height
    pub carriage_offset: Vector3<f64>,
    /// Intake arm pivot; x and y are absolute, z is above the carriage
    pub intake_offset: Vector3<f64>,
    /// Intake arm roll when the pivot reads zero
    pub intake_base_angle_deg: f64,
    /// End effector position; x and y are absolute, z is above the carriage
    pub effector_offset: Vector3<f64>,
    /// Where an unheld coral is drawn
    pub coral_rest: Vector3<f64>,
    /// Where an unheld algae is drawn
    pub algae_rest: Vector3<f64>,
}

impl Default for MechanismGeometry {
    fn default() -> Self {
        MechanismGeometry {
            second_stage_ratio: 0.32419,
            inner_stage_ratio: 0.67,
            carriage_offset: Vector3::new(0.0, 0.1, 0.18),
            intake_offset: Vector3::new(0.0, 0.2, 0.17),
            intake_base_angle_deg: -63.0,
            effector_offset: Vector3::new(0.15, 0.23, 0.07),
            coral_rest: Vector3::zeros(),
            algae_rest: Vector3::new(0.0, 0.3048, 0.0),
        }
    }
}

/// Poses of every moving stage for one cycle
#[derive(Debug, Clone, PartialEq)]
pub struct MechanismPoses {
    pub second_stage: Isometry3<f64>,
    pub inner_stage: Isometry3<f64>,
    pub carriage: Isometry3<f64>,
    pub intake_arm: Isometry3<f64>,
    pub end_effector: Isometry3<f64>,
}

impl MechanismPoses {
    /// Computes stage poses from live readings.
    ///
    /// `pivot_angle` must already be in radians; the configured base angle is
    /// converted from degrees before the two are summed.
    pub fn compute(
        geometry: &MechanismGeometry,
        height: f64,
        pivot_angle: f64,
        effector_rotation: UnitQuaternion<f64>,
    ) -> Self {
        let second_stage = Isometry3::translation(0.0, 0.0, height * geometry.second_stage_ratio);
        let inner_stage = Isometry3::translation(0.0, 0.0, height * geometry.inner_stage_ratio);

        let carriage_offset = &geometry.carriage_offset;
        let carriage = Isometry3::translation(
            carriage_offset.x,
            carriage_offset.y,
            height + carriage_offset.z,
        );
        let carriage_z = carriage.translation.vector.z;

        let arm_roll = geometry.intake_base_angle_deg.to_radians() + pivot_angle;
        let intake_arm = Isometry3::from_parts(
            Translation3::new(
                geometry.intake_offset.x,
                geometry.intake_offset.y,
                carriage_z + geometry.intake_offset.z,
            ),
            UnitQuaternion::from_euler_angles(arm_roll, 0.0, 0.0),
        );

        let end_effector = Isometry3::from_parts(
            Translation3::new(
                geometry.effector_offset.x,
                geometry.effector_offset.y,
                carriage_z + geometry.effector_offset.z,
            ),
            effector_rotation,
        );

        MechanismPoses {
            second_stage,
            inner_stage,
            carriage,
            intake_arm,
            end_effector,
        }
    }

    /// Poses in publication order: second stage, inner stage, carriage, intake arm, end effector
    pub fn to_vec(&self) -> Vec<Isometry3<f64>> {
        vec![
            self.second_stage,
            self.inner_stage,
            self.carriage,
            self.intake_arm,
            self.end_effector,
        ]
    }
}

/// Where each game piece is drawn this cycle
#[derive(Debug, Clone, PartialEq)]
pub struct HeldObjectPoses {
    pub coral: Isometry3<f64>,
    pub algae: Isometry3<f64>,
}

impl HeldObjectPoses {
    /// A held coral rides the end effector and a held algae rides the intake arm;
    /// anything not held sits at its resting pose.
    pub fn select(geometry: &MechanismGeometry, held: HeldObject, mechanism: &MechanismPoses) -> Self {
        let rest = |at: &Vector3<f64>| Isometry3::translation(at.x, at.y, at.z);

        let coral = if held.has_coral() {
            mechanism.end_effector
        } else {
            rest(&geometry.coral_rest)
        };
        let algae = if held.has_algae() {
            mechanism.intake_arm
        } else {
            rest(&geometry.algae_rest)
        };

        HeldObjectPoses { coral, algae }
    }
}
