use nalgebra::Isometry3;
use rstest::rstest;
use superstructure::{
    Alliance, Control, HeldObject, MemorySink, Superstructure, SuperstructureConfig,
    SuperstructureError, TelemetryValue,
    hardware::HardwareError,
    sim::{SimActionFactory, SimHandle},
    telemetry,
};

fn start(sim: &SimHandle) -> (Superstructure, MemorySink) {
    let sink = MemorySink::new();
    let robot = Superstructure::new(&SuperstructureConfig::default(), sim.collaborators(sink.clone()))
        .expect("simulated robot starts");
    (robot, sink)
}

#[test]
fn startup_runs_one_time_setup() {
    let sim = SimHandle::new();
    sim.update(|state| state.pose.x = 4.2);
    let (robot, _) = start(&sim);

    let state = sim.snapshot();
    assert_eq!(state.flip_season, Some(2025));
    assert_eq!(state.pose.x, 0.0);
    assert_eq!(state.initialized.len(), 4);
    assert_eq!(state.profiles.map(|p| p.primary), Some("Leo".to_string()));
    assert_eq!(state.alliance_flips, 0);
    assert_eq!(robot.current_alliance(), Alliance::Blue);
}

#[test]
fn startup_fails_without_pneumatics() {
    let sim = SimHandle::new();
    sim.update(|state| state.pneumatics_present = false);

    let result = Superstructure::new(&SuperstructureConfig::default(), sim.collaborators(MemorySink::new()));
    assert!(matches!(
        result,
        Err(SuperstructureError::Hardware(HardwareError::PneumaticsUnavailable(_)))
    ));
}

#[test]
fn startup_fails_on_subsystem_fault() {
    let sim = SimHandle::new();
    sim.update(|state| {
        state.faulted = Some("elevator");
        state.pose.x = 4.2;
    });

    let result = Superstructure::new(&SuperstructureConfig::default(), sim.collaborators(MemorySink::new()));
    match result {
        Err(SuperstructureError::Hardware(HardwareError::SubsystemInit { subsystem, .. })) => {
            assert_eq!(subsystem, "elevator")
        }
        _ => panic!("expected elevator init failure"),
    }
    let state = sim.snapshot();
    assert!(state.initialized.contains("drivetrain"));
    assert!(!state.initialized.contains("coral"));
    assert_eq!(state.pose.x, 4.2);
}

#[rstest]
#[case(false, false, HeldObject::None)]
#[case(true, false, HeldObject::Coral)]
#[case(false, true, HeldObject::Algae)]
#[case(true, true, HeldObject::Both)]
fn periodic_classifies_held_pieces(#[case] coral: bool, #[case] algae: bool, #[case] expected: HeldObject) {
    let sim = SimHandle::new();
    sim.update(|state| {
        state.has_coral = coral;
        state.has_algae = algae;
    });
    let (mut robot, sink) = start(&sim);

    robot.periodic();

    assert_eq!(robot.current_held_object(), expected);
    assert_eq!(
        sink.get(telemetry::KEY_CURRENT_PIECE),
        Some(TelemetryValue::Text(expected.to_string()))
    );
}

#[test]
fn classification_has_no_memory() {
    let sim = SimHandle::new();
    sim.update(|state| state.has_coral = true);
    let (mut robot, _) = start(&sim);

    robot.periodic();
    assert_eq!(robot.current_held_object(), HeldObject::Coral);

    sim.update(|state| state.has_coral = false);
    robot.periodic();
    assert_eq!(robot.current_held_object(), HeldObject::None);
}

#[test]
fn held_coral_rides_the_end_effector() {
    let sim = SimHandle::new();
    sim.update(|state| {
        state.height = 1.0;
        state.has_coral = true;
    });
    let (mut robot, sink) = start(&sim);

    robot.periodic();

    let Some(TelemetryValue::Poses(mechanism)) = sink.get(telemetry::KEY_MECHANISM) else {
        panic!("mechanism poses missing");
    };
    let end_effector = mechanism[4];
    assert!((end_effector.translation.vector.z - 1.25).abs() < 1e-9);
    assert_eq!(sink.get(telemetry::KEY_CORAL_POSE), Some(TelemetryValue::Pose(end_effector)));
    assert_eq!(
        sink.get(telemetry::KEY_ALGAE_POSE),
        Some(TelemetryValue::Pose(Isometry3::translation(0.0, 0.3048, 0.0)))
    );
    assert_eq!(sink.get(telemetry::KEY_PRESSURE), Some(TelemetryValue::Number(110.0)));
}

#[test]
fn repeated_cycles_publish_identical_telemetry() {
    let sim = SimHandle::new();
    sim.update(|state| {
        state.height = 0.7;
        state.has_algae = true;
        state.pivot_angle = 0.3;
    });
    let (mut robot, sink) = start(&sim);

    robot.periodic();
    let first = sink.to_yaml().unwrap();
    robot.periodic();

    assert_eq!(sink.to_yaml().unwrap(), first);
}

#[test]
fn alliance_assignment_flips_navigation_once() {
    let sim = SimHandle::new();
    let (mut robot, sink) = start(&sim);

    robot.disabled_periodic().unwrap();
    assert_eq!(sim.snapshot().alliance_flips, 0);

    sim.update(|state| state.alliance = Some(Alliance::Red));
    for _ in 0..5 {
        robot.disabled_periodic().unwrap();
    }

    assert_eq!(robot.current_alliance(), Alliance::Red);
    assert_eq!(sim.snapshot().alliance_flips, 1);

    robot.periodic();
    assert_eq!(sink.get(telemetry::KEY_ALLIANCE), Some(TelemetryValue::Text("Red".into())));
}

#[test]
fn blue_assignment_after_unknown_does_not_flip() {
    let sim = SimHandle::new();
    let (mut robot, _) = start(&sim);

    sim.update(|state| state.alliance = Some(Alliance::Blue));
    robot.disabled_periodic().unwrap();

    assert_eq!(robot.current_alliance(), Alliance::Blue);
    assert_eq!(sim.snapshot().alliance_flips, 0);
}

#[test]
fn driver_controls_fire_on_press() {
    let sim = SimHandle::new();
    let (mut robot, _) = start(&sim);
    robot.configure_actions(&SimActionFactory::new(sim.clone()));

    sim.update(|state| {
        state.pressed.insert(Control::ResetGyro);
        state.pressed.insert(Control::Source);
    });
    assert_eq!(robot.poll_actions(), 2);
    assert_eq!(robot.poll_actions(), 0);

    sim.update(|state| state.pressed.clear());
    robot.poll_actions();
    sim.update(|state| {
        state.pressed.insert(Control::PositionL4);
    });
    robot.poll_actions();

    let state = sim.snapshot();
    assert_eq!(state.gyro_resets, 1);
    assert_eq!(state.actions_run, vec!["Source".to_string()]);
    assert!(state.has_coral);
    assert_eq!(state.algae_pivot, superstructure::hardware::AlgaePivotState::Processor);
}

#[test]
fn button_held_through_startup_waits_for_release() {
    let sim = SimHandle::new();
    sim.update(|state| {
        state.pressed.insert(Control::ResetGyro);
    });
    let (mut robot, _) = start(&sim);
    robot.configure_actions(&SimActionFactory::new(sim.clone()));

    assert_eq!(robot.poll_actions(), 0);
    assert_eq!(sim.snapshot().gyro_resets, 0);

    sim.update(|state| state.pressed.clear());
    robot.poll_actions();
    sim.update(|state| {
        state.pressed.insert(Control::ResetGyro);
    });
    assert_eq!(robot.poll_actions(), 1);
    assert_eq!(sim.snapshot().gyro_resets, 1);
}

#[test]
fn yaml_config_matches_defaults() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/superstructure.yaml");
    let config = SuperstructureConfig::from_yaml_file(path).unwrap();
    assert_eq!(config, SuperstructureConfig::default());
}
