// src/main.rs
// Composition root: builds the one superstructure for this process on the
// simulated robot and drives it through a disabled period and a match.

use log::{error, info};
use std::error::Error;
use std::time::Duration;

use superstructure::{
    Alliance, Control, MemorySink, Superstructure, SuperstructureConfig,
    sim::{SimActionFactory, SimHandle},
    telemetry::{FanoutSink, LogSink},
};

// (active cycle, control pressed for that cycle)
const DRIVER_SCRIPT: [(u32, Control); 6] = [
    (5, Control::ResetGyro),
    (10, Control::Source),
    (40, Control::PositionL2),
    (80, Control::PositionL4),
    (100, Control::PositionBarge),
    (130, Control::PositionStore),
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    info!("Starting superstructure simulation...");

    let config = match std::env::args().nth(1) {
        Some(path) => SuperstructureConfig::from_yaml_file(&path)?,
        None => SuperstructureConfig::default(),
    };
    let period = Duration::from_millis(config.run.cycle_period_ms);

    let sim = SimHandle::new();
    let telemetry = MemorySink::new();
    let sink = FanoutSink::new().with(LogSink).with(telemetry.clone());

    let mut robot = match Superstructure::new(&config, sim.collaborators(sink)) {
        Ok(robot) => robot,
        Err(e) => {
            error!("Robot failed to start: {}", e);
            return Err(e.into());
        }
    };
    robot.configure_actions(&SimActionFactory::new(sim.clone()));

    // The field assigns the alliance partway through the disabled period
    let assign_at = config.run.disabled_cycles / 2;
    for cycle in 0..config.run.disabled_cycles {
        if cycle == assign_at {
            sim.update(|state| state.alliance = Some(Alliance::Red));
        }
        robot.disabled_periodic()?;
        std::thread::sleep(period);
    }
    info!("Enabled on the {} alliance", robot.current_alliance());

    for cycle in 0..config.run.active_cycles {
        sim.update(|state| {
            state.pressed = DRIVER_SCRIPT
                .iter()
                .filter(|(at, _)| *at == cycle)
                .map(|(_, control)| *control)
                .collect();
        });
        robot.poll_actions();
        robot.periodic();
        sim.step(period);
        std::thread::sleep(period);
    }

    let state = sim.snapshot();
    info!(
        "Match done: holding {}, {:.1} PSI, {} alliance flip(s), actions {:?}",
        robot.current_held_object(),
        robot.current_pressure(),
        state.alliance_flips,
        state.actions_run
    );
    println!("{}", telemetry.to_yaml()?);

    Ok(())
}
