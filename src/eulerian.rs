pub mod advection;
pub mod boundary;
pub mod grid;
pub mod integrator;
pub mod io;
pub mod post;
pub mod projection;
pub mod scene;

pub use advection::Field;
pub use boundary::{BoundaryLayout, Obstacle, ObstacleMarker};
pub use grid::Grid;
pub use integrator::StepParameters;
pub use scene::{Scene, SceneKind, SceneSetup};

use crate::error::Result;
use crate::global_variables::*;
use crate::io::WriteDataMode;
use std::collections::HashMap;
use std::process;
use std::time::Instant;

#[derive(Clone, Debug)]
pub struct Simulation {
    pub case_name: String,
    pub time_step: usize,
    pub simulation_time: Instant,
    pub max_steps: usize,
    pub obstacle_drift: [Float; 2],
    pub write_data_mode: WriteDataMode,
}

impl Simulation {
    pub fn next_step(&mut self) {
        self.time_step += 1;
    }

    pub fn stop_condition(&self) -> bool {
        self.time_step >= self.max_steps
    }

    /// Moves the obstacle along the scripted drift. Scenes without a placed
    /// obstacle are left alone.
    pub fn drive_obstacle(&self, scene: &mut Scene) -> Result<()> {
        let [vx, vy] = self.obstacle_drift;
        if (vx == 0.0 && vy == 0.0) || !scene.has_obstacle() {
            return Ok(());
        }
        let dt = scene.setup.parameters.dt;
        let x = scene.obstacle.x + vx * dt;
        let y = scene.obstacle.y + vy * dt;
        scene.set_obstacle(x, y, false)?;
        Ok(())
    }
}

impl Simulation {
    fn warn_on_idle_drift(&self, scene: &Scene) {
        if self.obstacle_drift != [0.0, 0.0] && !scene.has_obstacle() {
            log::warn!("obstacle_drift is set but the scene has no obstacle, ignoring it");
        }
    }

    pub fn new() -> Self {
        Self {
            case_name: String::from(CASE_NAME),
            time_step: 0,
            simulation_time: Instant::now(),
            max_steps: MAX_STEPS,
            obstacle_drift: [0.0, 0.0],
            write_data_mode: WriteDataMode::Frequency(60),
        }
    }

    pub fn from_setup(parameters: &HashMap<String, String>) -> Result<Self> {
        let mut simulation = Simulation::new();
        if let Some(case_name) = parameters.get("case_name") {
            simulation.case_name = case_name.clone();
        }
        if let Some(max_steps) = io::parse_parameter(parameters, "max_steps")? {
            simulation.max_steps = max_steps;
        }
        if let Some(drift) = io::parse_pair(parameters, "obstacle_drift")? {
            simulation.obstacle_drift = drift;
        }
        if let Some(mode) = parameters.get("write_data_mode") {
            simulation.write_data_mode = io::parse_write_data_mode(mode)?;
        }
        Ok(simulation)
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

fn exit_on_error<T>(result: Result<T>, context: &str) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error while {context}: {e}.");
            process::exit(1);
        }
    }
}

pub fn run() {
    let mut simulation = exit_on_error(Simulation::build_case_setup(), "reading the case setup");

    let mut scene = exit_on_error(Scene::build_case_conditions(), "building the scene");
    simulation.warn_on_idle_drift(&scene);

    exit_on_error(
        simulation.write_case_parameters(&scene.grid),
        "writing the case parameters",
    );

    exit_on_error(
        simulation.write_post_processing_from_each_n_steps(
            &scene.grid,
            1,
            post::compute_fluid_fraction,
            "fluid_fraction.dat",
        ),
        "writing the fluid fraction file",
    );

    exit_on_error(simulation.write_data(&scene.grid), "writing the initial data");

    loop {
        exit_on_error(simulation.drive_obstacle(&mut scene), "moving the obstacle");

        exit_on_error(scene.simulate(), "advancing the simulation");

        simulation.next_step();

        exit_on_error(simulation.write_data(&scene.grid), "writing the field data");

        exit_on_error(
            simulation.write_post_processing_from_each_n_steps(
                &scene.grid,
                1,
                post::compute_marker_centroid,
                "marker_centroid.dat",
            ),
            "writing the marker centroid file",
        );

        exit_on_error(
            simulation.write_post_processing_from_each_n_steps(
                &scene.grid,
                1,
                post::compute_pressure_range,
                "pressure_range.dat",
            ),
            "writing the pressure range file",
        );

        simulation.print_diagnostics(&scene.grid);
        exit_on_error(
            simulation.write_diagnostics(&scene.grid),
            "writing the diagnostics file",
        );

        if simulation.stop_condition() {
            exit_on_error(
                simulation.write_data_from_steps(&scene.grid),
                "writing the final data",
            );
            log::info!(
                "{} finished after {} steps",
                simulation.case_name,
                simulation.time_step
            );
            for result in post::compute_max_divergence(&scene.grid)
                .into_iter()
                .chain(post::compute_marker_mass(&scene.grid))
                .chain(post::compute_marker_centroid(&scene.grid))
            {
                log::info!("{result}");
            }
            break;
        }
    }
}

pub fn run_benchmark() {
    let bcs_time = Instant::now();
    let mut simulation = exit_on_error(Simulation::build_case_setup(), "reading the case setup");
    let bcs_duration = bcs_time.elapsed();

    let bcc_time = Instant::now();
    let mut scene = exit_on_error(Scene::build_case_conditions(), "building the scene");
    simulation.warn_on_idle_drift(&scene);
    let bcc_duration = bcc_time.elapsed();

    loop {
        let loop_time = Instant::now();
        let mut elapsed_times = vec![("bcs", bcs_duration), ("bcc", bcc_duration)];

        let do_time = Instant::now();
        exit_on_error(simulation.drive_obstacle(&mut scene), "moving the obstacle");
        elapsed_times.push(("do", do_time.elapsed()));

        exit_on_error(
            scene.simulate_timed(|phase, duration| elapsed_times.push((phase, duration))),
            "advancing the simulation",
        );
        simulation.next_step();

        let pd_time = Instant::now();
        simulation.print_diagnostics(&scene.grid);
        exit_on_error(
            simulation.write_diagnostics(&scene.grid),
            "writing the diagnostics file",
        );
        elapsed_times.push(("pd", pd_time.elapsed()));
        elapsed_times.push(("loop", loop_time.elapsed()));

        exit_on_error(
            crate::io::write_inside_loop_elapsed_time(&elapsed_times, &simulation.time_step),
            "writing the benchmark file",
        );

        if simulation.stop_condition() {
            break;
        }
    }
}
