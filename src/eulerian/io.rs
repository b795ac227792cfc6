use super::post::vtk::CaseParameters;
use super::{post, Grid, Scene, SceneKind, SceneSetup, Simulation};
use crate::error::{FluidError, Result};
use crate::global_variables::*;
use crate::io::WriteDataMode;
use colored::*;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

pub const CASE_CONDITIONS_FILE: &'static str = "case_conditions.jou";

const SETUP_KEYS: [&'static str; 4] =
    ["case_name", "max_steps", "obstacle_drift", "write_data_mode"];

const CONDITION_KEYS: [&'static str; 15] = [
    "scene",
    "resolution",
    "aspect_ratio",
    "sim_height",
    "density",
    "delta_t",
    "gravity",
    "num_iters",
    "over_relaxation",
    "obstacle_radius",
    "obstacle_position",
    "inflow_velocity",
    "pipe_height",
    "paint_pulse_rate",
    "no_obstacle",
];

fn invalid(key: &str, value: &str) -> FluidError {
    FluidError::InvalidParameter {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn warn_unknown_keys(parameters: &HashMap<String, String>, known: &[&str]) {
    for key in parameters.keys() {
        if !known.contains(&key.as_str()) {
            log::warn!("ignoring unknown case parameter '{key}'");
        }
    }
}

pub fn parse_parameter<T: FromStr>(
    parameters: &HashMap<String, String>,
    key: &str,
) -> Result<Option<T>> {
    match parameters.get(key) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(key, value)),
        None => Ok(None),
    }
}

pub fn parse_pair(parameters: &HashMap<String, String>, key: &str) -> Result<Option<[Float; 2]>> {
    let Some(value) = parameters.get(key) else {
        return Ok(None);
    };
    let numbers = value
        .split_whitespace()
        .map(|x| x.parse::<Float>())
        .collect::<std::result::Result<Vec<Float>, _>>()
        .map_err(|_| invalid(key, value))?;
    match numbers.as_slice() {
        &[x, y] => Ok(Some([x, y])),
        _ => Err(invalid(key, value)),
    }
}

pub fn parse_write_data_mode(mode: &str) -> Result<WriteDataMode> {
    let mut write_data_mode = mode.split_whitespace();
    let error = || FluidError::InvalidWriteDataMode(mode.to_string());
    match write_data_mode.next() {
        Some("frequency") => {
            let frequency = write_data_mode
                .next()
                .and_then(|x| x.parse::<usize>().ok())
                .filter(|&n| n > 0)
                .ok_or_else(error)?;
            Ok(WriteDataMode::Frequency(frequency))
        }
        Some("list") => {
            let list = write_data_mode
                .map(|x| x.parse::<usize>())
                .collect::<std::result::Result<Vec<usize>, _>>()
                .map_err(|_| error())?;
            Ok(WriteDataMode::ListOfSteps(list))
        }
        _ => Err(error()),
    }
}

impl SceneSetup {
    pub fn from_conditions(conditions: &HashMap<String, String>) -> Result<Self> {
        let kind = match conditions.get("scene") {
            Some(scene) => scene.parse::<SceneKind>()?,
            None => SceneKind::Tank,
        };
        let mut setup = SceneSetup::for_kind(kind);
        if let Some(resolution) = parse_parameter(conditions, "resolution")? {
            setup.resolution = resolution;
        }
        if let Some(aspect_ratio) = parse_parameter(conditions, "aspect_ratio")? {
            setup.aspect_ratio = aspect_ratio;
        }
        if let Some(sim_height) = parse_parameter(conditions, "sim_height")? {
            setup.sim_height = sim_height;
        }
        if let Some(density) = parse_parameter(conditions, "density")? {
            setup.density = density;
        }
        if let Some(dt) = parse_parameter(conditions, "delta_t")? {
            setup.parameters.dt = dt;
        }
        if let Some(gravity) = parse_parameter(conditions, "gravity")? {
            setup.parameters.gravity = gravity;
        }
        if let Some(num_iters) = parse_parameter(conditions, "num_iters")? {
            setup.parameters.num_iters = num_iters;
        }
        if let Some(over_relaxation) = parse_parameter(conditions, "over_relaxation")? {
            setup.parameters.over_relaxation = over_relaxation;
        }
        if let Some(radius) = parse_parameter(conditions, "obstacle_radius")? {
            setup.obstacle_radius = radius;
        }
        if let Some(position) = parse_pair(conditions, "obstacle_position")? {
            setup.obstacle_position = Some(position);
        }
        if let Some(true) = parse_parameter::<bool>(conditions, "no_obstacle")? {
            setup.obstacle_position = None;
        }
        if let Some(inflow_velocity) = parse_parameter(conditions, "inflow_velocity")? {
            setup.inflow_velocity = inflow_velocity;
        }
        if let Some(pipe_height) = parse_parameter(conditions, "pipe_height")? {
            setup.pipe_height = pipe_height;
        }
        if let Some(rate) = parse_parameter(conditions, "paint_pulse_rate")? {
            setup.paint_pulse_rate = rate;
        }
        Ok(setup)
    }
}

impl Scene {
    pub fn build_case_conditions() -> Result<Scene> {
        let path = Path::new(crate::io::PRE_PROCESSING_PATH).join(CASE_CONDITIONS_FILE);
        let setup = if path.exists() {
            println!(
                "Reading the case conditions file: {}.\n",
                path.display().to_string().yellow().bold()
            );
            let conditions = crate::io::read_parameters(&path)?;
            warn_unknown_keys(&conditions, &CONDITION_KEYS);
            SceneSetup::from_conditions(&conditions)?
        } else {
            log::info!("no case conditions file, using the tank preset");
            SceneSetup::for_kind(SceneKind::Tank)
        };
        Scene::setup(setup)
    }
}

impl Simulation {
    pub fn build_case_setup() -> Result<Simulation> {
        crate::io::create_case_directories()?;
        let path = Path::new(crate::io::PRE_PROCESSING_PATH).join(crate::io::CASE_SETUP_FILE);
        if path.exists() {
            println!(
                "Reading the case setup file: {}.\n",
                path.display().to_string().yellow().bold()
            );
            let parameters = crate::io::read_case_setup()?;
            warn_unknown_keys(&parameters, &SETUP_KEYS);
            Simulation::from_setup(&parameters)
        } else {
            Ok(Simulation::new())
        }
    }

    pub fn write_case_parameters(&self, grid: &Grid) -> Result<()> {
        let case_parameters = CaseParameters::new(&self.case_name, grid);
        let path =
            Path::new(crate::io::POST_PROCESSING_PATH).join(crate::io::CASE_PARAMETERS_FILE);
        case_parameters.write(&path)?;
        log::info!("case parameters written to {}", path.display());
        Ok(())
    }

    fn diagnostics(&self, grid: &Grid) -> Vec<crate::post::PostResult> {
        let mut results = post::compute_max_divergence(grid);
        results.extend(post::compute_marker_mass(grid));
        results.extend(post::compute_max_velocity(grid));
        results.extend(post::compute_pressure_range(grid));
        results
    }

    pub fn print_diagnostics(&self, grid: &Grid) {
        let results = self.diagnostics(grid);
        if self.time_step % 100 == 1 {
            let duration = self.simulation_time.elapsed().as_secs_f64();
            println!("\n{} {:.2} s.", "Elapsed time:".cyan().bold(), duration);
            print!("\n{:>8}", "step".cyan().bold());
            for result in &results {
                print!(" {:>16}", result.name.cyan().bold());
            }
            println!("\n");
        }
        print!("{:>8}", self.time_step);
        for result in &results {
            print!(" {:>16.8e}", result.value);
        }
        println!();
    }

    pub fn write_diagnostics(&self, grid: &Grid) -> Result<()> {
        let results = self.diagnostics(grid);
        let path =
            Path::new(crate::io::POST_PROCESSING_PATH).join(crate::io::DIAGNOSTICS_FILE);
        let write_header = !path.exists();
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        if write_header {
            write!(file, "{:>8}", "step")?;
            for result in &results {
                write!(file, " {:>16}", result.name)?;
            }
            writeln!(file)?;
        }
        write!(file, "{:>8}", self.time_step)?;
        for result in &results {
            write!(file, " {:>16.8e}", result.value)?;
        }
        writeln!(file)?;
        Ok(())
    }

    pub fn write_data(&self, grid: &Grid) -> Result<()> {
        if self.write_data_mode.should_write(self.time_step) {
            self.write_data_from_steps(grid)?;
        }
        Ok(())
    }

    pub fn write_data_from_steps(&self, grid: &Grid) -> Result<()> {
        let step_path = Path::new(crate::io::DATA_PATH).join(self.time_step.to_string());
        fs::create_dir_all(&step_path)?;
        let fields = [
            (crate::io::HORIZONTAL_VELOCITY_FILE, "u", &grid.u),
            (crate::io::VERTICAL_VELOCITY_FILE, "v", &grid.v),
            (crate::io::PRESSURE_FILE, "p", &grid.p),
            (crate::io::SCALE_FILE, "s", &grid.s),
            (crate::io::MARKER_FILE, "m", &grid.m),
        ];
        for (file_name, header, values) in fields {
            write_field(step_path.join(file_name), header, values)?;
        }
        log::info!(
            "data for time step {} written to {}",
            self.time_step,
            step_path.display()
        );
        Ok(())
    }

    pub fn write_post_processing_from_each_n_steps<F>(
        &self,
        grid: &Grid,
        n: usize,
        function: F,
        file_name: &str,
    ) -> Result<()>
    where
        F: Fn(&Grid) -> Vec<crate::post::PostResult>,
    {
        if self.time_step % n == 0 {
            let post_results = &function(grid);
            let post_processing_path = Path::new(crate::io::POST_PROCESSING_PATH);
            let path = post_processing_path.join(file_name);
            let write_header = !path.exists();
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            if write_header {
                write!(file, "{:>8}", "step")?;
                for post_result in post_results {
                    write!(file, " {:>16}", post_result.name)?;
                }
                writeln!(file)?;
            }
            write!(file, "{:>8}", self.time_step)?;
            for post_result in post_results {
                write!(file, " {:>16.8e}", post_result.value)?;
            }
            writeln!(file)?;
        }
        Ok(())
    }
}

fn write_field<P: AsRef<Path>>(path: P, header: &str, values: &[Float]) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "{header}")?;
    for value in values {
        writeln!(file, "{value:>.10e}")?;
    }
    file.flush()?;
    Ok(())
}

pub fn read_field<P: AsRef<Path>>(path: P, values: &mut [Float]) -> Result<()> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let mut lines = contents.lines();
    lines.next();
    let mut count = 0;
    for (line, value) in lines.zip(values.iter_mut()) {
        *value = line
            .trim()
            .parse::<Float>()
            .map_err(|_| invalid(&path.display().to_string(), line))?;
        count += 1;
    }
    if count != values.len() {
        return Err(invalid(
            &path.display().to_string(),
            &format!("{count} values, expected {}", values.len()),
        ));
    }
    Ok(())
}

impl Grid {
    pub fn from_data(time_step: usize, case_parameters: &CaseParameters) -> Result<Grid> {
        let mut grid = Grid::new(
            case_parameters.density,
            case_parameters.num_x,
            case_parameters.num_y,
            case_parameters.h,
        )?;
        let step_path = Path::new(crate::io::DATA_PATH).join(time_step.to_string());
        read_field(step_path.join(crate::io::HORIZONTAL_VELOCITY_FILE), &mut grid.u)?;
        read_field(step_path.join(crate::io::VERTICAL_VELOCITY_FILE), &mut grid.v)?;
        read_field(step_path.join(crate::io::PRESSURE_FILE), &mut grid.p)?;
        read_field(step_path.join(crate::io::SCALE_FILE), &mut grid.s)?;
        read_field(step_path.join(crate::io::MARKER_FILE), &mut grid.m)?;
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conditions(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn conditions_override_the_scene_preset() {
        let setup = SceneSetup::from_conditions(&conditions(&[
            ("scene", "wind_tunnel"),
            ("resolution", "30"),
            ("gravity", "-1.5"),
            ("num_iters", "80"),
            ("obstacle_position", "0.6 0.45"),
            ("inflow_velocity", "3"),
        ]))
        .unwrap();
        assert_eq!(setup.kind, SceneKind::WindTunnel);
        assert_eq!(setup.resolution, 30);
        assert_eq!(setup.parameters.gravity, -1.5);
        assert_eq!(setup.parameters.num_iters, 80);
        assert_eq!(setup.obstacle_position, Some([0.6, 0.45]));
        assert_eq!(setup.inflow_velocity, 3.0);
        assert_eq!(setup.parameters.over_relaxation, OVER_RELAXATION);
    }

    #[test]
    fn no_obstacle_removes_the_preset_obstacle() {
        let setup = SceneSetup::from_conditions(&conditions(&[
            ("scene", "wind_tunnel"),
            ("no_obstacle", "true"),
        ]))
        .unwrap();
        assert_eq!(setup.obstacle_position, None);
    }

    #[test]
    fn missing_scene_defaults_to_tank() {
        let setup = SceneSetup::from_conditions(&HashMap::new()).unwrap();
        assert_eq!(setup, SceneSetup::for_kind(SceneKind::Tank));
    }

    #[test]
    fn malformed_values_are_reported() {
        assert!(matches!(
            SceneSetup::from_conditions(&conditions(&[("resolution", "fifty")])),
            Err(FluidError::InvalidParameter { .. })
        ));
        assert!(matches!(
            SceneSetup::from_conditions(&conditions(&[("obstacle_position", "0.4")])),
            Err(FluidError::InvalidParameter { .. })
        ));
        assert!(matches!(
            SceneSetup::from_conditions(&conditions(&[("scene", "vortex")])),
            Err(FluidError::UnknownScene(_))
        ));
    }

    #[test]
    fn write_data_modes_parse() {
        assert_eq!(
            parse_write_data_mode("frequency 25").unwrap(),
            WriteDataMode::Frequency(25)
        );
        assert_eq!(
            parse_write_data_mode("list 1 5 9").unwrap(),
            WriteDataMode::ListOfSteps(vec![1, 5, 9])
        );
        assert!(parse_write_data_mode("frequency 0").is_err());
        assert!(parse_write_data_mode("every 3").is_err());
        assert!(parse_write_data_mode("list 1 x").is_err());
    }

    #[test]
    fn fields_survive_a_write_and_read() {
        let path =
            std::env::temp_dir().join(format!("eulerian_fluid_field_{}.dat", std::process::id()));
        let values = [0.0, -1.25, 3.5e-7, 1000.0];
        write_field(&path, "p", &values).unwrap();
        let mut read = [9.0; 4];
        read_field(&path, &mut read).unwrap();
        assert_eq!(values, read);
        let mut too_many = [0.0; 5];
        assert!(read_field(&path, &mut too_many).is_err());
        fs::remove_file(path).unwrap();
    }
}
