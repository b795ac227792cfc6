use crate::error::Result;
use colored::*;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::Path;
use std::time::Duration;

pub const DATA_PATH: &'static str = "./data";

pub const PRE_PROCESSING_PATH: &'static str = "./pre_processing";

pub const CASE_SETUP_FILE: &'static str = "case_setup.jou";

pub const CASE_PARAMETERS_FILE: &'static str = "case_parameters.jou";

pub const POST_PROCESSING_PATH: &'static str = "./post_processing";

pub const VTK_PATH: &'static str = "./post_processing/vtk_files";

pub const HORIZONTAL_VELOCITY_FILE: &'static str = "u.dat";

pub const VERTICAL_VELOCITY_FILE: &'static str = "v.dat";

pub const PRESSURE_FILE: &'static str = "pressure.dat";

pub const SCALE_FILE: &'static str = "s.dat";

pub const MARKER_FILE: &'static str = "marker.dat";

pub const DIAGNOSTICS_FILE: &'static str = "diagnostics.dat";

pub const BENCHMARK_FILE: &'static str = "benchmark_elapsed_time.dat";

#[derive(Clone, Debug, PartialEq)]
pub enum WriteDataMode {
    Frequency(usize),

    ListOfSteps(Vec<usize>),
}

impl WriteDataMode {
    pub fn should_write(&self, time_step: usize) -> bool {
        match self {
            WriteDataMode::Frequency(n) => time_step == 0 || (*n > 0 && time_step % n == 0),
            WriteDataMode::ListOfSteps(list) => time_step == 0 || list.contains(&time_step),
        }
    }
}

pub fn create_case_directories() -> Result<()> {
    let list_of_paths = [
        DATA_PATH,
        PRE_PROCESSING_PATH,
        POST_PROCESSING_PATH,
        VTK_PATH,
    ];
    for path_str in list_of_paths {
        let path = Path::new(path_str);
        if !path.exists() {
            println!("Creating the {} path.\n", path_str.yellow().bold());
            fs::create_dir_all(path)?;
        } else {
            log::debug!("the {path_str} path already exists");
        }
    }
    Ok(())
}

pub fn read_case_setup() -> Result<HashMap<String, String>> {
    read_parameters(Path::new(PRE_PROCESSING_PATH).join(CASE_SETUP_FILE))
}

pub fn read_case_parameters() -> Result<HashMap<String, String>> {
    read_parameters(Path::new(POST_PROCESSING_PATH).join(CASE_PARAMETERS_FILE))
}

pub fn read_parameters<P: AsRef<Path>>(path: P) -> Result<HashMap<String, String>> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(extract_parameters(&contents))
}

/// Parses `key = value` lines; blank lines and `#` comments are skipped.
pub fn extract_parameters(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.starts_with("#"))
        .filter(|line| !line.is_empty())
        .map(|line| {
            let mut parts = line.splitn(2, "=");
            let key = parts.next().unwrap_or("").trim().to_string();
            let value = parts.next().unwrap_or("").trim().to_string();
            (key, value)
        })
        .collect::<HashMap<String, String>>()
}

pub fn write_parameters<P: AsRef<Path>>(path: P, parameters: &[(&str, String)]) -> Result<()> {
    let mut file = File::create(path)?;
    for (key, value) in parameters {
        writeln!(file, "{key} = {value}")?;
    }
    Ok(())
}

pub fn write_inside_loop_elapsed_time(
    elapsed_times: &[(&str, Duration)],
    time_step: &usize,
) -> Result<()> {
    let path = Path::new(POST_PROCESSING_PATH).join(BENCHMARK_FILE);
    let write_header = !path.exists();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if write_header {
        write!(file, "{:>8}", "step")?;
        for (key, _) in elapsed_times {
            write!(file, " {:>16}", key)?;
        }
        writeln!(file)?;
    }
    write!(file, "{:>8}", time_step)?;
    for (_, value) in elapsed_times {
        write!(file, " {:>16.8e}", value.as_secs_f64())?;
    }
    writeln!(file)?;
    Ok(())
}
