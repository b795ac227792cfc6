use super::cell_velocity;
use crate::error::{FluidError, Result};
use crate::eulerian::io::parse_parameter;
use crate::eulerian::Grid;
use crate::global_variables::*;
use colored::*;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Clone, Debug, PartialEq)]
pub struct CaseParameters {
    pub case_name: String,
    pub num_x: usize,
    pub num_y: usize,
    pub h: Float,
    pub density: Float,
}

fn required<T: std::str::FromStr>(parameters: &HashMap<String, String>, key: &str) -> Result<T> {
    parse_parameter(parameters, key)?.ok_or_else(|| FluidError::MissingParameter(key.to_string()))
}

impl CaseParameters {
    pub fn new(case_name: &str, grid: &Grid) -> CaseParameters {
        CaseParameters {
            case_name: case_name.to_string(),
            num_x: grid.num_x,
            num_y: grid.num_y,
            h: grid.h,
            density: grid.density,
        }
    }

    pub fn from_parameters(parameters: &HashMap<String, String>) -> Result<CaseParameters> {
        Ok(CaseParameters {
            case_name: parameters
                .get("case_name")
                .cloned()
                .unwrap_or_else(|| CASE_NAME.to_string()),
            num_x: required(parameters, "num_x")?,
            num_y: required(parameters, "num_y")?,
            h: required(parameters, "h")?,
            density: required(parameters, "density")?,
        })
    }

    pub fn from_file() -> Result<CaseParameters> {
        let parameters = crate::io::read_case_parameters()?;
        CaseParameters::from_parameters(&parameters)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        crate::io::write_parameters(
            path,
            &[
                ("case_name", self.case_name.clone()),
                ("num_x", self.num_x.to_string()),
                ("num_y", self.num_y.to_string()),
                ("h", format!("{:.16e}", self.h)),
                ("density", format!("{:.16e}", self.density)),
            ],
        )
    }

    pub fn file_prefix(&self) -> String {
        self.case_name.replace(' ', "_").to_lowercase()
    }
}

pub fn write_vtk<W: Write>(grid: &Grid, writer: &mut W) -> Result<()> {
    let point_data = grid.num_cells();
    writeln!(writer, "# vtk DataFile Version 3.0")?;
    writeln!(writer, "Eulerian fluid simulation data")?;
    writeln!(writer, "ASCII")?;
    writeln!(writer, "DATASET STRUCTURED_POINTS")?;
    writeln!(writer, "DIMENSIONS {} {} 1", grid.num_x, grid.num_y)?;
    writeln!(writer, "ORIGIN {:>.6e} {:>.6e} 0.0", 0.5 * grid.h, 0.5 * grid.h)?;
    writeln!(writer, "SPACING {:>.6e} {:>.6e} 1.0", grid.h, grid.h)?;
    writeln!(writer, "POINT_DATA {point_data}")?;

    // VTK orders points with x varying fastest.
    let scalars: [(&str, &Vec<Float>); 3] = [
        ("pressure", &grid.p),
        ("marker", &grid.m),
        ("scale", &grid.s),
    ];
    for (name, values) in scalars {
        writeln!(writer, "SCALARS {name} float 1")?;
        writeln!(writer, "LOOKUP_TABLE default")?;
        for j in 0..grid.num_y {
            for i in 0..grid.num_x {
                writeln!(writer, "{:>.6e}", values[grid.index(i, j)])?;
            }
        }
    }
    writeln!(writer, "VECTORS velocity float")?;
    for j in 0..grid.num_y {
        for i in 0..grid.num_x {
            let [velocity_x, velocity_y] = cell_velocity(grid, i, j);
            writeln!(writer, "{velocity_x:>.6e} {velocity_y:>.6e} 0.0")?;
        }
    }
    Ok(())
}

fn write_vtk_file<P: AsRef<Path>>(grid: &Grid, path: P) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    write_vtk(grid, &mut file)?;
    file.flush()?;
    Ok(())
}

fn read_data_directory() -> Result<Vec<usize>> {
    let mut time_steps = Vec::new();
    let path = Path::new(crate::io::DATA_PATH);
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Ok(time_step) = entry.file_name().to_string_lossy().parse::<usize>() {
                time_steps.push(time_step);
            }
        }
    }
    time_steps.sort_unstable();
    Ok(time_steps)
}

pub fn run_vtk_post_processing() -> Result<()> {
    crate::io::create_case_directories()?;
    let case_parameters = CaseParameters::from_file()?;
    let case_name = case_parameters.file_prefix();
    let time_steps = read_data_directory()?;
    log::info!("converting {} stored time steps", time_steps.len());
    time_steps.par_iter().try_for_each(|&time_step| {
        let grid = Grid::from_data(time_step, &case_parameters)?;
        let path_str = format!("{case_name}_{:08}.vtk", time_step);
        let path = Path::new(crate::io::VTK_PATH).join(&path_str);
        println!(
            "Writing {} for time step {}.\n",
            path_str.yellow().bold(),
            time_step.to_string().yellow().bold()
        );
        write_vtk_file(&grid, path)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eulerian::BoundaryLayout;

    #[test]
    fn case_parameters_round_trip_through_a_file() {
        let grid = Grid::new(1000.0, 12, 7, 1.0 / 7.0).unwrap();
        let parameters = CaseParameters::new("Wind Tunnel", &grid);
        let path = std::env::temp_dir().join(format!(
            "eulerian_fluid_case_parameters_{}.jou",
            std::process::id()
        ));
        parameters.write(&path).unwrap();
        let read = crate::io::read_parameters(&path).unwrap();
        let read = CaseParameters::from_parameters(&read).unwrap();
        assert_eq!(read, parameters);
        assert_eq!(read.file_prefix(), "wind_tunnel");
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_geometry_is_reported() {
        let parameters: HashMap<String, String> =
            [("num_x".to_string(), "10".to_string())].into_iter().collect();
        assert!(matches!(
            CaseParameters::from_parameters(&parameters),
            Err(FluidError::MissingParameter(key)) if key == "num_y"
        ));
    }

    #[test]
    fn vtk_output_lists_every_cell_row_by_row() {
        let mut grid = Grid::new(1000.0, 4, 3, 0.5).unwrap();
        grid.apply_boundary_layout(&BoundaryLayout::Tank);
        let index = grid.index(1, 0);
        grid.p[index] = 7.0;
        let index = grid.index(0, 1);
        grid.p[index] = -3.0;
        let mut buffer = Vec::new();
        write_vtk(&grid, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[3], "DATASET STRUCTURED_POINTS");
        assert_eq!(lines[4], "DIMENSIONS 4 3 1");
        assert_eq!(lines[7], "POINT_DATA 12");
        assert_eq!(lines[8], "SCALARS pressure float 1");
        // x runs fastest: (1, 0) is the second value, (0, 1) the fifth.
        assert_eq!(lines[10].parse::<Float>().unwrap(), 0.0);
        assert_eq!(lines[11].parse::<Float>().unwrap(), 7.0);
        assert_eq!(lines[14].parse::<Float>().unwrap(), -3.0);
        let vectors = lines
            .iter()
            .position(|line| *line == "VECTORS velocity float")
            .unwrap();
        assert_eq!(lines.len(), vectors + 1 + 12);
    }
}
