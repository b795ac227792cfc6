pub mod vtk;

use super::*;
use crate::global_variables::*;
use crate::post::PostResult;
use rayon::prelude::*;

fn cell_of(grid: &Grid, index: usize) -> (usize, usize) {
    (index / grid.num_y, index % grid.num_y)
}

fn is_interior(grid: &Grid, (i, j): (usize, usize)) -> bool {
    i > 0 && j > 0 && i < grid.num_x - 1 && j < grid.num_y - 1
}

pub fn cell_velocity(grid: &Grid, i: usize, j: usize) -> [Float; 2] {
    let right = grid.index((i + 1).min(grid.num_x - 1), j);
    let top = grid.index(i, (j + 1).min(grid.num_y - 1));
    let center = grid.index(i, j);
    [
        0.5 * (grid.u[center] + grid.u[right]),
        0.5 * (grid.v[center] + grid.v[top]),
    ]
}

/// Total amount of marker, measured as the deficit `1 - m` over fluid cells.
pub fn marker_mass(grid: &Grid) -> Float {
    grid.m
        .par_iter()
        .zip(grid.s.par_iter())
        .filter(|(_, s)| **s != 0.0)
        .map(|(&m, _)| 1.0 - m)
        .sum::<Float>()
}

/// Centre of the marker deficit, `None` when the fluid carries no marker.
pub fn marker_centroid(grid: &Grid) -> Option<[Float; 2]> {
    let (mass, x, y) = (0..grid.num_cells())
        .into_par_iter()
        .filter(|&index| grid.s[index] != 0.0)
        .map(|index| {
            let (i, j) = cell_of(grid, index);
            let weight = 1.0 - grid.m[index];
            let [x, y] = grid.cell_center(i, j);
            (weight, weight * x, weight * y)
        })
        .reduce(|| (0.0, 0.0, 0.0), |a, b| (a.0 + b.0, a.1 + b.1, a.2 + b.2));
    if mass.abs() < Float::EPSILON {
        None
    } else {
        Some([x / mass, y / mass])
    }
}

pub fn compute_max_divergence(grid: &Grid) -> Vec<PostResult> {
    let max_divergence = grid.max_divergence();
    let max_divergence_result: PostResult = PostResult::new(
        "max_divergence",
        "maximum divergence",
        max_divergence,
        None,
    );
    vec![max_divergence_result]
}

pub fn compute_marker_mass(grid: &Grid) -> Vec<PostResult> {
    let marker_mass_result: PostResult = PostResult::new(
        "marker_mass",
        "marker mass",
        marker_mass(grid),
        None,
    );
    vec![marker_mass_result]
}

pub fn compute_marker_centroid(grid: &Grid) -> Vec<PostResult> {
    let [x, y] = marker_centroid(grid).unwrap_or([Float::NAN; 2]);
    let x_result: PostResult = PostResult::new(
        "marker_x",
        "marker centroid (x)",
        x,
        Some("m"),
    );
    let y_result: PostResult = PostResult::new(
        "marker_y",
        "marker centroid (y)",
        y,
        Some("m"),
    );
    vec![x_result, y_result]
}

pub fn compute_pressure_range(grid: &Grid) -> Vec<PostResult> {
    let fluid_pressures = || {
        grid.p
            .par_iter()
            .zip(grid.s.par_iter())
            .filter(|(_, s)| **s != 0.0)
            .map(|(&p, _)| p)
    };
    let min_pressure = fluid_pressures().reduce_with(Float::min).unwrap_or(0.0);
    let max_pressure = fluid_pressures().reduce_with(Float::max).unwrap_or(0.0);
    let min_pressure_result: PostResult = PostResult::new(
        "min_pressure",
        "minimum pressure",
        min_pressure,
        Some("Pa"),
    );
    let max_pressure_result: PostResult = PostResult::new(
        "max_pressure",
        "maximum pressure",
        max_pressure,
        Some("Pa"),
    );
    vec![min_pressure_result, max_pressure_result]
}

pub fn compute_max_velocity(grid: &Grid) -> Vec<PostResult> {
    let max_velocity = (0..grid.num_cells())
        .into_par_iter()
        .filter(|&index| grid.s[index] != 0.0)
        .map(|index| cell_of(grid, index))
        .filter(|&cell| is_interior(grid, cell))
        .map(|(i, j)| {
            let [u, v] = cell_velocity(grid, i, j);
            (u * u + v * v).sqrt()
        })
        .reduce_with(|a, b| a.max(b))
        .unwrap_or(0.0);
    let max_velocity_result: PostResult = PostResult::new(
        "max_velocity",
        "maximum velocity",
        max_velocity,
        Some("m/s"),
    );
    vec![max_velocity_result]
}

pub fn compute_fluid_fraction(grid: &Grid) -> Vec<PostResult> {
    let number_of_fluid_cells = grid.s.par_iter().filter(|&&s| s != 0.0).count() as Float;
    let number_of_solid_cells = grid.num_cells() as Float - number_of_fluid_cells;
    let fluid_fraction = number_of_fluid_cells / grid.num_cells() as Float;
    let number_of_solid_cells_result: PostResult = PostResult::new(
        "n_solid_cells",
        "number of solid cells",
        number_of_solid_cells,
        None,
    );
    let number_of_fluid_cells_result: PostResult = PostResult::new(
        "n_fluid_cells",
        "number of fluid cells",
        number_of_fluid_cells,
        None,
    );
    let fluid_fraction_result: PostResult = PostResult::new(
        "fluid_fraction",
        "fluid fraction",
        fluid_fraction,
        None,
    );
    vec![
        number_of_solid_cells_result,
        number_of_fluid_cells_result,
        fluid_fraction_result,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tank() -> Grid {
        let mut grid = Grid::new(1000.0, 10, 6, 0.1).unwrap();
        grid.apply_boundary_layout(&BoundaryLayout::Tank);
        grid
    }

    #[test]
    fn marker_mass_counts_the_deficit_in_fluid_cells_only() {
        let mut grid = tank();
        grid.set_m(3, 3, 0.0);
        grid.set_m(4, 3, 0.5);
        grid.set_m(0, 3, 0.0);
        assert!((marker_mass(&grid) - 1.5).abs() < 1e-12);
        let results = compute_marker_mass(&grid);
        assert_eq!(results[0].name, "marker_mass");
    }

    #[test]
    fn marker_centroid_is_weighted_by_the_deficit() {
        let mut grid = tank();
        assert_eq!(marker_centroid(&grid), None);
        grid.set_m(2, 2, 0.0);
        grid.set_m(4, 2, 0.0);
        let [x, y] = marker_centroid(&grid).unwrap();
        assert!((x - 0.35).abs() < 1e-12);
        assert!((y - 0.25).abs() < 1e-12);
    }

    #[test]
    fn pressure_range_ignores_solid_cells() {
        let mut grid = tank();
        let index = grid.index(0, 0);
        grid.p[index] = -1e6;
        let index = grid.index(3, 3);
        grid.p[index] = 12.0;
        let index = grid.index(5, 2);
        grid.p[index] = -4.0;
        let results = compute_pressure_range(&grid);
        assert_eq!(results[0].value, -4.0);
        assert_eq!(results[1].value, 12.0);
    }

    #[test]
    fn max_velocity_uses_cell_centred_velocity() {
        let mut grid = tank();
        grid.set_u(3, 3, 3.0);
        grid.set_u(4, 3, 3.0);
        grid.set_v(3, 3, 4.0);
        grid.set_v(3, 4, 4.0);
        let results = compute_max_velocity(&grid);
        assert!((results[0].value - 5.0).abs() < 1e-12);
    }

    #[test]
    fn fluid_fraction_of_a_tank() {
        let grid = tank();
        let results = compute_fluid_fraction(&grid);
        // 8 x 5 fluid cells out of 10 x 6.
        assert_eq!(results[1].value, 40.0);
        assert_eq!(results[0].value, 20.0);
        assert!((results[2].value - 40.0 / 60.0).abs() < 1e-12);
    }
}
