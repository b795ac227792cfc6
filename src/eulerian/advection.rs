use super::Grid;
use crate::global_variables::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Field {
    /// Horizontal velocity, sampled at `(i h, (j + 0.5) h)`.
    U,
    /// Vertical velocity, sampled at `((i + 0.5) h, j h)`.
    V,
    /// Marker, sampled at cell centres.
    M,
}

impl Grid {
    /// The position is clamped into `[h, num_x h] x [h, num_y h]` before the
    /// containing cell of the staggered samples is looked up.
    pub fn sample_field(&self, x: Float, y: Float, field: Field) -> Float {
        let h = self.h;
        let h1 = 1.0 / h;
        let h2 = 0.5 * h;

        let x = x.min(self.num_x as Float * h).max(h);
        let y = y.min(self.num_y as Float * h).max(h);

        let (f, dx, dy) = match field {
            Field::U => (&self.u, 0.0, h2),
            Field::V => (&self.v, h2, 0.0),
            Field::M => (&self.m, h2, h2),
        };

        let x0 = (((x - dx) * h1).floor() as usize).min(self.num_x - 1);
        let tx = (((x - dx) - x0 as Float * h) * h1).clamp(0.0, 1.0);
        let x1 = (x0 + 1).min(self.num_x - 1);

        let y0 = (((y - dy) * h1).floor() as usize).min(self.num_y - 1);
        let ty = (((y - dy) - y0 as Float * h) * h1).clamp(0.0, 1.0);
        let y1 = (y0 + 1).min(self.num_y - 1);

        let sx = 1.0 - tx;
        let sy = 1.0 - ty;

        sx * sy * f[self.idx(x0, y0)]
            + tx * sy * f[self.idx(x1, y0)]
            + tx * ty * f[self.idx(x1, y1)]
            + sx * ty * f[self.idx(x0, y1)]
    }

    pub fn sample_velocity(&self, x: Float, y: Float) -> [Float; 2] {
        [
            self.sample_field(x, y, Field::U),
            self.sample_field(x, y, Field::V),
        ]
    }

    pub(crate) fn avg_u(&self, i: usize, j: usize) -> Float {
        (self.u[self.idx(i, j - 1)]
            + self.u[self.idx(i, j)]
            + self.u[self.idx(i + 1, j - 1)]
            + self.u[self.idx(i + 1, j)])
            * 0.25
    }

    pub(crate) fn avg_v(&self, i: usize, j: usize) -> Float {
        (self.v[self.idx(i - 1, j)]
            + self.v[self.idx(i, j)]
            + self.v[self.idx(i - 1, j + 1)]
            + self.v[self.idx(i, j + 1)])
            * 0.25
    }

    /// A `u` sample is only updated when the cells on both of its sides are
    /// fluid, likewise for `v`; samples on walls keep their value.
    pub fn advect_velocity(&mut self, dt: Float) {
        self.new_u.copy_from_slice(&self.u);
        self.new_v.copy_from_slice(&self.v);

        let h = self.h;
        let h2 = 0.5 * h;

        for i in 1..self.num_x {
            for j in 1..self.num_y {
                let index = self.idx(i, j);
                if self.s[index] == 0.0 {
                    continue;
                }

                if self.s[self.idx(i - 1, j)] != 0.0 && j < self.num_y - 1 {
                    let u = self.u[index];
                    let v = self.avg_v(i, j);
                    let x = i as Float * h - dt * u;
                    let y = j as Float * h + h2 - dt * v;
                    self.new_u[index] = self.sample_field(x, y, Field::U);
                }

                if self.s[self.idx(i, j - 1)] != 0.0 && i < self.num_x - 1 {
                    let u = self.avg_u(i, j);
                    let v = self.v[index];
                    let x = i as Float * h + h2 - dt * u;
                    let y = j as Float * h - dt * v;
                    self.new_v[index] = self.sample_field(x, y, Field::V);
                }
            }
        }

        std::mem::swap(&mut self.u, &mut self.new_u);
        std::mem::swap(&mut self.v, &mut self.new_v);
    }

    pub fn advect_marker(&mut self, dt: Float) {
        self.new_m.copy_from_slice(&self.m);

        let h = self.h;
        let h2 = 0.5 * h;

        for i in 1..self.num_x - 1 {
            for j in 1..self.num_y - 1 {
                let index = self.idx(i, j);
                if self.s[index] == 0.0 {
                    continue;
                }
                let u = (self.u[index] + self.u[self.idx(i + 1, j)]) * 0.5;
                let v = (self.v[index] + self.v[self.idx(i, j + 1)]) * 0.5;
                let x = i as Float * h + h2 - dt * u;
                let y = j as Float * h + h2 - dt * v;
                self.new_m[index] = self.sample_field(x, y, Field::M);
            }
        }

        std::mem::swap(&mut self.m, &mut self.new_m);
    }

    /// Each segment advances by `step_scale` times the local velocity; tracing
    /// stops early once the line leaves the domain horizontally.
    pub fn streamline(
        &self,
        x: Float,
        y: Float,
        num_segments: usize,
        step_scale: Float,
    ) -> Vec<[Float; 2]> {
        let mut points = Vec::with_capacity(num_segments + 1);
        let (mut x, mut y) = (x, y);
        points.push([x, y]);
        for _ in 0..num_segments {
            let [u, v] = self.sample_velocity(x, y);
            x += u * step_scale;
            y += v * step_scale;
            if x > self.width() {
                break;
            }
            points.push([x, y]);
        }
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eulerian::BoundaryLayout;

    fn open_grid(num_x: usize, num_y: usize, h: Float) -> Grid {
        let mut grid = Grid::new(1000.0, num_x, num_y, h).unwrap();
        grid.apply_boundary_layout(&BoundaryLayout::Open);
        grid
    }

    #[test]
    fn sampling_at_sample_locations_returns_stored_values() {
        let mut grid = open_grid(6, 5, 1.0);
        for (index, value) in grid.m.iter_mut().enumerate() {
            *value = index as Float * 0.01;
        }
        for i in 1..5 {
            for j in 1..4 {
                let [x, y] = grid.cell_center(i, j);
                assert!((grid.sample_field(x, y, Field::M) - grid.m(i, j)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn sampling_interpolates_between_neighbours() {
        let mut grid = open_grid(4, 4, 1.0);
        grid.set_u(1, 1, 1.0);
        grid.set_u(2, 1, 3.0);
        // Halfway between the u samples at (1, 1.5) and (2, 1.5).
        assert!((grid.sample_field(1.5, 1.5, Field::U) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn averages_cover_the_four_neighbouring_faces() {
        let mut grid = open_grid(4, 4, 1.0);
        grid.set_v(1, 2, 1.0);
        grid.set_v(2, 2, 2.0);
        grid.set_v(1, 3, 3.0);
        grid.set_v(2, 3, 6.0);
        assert_eq!(grid.avg_v(2, 2), 3.0);
        grid.set_u(2, 1, -1.0);
        grid.set_u(2, 2, -1.0);
        grid.set_u(3, 1, 4.0);
        grid.set_u(3, 2, 2.0);
        assert_eq!(grid.avg_u(2, 2), 1.0);
    }

    #[test]
    fn sampling_clamps_outside_positions() {
        let mut grid = open_grid(4, 4, 1.0);
        grid.m.fill(0.25);
        assert_eq!(grid.sample_field(-10.0, -10.0, Field::M), 0.25);
        assert_eq!(grid.sample_field(100.0, 100.0, Field::M), 0.25);
    }

    #[test]
    fn zero_flow_leaves_fields_unchanged() {
        let mut grid = open_grid(8, 6, 0.1);
        for (index, value) in grid.m.iter_mut().enumerate() {
            *value = (index as Float * 0.37).sin().abs();
        }
        let before = grid.m.clone();
        grid.advect_velocity(DELTA_T);
        grid.advect_marker(DELTA_T);
        assert!(grid.u.iter().chain(grid.v.iter()).all(|&x| x == 0.0));
        for (a, b) in before.iter().zip(grid.m.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn uniform_marker_is_preserved_under_uniform_flow() {
        let mut grid = open_grid(10, 10, 0.1);
        grid.u.fill(1.0);
        grid.v.fill(-0.5);
        grid.m.fill(0.4);
        let mass_before: Float = grid.m.iter().sum();
        grid.advect_velocity(DELTA_T);
        grid.advect_marker(DELTA_T);
        let mass_after: Float = grid.m.iter().sum();
        assert!((mass_before - mass_after).abs() < 1e-9);
        assert!(grid.u.iter().all(|&u| (u - 1.0).abs() < 1e-12));
        assert!(grid.v.iter().all(|&v| (v + 0.5).abs() < 1e-12));
    }

    #[test]
    fn uniform_flow_shifts_marker_downstream() {
        let mut grid = open_grid(12, 6, 1.0);
        grid.u.fill(1.0);
        grid.set_m(5, 3, 0.0);
        grid.advect_marker(0.5);
        // Half a cell of transport splits the marked cell with its right neighbour.
        assert!((grid.m(5, 3) - 0.5).abs() < 1e-12);
        assert!((grid.m(6, 3) - 0.5).abs() < 1e-12);
        assert_eq!(grid.m(4, 3), 1.0);
    }

    #[test]
    fn wall_faces_are_not_advected() {
        let mut grid = Grid::new(1000.0, 6, 6, 1.0).unwrap();
        grid.apply_boundary_layout(&BoundaryLayout::WindTunnel {
            inflow_velocity: 2.0,
            pipe_height: 0.1,
        });
        grid.advect_velocity(DELTA_T);
        for j in 0..6 {
            assert_eq!(grid.u(1, j), 2.0);
        }
    }

    #[test]
    fn streamline_follows_uniform_flow_and_stops_at_the_outlet() {
        let mut grid = open_grid(10, 5, 0.1);
        grid.u.fill(2.0);
        let line = grid.streamline(0.5, 0.25, STREAMLINE_SEGMENTS, STREAMLINE_STEP_SCALE);
        assert_eq!(line.len(), STREAMLINE_SEGMENTS + 1);
        assert!((line[1][0] - 0.52).abs() < 1e-12);
        assert!(line.iter().all(|p| (p[1] - 0.25).abs() < 1e-12));

        let line = grid.streamline(0.99, 0.25, STREAMLINE_SEGMENTS, STREAMLINE_STEP_SCALE);
        assert_eq!(line.len(), 1);
    }
}
