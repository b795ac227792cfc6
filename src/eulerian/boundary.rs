use super::Grid;
use crate::error::{FluidError, Result};
use crate::global_variables::*;

#[derive(Clone, Debug, PartialEq)]
pub enum BoundaryLayout {
    Tank,
    /// Solid left, top and bottom walls, open right side. The column next to
    /// the left wall is driven with `inflow_velocity` and a pipe of height
    /// `pipe_height * num_y` in the left wall releases marker.
    WindTunnel {
        inflow_velocity: Float,
        pipe_height: Float,
    },
    Open,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ObstacleMarker {
    Clear,
    /// `0.5 + 0.5 sin(phase)`, so that dragging the obstacle paints bands.
    Pulse { phase: Float },
}

impl ObstacleMarker {
    pub fn value(&self) -> Float {
        match self {
            ObstacleMarker::Clear => 1.0,
            ObstacleMarker::Pulse { phase } => 0.5 + 0.5 * phase.sin(),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: Float,
    pub y: Float,
    pub radius: Float,
}

impl Obstacle {
    pub fn new(radius: Float) -> Result<Self> {
        if !(radius > 0.0 && radius.is_finite()) {
            return Err(FluidError::InvalidObstacleRadius(radius));
        }
        Ok(Self {
            x: 0.0,
            y: 0.0,
            radius,
        })
    }

    /// Velocity of an obstacle moved from its current position to `(x, y)`
    /// within `dt`. A reset is a teleport and carries no velocity.
    pub fn velocity_to(&self, x: Float, y: Float, dt: Float, reset: bool) -> [Float; 2] {
        if reset {
            [0.0, 0.0]
        } else {
            [(x - self.x) / dt, (y - self.y) / dt]
        }
    }

    pub fn contains(&self, point: [Float; 2]) -> bool {
        let dx = point[0] - self.x;
        let dy = point[1] - self.y;
        dx * dx + dy * dy < self.radius * self.radius
    }
}

impl Grid {
    pub fn apply_boundary_layout(&mut self, layout: &BoundaryLayout) {
        match layout {
            BoundaryLayout::Tank => self.tank_walls(),
            BoundaryLayout::WindTunnel {
                inflow_velocity,
                pipe_height,
            } => self.wind_tunnel_walls(*inflow_velocity, *pipe_height),
            BoundaryLayout::Open => self.s.fill(1.0),
        }
        log::debug!(
            "boundary layout {layout:?} applied: {} fluid cells out of {}",
            self.fluid_cells().count(),
            self.num_cells()
        );
    }

    fn tank_walls(&mut self) {
        for i in 0..self.num_x {
            for j in 0..self.num_y {
                let solid = i == 0 || i == self.num_x - 1 || j == 0;
                let index = self.idx(i, j);
                self.s[index] = if solid { 0.0 } else { 1.0 };
            }
        }
    }

    fn wind_tunnel_walls(&mut self, inflow_velocity: Float, pipe_height: Float) {
        for i in 0..self.num_x {
            for j in 0..self.num_y {
                let solid = i == 0 || j == 0 || j == self.num_y - 1;
                let index = self.idx(i, j);
                self.s[index] = if solid { 0.0 } else { 1.0 };
                if i == 1 {
                    self.u[index] = inflow_velocity;
                }
            }
        }
        let num_y = self.num_y as Float;
        let pipe_cells = pipe_height * num_y;
        let min_j = (0.5 * num_y - 0.5 * pipe_cells).floor().max(0.0) as usize;
        let max_j = ((0.5 * num_y + 0.5 * pipe_cells).floor() as usize).min(self.num_y);
        for j in min_j..max_j {
            let index = self.idx(0, j);
            self.m[index] = 0.0;
        }
    }

    /// Moves `obstacle` to `(x, y)` and rasterises it into the interior cells.
    ///
    /// Interior cells are reset to fluid first, then every cell whose centre
    /// lies inside the circle becomes solid, receives `marker` and has its
    /// four face velocities set to the obstacle velocity. Border cells keep
    /// the classification written by the boundary layout. Returns the
    /// imparted velocity.
    pub fn place_obstacle(
        &mut self,
        obstacle: &mut Obstacle,
        x: Float,
        y: Float,
        dt: Float,
        reset: bool,
        marker: ObstacleMarker,
    ) -> Result<[Float; 2]> {
        if !reset && !(dt > 0.0 && dt.is_finite()) {
            return Err(FluidError::InvalidTimeStep(dt));
        }
        let [vx, vy] = obstacle.velocity_to(x, y, dt, reset);
        obstacle.x = x;
        obstacle.y = y;
        let marker = marker.value();
        for i in 1..self.num_x - 1 {
            for j in 1..self.num_y - 1 {
                let index = self.idx(i, j);
                self.s[index] = 1.0;
                if obstacle.contains(self.cell_center(i, j)) {
                    self.s[index] = 0.0;
                    self.m[index] = marker;
                    let right = self.idx(i + 1, j);
                    let top = self.idx(i, j + 1);
                    self.u[index] = vx;
                    self.u[right] = vx;
                    self.v[index] = vy;
                    self.v[top] = vy;
                }
            }
        }
        Ok([vx, vy])
    }
}
