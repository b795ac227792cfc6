use super::Grid;
use crate::error::{FluidError, Result};
use crate::global_variables::*;
use std::time::{Duration, Instant};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct StepParameters {
    pub dt: Float,
    pub gravity: Float,
    pub num_iters: usize,
    pub over_relaxation: Float,
}

impl StepParameters {
    pub fn new(dt: Float, gravity: Float, num_iters: usize, over_relaxation: Float) -> Result<Self> {
        let parameters = Self {
            dt,
            gravity,
            num_iters,
            over_relaxation,
        };
        parameters.validate()?;
        Ok(parameters)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(FluidError::InvalidTimeStep(self.dt));
        }
        if self.num_iters == 0 {
            return Err(FluidError::InvalidIterations);
        }
        if !(self.over_relaxation > 0.0 && self.over_relaxation <= 2.0) {
            return Err(FluidError::InvalidOverRelaxation(self.over_relaxation));
        }
        Ok(())
    }
}

impl Default for StepParameters {
    fn default() -> Self {
        Self {
            dt: DELTA_T,
            gravity: GRAVITY,
            num_iters: NUM_ITERS,
            over_relaxation: OVER_RELAXATION,
        }
    }
}

impl Grid {
    /// Adds `gravity * dt` to every vertical velocity sample between two
    /// non-solid cells.
    pub fn integrate(&mut self, dt: Float, gravity: Float) {
        for i in 1..self.num_x {
            for j in 1..self.num_y - 1 {
                let index = self.idx(i, j);
                if self.s[index] != 0.0 && self.s[self.idx(i, j - 1)] != 0.0 {
                    self.v[index] += gravity * dt;
                }
            }
        }
    }

    /// Advances the simulation by `parameters.dt`.
    ///
    /// Body forces, pressure reset, projection, extrapolation and advection
    /// run in this order. The parameters are validated before the grid is
    /// touched, so a rejected step leaves the state unchanged.
    pub fn step(&mut self, parameters: &StepParameters) -> Result<()> {
        self.step_timed(parameters, |_, _| {})
    }

    pub fn step_timed<F>(&mut self, parameters: &StepParameters, mut record: F) -> Result<()>
    where
        F: FnMut(&'static str, Duration),
    {
        parameters.validate()?;
        let StepParameters {
            dt,
            gravity,
            num_iters,
            over_relaxation,
        } = *parameters;

        let i_time = Instant::now();
        self.integrate(dt, gravity);
        record("i", i_time.elapsed());

        let si_time = Instant::now();
        self.p.fill(0.0);
        self.solve_incompressibility(num_iters, dt, over_relaxation);
        record("si", si_time.elapsed());

        let e_time = Instant::now();
        self.extrapolate();
        record("e", e_time.elapsed());

        let av_time = Instant::now();
        self.advect_velocity(dt);
        record("av", av_time.elapsed());

        let am_time = Instant::now();
        self.advect_marker(dt);
        record("am", am_time.elapsed());

        log::debug!(
            "step dt = {dt:.4e}: max divergence {:.4e}",
            self.max_divergence()
        );
        Ok(())
    }
}
