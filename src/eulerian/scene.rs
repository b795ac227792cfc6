use super::{BoundaryLayout, Grid, Obstacle, ObstacleMarker, StepParameters};
use crate::error::{FluidError, Result};
use crate::global_variables::*;
use std::fmt;
use std::time::Duration;
use std::str::FromStr;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneKind {
    Tank,
    WindTunnel,
    HighResWindTunnel,
    Paint,
}

impl FromStr for SceneKind {
    type Err = FluidError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tank" => Ok(SceneKind::Tank),
            "wind_tunnel" => Ok(SceneKind::WindTunnel),
            "high_res_wind_tunnel" => Ok(SceneKind::HighResWindTunnel),
            "paint" => Ok(SceneKind::Paint),
            _ => Err(FluidError::UnknownScene(s.to_string())),
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneKind::Tank => "tank",
            SceneKind::WindTunnel => "wind_tunnel",
            SceneKind::HighResWindTunnel => "high_res_wind_tunnel",
            SceneKind::Paint => "paint",
        };
        write!(f, "{name}")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneSetup {
    pub kind: SceneKind,
    pub resolution: usize,
    pub aspect_ratio: usize,
    pub sim_height: Float,
    pub density: Float,
    pub parameters: StepParameters,
    pub obstacle_radius: Float,
    /// Initial obstacle position, `None` keeps the obstacle out of the fluid.
    pub obstacle_position: Option<[Float; 2]>,
    pub inflow_velocity: Float,
    pub pipe_height: Float,
    pub paint_pulse_rate: Float,
}

impl SceneSetup {
    pub fn for_kind(kind: SceneKind) -> Self {
        let mut setup = Self {
            kind,
            resolution: RESOLUTION,
            aspect_ratio: ASPECT_RATIO,
            sim_height: SIM_HEIGHT,
            density: DENSITY,
            parameters: StepParameters::default(),
            obstacle_radius: OBSTACLE_RADIUS,
            obstacle_position: None,
            inflow_velocity: INFLOW_VELOCITY,
            pipe_height: PIPE_HEIGHT,
            paint_pulse_rate: PAINT_PULSE_RATE,
        };
        match kind {
            SceneKind::Tank => {}
            SceneKind::WindTunnel => {
                setup.parameters.gravity = 0.0;
                setup.obstacle_position = Some(OBSTACLE_POSITION);
            }
            SceneKind::HighResWindTunnel => {
                setup.resolution = HIGH_RES_RESOLUTION;
                setup.parameters.gravity = 0.0;
                setup.parameters.dt = HIGH_RES_DELTA_T;
                setup.parameters.num_iters = HIGH_RES_NUM_ITERS;
                setup.obstacle_position = Some(OBSTACLE_POSITION);
            }
            SceneKind::Paint => {
                setup.parameters.gravity = 0.0;
                setup.parameters.over_relaxation = 1.0;
                setup.obstacle_radius = PAINT_OBSTACLE_RADIUS;
            }
        }
        setup
    }

    pub fn num_x(&self) -> usize {
        self.aspect_ratio * self.resolution
    }

    pub fn num_y(&self) -> usize {
        self.resolution
    }

    pub fn h(&self) -> Float {
        self.sim_height / self.resolution as Float
    }

    pub fn boundary_layout(&self) -> BoundaryLayout {
        match self.kind {
            SceneKind::Tank => BoundaryLayout::Tank,
            SceneKind::WindTunnel | SceneKind::HighResWindTunnel => BoundaryLayout::WindTunnel {
                inflow_velocity: self.inflow_velocity,
                pipe_height: self.pipe_height,
            },
            SceneKind::Paint => BoundaryLayout::Open,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub setup: SceneSetup,
    pub grid: Grid,
    pub obstacle: Obstacle,
    pub frame_nr: usize,
    obstacle_placed: bool,
}

impl Scene {
    pub fn setup(setup: SceneSetup) -> Result<Self> {
        setup.parameters.validate()?;
        if setup.resolution == 0 {
            return Err(FluidError::InvalidDimensions {
                num_x: setup.num_x(),
                num_y: setup.num_y(),
            });
        }
        let mut grid = Grid::new(setup.density, setup.num_x(), setup.num_y(), setup.h())?;
        grid.apply_boundary_layout(&setup.boundary_layout());
        let obstacle = Obstacle::new(setup.obstacle_radius)?;
        let mut scene = Self {
            setup,
            grid,
            obstacle,
            frame_nr: 0,
            obstacle_placed: false,
        };
        if let Some([x, y]) = scene.setup.obstacle_position {
            scene.set_obstacle(x, y, true)?;
        }
        log::info!(
            "{} scene: {} x {} cells, h = {:.4e}",
            scene.setup.kind,
            scene.grid.num_x,
            scene.grid.num_y,
            scene.grid.h
        );
        Ok(scene)
    }

    pub fn obstacle_marker(&self) -> ObstacleMarker {
        match self.setup.kind {
            SceneKind::Paint => ObstacleMarker::Pulse {
                phase: self.setup.paint_pulse_rate * self.frame_nr as Float,
            },
            _ => ObstacleMarker::Clear,
        }
    }

    pub fn has_obstacle(&self) -> bool {
        self.obstacle_placed
    }

    /// Places the obstacle at `(x, y)` in simulation space. The first
    /// placement is always a reset, since there is no previous position to
    /// move from.
    pub fn set_obstacle(&mut self, x: Float, y: Float, reset: bool) -> Result<[Float; 2]> {
        let marker = self.obstacle_marker();
        let velocity = self.grid.place_obstacle(
            &mut self.obstacle,
            x,
            y,
            self.setup.parameters.dt,
            reset || !self.obstacle_placed,
            marker,
        )?;
        self.obstacle_placed = true;
        Ok(velocity)
    }

    pub fn simulate(&mut self) -> Result<()> {
        self.simulate_timed(|_, _| {})
    }

    pub fn simulate_timed<F>(&mut self, record: F) -> Result<()>
    where
        F: FnMut(&'static str, Duration),
    {
        self.grid.step_timed(&self.setup.parameters, record)?;
        self.frame_nr += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeType;

    #[test]
    fn scene_names_parse() {
        for kind in [
            SceneKind::Tank,
            SceneKind::WindTunnel,
            SceneKind::HighResWindTunnel,
            SceneKind::Paint,
        ] {
            assert_eq!(kind.to_string().parse::<SceneKind>().unwrap(), kind);
        }
        assert!(matches!(
            "vortex".parse::<SceneKind>(),
            Err(FluidError::UnknownScene(_))
        ));
    }

    #[test]
    fn tank_preset() {
        let scene = Scene::setup(SceneSetup::for_kind(SceneKind::Tank)).unwrap();
        assert_eq!((scene.grid.num_x, scene.grid.num_y), (100, 50));
        assert!((scene.grid.h - 0.02).abs() < 1e-15);
        assert_eq!(scene.setup.parameters.gravity, GRAVITY);
        assert_eq!(scene.grid.cell_type(0, 25), NodeType::Solid);
        assert_eq!(scene.grid.cell_type(50, 49), NodeType::Fluid);
    }

    #[test]
    fn wind_tunnel_preset_places_obstacle_without_gravity() {
        let scene = Scene::setup(SceneSetup::for_kind(SceneKind::WindTunnel)).unwrap();
        assert_eq!(scene.setup.parameters.gravity, 0.0);
        assert_eq!((scene.obstacle.x, scene.obstacle.y), (0.4, 0.5));
        // Cell centred at (0.41, 0.49) lies inside the obstacle.
        assert_eq!(scene.grid.cell_type(20, 24), NodeType::Solid);
        assert_eq!(scene.grid.u(20, 24), 0.0);
    }

    #[test]
    fn high_res_wind_tunnel_preset() {
        let setup = SceneSetup::for_kind(SceneKind::HighResWindTunnel);
        assert_eq!((setup.num_x(), setup.num_y()), (400, 200));
        assert_eq!(setup.parameters.num_iters, HIGH_RES_NUM_ITERS);
        assert_eq!(setup.parameters.dt, HIGH_RES_DELTA_T);
    }

    #[test]
    fn paint_obstacle_paints_a_pulse() {
        let mut setup = SceneSetup::for_kind(SceneKind::Paint);
        setup.resolution = 20;
        let mut scene = Scene::setup(setup).unwrap();
        assert_eq!(scene.setup.parameters.over_relaxation, 1.0);
        scene.set_obstacle(0.5, 0.5, true).unwrap();
        let (i, j) = (9, 9);
        assert_eq!(scene.grid.cell_type(i, j), NodeType::Solid);
        assert_eq!(scene.grid.m(i, j), 0.5);
        scene.simulate().unwrap();
        scene.set_obstacle(0.5, 0.5, false).unwrap();
        let expected = 0.5 + 0.5 * (PAINT_PULSE_RATE).sin();
        assert!((scene.grid.m(i, j) - expected).abs() < 1e-12);
    }

    #[test]
    fn first_placement_carries_no_velocity() {
        let mut setup = SceneSetup::for_kind(SceneKind::Tank);
        setup.resolution = 20;
        let mut scene = Scene::setup(setup).unwrap();
        assert!(!scene.has_obstacle());
        let velocity = scene.set_obstacle(0.5, 0.5, false).unwrap();
        assert_eq!(velocity, [0.0, 0.0]);
        assert!(scene.has_obstacle());
        assert_eq!(scene.grid.u(10, 10), 0.0);
    }

    #[test]
    fn simulate_advances_the_frame_counter() {
        let mut setup = SceneSetup::for_kind(SceneKind::Tank);
        setup.resolution = 10;
        let mut scene = Scene::setup(setup).unwrap();
        scene.simulate().unwrap();
        scene.simulate().unwrap();
        assert_eq!(scene.frame_nr, 2);
    }

    #[test]
    fn invalid_setup_fails_before_building_the_grid() {
        let mut setup = SceneSetup::for_kind(SceneKind::Tank);
        setup.parameters.num_iters = 0;
        assert!(matches!(
            Scene::setup(setup),
            Err(FluidError::InvalidIterations)
        ));
        let mut setup = SceneSetup::for_kind(SceneKind::Tank);
        setup.resolution = 2;
        assert!(matches!(
            Scene::setup(setup),
            Err(FluidError::InvalidDimensions { .. })
        ));
    }
}
