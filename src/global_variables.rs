pub const CASE_NAME: &'static str = "Case Test";

pub type Float = f64;

pub const DENSITY: Float = 1000.0;

pub const DELTA_T: Float = 1.0 / 60.0;

pub const HIGH_RES_DELTA_T: Float = 1.0 / 120.0;

pub const GRAVITY: Float = -9.81;

pub const NUM_ITERS: usize = 40;

pub const HIGH_RES_NUM_ITERS: usize = 100;

pub const OVER_RELAXATION: Float = 1.9;

pub const SIM_HEIGHT: Float = 1.0;

pub const ASPECT_RATIO: usize = 2;

pub const RESOLUTION: usize = 50;

pub const HIGH_RES_RESOLUTION: usize = 200;

pub const OBSTACLE_RADIUS: Float = 0.15;

pub const PAINT_OBSTACLE_RADIUS: Float = 0.1;

pub const OBSTACLE_POSITION: [Float; 2] = [0.4, 0.5];

pub const INFLOW_VELOCITY: Float = 2.0;

pub const PIPE_HEIGHT: Float = 0.1;

pub const PAINT_PULSE_RATE: Float = 0.1;

pub const MAX_STEPS: usize = 600;

pub const STREAMLINE_SEGMENTS: usize = 15;

pub const STREAMLINE_STEP_SCALE: Float = 0.01;
