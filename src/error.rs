use crate::global_variables::Float;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FluidError {
    #[error("cell size must be positive and finite, got {0}")]
    InvalidCellSize(Float),

    #[error("grid must have more than 2 cells in each direction, got {num_x} x {num_y}")]
    InvalidDimensions { num_x: usize, num_y: usize },

    #[error("fluid density must be positive and finite, got {0}")]
    InvalidDensity(Float),

    #[error("the number of pressure iterations must be positive")]
    InvalidIterations,

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(Float),

    #[error("over-relaxation must lie in (0, 2], got {0}")]
    InvalidOverRelaxation(Float),

    #[error("obstacle radius must be positive and finite, got {0}")]
    InvalidObstacleRadius(Float),

    #[error("missing case parameter '{0}'")]
    MissingParameter(String),

    #[error("invalid value '{value}' for case parameter '{key}'")]
    InvalidParameter { key: String, value: String },

    #[error("unknown scene '{0}'")]
    UnknownScene(String),

    #[error("invalid write data mode '{0}'")]
    InvalidWriteDataMode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FluidError>;
