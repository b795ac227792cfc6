pub mod error;
pub mod eulerian;
pub mod global_variables;
pub mod io;
pub mod post;

pub use error::{FluidError, Result};
pub use eulerian::{
    BoundaryLayout, Field, Grid, Obstacle, ObstacleMarker, Scene, SceneKind, SceneSetup,
    StepParameters,
};
pub use global_variables::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum NodeType {
    Fluid = 0,
    Solid = 1,
}

impl NodeType {
    pub fn from_scale(s: Float) -> Self {
        if s == 0.0 {
            NodeType::Solid
        } else {
            NodeType::Fluid
        }
    }

    pub fn scale(self) -> Float {
        match self {
            NodeType::Fluid => 1.0,
            NodeType::Solid => 0.0,
        }
    }
}
