use crate::error::{FluidError, Result};
use crate::global_variables::*;
use crate::NodeType;

/// Staggered (MAC) grid holding the whole state of a simulation.
///
/// Every array has `num_x * num_y` entries and the cell `(i, j)` lives at the
/// linear index `i * num_y + j`. The horizontal velocity `u[(i, j)]` is stored
/// on the left face of the cell and the vertical velocity `v[(i, j)]` on its
/// bottom face.
#[derive(Clone, Debug)]
pub struct Grid {
    pub density: Float,
    pub num_x: usize,
    pub num_y: usize,
    pub h: Float,
    pub u: Vec<Float>,
    pub v: Vec<Float>,
    pub p: Vec<Float>,
    pub s: Vec<Float>,
    pub m: Vec<Float>,
    pub(crate) new_u: Vec<Float>,
    pub(crate) new_v: Vec<Float>,
    pub(crate) new_m: Vec<Float>,
}

impl Grid {
    pub fn new(density: Float, num_x: usize, num_y: usize, h: Float) -> Result<Self> {
        if !(h > 0.0 && h.is_finite()) {
            return Err(FluidError::InvalidCellSize(h));
        }
        if num_x <= 2 || num_y <= 2 {
            return Err(FluidError::InvalidDimensions { num_x, num_y });
        }
        if !(density > 0.0 && density.is_finite()) {
            return Err(FluidError::InvalidDensity(density));
        }
        let num_cells = num_x * num_y;
        Ok(Self {
            density,
            num_x,
            num_y,
            h,
            u: vec![0.0; num_cells],
            v: vec![0.0; num_cells],
            p: vec![0.0; num_cells],
            s: vec![0.0; num_cells],
            m: vec![1.0; num_cells],
            new_u: vec![0.0; num_cells],
            new_v: vec![0.0; num_cells],
            new_m: vec![0.0; num_cells],
        })
    }

    pub fn num_cells(&self) -> usize {
        self.num_x * self.num_y
    }

    /// Linear index of `(i, j)`. Panics when either coordinate is out of range.
    pub fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.num_x && j < self.num_y,
            "cell ({i}, {j}) outside of a {} x {} grid",
            self.num_x,
            self.num_y
        );
        i * self.num_y + j
    }

    /// Unchecked in release builds; only used by loops whose bounds are derived
    /// from the grid dimensions.
    #[inline]
    pub(crate) fn idx(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.num_x && j < self.num_y);
        i * self.num_y + j
    }

    pub fn u(&self, i: usize, j: usize) -> Float {
        self.u[self.index(i, j)]
    }

    pub fn v(&self, i: usize, j: usize) -> Float {
        self.v[self.index(i, j)]
    }

    pub fn p(&self, i: usize, j: usize) -> Float {
        self.p[self.index(i, j)]
    }

    pub fn s(&self, i: usize, j: usize) -> Float {
        self.s[self.index(i, j)]
    }

    pub fn m(&self, i: usize, j: usize) -> Float {
        self.m[self.index(i, j)]
    }

    pub fn set_u(&mut self, i: usize, j: usize, value: Float) {
        let index = self.index(i, j);
        self.u[index] = value;
    }

    pub fn set_v(&mut self, i: usize, j: usize, value: Float) {
        let index = self.index(i, j);
        self.v[index] = value;
    }

    pub fn set_m(&mut self, i: usize, j: usize, value: Float) {
        let index = self.index(i, j);
        self.m[index] = value;
    }

    pub fn set_node_type(&mut self, i: usize, j: usize, node_type: NodeType) {
        let index = self.index(i, j);
        self.s[index] = node_type.scale();
    }

    pub fn cell_type(&self, i: usize, j: usize) -> NodeType {
        NodeType::from_scale(self.s(i, j))
    }

    /// Net outflow of the cell `(i, j)`; needs a right and a top neighbour.
    pub fn divergence(&self, i: usize, j: usize) -> Float {
        assert!(i + 1 < self.num_x && j + 1 < self.num_y);
        self.u[self.idx(i + 1, j)] - self.u[self.idx(i, j)] + self.v[self.idx(i, j + 1)]
            - self.v[self.idx(i, j)]
    }

    pub fn width(&self) -> Float {
        self.num_x as Float * self.h
    }

    pub fn height(&self) -> Float {
        self.num_y as Float * self.h
    }

    pub fn cell_center(&self, i: usize, j: usize) -> [Float; 2] {
        [
            (i as Float + 0.5) * self.h,
            (j as Float + 0.5) * self.h,
        ]
    }

    pub fn interior_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..self.num_x - 1).flat_map(move |i| (1..self.num_y - 1).map(move |j| (i, j)))
    }

    pub fn fluid_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.num_x)
            .flat_map(move |i| (0..self.num_y).map(move |j| (i, j)))
            .filter(move |&(i, j)| self.s[self.idx(i, j)] != 0.0)
    }
}
