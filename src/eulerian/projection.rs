use super::Grid;
use crate::global_variables::*;

impl Grid {
    /// Each fluid cell spreads its correction over the faces it shares with
    /// non-solid neighbours, weighted by their scale, so faces touching a
    /// solid cell are never corrected from that side. Cells enclosed by solids
    /// on all four sides are skipped. The applied corrections are accumulated
    /// into `p`, scaled by `density * h / dt`.
    pub fn solve_incompressibility(&mut self, num_iters: usize, dt: Float, over_relaxation: Float) {
        let cp = self.density * self.h / dt;

        for _ in 0..num_iters {
            for i in 1..self.num_x - 1 {
                for j in 1..self.num_y - 1 {
                    let center = self.idx(i, j);
                    if self.s[center] == 0.0 {
                        continue;
                    }

                    let left = self.idx(i - 1, j);
                    let right = self.idx(i + 1, j);
                    let bottom = self.idx(i, j - 1);
                    let top = self.idx(i, j + 1);

                    let sx0 = self.s[left];
                    let sx1 = self.s[right];
                    let sy0 = self.s[bottom];
                    let sy1 = self.s[top];
                    let s_count = sx0 + sx1 + sy0 + sy1;
                    if s_count == 0.0 {
                        continue;
                    }

                    let divergence =
                        self.u[right] - self.u[center] + self.v[top] - self.v[center];
                    let correction = over_relaxation * (-divergence / s_count);
                    self.p[center] += cp * correction;

                    self.u[center] -= sx0 * correction;
                    self.u[right] += sx1 * correction;
                    self.v[center] -= sy0 * correction;
                    self.v[top] += sy1 * correction;
                }
            }
        }
    }

    pub fn extrapolate(&mut self) {
        for i in 0..self.num_x {
            let bottom = self.idx(i, 0);
            let top = self.idx(i, self.num_y - 1);
            self.u[bottom] = self.u[self.idx(i, 1)];
            self.u[top] = self.u[self.idx(i, self.num_y - 2)];
        }
        for j in 0..self.num_y {
            let left = self.idx(0, j);
            let right = self.idx(self.num_x - 1, j);
            self.v[left] = self.v[self.idx(1, j)];
            self.v[right] = self.v[self.idx(self.num_x - 2, j)];
        }
    }

    /// Largest absolute divergence over the interior fluid cells that have at
    /// least one non-solid neighbour.
    pub fn max_divergence(&self) -> Float {
        self.interior_cells()
            .filter(|&(i, j)| self.s[self.idx(i, j)] != 0.0)
            .filter(|&(i, j)| {
                self.s[self.idx(i - 1, j)]
                    + self.s[self.idx(i + 1, j)]
                    + self.s[self.idx(i, j - 1)]
                    + self.s[self.idx(i, j + 1)]
                    > 0.0
            })
            .map(|(i, j)| self.divergence(i, j).abs())
            .fold(0.0, Float::max)
    }
}
