use ndarray::{Array1, Array2, ArrayView1};

use crate::disc::gauss_points::get_lobatto_points_interval;

/// Lagrange basis on [-1, 1] through the Lobatto points.
#[derive(Clone, Debug)]
pub struct LobattoBasis {
    pub n: usize,
    pub xi: Array1<f64>,
}

impl LobattoBasis {
    pub fn new(n: usize) -> Self {
        let (xi, _) = get_lobatto_points_interval(n + 1);
        Self { n, xi }
    }
    pub fn basis_num(&self) -> usize {
        self.n + 1
    }
    pub fn evaluate_basis_at(&self, i: usize, x: f64) -> f64 {
        let x_i = self.xi[i];
        let mut result = 1.0;
        for (j, &x_j) in self.xi.iter().enumerate() {
            if j != i {
                result *= (x - x_j) / (x_i - x_j);
            }
        }
        result
    }
    pub fn evaluate_grad_basis_at(&self, i: usize, x: f64) -> f64 {
        let dofs = self.xi.len();
        let mut sum = 0.0;
        for l in 0..dofs {
            if l == i {
                continue;
            }
            let mut product = 1.0;
            for m in 0..dofs {
                if m != i && m != l {
                    product *= (x - self.xi[m]) / (self.xi[i] - self.xi[m]);
                }
            }
            sum += product / (self.xi[i] - self.xi[l]);
        }
        sum
    }
    /// Basis values at `x`, shape (points, basis).
    pub fn evaluate_basis(&self, x: ArrayView1<f64>) -> Array2<f64> {
        Array2::from_shape_fn((x.len(), self.basis_num()), |(q, i)| {
            self.evaluate_basis_at(i, x[q])
        })
    }
    pub fn evaluate_grad_basis(&self, x: ArrayView1<f64>) -> Array2<f64> {
        Array2::from_shape_fn((x.len(), self.basis_num()), |(q, i)| {
            self.evaluate_grad_basis_at(i, x[q])
        })
    }
}
