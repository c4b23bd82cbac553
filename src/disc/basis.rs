use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use statrs::function::gamma::gamma;

use crate::disc::gauss_points::get_jacobi_points_interval;
use crate::error::{DgError, Result};

pub mod lagrange1d;
pub mod quadrilateral;
pub mod triangle;

/// Orthonormal polynomial machinery shared by the nodal bases. A nodal basis
/// evaluated at points `x` is `V(x) * V(nodes)^-1`.
pub trait Basis {
    fn jacobi_gauss_lobatto(alpha: f64, beta: f64, n: usize) -> Array1<f64> {
        let mut x = Array1::<f64>::zeros(n + 1);
        x[0] = -1.0;
        x[n] = 1.0;
        if n > 1 {
            let (interior, _) = get_jacobi_points_interval(alpha + 1.0, beta + 1.0, n - 1);
            for (i, &xi) in interior.iter().enumerate() {
                x[i + 1] = xi;
            }
        }
        x
    }
    /// Normalised Jacobi polynomial P_n^(alpha, beta), three-term recurrence.
    fn jacobi_polynomial(x: ArrayView1<f64>, alpha: f64, beta: f64, n: i32) -> Array1<f64> {
        let gamma0 = 2.0_f64.powf(alpha + beta + 1.0) / (alpha + beta + 1.0)
            * gamma(alpha + 1.0)
            * gamma(beta + 1.0)
            / gamma(alpha + beta + 1.0);
        let p0 = Array1::from_elem(x.len(), 1.0 / gamma0.sqrt());
        if n == 0 {
            return p0;
        }
        let gamma1 = (alpha + 1.0) * (beta + 1.0) / (alpha + beta + 3.0) * gamma0;
        let mut p1 = ((alpha + beta + 2.0) * &x * 0.5 + (alpha - beta) * 0.5) / gamma1.sqrt();
        if n == 1 {
            return p1;
        }
        let mut pm1 = p0;
        let mut a_old = 2.0 / (2.0 + alpha + beta)
            * ((alpha + 1.0) * (beta + 1.0) / (alpha + beta + 3.0)).sqrt();
        for i in 1..n {
            let i_f = i as f64;
            let h1 = 2.0 * i_f + alpha + beta;
            let a_new = 2.0 / (h1 + 2.0)
                * ((i_f + 1.0) * (i_f + 1.0 + alpha + beta) * (i_f + 1.0 + alpha)
                    * (i_f + 1.0 + beta)
                    / (h1 + 1.0)
                    / (h1 + 3.0))
                    .sqrt();
            let b_new = -(alpha * alpha - beta * beta) / h1 / (h1 + 2.0);
            let p_next = ((&x - b_new) * &p1 - a_old * &pm1) / a_new;
            pm1 = p1;
            p1 = p_next;
            a_old = a_new;
        }
        p1
    }
    fn grad_jacobi_polynomial(r: ArrayView1<f64>, alpha: f64, beta: f64, n: i32) -> Array1<f64> {
        if n == 0 {
            return Array1::zeros(r.len());
        }
        let pn = Self::jacobi_polynomial(r, alpha + 1.0, beta + 1.0, n - 1);
        let n = n as f64;
        (n * (n + alpha + beta + 1.0)).sqrt() * pn
    }
    fn vandermonde2d(n: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64>;
    fn grad_vandermonde_2d(
        n: usize,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
    ) -> (Array2<f64>, Array2<f64>);
    fn nodes2d(n: usize) -> (Array1<f64>, Array1<f64>);
}

pub fn to_dmatrix(a: ArrayView2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

pub fn invert(a: ArrayView2<f64>, what: &'static str) -> Result<Array2<f64>> {
    to_dmatrix(a)
        .try_inverse()
        .map(|inv| from_dmatrix(&inv))
        .ok_or(DgError::SingularMatrix(what))
}
