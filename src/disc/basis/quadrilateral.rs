use ndarray::{Array1, Array2, ArrayView1};

use crate::disc::basis::{Basis, invert};
use crate::error::Result;

/// Tensor-product nodal basis on [-1, 1]^2 with Lobatto nodes.
#[derive(Clone, Debug)]
pub struct QuadrilateralBasis {
    pub n: usize,
    pub r: Array1<f64>,
    pub s: Array1<f64>,
    pub vandermonde: Array2<f64>,
    pub inv_vandermonde: Array2<f64>,
}

impl QuadrilateralBasis {
    pub fn new(n: usize) -> Result<Self> {
        let (r, s) = Self::nodes2d(n);
        let vandermonde = Self::vandermonde2d(n, r.view(), s.view());
        let inv_vandermonde = invert(vandermonde.view(), "quadrilateral vandermonde")?;
        Ok(Self {
            n,
            r,
            s,
            vandermonde,
            inv_vandermonde,
        })
    }
    pub fn basis_num(&self) -> usize {
        (self.n + 1) * (self.n + 1)
    }
    pub fn evaluate_basis(&self, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64> {
        Self::vandermonde2d(self.n, r, s).dot(&self.inv_vandermonde)
    }
    pub fn evaluate_grad_basis(
        &self,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
    ) -> (Array2<f64>, Array2<f64>) {
        let (vr, vs) = Self::grad_vandermonde_2d(self.n, r, s);
        (vr.dot(&self.inv_vandermonde), vs.dot(&self.inv_vandermonde))
    }
    fn ortho_basis_ij(r: ArrayView1<f64>, s: ArrayView1<f64>, i: i32, j: i32) -> Array1<f64> {
        let p_i_r = Self::jacobi_polynomial(r, 0.0, 0.0, i);
        let p_j_s = Self::jacobi_polynomial(s, 0.0, 0.0, j);
        &p_i_r * &p_j_s
    }
}
impl Basis for QuadrilateralBasis {
    fn vandermonde2d(n: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64> {
        let n_basis_1d = n + 1;
        let mut v = Array2::zeros((r.len(), n_basis_1d * n_basis_1d));
        let mut sk = 0;
        for i in 0..n_basis_1d {
            for j in 0..n_basis_1d {
                v.column_mut(sk)
                    .assign(&Self::ortho_basis_ij(r, s, i as i32, j as i32));
                sk += 1;
            }
        }
        v
    }
    fn nodes2d(n: usize) -> (Array1<f64>, Array1<f64>) {
        let n_pts_1d = n + 1;
        let mut r = Array1::<f64>::zeros(n_pts_1d * n_pts_1d);
        let mut s = Array1::<f64>::zeros(n_pts_1d * n_pts_1d);
        let zeta = Self::jacobi_gauss_lobatto(0.0, 0.0, n);
        let mut sk = 0;
        for i in 0..n_pts_1d {
            for j in 0..n_pts_1d {
                r[sk] = zeta[j];
                s[sk] = zeta[i];
                sk += 1;
            }
        }
        (r, s)
    }
    fn grad_vandermonde_2d(
        n: usize,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
    ) -> (Array2<f64>, Array2<f64>) {
        let n_basis_1d = n + 1;
        let mut vr = Array2::zeros((r.len(), n_basis_1d * n_basis_1d));
        let mut vs = Array2::zeros((r.len(), n_basis_1d * n_basis_1d));
        let mut sk = 0;
        for i in 0..n_basis_1d {
            let p_i_r = Self::jacobi_polynomial(r, 0.0, 0.0, i as i32);
            let dp_i_r = Self::grad_jacobi_polynomial(r, 0.0, 0.0, i as i32);
            for j in 0..n_basis_1d {
                let p_j_s = Self::jacobi_polynomial(s, 0.0, 0.0, j as i32);
                let dp_j_s = Self::grad_jacobi_polynomial(s, 0.0, 0.0, j as i32);
                vr.column_mut(sk).assign(&(&dp_i_r * &p_j_s));
                vs.column_mut(sk).assign(&(&p_i_r * &dp_j_s));
                sk += 1;
            }
        }
        (vr, vs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_kronecker_delta() {
        let basis = QuadrilateralBasis::new(3).unwrap();
        let phi = basis.evaluate_basis(basis.r.view(), basis.s.view());
        for i in 0..basis.basis_num() {
            for j in 0..basis.basis_num() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(phi[[i, j]], expected, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_gradient_of_bilinear_function() {
        // f(r, s) = r * s + r
        let basis = QuadrilateralBasis::new(2).unwrap();
        let f = &basis.r * &basis.s + &basis.r;
        let r = array![0.3, -0.7];
        let s = array![-0.2, 0.5];
        let (dr, ds) = basis.evaluate_grad_basis(r.view(), s.view());
        let dfdr = dr.dot(&f);
        let dfds = ds.dot(&f);
        for i in 0..r.len() {
            assert_relative_eq!(dfdr[i], s[i] + 1.0, epsilon = 1e-10);
            assert_relative_eq!(dfds[i], r[i], epsilon = 1e-10);
        }
    }
}
