use std::f64::consts::PI;

use ndarray::{Array1, Array2, ArrayView1};

use crate::disc::basis::{Basis, invert};
use crate::error::Result;

/// Nodal Lagrange basis on the reference triangle (-1,-1), (1,-1), (-1,1),
/// with warp & blend interpolation nodes.
#[derive(Clone, Debug)]
pub struct TriangleBasis {
    pub n: usize,
    pub r: Array1<f64>,
    pub s: Array1<f64>,
    pub vandermonde: Array2<f64>,
    pub inv_vandermonde: Array2<f64>,
}
impl TriangleBasis {
    pub fn new(n: usize) -> Result<Self> {
        let (x, y) = Self::nodes2d(n);
        let (r, s) = Self::xy_to_rs(x.view(), y.view());
        let vandermonde = Self::vandermonde2d(n, r.view(), s.view());
        let inv_vandermonde = invert(vandermonde.view(), "triangle vandermonde")?;
        Ok(Self {
            n,
            r,
            s,
            vandermonde,
            inv_vandermonde,
        })
    }
    pub fn basis_num(&self) -> usize {
        (self.n + 1) * (self.n + 2) / 2
    }
    /// Nodal basis values at points (r, s), shape (points, basis).
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
    fn rs_to_ab(r: ArrayView1<f64>, s: ArrayView1<f64>) -> (Array1<f64>, Array1<f64>) {
        let a = r
            .iter()
            .zip(s.iter())
            .map(|(&r_val, &s_val)| {
                if (1.0 - s_val).abs() > 1.0e-14 {
                    2.0 * (1.0 + r_val) / (1.0 - s_val) - 1.0
                } else {
                    -1.0
                }
            })
            .collect::<Array1<f64>>();
        let b = s.to_owned();
        (a, b)
    }
    fn dubiner_basis(a: ArrayView1<f64>, b: ArrayView1<f64>, i: i32, j: i32) -> Array1<f64> {
        2.0_f64.sqrt()
            * Self::jacobi_polynomial(a, 0.0, 0.0, i)
            * Self::jacobi_polynomial(b, 2.0 * i as f64 + 1.0, 0.0, j)
            * (1.0 - &b).powi(i)
    }
    /// 1D warp from equidistant to Lobatto nodes, divided by the edge blend.
    fn warp_factor(n: usize, r: ArrayView1<f64>) -> Array1<f64> {
        let lglr = Self::jacobi_gauss_lobatto(0.0, 0.0, n);
        let req = Array1::linspace(-1.0, 1.0, n + 1);
        r.mapv(|x| {
            let mut warp = 0.0;
            for i in 0..n + 1 {
                let mut l = 1.0;
                for j in 0..n + 1 {
                    if j != i {
                        l *= (x - req[j]) / (req[i] - req[j]);
                    }
                }
                warp += l * (lglr[i] - req[i]);
            }
            if x.abs() < 1.0 - 1.0e-10 {
                warp / (1.0 - x * x)
            } else {
                0.0
            }
        })
    }
    fn xy_to_rs(x: ArrayView1<f64>, y: ArrayView1<f64>) -> (Array1<f64>, Array1<f64>) {
        let l1 = (3.0_f64.sqrt() * &y + 1.0) / 3.0;
        let l2 = (-3.0 * &x - 3.0_f64.sqrt() * &y + 2.0) / 6.0;
        let l3 = (3.0 * &x - 3.0_f64.sqrt() * &y + 2.0) / 6.0;
        let r = -&l2 + &l3 - &l1;
        let s = -&l2 - &l3 + &l1;
        (r, s)
    }
    fn grad_simplex_2d(
        a: ArrayView1<f64>,
        b: ArrayView1<f64>,
        id: i32,
        jd: i32,
    ) -> (Array1<f64>, Array1<f64>) {
        let fa = Self::jacobi_polynomial(a, 0.0, 0.0, id);
        let gb = Self::jacobi_polynomial(b, 2.0 * id as f64 + 1.0, 0.0, jd);
        let dfa = Self::grad_jacobi_polynomial(a, 0.0, 0.0, id);
        let dgb = Self::grad_jacobi_polynomial(b, 2.0 * id as f64 + 1.0, 0.0, jd);
        let mut dmode_dr = &dfa * &gb;
        if id > 0 {
            dmode_dr = (0.5 * (1.0 - &b)).powi(id - 1) * &dmode_dr;
        }
        let mut dmode_ds = &dfa * (&gb * (0.5 * (1.0 + &a)));
        if id > 0 {
            dmode_ds = (0.5 * (1.0 - &b)).powi(id - 1) * &dmode_ds;
        }
        let mut tmp = &dgb * ((0.5 * (1.0 - &b)).powi(id));
        if id > 0 {
            tmp = tmp - 0.5 * id as f64 * &gb * ((0.5 * (1.0 - &b)).powi(id - 1));
        }
        dmode_ds = dmode_ds + &fa * &tmp;
        dmode_dr = dmode_dr * 2.0_f64.powf(id as f64 + 0.5);
        dmode_ds = dmode_ds * 2.0_f64.powf(id as f64 + 0.5);

        (dmode_dr, dmode_ds)
    }
}
impl Basis for TriangleBasis {
    fn vandermonde2d(n: usize, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64> {
        let mut v = Array2::<f64>::zeros((r.len(), (n + 1) * (n + 2) / 2));
        let (a, b) = Self::rs_to_ab(r, s);
        let mut sk: usize = 0;
        for i in 0..n + 1 {
            for j in 0..n + 1 - i {
                v.column_mut(sk).assign(&Self::dubiner_basis(
                    a.view(),
                    b.view(),
                    i as i32,
                    j as i32,
                ));
                sk += 1;
            }
        }
        v
    }
    fn grad_vandermonde_2d(
        n: usize,
        r: ArrayView1<f64>,
        s: ArrayView1<f64>,
    ) -> (Array2<f64>, Array2<f64>) {
        let mut v2dr = Array2::<f64>::zeros((r.len(), (n + 1) * (n + 2) / 2));
        let mut v2ds = Array2::<f64>::zeros((r.len(), (n + 1) * (n + 2) / 2));
        let (a, b) = Self::rs_to_ab(r, s);
        let mut sk: usize = 0;
        for i in 0..n + 1 {
            for j in 0..n + 1 - i {
                let (v2dr_col, v2ds_col) =
                    Self::grad_simplex_2d(a.view(), b.view(), i as i32, j as i32);
                v2dr.column_mut(sk).assign(&v2dr_col);
                v2ds.column_mut(sk).assign(&v2ds_col);
                sk += 1;
            }
        }
        (v2dr, v2ds)
    }
    fn nodes2d(n: usize) -> (Array1<f64>, Array1<f64>) {
        let alpopt = [
            0.0000, 0.0000, 1.4152, 0.1001, 0.2751, 0.9800, 1.0999, 1.2832, 1.3648, 1.4773, 1.4959,
            1.5743, 1.5770, 1.6223, 1.6258,
        ];
        let alpha = if (1..16).contains(&n) {
            alpopt[n - 1]
        } else {
            5.0 / 3.0
        };
        let np = (n + 1) * (n + 2) / 2;

        let mut l1 = Array1::<f64>::zeros(np);
        let mut l2 = Array1::<f64>::zeros(np);
        let mut l3 = Array1::<f64>::zeros(np);
        let mut sk: usize = 0;
        for i in 0..n + 1 {
            for j in 0..n + 1 - i {
                l1[sk] = i as f64 / n as f64;
                l3[sk] = j as f64 / n as f64;
                l2[sk] = 1.0 - l1[sk] - l3[sk];
                sk += 1;
            }
        }
        let x = -&l2 + &l3;
        let y = (-&l2 - &l3 + 2.0 * &l1) / 3.0_f64.sqrt();

        let blend1 = 4.0 * &l2 * &l3;
        let blend2 = 4.0 * &l1 * &l3;
        let blend3 = 4.0 * &l1 * &l2;

        let warpf1 = Self::warp_factor(n, (&l3 - &l2).view());
        let warpf2 = Self::warp_factor(n, (&l1 - &l3).view());
        let warpf3 = Self::warp_factor(n, (&l2 - &l1).view());

        let warp1 = blend1 * warpf1 * (1.0 + (alpha * &l1).powi(2));
        let warp2 = blend2 * warpf2 * (1.0 + (alpha * &l2).powi(2));
        let warp3 = blend3 * warpf3 * (1.0 + (alpha * &l3).powi(2));

        let x = x + &warp1 + (2.0 * PI / 3.0).cos() * &warp2 + (4.0 * PI / 3.0).cos() * &warp3;
        let y = y + (2.0 * PI / 3.0).sin() * &warp2 + (4.0 * PI / 3.0).sin() * &warp3;
        (x, y)
    }
}
