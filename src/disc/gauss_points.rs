use ndarray::{Array, Ix1};

pub mod legendre_points;
pub mod lobatto_points;

pub use legendre_points::{get_jacobi_points_interval, get_legendre_points_interval};
pub use lobatto_points::get_lobatto_points_interval;

/// Points and weights of a one-dimensional rule on [-1, 1].
#[derive(Clone, Debug)]
pub struct GaussPoints1d {
    pub points: Array<f64, Ix1>,
    pub weights: Array<f64, Ix1>,
}
impl GaussPoints1d {
    pub fn new(points_num: usize) -> Self {
        let (points, weights) = get_legendre_points_interval(points_num);
        Self { points, weights }
    }
    /// Smallest Gauss-Legendre rule integrating polynomials of `degree` exactly.
    pub fn with_exactness(degree: usize) -> Self {
        Self::new(degree / 2 + 1)
    }
    pub fn len(&self) -> usize {
        self.points.len()
    }
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
