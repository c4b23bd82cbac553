use ndarray::{Array, Ix1, array, s};

use super::legendre_points::get_jacobi_points_interval;

/// Gauss-Lobatto-Legendre points and weights on [-1, 1]; `points_num` >= 2.
pub fn get_lobatto_points_interval(points_num: usize) -> (Array<f64, Ix1>, Array<f64, Ix1>) {
    if points_num < 2 {
        return (array![0.0], array![2.0]);
    }
    let n = points_num - 1;
    let mut points = Array::zeros(points_num);
    points[0] = -1.0;
    points[n] = 1.0;
    if n > 1 {
        let (interior, _) = get_jacobi_points_interval(1.0, 1.0, n - 1);
        points.slice_mut(s![1..n]).assign(&interior);
    }
    let nf = n as f64;
    let weights = points.mapv(|x| {
        let p = legendre(n, x);
        2.0 / (nf * (nf + 1.0) * p * p)
    });
    (points, weights)
}

fn legendre(n: usize, x: f64) -> f64 {
    let (mut p0, mut p1) = (1.0, x);
    if n == 0 {
        return p0;
    }
    for k in 1..n {
        let kf = k as f64;
        let p2 = ((2.0 * kf + 1.0) * x * p1 - kf * p0) / (kf + 1.0);
        p0 = p1;
        p1 = p2;
    }
    p1
}
