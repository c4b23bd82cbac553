use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::{Array, Ix1, array};
use statrs::function::gamma::gamma;

pub fn get_legendre_points_interval(points_num: usize) -> (Array<f64, Ix1>, Array<f64, Ix1>) {
    get_jacobi_points_interval(0.0, 0.0, points_num)
}

/// Gauss-Jacobi rule for the weight (1 - x)^alpha (1 + x)^beta, built with
/// Golub-Welsch. Points are returned in ascending order.
pub fn get_jacobi_points_interval(
    alpha: f64,
    beta: f64,
    points_num: usize,
) -> (Array<f64, Ix1>, Array<f64, Ix1>) {
    let mu_0 = 2.0_f64.powf(alpha + beta + 1.0) * gamma(alpha + 1.0) * gamma(beta + 1.0)
        / gamma(alpha + beta + 2.0);
    match points_num {
        0 => (Array::zeros(0), Array::zeros(0)),
        1 => (array![(beta - alpha) / (alpha + beta + 2.0)], array![mu_0]),
        dim => {
            let h1: Vec<f64> = (0..dim)
                .map(|k| 2.0 * k as f64 + alpha + beta)
                .collect();
            let mut j = DMatrix::<f64>::zeros(dim, dim);
            j[(0, 0)] = (beta - alpha) / (alpha + beta + 2.0);
            for k in 1..dim {
                j[(k, k)] = (beta * beta - alpha * alpha) / (h1[k] * (h1[k] + 2.0));
            }
            for k in 0..dim - 1 {
                let l = k as f64 + 1.0;
                let numerator = l * (l + alpha + beta) * (l + alpha) * (l + beta);
                let denominator = (h1[k] + 1.0) * (h1[k] + 3.0);
                let off_diag = 2.0 / (h1[k] + 2.0) * (numerator / denominator).sqrt();
                j[(k, k + 1)] = off_diag;
                j[(k + 1, k)] = off_diag;
            }
            let eigen = SymmetricEigen::new(j);
            let mut order: Vec<usize> = (0..dim).collect();
            order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));
            let points = order.iter().map(|&i| eigen.eigenvalues[i]).collect();
            let weights = order
                .iter()
                .map(|&i| eigen.eigenvectors[(0, i)].powi(2) * mu_0)
                .collect();
            (points, weights)
        }
    }
}
