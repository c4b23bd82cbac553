use crate::disc::reference_element::ElementShape;

/// Straight-sided element geometry: linear triangles and bilinear quadrilaterals.
pub trait Geometric2D {
    /// Unit normal of the segment (x0, y0) -> (x1, y1), pointing to its right.
    fn compute_normal(x0: f64, y0: f64, x1: f64, y1: f64) -> [f64; 2] {
        let normal = [y1 - y0, x0 - x1];
        let normal_magnitude = (normal[0].powi(2) + normal[1].powi(2)).sqrt();
        [normal[0] / normal_magnitude, normal[1] / normal_magnitude]
    }
    fn compute_edge_length(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
        ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt()
    }
    /// Signed polygon area, positive for counterclockwise vertices.
    fn compute_signed_area(x: &[f64], y: &[f64]) -> f64 {
        let n = x.len();
        let mut area = 0.0;
        for i in 0..n {
            let j = (i + 1) % n;
            area += x[i] * y[j] - x[j] * y[i];
        }
        0.5 * area
    }
    /// Vertex shape functions and their (r, s) derivatives.
    fn shape_functions(shape: ElementShape, r: f64, s: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        match shape {
            ElementShape::Triangle => (
                vec![-0.5 * (r + s), 0.5 * (1.0 + r), 0.5 * (1.0 + s)],
                vec![-0.5, 0.5, 0.0],
                vec![-0.5, 0.0, 0.5],
            ),
            ElementShape::Quadrilateral => (
                vec![
                    0.25 * (1.0 - r) * (1.0 - s),
                    0.25 * (1.0 + r) * (1.0 - s),
                    0.25 * (1.0 + r) * (1.0 + s),
                    0.25 * (1.0 - r) * (1.0 + s),
                ],
                vec![
                    -0.25 * (1.0 - s), // dN0/dr
                    0.25 * (1.0 - s),  // dN1/dr
                    0.25 * (1.0 + s),  // dN2/dr
                    -0.25 * (1.0 + s), // dN3/dr
                ],
                vec![
                    -0.25 * (1.0 - r), // dN0/ds
                    -0.25 * (1.0 + r), // dN1/ds
                    0.25 * (1.0 + r),  // dN2/ds
                    0.25 * (1.0 - r),  // dN3/ds
                ],
            ),
            ElementShape::Line => (
                vec![0.5 * (1.0 - r), 0.5 * (1.0 + r)],
                vec![-0.5, 0.5],
                vec![0.0, 0.0],
            ),
        }
    }
    fn map_to_physical(shape: ElementShape, r: f64, s: f64, x: &[f64], y: &[f64]) -> [f64; 2] {
        let (n, _, _) = Self::shape_functions(shape, r, s);
        let mut point = [0.0; 2];
        for k in 0..n.len() {
            point[0] += n[k] * x[k];
            point[1] += n[k] * y[k];
        }
        point
    }
    /// Jacobian determinant and inverse transpose `[rx, sx, ry, sy]` at (r, s).
    fn evaluate_jacob(shape: ElementShape, r: f64, s: f64, x: &[f64], y: &[f64]) -> (f64, [f64; 4]) {
        let (_, dn_dr, dn_ds) = Self::shape_functions(shape, r, s);
        let mut dx_dr = 0.0;
        let mut dx_ds = 0.0;
        let mut dy_dr = 0.0;
        let mut dy_ds = 0.0;
        for k in 0..dn_dr.len() {
            dx_dr += dn_dr[k] * x[k];
            dx_ds += dn_ds[k] * x[k];
            dy_dr += dn_dr[k] * y[k];
            dy_ds += dn_ds[k] * y[k];
        }
        let jacob_det = dx_dr * dy_ds - dx_ds * dy_dr;
        let jacob_inv_t = [
            dy_ds / jacob_det,
            -dy_dr / jacob_det,
            -dx_ds / jacob_det,
            dx_dr / jacob_det,
        ];
        (jacob_det, jacob_inv_t)
    }
}
