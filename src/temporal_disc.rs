use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::disc::euler2d::{ElementState, EulerDisc, interpolate};
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeScheme {
    ForwardEuler,
    HeunRk2,
    SspRk3,
}
impl TimeScheme {
    /// `[c1, c2, c3]` per stage: U = c1 U_last + c2 U + c3 dt M^-1 R(U).
    pub fn stage_coefficients(self) -> &'static [[f64; 3]] {
        match self {
            TimeScheme::ForwardEuler => &[[1.0, 0.0, 1.0]],
            TimeScheme::HeunRk2 => &[[1.0, 0.0, 1.0], [0.5, 0.5, 0.5]],
            TimeScheme::SspRk3 => &[
                [1.0, 0.0, 1.0],
                [0.75, 0.25, 0.25],
                [1.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0],
            ],
        }
    }
    pub fn stage_num(self) -> usize {
        self.stage_coefficients().len()
    }
}

/// Largest stable step over every element quadrature point, scaled by `cfl`.
pub fn compute_time_step(disc: &EulerDisc, states: &[ElementState], cfl: f64) -> Result<f64> {
    let thermo = *disc.thermo();
    let dt = states
        .par_iter()
        .zip(disc.mesh.elements.par_iter())
        .map(|(state, element)| -> Result<f64> {
            let reference = disc.reference(element)?;
            let [measure_x, measure_y] = element.projection_measure;
            let mut dt_min = f64::INFINITY;
            for q in 0..reference.quad_num() {
                let u = interpolate(&state.coeff, reference.basis.row(q));
                let primitive = thermo.conserved_to_primitive(&u);
                let a = thermo.sound_speed(primitive.density, primitive.pressure);
                let speed = primitive.velocity_squared().sqrt();
                // wave speed |V| + a split along the velocity direction
                let (lambda_x, lambda_y) = if speed > 1.0e-12 * a {
                    (
                        primitive.velocity[0].abs() * (1.0 + a / speed),
                        primitive.velocity[1].abs() * (1.0 + a / speed),
                    )
                } else {
                    (a, a)
                };
                let area = element.jacob_det[q] * element.shape.measure();
                // measure_x is the y extent: x-going waves sweep the face across y,
                // so dt = area / (lambda_x dy + lambda_y dx)
                let local = area / (lambda_x * measure_x + lambda_y * measure_y);
                dt_min = dt_min.min(local);
            }
            Ok(dt_min)
        })
        .try_reduce(|| f64::INFINITY, |a, b| Ok(a.min(b)))?;
    Ok(cfl * dt)
}

/// One stage of the explicit update, using the residual already stored in `states`.
pub fn update_stage(disc: &EulerDisc, states: &mut [ElementState], dt: f64, coefficients: [f64; 3]) {
    let [c1, c2, c3] = coefficients;
    states
        .par_iter_mut()
        .zip(disc.mesh.elements.par_iter())
        .for_each(|(state, element)| {
            // mass matrix is symmetric: (M^-1 R^T)^T = R M^-1
            let increment = state.residual.dot(&element.mass_inv);
            let updated = c1 * &state.coeff_last + c2 * &state.coeff + (c3 * dt) * &increment;
            state.coeff = updated;
        });
}

/// Closes a full step: the current stage becomes the step's starting state.
pub fn finish_step(states: &mut [ElementState]) {
    states
        .par_iter_mut()
        .for_each(|state| state.coeff_last.assign(&state.coeff));
}
