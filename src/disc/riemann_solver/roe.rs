use crate::disc::flux::normal_flux;
use crate::disc::thermo::{Conserved, NVAR, Primitive, ThermodynamicModel};

/// Roe flux with square-root-density averaging. With `entropy_fix` the two
/// acoustic eigenvalues get Harten's correction, width a/20.
pub fn roe(
    thermo: &ThermodynamicModel,
    normal: [f64; 2],
    left: &Primitive,
    right: &Primitive,
    entropy_fix: bool,
) -> Conserved {
    let [nx, ny] = normal;
    let l_sqrt_rho = left.density.sqrt();
    let r_sqrt_rho = right.density.sqrt();
    let sqrt_rho_sum = l_sqrt_rho + r_sqrt_rho;
    let roe_rho = (left.density * right.density).sqrt();
    let roe_u = (left.velocity[0] * l_sqrt_rho + right.velocity[0] * r_sqrt_rho) / sqrt_rho_sum;
    let roe_v = (left.velocity[1] * l_sqrt_rho + right.velocity[1] * r_sqrt_rho) / sqrt_rho_sum;
    let roe_h = (thermo.total_enthalpy(left) * l_sqrt_rho
        + thermo.total_enthalpy(right) * r_sqrt_rho)
        / sqrt_rho_sum;
    let roe_q2 = roe_u * roe_u + roe_v * roe_v;
    let roe_un = roe_u * nx + roe_v * ny;
    let roe_a = ((thermo.gamma - 1.0) * (roe_h - 0.5 * roe_q2)).sqrt();

    let delta_rho = right.density - left.density;
    let delta_u = right.velocity[0] - left.velocity[0];
    let delta_v = right.velocity[1] - left.velocity[1];
    let delta_p = right.pressure - left.pressure;
    let delta_un = delta_u * nx + delta_v * ny;

    let eigen_fix = |lambda: f64| {
        let abs_lambda = lambda.abs();
        let delta = roe_a / 20.0;
        if !entropy_fix || abs_lambda > delta {
            abs_lambda
        } else {
            (lambda * lambda + delta * delta) / (2.0 * delta)
        }
    };
    let lambda_minus = eigen_fix(roe_un - roe_a);
    let lambda_plus = eigen_fix(roe_un + roe_a);

    let a2 = roe_a * roe_a;
    let w1 = lambda_minus * (delta_p - roe_rho * roe_a * delta_un) / (2.0 * a2);
    let f1 = [
        w1,
        w1 * (roe_u - roe_a * nx),
        w1 * (roe_v - roe_a * ny),
        w1 * (roe_h - roe_a * roe_un),
    ];
    let w2 = delta_rho - delta_p / a2;
    let f2 = [w2, w2 * roe_u, w2 * roe_v, w2 * 0.5 * roe_q2];
    let f34 = [
        0.0,
        roe_rho * (delta_u - delta_un * nx),
        roe_rho * (delta_v - delta_un * ny),
        roe_rho * (roe_u * delta_u + roe_v * delta_v - roe_un * delta_un),
    ];
    let w5 = lambda_plus * (delta_p + roe_rho * roe_a * delta_un) / (2.0 * a2);
    let f5 = [
        w5,
        w5 * (roe_u + roe_a * nx),
        w5 * (roe_v + roe_a * ny),
        w5 * (roe_h + roe_a * roe_un),
    ];

    let fl = normal_flux(thermo, left, normal);
    let fr = normal_flux(thermo, right, normal);
    let abs_un = roe_un.abs();
    let mut flux = [0.0; NVAR];
    for k in 0..NVAR {
        let dissipation = f1[k] + abs_un * (f2[k] + f34[k]) + f5[k];
        flux[k] = 0.5 * (fl[k] + fr[k] - dissipation);
    }
    flux
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Stationary normal shock at Mach 2, returned as (upstream, downstream).
    fn normal_shock(thermo: &ThermodynamicModel) -> (Primitive, Primitive) {
        let gamma = thermo.gamma;
        let mach = 2.0;
        let upstream_u = mach * thermo.sound_speed(1.0, 1.0);
        let density_ratio = (gamma + 1.0) * mach * mach / ((gamma - 1.0) * mach * mach + 2.0);
        let pressure_ratio = 1.0 + 2.0 * gamma / (gamma + 1.0) * (mach * mach - 1.0);
        (
            Primitive::new(1.0, upstream_u, 0.0, 1.0),
            Primitive::new(density_ratio, upstream_u / density_ratio, 0.0, pressure_ratio),
        )
    }

    #[test]
    fn test_stationary_shock_is_exact() {
        let thermo = ThermodynamicModel::default();
        let (upstream, downstream) = normal_shock(&thermo);
        let n = [1.0, 0.0];
        let flux = roe(&thermo, n, &upstream, &downstream, false);
        let exact = normal_flux(&thermo, &upstream, n);
        for k in 0..NVAR {
            assert_relative_eq!(flux[k], exact[k], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_expansion_shock_without_entropy_fix() {
        // subsonic state on the left, supersonic on the right: a non-physical
        // stationary expansion shock the plain Roe flux cannot see
        let thermo = ThermodynamicModel::default();
        let (upstream, downstream) = normal_shock(&thermo);
        let n = [1.0, 0.0];
        let exact = normal_flux(&thermo, &downstream, n);
        let plain = roe(&thermo, n, &downstream, &upstream, false);
        for k in 0..NVAR {
            assert_relative_eq!(plain[k], exact[k], epsilon = 1e-10);
        }
        let fixed = roe(&thermo, n, &downstream, &upstream, true);
        assert!((fixed[0] - exact[0]).abs() > 1e-3);
    }

    #[test]
    fn test_entropy_fix_inactive_away_from_sonic_point() {
        let thermo = ThermodynamicModel::default();
        let left = Primitive::new(1.4, 0.2, 0.1, 1.0);
        let right = Primitive::new(1.2, 0.1, -0.2, 0.9);
        let n = [0.8, 0.6];
        let plain = roe(&thermo, n, &left, &right, false);
        let fixed = roe(&thermo, n, &left, &right, true);
        for k in 0..NVAR {
            assert_relative_eq!(plain[k], fixed[k], epsilon = 1e-15);
        }
    }
}
