use crate::disc::flux::normal_flux;
use crate::disc::thermo::{Conserved, NVAR, Primitive, ThermodynamicModel};

/// Left, right and contact wave speeds, with pressure-based estimates for the outer waves.
fn wave_speeds(
    thermo: &ThermodynamicModel,
    normal: [f64; 2],
    left: &Primitive,
    right: &Primitive,
) -> (f64, f64, f64) {
    let gamma = thermo.gamma;
    let (rho_l, rho_r) = (left.density, right.density);
    let (p_l, p_r) = (left.pressure, right.pressure);
    let un_l = left.normal_velocity(normal);
    let un_r = right.normal_velocity(normal);
    let a_l = thermo.sound_speed(rho_l, p_l);
    let a_r = thermo.sound_speed(rho_r, p_r);
    let average_rho = 0.5 * (rho_l + rho_r);
    let average_a = 0.5 * (a_l + a_r);
    let p_pvrs = (0.5 * (p_l + p_r) - (un_r - un_l) * average_rho * average_a).max(0.0);
    let shock_factor = |p: f64| {
        if p_pvrs <= p {
            1.0
        } else {
            (1.0 + (gamma + 1.0) / (2.0 * gamma) * (p_pvrs / p - 1.0)).sqrt()
        }
    };
    let s_l = un_l - a_l * shock_factor(p_l);
    let s_r = un_r + a_r * shock_factor(p_r);
    let s_star = (p_r - p_l + rho_l * un_l * (s_l - un_l) - rho_r * un_r * (s_r - un_r))
        / (rho_l * (s_l - un_l) - rho_r * (s_r - un_r));
    (s_l, s_r, s_star)
}

pub fn hllc(
    thermo: &ThermodynamicModel,
    normal: [f64; 2],
    left: &Primitive,
    right: &Primitive,
) -> Conserved {
    let (s_l, s_r, s_star) = wave_speeds(thermo, normal, left, right);
    if s_l >= 0.0 {
        return normal_flux(thermo, left, normal);
    }
    if s_r <= 0.0 {
        return normal_flux(thermo, right, normal);
    }
    let (state, s_k) = if s_star >= 0.0 {
        (left, s_l)
    } else {
        (right, s_r)
    };
    let un_k = state.normal_velocity(normal);
    let conserved = thermo.primitive_to_conserved(state);
    let factor = 1.0 / (s_k - s_star);
    let mass = state.density * (s_k - un_k);
    // star pressure consistent with the contact speed, equal on both sides
    let p_lr = state.pressure + mass * (s_star - un_k);
    let star = [
        mass * factor,
        (mass * state.velocity[0] + (p_lr - state.pressure) * normal[0]) * factor,
        (mass * state.velocity[1] + (p_lr - state.pressure) * normal[1]) * factor,
        ((s_k - un_k) * conserved[3] - state.pressure * un_k + p_lr * s_star) * factor,
    ];
    let f_k = normal_flux(thermo, state, normal);
    let mut flux = [0.0; NVAR];
    for k in 0..NVAR {
        flux[k] = f_k[k] + s_k * (star[k] - conserved[k]);
    }
    flux
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_stationary_contact_is_exact() {
        // equal pressure and zero normal velocity: only the pressure flux remains
        let thermo = ThermodynamicModel::default();
        let left = Primitive::new(1.0, 0.0, 0.3, 1.0);
        let right = Primitive::new(0.2, 0.0, -0.4, 1.0);
        let flux = hllc(&thermo, [1.0, 0.0], &left, &right);
        assert_relative_eq!(flux[0], 0.0, epsilon = 1e-14);
        assert_relative_eq!(flux[1], 1.0, epsilon = 1e-14);
        assert_relative_eq!(flux[2], 0.0, epsilon = 1e-14);
        assert_relative_eq!(flux[3], 0.0, epsilon = 1e-14);
    }

    #[test]
    fn test_star_state_carries_contact_pressure() {
        let thermo = ThermodynamicModel::default();
        let left = Primitive::new(1.0, 0.2, 0.1, 1.0);
        let right = Primitive::new(0.5, -0.1, 0.0, 0.6);
        for n in [[1.0, 0.0], [0.6, 0.8]] {
            let (s_l, s_r, s_star) = wave_speeds(&thermo, n, &left, &right);
            assert!(s_l < 0.0 && s_r > 0.0);
            let un_l = left.normal_velocity(n);
            let un_r = right.normal_velocity(n);
            let p_from_left = left.pressure + left.density * (s_l - un_l) * (s_star - un_l);
            let p_from_right = right.pressure + right.density * (s_r - un_r) * (s_star - un_r);
            assert_relative_eq!(p_from_left, p_from_right, epsilon = 1e-13);
            // normal momentum flux of the star region: rho* un* S* + p*
            let flux = hllc(&thermo, n, &left, &right);
            let momentum = flux[1] * n[0] + flux[2] * n[1];
            assert_relative_eq!(momentum, flux[0] * s_star + p_from_left, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_supersonic_right_going() {
        let thermo = ThermodynamicModel::default();
        let left = Primitive::new(0.5, -3.0, 0.0, 0.4);
        let right = Primitive::new(0.6, -2.9, 0.1, 0.5);
        let n = [1.0, 0.0];
        let flux = hllc(&thermo, n, &left, &right);
        let exact = normal_flux(&thermo, &right, n);
        for k in 0..NVAR {
            assert_relative_eq!(flux[k], exact[k], epsilon = 1e-14);
        }
    }
}
