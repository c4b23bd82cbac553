use crate::disc::flux::central_flux;
use crate::disc::thermo::{Conserved, NVAR, Primitive, ThermodynamicModel};

/// Local Lax-Friedrichs: central flux minus the largest wave speed times the jump.
pub fn lax_friedrichs(
    thermo: &ThermodynamicModel,
    normal: [f64; 2],
    left: &Primitive,
    right: &Primitive,
) -> Conserved {
    let spectral_radius = |state: &Primitive| {
        state.normal_velocity(normal).abs() + thermo.sound_speed(state.density, state.pressure)
    };
    let lambda = spectral_radius(left).max(spectral_radius(right));
    let ul = thermo.primitive_to_conserved(left);
    let ur = thermo.primitive_to_conserved(right);
    let mut flux = central_flux(thermo, normal, left, right);
    for k in 0..NVAR {
        flux[k] -= 0.5 * lambda * (ur[k] - ul[k]);
    }
    flux
}
