use crate::disc::thermo::{Conserved, NVAR, Primitive, ThermodynamicModel};

/// Inviscid flux projected on `normal`.
pub fn normal_flux(thermo: &ThermodynamicModel, state: &Primitive, normal: [f64; 2]) -> Conserved {
    let un = state.normal_velocity(normal);
    let rho = state.density;
    let p = state.pressure;
    let energy = thermo.total_energy(state);
    [
        rho * un,
        rho * state.velocity[0] * un + p * normal[0],
        rho * state.velocity[1] * un + p * normal[1],
        un * (energy + p),
    ]
}

/// Flux tensor as (x flux, y flux).
pub fn flux_tensor(thermo: &ThermodynamicModel, state: &Primitive) -> [Conserved; 2] {
    [
        normal_flux(thermo, state, [1.0, 0.0]),
        normal_flux(thermo, state, [0.0, 1.0]),
    ]
}

/// Inviscid slip wall: only the pressure acts on the boundary.
pub fn wall_flux(state: &Primitive, normal: [f64; 2]) -> Conserved {
    [
        0.0,
        state.pressure * normal[0],
        state.pressure * normal[1],
        0.0,
    ]
}

/// No-slip wall: physical flux of the interior state brought to rest.
pub fn no_slip_wall_flux(thermo: &ThermodynamicModel, state: &Primitive, normal: [f64; 2]) -> Conserved {
    let wall = Primitive {
        velocity: [0.0, 0.0],
        ..*state
    };
    normal_flux(thermo, &wall, normal)
}

pub fn central_flux(
    thermo: &ThermodynamicModel,
    normal: [f64; 2],
    left: &Primitive,
    right: &Primitive,
) -> Conserved {
    let fl = normal_flux(thermo, left, normal);
    let fr = normal_flux(thermo, right, normal);
    let mut flux = [0.0; NVAR];
    for k in 0..NVAR {
        flux[k] = 0.5 * (fl[k] + fr[k]);
    }
    flux
}
