use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::disc::flux::{no_slip_wall_flux, wall_flux};
use crate::disc::mesh::topology::{MeshTopology, PeriodicPair};
use crate::disc::riemann_solver::NumericalFlux;
use crate::disc::thermo::{Conserved, Primitive, ThermodynamicModel};
use crate::error::{DgError, Result};

/// Boundary condition attached to a named boundary group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum BoundaryCondition {
    /// Interior flux against a fixed state.
    Farfield { state: Primitive },
    /// Interior flux against a ghost state built from Riemann invariants.
    RiemannFarfield { state: Primitive },
    SlipWall,
    NoSlipWall,
    /// Glue this group onto `partner`, whose faces sit at `translation`.
    Periodic {
        partner: String,
        translation: [f64; 2],
    },
}

/// Condition of a boundary group that still owns faces after periodic merging.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryFlux {
    Farfield(Primitive),
    RiemannFarfield(Primitive),
    SlipWall,
    NoSlipWall,
}
impl BoundaryFlux {
    pub fn flux(&self, numerical: &NumericalFlux, normal: [f64; 2], interior: &Primitive) -> Conserved {
        match self {
            BoundaryFlux::Farfield(state) => numerical.flux(normal, interior, state),
            BoundaryFlux::RiemannFarfield(state) => {
                let ghost = riemann_farfield_state(&numerical.thermo, normal, interior, state);
                numerical.flux(normal, interior, &ghost)
            }
            BoundaryFlux::SlipWall => wall_flux(interior, normal),
            BoundaryFlux::NoSlipWall => no_slip_wall_flux(&numerical.thermo, interior, normal),
        }
    }
}

/// Ghost state of a characteristic farfield boundary.
pub fn riemann_farfield_state(
    thermo: &ThermodynamicModel,
    normal: [f64; 2],
    interior: &Primitive,
    freestream: &Primitive,
) -> Primitive {
    let gm1 = thermo.gamma - 1.0;
    let un_i = interior.normal_velocity(normal);
    let a_i = thermo.sound_speed(interior.density, interior.pressure);
    let normal_mach = un_i / a_i;
    if normal_mach <= -1.0 {
        return *freestream;
    }
    if normal_mach >= 1.0 {
        return *interior;
    }
    let un_f = freestream.normal_velocity(normal);
    let a_f = thermo.sound_speed(freestream.density, freestream.pressure);
    let r_minus = un_f - 2.0 * a_f / gm1;
    let r_plus = un_i + 2.0 * a_i / gm1;
    let un_b = 0.5 * (r_plus + r_minus);
    let a_b = 0.25 * gm1 * (r_plus - r_minus);
    // entropy and tangential velocity are carried in from the upwind side
    let upwind = if un_b < 0.0 { freestream } else { interior };
    let entropy = thermo.entropy(upwind.density, upwind.pressure);
    let (density, pressure) = thermo.density_pressure_from_sound_speed_entropy(a_b, entropy);
    let shift = un_b - upwind.normal_velocity(normal);
    Primitive {
        density,
        velocity: [
            upwind.velocity[0] + shift * normal[0],
            upwind.velocity[1] + shift * normal[1],
        ],
        pressure,
    }
}

/// Periodic pairs declared by the conditions, one per glued couple of groups.
pub fn periodic_pairs(conditions: &HashMap<String, BoundaryCondition>) -> Result<Vec<PeriodicPair>> {
    let mut names: Vec<&String> = conditions.keys().collect();
    names.sort();
    let mut pairs = Vec::new();
    for name in names {
        let BoundaryCondition::Periodic {
            partner,
            translation,
        } = &conditions[name]
        else {
            continue;
        };
        let mismatch = |reason: &str| DgError::PeriodicMismatch {
            from: name.clone(),
            to: partner.clone(),
            reason: reason.to_string(),
        };
        match conditions.get(partner) {
            None => {}
            Some(BoundaryCondition::Periodic {
                partner: back,
                translation: back_translation,
            }) => {
                if back != name {
                    return Err(mismatch("partner is glued to another group"));
                }
                if (back_translation[0] + translation[0]).abs() > 1.0e-12
                    || (back_translation[1] + translation[1]).abs() > 1.0e-12
                {
                    return Err(mismatch("translations are not opposite"));
                }
                if partner < name {
                    continue;
                }
            }
            Some(_) => return Err(mismatch("partner carries a non-periodic condition")),
        }
        pairs.push(PeriodicPair {
            from: name.clone(),
            to: partner.clone(),
            translation: *translation,
        });
    }
    Ok(pairs)
}

/// Conditions per boundary group of the mesh; `None` for groups without faces.
pub fn resolve_boundary_fluxes(
    mesh: &MeshTopology,
    conditions: &HashMap<String, BoundaryCondition>,
) -> Result<Vec<Option<BoundaryFlux>>> {
    for name in conditions.keys() {
        mesh.boundary_group(name)?;
    }
    mesh.boundary_groups
        .iter()
        .map(|group| {
            if group.faces.is_empty() {
                return Ok(None);
            }
            let resolved = match conditions.get(&group.name) {
                Some(BoundaryCondition::Farfield { state }) => BoundaryFlux::Farfield(*state),
                Some(BoundaryCondition::RiemannFarfield { state }) => {
                    BoundaryFlux::RiemannFarfield(*state)
                }
                Some(BoundaryCondition::SlipWall) => BoundaryFlux::SlipWall,
                Some(BoundaryCondition::NoSlipWall) => BoundaryFlux::NoSlipWall,
                Some(BoundaryCondition::Periodic { partner, .. }) => {
                    return Err(DgError::PeriodicMismatch {
                        from: group.name.clone(),
                        to: partner.clone(),
                        reason: "faces left unpaired".to_string(),
                    });
                }
                None => return Err(DgError::MissingBoundaryCondition(group.name.clone())),
            };
            debug!(group = %group.name, faces = group.faces.len(), ?resolved, "boundary condition");
            Ok(Some(resolved))
        })
        .collect()
}
