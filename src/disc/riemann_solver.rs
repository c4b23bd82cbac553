use serde::{Deserialize, Serialize};

use crate::disc::thermo::{Conserved, Primitive, ThermodynamicModel};

pub mod hllc;
pub mod lax_friedrichs;
pub mod roe;

use hllc::hllc;
use lax_friedrichs::lax_friedrichs;
use roe::roe;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FluxScheme {
    Roe,
    Hllc,
    LaxFriedrichs,
}

/// Interface flux chosen once per run.
#[derive(Clone, Copy, Debug)]
pub struct NumericalFlux {
    pub scheme: FluxScheme,
    pub thermo: ThermodynamicModel,
    /// Harten correction of the acoustic eigenvalues in the Roe flux.
    pub entropy_fix: bool,
}
impl NumericalFlux {
    pub fn new(scheme: FluxScheme, thermo: ThermodynamicModel, entropy_fix: bool) -> Self {
        Self {
            scheme,
            thermo,
            entropy_fix,
        }
    }
    pub fn flux(&self, normal: [f64; 2], left: &Primitive, right: &Primitive) -> Conserved {
        match self.scheme {
            FluxScheme::Roe => roe(&self.thermo, normal, left, right, self.entropy_fix),
            FluxScheme::Hllc => hllc(&self.thermo, normal, left, right),
            FluxScheme::LaxFriedrichs => lax_friedrichs(&self.thermo, normal, left, right),
        }
    }
}
