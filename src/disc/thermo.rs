use serde::{Deserialize, Serialize};

use crate::error::{DgError, Result};

/// Number of conserved variables: density, x/y momentum, total energy per volume.
pub const NVAR: usize = 4;
pub type Conserved = [f64; NVAR];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Primitive {
    pub density: f64,
    pub velocity: [f64; 2],
    pub pressure: f64,
}
impl Primitive {
    pub fn new(density: f64, u: f64, v: f64, pressure: f64) -> Self {
        Self {
            density,
            velocity: [u, v],
            pressure,
        }
    }
    pub fn normal_velocity(&self, normal: [f64; 2]) -> f64 {
        self.velocity[0] * normal[0] + self.velocity[1] * normal[1]
    }
    pub fn velocity_squared(&self) -> f64 {
        self.velocity[0] * self.velocity[0] + self.velocity[1] * self.velocity[1]
    }
    pub fn is_physical(&self) -> bool {
        self.density.is_finite() && self.pressure.is_finite() && self.density > 0.0 && self.pressure > 0.0
    }
}

/// Caloric closure of the ideal gas.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ThermoClosure {
    /// Constant specific heat at constant volume.
    ConstantE { cv: f64 },
    /// Constant specific heat at constant pressure.
    ConstantH { cp: f64 },
}
impl Default for ThermoClosure {
    fn default() -> Self {
        ThermoClosure::ConstantE { cv: 25.0 / 14.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermodynamicModel {
    pub gamma: f64,
    pub cv: f64,
    pub cp: f64,
    pub gas_constant: f64,
}
impl Default for ThermodynamicModel {
    fn default() -> Self {
        Self::from_cv(1.4, 25.0 / 14.0)
    }
}
impl ThermodynamicModel {
    pub fn new(gamma: f64, closure: ThermoClosure) -> Result<Self> {
        if !(gamma > 1.0) {
            return Err(DgError::InvalidParameter(format!(
                "specific heat ratio must exceed 1, got {gamma}"
            )));
        }
        let model = match closure {
            ThermoClosure::ConstantE { cv } => Self::from_cv(gamma, cv),
            ThermoClosure::ConstantH { cp } => Self::from_cv(gamma, cp / gamma),
        };
        if !(model.cv > 0.0) {
            return Err(DgError::InvalidParameter(format!(
                "specific heat must be positive, got {closure:?}"
            )));
        }
        Ok(model)
    }
    fn from_cv(gamma: f64, cv: f64) -> Self {
        Self {
            gamma,
            cv,
            cp: gamma * cv,
            gas_constant: cv * (gamma - 1.0),
        }
    }
    pub fn conserved_to_primitive(&self, conserved: &Conserved) -> Primitive {
        let density = conserved[0];
        let u = conserved[1] / density;
        let v = conserved[2] / density;
        let pressure = (self.gamma - 1.0) * (conserved[3] - 0.5 * density * (u * u + v * v));
        Primitive::new(density, u, v, pressure)
    }
    pub fn primitive_to_conserved(&self, primitive: &Primitive) -> Conserved {
        let rho = primitive.density;
        [
            rho,
            rho * primitive.velocity[0],
            rho * primitive.velocity[1],
            self.total_energy(primitive),
        ]
    }
    pub fn primitive_from_temperature(
        &self,
        density: f64,
        velocity: [f64; 2],
        temperature: f64,
    ) -> Primitive {
        Primitive {
            density,
            velocity,
            pressure: density * self.gas_constant * temperature,
        }
    }
    /// Total energy per unit volume.
    pub fn total_energy(&self, primitive: &Primitive) -> f64 {
        primitive.pressure / (self.gamma - 1.0)
            + 0.5 * primitive.density * primitive.velocity_squared()
    }
    /// Total enthalpy per unit mass.
    pub fn total_enthalpy(&self, primitive: &Primitive) -> f64 {
        (self.total_energy(primitive) + primitive.pressure) / primitive.density
    }
    pub fn sound_speed(&self, density: f64, pressure: f64) -> f64 {
        (self.gamma * pressure / density).sqrt()
    }
    pub fn temperature(&self, density: f64, pressure: f64) -> f64 {
        pressure / (density * self.gas_constant)
    }
    pub fn mach_number(&self, primitive: &Primitive) -> f64 {
        primitive.velocity_squared().sqrt()
            / self.sound_speed(primitive.density, primitive.pressure)
    }
    pub fn entropy(&self, density: f64, pressure: f64) -> f64 {
        pressure / density.powf(self.gamma)
    }
    /// Density and pressure of the state with sound speed `a` and entropy `entropy`.
    pub fn density_pressure_from_sound_speed_entropy(&self, a: f64, entropy: f64) -> (f64, f64) {
        let density = (a * a / (self.gamma * entropy)).powf(1.0 / (self.gamma - 1.0));
        (density, density * a * a / self.gamma)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_state() {
        let thermo = ThermodynamicModel::default();
        assert_relative_eq!(thermo.gas_constant, 5.0 / 7.0, epsilon = 1e-15);
        assert_relative_eq!(thermo.temperature(1.4, 1.0), 1.0, epsilon = 1e-14);
        assert_relative_eq!(thermo.sound_speed(1.4, 1.0), 1.0, epsilon = 1e-14);
        let state = Primitive::new(1.4, 0.5, 0.0, 1.0);
        assert_relative_eq!(thermo.mach_number(&state), 0.5, epsilon = 1e-14);
    }

    #[test]
    fn test_closures_agree() {
        let e = ThermodynamicModel::new(1.4, ThermoClosure::ConstantE { cv: 25.0 / 14.0 }).unwrap();
        let h = ThermodynamicModel::new(1.4, ThermoClosure::ConstantH { cp: 2.5 }).unwrap();
        assert_relative_eq!(e.cv, h.cv, epsilon = 1e-15);
        assert_relative_eq!(e.gas_constant, h.gas_constant, epsilon = 1e-15);
    }

    #[test]
    fn test_conversion_is_consistent() {
        let thermo = ThermodynamicModel::default();
        let state = Primitive::new(0.8, -0.3, 1.2, 2.5);
        let back = thermo.conserved_to_primitive(&thermo.primitive_to_conserved(&state));
        assert_relative_eq!(back.density, state.density, epsilon = 1e-14);
        assert_relative_eq!(back.velocity[0], state.velocity[0], epsilon = 1e-14);
        assert_relative_eq!(back.velocity[1], state.velocity[1], epsilon = 1e-14);
        assert_relative_eq!(back.pressure, state.pressure, epsilon = 1e-13);
        let from_t = thermo.primitive_from_temperature(
            0.8,
            state.velocity,
            thermo.temperature(0.8, 2.5),
        );
        assert_relative_eq!(from_t.pressure, 2.5, epsilon = 1e-13);
        let a = thermo.sound_speed(0.8, 2.5);
        let (rho, p) =
            thermo.density_pressure_from_sound_speed_entropy(a, thermo.entropy(0.8, 2.5));
        assert_relative_eq!(rho, 0.8, epsilon = 1e-12);
        assert_relative_eq!(p, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_gamma() {
        assert!(ThermodynamicModel::new(1.0, ThermoClosure::default()).is_err());
        assert!(ThermodynamicModel::new(1.4, ThermoClosure::ConstantH { cp: -1.0 }).is_err());
    }
}
