use hashbrown::HashMap;
use ndarray::{Array1, Axis};
use ndarray_stats::QuantileExt;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::disc::boundary::BoundaryCondition;
use crate::disc::euler2d::{ElementState, EulerDisc};
use crate::disc::mesh::topology::MeshTopology;
use crate::disc::reference_element::ReferenceElementTable;
use crate::disc::riemann_solver::{FluxScheme, NumericalFlux};
use crate::disc::thermo::{NVAR, Primitive, ThermoClosure, ThermodynamicModel};
use crate::error::{DgError, Result};
use crate::temporal_disc::{TimeScheme, compute_time_step, finish_step, update_stage};

fn default_interval() -> usize {
    1
}
fn default_gamma() -> f64 {
    1.4
}

/// A final step shorter than this fraction of the stable step is merged into the one before.
const FINAL_TIME_SLACK: f64 = 1.0e-3;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolverParameters {
    pub cfl: f64,
    pub final_step: usize,
    #[serde(default)]
    pub final_time: Option<f64>,
    /// Stop once the residual norm drops below this value.
    #[serde(default)]
    pub residual_tolerance: Option<f64>,
    pub polynomial_order: usize,
    pub time_scheme: TimeScheme,
    pub flux_scheme: FluxScheme,
    #[serde(default)]
    pub roe_entropy_fix: bool,
    #[serde(default = "default_interval")]
    pub log_interval: usize,
    /// Steps between snapshots; none when absent.
    #[serde(default)]
    pub write_interval: Option<usize>,
}
impl SolverParameters {
    pub fn validate(&self) -> Result<()> {
        if !(self.cfl > 0.0 && self.cfl.is_finite()) {
            return Err(DgError::InvalidParameter(format!(
                "cfl must be positive, got {}",
                self.cfl
            )));
        }
        if let Some(final_time) = self.final_time {
            if !(final_time > 0.0) {
                return Err(DgError::InvalidParameter(format!(
                    "final time must be positive, got {final_time}"
                )));
            }
        }
        if self.log_interval == 0 || self.write_interval == Some(0) {
            return Err(DgError::InvalidParameter(
                "log and write intervals must be at least one step".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct FlowParameters {
    /// Ratio of specific heats.
    #[serde(default = "default_gamma")]
    pub gamma: f64,
    #[serde(default)]
    pub closure: ThermoClosure,
}
impl Default for FlowParameters {
    fn default() -> Self {
        Self {
            gamma: default_gamma(),
            closure: ThermoClosure::default(),
        }
    }
}
impl FlowParameters {
    pub fn thermo(&self) -> Result<ThermodynamicModel> {
        ThermodynamicModel::new(self.gamma, self.closure)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    FinalStep,
    FinalTime,
    Converged,
}

/// Per-variable mean absolute nodal residual.
pub fn residual_norm(states: &[ElementState]) -> Array1<f64> {
    let count: usize = states.iter().map(|state| state.residual.ncols()).sum();
    let total = states
        .par_iter()
        .map(|state| state.residual.mapv(f64::abs).sum_axis(Axis(1)))
        .reduce(|| Array1::zeros(NVAR), |a, b| a + b);
    total / count.max(1) as f64
}

pub struct Solver<'a> {
    pub disc: EulerDisc<'a>,
    pub states: Vec<ElementState>,
    pub solver_params: &'a SolverParameters,
    pub time_scheme: TimeScheme,
    pub curr_time: f64,
    pub curr_step: usize,
    /// Residual norm of the first stage of the last step.
    pub residual_norm: Array1<f64>,
}
impl<'a> Solver<'a> {
    pub fn new(
        mesh: &'a MeshTopology,
        table: &'a ReferenceElementTable,
        thermo: ThermodynamicModel,
        solver_params: &'a SolverParameters,
        conditions: &HashMap<String, BoundaryCondition>,
    ) -> Result<Self> {
        solver_params.validate()?;
        if solver_params.polynomial_order != mesh.order {
            return Err(DgError::InvalidParameter(format!(
                "polynomial order {} does not match the mesh order {}",
                solver_params.polynomial_order, mesh.order
            )));
        }
        let flux = NumericalFlux::new(
            solver_params.flux_scheme,
            thermo,
            solver_params.roe_entropy_fix,
        );
        let disc = EulerDisc::new(mesh, table, flux, conditions)?;
        let states = disc.allocate_states()?;
        info!(
            elements = mesh.elem_num(),
            faces = mesh.faces.len(),
            order = mesh.order,
            flux = ?solver_params.flux_scheme,
            time_scheme = ?solver_params.time_scheme,
            "solver ready"
        );
        Ok(Self {
            disc,
            states,
            solver_params,
            time_scheme: solver_params.time_scheme,
            curr_time: 0.0,
            curr_step: 0,
            residual_norm: Array1::zeros(NVAR),
        })
    }
    /// See [`EulerDisc::initialize`].
    pub fn initialize<F>(&mut self, initial: F) -> Result<()>
    where
        F: Fn([f64; 2], [f64; 2]) -> Primitive + Sync,
    {
        self.disc.initialize(&mut self.states, initial)?;
        self.curr_time = 0.0;
        self.curr_step = 0;
        self.check_states()
    }
    /// Largest entry of the residual norm.
    pub fn residual(&self) -> f64 {
        self.residual_norm.max_skipnan().abs()
    }
    /// Advances one full time step and returns its size.
    pub fn step(&mut self) -> Result<f64> {
        let mut dt = compute_time_step(&self.disc, &self.states, self.solver_params.cfl)?;
        if let Some(final_time) = self.solver_params.final_time {
            let remaining = final_time - self.curr_time;
            if remaining < dt * (1.0 + FINAL_TIME_SLACK) {
                dt = remaining;
            }
        }
        for (istage, &coefficients) in self.time_scheme.stage_coefficients().iter().enumerate() {
            self.disc.compute_residuals(&mut self.states)?;
            if istage == 0 {
                self.residual_norm = residual_norm(&self.states);
            }
            update_stage(&self.disc, &mut self.states, dt, coefficients);
        }
        finish_step(&mut self.states);
        self.curr_time += dt;
        self.curr_step += 1;
        self.check_states()?;
        Ok(dt)
    }
    /// Marches until a stop condition holds. `on_snapshot` runs every
    /// `write_interval` steps and after the last one.
    pub fn solve<F>(&mut self, mut on_snapshot: F) -> Result<StopReason>
    where
        F: FnMut(&Self) -> Result<()>,
    {
        let params = self.solver_params;
        let reason = loop {
            if let Some(reason) = self.stop_reason() {
                break reason;
            }
            let dt = self.step()?;
            if self.curr_step % params.log_interval == 0 {
                info!(
                    step = self.curr_step,
                    time = self.curr_time,
                    dt,
                    residual = self.residual(),
                    "time step"
                );
            }
            if let Some(interval) = params.write_interval {
                if self.curr_step % interval == 0 {
                    on_snapshot(self)?;
                }
            }
        };
        if params.write_interval.is_none_or(|interval| self.curr_step % interval != 0) {
            on_snapshot(self)?;
        }
        info!(?reason, step = self.curr_step, time = self.curr_time, "solve finished");
        Ok(reason)
    }
    fn stop_reason(&self) -> Option<StopReason> {
        let params = self.solver_params;
        if let (Some(tolerance), true) = (params.residual_tolerance, self.curr_step > 0) {
            if self.residual() < tolerance {
                return Some(StopReason::Converged);
            }
        }
        if let Some(final_time) = params.final_time {
            if self.curr_time >= final_time * (1.0 - 1.0e-14) {
                return Some(StopReason::FinalTime);
            }
        }
        if self.curr_step >= params.final_step {
            return Some(StopReason::FinalStep);
        }
        None
    }
    /// Element means must be physical and every coefficient finite.
    pub fn check_states(&self) -> Result<()> {
        let thermo = *self.disc.thermo();
        self.states
            .par_iter()
            .zip(self.disc.mesh.elements.par_iter())
            .enumerate()
            .try_for_each(|(ielem, (state, element))| {
                let reference = self.disc.reference(element)?;
                let mean = thermo.conserved_to_primitive(&state.mean(reference, element));
                if !mean.is_physical() || state.coeff.iter().any(|c| !c.is_finite()) {
                    debug!(ielem, ?mean, "non-physical element state");
                    return Err(DgError::NonPhysicalState {
                        element: ielem,
                        density: mean.density,
                        pressure: mean.pressure,
                    });
                }
                Ok(())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::mesh::mesh2d::{MeshInput, StructuredKind, StructuredMesh};
    use crate::disc::mesh::topology::PeriodicPair;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn params(
        order: usize,
        cfl: f64,
        time_scheme: TimeScheme,
        flux_scheme: FluxScheme,
    ) -> SolverParameters {
        SolverParameters {
            cfl,
            final_step: 10,
            final_time: None,
            residual_tolerance: None,
            polynomial_order: order,
            time_scheme,
            flux_scheme,
            roe_entropy_fix: false,
            log_interval: 1,
            write_interval: None,
        }
    }

    fn mesh(
        request: StructuredMesh,
        order: usize,
        periodic: &[PeriodicPair],
    ) -> (ReferenceElementTable, MeshTopology) {
        let input = MeshInput::structured(&request).unwrap();
        let table = ReferenceElementTable::new(&input.shapes(), order).unwrap();
        let mesh = MeshTopology::new(&input, &table, order, periodic).unwrap();
        (table, mesh)
    }

    fn channel(kind: StructuredKind) -> StructuredMesh {
        StructuredMesh {
            nx: 4,
            ny: 2,
            x_range: [0.0, 1.0],
            y_range: [0.0, 0.5],
            kind,
        }
    }

    fn uniform() -> Primitive {
        Primitive::new(1.4, 0.5, 0.0, 1.0)
    }

    fn channel_conditions() -> HashMap<String, BoundaryCondition> {
        let mut conditions = HashMap::new();
        conditions.insert("bottom".to_string(), BoundaryCondition::SlipWall);
        conditions.insert("top".to_string(), BoundaryCondition::SlipWall);
        conditions.insert(
            "left".to_string(),
            BoundaryCondition::RiemannFarfield { state: uniform() },
        );
        conditions.insert(
            "right".to_string(),
            BoundaryCondition::Farfield { state: uniform() },
        );
        conditions
    }

    #[test]
    fn test_uniform_flow_is_preserved() {
        for kind in [
            StructuredKind::Triangle,
            StructuredKind::Quadrilateral,
            StructuredKind::Mixed,
        ] {
            let (table, mesh) = mesh(channel(kind), 3, &[]);
            let params = params(3, 0.1, TimeScheme::SspRk3, FluxScheme::Roe);
            let mut solver = Solver::new(
                &mesh,
                &table,
                ThermodynamicModel::default(),
                &params,
                &channel_conditions(),
            )
            .unwrap();
            solver.initialize(|_, _| uniform()).unwrap();
            let reason = solver.solve(|_| Ok(())).unwrap();
            assert_eq!(reason, StopReason::FinalStep);
            assert_eq!(solver.curr_step, 10);
            assert!(solver.residual() < 1e-10);
            let expected = ThermodynamicModel::default().primitive_to_conserved(&uniform());
            for state in &solver.states {
                for k in 0..NVAR {
                    for &c in state.coeff_last.row(k) {
                        assert_relative_eq!(c, expected[k], epsilon = 1e-10);
                    }
                }
            }
        }
    }

    #[test]
    fn test_final_time_and_convergence() {
        let (table, mesh) = mesh(channel(StructuredKind::Quadrilateral), 2, &[]);
        let mut params = params(2, 0.1, TimeScheme::HeunRk2, FluxScheme::Hllc);
        params.final_step = 1000;
        // dt = 0.1 * 0.25 / 1.5, thirty steps
        params.final_time = Some(0.5);
        params.write_interval = Some(10);
        let conditions = channel_conditions();
        let thermo = ThermodynamicModel::default();
        let mut solver = Solver::new(&mesh, &table, thermo, &params, &conditions).unwrap();
        solver.initialize(|_, _| uniform()).unwrap();
        let mut snapshots = Vec::new();
        let reason = solver
            .solve(|s| {
                snapshots.push(s.curr_step);
                Ok(())
            })
            .unwrap();
        assert_eq!(reason, StopReason::FinalTime);
        assert_relative_eq!(solver.curr_time, 0.5, epsilon = 1e-13);
        assert_eq!(solver.curr_step, 30);
        assert_eq!(snapshots, vec![10, 20, 30]);

        params.final_time = None;
        params.residual_tolerance = Some(1e-8);
        let mut solver = Solver::new(&mesh, &table, thermo, &params, &conditions).unwrap();
        solver.initialize(|_, _| uniform()).unwrap();
        assert_eq!(solver.solve(|_| Ok(())).unwrap(), StopReason::Converged);
        assert_eq!(solver.curr_step, 1);
    }

    #[test]
    fn test_final_time_absorbs_short_remainder() {
        let (table, mesh) = mesh(channel(StructuredKind::Quadrilateral), 2, &[]);
        let mut params = params(2, 0.1, TimeScheme::SspRk3, FluxScheme::Roe);
        params.final_step = 1000;
        let final_time = 2.0 / 60.0 + 1.0e-9;
        params.final_time = Some(final_time);
        let conditions = channel_conditions();
        let thermo = ThermodynamicModel::default();
        let mut solver = Solver::new(&mesh, &table, thermo, &params, &conditions).unwrap();
        solver.initialize(|_, _| uniform()).unwrap();
        assert_relative_eq!(solver.step().unwrap(), 1.0 / 60.0, epsilon = 1e-14);
        let last = solver.step().unwrap();
        assert_relative_eq!(last, 1.0 / 60.0 + 1.0e-9, epsilon = 1e-14);
        assert_eq!(solver.solve(|_| Ok(())).unwrap(), StopReason::FinalTime);
        assert_eq!(solver.curr_step, 2);
        assert_relative_eq!(solver.curr_time, final_time, epsilon = 1e-14);
    }

    #[test]
    fn test_sod_shock_tube_stays_monotone() {
        let n = 16;
        let (table, mesh) = mesh(
            StructuredMesh {
                nx: n,
                ny: 1,
                x_range: [0.0, 1.0],
                y_range: [0.0, 1.0 / n as f64],
                kind: StructuredKind::Quadrilateral,
            },
            3,
            &[],
        );
        let left = Primitive::new(1.0, 0.75, 0.0, 1.4);
        let right = Primitive::new(0.125, 0.0, 0.0, 1.12);
        let mut conditions = HashMap::new();
        conditions.insert("bottom".to_string(), BoundaryCondition::SlipWall);
        conditions.insert("top".to_string(), BoundaryCondition::SlipWall);
        conditions.insert(
            "left".to_string(),
            BoundaryCondition::RiemannFarfield { state: left },
        );
        conditions.insert(
            "right".to_string(),
            BoundaryCondition::RiemannFarfield { state: right },
        );
        let params = params(3, 0.1, TimeScheme::SspRk3, FluxScheme::LaxFriedrichs);
        let mut solver = Solver::new(
            &mesh,
            &table,
            ThermodynamicModel::default(),
            &params,
            &conditions,
        )
        .unwrap();
        solver
            .initialize(|_, centroid| if centroid[0] < 0.5 { left } else { right })
            .unwrap();
        solver.solve(|_| Ok(())).unwrap();
        assert!(solver.curr_time > 0.0);

        let density: Vec<f64> = mesh
            .elements
            .iter()
            .zip(solver.states.iter())
            .map(|(element, state)| {
                state.mean(table.get(element.shape, 3).unwrap(), element)[0]
            })
            .collect();
        let tolerance = 0.05 * (left.density - right.density);
        for i in 0..n {
            assert!(density[i] <= left.density + tolerance);
            assert!(density[i] >= right.density - tolerance);
            if i + 1 < n {
                assert!(density[i + 1] <= density[i] + tolerance);
            }
        }
        // mass has crossed the jump while the ends are still undisturbed
        assert!(density[n / 2] > right.density + tolerance);
        assert_relative_eq!(density[0], left.density, epsilon = 1e-4);
        assert_relative_eq!(density[n - 1], right.density, epsilon = 1e-4);
    }

    fn periodic_wave(cfl: f64, time_scheme: TimeScheme) -> (bool, f64, f64) {
        let periodic = [
            PeriodicPair {
                from: "left".to_string(),
                to: "right".to_string(),
                translation: [1.0, 0.0],
            },
            PeriodicPair {
                from: "bottom".to_string(),
                to: "top".to_string(),
                translation: [0.0, 1.0],
            },
        ];
        let (table, mesh) = mesh(
            StructuredMesh {
                nx: 4,
                ny: 4,
                x_range: [0.0, 1.0],
                y_range: [0.0, 1.0],
                kind: StructuredKind::Quadrilateral,
            },
            2,
            &periodic,
        );
        let mut params = params(2, cfl, time_scheme, FluxScheme::Roe);
        params.final_step = 60;
        let mut solver = Solver::new(
            &mesh,
            &table,
            ThermodynamicModel::default(),
            &params,
            &HashMap::new(),
        )
        .unwrap();
        solver
            .initialize(|p, _| Primitive::new(1.0 + 0.2 * (2.0 * PI * p[0]).sin(), 1.0, 0.0, 1.0))
            .unwrap();
        let mut baseline = None;
        let mut largest: f64 = 0.0;
        for _ in 0..params.final_step {
            match solver.step() {
                Err(_) => return (true, baseline.unwrap_or(0.0), f64::INFINITY),
                Ok(_) => {
                    let norm = solver.residual();
                    let reference = *baseline.get_or_insert(norm);
                    largest = largest.max(norm);
                    if !norm.is_finite() || norm > 10.0 * reference {
                        return (true, reference, norm);
                    }
                }
            }
        }
        (false, baseline.unwrap_or(0.0), largest)
    }

    #[test]
    fn test_forward_euler_beyond_stability_diverges() {
        let (diverged, _, _) = periodic_wave(2.0, TimeScheme::ForwardEuler);
        assert!(diverged);
        let (diverged, baseline, largest) = periodic_wave(0.1, TimeScheme::SspRk3);
        assert!(!diverged, "baseline {baseline}, largest {largest}");
        assert!(baseline > 0.0);
    }

    #[test]
    fn test_configuration_errors() {
        let (table, mesh) = mesh(channel(StructuredKind::Triangle), 1, &[]);
        let params = params(1, 0.1, TimeScheme::ForwardEuler, FluxScheme::Roe);
        let mut conditions = channel_conditions();
        conditions.insert("inlet".to_string(), BoundaryCondition::SlipWall);
        let thermo = ThermodynamicModel::default();
        assert!(matches!(
            Solver::new(&mesh, &table, thermo, &params, &conditions),
            Err(DgError::UnknownPhysicalGroup(name)) if name == "inlet"
        ));
        let mut bad = params.clone();
        bad.cfl = -1.0;
        assert!(matches!(
            Solver::new(&mesh, &table, thermo, &bad, &channel_conditions()),
            Err(DgError::InvalidParameter(_))
        ));
        let mut mismatched = params.clone();
        mismatched.polynomial_order = 5;
        assert!(matches!(
            Solver::new(&mesh, &table, thermo, &mismatched, &channel_conditions()),
            Err(DgError::InvalidParameter(_))
        ));
        let mut solver = Solver::new(&mesh, &table, thermo, &params, &channel_conditions()).unwrap();
        assert!(matches!(
            solver.initialize(|_, _| Primitive::new(-1.0, 0.0, 0.0, 1.0)),
            Err(DgError::NonPhysicalState { .. })
        ));
    }
}
