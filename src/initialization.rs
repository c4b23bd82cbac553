use serde::{Deserialize, Serialize};
use tracing::info;

use crate::disc::boundary::periodic_pairs;
use crate::disc::mesh::mesh2d::MeshInput;
use crate::disc::mesh::topology::MeshTopology;
use crate::disc::reference_element::ReferenceElementTable;
use crate::disc::thermo::{Primitive, ThermodynamicModel};
use crate::error::{DgError, Result};
use crate::io::param_parser::RunConfig;
use crate::solver::Solver;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum InitialCondition {
    Uniform { state: Primitive },
    /// `left` on elements whose centroid lies below `x0`, `right` elsewhere.
    Split {
        x0: f64,
        left: Primitive,
        right: Primitive,
    },
}
impl InitialCondition {
    pub fn state(&self, _point: [f64; 2], centroid: [f64; 2]) -> Primitive {
        match self {
            InitialCondition::Uniform { state } => *state,
            InitialCondition::Split { x0, left, right } => {
                if centroid[0] < *x0 {
                    *left
                } else {
                    *right
                }
            }
        }
    }
}

pub fn initialize_params_by_file(file_path: &str) -> Result<RunConfig> {
    let config = RunConfig::parse(file_path)?;
    config.solver.validate()?;
    config.mesh.validate()?;
    if !(1..=5).contains(&config.solver.polynomial_order) {
        return Err(DgError::InvalidParameter(format!(
            "polynomial order must lie in 1..=5, got {}",
            config.solver.polynomial_order
        )));
    }
    Ok(config)
}

/// Mesh and reference data the solver borrows from.
pub struct Problem {
    pub table: ReferenceElementTable,
    pub mesh: MeshTopology,
    pub thermo: ThermodynamicModel,
}

pub fn initialize_problem(config: &RunConfig) -> Result<Problem> {
    let order = config.solver.polynomial_order;
    let thermo = config.flow.thermo()?;
    let input = MeshInput::structured(&config.mesh)?;
    let table = ReferenceElementTable::new(&input.shapes(), order)?;
    let periodic = periodic_pairs(&config.boundary_conditions)?;
    let mesh = MeshTopology::new(&input, &table, order, &periodic)?;
    info!(
        nodes = mesh.nodes.len(),
        references = table.len(),
        periodic = periodic.len(),
        "problem built"
    );
    Ok(Problem {
        table,
        mesh,
        thermo,
    })
}

pub fn initialize_solver<'a>(problem: &'a Problem, config: &'a RunConfig) -> Result<Solver<'a>> {
    let mut solver = Solver::new(
        &problem.mesh,
        &problem.table,
        problem.thermo,
        &config.solver,
        &config.boundary_conditions,
    )?;
    solver.initialize(|point, centroid| config.initial_condition.state(point, centroid))?;
    Ok(solver)
}
