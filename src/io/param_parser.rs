use std::fs;

use hashbrown::HashMap;
use serde::Deserialize;

use crate::disc::boundary::BoundaryCondition;
use crate::disc::mesh::mesh2d::StructuredMesh;
use crate::error::Result;
use crate::initialization::InitialCondition;
use crate::solver::{FlowParameters, SolverParameters};

fn default_output_dir() -> String {
    "outputs".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Everything a run needs, read from one JSON file.
#[derive(Deserialize, Debug, Clone)]
pub struct RunConfig {
    pub solver: SolverParameters,
    #[serde(default)]
    pub flow: FlowParameters,
    pub mesh: StructuredMesh,
    pub initial_condition: InitialCondition,
    pub boundary_conditions: HashMap<String, BoundaryCondition>,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}
impl RunConfig {
    pub fn parse(file_path: &str) -> Result<Self> {
        let file_content = fs::read_to_string(file_path)?;
        Self::from_json(&file_content)
    }
    pub fn from_json(content: &str) -> Result<Self> {
        let config: RunConfig = serde_json::from_str(content)?;
        Ok(config)
    }
}
