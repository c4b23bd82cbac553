use thiserror::Error;

use crate::disc::reference_element::ElementShape;

#[derive(Error, Debug)]
pub enum DgError {
    #[error("unsupported element: {shape:?} of order {order}")]
    UnsupportedElement { shape: ElementShape, order: usize },

    #[error("physical group \"{0}\" is not defined by the mesh")]
    UnknownPhysicalGroup(String),

    #[error("no boundary condition for {0}")]
    MissingBoundaryCondition(String),

    #[error("malformed topology: face with nodes {nodes:?} is shared by {count} elements")]
    MalformedTopology { nodes: Vec<usize>, count: usize },

    #[error("degenerate element {0}: non-positive jacobian determinant")]
    DegenerateElement(usize),

    #[error("periodic groups \"{from}\" and \"{to}\" do not match: {reason}")]
    PeriodicMismatch {
        from: String,
        to: String,
        reason: String,
    },

    #[error("singular matrix while building {0}")]
    SingularMatrix(&'static str),

    #[error(
        "non-physical state in element {element}: density = {density:.6e}, pressure = {pressure:.6e}"
    )]
    NonPhysicalState {
        element: usize,
        density: f64,
        pressure: f64,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, DgError>;
