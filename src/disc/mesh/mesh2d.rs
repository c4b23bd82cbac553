use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::disc::reference_element::ElementShape;
use crate::error::{DgError, Result};

/// Raw mesh as handed over by a mesh generator: coordinates, per-shape
/// connectivity and named physical groups. Element ids are contiguous per
/// shape, triangles first.
#[derive(Clone, Debug, Default)]
pub struct MeshInput {
    pub nodes: Vec<[f64; 2]>,
    pub triangles: Vec<[usize; 3]>,
    pub quadrilaterals: Vec<[usize; 4]>,
    /// Boundary groups as lists of edges (node pairs).
    pub boundary_groups: HashMap<String, Vec<[usize; 2]>>,
    /// Region groups as lists of element ids.
    pub region_groups: HashMap<String, Vec<usize>>,
}
impl MeshInput {
    pub fn elem_num(&self) -> usize {
        self.triangles.len() + self.quadrilaterals.len()
    }
    pub fn shapes(&self) -> Vec<ElementShape> {
        let mut shapes = Vec::new();
        if !self.triangles.is_empty() {
            shapes.push(ElementShape::Triangle);
        }
        if !self.quadrilaterals.is_empty() {
            shapes.push(ElementShape::Quadrilateral);
        }
        shapes
    }
    pub fn element(&self, ielem: usize) -> (ElementShape, &[usize]) {
        let ntri = self.triangles.len();
        if ielem < ntri {
            (ElementShape::Triangle, &self.triangles[ielem])
        } else {
            (ElementShape::Quadrilateral, &self.quadrilaterals[ielem - ntri])
        }
    }
    pub fn region_elements(&self, name: &str) -> Result<&[usize]> {
        self.region_groups
            .get(name)
            .map(|elements| elements.as_slice())
            .ok_or_else(|| DgError::UnknownPhysicalGroup(name.to_string()))
    }
    pub fn structured(request: &StructuredMesh) -> Result<Self> {
        request.validate()?;
        let StructuredMesh {
            nx,
            ny,
            x_range,
            y_range,
            kind,
        } = *request;
        let node_id = |i: usize, j: usize| j * (nx + 1) + i;
        let mut nodes = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..ny + 1 {
            for i in 0..nx + 1 {
                nodes.push([
                    x_range[0] + (x_range[1] - x_range[0]) * i as f64 / nx as f64,
                    y_range[0] + (y_range[1] - y_range[0]) * j as f64 / ny as f64,
                ]);
            }
        }
        let mut triangles = Vec::new();
        let mut quadrilaterals = Vec::new();
        for j in 0..ny {
            for i in 0..nx {
                let cell = [
                    node_id(i, j),
                    node_id(i + 1, j),
                    node_id(i + 1, j + 1),
                    node_id(i, j + 1),
                ];
                let as_quad = match kind {
                    StructuredKind::Quadrilateral => true,
                    StructuredKind::Triangle => false,
                    StructuredKind::Mixed => (i + j) % 2 == 0,
                };
                if as_quad {
                    quadrilaterals.push(cell);
                } else {
                    triangles.push([cell[0], cell[1], cell[2]]);
                    triangles.push([cell[0], cell[2], cell[3]]);
                }
            }
        }
        let mut boundary_groups = HashMap::new();
        boundary_groups.insert(
            "bottom".to_string(),
            (0..nx).map(|i| [node_id(i, 0), node_id(i + 1, 0)]).collect(),
        );
        boundary_groups.insert(
            "right".to_string(),
            (0..ny).map(|j| [node_id(nx, j), node_id(nx, j + 1)]).collect(),
        );
        boundary_groups.insert(
            "top".to_string(),
            (0..nx)
                .map(|i| [node_id(i + 1, ny), node_id(i, ny)])
                .collect(),
        );
        boundary_groups.insert(
            "left".to_string(),
            (0..ny).map(|j| [node_id(0, j + 1), node_id(0, j)]).collect(),
        );
        let elem_num = triangles.len() + quadrilaterals.len();
        let mut region_groups = HashMap::new();
        region_groups.insert("fluid".to_string(), (0..elem_num).collect());
        Ok(Self {
            nodes,
            triangles,
            quadrilaterals,
            boundary_groups,
            region_groups,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructuredKind {
    Triangle,
    Quadrilateral,
    /// Checkerboard of quadrilaterals and split cells.
    Mixed,
}

/// Rectangle split into `nx * ny` cells.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct StructuredMesh {
    pub nx: usize,
    pub ny: usize,
    pub x_range: [f64; 2],
    pub y_range: [f64; 2],
    pub kind: StructuredKind,
}
impl StructuredMesh {
    pub fn validate(&self) -> Result<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(DgError::InvalidParameter(format!(
                "structured mesh needs at least one cell per direction, got {} x {}",
                self.nx, self.ny
            )));
        }
        if !(self.x_range[1] > self.x_range[0] && self.y_range[1] > self.y_range[0]) {
            return Err(DgError::InvalidParameter(format!(
                "empty mesh extents {:?} x {:?}",
                self.x_range, self.y_range
            )));
        }
        Ok(())
    }
}
