use std::ops::Range;

use hashbrown::HashMap;
use ndarray::{Array1, Array2, Axis};
use ndarray_stats::QuantileExt;
use tracing::{debug, info, warn};

use super::mesh2d::MeshInput;
use crate::disc::basis::invert;
use crate::disc::geometric::Geometric2D;
use crate::disc::reference_element::{ElementShape, ReferenceElementTable};
use crate::error::{DgError, Result};

const MATCH_TOLERANCE: f64 = 1.0e-8;
/// Group collecting boundary faces that no physical group names.
pub const UNTAGGED_GROUP: &str = "<untagged>";

/// One side of a face: element id and local face index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceSide {
    pub element: usize,
    pub local_face: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FaceKind {
    Internal {
        right: FaceSide,
    },
    /// Two boundary faces glued by a translation; the right element's
    /// outward normal is the negated face normal.
    Periodic {
        right: FaceSide,
    },
    Boundary {
        group: usize,
    },
}

#[derive(Clone, Debug)]
pub struct AdjacencyFace {
    /// Endpoints in the left element's counterclockwise order.
    pub inodes: [usize; 2],
    pub left: FaceSide,
    pub kind: FaceKind,
    /// Outward unit normal of the left element.
    pub normal: [f64; 2],
    /// Face jacobian determinant at each face quadrature point.
    pub jacob_det: Array1<f64>,
    /// Right-side face points run opposite to the left side's.
    pub reversed: bool,
}
impl AdjacencyFace {
    pub fn right(&self) -> Option<FaceSide> {
        match self.kind {
            FaceKind::Internal { right } | FaceKind::Periodic { right, .. } => Some(right),
            FaceKind::Boundary { .. } => None,
        }
    }
    /// Index of the right side's face point matching left point `j`.
    pub fn right_point(&self, j: usize) -> usize {
        if self.reversed {
            self.jacob_det.len() - 1 - j
        } else {
            j
        }
    }
}

/// Face incident to an element, seen from that element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementFace {
    pub face: usize,
    pub is_left: bool,
}

#[derive(Clone, Debug)]
pub struct Element {
    pub shape: ElementShape,
    /// Vertices, counterclockwise.
    pub inodes: Vec<usize>,
    pub jacob_det: Array1<f64>,
    /// Inverse transposed jacobian `[rx, sx, ry, sy]` per quadrature point.
    pub jacob_inv_t: Array2<f64>,
    /// Extents of the element's shadow normal to x and to y.
    pub projection_measure: [f64; 2],
    pub mass_inv: Array2<f64>,
    pub faces: Vec<ElementFace>,
}
impl Element {
    pub fn centroid(&self, nodes: &[[f64; 2]]) -> [f64; 2] {
        let n = self.inodes.len() as f64;
        let mut c = [0.0; 2];
        for &inode in &self.inodes {
            c[0] += nodes[inode][0] / n;
            c[1] += nodes[inode][1] / n;
        }
        c
    }
}

#[derive(Clone, Debug)]
pub struct BoundaryGroup {
    pub name: String,
    /// Boundary faces left in the group after periodic merging.
    pub faces: Vec<usize>,
}

/// Boundary groups glued together: faces of `from` translated by
/// `translation` land on faces of `to`.
#[derive(Clone, Debug, PartialEq)]
pub struct PeriodicPair {
    pub from: String,
    pub to: String,
    pub translation: [f64; 2],
}

#[derive(Clone, Debug)]
pub struct MeshTopology {
    pub order: usize,
    pub nodes: Vec<[f64; 2]>,
    pub elements: Vec<Element>,
    pub faces: Vec<AdjacencyFace>,
    pub shape_ranges: Vec<(ElementShape, Range<usize>)>,
    pub boundary_groups: Vec<BoundaryGroup>,
    pub internal_faces: Vec<usize>,
    pub boundary_faces: Vec<usize>,
    pub periodic_faces: Vec<usize>,
}
impl Geometric2D for MeshTopology {}
impl MeshTopology {
    pub fn new(
        input: &MeshInput,
        table: &ReferenceElementTable,
        order: usize,
        periodic: &[PeriodicPair],
    ) -> Result<Self> {
        if input.elem_num() == 0 {
            return Err(DgError::InvalidParameter("mesh has no elements".to_string()));
        }
        let elements = Self::build_elements(input, table, order)?;
        let mut topology = Self {
            order,
            nodes: input.nodes.clone(),
            elements,
            faces: Vec::new(),
            shape_ranges: Self::shape_ranges(input),
            boundary_groups: Vec::new(),
            internal_faces: Vec::new(),
            boundary_faces: Vec::new(),
            periodic_faces: Vec::new(),
        };
        topology.build_faces(input, table)?;
        let mut dead = vec![false; topology.faces.len()];
        for pair in periodic {
            topology.merge_periodic(pair, &mut dead)?;
        }
        topology.compact_faces(&dead);
        topology.classify_faces();
        info!(
            elements = topology.elements.len(),
            internal_faces = topology.internal_faces.len(),
            boundary_faces = topology.boundary_faces.len(),
            periodic_faces = topology.periodic_faces.len(),
            "mesh topology built"
        );
        Ok(topology)
    }
    pub fn elem_num(&self) -> usize {
        self.elements.len()
    }
    pub fn boundary_group(&self, name: &str) -> Result<usize> {
        self.boundary_groups
            .iter()
            .position(|group| group.name == name)
            .ok_or_else(|| DgError::UnknownPhysicalGroup(name.to_string()))
    }
    fn shape_ranges(input: &MeshInput) -> Vec<(ElementShape, Range<usize>)> {
        let ntri = input.triangles.len();
        let mut ranges = Vec::new();
        if ntri > 0 {
            ranges.push((ElementShape::Triangle, 0..ntri));
        }
        if !input.quadrilaterals.is_empty() {
            ranges.push((ElementShape::Quadrilateral, ntri..input.elem_num()));
        }
        ranges
    }
    fn build_elements(
        input: &MeshInput,
        table: &ReferenceElementTable,
        order: usize,
    ) -> Result<Vec<Element>> {
        let mut elements = Vec::with_capacity(input.elem_num());
        for ielem in 0..input.elem_num() {
            let (shape, inodes) = input.element(ielem);
            if let Some(&bad) = inodes.iter().find(|&&inode| inode >= input.nodes.len()) {
                return Err(DgError::InvalidParameter(format!(
                    "element {ielem} references node {bad}, mesh has {} nodes",
                    input.nodes.len()
                )));
            }
            let mut inodes = inodes.to_vec();
            let x: Vec<f64> = inodes.iter().map(|&i| input.nodes[i][0]).collect();
            let y: Vec<f64> = inodes.iter().map(|&i| input.nodes[i][1]).collect();
            let area = Self::compute_signed_area(&x, &y);
            if area.abs() <= f64::EPSILON * Self::bounding_extent(&x, &y).powi(2) {
                return Err(DgError::DegenerateElement(ielem));
            }
            if area < 0.0 {
                debug!(ielem, "reordering clockwise element");
                match shape {
                    ElementShape::Triangle => inodes.swap(1, 2),
                    _ => inodes = vec![inodes[0], inodes[3], inodes[2], inodes[1]],
                }
            }
            let reference = table.get(shape, order)?;
            let x: Vec<f64> = inodes.iter().map(|&i| input.nodes[i][0]).collect();
            let y: Vec<f64> = inodes.iter().map(|&i| input.nodes[i][1]).collect();
            let nq = reference.quad_num();
            let mut jacob_det = Array1::zeros(nq);
            let mut jacob_inv_t = Array2::zeros((nq, 4));
            for q in 0..nq {
                let r = reference.quad_points[[q, 0]];
                let s = reference.quad_points[[q, 1]];
                let (det, inv_t) = Self::evaluate_jacob(shape, r, s, &x, &y);
                if !(det > 0.0) {
                    return Err(DgError::DegenerateElement(ielem));
                }
                jacob_det[q] = det;
                for k in 0..4 {
                    jacob_inv_t[[q, k]] = inv_t[k];
                }
            }
            let weighted = &reference.basis
                * &(&reference.quad_weights * &jacob_det).insert_axis(Axis(1));
            let mass = reference.basis.t().dot(&weighted);
            let mass_inv = invert(mass.view(), "element mass matrix")?;
            let x = Array1::from(x);
            let y = Array1::from(y);
            let extent = |a: &Array1<f64>| a.max_skipnan() - a.min_skipnan();
            elements.push(Element {
                shape,
                inodes,
                jacob_det,
                jacob_inv_t,
                projection_measure: [extent(&y), extent(&x)],
                mass_inv,
                faces: Vec::with_capacity(shape.face_num()),
            });
        }
        Ok(elements)
    }
    fn bounding_extent(x: &[f64], y: &[f64]) -> f64 {
        let span = |v: &[f64]| {
            v.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
                - v.iter().cloned().fold(f64::INFINITY, f64::min)
        };
        span(x).max(span(y))
    }
    fn face_key(a: usize, b: usize) -> [usize; 2] {
        if a < b { [a, b] } else { [b, a] }
    }
    fn face_endpoints(&self, side: FaceSide) -> [usize; 2] {
        let element = &self.elements[side.element];
        let local = element.shape.face_nodes(side.local_face);
        [element.inodes[local[0]], element.inodes[local[1]]]
    }
    fn face_geometry(&self, inodes: [usize; 2]) -> ([f64; 2], f64) {
        let [x0, y0] = self.nodes[inodes[0]];
        let [x1, y1] = self.nodes[inodes[1]];
        (
            Self::compute_normal(x0, y0, x1, y1),
            Self::compute_edge_length(x0, y0, x1, y1),
        )
    }
    fn build_faces(&mut self, input: &MeshInput, table: &ReferenceElementTable) -> Result<()> {
        let mut incidences: HashMap<[usize; 2], Vec<FaceSide>> = HashMap::new();
        for (ielem, element) in self.elements.iter().enumerate() {
            for local_face in 0..element.shape.face_num() {
                let local = element.shape.face_nodes(local_face);
                let key = Self::face_key(element.inodes[local[0]], element.inodes[local[1]]);
                incidences.entry(key).or_default().push(FaceSide {
                    element: ielem,
                    local_face,
                });
            }
        }
        if let Some((key, sides)) = incidences.iter().find(|(_, sides)| sides.len() > 2) {
            return Err(DgError::MalformedTopology {
                nodes: key.to_vec(),
                count: sides.len(),
            });
        }

        let mut group_names: Vec<&String> = input.boundary_groups.keys().collect();
        group_names.sort();
        let mut edge_groups: HashMap<[usize; 2], usize> = HashMap::new();
        for (igroup, name) in group_names.iter().enumerate() {
            for edge in &input.boundary_groups[*name] {
                edge_groups.insert(Self::face_key(edge[0], edge[1]), igroup);
            }
        }
        self.boundary_groups = group_names
            .iter()
            .map(|name| BoundaryGroup {
                name: name.to_string(),
                faces: Vec::new(),
            })
            .collect();

        let nqf = table
            .get(self.elements[0].shape, self.order)
            .map(|reference| reference.face_quad_num())?;
        let mut created: HashMap<[usize; 2], usize> = HashMap::new();
        let mut untagged = None;
        for ielem in 0..self.elements.len() {
            for local_face in 0..self.elements[ielem].shape.face_num() {
                let side = FaceSide {
                    element: ielem,
                    local_face,
                };
                let inodes = self.face_endpoints(side);
                let key = Self::face_key(inodes[0], inodes[1]);
                if let Some(&iface) = created.get(&key) {
                    self.elements[ielem].faces.push(ElementFace {
                        face: iface,
                        is_left: false,
                    });
                    continue;
                }
                let sides = &incidences[&key];
                let kind = match sides.as_slice() {
                    [_, right] => FaceKind::Internal { right: *right },
                    _ => match edge_groups.get(&key) {
                        Some(&group) => FaceKind::Boundary { group },
                        None => FaceKind::Boundary {
                            group: *untagged.get_or_insert_with(|| {
                                self.boundary_groups.push(BoundaryGroup {
                                    name: UNTAGGED_GROUP.to_string(),
                                    faces: Vec::new(),
                                });
                                self.boundary_groups.len() - 1
                            }),
                        },
                    },
                };
                let reversed = match kind {
                    FaceKind::Internal { right } => self.face_endpoints(right)[0] == inodes[1],
                    _ => true,
                };
                let (normal, length) = self.face_geometry(inodes);
                let iface = self.faces.len();
                if let FaceKind::Boundary { group } = kind {
                    self.boundary_groups[group].faces.push(iface);
                }
                self.faces.push(AdjacencyFace {
                    inodes,
                    left: side,
                    kind,
                    normal,
                    jacob_det: Array1::from_elem(nqf, 0.5 * length),
                    reversed,
                });
                created.insert(key, iface);
                self.elements[ielem].faces.push(ElementFace {
                    face: iface,
                    is_left: true,
                });
            }
        }
        let tagged: usize = self
            .boundary_groups
            .iter()
            .filter(|g| g.name != UNTAGGED_GROUP)
            .map(|g| g.faces.len())
            .sum();
        if let Some(group) = untagged {
            debug!(faces = self.boundary_groups[group].faces.len(), "untagged boundary faces");
        }
        if tagged < edge_groups.len() {
            warn!(
                ignored = edge_groups.len() - tagged,
                "boundary group edges that are not mesh boundary faces were ignored"
            );
        }
        Ok(())
    }
    fn midpoint(&self, inodes: [usize; 2]) -> [f64; 2] {
        let a = self.nodes[inodes[0]];
        let b = self.nodes[inodes[1]];
        [0.5 * (a[0] + b[0]), 0.5 * (a[1] + b[1])]
    }
    fn merge_periodic(&mut self, pair: &PeriodicPair, dead: &mut [bool]) -> Result<()> {
        let mismatch = |reason: String| DgError::PeriodicMismatch {
            from: pair.from.clone(),
            to: pair.to.clone(),
            reason,
        };
        let from = self.boundary_group(&pair.from)?;
        let to = self.boundary_group(&pair.to)?;
        if from == to {
            return Err(mismatch("a group cannot be paired with itself".to_string()));
        }
        let from_faces = std::mem::take(&mut self.boundary_groups[from].faces);
        let to_faces = std::mem::take(&mut self.boundary_groups[to].faces);
        if from_faces.len() != to_faces.len() {
            return Err(mismatch(format!(
                "{} faces against {}",
                from_faces.len(),
                to_faces.len()
            )));
        }
        let t = pair.translation;
        let mut unmatched = to_faces;
        for iface in from_faces {
            let inodes = self.faces[iface].inodes;
            let m = self.midpoint(inodes);
            let target = [m[0] + t[0], m[1] + t[1]];
            let (_, length) = self.face_geometry(inodes);
            let tolerance = MATCH_TOLERANCE * length.max(1.0);
            let position = unmatched.iter().position(|&jface| {
                let mj = self.midpoint(self.faces[jface].inodes);
                (mj[0] - target[0]).abs() < tolerance && (mj[1] - target[1]).abs() < tolerance
            });
            let Some(position) = position else {
                return Err(mismatch(format!("no partner for face with midpoint {m:?}")));
            };
            let jface = unmatched.swap_remove(position);
            let partner = self.faces[jface].clone();
            let right_normal = partner.normal;
            let normal = self.faces[iface].normal;
            if (right_normal[0] + normal[0]).abs() > 1.0e-10
                || (right_normal[1] + normal[1]).abs() > 1.0e-10
            {
                return Err(mismatch(format!(
                    "normals {normal:?} and {right_normal:?} are not opposite"
                )));
            }
            let a = self.nodes[inodes[0]];
            let c = self.nodes[partner.inodes[0]];
            let reversed = (c[0] - a[0] - t[0]).abs() > tolerance
                || (c[1] - a[1] - t[1]).abs() > tolerance;
            let face = &mut self.faces[iface];
            face.kind = FaceKind::Periodic {
                right: partner.left,
            };
            face.reversed = reversed;
            self.elements[partner.left.element].faces[partner.left.local_face] = ElementFace {
                face: iface,
                is_left: false,
            };
            dead[jface] = true;
        }
        debug!(from = %pair.from, to = %pair.to, "periodic groups merged");
        Ok(())
    }
    /// Drops dead face records and renumbers the survivors.
    fn compact_faces(&mut self, dead: &[bool]) {
        let mut renumber = vec![usize::MAX; self.faces.len()];
        let mut next = 0;
        for (iface, &is_dead) in dead.iter().enumerate() {
            if !is_dead {
                renumber[iface] = next;
                next += 1;
            }
        }
        let faces = std::mem::take(&mut self.faces);
        self.faces = faces
            .into_iter()
            .zip(dead.iter())
            .filter(|(_, is_dead)| !**is_dead)
            .map(|(face, _)| face)
            .collect();
        for element in &mut self.elements {
            for element_face in &mut element.faces {
                element_face.face = renumber[element_face.face];
            }
        }
        for group in &mut self.boundary_groups {
            for face in &mut group.faces {
                *face = renumber[*face];
            }
        }
    }
    fn classify_faces(&mut self) {
        self.internal_faces.clear();
        self.boundary_faces.clear();
        self.periodic_faces.clear();
        for (iface, face) in self.faces.iter().enumerate() {
            match face.kind {
                FaceKind::Internal { .. } => self.internal_faces.push(iface),
                FaceKind::Periodic { .. } => self.periodic_faces.push(iface),
                FaceKind::Boundary { .. } => self.boundary_faces.push(iface),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::mesh::mesh2d::{StructuredKind, StructuredMesh};
    use approx::assert_relative_eq;

    fn build(kind: StructuredKind, periodic: &[PeriodicPair]) -> Result<MeshTopology> {
        let input = MeshInput::structured(&StructuredMesh {
            nx: 4,
            ny: 3,
            x_range: [0.0, 2.0],
            y_range: [0.0, 1.5],
            kind,
        })?;
        let table = ReferenceElementTable::new(&input.shapes(), 2)?;
        MeshTopology::new(&input, &table, 2, periodic)
    }

    fn periodic_box() -> Vec<PeriodicPair> {
        vec![
            PeriodicPair {
                from: "left".to_string(),
                to: "right".to_string(),
                translation: [2.0, 0.0],
            },
            PeriodicPair {
                from: "bottom".to_string(),
                to: "top".to_string(),
                translation: [0.0, 1.5],
            },
        ]
    }

    #[test]
    fn test_adjacency_completeness() {
        for kind in [
            StructuredKind::Triangle,
            StructuredKind::Quadrilateral,
            StructuredKind::Mixed,
        ] {
            let mesh = build(kind, &[]).unwrap();
            let incidences: usize = mesh.elements.iter().map(|e| e.shape.face_num()).sum();
            assert_eq!(
                2 * mesh.internal_faces.len() + mesh.boundary_faces.len(),
                incidences
            );
            assert_eq!(mesh.boundary_faces.len(), 14);
            for element in &mesh.elements {
                assert_eq!(element.faces.len(), element.shape.face_num());
            }
            let mut covered = 0;
            for (shape, range) in &mesh.shape_ranges {
                assert!(mesh.elements[range.clone()].iter().all(|e| e.shape == *shape));
                covered += range.len();
            }
            assert_eq!(covered, mesh.elem_num());
        }
    }

    #[test]
    fn test_face_sides_are_consistent() {
        let mesh = build(StructuredKind::Mixed, &periodic_box()).unwrap();
        for (iface, face) in mesh.faces.iter().enumerate() {
            assert_eq!(
                mesh.elements[face.left.element].faces[face.left.local_face],
                ElementFace {
                    face: iface,
                    is_left: true
                }
            );
            if let Some(right) = face.right() {
                assert_eq!(
                    mesh.elements[right.element].faces[right.local_face],
                    ElementFace {
                        face: iface,
                        is_left: false
                    }
                );
                assert!(face.reversed);
            }
            if let FaceKind::Internal { right } = face.kind {
                assert!(face.left.element < right.element);
            }
        }
    }

    #[test]
    fn test_normals_point_outward() {
        let mesh = build(StructuredKind::Triangle, &[]).unwrap();
        for face in &mesh.faces {
            let centroid = mesh.elements[face.left.element].centroid(&mesh.nodes);
            let m = mesh.midpoint(face.inodes);
            let outward = (m[0] - centroid[0]) * face.normal[0] + (m[1] - centroid[1]) * face.normal[1];
            assert!(outward > 0.0);
            assert_relative_eq!(face.normal[0].hypot(face.normal[1]), 1.0, epsilon = 1e-14);
        }
        let bottom = mesh.boundary_group("bottom").unwrap();
        for &iface in &mesh.boundary_groups[bottom].faces {
            assert_relative_eq!(mesh.faces[iface].normal[1], -1.0, epsilon = 1e-14);
            assert_relative_eq!(mesh.faces[iface].jacob_det[0], 0.25, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_periodic_box_has_no_boundary() {
        let mesh = build(StructuredKind::Quadrilateral, &periodic_box()).unwrap();
        assert!(mesh.boundary_faces.is_empty());
        assert_eq!(mesh.periodic_faces.len(), 7);
        assert_eq!(mesh.faces.len(), 2 * 12);
        for &iface in &mesh.periodic_faces {
            assert!(matches!(mesh.faces[iface].kind, FaceKind::Periodic { .. }));
        }
    }

    #[test]
    fn test_periodic_mismatch() {
        let shifted = vec![PeriodicPair {
            from: "left".to_string(),
            to: "right".to_string(),
            translation: [1.0, 0.0],
        }];
        assert!(matches!(
            build(StructuredKind::Quadrilateral, &shifted),
            Err(DgError::PeriodicMismatch { .. })
        ));
        let unequal = vec![PeriodicPair {
            from: "left".to_string(),
            to: "top".to_string(),
            translation: [0.0, 1.5],
        }];
        assert!(matches!(
            build(StructuredKind::Quadrilateral, &unequal),
            Err(DgError::PeriodicMismatch { .. })
        ));
        let unknown = vec![PeriodicPair {
            from: "inlet".to_string(),
            to: "right".to_string(),
            translation: [2.0, 0.0],
        }];
        assert!(matches!(
            build(StructuredKind::Quadrilateral, &unknown),
            Err(DgError::UnknownPhysicalGroup(name)) if name == "inlet"
        ));
    }

    #[test]
    fn test_malformed_and_clockwise_input() {
        let mut input = MeshInput {
            nodes: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [-1.0, 0.5]],
            // second triangle is clockwise
            triangles: vec![[0, 1, 2], [1, 2, 3]],
            ..Default::default()
        };
        input.boundary_groups.insert(
            "wall".to_string(),
            vec![[0, 1], [1, 3], [3, 2], [2, 0]],
        );
        let table = ReferenceElementTable::new(&[ElementShape::Triangle], 1).unwrap();
        let mesh = MeshTopology::new(&input, &table, 1, &[]).unwrap();
        assert_eq!(mesh.elements[1].inodes, vec![1, 3, 2]);
        assert_eq!(mesh.internal_faces.len(), 1);
        assert!(mesh.elements[1].jacob_det.iter().all(|&d| d > 0.0));

        // three triangles share the edge (0, 2)
        input.triangles.push([0, 2, 4]);
        input.triangles.push([2, 0, 1]);
        assert!(matches!(
            MeshTopology::new(&input, &table, 1, &[]),
            Err(DgError::MalformedTopology { count: 3, .. })
        ));

    }

    #[test]
    fn test_adjacency_completeness_without_tags() {
        let input = MeshInput {
            nodes: vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [2.0, 0.5]],
            triangles: vec![[0, 1, 2], [1, 3, 2], [1, 4, 3]],
            ..Default::default()
        };
        let table = ReferenceElementTable::new(&[ElementShape::Triangle], 1).unwrap();
        let mesh = MeshTopology::new(&input, &table, 1, &[]).unwrap();
        assert_eq!(mesh.internal_faces.len(), 2);
        assert_eq!(mesh.boundary_faces.len(), 5);
        assert_eq!(
            2 * mesh.internal_faces.len() + mesh.boundary_faces.len(),
            3 * mesh.elem_num()
        );
        let group = mesh.boundary_group(UNTAGGED_GROUP).unwrap();
        assert_eq!(mesh.boundary_groups.len(), 1);
        assert_eq!(mesh.boundary_groups[group].faces.len(), 5);
    }

    #[test]
    fn test_mass_matrix_and_projection() {
        let mesh = build(StructuredKind::Quadrilateral, &[]).unwrap();
        let element = &mesh.elements[0];
        assert_relative_eq!(element.projection_measure[0], 0.5, epsilon = 1e-14);
        assert_relative_eq!(element.projection_measure[1], 0.5, epsilon = 1e-14);
        // area = |J| * reference measure
        assert_relative_eq!(
            element.jacob_det[0] * element.shape.measure(),
            0.25,
            epsilon = 1e-14
        );
        assert_eq!(element.mass_inv.dim(), (9, 9));
    }
}
