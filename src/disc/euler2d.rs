use hashbrown::HashMap;
use ndarray::{Array2, ArrayView1};
use rayon::prelude::*;
use tracing::debug;

use crate::disc::boundary::{BoundaryCondition, BoundaryFlux, resolve_boundary_fluxes};
use crate::disc::flux::flux_tensor;
use crate::disc::geometric::Geometric2D;
use crate::disc::mesh::topology::{AdjacencyFace, Element, FaceKind, FaceSide, MeshTopology};
use crate::disc::reference_element::{ReferenceElement, ReferenceElementTable};
use crate::disc::riemann_solver::NumericalFlux;
use crate::disc::thermo::{Conserved, NVAR, Primitive, ThermodynamicModel};
use crate::error::{DgError, Result};

/// Per-element solution storage, all matrices laid out as (variables, ...).
#[derive(Clone, Debug)]
pub struct ElementState {
    /// Nodal coefficients at the start of the current time step.
    pub coeff_last: Array2<f64>,
    /// Nodal coefficients of the current stage.
    pub coeff: Array2<f64>,
    pub residual: Array2<f64>,
    /// Scaled face fluxes at every face quadrature point of the element.
    pub adjacency_integral: Array2<f64>,
}
impl ElementState {
    pub fn new(basis_num: usize, adjacency_points: usize) -> Self {
        Self {
            coeff_last: Array2::zeros((NVAR, basis_num)),
            coeff: Array2::zeros((NVAR, basis_num)),
            residual: Array2::zeros((NVAR, basis_num)),
            adjacency_integral: Array2::zeros((NVAR, adjacency_points)),
        }
    }
    /// Element mean of the conserved state.
    pub fn mean(&self, reference: &ReferenceElement, element: &Element) -> Conserved {
        let mut total = [0.0; NVAR];
        let mut measure = 0.0;
        for q in 0..reference.quad_num() {
            let w = reference.quad_weights[q] * element.jacob_det[q];
            let u = interpolate(&self.coeff, reference.basis.row(q));
            for k in 0..NVAR {
                total[k] += w * u[k];
            }
            measure += w;
        }
        total.map(|value| value / measure)
    }
}

pub fn interpolate(coeff: &Array2<f64>, phi: ArrayView1<f64>) -> Conserved {
    let mut u = [0.0; NVAR];
    for k in 0..NVAR {
        u[k] = coeff.row(k).dot(&phi);
    }
    u
}

/// What a face sees beyond its left element.
#[derive(Clone, Copy)]
enum Outside<'r> {
    Element(FaceSide, &'r ReferenceElement),
    Boundary(BoundaryFlux),
}

/// Residual assembly of the 2d Euler equations.
pub struct EulerDisc<'a> {
    pub mesh: &'a MeshTopology,
    pub table: &'a ReferenceElementTable,
    pub flux: NumericalFlux,
    /// Resolved condition per boundary group.
    pub boundary: Vec<Option<BoundaryFlux>>,
}
impl<'a> EulerDisc<'a> {
    pub fn new(
        mesh: &'a MeshTopology,
        table: &'a ReferenceElementTable,
        flux: NumericalFlux,
        conditions: &HashMap<String, BoundaryCondition>,
    ) -> Result<Self> {
        let boundary = resolve_boundary_fluxes(mesh, conditions)?;
        Ok(Self {
            mesh,
            table,
            flux,
            boundary,
        })
    }
    pub fn thermo(&self) -> &ThermodynamicModel {
        &self.flux.thermo
    }
    pub fn reference(&self, element: &Element) -> Result<&'a ReferenceElement> {
        self.table.get(element.shape, self.mesh.order)
    }
    pub fn allocate_states(&self) -> Result<Vec<ElementState>> {
        self.mesh
            .elements
            .iter()
            .map(|element| {
                let reference = self.reference(element)?;
                Ok(ElementState::new(
                    reference.basis_num(),
                    element.shape.face_num() * reference.face_quad_num(),
                ))
            })
            .collect()
    }
    /// Sets both coefficient slots from a state sampled at the interpolation
    /// nodes. `initial` receives the node and the element centroid.
    pub fn initialize<F>(&self, states: &mut [ElementState], initial: F) -> Result<()>
    where
        F: Fn([f64; 2], [f64; 2]) -> Primitive + Sync,
    {
        let thermo = *self.thermo();
        states
            .par_iter_mut()
            .zip(self.mesh.elements.par_iter())
            .try_for_each(|(state, element)| -> Result<()> {
                let reference = self.reference(element)?;
                let x: Vec<f64> = element.inodes.iter().map(|&i| self.mesh.nodes[i][0]).collect();
                let y: Vec<f64> = element.inodes.iter().map(|&i| self.mesh.nodes[i][1]).collect();
                let centroid = element.centroid(&self.mesh.nodes);
                for (i, node) in reference.nodes.rows().into_iter().enumerate() {
                    let point = MeshTopology::map_to_physical(element.shape, node[0], node[1], &x, &y);
                    let u = thermo.primitive_to_conserved(&initial(point, centroid));
                    for k in 0..NVAR {
                        state.coeff_last[[k, i]] = u[k];
                    }
                }
                state.coeff.assign(&state.coeff_last);
                Ok(())
            })
    }
    /// Residual of the current stage coefficients:
    /// volume integral minus the lifted face integral.
    pub fn compute_residuals(&self, states: &mut [ElementState]) -> Result<()> {
        let face_fluxes = self.compute_face_fluxes(states)?;
        states
            .par_iter_mut()
            .zip(self.mesh.elements.par_iter())
            .try_for_each(|(state, element)| -> Result<()> {
                let reference = self.reference(element)?;
                self.gather_face_fluxes(state, element, reference, &face_fluxes);
                let volume = self.volume_integral(&state.coeff, element, reference);
                state.residual = volume - state.adjacency_integral.dot(&reference.adjacency_basis);
                Ok(())
            })
    }
    /// Numerical flux at every face point, scaled by face jacobian and weight.
    /// Shape of each entry is (variables, face points) in the left side's order.
    pub fn compute_face_fluxes(&self, states: &[ElementState]) -> Result<Vec<Array2<f64>>> {
        let face_fluxes = self
            .mesh
            .faces
            .par_iter()
            .map(|face| self.face_flux(face, states))
            .collect::<Result<Vec<_>>>()?;
        debug!(faces = face_fluxes.len(), "face fluxes computed");
        Ok(face_fluxes)
    }
    fn face_flux(&self, face: &AdjacencyFace, states: &[ElementState]) -> Result<Array2<f64>> {
        let thermo = self.thermo();
        let left_ref = self.reference(&self.mesh.elements[face.left.element])?;
        let nqf = left_ref.face_quad_num();
        let left_coeff = &states[face.left.element].coeff;
        let outside = match face.kind {
            FaceKind::Internal { right } | FaceKind::Periodic { right, .. } => {
                Outside::Element(right, self.reference(&self.mesh.elements[right.element])?)
            }
            FaceKind::Boundary { group } => Outside::Boundary(
                self.boundary
                    .get(group)
                    .copied()
                    .flatten()
                    .ok_or_else(|| {
                        DgError::MissingBoundaryCondition(
                            self.mesh.boundary_groups[group].name.clone(),
                        )
                    })?,
            ),
        };
        let mut values = Array2::zeros((NVAR, nqf));
        for j in 0..nqf {
            let ul = interpolate(
                left_coeff,
                left_ref.adjacency_basis.row(face.left.local_face * nqf + j),
            );
            let left = thermo.conserved_to_primitive(&ul);
            let flux = match outside {
                Outside::Element(side, right_ref) => {
                    let ur = interpolate(
                        &states[side.element].coeff,
                        right_ref
                            .adjacency_basis
                            .row(side.local_face * nqf + face.right_point(j)),
                    );
                    let right = thermo.conserved_to_primitive(&ur);
                    self.flux.flux(face.normal, &left, &right)
                }
                Outside::Boundary(condition) => condition.flux(&self.flux, face.normal, &left),
            };
            let scale = face.jacob_det[j] * left_ref.face_weights[j];
            for k in 0..NVAR {
                values[[k, j]] = flux[k] * scale;
            }
        }
        Ok(values)
    }
    fn gather_face_fluxes(
        &self,
        state: &mut ElementState,
        element: &Element,
        reference: &ReferenceElement,
        face_fluxes: &[Array2<f64>],
    ) {
        let nqf = reference.face_quad_num();
        for (local_face, element_face) in element.faces.iter().enumerate() {
            let face = &self.mesh.faces[element_face.face];
            let values = &face_fluxes[element_face.face];
            for j in 0..nqf {
                let column = local_face * nqf + j;
                // the right side receives the opposite flux
                let (source, sign) = if element_face.is_left {
                    (j, 1.0)
                } else {
                    (face.right_point(j), -1.0)
                };
                for k in 0..NVAR {
                    state.adjacency_integral[[k, column]] = sign * values[[k, source]];
                }
            }
        }
    }
    fn volume_integral(
        &self,
        coeff: &Array2<f64>,
        element: &Element,
        reference: &ReferenceElement,
    ) -> Array2<f64> {
        let thermo = self.thermo();
        let nb = reference.basis_num();
        let mut volume = Array2::zeros((NVAR, nb));
        for q in 0..reference.quad_num() {
            let u = interpolate(coeff, reference.basis.row(q));
            let [fx, fy] = flux_tensor(thermo, &thermo.conserved_to_primitive(&u));
            let scale = element.jacob_det[q] * reference.quad_weights[q];
            let inv_t = element.jacob_inv_t.row(q);
            for i in 0..nb {
                let dphi_dr = reference.grad_basis[[q, i, 0]];
                let dphi_ds = reference.grad_basis[[q, i, 1]];
                let dphi_dx = inv_t[0] * dphi_dr + inv_t[1] * dphi_ds;
                let dphi_dy = inv_t[2] * dphi_dr + inv_t[3] * dphi_ds;
                for k in 0..NVAR {
                    volume[[k, i]] += (fx[k] * dphi_dx + fy[k] * dphi_dy) * scale;
                }
            }
        }
        volume
    }
}
