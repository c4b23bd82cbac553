use hashbrown::HashMap;
use ndarray::{Array1, Array2, Array3, ArrayView1, Axis, s};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::disc::basis::{
    invert, lagrange1d::LobattoBasis, quadrilateral::QuadrilateralBasis, triangle::TriangleBasis,
};
use crate::disc::gauss_points::{GaussPoints1d, get_jacobi_points_interval};
use crate::error::{DgError, Result};

pub const MAX_ORDER: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementShape {
    Line,
    Triangle,
    Quadrilateral,
}
impl ElementShape {
    pub const fn node_num(self) -> usize {
        match self {
            ElementShape::Line => 2,
            ElementShape::Triangle => 3,
            ElementShape::Quadrilateral => 4,
        }
    }
    pub const fn face_num(self) -> usize {
        self.node_num()
    }
    /// Local vertices of `face`, counterclockwise around the element.
    pub fn face_nodes(self, face: usize) -> &'static [usize] {
        static LINE: [[usize; 1]; 2] = [[0], [1]];
        static TRI: [[usize; 2]; 3] = [[0, 1], [1, 2], [2, 0]];
        static QUAD: [[usize; 2]; 4] = [[0, 1], [1, 2], [2, 3], [3, 0]];
        match self {
            ElementShape::Line => &LINE[face],
            ElementShape::Triangle => &TRI[face],
            ElementShape::Quadrilateral => &QUAD[face],
        }
    }
    pub fn reference_vertices(self) -> &'static [[f64; 2]] {
        match self {
            ElementShape::Line => &[[-1.0, 0.0], [1.0, 0.0]],
            ElementShape::Triangle => &[[-1.0, -1.0], [1.0, -1.0], [-1.0, 1.0]],
            ElementShape::Quadrilateral => &[[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]],
        }
    }
    /// Length/area of the reference shape.
    pub const fn measure(self) -> f64 {
        match self {
            ElementShape::Line | ElementShape::Triangle => 2.0,
            ElementShape::Quadrilateral => 4.0,
        }
    }
    pub const fn basis_num(self, order: usize) -> usize {
        match self {
            ElementShape::Line => order + 1,
            ElementShape::Triangle => (order + 1) * (order + 2) / 2,
            ElementShape::Quadrilateral => (order + 1) * (order + 1),
        }
    }
}

/// Polynomial degree integrated exactly by volume and face rules.
pub const fn quadrature_degree(order: usize) -> usize {
    2 * order + 2
}

enum NodalBasis {
    Line(LobattoBasis),
    Triangle(TriangleBasis),
    Quadrilateral(QuadrilateralBasis),
}
impl NodalBasis {
    fn new(shape: ElementShape, order: usize) -> Result<Self> {
        Ok(match shape {
            ElementShape::Line => NodalBasis::Line(LobattoBasis::new(order)),
            ElementShape::Triangle => NodalBasis::Triangle(TriangleBasis::new(order)?),
            ElementShape::Quadrilateral => {
                NodalBasis::Quadrilateral(QuadrilateralBasis::new(order)?)
            }
        })
    }
    fn nodes(&self) -> Array2<f64> {
        let (r, s) = match self {
            NodalBasis::Line(b) => (b.xi.view(), None),
            NodalBasis::Triangle(b) => (b.r.view(), Some(b.s.view())),
            NodalBasis::Quadrilateral(b) => (b.r.view(), Some(b.s.view())),
        };
        Array2::from_shape_fn((r.len(), 2), |(i, d)| match (d, &s) {
            (0, _) => r[i],
            (_, Some(s)) => s[i],
            (_, None) => 0.0,
        })
    }
    fn values(&self, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array2<f64> {
        match self {
            NodalBasis::Line(b) => b.evaluate_basis(r),
            NodalBasis::Triangle(b) => b.evaluate_basis(r, s),
            NodalBasis::Quadrilateral(b) => b.evaluate_basis(r, s),
        }
    }
    /// Gradients at (r, s), shape (points, basis, dim).
    fn gradients(&self, r: ArrayView1<f64>, s: ArrayView1<f64>) -> Array3<f64> {
        match self {
            NodalBasis::Line(b) => b.evaluate_grad_basis(r).insert_axis(Axis(2)),
            NodalBasis::Triangle(b) => {
                let (dr, ds) = b.evaluate_grad_basis(r, s);
                stack_gradients(dr, ds)
            }
            NodalBasis::Quadrilateral(b) => {
                let (dr, ds) = b.evaluate_grad_basis(r, s);
                stack_gradients(dr, ds)
            }
        }
    }
}

fn stack_gradients(dr: Array2<f64>, ds: Array2<f64>) -> Array3<f64> {
    let (nq, nb) = dr.dim();
    let mut grad = Array3::zeros((nq, nb, 2));
    grad.slice_mut(s![.., .., 0]).assign(&dr);
    grad.slice_mut(s![.., .., 1]).assign(&ds);
    grad
}

/// Quadrature rule of a shape: points (nq, 2) and weights.
fn volume_quadrature(shape: ElementShape, order: usize) -> (Array2<f64>, Array1<f64>) {
    let gp = GaussPoints1d::with_exactness(quadrature_degree(order));
    let n = gp.len();
    match shape {
        ElementShape::Line => {
            let mut points = Array2::zeros((n, 2));
            points.column_mut(0).assign(&gp.points);
            (points, gp.weights)
        }
        ElementShape::Quadrilateral => {
            let mut points = Array2::zeros((n * n, 2));
            let mut weights = Array1::zeros(n * n);
            for i in 0..n {
                for j in 0..n {
                    points[[i * n + j, 0]] = gp.points[j];
                    points[[i * n + j, 1]] = gp.points[i];
                    weights[i * n + j] = gp.weights[i] * gp.weights[j];
                }
            }
            (points, weights)
        }
        ElementShape::Triangle => {
            // collapsed coordinates: the (1 - b) factor of the map is carried by Gauss-Jacobi(1, 0)
            let (b_points, b_weights) = get_jacobi_points_interval(1.0, 0.0, n);
            let mut points = Array2::zeros((n * n, 2));
            let mut weights = Array1::zeros(n * n);
            for i in 0..n {
                for j in 0..n {
                    let a = gp.points[j];
                    let b = b_points[i];
                    points[[i * n + j, 0]] = 0.5 * (1.0 + a) * (1.0 - b) - 1.0;
                    points[[i * n + j, 1]] = b;
                    weights[i * n + j] = 0.5 * gp.weights[j] * b_weights[i];
                }
            }
            (points, weights)
        }
    }
}

/// Precomputed data of one (shape, order) pair, shared read-only by every
/// element of that kind.
#[derive(Clone, Debug)]
pub struct ReferenceElement {
    pub shape: ElementShape,
    pub order: usize,
    /// Interpolation nodes, shape (basis, 2); the coefficients of a state are its nodal values.
    pub nodes: Array2<f64>,
    pub quad_points: Array2<f64>,
    pub quad_weights: Array1<f64>,
    /// (quad points, basis)
    pub basis: Array2<f64>,
    /// (quad points, basis, dim)
    pub grad_basis: Array3<f64>,
    pub mass_inv: Array2<f64>,
    pub face_points: Array1<f64>,
    pub face_weights: Array1<f64>,
    /// Basis at face quadrature points mapped into the parent, row `face * nqf + j`.
    pub adjacency_basis: Array2<f64>,
}
impl ReferenceElement {
    pub fn new(shape: ElementShape, order: usize) -> Result<Self> {
        if order == 0 || order > MAX_ORDER {
            return Err(DgError::UnsupportedElement { shape, order });
        }
        let nodal = NodalBasis::new(shape, order)?;
        let nodes = nodal.nodes();
        let (quad_points, quad_weights) = volume_quadrature(shape, order);
        let r = quad_points.column(0);
        let s = quad_points.column(1);
        let basis = nodal.values(r, s);
        let grad_basis = nodal.gradients(r, s);
        let mass = basis.t().dot(&(&basis * &quad_weights.view().insert_axis(Axis(1))));
        let mass_inv = invert(mass.view(), "reference mass matrix")?;

        let (face_points, face_weights) = match shape {
            ElementShape::Line => (Array1::zeros(1), Array1::ones(1)),
            _ => {
                let gp = GaussPoints1d::with_exactness(quadrature_degree(order));
                (gp.points, gp.weights)
            }
        };
        let nqf = face_points.len();
        let nfaces = shape.face_num();
        let mut face_r = Array1::zeros(nfaces * nqf);
        let mut face_s = Array1::zeros(nfaces * nqf);
        for face in 0..nfaces {
            let (xa, xb) = Self::face_end_points(shape, face);
            for (j, &xi) in face_points.iter().enumerate() {
                face_r[face * nqf + j] = 0.5 * ((1.0 - xi) * xa[0] + (1.0 + xi) * xb[0]);
                face_s[face * nqf + j] = 0.5 * ((1.0 - xi) * xa[1] + (1.0 + xi) * xb[1]);
            }
        }
        let adjacency_basis = nodal.values(face_r.view(), face_s.view());
        debug!(
            ?shape,
            order,
            quad_points = quad_weights.len(),
            face_points = nqf,
            "reference element built"
        );
        Ok(Self {
            shape,
            order,
            nodes,
            quad_points,
            quad_weights,
            basis,
            grad_basis,
            mass_inv,
            face_points,
            face_weights,
            adjacency_basis,
        })
    }
    fn face_end_points(shape: ElementShape, face: usize) -> ([f64; 2], [f64; 2]) {
        let vertices = shape.reference_vertices();
        let nodes = shape.face_nodes(face);
        let xa = vertices[nodes[0]];
        let xb = vertices[nodes[nodes.len() - 1]];
        (xa, xb)
    }
    pub fn basis_num(&self) -> usize {
        self.basis.ncols()
    }
    pub fn quad_num(&self) -> usize {
        self.quad_weights.len()
    }
    pub fn face_quad_num(&self) -> usize {
        self.face_weights.len()
    }
}

/// All reference elements a run needs, built once before time marching.
#[derive(Clone, Debug, Default)]
pub struct ReferenceElementTable {
    elements: HashMap<(ElementShape, usize), ReferenceElement>,
}
impl ReferenceElementTable {
    pub fn new(shapes: &[ElementShape], order: usize) -> Result<Self> {
        let mut table = Self::default();
        for &shape in shapes {
            table.insert(shape, order)?;
        }
        Ok(table)
    }
    pub fn insert(&mut self, shape: ElementShape, order: usize) -> Result<&ReferenceElement> {
        if !self.elements.contains_key(&(shape, order)) {
            let element = ReferenceElement::new(shape, order)?;
            self.elements.insert((shape, order), element);
        }
        self.get(shape, order)
    }
    pub fn get(&self, shape: ElementShape, order: usize) -> Result<&ReferenceElement> {
        self.elements
            .get(&(shape, order))
            .ok_or(DgError::UnsupportedElement { shape, order })
    }
    pub fn len(&self) -> usize {
        self.elements.len()
    }
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
