pub mod basis;
pub mod boundary;
pub mod euler2d;
pub mod flux;
pub mod gauss_points;
pub mod geometric;
pub mod mesh;
pub mod reference_element;
pub mod riemann_solver;
pub mod thermo;
