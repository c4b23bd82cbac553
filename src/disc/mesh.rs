pub mod mesh2d;
pub mod topology;
