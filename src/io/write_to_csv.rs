use csv::Writer;
use serde::Serialize;

use crate::disc::geometric::Geometric2D;
use crate::disc::mesh::topology::MeshTopology;
use crate::disc::thermo::{Conserved, NVAR};
use crate::error::Result;
use crate::solver::Solver;

#[derive(Serialize)]
struct PointData {
    element: usize,
    x: f64,
    y: f64,
    density: f64,
    u: f64,
    v: f64,
    pressure: f64,
    temperature: f64,
    mach: f64,
}

/// Primitive fields at every interpolation node of every element.
pub fn write_to_csv(solver: &Solver, filename: &str) -> Result<()> {
    let disc = &solver.disc;
    let mesh = disc.mesh;
    let thermo = disc.thermo();
    let mut writer = Writer::from_path(filename)?;
    for (ielem, (element, state)) in mesh.elements.iter().zip(solver.states.iter()).enumerate() {
        let reference = disc.reference(element)?;
        let x: Vec<f64> = element.inodes.iter().map(|&i| mesh.nodes[i][0]).collect();
        let y: Vec<f64> = element.inodes.iter().map(|&i| mesh.nodes[i][1]).collect();
        for (i, node) in reference.nodes.rows().into_iter().enumerate() {
            let [px, py] = MeshTopology::map_to_physical(element.shape, node[0], node[1], &x, &y);
            let mut u: Conserved = [0.0; NVAR];
            for k in 0..NVAR {
                u[k] = state.coeff[[k, i]];
            }
            let primitive = thermo.conserved_to_primitive(&u);
            writer.serialize(PointData {
                element: ielem,
                x: px,
                y: py,
                density: primitive.density,
                u: primitive.velocity[0],
                v: primitive.velocity[1],
                pressure: primitive.pressure,
                temperature: thermo.temperature(primitive.density, primitive.pressure),
                mach: thermo.mach_number(&primitive),
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disc::boundary::BoundaryCondition;
    use crate::disc::mesh::mesh2d::{MeshInput, StructuredKind, StructuredMesh};
    use crate::disc::reference_element::ReferenceElementTable;
    use crate::disc::riemann_solver::FluxScheme;
    use crate::disc::thermo::{Primitive, ThermodynamicModel};
    use crate::solver::SolverParameters;
    use crate::temporal_disc::TimeScheme;
    use approx::assert_relative_eq;
    use hashbrown::HashMap;
    use std::fs;

    #[test]
    fn test_write_uniform_state() {
        let input = MeshInput::structured(&StructuredMesh {
            nx: 2,
            ny: 1,
            x_range: [0.0, 2.0],
            y_range: [0.0, 1.0],
            kind: StructuredKind::Mixed,
        })
        .unwrap();
        let table = ReferenceElementTable::new(&input.shapes(), 1).unwrap();
        let mesh = MeshTopology::new(&input, &table, 1, &[]).unwrap();
        let params = SolverParameters {
            cfl: 0.5,
            final_step: 1,
            final_time: None,
            residual_tolerance: None,
            polynomial_order: 1,
            time_scheme: TimeScheme::ForwardEuler,
            flux_scheme: FluxScheme::Roe,
            roe_entropy_fix: false,
            log_interval: 1,
            write_interval: None,
        };
        let state = Primitive::new(1.4, 0.5, 0.0, 1.0);
        let mut conditions = HashMap::new();
        for name in ["bottom", "right", "top", "left"] {
            conditions.insert(name.to_string(), BoundaryCondition::Farfield { state });
        }
        let mut solver = Solver::new(
            &mesh,
            &table,
            ThermodynamicModel::default(),
            &params,
            &conditions,
        )
        .unwrap();
        solver.initialize(|_, _| state).unwrap();

        let path = std::env::temp_dir().join("dg_euler_write_uniform_state.csv");
        let filename = path.to_string_lossy().to_string();
        write_to_csv(&solver, &filename).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        fs::remove_file(&path).unwrap();

        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("element,x,y,density,u,v,pressure,temperature,mach")
        );
        let rows: Vec<Vec<f64>> = lines
            .map(|line| line.split(',').map(|v| v.parse().unwrap()).collect())
            .collect();
        // one quad and two triangles at order one
        assert_eq!(rows.len(), 4 + 3 + 3);
        for row in &rows {
            assert!(row[1] >= 0.0 && row[1] <= 2.0);
            assert_relative_eq!(row[3], 1.4, epsilon = 1e-12);
            assert_relative_eq!(row[4], 0.5, epsilon = 1e-12);
            assert_relative_eq!(row[6], 1.0, epsilon = 1e-12);
            assert_relative_eq!(row[8], 0.5, epsilon = 1e-12);
        }
    }
}
