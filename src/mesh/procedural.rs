//! Basic procedural mesh generation routines.
use crate::mesh::SimplexMesh;
use crate::reference_cell::CellShape;
use crate::Real;

/// A uniform mesh of `[0, 1]` with `cells` intervals.
pub fn create_unit_interval_mesh(cells: usize) -> SimplexMesh {
    let h = 1.0 / cells.max(1) as Real;
    let vertices = if cells == 0 {
        Vec::new()
    } else {
        (0..=cells).map(|i| i as Real * h).collect()
    };
    let connectivity = (0..cells).flat_map(|i| [i, i + 1]).collect();
    SimplexMesh::from_valid_parts(CellShape::Interval, 1, vertices, connectivity)
}

/// A uniform triangle mesh of `[0, 1]^2`.
///
/// The square is divided into `cells_per_dim x cells_per_dim` squares, each of which is split
/// into two triangles along the diagonal from its lower left to its upper right corner.
pub fn create_unit_square_uniform_tri_mesh_2d(cells_per_dim: usize) -> SimplexMesh {
    if cells_per_dim == 0 {
        return SimplexMesh::from_valid_parts(CellShape::Triangle, 2, Vec::new(), Vec::new());
    }

    let n = cells_per_dim;
    let h = 1.0 / n as Real;
    let to_global_vertex_index = |i, j| (n + 1) * j + i;

    let mut vertices = Vec::with_capacity(2 * (n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            vertices.extend_from_slice(&[i as Real * h, j as Real * h]);
        }
    }

    let mut cells = Vec::with_capacity(6 * n * n);
    for j in 0..n {
        for i in 0..n {
            let v00 = to_global_vertex_index(i, j);
            let v10 = to_global_vertex_index(i + 1, j);
            let v01 = to_global_vertex_index(i, j + 1);
            let v11 = to_global_vertex_index(i + 1, j + 1);
            cells.extend_from_slice(&[v00, v10, v11]);
            cells.extend_from_slice(&[v00, v11, v01]);
        }
    }

    SimplexMesh::from_valid_parts(CellShape::Triangle, 2, vertices, cells)
}

/// A uniform tetrahedral mesh of `[0, 1]^3`.
///
/// The cube is divided into `cells_per_dim^3` cubes, each of which is split into six
/// tetrahedra sharing the diagonal from its lower corner to its upper corner. Neighboring cubes
/// are split consistently, so the mesh is conforming.
pub fn create_unit_box_uniform_tet_mesh_3d(cells_per_dim: usize) -> SimplexMesh {
    if cells_per_dim == 0 {
        return SimplexMesh::from_valid_parts(CellShape::Tetrahedron, 3, Vec::new(), Vec::new());
    }

    let n = cells_per_dim;
    let h = 1.0 / n as Real;
    let to_global_vertex_index = |[i, j, k]: [usize; 3]| (n + 1) * (n + 1) * k + (n + 1) * j + i;

    let mut vertices = Vec::with_capacity(3 * (n + 1) * (n + 1) * (n + 1));
    for k in 0..=n {
        for j in 0..=n {
            for i in 0..=n {
                vertices.extend_from_slice(&[i as Real * h, j as Real * h, k as Real * h]);
            }
        }
    }

    const AXIS_PERMUTATIONS: [[usize; 3]; 6] = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];

    let mut cells = Vec::with_capacity(24 * n * n * n);
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                for permutation in &AXIS_PERMUTATIONS {
                    // Walk from the lower corner to the upper corner, one axis at a time
                    let mut corner = [i, j, k];
                    cells.push(to_global_vertex_index(corner));
                    for &axis in permutation {
                        corner[axis] += 1;
                        cells.push(to_global_vertex_index(corner));
                    }
                }
            }
        }
    }

    SimplexMesh::from_valid_parts(CellShape::Tetrahedron, 3, vertices, cells)
}
