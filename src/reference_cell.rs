//! Reference simplices and their local entity numbering.
//!
//! The numbering follows the usual UFC convention: entity `i` of codimension one is the entity
//! opposite local vertex `i`, and lower-dimensional entities are ordered lexicographically in
//! reverse. For the triangle this gives the edges `(1, 2), (0, 2), (0, 1)`, and for the
//! tetrahedron the edges `(2, 3), (1, 3), (1, 2), (0, 3), (0, 2), (0, 1)`.
use crate::Real;
use serde::{Deserialize, Serialize};

const INTERVAL_VERTICES: [&[usize]; 2] = [&[0], &[1]];
const INTERVAL_CELL: [&[usize]; 1] = [&[0, 1]];

const TRIANGLE_VERTICES: [&[usize]; 3] = [&[0], &[1], &[2]];
const TRIANGLE_EDGES: [&[usize]; 3] = [&[1, 2], &[0, 2], &[0, 1]];
const TRIANGLE_CELL: [&[usize]; 1] = [&[0, 1, 2]];

const TETRAHEDRON_VERTICES: [&[usize]; 4] = [&[0], &[1], &[2], &[3]];
const TETRAHEDRON_EDGES: [&[usize]; 6] = [&[2, 3], &[1, 3], &[1, 2], &[0, 3], &[0, 2], &[0, 1]];
const TETRAHEDRON_FACES: [&[usize]; 4] = [&[1, 2, 3], &[0, 2, 3], &[0, 1, 3], &[0, 1, 2]];
const TETRAHEDRON_CELL: [&[usize]; 1] = [&[0, 1, 2, 3]];

/// The shape of a reference simplex.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellShape {
    Interval,
    Triangle,
    Tetrahedron,
}

impl CellShape {
    pub fn topological_dimension(&self) -> usize {
        match self {
            CellShape::Interval => 1,
            CellShape::Triangle => 2,
            CellShape::Tetrahedron => 3,
        }
    }

    pub fn num_vertices(&self) -> usize {
        self.topological_dimension() + 1
    }

    /// The number of entities of dimension `dim` in a single cell.
    ///
    /// Returns zero if `dim` exceeds the topological dimension.
    pub fn num_entities(&self, dim: usize) -> usize {
        if dim > self.topological_dimension() {
            0
        } else {
            self.entities(dim).len()
        }
    }

    pub fn num_facets(&self) -> usize {
        self.num_vertices()
    }

    /// The local vertex indices of the local entity `index` of dimension `dim`.
    ///
    /// # Panics
    ///
    /// Panics if the entity does not exist.
    pub fn entity_vertices(&self, dim: usize, index: usize) -> &'static [usize] {
        self.entities(dim)[index]
    }

    fn entities(&self, dim: usize) -> &'static [&'static [usize]] {
        match (self, dim) {
            (CellShape::Interval, 0) => &INTERVAL_VERTICES,
            (CellShape::Interval, 1) => &INTERVAL_CELL,
            (CellShape::Triangle, 0) => &TRIANGLE_VERTICES,
            (CellShape::Triangle, 1) => &TRIANGLE_EDGES,
            (CellShape::Triangle, 2) => &TRIANGLE_CELL,
            (CellShape::Tetrahedron, 0) => &TETRAHEDRON_VERTICES,
            (CellShape::Tetrahedron, 1) => &TETRAHEDRON_EDGES,
            (CellShape::Tetrahedron, 2) => &TETRAHEDRON_FACES,
            (CellShape::Tetrahedron, 3) => &TETRAHEDRON_CELL,
            _ => panic!("{self:?} has no entities of dimension {dim}"),
        }
    }

    /// The local entities `(dim, index)` contained in the closure of the local facet `facet`,
    /// ordered by dimension and then by local index.
    pub fn facet_incidence(&self, facet: usize) -> Vec<(usize, usize)> {
        let tdim = self.topological_dimension();
        let facet_vertices = self.entity_vertices(tdim - 1, facet);
        let mut incident = Vec::new();
        for dim in 0..tdim {
            for (index, vertices) in self.entities(dim).iter().enumerate() {
                if vertices.iter().all(|v| facet_vertices.contains(v)) {
                    incident.push((dim, index));
                }
            }
        }
        incident
    }

    /// Vertex coordinates of the reference cell, one `tdim`-tuple per vertex.
    pub fn reference_vertices(&self) -> &'static [Real] {
        match self {
            CellShape::Interval => &[0.0, 1.0],
            CellShape::Triangle => &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            CellShape::Tetrahedron => &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    /// The barycenter of the local entity `index` of dimension `dim` on the reference cell.
    pub fn reference_entity_midpoint(&self, dim: usize, index: usize) -> [Real; 3] {
        let tdim = self.topological_dimension();
        let reference = self.reference_vertices();
        let vertices = self.entity_vertices(dim, index);
        let mut midpoint = [0.0; 3];
        for &v in vertices {
            for i in 0..tdim {
                midpoint[i] += reference[tdim * v + i];
            }
        }
        let n = vertices.len() as Real;
        for x in &mut midpoint {
            *x /= n;
        }
        midpoint
    }
}
