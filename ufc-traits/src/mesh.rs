use crate::Real;
use nalgebra::{Point, SVector};

/// Topological summary of a mesh.
///
/// Holds the number of mesh entities of each topological dimension. The backing storage
/// belongs to the assembler and must outlive every call that receives the view.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Mesh<'a> {
    pub num_entities: &'a [usize],
}

impl<'a> Mesh<'a> {
    pub fn new(num_entities: &'a [usize]) -> Self {
        Self { num_entities }
    }

    /// Number of entities of topological dimension `dim` in the whole mesh.
    ///
    /// # Panics
    ///
    /// Panics if `dim` exceeds the topological dimension of the mesh.
    pub fn num_entities(&self, dim: usize) -> usize {
        self.num_entities[dim]
    }

    pub fn topological_dimension(&self) -> usize {
        self.num_entities.len().saturating_sub(1)
    }
}

/// A view of a single cell in a mesh.
///
/// `entities[d]` holds the global indices of the entities of dimension `d` incident to the
/// cell, listed in the local order of the reference cell. `coordinates` holds the vertex
/// coordinates, one `geometric_dimension`-tuple per vertex, in the same local vertex order
/// as `entities[0]`.
///
/// A cell view is only valid for the duration of one local computation. Implementations of
/// [`NodeMap`](crate::NodeMap) and [`Form`](crate::Form) must not retain it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cell<'a> {
    pub entities: &'a [&'a [usize]],
    pub coordinates: &'a [Real],
    pub geometric_dimension: usize,
}

impl<'a> Cell<'a> {
    pub fn new(entities: &'a [&'a [usize]], coordinates: &'a [Real], geometric_dimension: usize) -> Self {
        debug_assert!(geometric_dimension > 0);
        debug_assert_eq!(coordinates.len() % geometric_dimension, 0);
        Self {
            entities,
            coordinates,
            geometric_dimension,
        }
    }

    pub fn topological_dimension(&self) -> usize {
        self.entities.len().saturating_sub(1)
    }

    pub fn geometric_dimension(&self) -> usize {
        self.geometric_dimension
    }

    pub fn num_vertices(&self) -> usize {
        self.coordinates.len() / self.geometric_dimension
    }

    /// Global indices of the entities of dimension `dim` incident to this cell.
    pub fn entity_indices(&self, dim: usize) -> &'a [usize] {
        self.entities[dim]
    }

    /// Coordinates of the local vertex with index `local_index`.
    pub fn vertex(&self, local_index: usize) -> &'a [Real] {
        let gdim = self.geometric_dimension;
        &self.coordinates[gdim * local_index..gdim * (local_index + 1)]
    }

    /// Coordinates of a local vertex as a fixed-size point.
    ///
    /// # Panics
    ///
    /// Panics if `D` is not the geometric dimension of the cell.
    pub fn vertex_point<const D: usize>(&self, local_index: usize) -> Point<Real, D> {
        assert_eq!(D, self.geometric_dimension, "Point dimension must match geometric dimension");
        Point::from(SVector::<Real, D>::from_column_slice(self.vertex(local_index)))
    }
}
