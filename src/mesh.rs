use crate::reference_cell::CellShape;
use crate::Real;
use eyre::ensure;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use ufc_traits::{Cell, Mesh, NodeMap};

pub mod procedural;

/// Index-based storage for a conforming mesh of simplices of a single shape.
///
/// On construction, every entity dimension is numbered globally: vertices keep their indices,
/// edges and faces are numbered in order of first appearance when walking the cells, and cells
/// are numbered by their index. The mesh is the owner of all the arrays that [`Mesh`] and
/// [`Cell`] views borrow from.
///
/// Only vertices and cells are serialized. Deserialization goes through
/// [`from_vertices_and_cells`](Self::from_vertices_and_cells), which validates the input and
/// renumbers the entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SimplexMeshData", try_from = "SimplexMeshData")]
pub struct SimplexMesh {
    shape: CellShape,
    geometric_dimension: usize,
    vertices: Vec<Real>,
    num_entities: Vec<usize>,
    /// `cell_entities[d]` holds `shape.num_entities(d)` global entity indices per cell.
    cell_entities: Vec<Vec<usize>>,
}

impl SimplexMesh {
    /// Construct a mesh from flat vertex coordinates and flat cell-vertex connectivity.
    ///
    /// `vertices` holds `geometric_dimension` coordinates per vertex and `cells` holds
    /// `shape.num_vertices()` vertex indices per cell, in the local vertex order of the
    /// reference cell.
    pub fn from_vertices_and_cells(
        shape: CellShape,
        geometric_dimension: usize,
        vertices: Vec<Real>,
        cells: Vec<usize>,
    ) -> eyre::Result<Self> {
        let tdim = shape.topological_dimension();
        ensure!(
            geometric_dimension >= tdim,
            "Geometric dimension {geometric_dimension} is smaller than the topological dimension {tdim}"
        );
        ensure!(
            vertices.len() % geometric_dimension == 0,
            "Number of vertex coordinates must be divisible by the geometric dimension"
        );
        ensure!(
            cells.len() % shape.num_vertices() == 0,
            "Number of cell vertex indices must be divisible by the number of vertices per cell"
        );
        let num_vertices = vertices.len() / geometric_dimension;
        if let Some(index) = cells.iter().find(|&&v| v >= num_vertices) {
            eyre::bail!("Cell vertex index {index} is out of bounds for {num_vertices} vertices");
        }
        for cell in cells.chunks_exact(shape.num_vertices()) {
            for (i, v) in cell.iter().enumerate() {
                ensure!(!cell[..i].contains(v), "Cell {cell:?} has repeated vertices");
            }
        }

        Ok(Self::from_valid_parts(shape, geometric_dimension, vertices, cells))
    }

    pub(crate) fn from_valid_parts(
        shape: CellShape,
        geometric_dimension: usize,
        vertices: Vec<Real>,
        cells: Vec<usize>,
    ) -> Self {
        let tdim = shape.topological_dimension();
        let num_vertices = vertices.len() / geometric_dimension;
        let num_cells = cells.len() / shape.num_vertices();

        let mut num_entities = vec![0; tdim + 1];
        let mut cell_entities = vec![Vec::new(); tdim + 1];

        for dim in 1..tdim {
            let entities_per_cell = shape.num_entities(dim);
            let mut entity_indices = FxHashMap::default();
            let mut connectivity = Vec::with_capacity(num_cells * entities_per_cell);
            for cell in cells.chunks_exact(shape.num_vertices()) {
                for local_entity in 0..entities_per_cell {
                    let key = sorted_entity_key(cell, shape.entity_vertices(dim, local_entity));
                    let next_index = entity_indices.len();
                    let index = *entity_indices.entry(key).or_insert(next_index);
                    connectivity.push(index);
                }
            }
            num_entities[dim] = entity_indices.len();
            cell_entities[dim] = connectivity;
        }

        num_entities[0] = num_vertices;
        num_entities[tdim] = num_cells;
        cell_entities[tdim] = (0..num_cells).collect();
        cell_entities[0] = cells;

        Self {
            shape,
            geometric_dimension,
            vertices,
            num_entities,
            cell_entities,
        }
    }

    pub fn shape(&self) -> CellShape {
        self.shape
    }

    pub fn geometric_dimension(&self) -> usize {
        self.geometric_dimension
    }

    pub fn topological_dimension(&self) -> usize {
        self.shape.topological_dimension()
    }

    pub fn num_vertices(&self) -> usize {
        self.num_entities[0]
    }

    pub fn num_cells(&self) -> usize {
        self.num_entities[self.topological_dimension()]
    }

    pub fn vertices(&self) -> &[Real] {
        &self.vertices
    }

    pub fn vertex(&self, index: usize) -> &[Real] {
        let gdim = self.geometric_dimension;
        &self.vertices[gdim * index..gdim * (index + 1)]
    }

    pub fn cell_vertices(&self, cell_index: usize) -> &[usize] {
        self.cell_entity_indices(cell_index, 0)
    }

    /// Global indices of the entities of dimension `dim` incident to the given cell,
    /// in the local order of the reference cell.
    pub fn cell_entity_indices(&self, cell_index: usize, dim: usize) -> &[usize] {
        let n = self.shape.num_entities(dim);
        &self.cell_entities[dim][n * cell_index..n * (cell_index + 1)]
    }

    /// The number of entities of each topological dimension.
    pub fn num_entities(&self) -> &[usize] {
        &self.num_entities
    }

    /// A topological view of the mesh.
    pub fn mesh(&self) -> Mesh<'_> {
        Mesh::new(&self.num_entities)
    }

    /// Calls `f` with a view of the cell with the given index.
    ///
    /// The vertex coordinates of the cell are gathered into `coordinates`, which is reused
    /// across calls to avoid allocation. The view only lives for the duration of the call.
    pub fn with_cell<R>(&self, cell_index: usize, coordinates: &mut Vec<Real>, f: impl FnOnce(&Cell) -> R) -> R {
        let tdim = self.topological_dimension();
        let mut entities: [&[usize]; 4] = [&[]; 4];
        for (dim, entity_indices) in entities.iter_mut().enumerate().take(tdim + 1) {
            *entity_indices = self.cell_entity_indices(cell_index, dim);
        }

        coordinates.clear();
        for &v in self.cell_vertices(cell_index) {
            coordinates.extend_from_slice(self.vertex(v));
        }

        let cell = Cell::new(&entities[..=tdim], coordinates.as_slice(), self.geometric_dimension);
        f(&cell)
    }

    /// The facets on the boundary of the mesh, as pairs `(cell_index, local_facet)`.
    pub fn boundary_facets(&self) -> Vec<(usize, usize)> {
        let facet_dim = self.topological_dimension() - 1;
        let mut facet_counts = vec![0usize; self.num_entities[facet_dim]];
        for &facet in &self.cell_entities[facet_dim] {
            facet_counts[facet] += 1;
        }

        let mut boundary = Vec::new();
        for cell_index in 0..self.num_cells() {
            let facets = self.cell_entity_indices(cell_index, facet_dim);
            for (local_facet, &facet) in facets.iter().enumerate() {
                if facet_counts[facet] == 1 {
                    boundary.push((cell_index, local_facet));
                }
            }
        }
        boundary
    }

    /// The sorted global indices of the nodes of `node_map` that lie on the boundary.
    pub fn boundary_nodes(&self, node_map: &dyn NodeMap) -> Vec<usize> {
        let mesh = self.mesh();
        let mut cell_nodes = vec![0; node_map.space_dimension()];
        let mut facet_dofs = vec![0; node_map.num_facet_dofs()];
        let mut coordinates = Vec::new();
        let mut boundary_nodes = Vec::new();

        for (cell_index, local_facet) in self.boundary_facets() {
            self.with_cell(cell_index, &mut coordinates, |cell| {
                node_map.tabulate(&mut cell_nodes, &mesh, cell)
            });
            node_map.tabulate_facet_dofs(&mut facet_dofs, local_facet);
            boundary_nodes.extend(facet_dofs.iter().map(|&dof| cell_nodes[dof]));
        }

        boundary_nodes.sort_unstable();
        boundary_nodes.dedup();
        boundary_nodes
    }
}

#[derive(Serialize, Deserialize)]
struct SimplexMeshData {
    shape: CellShape,
    geometric_dimension: usize,
    vertices: Vec<Real>,
    cells: Vec<usize>,
}

impl From<SimplexMesh> for SimplexMeshData {
    fn from(mut mesh: SimplexMesh) -> Self {
        Self {
            shape: mesh.shape,
            geometric_dimension: mesh.geometric_dimension,
            vertices: mesh.vertices,
            cells: std::mem::take(&mut mesh.cell_entities[0]),
        }
    }
}

impl TryFrom<SimplexMeshData> for SimplexMesh {
    type Error = eyre::Report;

    fn try_from(data: SimplexMeshData) -> eyre::Result<Self> {
        Self::from_vertices_and_cells(data.shape, data.geometric_dimension, data.vertices, data.cells)
    }
}

/// The global vertex indices of a local entity, sorted and padded to a fixed-size key.
fn sorted_entity_key(cell: &[usize], local_vertices: &[usize]) -> [usize; 3] {
    let mut key = [usize::MAX; 3];
    for (k, &v) in key.iter_mut().zip(local_vertices) {
        *k = cell[v];
    }
    key.sort_unstable();
    key
}
