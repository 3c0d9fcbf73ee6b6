//! Node maps driven by the number of degrees of freedom attached to each entity dimension.
use crate::geometry::AffineSimplex;
use crate::reference_cell::CellShape;
use crate::Real;
use eyre::eyre;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use ufc_traits::{Cell, Mesh, NodeMap};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Lagrange,
    DiscontinuousLagrange,
}

impl Display for Family {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Family::Lagrange => write!(f, "Lagrange"),
            Family::DiscontinuousLagrange => write!(f, "Discontinuous Lagrange"),
        }
    }
}

/// The layout of the degrees of freedom of a finite element over the entities of its
/// reference cell.
///
/// Local degrees of freedom are numbered by entity dimension, then by local entity index,
/// then by position on the entity. Every entity of dimension `d` carries the same number of
/// degrees of freedom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDofs {
    family: Family,
    shape: CellShape,
    degree: usize,
    dofs_per_entity: Vec<usize>,
    /// Reference coordinates of each degree of freedom, `tdim` values per degree of freedom.
    reference_points: Vec<Real>,
}

impl EntityDofs {
    pub fn new(family: Family, shape: CellShape, degree: usize) -> eyre::Result<Self> {
        match (family, degree) {
            (Family::Lagrange, 1) => Ok(Self::p1(shape)),
            (Family::Lagrange, 2) => Ok(Self::p2(shape)),
            (Family::DiscontinuousLagrange, 0) => Ok(Self::p0(shape)),
            (Family::DiscontinuousLagrange, 1) => Ok(Self::dp1(shape)),
            _ => Err(eyre!("{family} elements of degree {degree} are not supported")),
        }
    }

    /// Continuous piecewise linear elements: one degree of freedom per vertex.
    pub fn p1(shape: CellShape) -> Self {
        let tdim = shape.topological_dimension();
        let mut dofs_per_entity = vec![0; tdim + 1];
        dofs_per_entity[0] = 1;
        Self {
            family: Family::Lagrange,
            shape,
            degree: 1,
            dofs_per_entity,
            reference_points: shape.reference_vertices().to_vec(),
        }
    }

    /// Continuous piecewise quadratic elements: one degree of freedom per vertex and per edge.
    pub fn p2(shape: CellShape) -> Self {
        let tdim = shape.topological_dimension();
        let mut dofs_per_entity = vec![0; tdim + 1];
        dofs_per_entity[0] = 1;
        dofs_per_entity[1] = 1;

        let mut reference_points = shape.reference_vertices().to_vec();
        for edge in 0..shape.num_entities(1) {
            let midpoint = shape.reference_entity_midpoint(1, edge);
            reference_points.extend_from_slice(&midpoint[..tdim]);
        }

        Self {
            family: Family::Lagrange,
            shape,
            degree: 2,
            dofs_per_entity,
            reference_points,
        }
    }

    /// Piecewise constant elements: a single degree of freedom in the cell interior.
    pub fn p0(shape: CellShape) -> Self {
        let tdim = shape.topological_dimension();
        let mut dofs_per_entity = vec![0; tdim + 1];
        dofs_per_entity[tdim] = 1;
        let midpoint = shape.reference_entity_midpoint(tdim, 0);
        Self {
            family: Family::DiscontinuousLagrange,
            shape,
            degree: 0,
            dofs_per_entity,
            reference_points: midpoint[..tdim].to_vec(),
        }
    }

    /// Discontinuous piecewise linear elements: one degree of freedom per vertex, all of
    /// them owned by the cell interior.
    pub fn dp1(shape: CellShape) -> Self {
        let tdim = shape.topological_dimension();
        let mut dofs_per_entity = vec![0; tdim + 1];
        dofs_per_entity[tdim] = shape.num_vertices();
        Self {
            family: Family::DiscontinuousLagrange,
            shape,
            degree: 1,
            dofs_per_entity,
            reference_points: shape.reference_vertices().to_vec(),
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn shape(&self) -> CellShape {
        self.shape
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The number of degrees of freedom on each entity of dimension `dim`.
    pub fn dofs_per_entity(&self, dim: usize) -> usize {
        self.dofs_per_entity.get(dim).copied().unwrap_or(0)
    }

    pub fn space_dimension(&self) -> usize {
        (0..self.dofs_per_entity.len())
            .map(|dim| self.dofs_per_entity[dim] * self.shape.num_entities(dim))
            .sum()
    }

    /// The local index of the first degree of freedom on the local entity `(dim, index)`.
    fn local_entity_offset(&self, dim: usize, index: usize) -> usize {
        let preceding: usize = (0..dim)
            .map(|d| self.dofs_per_entity[d] * self.shape.num_entities(d))
            .sum();
        preceding + self.dofs_per_entity[dim] * index
    }

    /// The local degrees of freedom on the closure of the local facet `facet`, in increasing
    /// local order.
    fn facet_dofs(&self, facet: usize) -> Vec<usize> {
        let mut dofs = Vec::new();
        for (dim, index) in self.shape.facet_incidence(facet) {
            let offset = self.local_entity_offset(dim, index);
            dofs.extend(offset..offset + self.dofs_per_entity[dim]);
        }
        dofs
    }
}

/// A node map that numbers the degrees of freedom of an [`EntityDofs`] layout globally.
///
/// All degrees of freedom on entities of dimension `d` come after those on lower dimensions,
/// and are ordered by global entity index. Degree of freedom `k` on the entity of dimension
/// `d` with global index `e` has the global index
///
/// ```text
/// offset(d) + n(d) * e + k,     offset(d) = sum over d' < d of n(d') * num_entities(d')
/// ```
///
/// where `n(d)` is the number of degrees of freedom per entity of dimension `d`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityNodeMap {
    dofs: EntityDofs,
    space_dimension: usize,
    facet_dofs: Vec<Vec<usize>>,
}

impl EntityNodeMap {
    pub fn new(dofs: EntityDofs) -> Self {
        let facet_dofs = (0..dofs.shape.num_facets())
            .map(|facet| dofs.facet_dofs(facet))
            .collect();
        Self {
            space_dimension: dofs.space_dimension(),
            dofs,
            facet_dofs,
        }
    }

    pub fn dofs(&self) -> &EntityDofs {
        &self.dofs
    }
}

impl NodeMap for EntityNodeMap {
    fn signature(&self) -> String {
        format!(
            "{}({:?}, {})",
            self.dofs.family, self.dofs.shape, self.dofs.degree
        )
    }

    fn topological_dimension(&self) -> usize {
        self.dofs.shape.topological_dimension()
    }

    fn space_dimension(&self) -> usize {
        self.space_dimension
    }

    fn global_dimension(&self, mesh: &Mesh) -> usize {
        self.dofs
            .dofs_per_entity
            .iter()
            .enumerate()
            .map(|(dim, n)| n * mesh.num_entities(dim))
            .sum()
    }

    fn needs_mesh_entities(&self, dim: usize) -> bool {
        self.dofs.dofs_per_entity(dim) > 0
    }

    fn num_facet_dofs(&self) -> usize {
        self.facet_dofs.first().map(Vec::len).unwrap_or(0)
    }

    fn tabulate(&self, nodes: &mut [usize], mesh: &Mesh, cell: &Cell) {
        let mut offset = 0;
        let mut local = 0;
        for (dim, &n) in self.dofs.dofs_per_entity.iter().enumerate() {
            if n == 0 {
                continue;
            }
            for &entity in cell.entity_indices(dim) {
                for k in 0..n {
                    nodes[local] = offset + n * entity + k;
                    local += 1;
                }
            }
            offset += n * mesh.num_entities(dim);
        }
        debug_assert_eq!(local, self.space_dimension);
    }

    fn tabulate_facet_dofs(&self, dofs: &mut [usize], facet: usize) {
        dofs.copy_from_slice(&self.facet_dofs[facet]);
    }

    fn tabulate_coordinates(&self, coordinates: &mut [Real], cell: &Cell) {
        let simplex = AffineSimplex::from_cell(cell);
        let tdim = self.dofs.shape.topological_dimension();
        let gdim = cell.geometric_dimension();
        let reference_points = self.dofs.reference_points.chunks_exact(tdim);
        for (x, xi) in coordinates.chunks_exact_mut(gdim).zip(reference_points) {
            let physical = simplex.push_forward(xi);
            x.copy_from_slice(&physical[..gdim]);
        }
    }
}

/// A node map for a mixed space, made of the concatenation of several component spaces.
///
/// The local degrees of freedom of component `i` follow those of components `0, ..., i - 1`.
/// Likewise, the global numbering of component `i` is shifted by the global dimensions of the
/// preceding components.
pub struct MixedNodeMap {
    sub_node_maps: Vec<Box<dyn NodeMap>>,
}

impl MixedNodeMap {
    pub fn new(sub_node_maps: Vec<Box<dyn NodeMap>>) -> Self {
        Self { sub_node_maps }
    }

    /// A vector-valued space with `num_components` copies of the given scalar layout.
    pub fn vector(dofs: EntityDofs, num_components: usize) -> Self {
        let sub_node_maps = (0..num_components)
            .map(|_| Box::new(EntityNodeMap::new(dofs.clone())) as Box<dyn NodeMap>)
            .collect();
        Self::new(sub_node_maps)
    }

    fn local_chunks(&self) -> impl Iterator<Item = (&dyn NodeMap, std::ops::Range<usize>)> {
        let mut local_offset = 0;
        self.sub_node_maps.iter().map(move |sub| {
            let n = sub.space_dimension();
            let range = local_offset..local_offset + n;
            local_offset += n;
            (&**sub, range)
        })
    }
}

impl std::fmt::Debug for MixedNodeMap {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MixedNodeMap")
            .field("signature", &self.signature())
            .finish()
    }
}

impl NodeMap for MixedNodeMap {
    fn signature(&self) -> String {
        let components: Vec<_> = self
            .sub_node_maps
            .iter()
            .map(|sub| sub.signature())
            .collect();
        format!("Mixed({})", components.join(", "))
    }

    fn topological_dimension(&self) -> usize {
        self.sub_node_maps
            .first()
            .map(|sub| sub.topological_dimension())
            .unwrap_or(0)
    }

    fn space_dimension(&self) -> usize {
        self.sub_node_maps
            .iter()
            .map(|sub| sub.space_dimension())
            .sum()
    }

    fn global_dimension(&self, mesh: &Mesh) -> usize {
        self.sub_node_maps
            .iter()
            .map(|sub| sub.global_dimension(mesh))
            .sum()
    }

    fn needs_mesh_entities(&self, dim: usize) -> bool {
        self.sub_node_maps
            .iter()
            .any(|sub| sub.needs_mesh_entities(dim))
    }

    fn num_facet_dofs(&self) -> usize {
        self.sub_node_maps
            .iter()
            .map(|sub| sub.num_facet_dofs())
            .sum()
    }

    fn tabulate(&self, nodes: &mut [usize], mesh: &Mesh, cell: &Cell) {
        let mut global_offset = 0;
        for (sub, range) in self.local_chunks() {
            let sub_nodes = &mut nodes[range];
            sub.tabulate(sub_nodes, mesh, cell);
            for node in sub_nodes {
                *node += global_offset;
            }
            global_offset += sub.global_dimension(mesh);
        }
    }

    fn tabulate_facet_dofs(&self, dofs: &mut [usize], facet: usize) {
        let mut facet_offset = 0;
        for (sub, range) in self.local_chunks() {
            let n = sub.num_facet_dofs();
            let sub_dofs = &mut dofs[facet_offset..facet_offset + n];
            sub.tabulate_facet_dofs(sub_dofs, facet);
            for dof in sub_dofs {
                *dof += range.start;
            }
            facet_offset += n;
        }
    }

    fn tabulate_coordinates(&self, coordinates: &mut [Real], cell: &Cell) {
        let gdim = cell.geometric_dimension();
        for (sub, range) in self.local_chunks() {
            sub.tabulate_coordinates(&mut coordinates[gdim * range.start..gdim * range.end], cell);
        }
    }

    fn num_sub_node_maps(&self) -> usize {
        self.sub_node_maps.len()
    }

    fn sub_node_map(&self, index: usize) -> Option<&dyn NodeMap> {
        self.sub_node_maps.get(index).map(|sub| &**sub)
    }
}
