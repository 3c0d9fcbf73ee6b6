use crate::{Cell, Mesh, Real};

/// The local-to-global mapping of nodes (degrees of freedom) for a finite element space.
///
/// One node map exists per finite element space and argument or coefficient slot of a form.
/// Node maps are stateless: every method is a pure function of its arguments.
pub trait NodeMap: Send + Sync {
    /// A string identifying the finite element space.
    fn signature(&self) -> String;

    /// The topological dimension of the cells the node map is built for.
    fn topological_dimension(&self) -> usize;

    /// The number of local degrees of freedom on one cell.
    ///
    /// This is constant for a given node map.
    fn space_dimension(&self) -> usize;

    /// The number of global degrees of freedom on the given mesh.
    fn global_dimension(&self, mesh: &Mesh) -> usize;

    /// Whether any degree of freedom is attached to entities of dimension `dim`.
    ///
    /// An assembler only needs to number the entities of the dimensions for which
    /// this returns `true`.
    fn needs_mesh_entities(&self, dim: usize) -> bool;

    /// The number of local degrees of freedom on the closure of one facet.
    fn num_facet_dofs(&self) -> usize;

    /// Writes the global indices of the degrees of freedom of `cell` into `nodes`.
    ///
    /// Exactly `space_dimension()` entries are written, ordered by the local numbering of the
    /// element: degrees of freedom on vertices first, then on edges, faces and the interior,
    /// each group ordered by local entity index.
    ///
    /// A cell whose topological dimension does not match the node map is a contract violation.
    /// The result is then unspecified, and implementations may panic.
    fn tabulate(&self, nodes: &mut [usize], mesh: &Mesh, cell: &Cell);

    /// Writes the local indices of the degrees of freedom on the closure of the local facet
    /// `facet` into `dofs`, which must have length `num_facet_dofs()`.
    fn tabulate_facet_dofs(&self, dofs: &mut [usize], facet: usize);

    /// Writes the physical coordinates of every local degree of freedom of `cell` into
    /// `coordinates`, one `geometric_dimension`-tuple per degree of freedom.
    fn tabulate_coordinates(&self, coordinates: &mut [Real], cell: &Cell);

    /// The number of component node maps of a mixed space.
    fn num_sub_node_maps(&self) -> usize {
        0
    }

    /// The component node map with the given index, if any.
    fn sub_node_map(&self, _index: usize) -> Option<&dyn NodeMap> {
        None
    }
}

impl<N: NodeMap + ?Sized> NodeMap for Box<N> {
    fn signature(&self) -> String {
        (**self).signature()
    }

    fn topological_dimension(&self) -> usize {
        (**self).topological_dimension()
    }

    fn space_dimension(&self) -> usize {
        (**self).space_dimension()
    }

    fn global_dimension(&self, mesh: &Mesh) -> usize {
        (**self).global_dimension(mesh)
    }

    fn needs_mesh_entities(&self, dim: usize) -> bool {
        (**self).needs_mesh_entities(dim)
    }

    fn num_facet_dofs(&self) -> usize {
        (**self).num_facet_dofs()
    }

    fn tabulate(&self, nodes: &mut [usize], mesh: &Mesh, cell: &Cell) {
        (**self).tabulate(nodes, mesh, cell)
    }

    fn tabulate_facet_dofs(&self, dofs: &mut [usize], facet: usize) {
        (**self).tabulate_facet_dofs(dofs, facet)
    }

    fn tabulate_coordinates(&self, coordinates: &mut [Real], cell: &Cell) {
        (**self).tabulate_coordinates(coordinates, cell)
    }

    fn num_sub_node_maps(&self) -> usize {
        (**self).num_sub_node_maps()
    }

    fn sub_node_map(&self, index: usize) -> Option<&dyn NodeMap> {
        (**self).sub_node_map(index)
    }
}
