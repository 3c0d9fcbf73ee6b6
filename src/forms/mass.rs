use crate::forms::{p1_mass_entry, p1_node_map};
use crate::geometry::AffineSimplex;
use crate::reference_cell::CellShape;
use crate::Real;
use ufc_traits::{Cell, Form, NodeMap};

/// The bilinear form `(u, v) -> int_K u v dx` on linear Lagrange elements.
pub struct MassMatrix {
    shape: CellShape,
    node_maps: Vec<Box<dyn NodeMap>>,
}

impl MassMatrix {
    pub fn new(shape: CellShape) -> Self {
        Self {
            shape,
            node_maps: vec![p1_node_map(shape), p1_node_map(shape)],
        }
    }
}

impl Form for MassMatrix {
    fn signature(&self) -> String {
        format!("MassMatrix({:?})", self.shape)
    }

    fn rank(&self) -> usize {
        2
    }

    fn num_coefficients(&self) -> usize {
        0
    }

    fn tabulate(&self, a: &mut [Real], _w: &[&[Real]], cell: &Cell) {
        let simplex = AffineSimplex::from_cell(cell);
        let tdim = simplex.topological_dimension();
        let volume = simplex.volume();
        let n = tdim + 1;
        debug_assert_eq!(a.len(), n * n);

        for (idx, a_ij) in a.iter_mut().enumerate() {
            *a_ij = p1_mass_entry(volume, tdim, idx / n, idx % n);
        }
    }

    fn node_maps(&self) -> &[Box<dyn NodeMap>] {
        &self.node_maps
    }
}
