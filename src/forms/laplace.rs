use crate::forms::p1_node_map;
use crate::geometry::AffineSimplex;
use crate::reference_cell::CellShape;
use crate::Real;
use ufc_traits::{Cell, Form, NodeMap};

/// The bilinear form `(u, v) -> int_K grad u . grad v dx` on linear Lagrange elements.
///
/// The basis gradients are constant on affine cells, so the element matrix is
/// `|K| G^T G` where the columns of `G` are the physical basis gradients.
pub struct LaplaceMatrix {
    shape: CellShape,
    node_maps: Vec<Box<dyn NodeMap>>,
}

impl LaplaceMatrix {
    pub fn new(shape: CellShape) -> Self {
        Self {
            shape,
            node_maps: vec![p1_node_map(shape), p1_node_map(shape)],
        }
    }
}

impl Form for LaplaceMatrix {
    fn signature(&self) -> String {
        format!("LaplaceMatrix({:?})", self.shape)
    }

    fn rank(&self) -> usize {
        2
    }

    fn num_coefficients(&self) -> usize {
        0
    }

    fn tabulate(&self, a: &mut [Real], _w: &[&[Real]], cell: &Cell) {
        let simplex = AffineSimplex::from_cell(cell);
        let n = simplex.topological_dimension() + 1;
        let volume = simplex.volume();
        let gradients = simplex.p1_basis_gradients();
        debug_assert_eq!(a.len(), n * n);

        // Fill only the upper triangle, then mirror
        for i in 0..n {
            for j in i..n {
                let a_ij = volume * gradients[i].dot(&gradients[j]);
                a[n * i + j] = a_ij;
                a[n * j + i] = a_ij;
            }
        }
    }

    fn node_maps(&self) -> &[Box<dyn NodeMap>] {
        &self.node_maps
    }
}
