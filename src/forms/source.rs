use crate::forms::{p1_mass_entry, p1_node_map, CoefficientSpace};
use crate::geometry::AffineSimplex;
use crate::reference_cell::CellShape;
use crate::Real;
use ufc_traits::{Cell, Form, NodeMap};

/// The linear form `v -> int_K f v dx` with a linear Lagrange test space and a source
/// coefficient `f`.
pub struct SourceVector {
    shape: CellShape,
    coefficient_space: CoefficientSpace,
    node_maps: Vec<Box<dyn NodeMap>>,
}

impl SourceVector {
    pub fn new(shape: CellShape, coefficient_space: CoefficientSpace) -> Self {
        Self {
            shape,
            coefficient_space,
            node_maps: vec![p1_node_map(shape), coefficient_space.node_map(shape)],
        }
    }
}

impl Form for SourceVector {
    fn signature(&self) -> String {
        format!("SourceVector({:?}, {})", self.shape, self.coefficient_space)
    }

    fn rank(&self) -> usize {
        1
    }

    fn num_coefficients(&self) -> usize {
        1
    }

    fn tabulate(&self, a: &mut [Real], w: &[&[Real]], cell: &Cell) {
        let simplex = AffineSimplex::from_cell(cell);
        let tdim = simplex.topological_dimension();
        let volume = simplex.volume();
        let f = w[0];
        let n = tdim + 1;
        debug_assert_eq!(a.len(), n);

        match self.coefficient_space {
            CoefficientSpace::Constant => {
                let b = f[0] * volume / n as Real;
                a.fill(b);
            }
            CoefficientSpace::Linear => {
                for (i, b_i) in a.iter_mut().enumerate() {
                    *b_i = (0..n)
                        .map(|j| p1_mass_entry(volume, tdim, i, j) * f[j])
                        .sum();
                }
            }
        }
    }

    fn node_maps(&self) -> &[Box<dyn NodeMap>] {
        &self.node_maps
    }
}
