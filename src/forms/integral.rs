use crate::forms::CoefficientSpace;
use crate::geometry::AffineSimplex;
use crate::reference_cell::CellShape;
use crate::Real;
use ufc_traits::{Cell, Form, NodeMap};

/// The functional `w -> int_K w dx` of a single coefficient `w`.
///
/// For constant and linear coefficients, the integral is exactly the cell volume times the
/// mean of the nodal values.
pub struct CoefficientIntegral {
    shape: CellShape,
    coefficient_space: CoefficientSpace,
    node_maps: Vec<Box<dyn NodeMap>>,
}

impl CoefficientIntegral {
    pub fn new(shape: CellShape, coefficient_space: CoefficientSpace) -> Self {
        Self {
            shape,
            coefficient_space,
            node_maps: vec![coefficient_space.node_map(shape)],
        }
    }
}

impl Form for CoefficientIntegral {
    fn signature(&self) -> String {
        format!("CoefficientIntegral({:?}, {})", self.shape, self.coefficient_space)
    }

    fn rank(&self) -> usize {
        0
    }

    fn num_coefficients(&self) -> usize {
        1
    }

    fn tabulate(&self, a: &mut [Real], w: &[&[Real]], cell: &Cell) {
        let volume = AffineSimplex::from_cell(cell).volume();
        let values = w[0];
        let mean = values.iter().copied().sum::<Real>() / values.len() as Real;
        a[0] = volume * mean;
    }

    fn node_maps(&self) -> &[Box<dyn NodeMap>] {
        &self.node_maps
    }
}
