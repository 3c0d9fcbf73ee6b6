//! A small library of compiled forms for linear Lagrange elements on simplices.
//!
//! These are written by hand, but play the same role as the output of a form compiler: each
//! type implements [`Form`](ufc_traits::Form) for one variational form and owns the node maps
//! of its argument and coefficient spaces. All forms assume volumetric, affine simplex cells.
use crate::node_map::{EntityDofs, EntityNodeMap};
use crate::reference_cell::CellShape;
use crate::Real;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use ufc_traits::NodeMap;

pub mod factory;

mod integral;
mod laplace;
mod mass;
mod source;

pub use integral::*;
pub use laplace::*;
pub use mass::*;
pub use source::*;

/// The finite element space of a coefficient.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoefficientSpace {
    /// Piecewise constant, one value per cell.
    Constant,
    /// Continuous piecewise linear, one value per vertex.
    Linear,
}

impl CoefficientSpace {
    pub fn entity_dofs(&self, shape: CellShape) -> EntityDofs {
        match self {
            CoefficientSpace::Constant => EntityDofs::p0(shape),
            CoefficientSpace::Linear => EntityDofs::p1(shape),
        }
    }

    fn node_map(&self, shape: CellShape) -> Box<dyn NodeMap> {
        Box::new(EntityNodeMap::new(self.entity_dofs(shape)))
    }
}

impl Display for CoefficientSpace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoefficientSpace::Constant => write!(f, "P0"),
            CoefficientSpace::Linear => write!(f, "P1"),
        }
    }
}

fn p1_node_map(shape: CellShape) -> Box<dyn NodeMap> {
    Box::new(EntityNodeMap::new(EntityDofs::p1(shape)))
}

/// The entry `(i, j)` of the linear Lagrange mass matrix on a simplex with the given volume.
///
/// On a `d`-simplex `K` the barycentric coordinates satisfy
/// `int_K l_i l_j = |K| (1 + delta_ij) / ((d + 1) (d + 2))`.
fn p1_mass_entry(volume: Real, tdim: usize, i: usize, j: usize) -> Real {
    let d = tdim as Real;
    let scale = volume / ((d + 1.0) * (d + 2.0));
    if i == j {
        2.0 * scale
    } else {
        scale
    }
}
