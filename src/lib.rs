//! Finite element assembly on top of the UFC interface.
//!
//! The interface itself lives in the `ufc-traits` crate and is re-exported here. This crate
//! provides simplex meshes that hand out [`Mesh`] and [`Cell`] views, entity-based node maps,
//! a handful of compiled forms for linear Lagrange elements, and serial and parallel
//! reference assemblers that drive any [`Form`] over a mesh.
pub mod assembly;
pub mod forms;
pub mod geometry;
pub mod mesh;
pub mod node_map;
pub mod reference_cell;

#[cfg(feature = "proptest")]
pub mod proptest;

pub use ufc_traits::{Cell, Form, FormFactory, Mesh, NodeMap, NodeMapFactory, Real, EPSILON};

pub mod traits {
    pub use ufc_traits::*;
}

pub extern crate nalgebra;
pub extern crate nalgebra_sparse;
