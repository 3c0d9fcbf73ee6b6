//! The Unified Form-assembly Code (UFC) interface.
//!
//! This crate contains nothing but the contract between a form compiler, which produces
//! implementations of [`NodeMap`] and [`Form`] for one specific variational form, and a generic
//! assembler, which walks a mesh, builds a [`Cell`] view for each cell and scatters the local
//! element tensors into a global tensor.
//!
//! Implementations must be stateless: every `tabulate` call depends only on its arguments,
//! which makes them safe to call concurrently from several threads as long as each thread
//! owns its cell view and output buffers.
pub use nalgebra;

mod form;
mod mesh;
mod node_map;

pub use form::*;
pub use mesh::*;
pub use node_map::*;

/// The scalar type used for all coefficient values, coordinates and tensor entries.
#[cfg(not(feature = "single-precision"))]
pub type Real = f64;

/// The scalar type used for all coefficient values, coordinates and tensor entries.
#[cfg(feature = "single-precision")]
pub type Real = f32;

/// Tolerance for comparing computed element tensors against reference values.
///
/// This is only meant for conformance tests. No implementation of the interface
/// should use it inside `tabulate`.
#[cfg(not(feature = "single-precision"))]
pub const EPSILON: Real = 1e-14;

/// Tolerance for comparing computed element tensors against reference values.
#[cfg(feature = "single-precision")]
pub const EPSILON: Real = 1e-6;

/// A parameterless factory for a node map.
pub type NodeMapFactory = fn() -> Box<dyn NodeMap>;

/// A parameterless factory for a form.
pub type FormFactory = fn() -> Box<dyn Form>;
