//! Proptest strategies for generating cell geometry.
use crate::Real;
use ::proptest::prelude::*;
use nalgebra::{Matrix2, Matrix3};

fn coordinate() -> impl Strategy<Value = Real> {
    // Keep coordinates small, so that products of coordinates stay well within range
    -10.0 as Real..10.0 as Real
}

/// Vertex coordinates of triangles in the plane whose area is bounded away from zero.
pub fn nondegenerate_triangle() -> impl Strategy<Value = [Real; 6]> {
    [
        coordinate(),
        coordinate(),
        coordinate(),
        coordinate(),
        coordinate(),
        coordinate(),
    ]
    .prop_filter("triangle must not be degenerate", |x| {
        let jacobian = Matrix2::new(x[2] - x[0], x[4] - x[0], x[3] - x[1], x[5] - x[1]);
        jacobian.determinant().abs() > 1e-1
    })
}

/// Vertex coordinates of tetrahedra whose volume is bounded away from zero.
pub fn nondegenerate_tetrahedron() -> impl Strategy<Value = [Real; 12]> {
    prop::array::uniform12(coordinate()).prop_filter("tetrahedron must not be degenerate", |x| {
        let jacobian = Matrix3::from_fn(|i, j| x[3 * (j + 1) + i] - x[i]);
        jacobian.determinant().abs() > 1e-1
    })
}

/// A vector of `len` coefficient values.
pub fn coefficient_values(len: usize) -> impl Strategy<Value = Vec<Real>> {
    prop::collection::vec(-5.0 as Real..5.0 as Real, len)
}
