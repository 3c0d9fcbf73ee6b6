//! Affine geometry of volumetric simplex cells.
use crate::Real;
use nalgebra::{Matrix3, Vector3};
use ufc_traits::Cell;

/// The affine map from the reference simplex to a physical simplex.
///
/// Only volumetric cells are supported, i.e. cells whose geometric dimension equals their
/// topological dimension, which must be 1, 2 or 3. The Jacobian is stored as a 3x3 matrix
/// padded with the identity, so that its determinant and inverse agree with those of the
/// `tdim x tdim` block.
#[derive(Debug, Clone, PartialEq)]
pub struct AffineSimplex {
    tdim: usize,
    origin: Vector3<Real>,
    jacobian: Matrix3<Real>,
}

impl AffineSimplex {
    pub fn from_cell(cell: &Cell) -> Self {
        let tdim = cell.topological_dimension();
        debug_assert!((1..=3).contains(&tdim), "Only simplices of dimension 1, 2 or 3 are supported");
        debug_assert_eq!(cell.geometric_dimension(), tdim, "Cell must be volumetric");

        let mut origin = Vector3::zeros();
        origin
            .as_mut_slice()
            .iter_mut()
            .zip(cell.vertex(0))
            .for_each(|(o, x)| *o = *x);

        let mut jacobian = Matrix3::identity();
        for j in 0..tdim {
            let vertex = cell.vertex(j + 1);
            for i in 0..tdim {
                jacobian[(i, j)] = vertex[i] - origin[i];
            }
        }

        Self {
            tdim,
            origin,
            jacobian,
        }
    }

    pub fn topological_dimension(&self) -> usize {
        self.tdim
    }

    pub fn jacobian(&self) -> &Matrix3<Real> {
        &self.jacobian
    }

    pub fn determinant(&self) -> Real {
        self.jacobian.determinant()
    }

    /// The length, area or volume of the simplex.
    pub fn volume(&self) -> Real {
        let factorial: Real = (1..=self.tdim).map(|k| k as Real).product();
        self.determinant().abs() / factorial
    }

    /// Maps a point on the reference cell to the physical cell.
    pub fn push_forward(&self, reference_point: &[Real]) -> [Real; 3] {
        let mut xi = Vector3::zeros();
        for i in 0..self.tdim {
            xi[i] = reference_point[i];
        }
        let x = self.origin + self.jacobian * xi;
        [x[0], x[1], x[2]]
    }

    /// Gradients of the linear Lagrange basis functions on the physical cell.
    ///
    /// Only the first `tdim + 1` gradients, and their first `tdim` components, are meaningful.
    /// A singular Jacobian produces NaN gradients.
    pub fn p1_basis_gradients(&self) -> [Vector3<Real>; 4] {
        let mut gradients = [Vector3::zeros(); 4];
        let j_inv_t = match self.jacobian.try_inverse() {
            Some(j_inv) => j_inv.transpose(),
            None => Matrix3::repeat(Real::NAN),
        };

        let mut reference_gradient = Vector3::zeros();
        for i in 0..self.tdim {
            reference_gradient[i] = -1.0;
        }
        gradients[0] = j_inv_t * reference_gradient;
        for k in 0..self.tdim {
            gradients[k + 1] = j_inv_t.column(k).into_owned();
        }
        gradients
    }
}
