use crate::{Cell, NodeMap, Real};

/// The element tensor computation for a form with `r` arguments and `n` coefficients.
///
/// A form of rank `r` with `n` coefficients is a mapping
///
/// ```text
/// a : V_1 x ... x V_r x W_1 x ... x W_n -> R
/// ```
///
/// The element tensor of a cell `K` is the local contribution of `K` to the global rank `r`
/// tensor obtained by applying `a` to the nodal basis functions of each `V_i`, with the
/// coefficients `w_1, ..., w_n` held fixed.
///
/// A form owns exactly `rank() + num_coefficients()` node maps: first the argument spaces in
/// argument order, then the coefficient spaces in coefficient order.
pub trait Form: Send + Sync {
    /// A string identifying the form.
    fn signature(&self) -> String;

    /// The rank `r` of the element tensor.
    fn rank(&self) -> usize;

    /// The number `n` of coefficients.
    fn num_coefficients(&self) -> usize;

    /// Computes the element tensor of `cell` into `a`.
    ///
    /// `a` must have length [`tensor_size`](Self::tensor_size). For rank 2 the tensor is stored
    /// row-major with rows indexed by the local degrees of freedom of the first argument.
    ///
    /// `w` holds one slice per coefficient, each containing the nodal values of the coefficient
    /// on `cell` in the local order of the corresponding coefficient node map.
    ///
    /// There is no error channel. A degenerate cell shows up as non-finite entries in `a`.
    fn tabulate(&self, a: &mut [Real], w: &[&[Real]], cell: &Cell);

    /// The node maps of the arguments followed by those of the coefficients.
    fn node_maps(&self) -> &[Box<dyn NodeMap>];

    fn argument_node_maps(&self) -> &[Box<dyn NodeMap>] {
        &self.node_maps()[..self.rank()]
    }

    fn coefficient_node_maps(&self) -> &[Box<dyn NodeMap>] {
        &self.node_maps()[self.rank()..]
    }

    /// The dimensions of the element tensor, one per argument.
    fn tensor_shape(&self) -> Vec<usize> {
        self.argument_node_maps()
            .iter()
            .map(|node_map| node_map.space_dimension())
            .collect()
    }

    /// The number of entries in the element tensor.
    ///
    /// This is `1` for a functional.
    fn tensor_size(&self) -> usize {
        self.argument_node_maps()
            .iter()
            .map(|node_map| node_map.space_dimension())
            .product()
    }
}

impl<F: Form + ?Sized> Form for Box<F> {
    fn signature(&self) -> String {
        (**self).signature()
    }

    fn rank(&self) -> usize {
        (**self).rank()
    }

    fn num_coefficients(&self) -> usize {
        (**self).num_coefficients()
    }

    fn tabulate(&self, a: &mut [Real], w: &[&[Real]], cell: &Cell) {
        (**self).tabulate(a, w, cell)
    }

    fn node_maps(&self) -> &[Box<dyn NodeMap>] {
        (**self).node_maps()
    }
}
