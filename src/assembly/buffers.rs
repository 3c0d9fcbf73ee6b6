use crate::assembly::global::gather_global_to_local;
use crate::assembly::{AssemblyOptions, NonFinitePolicy};
use crate::mesh::SimplexMesh;
use crate::Real;
use eyre::eyre;
use itertools::izip;
use log::warn;
use ufc_traits::Form;

/// Forms with at most this many coefficients are tabulated without allocating per cell.
const MAX_INLINE_COEFFICIENTS: usize = 8;

/// Per-cell buffers reused across all cells of an assembly pass.
#[derive(Debug, Default)]
pub(crate) struct ElementBuffers {
    cell_coordinates: Vec<Real>,
    argument_nodes: Vec<Vec<usize>>,
    coefficient_nodes: Vec<Vec<usize>>,
    coefficient_values: Vec<Vec<Real>>,
    element_tensor: Vec<Real>,
}

impl ElementBuffers {
    /// Sizes the buffers for the given form.
    pub fn resize_for(&mut self, form: &dyn Form) {
        let arguments = form.argument_node_maps();
        self.argument_nodes.resize_with(arguments.len(), Vec::new);
        for (nodes, node_map) in izip!(&mut self.argument_nodes, arguments) {
            nodes.resize(node_map.space_dimension(), usize::MAX);
        }

        let coefficients = form.coefficient_node_maps();
        self.coefficient_nodes
            .resize_with(coefficients.len(), Vec::new);
        self.coefficient_values
            .resize_with(coefficients.len(), Vec::new);
        for (nodes, values, node_map) in izip!(&mut self.coefficient_nodes, &mut self.coefficient_values, coefficients)
        {
            nodes.resize(node_map.space_dimension(), usize::MAX);
            values.resize(node_map.space_dimension(), 0.0);
        }

        self.element_tensor.resize(form.tensor_size(), 0.0);
    }

    /// Tabulates the global argument indices and the element tensor of one cell.
    ///
    /// The buffers must have been sized for `form` with [`resize_for`](Self::resize_for).
    pub fn tabulate_cell(
        &mut self,
        form: &dyn Form,
        mesh: &SimplexMesh,
        coefficients: &[&[Real]],
        cell_index: usize,
        options: &AssemblyOptions,
    ) -> eyre::Result<()> {
        let ufc_mesh = mesh.mesh();
        let Self {
            cell_coordinates,
            argument_nodes,
            coefficient_nodes,
            coefficient_values,
            element_tensor,
        } = self;

        mesh.with_cell(cell_index, cell_coordinates, |cell| {
            for (nodes, node_map) in izip!(argument_nodes.iter_mut(), form.argument_node_maps()) {
                node_map.tabulate(nodes, &ufc_mesh, cell);
            }

            let coefficient_iter = izip!(
                coefficient_nodes.iter_mut(),
                coefficient_values.iter_mut(),
                form.coefficient_node_maps(),
                coefficients
            );
            for (nodes, values, node_map, global_values) in coefficient_iter {
                node_map.tabulate(nodes, &ufc_mesh, cell);
                gather_global_to_local(global_values, values, nodes);
            }

            element_tensor.fill(0.0);
            let num_coefficients = coefficient_values.len();
            if num_coefficients <= MAX_INLINE_COEFFICIENTS {
                let mut w: [&[Real]; MAX_INLINE_COEFFICIENTS] = [&[]; MAX_INLINE_COEFFICIENTS];
                for (w_i, values) in izip!(w.iter_mut(), coefficient_values.iter()) {
                    *w_i = values.as_slice();
                }
                form.tabulate(element_tensor, &w[..num_coefficients], cell);
            } else {
                let w: Vec<&[Real]> = coefficient_values.iter().map(Vec::as_slice).collect();
                form.tabulate(element_tensor, &w, cell);
            }
        });

        match options.non_finite {
            NonFinitePolicy::Ignore => {}
            NonFinitePolicy::Warn => {
                if !self.element_tensor.iter().all(|x| x.is_finite()) {
                    warn!("Element tensor of cell {cell_index} contains non-finite entries");
                }
            }
            NonFinitePolicy::Error => {
                if !self.element_tensor.iter().all(|x| x.is_finite()) {
                    return Err(eyre!("Element tensor of cell {cell_index} contains non-finite entries"));
                }
            }
        }

        Ok(())
    }

    pub fn argument_nodes(&self, argument: usize) -> &[usize] {
        &self.argument_nodes[argument]
    }

    pub fn element_tensor(&self) -> &[Real] {
        &self.element_tensor
    }
}
