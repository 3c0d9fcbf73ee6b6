use crate::assembly::buffers::ElementBuffers;
use crate::assembly::AssemblyOptions;
use crate::mesh::SimplexMesh;
use crate::Real;
use eyre::ensure;
use itertools::izip;
use log::debug;
use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use std::cell::RefCell;
use thread_local::ThreadLocal;
use ufc_traits::Form;

/// Copies the entries of `global` with the given indices into `local`.
///
/// # Panics
///
/// Panics if `local` and `indices` have different lengths or an index is out of bounds.
pub fn gather_global_to_local(global: &[Real], local: &mut [Real], indices: &[usize]) {
    assert_eq!(local.len(), indices.len(), "Local buffer must have one entry per index");
    for (local_value, &global_index) in local.iter_mut().zip(indices) {
        *local_value = global[global_index];
    }
}

/// Checks that a form, a mesh and a set of coefficient vectors fit together.
///
/// The interface itself performs no such checks, so this runs once per assembly pass instead
/// of once per cell.
fn check_compatibility(
    form: &dyn Form,
    expected_rank: usize,
    mesh: &SimplexMesh,
    coefficients: &[&[Real]],
) -> eyre::Result<()> {
    let signature = form.signature();
    let rank = form.rank();
    ensure!(
        rank == expected_rank,
        "Form {signature} has rank {rank}, but the assembler expected rank {expected_rank}"
    );

    let num_coefficients = form.num_coefficients();
    let num_node_maps = form.node_maps().len();
    ensure!(
        num_node_maps == rank + num_coefficients,
        "Form {signature} has {num_node_maps} node maps, expected {}",
        rank + num_coefficients
    );
    ensure!(
        coefficients.len() == num_coefficients,
        "Form {signature} takes {num_coefficients} coefficients, but {} were given",
        coefficients.len()
    );

    let tdim = mesh.topological_dimension();
    let gdim = mesh.geometric_dimension();
    // The forms compute affine geometry from square Jacobians
    ensure!(
        gdim == tdim,
        "Form {signature} requires a volumetric mesh, but the mesh has geometric dimension {gdim} \
         and topological dimension {tdim}"
    );
    for node_map in form.node_maps() {
        ensure!(
            node_map.topological_dimension() == tdim,
            "Node map {} is defined on cells of dimension {}, but the mesh has dimension {tdim}",
            node_map.signature(),
            node_map.topological_dimension()
        );
    }

    let ufc_mesh = mesh.mesh();
    for (i, (values, node_map)) in izip!(coefficients, form.coefficient_node_maps()).enumerate() {
        let expected_len = node_map.global_dimension(&ufc_mesh);
        ensure!(
            values.len() == expected_len,
            "Coefficient {i} has {} values, but its node map {} has global dimension {expected_len}",
            values.len(),
            node_map.signature()
        );
    }

    Ok(())
}

/// The global dimensions of the argument spaces of a form, in argument order.
fn argument_dimensions(form: &dyn Form, mesh: &SimplexMesh) -> Vec<usize> {
    let ufc_mesh = mesh.mesh();
    form.argument_node_maps()
        .iter()
        .map(|node_map| node_map.global_dimension(&ufc_mesh))
        .collect()
}

fn add_element_vector(global: &mut DVector<Real>, buffers: &ElementBuffers) {
    for (&node, &value) in izip!(buffers.argument_nodes(0), buffers.element_tensor()) {
        global[node] += value;
    }
}

fn push_element_triplets(triplets: &mut Vec<(usize, usize, Real)>, buffers: &ElementBuffers) {
    let rows = buffers.argument_nodes(0);
    let cols = buffers.argument_nodes(1);
    let tensor = buffers.element_tensor();
    for (i_local, &i_global) in rows.iter().enumerate() {
        let tensor_row = &tensor[i_local * cols.len()..(i_local + 1) * cols.len()];
        for (&j_global, &value) in izip!(cols, tensor_row) {
            triplets.push((i_global, j_global, value));
        }
    }
}

/// A serial assembler of scalars, vectors and sparse matrices.
///
/// Buffers are kept between calls, so that assembling many forms with the same assembler
/// does not allocate per cell.
#[derive(Debug, Default)]
pub struct Assembler {
    workspace: RefCell<ElementBuffers>,
    options: AssemblyOptions,
}

impl Assembler {
    pub fn new(options: AssemblyOptions) -> Self {
        Self {
            workspace: RefCell::default(),
            options,
        }
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Sums the element tensors of a rank 0 form over all cells.
    pub fn assemble_scalar(&self, form: &dyn Form, mesh: &SimplexMesh, coefficients: &[&[Real]]) -> eyre::Result<Real> {
        check_compatibility(form, 0, mesh, coefficients)?;
        debug!("Assembling scalar {} over {} cells", form.signature(), mesh.num_cells());

        let mut buffers = self.workspace.borrow_mut();
        buffers.resize_for(form);
        let mut value = 0.0;
        for cell_index in 0..mesh.num_cells() {
            buffers.tabulate_cell(form, mesh, coefficients, cell_index, &self.options)?;
            value += buffers.element_tensor()[0];
        }
        Ok(value)
    }

    /// Assembles a rank 1 form into a dense vector.
    pub fn assemble_vector(
        &self,
        form: &dyn Form,
        mesh: &SimplexMesh,
        coefficients: &[&[Real]],
    ) -> eyre::Result<DVector<Real>> {
        check_compatibility(form, 1, mesh, coefficients)?;
        let dims = argument_dimensions(form, mesh);
        debug!(
            "Assembling vector {} of length {} over {} cells",
            form.signature(),
            dims[0],
            mesh.num_cells()
        );

        let mut buffers = self.workspace.borrow_mut();
        buffers.resize_for(form);
        let mut vector = DVector::zeros(dims[0]);
        for cell_index in 0..mesh.num_cells() {
            buffers.tabulate_cell(form, mesh, coefficients, cell_index, &self.options)?;
            add_element_vector(&mut vector, &buffers);
        }
        Ok(vector)
    }

    /// Assembles a rank 2 form into a CSR matrix.
    ///
    /// Rows correspond to the first argument and columns to the second argument.
    pub fn assemble_matrix(
        &self,
        form: &dyn Form,
        mesh: &SimplexMesh,
        coefficients: &[&[Real]],
    ) -> eyre::Result<CsrMatrix<Real>> {
        check_compatibility(form, 2, mesh, coefficients)?;
        let dims = argument_dimensions(form, mesh);
        debug!(
            "Assembling {}x{} matrix {} over {} cells",
            dims[0],
            dims[1],
            form.signature(),
            mesh.num_cells()
        );

        let mut buffers = self.workspace.borrow_mut();
        buffers.resize_for(form);
        let mut triplets = Vec::with_capacity(mesh.num_cells() * form.tensor_size());
        for cell_index in 0..mesh.num_cells() {
            buffers.tabulate_cell(form, mesh, coefficients, cell_index, &self.options)?;
            push_element_triplets(&mut triplets, &buffers);
        }

        let matrix = csr_from_triplets(dims[0], dims[1], triplets);
        debug!("Assembled matrix has {} explicit entries", matrix.nnz());
        Ok(matrix)
    }
}

fn csr_from_triplets(nrows: usize, ncols: usize, triplets: Vec<(usize, usize, Real)>) -> CsrMatrix<Real> {
    let mut coo = CooMatrix::new(nrows, ncols);
    for (i, j, value) in triplets {
        coo.push(i, j, value);
    }
    // Duplicate entries are summed by the conversion
    CsrMatrix::from(&coo)
}

/// A parallel assembler with the same semantics as [`Assembler`].
///
/// Cells are distributed over the rayon thread pool. Each thread keeps its own buffers.
/// Floating-point sums may differ from the serial assembler in the order of summation.
#[derive(Debug, Default)]
pub struct ParAssembler {
    workspace: ThreadLocal<RefCell<ElementBuffers>>,
    options: AssemblyOptions,
}

impl ParAssembler {
    pub fn new(options: AssemblyOptions) -> Self {
        Self {
            workspace: ThreadLocal::new(),
            options,
        }
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Runs `accumulate` for every cell in parallel, each with a thread-local accumulator
    /// created by `init`, and combines the accumulators with `combine`.
    fn fold_cells<Acc: Send>(
        &self,
        form: &dyn Form,
        mesh: &SimplexMesh,
        coefficients: &[&[Real]],
        init: impl Fn() -> Acc + Sync + Send,
        accumulate: impl Fn(&mut Acc, &ElementBuffers) + Sync + Send,
        combine: impl Fn(Acc, Acc) -> Acc + Sync + Send,
    ) -> eyre::Result<Acc> {
        let options = &self.options;
        (0..mesh.num_cells())
            .into_par_iter()
            .with_min_len(options.min_cells_per_task.max(1))
            .try_fold(&init, |mut acc, cell_index| -> eyre::Result<Acc> {
                let mut buffers = self.workspace.get_or_default().borrow_mut();
                buffers.resize_for(form);
                buffers.tabulate_cell(form, mesh, coefficients, cell_index, options)?;
                accumulate(&mut acc, &*buffers);
                Ok(acc)
            })
            .try_reduce(&init, |a, b| Ok(combine(a, b)))
    }

    pub fn assemble_scalar(&self, form: &dyn Form, mesh: &SimplexMesh, coefficients: &[&[Real]]) -> eyre::Result<Real> {
        check_compatibility(form, 0, mesh, coefficients)?;
        debug!("Assembling scalar {} over {} cells in parallel", form.signature(), mesh.num_cells());
        self.fold_cells(
            form,
            mesh,
            coefficients,
            || 0.0,
            |sum, buffers| *sum += buffers.element_tensor()[0],
            |a, b| a + b,
        )
    }

    pub fn assemble_vector(
        &self,
        form: &dyn Form,
        mesh: &SimplexMesh,
        coefficients: &[&[Real]],
    ) -> eyre::Result<DVector<Real>> {
        check_compatibility(form, 1, mesh, coefficients)?;
        let n = argument_dimensions(form, mesh)[0];
        debug!(
            "Assembling vector {} of length {n} over {} cells in parallel",
            form.signature(),
            mesh.num_cells()
        );
        self.fold_cells(
            form,
            mesh,
            coefficients,
            || DVector::zeros(n),
            add_element_vector,
            |a, b| a + b,
        )
    }

    pub fn assemble_matrix(
        &self,
        form: &dyn Form,
        mesh: &SimplexMesh,
        coefficients: &[&[Real]],
    ) -> eyre::Result<CsrMatrix<Real>> {
        check_compatibility(form, 2, mesh, coefficients)?;
        let dims = argument_dimensions(form, mesh);
        debug!(
            "Assembling {}x{} matrix {} over {} cells in parallel",
            dims[0],
            dims[1],
            form.signature(),
            mesh.num_cells()
        );
        let triplets = self.fold_cells(
            form,
            mesh,
            coefficients,
            Vec::new,
            push_element_triplets,
            |mut a, mut b| {
                a.append(&mut b);
                a
            },
        )?;
        Ok(csr_from_triplets(dims[0], dims[1], triplets))
    }
}
