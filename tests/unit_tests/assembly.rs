use matrixcompare::{assert_matrix_eq, assert_scalar_eq};
use nalgebra::{DMatrix, DVector};
use proptest::collection::vec;
use proptest::prelude::*;
use ufc::assembly::{gather_global_to_local, Assembler, AssemblyOptions, NonFinitePolicy, ParAssembler};
use ufc::forms::factory::{
    create_tetrahedron_laplace_form, create_tetrahedron_mass_form, create_tetrahedron_source_form,
    create_triangle_integral_form, create_triangle_laplace_form, create_triangle_mass_form, create_triangle_source_form,
};
use ufc::mesh::procedural::{create_unit_box_uniform_tet_mesh_3d, create_unit_square_uniform_tri_mesh_2d};
use ufc::mesh::SimplexMesh;
use ufc::geometry::AffineSimplex;
use ufc::node_map::{EntityDofs, EntityNodeMap};
use ufc::reference_cell::CellShape;
use ufc::traits::{Cell, Form, NodeMap};
use ufc::Real;

#[test]
fn gather_global_to_local_simple_example() {
    let global = [10.0, 11.0, 12.0, 13.0];
    let mut local = [0.0; 3];
    gather_global_to_local(&global, &mut local, &[3, 0, 3]);
    assert_eq!(local, [13.0, 10.0, 13.0]);
}

proptest! {
    #[test]
    fn gather_global_to_local_test(
        (global, indices) in vec(-10.0 .. 10.0, 1 .. 20)
            .prop_flat_map(|global| {
                let n = global.len();
                (Just(global), vec(0 .. n, 0 .. 10))
            })
    ) {
        let global: Vec<Real> = global;
        let mut local = vec![0.0; indices.len()];
        gather_global_to_local(&global, &mut local, &indices);
        for (value, index) in local.iter().zip(&indices) {
            prop_assert_eq!(*value, global[*index]);
        }
    }
}

#[test]
fn integral_of_unit_constant_over_unit_square() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(4);
    let form = create_triangle_integral_form();
    let ones = vec![1.0; mesh.num_cells()];

    let value = Assembler::default()
        .assemble_scalar(&*form, &mesh, &[&ones])
        .unwrap();
    assert_scalar_eq!(value, 1.0, comp = abs, tol = 1e-12);
}

#[test]
fn triangle_mass_matrix_sums_to_area() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(3);
    let form = create_triangle_mass_form();
    let mass = Assembler::default().assemble_matrix(&*form, &mesh, &[]).unwrap();

    assert_eq!(mass.nrows(), 16);
    assert_eq!(mass.ncols(), 16);
    assert_scalar_eq!(mass.values().iter().sum::<Real>(), 1.0, comp = abs, tol = 1e-12);

    let dense = DMatrix::from(&mass);
    assert_matrix_eq!(dense, dense.transpose(), comp = abs, tol = 1e-14);
}

#[test]
fn triangle_laplace_matrix_annihilates_constants() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(5);
    let form = create_triangle_laplace_form();
    let laplace = Assembler::default().assemble_matrix(&*form, &mesh, &[]).unwrap();

    let ones = DVector::<Real>::repeat(laplace.ncols(), 1.0);
    let product = &laplace * &ones;
    assert_matrix_eq!(product, DVector::<Real>::zeros(laplace.nrows()), comp = abs, tol = 1e-12);
}

#[test]
fn triangle_laplace_matrix_on_single_square() {
    // Vertices (0, 0), (1, 0), (0, 1), (1, 1), split along the diagonal from (0, 0) to (1, 1)
    let mesh = create_unit_square_uniform_tri_mesh_2d(1);
    let form = create_triangle_laplace_form();
    let laplace = Assembler::default().assemble_matrix(&*form, &mesh, &[]).unwrap();

    #[rustfmt::skip]
    let expected = DMatrix::from_row_slice(4, 4, &[
        1.0, -0.5, -0.5, 0.0,
        -0.5, 1.0, 0.0, -0.5,
        -0.5, 0.0, 1.0, -0.5,
        0.0, -0.5, -0.5, 1.0,
    ]);
    assert_matrix_eq!(DMatrix::from(&laplace), expected, comp = abs, tol = 1e-14);
}

#[test]
fn source_vector_sums_to_integral_of_source() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(4);
    let form = create_triangle_source_form();
    let f: Vec<Real> = mesh.vertices().chunks_exact(2).map(|x| x[0] + 2.0 * x[1]).collect();

    let b = Assembler::default().assemble_vector(&*form, &mesh, &[&f]).unwrap();
    assert_eq!(b.len(), mesh.num_vertices());
    // The integral of x + 2y over the unit square is 3 / 2
    assert_scalar_eq!(b.sum(), 1.5, comp = abs, tol = 1e-12);
}

#[test]
fn tetrahedron_forms_on_unit_box() {
    let mesh = create_unit_box_uniform_tet_mesh_3d(2);
    let assembler = Assembler::default();

    let mass = assembler
        .assemble_matrix(&*create_tetrahedron_mass_form(), &mesh, &[])
        .unwrap();
    assert_scalar_eq!(mass.values().iter().sum::<Real>(), 1.0, comp = abs, tol = 1e-12);

    let laplace = assembler
        .assemble_matrix(&*create_tetrahedron_laplace_form(), &mesh, &[])
        .unwrap();
    let row_sums = &laplace * &DVector::<Real>::repeat(mesh.num_vertices(), 1.0);
    assert!(row_sums.amax() < 1e-12);

    let ones = vec![1.0; mesh.num_vertices()];
    let b = assembler
        .assemble_vector(&*create_tetrahedron_source_form(), &mesh, &[&ones])
        .unwrap();
    assert_scalar_eq!(b.sum(), 1.0, comp = abs, tol = 1e-12);
}

#[test]
fn parallel_assembly_matches_serial_assembly() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(12);
    let options = AssemblyOptions::default().with_min_cells_per_task(8);
    let serial = Assembler::new(options.clone());
    let parallel = ParAssembler::new(options);

    let laplace = create_triangle_laplace_form();
    let a_serial = serial.assemble_matrix(&*laplace, &mesh, &[]).unwrap();
    let a_parallel = parallel.assemble_matrix(&*laplace, &mesh, &[]).unwrap();
    assert_eq!(a_serial.pattern(), a_parallel.pattern());
    assert_matrix_eq!(DMatrix::from(&a_serial), DMatrix::from(&a_parallel), comp = abs, tol = 1e-12);

    let f: Vec<Real> = mesh.vertices().chunks_exact(2).map(|x| x[0] * x[1]).collect();
    let source = create_triangle_source_form();
    let b_serial = serial.assemble_vector(&*source, &mesh, &[&f]).unwrap();
    let b_parallel = parallel.assemble_vector(&*source, &mesh, &[&f]).unwrap();
    assert_matrix_eq!(b_serial, b_parallel, comp = abs, tol = 1e-12);

    let ones = vec![1.0; mesh.num_cells()];
    let integral = create_triangle_integral_form();
    let s_serial = serial.assemble_scalar(&*integral, &mesh, &[&ones]).unwrap();
    let s_parallel = parallel.assemble_scalar(&*integral, &mesh, &[&ones]).unwrap();
    assert_scalar_eq!(s_serial, s_parallel, comp = abs, tol = 1e-12);
}

#[test]
fn assembler_can_be_reused_for_different_forms() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(2);
    let assembler = Assembler::default();
    let ones = vec![1.0; mesh.num_vertices()];

    let first = assembler
        .assemble_vector(&*create_triangle_source_form(), &mesh, &[&ones])
        .unwrap();
    let _ = assembler
        .assemble_matrix(&*create_triangle_mass_form(), &mesh, &[])
        .unwrap();
    let second = assembler
        .assemble_vector(&*create_triangle_source_form(), &mesh, &[&ones])
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn assembly_rejects_incompatible_input() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(2);
    let assembler = Assembler::default();
    let par_assembler = ParAssembler::default();

    // Wrong rank
    let mass = create_triangle_mass_form();
    assert!(assembler.assemble_vector(&*mass, &mesh, &[]).is_err());
    assert!(par_assembler.assemble_scalar(&*mass, &mesh, &[]).is_err());

    // Wrong number of coefficients
    let source = create_triangle_source_form();
    assert!(assembler.assemble_vector(&*source, &mesh, &[]).is_err());

    // Coefficient of the wrong length
    let too_short = vec![1.0; mesh.num_vertices() - 1];
    assert!(assembler.assemble_vector(&*source, &mesh, &[&too_short]).is_err());
    assert!(par_assembler.assemble_vector(&*source, &mesh, &[&too_short]).is_err());

    // Form for a different cell shape
    let tet_mesh = create_unit_box_uniform_tet_mesh_3d(1);
    assert!(assembler.assemble_matrix(&*mass, &tet_mesh, &[]).is_err());
}

#[test]
fn assembly_rejects_embedded_mesh() {
    let vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    let cells = vec![0, 1, 2, 0, 1, 3];
    let mesh = SimplexMesh::from_vertices_and_cells(CellShape::Triangle, 3, vertices, cells).unwrap();
    let mass = create_triangle_mass_form();

    assert!(Assembler::default().assemble_matrix(&*mass, &mesh, &[]).is_err());
    assert!(ParAssembler::default().assemble_matrix(&*mass, &mesh, &[]).is_err());

    let ones = vec![1.0; mesh.num_cells()];
    let integral = create_triangle_integral_form();
    assert!(Assembler::default().assemble_scalar(&*integral, &mesh, &[&ones]).is_err());
    assert!(ParAssembler::default().assemble_scalar(&*integral, &mesh, &[&ones]).is_err());
}

/// The functional `int_K (w_1 + ... + w_n) dx` of `n` cellwise constant coefficients.
struct SumOfConstants {
    node_maps: Vec<Box<dyn NodeMap>>,
}

impl SumOfConstants {
    fn new(num_coefficients: usize) -> Self {
        let node_maps = (0..num_coefficients)
            .map(|_| Box::new(EntityNodeMap::new(EntityDofs::p0(CellShape::Triangle))) as Box<dyn NodeMap>)
            .collect();
        Self { node_maps }
    }
}

impl Form for SumOfConstants {
    fn signature(&self) -> String {
        format!("SumOfConstants({})", self.node_maps.len())
    }

    fn rank(&self) -> usize {
        0
    }

    fn num_coefficients(&self) -> usize {
        self.node_maps.len()
    }

    fn tabulate(&self, a: &mut [Real], w: &[&[Real]], cell: &Cell) {
        assert_eq!(w.len(), self.num_coefficients());
        let volume = AffineSimplex::from_cell(cell).volume();
        a[0] = volume * w.iter().map(|w_i| w_i[0]).sum::<Real>();
    }

    fn node_maps(&self) -> &[Box<dyn NodeMap>] {
        &self.node_maps
    }
}

#[test]
fn forms_with_many_coefficients() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(3);
    for n in [0, 1, 3, 8, 9, 12] {
        let form = SumOfConstants::new(n);
        let values: Vec<Vec<Real>> = (0..n).map(|i| vec![(i + 1) as Real; mesh.num_cells()]).collect();
        let coefficients: Vec<&[Real]> = values.iter().map(Vec::as_slice).collect();
        let expected = (n * (n + 1) / 2) as Real;

        let serial = Assembler::default()
            .assemble_scalar(&form, &mesh, &coefficients)
            .unwrap();
        let parallel = ParAssembler::default()
            .assemble_scalar(&form, &mesh, &coefficients)
            .unwrap();
        assert_scalar_eq!(serial, expected, comp = abs, tol = 1e-12);
        assert_scalar_eq!(parallel, expected, comp = abs, tol = 1e-12);
    }
}

fn mesh_with_degenerate_cell() -> SimplexMesh {
    let vertices = vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 2.0, 0.0];
    let cells = vec![0, 1, 2, 0, 1, 3];
    SimplexMesh::from_vertices_and_cells(CellShape::Triangle, 2, vertices, cells).unwrap()
}

#[test]
fn non_finite_policy() {
    let mesh = mesh_with_degenerate_cell();
    let form = create_triangle_laplace_form();

    let ignore = Assembler::default().assemble_matrix(&*form, &mesh, &[]).unwrap();
    assert!(ignore.values().iter().any(|v| !v.is_finite()));

    let warn = AssemblyOptions::default().with_non_finite_policy(NonFinitePolicy::Warn);
    assert!(Assembler::new(warn).assemble_matrix(&*form, &mesh, &[]).is_ok());

    let error = AssemblyOptions::default().with_non_finite_policy(NonFinitePolicy::Error);
    assert!(Assembler::new(error.clone())
        .assemble_matrix(&*form, &mesh, &[])
        .is_err());
    assert!(ParAssembler::new(error)
        .assemble_matrix(&*form, &mesh, &[])
        .is_err());
}

#[test]
fn assembly_options_from_json() {
    let options: AssemblyOptions = serde_json::from_str(r#"{ "non_finite": "Warn" }"#).unwrap();
    assert_eq!(options.non_finite, NonFinitePolicy::Warn);
    assert_eq!(options.min_cells_per_task, AssemblyOptions::default().min_cells_per_task);

    let json = serde_json::to_string(&AssemblyOptions::default()).unwrap();
    let parsed: AssemblyOptions = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, AssemblyOptions::default());
}

#[test]
fn empty_mesh_assembles_to_empty_tensors() {
    let mesh = create_unit_square_uniform_tri_mesh_2d(0);
    let matrix = Assembler::default()
        .assemble_matrix(&*create_triangle_mass_form(), &mesh, &[])
        .unwrap();
    assert_eq!(matrix.nrows(), 0);
    assert_eq!(matrix.nnz(), 0);

    let value = ParAssembler::default()
        .assemble_scalar(&*create_triangle_integral_form(), &mesh, &[&[]])
        .unwrap();
    assert_eq!(value, 0.0);
}
