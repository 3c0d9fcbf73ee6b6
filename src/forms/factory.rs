//! Parameterless factories for the forms and spaces of this crate.
//!
//! Every factory returns a newly constructed, ready-to-use instance owned by the caller.
use crate::forms::{CoefficientIntegral, CoefficientSpace, LaplaceMatrix, MassMatrix, SourceVector};
use crate::node_map::{EntityDofs, EntityNodeMap};
use crate::reference_cell::CellShape;
use ufc_traits::{Form, FormFactory, NodeMap, NodeMapFactory};

macro_rules! define_shape_factories {
    ($shape:expr,
     $mass:ident, $laplace:ident, $source:ident, $integral:ident,
     $p0:ident, $p1:ident, $p2:ident) => {
        pub fn $mass() -> Box<dyn Form> {
            Box::new(MassMatrix::new($shape))
        }

        pub fn $laplace() -> Box<dyn Form> {
            Box::new(LaplaceMatrix::new($shape))
        }

        pub fn $source() -> Box<dyn Form> {
            Box::new(SourceVector::new($shape, CoefficientSpace::Linear))
        }

        pub fn $integral() -> Box<dyn Form> {
            Box::new(CoefficientIntegral::new($shape, CoefficientSpace::Constant))
        }

        pub fn $p0() -> Box<dyn NodeMap> {
            Box::new(EntityNodeMap::new(EntityDofs::p0($shape)))
        }

        pub fn $p1() -> Box<dyn NodeMap> {
            Box::new(EntityNodeMap::new(EntityDofs::p1($shape)))
        }

        pub fn $p2() -> Box<dyn NodeMap> {
            Box::new(EntityNodeMap::new(EntityDofs::p2($shape)))
        }
    };
}

define_shape_factories!(
    CellShape::Triangle,
    create_triangle_mass_form,
    create_triangle_laplace_form,
    create_triangle_source_form,
    create_triangle_integral_form,
    create_triangle_p0_node_map,
    create_triangle_p1_node_map,
    create_triangle_p2_node_map
);

define_shape_factories!(
    CellShape::Tetrahedron,
    create_tetrahedron_mass_form,
    create_tetrahedron_laplace_form,
    create_tetrahedron_source_form,
    create_tetrahedron_integral_form,
    create_tetrahedron_p0_node_map,
    create_tetrahedron_p1_node_map,
    create_tetrahedron_p2_node_map
);

static FORM_FACTORIES: &[(&str, FormFactory)] = &[
    ("triangle_mass", create_triangle_mass_form),
    ("triangle_laplace", create_triangle_laplace_form),
    ("triangle_source", create_triangle_source_form),
    ("triangle_integral", create_triangle_integral_form),
    ("tetrahedron_mass", create_tetrahedron_mass_form),
    ("tetrahedron_laplace", create_tetrahedron_laplace_form),
    ("tetrahedron_source", create_tetrahedron_source_form),
    ("tetrahedron_integral", create_tetrahedron_integral_form),
];

static NODE_MAP_FACTORIES: &[(&str, NodeMapFactory)] = &[
    ("triangle_p0", create_triangle_p0_node_map),
    ("triangle_p1", create_triangle_p1_node_map),
    ("triangle_p2", create_triangle_p2_node_map),
    ("tetrahedron_p0", create_tetrahedron_p0_node_map),
    ("tetrahedron_p1", create_tetrahedron_p1_node_map),
    ("tetrahedron_p2", create_tetrahedron_p2_node_map),
];

/// Looks up the factory of a form by name, e.g. `"triangle_laplace"`.
pub fn form_factory(name: &str) -> Option<FormFactory> {
    FORM_FACTORIES
        .iter()
        .find(|(factory_name, _)| *factory_name == name)
        .map(|(_, factory)| *factory)
}

/// Looks up the factory of a node map by name, e.g. `"tetrahedron_p2"`.
pub fn node_map_factory(name: &str) -> Option<NodeMapFactory> {
    NODE_MAP_FACTORIES
        .iter()
        .find(|(factory_name, _)| *factory_name == name)
        .map(|(_, factory)| *factory)
}

pub fn form_factory_names() -> impl Iterator<Item = &'static str> {
    FORM_FACTORIES.iter().map(|(name, _)| *name)
}

pub fn node_map_factory_names() -> impl Iterator<Item = &'static str> {
    NODE_MAP_FACTORIES.iter().map(|(name, _)| *name)
}
