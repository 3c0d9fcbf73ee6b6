use ufc::reference_cell::CellShape;

#[test]
fn entity_counts() {
    assert_eq!(CellShape::Interval.num_entities(0), 2);
    assert_eq!(CellShape::Interval.num_entities(1), 1);
    assert_eq!(CellShape::Interval.num_entities(2), 0);

    let triangle: Vec<_> = (0..=3).map(|d| CellShape::Triangle.num_entities(d)).collect();
    assert_eq!(triangle, [3, 3, 1, 0]);

    let tetrahedron: Vec<_> = (0..=3).map(|d| CellShape::Tetrahedron.num_entities(d)).collect();
    assert_eq!(tetrahedron, [4, 6, 4, 1]);
}

#[test]
fn triangle_edges_are_opposite_vertices() {
    let shape = CellShape::Triangle;
    assert_eq!(shape.entity_vertices(1, 0), [1, 2]);
    assert_eq!(shape.entity_vertices(1, 1), [0, 2]);
    assert_eq!(shape.entity_vertices(1, 2), [0, 1]);
}

#[test]
fn tetrahedron_entity_numbering() {
    let shape = CellShape::Tetrahedron;
    let edges: Vec<_> = (0..6).map(|i| shape.entity_vertices(1, i)).collect();
    assert_eq!(edges, [[2, 3], [1, 3], [1, 2], [0, 3], [0, 2], [0, 1]]);

    for face in 0..4 {
        let vertices = shape.entity_vertices(2, face);
        assert_eq!(vertices.len(), 3);
        assert!(!vertices.contains(&face));
    }
}

#[test]
fn facet_incidence() {
    assert_eq!(CellShape::Triangle.facet_incidence(0), [(0, 1), (0, 2), (1, 0)]);
    assert_eq!(CellShape::Triangle.facet_incidence(2), [(0, 0), (0, 1), (1, 2)]);
    assert_eq!(CellShape::Interval.facet_incidence(1), [(0, 1)]);
    assert_eq!(
        CellShape::Tetrahedron.facet_incidence(0),
        [(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2), (2, 0)]
    );
}

#[test]
fn reference_entity_midpoints() {
    assert_eq!(CellShape::Triangle.reference_entity_midpoint(1, 0), [0.5, 0.5, 0.0]);
    assert_eq!(CellShape::Triangle.reference_entity_midpoint(0, 2), [0.0, 1.0, 0.0]);
    assert_eq!(CellShape::Tetrahedron.reference_entity_midpoint(3, 0), [0.25, 0.25, 0.25]);
}
