use approx::assert_relative_eq;
use nalgebra::Vector3;
use petgraph::graph::NodeIndex;
use trussfos::{
    force, point, Axis, CrossSection, LimitState, Material, MaterialTable, Support, Truss,
};

/// Isosceles triangle with unit properties and unit gravity, small enough to check by hand.
fn unit_triangle() -> Truss {
    let materials = MaterialTable::standard()
        .with_material("unit", Material::new(1.0, 1.0, 1.0))
        .expect("valid material");
    let mut truss = Truss::with_materials(materials);
    truss.set_gravity(Vector3::new(0.0, -1.0, 0.0)).expect("finite gravity");

    let left = truss.add_joint(point(0.0, 0.0, 0.0)).expect("joint added");
    let right = truss.add_joint(point(2.0, 0.0, 0.0)).expect("joint added");
    let apex = truss.add_joint(point(1.0, 3.0, 0.0)).expect("joint added");
    truss
        .set_support(left, Support::pinned().planar())
        .expect("left support");
    truss
        .set_support(right, Support::roller(Axis::Y).planar())
        .expect("right support");
    truss
        .set_support(apex, Support::free().planar())
        .expect("apex support");
    truss
        .set_load(apex, force(0.0, 1.0, 0.0))
        .expect("apex load");

    for (start, end) in [(left, right), (left, apex), (right, apex)] {
        truss
            .add_member(start, end, "unit", CrossSection::arbitrary(1.0, 1.0))
            .expect("member accepted");
    }
    truss
}

#[test]
fn member_masses_follow_lengths() {
    let truss = unit_triangle();
    let masses: Vec<f64> = truss.members().map(|(_, member)| member.mass()).collect();
    assert_relative_eq!(masses[0], 2.0, epsilon = 1.0e-5);
    assert_relative_eq!(masses[1], 3.16228, epsilon = 1.0e-5);
    assert_relative_eq!(masses[2], 3.16228, epsilon = 1.0e-5);
    assert_relative_eq!(truss.mass(), 8.32456, epsilon = 1.0e-5);
}

#[test]
fn reactions_match_hand_calculation() {
    let mut truss = unit_triangle();
    truss.evaluate().expect("stable triangle");

    let reaction = |joint: usize, axis: Axis| {
        truss
            .joint(NodeIndex::new(joint))
            .and_then(|joint| joint.reaction(axis))
            .expect("restrained axis")
    };
    assert_relative_eq!(reaction(0, Axis::Y), 3.66228, epsilon = 1.0e-5);
    assert_relative_eq!(reaction(1, Axis::Y), 3.66228, epsilon = 1.0e-5);
    assert_relative_eq!(reaction(0, Axis::X), 0.0, epsilon = 1.0e-9);
}

#[test]
fn member_forces_and_factors_of_safety() {
    let mut truss = unit_triangle();
    truss.evaluate().expect("stable triangle");

    let responses: Vec<_> = truss
        .members()
        .map(|(_, member)| *member.response().expect("solved"))
        .collect();
    assert_relative_eq!(responses[0].axial_force, 0.36038, epsilon = 1.0e-5);
    assert_relative_eq!(responses[1].axial_force, -1.13962, epsilon = 1.0e-5);
    assert_relative_eq!(responses[2].axial_force, -1.13962, epsilon = 1.0e-5);

    let summary = truss.summary().expect("summary available");
    assert_relative_eq!(summary.fos_yielding, 0.87749, epsilon = 1.0e-5);
    assert_relative_eq!(summary.fos_buckling, 0.86604, epsilon = 1.0e-5);
    assert_eq!(summary.limit_state, LimitState::Buckling);
    assert_eq!(summary.fos_total, summary.fos_buckling);
}

#[test]
fn deflection_is_symmetric() {
    let mut truss = unit_triangle();
    truss.evaluate().expect("stable triangle");

    let apex = truss
        .joint(NodeIndex::new(2))
        .and_then(|joint| joint.response())
        .expect("solved")
        .deflection;
    let right = truss
        .joint(NodeIndex::new(1))
        .and_then(|joint| joint.response())
        .expect("solved")
        .deflection;
    assert!(apex.y < 0.0);
    assert_relative_eq!(apex.x, right.x / 2.0, epsilon = 1.0e-9);
    assert_relative_eq!(
        truss.max_deflection().expect("solved"),
        apex.magnitude(),
        epsilon = 1.0e-12
    );
}
