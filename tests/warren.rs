use approx::assert_relative_eq;
use petgraph::graph::NodeIndex;
use trussfos::{parse_truss, write_truss, Axis, Goal, Goals, Recommendation, STANDARD_GRAVITY};

const WARREN: &str = include_str!("../demos/warren.trs");

#[test]
fn warren_truss_reactions_are_symmetric() {
    let mut truss = parse_truss(WARREN).expect("demo file parses");
    assert_eq!(truss.joint_count(), 11);
    assert_eq!(truss.member_count(), 19);
    truss.evaluate().expect("stable truss");

    let vertical = |joint: usize| {
        truss
            .joint(NodeIndex::new(joint))
            .and_then(|joint| joint.reaction(Axis::Y))
            .expect("support reaction")
    };
    let total = 3.0 * 20_000.0 + truss.mass() * STANDARD_GRAVITY;
    assert_relative_eq!(vertical(0), vertical(5), max_relative = 1.0e-6);
    assert_relative_eq!(vertical(0) + vertical(5), total, max_relative = 1.0e-9);
}

#[test]
fn warren_truss_goals_and_recommendations() {
    let mut truss = parse_truss(WARREN).expect("demo file parses");
    truss.set_goals(
        Goals::from_pairs([
            ("min_fos_buckling", 1.5),
            ("min_fos_yielding", 1.5),
            ("max_mass", 5.0),
            ("max_deflection", 6.0e-3),
        ])
        .expect("valid goals"),
    );
    truss.evaluate().expect("stable truss");

    let evaluation = truss.goal_evaluation().expect("evaluated");
    assert_eq!(evaluation.get(Goal::MaxMass), Some(false));
    assert_eq!(evaluation.get(Goal::MinFosTotal), None);

    let recommendations = truss.recommendations().expect("evaluated");
    let summary = truss.summary().expect("summary available");
    if summary.fos_buckling < 1.5 {
        assert!(recommendations
            .iter()
            .any(|recommendation| matches!(recommendation, Recommendation::IncreaseInertia { .. })));
    }
    assert!(recommendations
        .iter()
        .any(|recommendation| matches!(recommendation, Recommendation::ReduceArea { .. })));
}

#[test]
fn warren_truss_rewrites_stably() {
    let first = write_truss(&parse_truss(WARREN).expect("demo file parses"));
    let second = write_truss(&parse_truss(&first).expect("written text parses"));
    assert_eq!(first, second);
    assert!(!first.contains('#'));
}
