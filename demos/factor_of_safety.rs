use trussfos::{parse_truss, Goals, Recommendation};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Five panel Warren truss loaded on its top chord
    let mut truss = parse_truss(include_str!("warren.trs"))?;

    truss.set_goals(Goals::from_pairs([
        ("min_fos_buckling", 1.5),
        ("min_fos_yielding", 1.5),
        ("max_mass", 5.0),
        ("max_deflection", 6.0e-3),
    ])?);
    truss.evaluate()?;

    if let Some(summary) = truss.summary() {
        println!(
            "mass = {:.2} kg, fos = {:.2} ({})",
            summary.mass, summary.fos_total, summary.limit_state
        );
    }
    if let Some(evaluation) = truss.goal_evaluation() {
        for (goal, satisfied) in evaluation.iter() {
            println!("{goal}: {}", if satisfied { "met" } else { "not met" });
        }
    }

    // Only the members that need strengthening
    for recommendation in truss.recommendations().unwrap_or_default() {
        match recommendation {
            Recommendation::IncreaseArea { member, factor, .. } => {
                println!("member {member}: scale area by {factor:.2}");
            }
            Recommendation::IncreaseInertia { member, factor, .. } => {
                println!("member {member}: scale inertia by {factor:.2}");
            }
            _ => {}
        }
    }

    Ok(())
}
