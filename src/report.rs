use std::fmt::Write;

use trussfos::Recommendation;

use crate::analysis::AnalysisSummary;

/// Render a textual summary of a truss analysis.
#[must_use]
pub fn render_summary(summary: &AnalysisSummary) -> String {
    let mut output = String::new();
    let totals = &summary.summary;

    writeln!(
        output,
        "Truss analysis ({} joints, {} members)",
        summary.joints.len(),
        summary.members.len()
    )
    .expect("writing to string cannot fail");
    writeln!(output, "Mass: {:.3} kg", totals.mass).expect("writing to string cannot fail");
    writeln!(
        output,
        "Factor of safety: {} ({})",
        ratio(totals.fos_total),
        totals.limit_state
    )
    .expect("writing to string cannot fail");
    writeln!(
        output,
        "  yielding = {}, buckling = {}",
        ratio(totals.fos_yielding),
        ratio(totals.fos_buckling)
    )
    .expect("writing to string cannot fail");
    if let Some(member) = summary.governing_member {
        writeln!(output, "Governing member: {member}").expect("writing to string cannot fail");
    }
    writeln!(output, "Max deflection: {:.3e} m", summary.max_deflection)
        .expect("writing to string cannot fail");
    write!(output, "Condition number: {:.3e}", totals.condition_number)
        .expect("writing to string cannot fail");
    if totals.ill_conditioned {
        output.push_str(" (results may be inaccurate)");
    }
    output.push('\n');

    if !summary.goal_results.is_empty() {
        output.push_str("Goals:\n");
        for (goal, satisfied) in summary.goal_results.iter() {
            let bound = summary.goals.get(goal).unwrap_or_default();
            let verdict = if satisfied { "pass" } else { "fail" };
            writeln!(output, "  {goal} = {bound}: {verdict}")
                .expect("writing to string cannot fail");
        }
    }

    if !summary.recommendations.is_empty() {
        output.push_str("Recommendations:\n");
        for recommendation in &summary.recommendations {
            writeln!(output, "  {}", describe(recommendation))
                .expect("writing to string cannot fail");
        }
    }

    output
}

fn ratio(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.3}")
    } else {
        "n/a".to_owned()
    }
}

fn describe(recommendation: &Recommendation) -> String {
    match recommendation {
        Recommendation::IncreaseArea {
            member,
            current,
            recommended,
            factor,
        } => format!(
            "member {member}: yields, increase area from {current:.3e} to {recommended:.3e} m² (x{factor:.2})"
        ),
        Recommendation::IncreaseInertia {
            member,
            current,
            recommended,
            factor,
        } => format!(
            "member {member}: buckles, increase minimum inertia from {current:.3e} to {recommended:.3e} m⁴ (x{factor:.2})"
        ),
        Recommendation::ReduceArea { member } => {
            format!("member {member}: reduce area to save mass")
        }
        Recommendation::StiffenJoint {
            joint,
            deflection,
            members,
        } => format!("joint {joint}: deflects {deflection:.3e} m, stiffen members {members:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trussfos::parse_truss;

    #[test]
    fn formats_human_readable_report() {
        let mut truss = parse_truss(
            "J 0 0 0 1 1 1\nJ 1 0 0 0 1 1\nM 0 1 A36 arbitrary area=0.01 I_min=1e-6\nL 1 1000 0 0\n",
        )
        .expect("valid truss");
        truss.set_goal("max_mass", 10.0).expect("valid goal");
        truss.evaluate().expect("analysis succeeds");
        let summary = AnalysisSummary::collect(&truss).expect("results available");

        let report = render_summary(&summary);
        assert!(report.contains("Truss analysis (2 joints, 1 members)"));
        assert!(report.contains("Mass: 78.000 kg"));
        assert!(report.contains("buckling = n/a"));
        assert!(report.contains("max_mass = 10: fail"));
        assert!(report.contains("member 0: reduce area"));
    }
}
