use serde::Serialize;
use trussfos::{
    Displacement, Force, GoalEvaluation, Goals, MemberResponse, Point, Recommendation, Truss,
    TrussSummary,
};

/// Solved state of a single joint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointResult {
    /// Declaration index of the joint.
    pub index: usize,
    /// Position in metres.
    pub position: Point,
    /// Applied load including self-weight.
    pub load: Force,
    /// Support reaction; zero along free axes.
    pub reaction: Force,
    /// Deflection; zero along restrained axes.
    pub deflection: Displacement,
}

/// Solved state of a single member.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberResult {
    /// Declaration index of the member.
    pub index: usize,
    /// Start and end joint indices.
    pub joints: (usize, usize),
    /// Material name.
    pub material: String,
    /// Mass in kilograms.
    pub mass: f64,
    /// Axial force, stress and factors of safety.
    pub response: MemberResponse,
}

/// Everything the binary reports about an analysed truss.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisSummary {
    /// Truss level aggregates.
    pub summary: TrussSummary,
    /// Largest joint deflection magnitude in metres.
    pub max_deflection: f64,
    /// Member with the smallest factor of safety.
    pub governing_member: Option<usize>,
    /// Configured goals.
    pub goals: Goals,
    /// Pass/fail outcome of each set goal.
    pub goal_results: GoalEvaluation,
    /// Suggested design changes.
    pub recommendations: Vec<Recommendation>,
    /// Per-joint results.
    pub joints: Vec<JointResult>,
    /// Per-member results.
    pub members: Vec<MemberResult>,
}

impl AnalysisSummary {
    /// Collect the results of an analysed truss; `None` when the truss has not been
    /// evaluated since its last edit.
    pub fn collect(truss: &Truss) -> Option<Self> {
        let summary = *truss.summary()?;
        let joints = truss
            .joints()
            .map(|(node, joint)| {
                let response = joint.response()?;
                Some(JointResult {
                    index: node.index(),
                    position: joint.position(),
                    load: truss.total_load(node)?,
                    reaction: response.reaction,
                    deflection: response.deflection,
                })
            })
            .collect::<Option<Vec<_>>>()?;
        let members = truss
            .members()
            .map(|(edge, member)| {
                let (start, end) = truss.member_endpoints(edge)?;
                Some(MemberResult {
                    index: edge.index(),
                    joints: (start.index(), end.index()),
                    material: member.material_name().to_owned(),
                    mass: member.mass(),
                    response: *member.response()?,
                })
            })
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            summary,
            max_deflection: truss.max_deflection()?,
            governing_member: truss.governing_member().map(|edge| edge.index()),
            goals: *truss.goals(),
            goal_results: truss.goal_evaluation()?,
            recommendations: truss.recommendations()?,
            joints,
            members,
        })
    }
}
