//! Core data structures and algorithms for truss analysis.

use std::fmt;

use log::{debug, info, warn};
use nalgebra::Vector3;
use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, TrussEditError};
use crate::geometry::{Displacement, Force, Point};
use crate::goals::{
    self, Goal, GoalEvaluation, GoalMetrics, Goals, JointState, MemberState, Recommendation,
};
use crate::joint::{Joint, Support};
use crate::material::MaterialTable;
use crate::member::Member;
use crate::section::CrossSection;
use crate::solver::{self, SystemElement, SystemNode, TrussSystem};

/// Standard acceleration of gravity in m/s².
pub const STANDARD_GRAVITY: f64 = 9.80665;

/// Failure mode that governs the truss.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitState {
    /// Material yielding governs.
    Yielding,
    /// Euler buckling of a compression member governs.
    Buckling,
}

impl fmt::Display for LimitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LimitState::Yielding => "yielding",
            LimitState::Buckling => "buckling",
        })
    }
}

/// Aggregate results of a truss analysis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrussSummary {
    /// Total member mass in kilograms.
    pub mass: f64,
    /// Smallest member factor of safety against yielding.
    pub fos_yielding: f64,
    /// Smallest applicable member factor of safety against buckling; infinite when no
    /// member is in compression.
    pub fos_buckling: f64,
    /// Smaller of the yielding and buckling factors of safety.
    pub fos_total: f64,
    /// Failure mode behind `fos_total`.
    pub limit_state: LimitState,
    /// Condition number of the reduced stiffness matrix.
    pub condition_number: f64,
    /// Whether the condition number exceeds
    /// [`CONDITION_WARNING_THRESHOLD`](crate::solver::CONDITION_WARNING_THRESHOLD).
    pub ill_conditioned: bool,
}

/// Container for a pin-jointed truss model.
///
/// Joints and members live in an undirected graph arena; their indices are assigned in
/// insertion order and define the degree-of-freedom ordering of the analysis.
#[derive(Clone, Debug)]
pub struct Truss {
    /// Underlying graph storage for joints and members.
    graph: UnGraph<Joint, Member>,
    /// Materials members resolve their names against.
    materials: MaterialTable,
    /// Gravitational acceleration used for self-weight, in m/s².
    gravity: Vector3<f64>,
    /// Design goals used for evaluation only.
    goals: Goals,
    /// Aggregate results; present while the analysis is current.
    summary: Option<TrussSummary>,
}

impl Default for Truss {
    fn default() -> Self {
        Self::new()
    }
}

impl Truss {
    /// Create an empty truss using the standard material table.
    ///
    /// # Examples
    /// ```
    /// use trussfos::Truss;
    ///
    /// let truss = Truss::new();
    /// assert_eq!(truss.joint_count(), 0);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_materials(MaterialTable::standard())
    }

    /// Create an empty truss resolving materials against `materials`.
    #[must_use]
    pub fn with_materials(materials: MaterialTable) -> Self {
        Self {
            graph: UnGraph::new_undirected(),
            materials,
            gravity: Vector3::new(0.0, -STANDARD_GRAVITY, 0.0),
            goals: Goals::default(),
            summary: None,
        }
    }

    /// Material table of the truss.
    #[must_use]
    pub fn materials(&self) -> &MaterialTable {
        &self.materials
    }

    /// Return the number of joints in the truss.
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of members in the truss.
    #[must_use]
    pub fn member_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Add a new free joint to the truss.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::NonFinite`] when a coordinate is NaN or infinite.
    ///
    /// # Examples
    /// ```
    /// use trussfos::{point, Truss};
    ///
    /// let mut truss = Truss::new();
    /// let joint = truss.add_joint(point(0.0, 0.0, 0.0)).expect("finite position");
    /// assert_eq!(truss.joint_count(), 1);
    /// assert_eq!(joint.index(), 0);
    ///
    /// assert!(truss.add_joint(point(f64::NAN, 0.0, 0.0)).is_err());
    /// assert_eq!(truss.joint_count(), 1);
    /// ```
    pub fn add_joint(&mut self, position: Point) -> Result<NodeIndex, TrussEditError> {
        ensure_finite("joint position", position.to_vector())?;
        self.invalidate();
        Ok(self.graph.add_node(Joint::new(position)))
    }

    /// Update the position of an existing joint and the length of its members.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss and
    /// [`TrussEditError::NonFinite`] when a coordinate is NaN or infinite.
    pub fn move_joint(&mut self, joint: NodeIndex, position: Point) -> Result<(), TrussEditError> {
        self.ensure_joint(joint)?;
        ensure_finite("joint position", position.to_vector())?;
        self.invalidate();
        self.graph[joint].set_position(position);
        for member in self.incident_members(joint) {
            self.refresh_length(member);
        }
        Ok(())
    }

    /// Set the restraint state for a joint.
    ///
    /// Accepts a [`Support`] or `[bool; 3]` flags in X, Y, Z order, where `true`
    /// restrains the degree of freedom.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss.
    pub fn set_support(
        &mut self,
        joint: NodeIndex,
        support: impl Into<Support>,
    ) -> Result<(), TrussEditError> {
        self.ensure_joint(joint)?;
        self.invalidate();
        self.graph[joint].set_support(support.into());
        Ok(())
    }

    /// Apply a point load to a joint, replacing any previous load.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] when `joint` is not part of this truss and
    /// [`TrussEditError::NonFinite`] when a component is NaN or infinite.
    pub fn set_load(&mut self, joint: NodeIndex, load: Force) -> Result<(), TrussEditError> {
        self.ensure_joint(joint)?;
        ensure_finite("joint load", load.to_vector())?;
        self.invalidate();
        self.graph[joint].set_load(load);
        Ok(())
    }

    /// Connect two joints with a new member.
    ///
    /// The material and cross-section are resolved immediately.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownJoint`] for an unknown end,
    /// [`TrussEditError::SelfConnectedMember`] when both ends coincide and
    /// [`TrussEditError::InvalidMember`] when the material or section is rejected.
    ///
    /// # Examples
    /// ```
    /// use trussfos::{point, CrossSection, Truss, TrussEditError};
    ///
    /// let mut truss = Truss::new();
    /// let a = truss.add_joint(point(0.0, 0.0, 0.0)).expect("joint added");
    /// let b = truss.add_joint(point(1.0, 0.0, 0.0)).expect("joint added");
    ///
    /// let error = truss
    ///     .add_member(a, b, "A36", CrossSection::pipe(0.01, 0.02))
    ///     .expect_err("wall thicker than radius");
    /// assert!(matches!(error, TrussEditError::InvalidMember { .. }));
    ///
    /// let member = truss
    ///     .add_member(a, b, "A36", CrossSection::pipe(0.02, 0.002))
    ///     .expect("valid member");
    /// assert_eq!(member.index(), 0);
    /// ```
    pub fn add_member(
        &mut self,
        start: NodeIndex,
        end: NodeIndex,
        material: &str,
        section: CrossSection,
    ) -> Result<EdgeIndex, TrussEditError> {
        self.ensure_joint(start)?;
        self.ensure_joint(end)?;
        if start == end {
            return Err(TrussEditError::SelfConnectedMember(start));
        }
        let member = EdgeIndex::new(self.member_count());
        let invalid = |source| TrussEditError::InvalidMember { member, source };
        let properties = self.materials.get(material).map_err(invalid)?;
        let length = self.graph[start].position().distance_to(self.graph[end].position());
        let weight = Member::new(material, properties, section, length).map_err(invalid)?;
        self.invalidate();
        Ok(self.graph.add_edge(start, end, weight))
    }

    /// Change the material of a member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownMember`] when `member` is not part of this truss and
    /// [`TrussEditError::InvalidMember`] when the material is not in the table.
    pub fn set_member_material(
        &mut self,
        member: EdgeIndex,
        material: &str,
    ) -> Result<(), TrussEditError> {
        self.ensure_member(member)?;
        let properties = self
            .materials
            .get(material)
            .map_err(|source| TrussEditError::InvalidMember { member, source })?;
        self.invalidate();
        self.graph[member].set_material(material, properties);
        Ok(())
    }

    /// Change the cross-section of a member.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::UnknownMember`] when `member` is not part of this truss and
    /// [`TrussEditError::InvalidMember`] when the section cannot be resolved.
    pub fn set_member_section(
        &mut self,
        member: EdgeIndex,
        section: CrossSection,
    ) -> Result<(), TrussEditError> {
        self.ensure_member(member)?;
        self.graph[member]
            .set_section(section)
            .map_err(|source| TrussEditError::InvalidMember { member, source })?;
        self.invalidate();
        Ok(())
    }

    /// Gravitational acceleration applied to member self-weight.
    #[must_use]
    pub fn gravity(&self) -> Vector3<f64> {
        self.gravity
    }

    /// Replace the gravitational acceleration, in m/s².
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::NonFinite`] when a component is NaN or infinite.
    pub fn set_gravity(&mut self, gravity: Vector3<f64>) -> Result<(), TrussEditError> {
        ensure_finite("gravity", gravity)?;
        self.invalidate();
        self.gravity = gravity;
        Ok(())
    }

    /// Design goals of the truss.
    #[must_use]
    pub fn goals(&self) -> &Goals {
        &self.goals
    }

    /// Replace every design goal. Goals never affect the structural solve.
    pub fn set_goals(&mut self, goals: Goals) {
        self.goals = goals;
    }

    /// Set a single design goal by key; `-1` clears it.
    ///
    /// # Errors
    ///
    /// Returns [`TrussEditError::Configuration`] for an unknown key or invalid bound.
    pub fn set_goal(&mut self, key: &str, value: f64) -> Result<(), TrussEditError> {
        let goal: Goal = key.parse()?;
        self.goals.set(goal, value)?;
        Ok(())
    }

    /// Joint stored at `joint`.
    #[must_use]
    pub fn joint(&self, joint: NodeIndex) -> Option<&Joint> {
        self.graph.node_weight(joint)
    }

    /// Member stored at `member`.
    #[must_use]
    pub fn member(&self, member: EdgeIndex) -> Option<&Member> {
        self.graph.edge_weight(member)
    }

    /// Start and end joints of a member.
    #[must_use]
    pub fn member_endpoints(&self, member: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(member)
    }

    /// Joints in declaration order.
    pub fn joints(&self) -> impl Iterator<Item = (NodeIndex, &Joint)> + '_ {
        self.graph
            .node_indices()
            .map(move |node| (node, &self.graph[node]))
    }

    /// Members in declaration order.
    pub fn members(&self) -> impl Iterator<Item = (EdgeIndex, &Member)> + '_ {
        self.graph
            .edge_indices()
            .map(move |edge| (edge, &self.graph[edge]))
    }

    /// Members meeting at `joint`, in ascending index order.
    #[must_use]
    pub fn incident_members(&self, joint: NodeIndex) -> Vec<EdgeIndex> {
        if self.graph.node_weight(joint).is_none() {
            return Vec::new();
        }
        let mut members: Vec<EdgeIndex> = self.graph.edges(joint).map(|edge| edge.id()).collect();
        members.sort_unstable();
        members
    }

    /// Load applied to a joint during analysis: the user load plus half the weight of
    /// every incident member.
    #[must_use]
    pub fn total_load(&self, joint: NodeIndex) -> Option<Force> {
        let node = self.graph.node_weight(joint)?;
        let half_weight: f64 = self
            .graph
            .edges(joint)
            .map(|edge| edge.weight().mass() / 2.0)
            .sum();
        Some(node.load() + Force::from(self.gravity * half_weight))
    }

    /// Total mass of all members in kilograms.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.graph.edge_weights().map(Member::mass).sum()
    }

    /// Snapshot of the truss in the form consumed by [`solver::solve`].
    #[must_use]
    pub fn system(&self) -> TrussSystem {
        let nodes = self
            .joints()
            .map(|(node, joint)| SystemNode {
                position: joint.position().to_vector(),
                support: joint.support().flags(),
                load: self
                    .total_load(node)
                    .unwrap_or_default()
                    .to_vector(),
            })
            .collect();
        let elements = self
            .graph
            .edge_references()
            .map(|edge| SystemElement {
                start: edge.source().index(),
                end: edge.target().index(),
                elastic_modulus: edge.weight().material().elastic_modulus,
                area: edge.weight().area(),
            })
            .collect();
        TrussSystem { nodes, elements }
    }

    /// Analyse the truss under the configured loads and self-weight.
    ///
    /// Results are cached until the next edit, so calling this repeatedly is cheap.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError`] when a member has zero length or the structure is
    /// unstable.
    pub fn evaluate(&mut self) -> Result<(), AnalysisError> {
        if self.summary.is_some() {
            return Ok(());
        }
        let system = self.system();
        debug!(
            "solving truss with {} joints and {} members",
            system.nodes.len(),
            system.elements.len()
        );
        let solution = solver::solve(&system)?;

        for node in self.graph.node_indices() {
            let idx = node.index();
            self.graph[node].set_response(
                Force::from(solution.reactions[idx]),
                Displacement::from(solution.deflections[idx]),
            );
        }
        for edge in self.graph.edge_indices() {
            self.graph[edge].set_axial_force(solution.forces[edge.index()]);
        }

        let summary = self.summarise(solution.condition_number, !solution.is_well_conditioned());
        if summary.ill_conditioned {
            warn!(
                "the condition number is {:.3e}; results may be inaccurate",
                summary.condition_number
            );
        }
        info!(
            "truss solved: mass = {:.3} kg, fos = {:.3} ({})",
            summary.mass, summary.fos_total, summary.limit_state
        );
        self.summary = Some(summary);
        Ok(())
    }

    /// Aggregate results, present once [`Truss::evaluate`] has succeeded since the last edit.
    #[must_use]
    pub fn summary(&self) -> Option<&TrussSummary> {
        self.summary.as_ref()
    }

    /// Largest joint deflection magnitude after analysis.
    #[must_use]
    pub fn max_deflection(&self) -> Option<f64> {
        self.summary?;
        Some(
            self.graph
                .node_weights()
                .filter_map(Joint::response)
                .map(|response| response.deflection.magnitude())
                .fold(0.0, f64::max),
        )
    }

    /// Member with the smallest governing factor of safety after analysis.
    #[must_use]
    pub fn governing_member(&self) -> Option<EdgeIndex> {
        self.members()
            .filter_map(|(edge, member)| Some((edge, member.response()?.fos_limit())))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(edge, _)| edge)
    }

    /// Member with the largest stress magnitude after analysis.
    #[must_use]
    pub fn max_stress_member(&self) -> Option<EdgeIndex> {
        self.members()
            .filter_map(|(edge, member)| Some((edge, member.response()?.stress.abs())))
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(edge, _)| edge)
    }

    /// Pass/fail outcome of every set goal, once the truss has been analysed.
    #[must_use]
    pub fn goal_evaluation(&self) -> Option<GoalEvaluation> {
        let summary = self.summary?;
        let metrics = GoalMetrics {
            fos_total: summary.fos_total,
            fos_yielding: summary.fos_yielding,
            fos_buckling: summary.fos_buckling,
            mass: summary.mass,
            max_deflection: self.max_deflection()?,
        };
        Some(self.goals.evaluate(&metrics))
    }

    /// Redesign recommendations, once the truss has been analysed.
    #[must_use]
    pub fn recommendations(&self) -> Option<Vec<Recommendation>> {
        let summary = self.summary?;
        let members: Vec<MemberState> = self
            .members()
            .filter_map(|(edge, member)| {
                Some(MemberState {
                    member: edge.index(),
                    area: member.area(),
                    min_inertia: member.min_inertia(),
                    response: *member.response()?,
                })
            })
            .collect();
        let joints: Vec<JointState> = self
            .joints()
            .filter_map(|(node, joint)| {
                Some(JointState {
                    joint: node.index(),
                    deflection: joint.response()?.deflection.magnitude(),
                    members: self
                        .incident_members(node)
                        .into_iter()
                        .map(|edge| edge.index())
                        .collect(),
                })
            })
            .collect();
        Some(goals::recommend(&self.goals, summary.mass, &members, &joints))
    }

    /// Reduce member responses to truss-level factors of safety.
    fn summarise(&self, condition_number: f64, ill_conditioned: bool) -> TrussSummary {
        let responses: Vec<_> = self
            .graph
            .edge_weights()
            .filter_map(Member::response)
            .collect();
        let fos_yielding = responses
            .iter()
            .map(|response| response.fos_yielding)
            .fold(f64::INFINITY, f64::min);
        let fos_buckling = responses
            .iter()
            .filter(|response| response.buckling_applies())
            .map(|response| response.fos_buckling)
            .fold(f64::INFINITY, f64::min);
        let limit_state = if fos_buckling < fos_yielding {
            LimitState::Buckling
        } else {
            LimitState::Yielding
        };
        TrussSummary {
            mass: self.mass(),
            fos_yielding,
            fos_buckling,
            fos_total: fos_yielding.min(fos_buckling),
            limit_state,
            condition_number,
            ill_conditioned,
        }
    }

    /// Reset cached analysis results when the topology or properties change.
    fn invalidate(&mut self) {
        if self.summary.take().is_some() {
            for joint in self.graph.node_weights_mut() {
                joint.clear_response();
            }
            for member in self.graph.edge_weights_mut() {
                member.clear_response();
            }
        }
    }

    /// Recompute a member's length from its end joints.
    fn refresh_length(&mut self, member: EdgeIndex) {
        if let Some((start, end)) = self.graph.edge_endpoints(member) {
            let length = self.graph[start].position().distance_to(self.graph[end].position());
            self.graph[member].set_length(length);
        }
    }

    fn ensure_joint(&self, joint: NodeIndex) -> Result<(), TrussEditError> {
        self.graph
            .node_weight(joint)
            .map(|_| ())
            .ok_or(TrussEditError::UnknownJoint(joint))
    }

    fn ensure_member(&self, member: EdgeIndex) -> Result<(), TrussEditError> {
        self.graph
            .edge_weight(member)
            .map(|_| ())
            .ok_or(TrussEditError::UnknownMember(member))
    }
}

/// Reject vectors with a NaN or infinite component.
fn ensure_finite(quantity: &'static str, value: Vector3<f64>) -> Result<(), TrussEditError> {
    if value.iter().all(|component| component.is_finite()) {
        Ok(())
    } else {
        Err(TrussEditError::NonFinite {
            quantity,
            value: [value.x, value.y, value.z],
        })
    }
}
