//! Design goals, their evaluation against solved metrics, and redesign recommendations.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;
use crate::member::MemberResponse;

/// Bound accepted in textual configuration to mean "goal not set".
pub const UNSET_GOAL: f64 = -1.0;

/// A design target the solved truss can be checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    /// Lower bound on the governing factor of safety.
    MinFosTotal,
    /// Lower bound on the yielding factor of safety.
    MinFosYielding,
    /// Lower bound on the buckling factor of safety.
    MinFosBuckling,
    /// Upper bound on the total mass in kilograms.
    MaxMass,
    /// Upper bound on the largest joint deflection magnitude in metres.
    MaxDeflection,
}

impl Goal {
    /// Every goal.
    pub const ALL: [Goal; 5] = [
        Goal::MinFosTotal,
        Goal::MinFosYielding,
        Goal::MinFosBuckling,
        Goal::MaxMass,
        Goal::MaxDeflection,
    ];

    /// Configuration key of the goal.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Goal::MinFosTotal => "min_fos_total",
            Goal::MinFosYielding => "min_fos_yielding",
            Goal::MinFosBuckling => "min_fos_buckling",
            Goal::MaxMass => "max_mass",
            Goal::MaxDeflection => "max_deflection",
        }
    }

    /// Whether the metric must stay above the bound (rather than below it).
    #[must_use]
    pub const fn is_lower_bound(self) -> bool {
        matches!(
            self,
            Goal::MinFosTotal | Goal::MinFosYielding | Goal::MinFosBuckling
        )
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Goal {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Goal::ALL
            .into_iter()
            .find(|goal| goal.key() == s)
            .ok_or_else(|| ConfigurationError::UnknownGoal(s.to_owned()))
    }
}

/// Optional bound for every design goal.
///
/// Bounds can only be set through [`Goals::set`] and [`Goals::from_pairs`], so a stored
/// bound is always finite and non-negative.
///
/// # Examples
/// ```
/// use trussfos::{Goal, Goals};
///
/// let goals = Goals::from_pairs([("min_fos_yielding", 1.5), ("max_mass", -1.0)])
///     .expect("valid goals");
/// assert_eq!(goals.get(Goal::MinFosYielding), Some(1.5));
/// assert_eq!(goals.get(Goal::MaxMass), None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Goals {
    min_fos_total: Option<f64>,
    min_fos_yielding: Option<f64>,
    min_fos_buckling: Option<f64>,
    max_mass: Option<f64>,
    max_deflection: Option<f64>,
}

impl Goals {
    /// Build goals from `(key, bound)` pairs, validating every entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownGoal`] for an unrecognised key and
    /// [`ConfigurationError::InvalidGoal`] for a negative or non-finite bound.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut goals = Self::default();
        for (key, value) in pairs {
            goals.set(key.parse()?, value)?;
        }
        Ok(goals)
    }

    /// Set or clear a bound. [`UNSET_GOAL`] clears it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidGoal`] for a negative or non-finite bound.
    pub fn set(&mut self, goal: Goal, value: f64) -> Result<(), ConfigurationError> {
        let bound = if value == UNSET_GOAL {
            None
        } else if value.is_finite() && value >= 0.0 {
            Some(value)
        } else {
            return Err(ConfigurationError::InvalidGoal { goal, value });
        };
        *self.slot_mut(goal) = bound;
        Ok(())
    }

    /// Bound for `goal`, if set.
    #[must_use]
    pub fn get(&self, goal: Goal) -> Option<f64> {
        match goal {
            Goal::MinFosTotal => self.min_fos_total,
            Goal::MinFosYielding => self.min_fos_yielding,
            Goal::MinFosBuckling => self.min_fos_buckling,
            Goal::MaxMass => self.max_mass,
            Goal::MaxDeflection => self.max_deflection,
        }
    }

    /// Whether no goal is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        Goal::ALL.iter().all(|goal| self.get(*goal).is_none())
    }

    fn slot_mut(&mut self, goal: Goal) -> &mut Option<f64> {
        match goal {
            Goal::MinFosTotal => &mut self.min_fos_total,
            Goal::MinFosYielding => &mut self.min_fos_yielding,
            Goal::MinFosBuckling => &mut self.min_fos_buckling,
            Goal::MaxMass => &mut self.max_mass,
            Goal::MaxDeflection => &mut self.max_deflection,
        }
    }

    /// Classify every set goal as satisfied or violated.
    ///
    /// Bounds are strict: a metric equal to its bound violates the goal.
    #[must_use]
    pub fn evaluate(&self, metrics: &GoalMetrics) -> GoalEvaluation {
        let outcomes = Goal::ALL
            .into_iter()
            .filter_map(|goal| {
                let bound = self.get(goal)?;
                let value = metrics.value(goal);
                let satisfied = if goal.is_lower_bound() {
                    value > bound
                } else {
                    value < bound
                };
                Some((goal, satisfied))
            })
            .collect();
        GoalEvaluation { outcomes }
    }
}

/// Aggregate truss metrics that goals are compared against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoalMetrics {
    /// Governing factor of safety.
    pub fos_total: f64,
    /// Truss factor of safety against yielding.
    pub fos_yielding: f64,
    /// Truss factor of safety against buckling.
    pub fos_buckling: f64,
    /// Total mass in kilograms.
    pub mass: f64,
    /// Largest joint deflection magnitude in metres.
    pub max_deflection: f64,
}

impl GoalMetrics {
    /// Metric a goal constrains.
    #[must_use]
    pub fn value(&self, goal: Goal) -> f64 {
        match goal {
            Goal::MinFosTotal => self.fos_total,
            Goal::MinFosYielding => self.fos_yielding,
            Goal::MinFosBuckling => self.fos_buckling,
            Goal::MaxMass => self.mass,
            Goal::MaxDeflection => self.max_deflection,
        }
    }
}

/// Pass/fail outcome for each set goal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalEvaluation {
    /// `true` where the goal is satisfied.
    outcomes: BTreeMap<Goal, bool>,
}

impl GoalEvaluation {
    /// Outcome for `goal`; `None` when the goal is not set.
    #[must_use]
    pub fn get(&self, goal: Goal) -> Option<bool> {
        self.outcomes.get(&goal).copied()
    }

    /// Whether no goal was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Whether every set goal is satisfied.
    #[must_use]
    pub fn all_satisfied(&self) -> bool {
        self.outcomes.values().all(|satisfied| *satisfied)
    }

    /// Goals that were evaluated, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Goal, bool)> + '_ {
        self.outcomes.iter().map(|(goal, satisfied)| (*goal, *satisfied))
    }

    /// Goals that are violated.
    pub fn violated(&self) -> impl Iterator<Item = Goal> + '_ {
        self.iter()
            .filter(|(_, satisfied)| !satisfied)
            .map(|(goal, _)| goal)
    }
}

/// A suggested design change derived from goals and the solved response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    /// Member yields before reaching the yielding goal.
    IncreaseArea {
        /// Member index.
        member: usize,
        /// Current area in square metres.
        current: f64,
        /// Area that would meet the goal.
        recommended: f64,
        /// Minimum factor to scale the area by.
        factor: f64,
    },
    /// Member buckles before reaching the buckling goal.
    IncreaseInertia {
        /// Member index.
        member: usize,
        /// Current minimum inertia in metres⁴.
        current: f64,
        /// Inertia that would meet the goal.
        recommended: f64,
        /// Minimum factor to scale the inertia by.
        factor: f64,
    },
    /// Member is stronger than needed while the truss exceeds its mass goal.
    ReduceArea {
        /// Member index.
        member: usize,
    },
    /// Joint deflects beyond the deflection goal.
    StiffenJoint {
        /// Joint index.
        joint: usize,
        /// Deflection magnitude in metres.
        deflection: f64,
        /// Indices of the members meeting at the joint.
        members: Vec<usize>,
    },
}

/// Member data needed to derive recommendations.
#[derive(Clone, Copy, Debug)]
pub struct MemberState {
    /// Member index.
    pub member: usize,
    /// Cross-sectional area in square metres.
    pub area: f64,
    /// Minimum inertia in metres⁴.
    pub min_inertia: f64,
    /// Solved response.
    pub response: MemberResponse,
}

/// Joint data needed to derive recommendations.
#[derive(Clone, Debug)]
pub struct JointState {
    /// Joint index.
    pub joint: usize,
    /// Deflection magnitude in metres.
    pub deflection: f64,
    /// Incident member indices.
    pub members: Vec<usize>,
}

/// Derive redesign recommendations.
///
/// Unset factor-of-safety goals default to a threshold of one. When the mass goal is
/// violated, every member that neither yields nor buckles below its threshold is a
/// [`Recommendation::ReduceArea`] candidate. Tension members qualify on yielding alone,
/// since buckling does not apply to them.
#[must_use]
pub fn recommend(
    goals: &Goals,
    mass: f64,
    members: &[MemberState],
    joints: &[JointState],
) -> Vec<Recommendation> {
    let yielding_target = goals.get(Goal::MinFosYielding).unwrap_or(1.0);
    let buckling_target = goals.get(Goal::MinFosBuckling).unwrap_or(1.0);
    let over_mass = goals
        .get(Goal::MaxMass)
        .is_some_and(|max_mass| mass > max_mass);

    let mut recommendations = Vec::new();
    for state in members {
        let response = &state.response;
        let yields = response.fos_yielding < yielding_target;
        let buckles = response.buckling_applies() && response.fos_buckling < buckling_target;
        if yields {
            let factor = yielding_target / response.fos_yielding;
            recommendations.push(Recommendation::IncreaseArea {
                member: state.member,
                current: state.area,
                recommended: state.area * factor,
                factor,
            });
        }
        if buckles {
            let factor = buckling_target / response.fos_buckling;
            recommendations.push(Recommendation::IncreaseInertia {
                member: state.member,
                current: state.min_inertia,
                recommended: state.min_inertia * factor,
                factor,
            });
        }
        if over_mass && !yields && !buckles {
            recommendations.push(Recommendation::ReduceArea {
                member: state.member,
            });
        }
    }

    if let Some(max_deflection) = goals.get(Goal::MaxDeflection) {
        recommendations.extend(
            joints
                .iter()
                .filter(|state| state.deflection > max_deflection)
                .map(|state| Recommendation::StiffenJoint {
                    joint: state.joint,
                    deflection: state.deflection,
                    members: state.members.clone(),
                }),
        );
    }
    recommendations
}
