#![warn(clippy::all)]
#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

pub mod errors;
pub mod format;
pub mod geometry;
pub mod goals;
pub mod joint;
pub mod material;
pub mod member;
pub mod section;
pub mod solver;
pub mod truss;

pub use errors::{AnalysisError, ConfigurationError, TrussEditError, TrussFileError};
pub use format::{parse_truss, parse_truss_with, read_truss_file, write_truss, write_truss_file};
pub use geometry::{force, point, Axis, Displacement, Force, Point};
pub use goals::{
    recommend, Goal, GoalEvaluation, GoalMetrics, Goals, JointState, MemberState,
    Recommendation, UNSET_GOAL,
};
pub use joint::{Dimension, Joint, JointResponse, Support};
pub use material::{Material, MaterialTable};
pub use member::{Member, MemberResponse, BUCKLING_NOT_APPLICABLE};
pub use section::{CrossSection, SectionProperties, Shape};
pub use solver::{
    solve, Solution, TrussSystem, CONDITION_WARNING_THRESHOLD, SINGULARITY_THRESHOLD,
};
pub use truss::{LimitState, Truss, TrussSummary, STANDARD_GRAVITY};
