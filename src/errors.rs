//! Error types produced while configuring, editing, persisting or analysing trusses.

use petgraph::graph::{EdgeIndex, NodeIndex};
use thiserror::Error;

use crate::goals::Goal;
use crate::section::Shape;

/// Error returned when a material, cross-section or goal is configured inconsistently.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigurationError {
    /// Returned when a material name is not present in the material table.
    #[error("unknown material `{0}`")]
    UnknownMaterial(String),
    /// Returned when a custom material carries properties that are not physically meaningful.
    #[error("material `{name}` is invalid: {reason}")]
    InvalidMaterial {
        /// Name of the rejected material.
        name: String,
        /// Description of the offending property.
        reason: String,
    },
    /// Returned when a shape name is not recognised.
    #[error("unknown shape `{0}`")]
    UnknownShape(String),
    /// Returned when a dimension required by a shape was not supplied.
    #[error("{shape} cross-section requires parameter `{key}`")]
    MissingParameter {
        /// Shape being resolved.
        shape: Shape,
        /// Name of the missing dimension.
        key: &'static str,
    },
    /// Returned when a dimension does not belong to the shape.
    #[error("{shape} cross-section does not accept parameter `{key}`")]
    UnexpectedParameter {
        /// Shape being resolved.
        shape: Shape,
        /// Name of the unexpected dimension.
        key: String,
    },
    /// Returned when a dimension is zero, negative or not finite.
    #[error("{shape} parameter `{key}` must be positive and finite (received {value})")]
    InvalidParameter {
        /// Shape being resolved.
        shape: Shape,
        /// Name of the rejected dimension.
        key: String,
        /// Rejected value.
        value: f64,
    },
    /// Returned when the dimensions do not describe a real section.
    #[error("{shape} parameters are inconsistent: {reason}")]
    InconsistentParameters {
        /// Shape being resolved.
        shape: Shape,
        /// Description of the conflict.
        reason: String,
    },
    /// Returned when a design goal key is not recognised.
    #[error(
        "`{0}` is not a design goal; expected min_fos_total, min_fos_yielding, \
         min_fos_buckling, max_mass or max_deflection"
    )]
    UnknownGoal(String),
    /// Returned when a design goal bound is negative or not finite.
    #[error("goal {goal} must be a non-negative finite bound (received {value})")]
    InvalidGoal {
        /// Goal being configured.
        goal: Goal,
        /// Rejected bound.
        value: f64,
    },
}

/// Error returned when editing a [`Truss`](crate::Truss) with invalid indices or properties.
///
/// # Examples
///
/// ```
/// use petgraph::graph::EdgeIndex;
/// use trussfos::{Truss, TrussEditError};
///
/// let mut truss = Truss::new();
/// let invalid_member = EdgeIndex::new(42);
/// let error = truss
///     .set_member_material(invalid_member, "A36")
///     .expect_err("unknown member is rejected");
/// assert_eq!(error, TrussEditError::UnknownMember(invalid_member));
/// ```
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TrussEditError {
    /// Returned when a joint cannot be found in the truss.
    #[error("joint {0:?} does not exist in this truss")]
    UnknownJoint(NodeIndex),
    /// Returned when a member cannot be found in the truss.
    #[error("member {0:?} does not exist in this truss")]
    UnknownMember(EdgeIndex),
    /// Returned when both ends of a member are the same joint.
    #[error("member cannot connect joint {0:?} to itself")]
    SelfConnectedMember(NodeIndex),
    /// Returned when a position, load or gravity vector has a NaN or infinite component.
    #[error("{quantity} must be finite (received {value:?})")]
    NonFinite {
        /// Quantity being set.
        quantity: &'static str,
        /// Rejected components in X, Y, Z order.
        value: [f64; 3],
    },
    /// Returned when the material or cross-section of a member is rejected.
    #[error("member {member:?} is misconfigured: {source}")]
    InvalidMember {
        /// Identifier of the offending member.
        member: EdgeIndex,
        /// Underlying configuration problem.
        #[source]
        source: ConfigurationError,
    },
    /// Returned when truss-level configuration such as a goal is rejected.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Error returned when a truss analysis fails.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Returned when a member spans zero distance.
    #[error("member {0:?} has zero length")]
    ZeroLengthMember(EdgeIndex),
    /// Returned when the reduced stiffness matrix cannot be solved.
    #[error(
        "stiffness matrix over {free_dofs} free degrees of freedom is singular; \
         check supports and connectivity"
    )]
    SingularSystem {
        /// Size of the reduced system.
        free_dofs: usize,
    },
}

/// Error returned when reading or writing the persisted truss format.
#[derive(Debug, Error)]
pub enum TrussFileError {
    /// Returned when a line does not follow the record grammar.
    #[error("line {line}: {reason}")]
    Format {
        /// One-based line number.
        line: usize,
        /// Description of the malformed content.
        reason: String,
    },
    /// Returned when a record references a joint that has not been declared yet.
    #[error("line {line}: joint {index} has not been declared")]
    UnknownJoint {
        /// One-based line number.
        line: usize,
        /// Referenced joint index.
        index: usize,
    },
    /// Returned when a member record names an unknown material or shape.
    #[error("line {line}: {source}")]
    Configuration {
        /// One-based line number.
        line: usize,
        /// Underlying configuration problem.
        #[source]
        source: ConfigurationError,
    },
    /// Returned when a record cannot be applied to the truss.
    #[error("line {line}: {source}")]
    Edit {
        /// One-based line number.
        line: usize,
        /// Underlying edit problem.
        #[source]
        source: TrussEditError,
    },
    /// Returned when the file cannot be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TrussFileError {
    /// Line the error was raised on, when it stems from file content.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Format { line, .. }
            | Self::UnknownJoint { line, .. }
            | Self::Configuration { line, .. }
            | Self::Edit { line, .. } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
