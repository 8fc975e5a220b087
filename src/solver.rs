//! Direct stiffness solver for pin-jointed trusses.
//!
//! [`solve`] is a pure function of a [`TrussSystem`] snapshot: it assembles the global
//! stiffness matrix, partitions the degrees of freedom into free and restrained sets
//! (joint-major, axis-minor), solves the reduced system and back-computes reactions and
//! member forces. See <https://en.wikipedia.org/wiki/Direct_stiffness_method>.

use log::debug;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};
use petgraph::graph::EdgeIndex;

use crate::errors::AnalysisError;

/// Condition number above which results are flagged as potentially inaccurate.
pub const CONDITION_WARNING_THRESHOLD: f64 = 1.0e5;

/// Condition number, per free degree of freedom, above which the reduced stiffness matrix
/// is treated as singular.
///
/// Rounding can leave an unstable structure with a tiny non-zero pivot, so a finite LU
/// solve alone does not prove stability. The limit is divided by the number of free
/// degrees of freedom, the usual numerical rank tolerance.
pub const SINGULARITY_THRESHOLD: f64 = 1.0 / f64::EPSILON;

/// Joint data consumed by the solver.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemNode {
    /// Position in metres.
    pub position: Vector3<f64>,
    /// `true` where translation is restrained.
    pub support: [bool; 3],
    /// Total load in newtons, self-weight included.
    pub load: Vector3<f64>,
}

/// Member data consumed by the solver.
#[derive(Clone, Debug, PartialEq)]
pub struct SystemElement {
    /// Index of the start node.
    pub start: usize,
    /// Index of the end node.
    pub end: usize,
    /// Elastic modulus in pascals.
    pub elastic_modulus: f64,
    /// Cross-sectional area in square metres.
    pub area: f64,
}

/// Immutable snapshot of a truss ready to be solved.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrussSystem {
    /// Joints in degree-of-freedom order.
    pub nodes: Vec<SystemNode>,
    /// Members; element indices double as member identities.
    pub elements: Vec<SystemElement>,
}

/// Output of [`solve`].
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    /// Axial force per element; positive in tension.
    pub forces: Vec<f64>,
    /// Displacement per node; exactly zero along restrained axes.
    pub deflections: Vec<Vector3<f64>>,
    /// `K u - F` per node, evaluated along every axis.
    pub reactions: Vec<Vector3<f64>>,
    /// 2-norm condition number of the reduced stiffness matrix.
    pub condition_number: f64,
    /// Number of unrestrained degrees of freedom.
    pub free_dofs: usize,
}

impl Solution {
    /// Whether the condition number is below [`CONDITION_WARNING_THRESHOLD`].
    #[must_use]
    pub fn is_well_conditioned(&self) -> bool {
        self.condition_number <= CONDITION_WARNING_THRESHOLD
    }
}

/// Solve a truss for member forces, deflections and reactions.
///
/// # Errors
///
/// Returns [`AnalysisError::ZeroLengthMember`] when an element joins coincident nodes and
/// [`AnalysisError::SingularSystem`] when the reduced stiffness matrix cannot be solved
/// or is numerically rank deficient (see [`SINGULARITY_THRESHOLD`]), which indicates an
/// unstable or under-restrained structure.
///
/// # Panics
///
/// Panics when an element references a node outside `system.nodes`.
pub fn solve(system: &TrussSystem) -> Result<Solution, AnalysisError> {
    let axial = element_axes(system)?;
    let stiffness = assemble_stiffness(system, &axial);
    let load = load_vector(system);
    let free = free_dofs(system);
    debug!(
        "assembled {} x {} stiffness matrix with {} free degrees of freedom",
        stiffness.nrows(),
        stiffness.ncols(),
        free.len()
    );

    let (displacements, condition_number) = solve_displacements(&stiffness, &load, &free)?;
    let reactions = &stiffness * &displacements - &load;

    let node_vector = |values: &DVector<f64>, node: usize| {
        Vector3::new(values[3 * node], values[3 * node + 1], values[3 * node + 2])
    };
    let forces = system
        .elements
        .iter()
        .zip(&axial)
        .map(|(element, (direction, ea_over_l))| {
            let relative =
                node_vector(&displacements, element.end) - node_vector(&displacements, element.start);
            ea_over_l * direction.dot(&relative)
        })
        .collect();

    let nodes = 0..system.nodes.len();
    Ok(Solution {
        forces,
        deflections: nodes.clone().map(|n| node_vector(&displacements, n)).collect(),
        reactions: nodes.map(|n| node_vector(&reactions, n)).collect(),
        condition_number,
        free_dofs: free.len(),
    })
}

/// Unit direction (start to end) and axial stiffness `EA / L` of every element.
fn element_axes(system: &TrussSystem) -> Result<Vec<(Vector3<f64>, f64)>, AnalysisError> {
    system
        .elements
        .iter()
        .enumerate()
        .map(|(idx, element)| {
            let delta = system.nodes[element.end].position - system.nodes[element.start].position;
            let length = delta.norm();
            if length == 0.0 {
                return Err(AnalysisError::ZeroLengthMember(EdgeIndex::new(idx)));
            }
            Ok((delta / length, element.elastic_modulus * element.area / length))
        })
        .collect()
}

/// Assemble the global stiffness matrix from the element contributions.
fn assemble_stiffness(system: &TrussSystem, axial: &[(Vector3<f64>, f64)]) -> DMatrix<f64> {
    let dof = system.nodes.len() * 3;
    let mut matrix = DMatrix::zeros(dof, dof);
    for (element, (direction, ea_over_l)) in system.elements.iter().zip(axial) {
        let block: Matrix3<f64> = direction * direction.transpose() * *ea_over_l;
        let start = element.start * 3;
        let end = element.end * 3;
        for (row, col, sign) in [
            (start, start, 1.0),
            (end, end, 1.0),
            (start, end, -1.0),
            (end, start, -1.0),
        ] {
            for i in 0..3 {
                for j in 0..3 {
                    matrix[(row + i, col + j)] += sign * block[(i, j)];
                }
            }
        }
    }
    matrix
}

/// Assemble the global nodal load vector.
fn load_vector(system: &TrussSystem) -> DVector<f64> {
    DVector::from_iterator(
        system.nodes.len() * 3,
        system.nodes.iter().flat_map(|node| node.load.iter().copied()),
    )
}

/// Indices of unrestrained degrees of freedom, joint-major then axis-minor.
fn free_dofs(system: &TrussSystem) -> Vec<usize> {
    system
        .nodes
        .iter()
        .enumerate()
        .flat_map(|(idx, node)| {
            (0..3)
                .filter(move |&axis| !node.support[axis])
                .map(move |axis| idx * 3 + axis)
        })
        .collect()
}

/// Solve the reduced system and scatter the result into a full displacement vector.
fn solve_displacements(
    stiffness: &DMatrix<f64>,
    load: &DVector<f64>,
    free_dofs: &[usize],
) -> Result<(DVector<f64>, f64), AnalysisError> {
    let mut displacements = DVector::zeros(load.len());
    let free_len = free_dofs.len();
    if free_len == 0 {
        return Ok((displacements, 1.0));
    }
    let k_ff = DMatrix::from_fn(free_len, free_len, |row, col| {
        stiffness[(free_dofs[row], free_dofs[col])]
    });
    let f_f = DVector::from_fn(free_len, |row, _| load[free_dofs[row]]);

    let singular = AnalysisError::SingularSystem {
        free_dofs: free_len,
    };
    let condition_number = condition_number(&k_ff);
    let limit = SINGULARITY_THRESHOLD / free_len as f64;
    if !condition_number.is_finite() || condition_number > limit {
        return Err(singular);
    }
    let solution = k_ff
        .lu()
        .solve(&f_f)
        .filter(|solution| solution.iter().all(|value| value.is_finite()))
        .ok_or(singular)?;
    for (idx, &dof) in free_dofs.iter().enumerate() {
        displacements[dof] = solution[idx];
    }
    Ok((displacements, condition_number))
}

/// Ratio of the largest to the smallest singular value.
fn condition_number(matrix: &DMatrix<f64>) -> f64 {
    let singular_values = matrix.singular_values();
    let smallest = singular_values.min();
    if smallest == 0.0 {
        f64::INFINITY
    } else {
        singular_values.max() / smallest
    }
}
