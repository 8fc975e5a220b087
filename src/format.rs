//! Line-oriented text format for persisting trusses.
//!
//! Every record occupies one line and its fields are separated by whitespace:
//!
//! ```text
//! # comment
//! J <x> <y> <z> <support x 0|1> <support y 0|1> <support z 0|1>
//! M <joint a> <joint b> <material> <shape> <key>=<value> ...
//! L <joint> <load x> <load y> <load z>
//! ```
//!
//! Joints are numbered in the order their `J` records appear, and `M` and `L` records may
//! only reference joints declared above them. A later `L` record for the same joint
//! replaces the earlier one.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::debug;
use petgraph::graph::NodeIndex;

use crate::errors::{TrussEditError, TrussFileError};
use crate::geometry::{point, Force};
use crate::material::MaterialTable;
use crate::section::{CrossSection, Shape};
use crate::truss::Truss;

/// Parse a truss using the standard material table.
///
/// # Errors
///
/// Returns [`TrussFileError`] naming the first offending line.
///
/// # Examples
/// ```
/// use trussfos::parse_truss;
///
/// let truss = parse_truss(
///     "J 0 0 0 1 1 1\n\
///      J 1 0 0 0 1 1\n\
///      M 0 1 A36 bar r=0.01\n\
///      L 1 -1000 0 0\n",
/// )
/// .expect("valid truss");
/// assert_eq!(truss.joint_count(), 2);
/// assert_eq!(truss.member_count(), 1);
/// ```
pub fn parse_truss(text: &str) -> Result<Truss, TrussFileError> {
    parse_truss_with(text, MaterialTable::standard())
}

/// Parse a truss resolving material names against `materials`.
///
/// # Errors
///
/// Returns [`TrussFileError`] naming the first offending line.
pub fn parse_truss_with(text: &str, materials: MaterialTable) -> Result<Truss, TrussFileError> {
    let mut truss = Truss::with_materials(materials);
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.trim();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }
        let fields: Vec<&str> = content.split_whitespace().collect();
        match fields[0] {
            "J" => parse_joint(&mut truss, line, &fields[1..])?,
            "M" => parse_member(&mut truss, line, &fields[1..])?,
            "L" => parse_load(&mut truss, line, &fields[1..])?,
            other => {
                return Err(TrussFileError::Format {
                    line,
                    reason: format!("unrecognised record type `{other}`"),
                })
            }
        }
    }
    debug!(
        "parsed truss with {} joints and {} members",
        truss.joint_count(),
        truss.member_count()
    );
    Ok(truss)
}

fn parse_joint(truss: &mut Truss, line: usize, fields: &[&str]) -> Result<(), TrussFileError> {
    expect_fields(line, "joint", fields, 6)?;
    let position = point(
        parse_number(line, fields[0])?,
        parse_number(line, fields[1])?,
        parse_number(line, fields[2])?,
    );
    let support = [
        parse_flag(line, fields[3])?,
        parse_flag(line, fields[4])?,
        parse_flag(line, fields[5])?,
    ];
    let edit = |source| TrussFileError::Edit { line, source };
    let joint = truss.add_joint(position).map_err(edit)?;
    truss.set_support(joint, support).map_err(edit)
}

fn parse_member(truss: &mut Truss, line: usize, fields: &[&str]) -> Result<(), TrussFileError> {
    if fields.len() < 4 {
        return Err(TrussFileError::Format {
            line,
            reason: format!(
                "member record needs two joints, a material and a shape (found {} fields)",
                fields.len()
            ),
        });
    }
    let start = parse_joint_reference(truss, line, fields[0])?;
    let end = parse_joint_reference(truss, line, fields[1])?;
    let material = fields[2];
    let shape: Shape = fields[3]
        .parse()
        .map_err(|source| TrussFileError::Configuration { line, source })?;

    let mut parameters = BTreeMap::new();
    for pair in &fields[4..] {
        let (key, value) = pair.split_once('=').ok_or_else(|| TrussFileError::Format {
            line,
            reason: format!("expected `key=value`, found `{pair}`"),
        })?;
        if parameters.insert(key, parse_number(line, value)?).is_some() {
            return Err(TrussFileError::Format {
                line,
                reason: format!("parameter `{key}` is given more than once"),
            });
        }
    }

    truss
        .add_member(start, end, material, CrossSection::new(shape, parameters))
        .map(|_| ())
        .map_err(|error| match error {
            TrussEditError::InvalidMember { source, .. } => {
                TrussFileError::Configuration { line, source }
            }
            source => TrussFileError::Edit { line, source },
        })
}

fn parse_load(truss: &mut Truss, line: usize, fields: &[&str]) -> Result<(), TrussFileError> {
    expect_fields(line, "load", fields, 4)?;
    let joint = parse_joint_reference(truss, line, fields[0])?;
    let load = Force::new(
        parse_number(line, fields[1])?,
        parse_number(line, fields[2])?,
        parse_number(line, fields[3])?,
    );
    truss
        .set_load(joint, load)
        .map_err(|source| TrussFileError::Edit { line, source })
}

fn expect_fields(
    line: usize,
    record: &str,
    fields: &[&str],
    expected: usize,
) -> Result<(), TrussFileError> {
    if fields.len() == expected {
        Ok(())
    } else {
        Err(TrussFileError::Format {
            line,
            reason: format!(
                "{record} record takes {expected} fields (found {})",
                fields.len()
            ),
        })
    }
}

fn parse_number(line: usize, field: &str) -> Result<f64, TrussFileError> {
    field
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| TrussFileError::Format {
            line,
            reason: format!("expected a finite number, found `{field}`"),
        })
}

fn parse_flag(line: usize, field: &str) -> Result<bool, TrussFileError> {
    match field {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(TrussFileError::Format {
            line,
            reason: format!("support flags are 0 or 1, found `{field}`"),
        }),
    }
}

fn parse_joint_reference(
    truss: &Truss,
    line: usize,
    field: &str,
) -> Result<NodeIndex, TrussFileError> {
    let index: usize = field.parse().map_err(|_| TrussFileError::Format {
        line,
        reason: format!("expected a joint index, found `{field}`"),
    })?;
    if index < truss.joint_count() {
        Ok(NodeIndex::new(index))
    } else {
        Err(TrussFileError::UnknownJoint { line, index })
    }
}

/// Serialise a truss: joints first, then members, then every non-zero load.
///
/// Numbers are written in their shortest exact decimal form, so parsing the output
/// reproduces the same model.
#[must_use]
pub fn write_truss(truss: &Truss) -> String {
    let mut out = String::new();
    for (_, joint) in truss.joints() {
        let position = joint.position();
        let [x, y, z] = joint.support().flags().map(u8::from);
        writeln!(
            out,
            "J\t{}\t{}\t{}\t{x}\t{y}\t{z}",
            position.x, position.y, position.z
        )
        .expect("writing to string cannot fail");
    }
    for (edge, member) in truss.members() {
        let Some((start, end)) = truss.member_endpoints(edge) else {
            continue;
        };
        let section = member.section();
        write!(
            out,
            "M\t{}\t{}\t{}\t{}",
            start.index(),
            end.index(),
            member.material_name(),
            section.shape
        )
        .expect("writing to string cannot fail");
        for (key, value) in &section.parameters {
            write!(out, "\t{key}={value}").expect("writing to string cannot fail");
        }
        out.push('\n');
    }
    for (node, joint) in truss.joints() {
        let load = joint.load();
        if !load.is_zero() {
            writeln!(
                out,
                "L\t{}\t{}\t{}\t{}",
                node.index(),
                load.x,
                load.y,
                load.z
            )
            .expect("writing to string cannot fail");
        }
    }
    out
}

/// Read and parse a truss file using the standard material table.
///
/// # Errors
///
/// Returns [`TrussFileError::Io`] when the file cannot be read and the parse errors of
/// [`parse_truss`] otherwise.
pub fn read_truss_file(path: impl AsRef<Path>) -> Result<Truss, TrussFileError> {
    let text = fs::read_to_string(path)?;
    parse_truss(&text)
}

/// Write a truss to a file, replacing any existing content.
///
/// # Errors
///
/// Returns [`TrussFileError::Io`] when the file cannot be written.
pub fn write_truss_file(path: impl AsRef<Path>, truss: &Truss) -> Result<(), TrussFileError> {
    fs::write(path, write_truss(truss))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ConfigurationError;
    use crate::geometry::Axis;

    const WARREN: &str = "\
# three panel warren truss
J 0 0 0 1 1 1
J 1 0 0 0 1 1
J 2 0 0 0 0 1

J 0.5 1 0 0 0 1
M 0 1 A36 pipe r=0.02 t=0.002
M 1 2 A36 pipe r=0.02 t=0.002
M 0 3 A992 box w=0.05 h=0.05 t=0.005
M 3 1 A992 box h=0.05 t=0.005 w=0.05
L 3 0 -5000 0
";

    #[test]
    fn parses_records_and_skips_comments() {
        let truss = parse_truss(WARREN).expect("valid file");
        assert_eq!(truss.joint_count(), 4);
        assert_eq!(truss.member_count(), 4);

        let support = truss.joint(NodeIndex::new(1)).expect("joint").support();
        assert!(!support.is_restrained(Axis::X));
        assert!(support.is_restrained(Axis::Y));

        let load = truss.joint(NodeIndex::new(3)).expect("joint").load();
        assert_eq!(load, Force::new(0.0, -5000.0, 0.0));

        let (edge, member) = truss.members().nth(3).expect("fourth member");
        assert_eq!(member.material_name(), "A992");
        assert_eq!(member.section().shape, Shape::Box);
        assert_eq!(
            truss.member_endpoints(edge),
            Some((NodeIndex::new(3), NodeIndex::new(1)))
        );
    }

    #[test]
    fn later_loads_replace_earlier_ones() {
        let truss = parse_truss("J 0 0 0 0 0 0\nL 0 1 2 3\nL 0 0 0 -4\n").expect("valid");
        assert_eq!(
            truss.joint(NodeIndex::new(0)).expect("joint").load(),
            Force::new(0.0, 0.0, -4.0)
        );
    }

    #[test]
    fn unknown_record_is_a_format_error() {
        let error = parse_truss("J 0 0 0 1 1 1\n\nX 1 2 3\n").expect_err("bad record");
        assert!(matches!(error, TrussFileError::Format { line: 3, .. }));
        assert_eq!(error.line(), Some(3));
    }

    #[test]
    fn malformed_fields_are_format_errors() {
        for text in [
            "J 0 0 0 1 1\n",
            "J 0 0 zero 1 1 1\n",
            "J 0 0 0 1 2 1\n",
            "J 0 0 inf 1 1 1\n",
            "J 0 0 0 1 1 1\nJ 1 0 0 0 1 1\nM 0 1 A36\n",
            "J 0 0 0 1 1 1\nJ 1 0 0 0 1 1\nM 0 1 A36 bar 0.01\n",
            "J 0 0 0 1 1 1\nJ 1 0 0 0 1 1\nM 0 1 A36 bar r=0.01 r=0.02\n",
            "J 0 0 0 1 1 1\nL 0 1 2\n",
            "J 0 0 0 1 1 1\nL -1 1 2 3\n",
        ] {
            let error = parse_truss(text).expect_err("malformed line");
            assert!(
                matches!(error, TrussFileError::Format { .. }),
                "unexpected error {error:?} for {text:?}"
            );
        }
    }

    #[test]
    fn records_must_reference_declared_joints() {
        let error = parse_truss("J 0 0 0 1 1 1\nM 0 1 A36 bar r=0.01\nJ 1 0 0 0 1 1\n")
            .expect_err("forward reference");
        assert!(matches!(
            error,
            TrussFileError::UnknownJoint { line: 2, index: 1 }
        ));

        let error = parse_truss("J 0 0 0 1 1 1\nL 4 0 0 1\n").expect_err("missing joint");
        assert!(matches!(
            error,
            TrussFileError::UnknownJoint { line: 2, index: 4 }
        ));
    }

    #[test]
    fn configuration_problems_carry_the_line() {
        let error = parse_truss("J 0 0 0 1 1 1\nJ 1 0 0 0 1 1\nM 0 1 balsa bar r=0.01\n")
            .expect_err("unknown material");
        match error {
            TrussFileError::Configuration { line, source } => {
                assert_eq!(line, 3);
                assert_eq!(source, ConfigurationError::UnknownMaterial("balsa".to_owned()));
            }
            other => panic!("unexpected error {other:?}"),
        }

        let error = parse_truss("J 0 0 0 1 1 1\nJ 1 0 0 0 1 1\nM 0 1 A36 tee w=1\n")
            .expect_err("unknown shape");
        assert!(matches!(
            error,
            TrussFileError::Configuration {
                line: 3,
                source: ConfigurationError::UnknownShape(_)
            }
        ));

        let error = parse_truss("J 0 0 0 1 1 1\nJ 1 0 0 0 1 1\nM 0 1 A36 pipe r=0.02\n")
            .expect_err("missing thickness");
        assert!(matches!(
            error,
            TrussFileError::Configuration {
                line: 3,
                source: ConfigurationError::MissingParameter { key: "t", .. }
            }
        ));
    }

    #[test]
    fn self_connected_member_is_an_edit_error() {
        let error = parse_truss("J 0 0 0 1 1 1\nM 0 0 A36 bar r=0.01\n").expect_err("loop");
        assert!(matches!(
            error,
            TrussFileError::Edit {
                line: 2,
                source: TrussEditError::SelfConnectedMember(_)
            }
        ));
    }

    #[test]
    fn writer_emits_joints_members_then_loads() {
        let truss = parse_truss(
            "J 0 0 0 1 1 1\nJ 1.5 0 0 0 1 1\nM 0 1 A36 pipe t=0.002 r=0.02\nL 1 -1000 0 0\n",
        )
        .expect("valid");
        assert_eq!(
            write_truss(&truss),
            "J\t0\t0\t0\t1\t1\t1\n\
             J\t1.5\t0\t0\t0\t1\t1\n\
             M\t0\t1\tA36\tpipe\tr=0.02\tt=0.002\n\
             L\t1\t-1000\t0\t0\n"
        );
    }

    #[test]
    fn written_text_parses_to_the_same_text() {
        let first = write_truss(&parse_truss(WARREN).expect("valid"));
        let second = write_truss(&parse_truss(&first).expect("written text parses"));
        assert_eq!(first, second);
    }
}
