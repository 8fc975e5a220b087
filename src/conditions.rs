use std::path::PathBuf;

use clap::Parser;
use nalgebra::Vector3;
use trussfos::{ConfigurationError, Goal, Goals, Truss, TrussEditError};

/// Command line options of the `trussfos` binary.
///
/// Goal bounds follow the persisted convention where `-1` leaves a goal unset.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "trussfos",
    version,
    about = "Analyse a pin-jointed truss and report its factors of safety"
)]
pub struct Options {
    /// Truss file made of `J`, `M` and `L` records.
    pub path: PathBuf,
    /// Lower bound on the governing factor of safety.
    #[arg(long, value_name = "FOS", allow_negative_numbers = true)]
    pub min_fos_total: Option<f64>,
    /// Lower bound on the yielding factor of safety.
    #[arg(long, value_name = "FOS", allow_negative_numbers = true)]
    pub min_fos_yielding: Option<f64>,
    /// Lower bound on the buckling factor of safety.
    #[arg(long, value_name = "FOS", allow_negative_numbers = true)]
    pub min_fos_buckling: Option<f64>,
    /// Upper bound on the truss mass in kilograms.
    #[arg(long, value_name = "KG", allow_negative_numbers = true)]
    pub max_mass: Option<f64>,
    /// Upper bound on the largest joint deflection in metres.
    #[arg(long, value_name = "M", allow_negative_numbers = true)]
    pub max_deflection: Option<f64>,
    /// Gravitational acceleration as `x,y,z` in m/s².
    #[arg(long, value_name = "X,Y,Z", value_parser = parse_vector, allow_hyphen_values = true)]
    pub gravity: Option<Vector3<f64>>,
    /// Print the results as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

impl Options {
    /// Goals requested on the command line.
    pub fn goals(&self) -> Result<Goals, ConfigurationError> {
        let mut goals = Goals::default();
        for (goal, value) in [
            (Goal::MinFosTotal, self.min_fos_total),
            (Goal::MinFosYielding, self.min_fos_yielding),
            (Goal::MinFosBuckling, self.min_fos_buckling),
            (Goal::MaxMass, self.max_mass),
            (Goal::MaxDeflection, self.max_deflection),
        ] {
            if let Some(value) = value {
                goals.set(goal, value)?;
            }
        }
        Ok(goals)
    }

    /// Apply goals and gravity to a loaded truss.
    pub fn apply(&self, truss: &mut Truss) -> Result<(), TrussEditError> {
        truss.set_goals(self.goals()?);
        if let Some(gravity) = self.gravity {
            truss.set_gravity(gravity)?;
        }
        Ok(())
    }
}

fn parse_vector(value: &str) -> Result<Vector3<f64>, String> {
    let components = value
        .split(',')
        .map(|component| {
            component
                .trim()
                .parse::<f64>()
                .map_err(|error| format!("`{component}`: {error}"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    match components.as_slice() {
        [x, y, z] => Ok(Vector3::new(*x, *y, *z)),
        _ => Err(format!(
            "expected three comma separated components, found {}",
            components.len()
        )),
    }
}
