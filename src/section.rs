//! Cross-section shapes and the resolver that turns named dimensions into
//! area and minimum second moment of area.

use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;

/// Kind of cross-section carried by a member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// Circular tube with outer radius `r` and wall thickness `t`.
    Pipe,
    /// Solid round bar with radius `r`.
    Bar,
    /// Solid rectangle with width `w` and height `h`.
    Square,
    /// Rectangular tube with width `w`, height `h` and wall thickness `t`.
    Box,
    /// Wide flange with flange width `w`, depth `h` and uniform plate thickness `t`.
    IBeam,
    /// Idealised section with directly supplied `area` and `I_min`.
    Arbitrary,
}

impl Shape {
    /// Every supported shape.
    pub const ALL: [Shape; 6] = [
        Shape::Pipe,
        Shape::Bar,
        Shape::Square,
        Shape::Box,
        Shape::IBeam,
        Shape::Arbitrary,
    ];

    /// Name used in the persisted truss format.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Shape::Pipe => "pipe",
            Shape::Bar => "bar",
            Shape::Square => "square",
            Shape::Box => "box",
            Shape::IBeam => "i_beam",
            Shape::Arbitrary => "arbitrary",
        }
    }

    /// Dimension keys the shape requires, and the only ones it accepts.
    #[must_use]
    pub const fn parameter_keys(self) -> &'static [&'static str] {
        match self {
            Shape::Pipe => &["r", "t"],
            Shape::Bar => &["r"],
            Shape::Square => &["w", "h"],
            Shape::Box | Shape::IBeam => &["w", "h", "t"],
            Shape::Arbitrary => &["area", "I_min"],
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Shape {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Shape::ALL
            .into_iter()
            .find(|shape| shape.name() == s)
            .ok_or_else(|| ConfigurationError::UnknownShape(s.to_owned()))
    }
}

/// Section properties derived from a [`CrossSection`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Cross-sectional area in square metres.
    pub area: f64,
    /// Smaller of the two principal second moments of area in metres⁴.
    pub min_inertia: f64,
}

/// A shape together with its named dimensions.
///
/// # Examples
/// ```
/// use trussfos::CrossSection;
///
/// let section = CrossSection::bar(0.01);
/// let properties = section.resolve().expect("valid bar");
/// assert!((properties.area - std::f64::consts::PI * 1.0e-4).abs() < 1.0e-12);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    /// Kind of section.
    pub shape: Shape,
    /// Named dimensions in metres (or m² / m⁴ for arbitrary sections).
    pub parameters: BTreeMap<String, f64>,
}

impl CrossSection {
    /// Create a section from a shape and any collection of named dimensions.
    pub fn new<K, I>(shape: Shape, parameters: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self {
            shape,
            parameters: parameters
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }

    /// Circular tube.
    #[must_use]
    pub fn pipe(outer_radius: f64, thickness: f64) -> Self {
        Self::new(Shape::Pipe, [("r", outer_radius), ("t", thickness)])
    }

    /// Solid round bar.
    #[must_use]
    pub fn bar(radius: f64) -> Self {
        Self::new(Shape::Bar, [("r", radius)])
    }

    /// Solid rectangle.
    #[must_use]
    pub fn square(width: f64, height: f64) -> Self {
        Self::new(Shape::Square, [("w", width), ("h", height)])
    }

    /// Rectangular tube.
    #[must_use]
    pub fn rectangular_tube(width: f64, height: f64, thickness: f64) -> Self {
        Self::new(Shape::Box, [("w", width), ("h", height), ("t", thickness)])
    }

    /// Wide flange with equal flange and web thickness.
    #[must_use]
    pub fn i_beam(width: f64, height: f64, thickness: f64) -> Self {
        Self::new(Shape::IBeam, [("w", width), ("h", height), ("t", thickness)])
    }

    /// Idealised section with directly supplied properties.
    #[must_use]
    pub fn arbitrary(area: f64, min_inertia: f64) -> Self {
        Self::new(Shape::Arbitrary, [("area", area), ("I_min", min_inertia)])
    }

    /// Compute area and minimum inertia for the section.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigurationError`] when a dimension is missing, unexpected,
    /// non-positive or when the dimensions cannot describe the shape (for example a
    /// wall thicker than the outer radius).
    pub fn resolve(&self) -> Result<SectionProperties, ConfigurationError> {
        resolve(self.shape, &self.parameters)
    }
}

/// Compute area and minimum inertia for `shape` from its named dimensions.
///
/// # Errors
///
/// See [`CrossSection::resolve`].
pub fn resolve(
    shape: Shape,
    parameters: &BTreeMap<String, f64>,
) -> Result<SectionProperties, ConfigurationError> {
    let accepted = shape.parameter_keys();
    if let Some(key) = parameters.keys().find(|key| !accepted.contains(&key.as_str())) {
        return Err(ConfigurationError::UnexpectedParameter {
            shape,
            key: key.clone(),
        });
    }
    let dimension = |key: &'static str| -> Result<f64, ConfigurationError> {
        let value = *parameters
            .get(key)
            .ok_or(ConfigurationError::MissingParameter { shape, key })?;
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(ConfigurationError::InvalidParameter {
                shape,
                key: key.to_owned(),
                value,
            })
        }
    };
    let inconsistent = |reason: String| ConfigurationError::InconsistentParameters { shape, reason };

    let (area, min_inertia) = match shape {
        Shape::Pipe => {
            let r = dimension("r")?;
            let t = dimension("t")?;
            if t > r {
                return Err(inconsistent(format!(
                    "wall thickness {t} exceeds outer radius {r}"
                )));
            }
            let inner = r - t;
            (
                PI * (r.powi(2) - inner.powi(2)),
                PI / 4.0 * (r.powi(4) - inner.powi(4)),
            )
        }
        Shape::Bar => {
            let r = dimension("r")?;
            (PI * r.powi(2), PI / 4.0 * r.powi(4))
        }
        Shape::Square => {
            let w = dimension("w")?;
            let h = dimension("h")?;
            let strong = w * h.powi(3) / 12.0;
            let weak = h * w.powi(3) / 12.0;
            (w * h, strong.min(weak))
        }
        Shape::Box => {
            let w = dimension("w")?;
            let h = dimension("h")?;
            let t = dimension("t")?;
            if 2.0 * t > w.min(h) {
                return Err(inconsistent(format!(
                    "walls of thickness {t} do not fit in a {w} x {h} box"
                )));
            }
            let (wi, hi) = (w - 2.0 * t, h - 2.0 * t);
            let ix = (w * h.powi(3) - wi * hi.powi(3)) / 12.0;
            let iy = (h * w.powi(3) - hi * wi.powi(3)) / 12.0;
            (w * h - wi * hi, ix.min(iy))
        }
        Shape::IBeam => {
            let w = dimension("w")?;
            let h = dimension("h")?;
            let t = dimension("t")?;
            if 2.0 * t > h {
                return Err(inconsistent(format!(
                    "flanges of thickness {t} do not fit in depth {h}"
                )));
            }
            if t > w {
                return Err(inconsistent(format!(
                    "web thickness {t} exceeds flange width {w}"
                )));
            }
            let web = h - 2.0 * t;
            let strong = (w * h.powi(3) - (w - t) * web.powi(3)) / 12.0;
            let weak = 2.0 * t * w.powi(3) / 12.0 + web * t.powi(3) / 12.0;
            (2.0 * w * t + web * t, strong.min(weak))
        }
        Shape::Arbitrary => (dimension("area")?, dimension("I_min")?),
    };
    Ok(SectionProperties { area, min_inertia })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn shape_names_parse() {
        for shape in Shape::ALL {
            assert_eq!(shape.name().parse::<Shape>(), Ok(shape));
        }
        assert_eq!(
            "hexagon".parse::<Shape>(),
            Err(ConfigurationError::UnknownShape("hexagon".to_owned()))
        );
    }

    #[test]
    fn pipe_matches_closed_form() {
        let properties = CrossSection::pipe(0.05, 0.01).resolve().expect("valid pipe");
        let inner: f64 = 0.05 - 0.01;
        assert_relative_eq!(
            properties.area,
            PI * (0.05_f64.powi(2) - inner.powi(2)),
            max_relative = 1.0e-12
        );
        assert_relative_eq!(
            properties.min_inertia,
            PI / 4.0 * (0.05_f64.powi(4) - inner.powi(4)),
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn solid_rectangle_buckles_about_weak_axis() {
        let properties = CrossSection::square(0.02, 0.1).resolve().expect("valid");
        assert_relative_eq!(properties.area, 0.002, max_relative = 1.0e-12);
        assert_relative_eq!(
            properties.min_inertia,
            0.1 * 0.02_f64.powi(3) / 12.0,
            max_relative = 1.0e-12
        );
    }

    #[test]
    fn rectangular_tube_uses_smaller_inertia() {
        let properties = CrossSection::rectangular_tube(0.1, 0.2, 0.01)
            .resolve()
            .expect("valid box");
        assert_relative_eq!(
            properties.area,
            0.1 * 0.2 - 0.08 * 0.18,
            max_relative = 1.0e-12
        );
        let weak = (0.2 * 0.1_f64.powi(3) - 0.18 * 0.08_f64.powi(3)) / 12.0;
        assert_relative_eq!(properties.min_inertia, weak, max_relative = 1.0e-12);
    }

    #[test]
    fn i_beam_weak_axis_governs() {
        let properties = CrossSection::i_beam(0.1, 0.2, 0.01).resolve().expect("valid");
        assert_relative_eq!(
            properties.area,
            2.0 * 0.1 * 0.01 + 0.18 * 0.01,
            max_relative = 1.0e-12
        );
        let weak = 2.0 * 0.01 * 0.1_f64.powi(3) / 12.0 + 0.18 * 0.01_f64.powi(3) / 12.0;
        assert_relative_eq!(properties.min_inertia, weak, max_relative = 1.0e-12);
    }

    #[test]
    fn arbitrary_passes_values_through() {
        let properties = CrossSection::arbitrary(1.0, 2.0).resolve().expect("valid");
        assert_eq!(
            properties,
            SectionProperties {
                area: 1.0,
                min_inertia: 2.0
            }
        );
    }

    #[test]
    fn wall_thicker_than_radius_is_inconsistent() {
        let error = CrossSection::pipe(0.01, 0.02)
            .resolve()
            .expect_err("thick wall rejected");
        assert!(matches!(
            error,
            ConfigurationError::InconsistentParameters {
                shape: Shape::Pipe,
                ..
            }
        ));
    }

    #[test]
    fn missing_and_foreign_keys_are_rejected() {
        let missing = CrossSection::new(Shape::Pipe, [("r", 0.1)])
            .resolve()
            .expect_err("missing thickness");
        assert_eq!(
            missing,
            ConfigurationError::MissingParameter {
                shape: Shape::Pipe,
                key: "t"
            }
        );

        let foreign = CrossSection::new(Shape::Bar, [("r", 0.1), ("w", 0.2)])
            .resolve()
            .expect_err("width is not a bar dimension");
        assert!(matches!(
            foreign,
            ConfigurationError::UnexpectedParameter { shape: Shape::Bar, ref key } if key == "w"
        ));
    }

    #[test]
    fn non_positive_dimensions_are_rejected() {
        let error = CrossSection::bar(-1.0).resolve().expect_err("negative radius");
        assert!(matches!(error, ConfigurationError::InvalidParameter { .. }));
    }
}
