//! Joints, their support conditions and their solved response.

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Displacement, Force, Point};

/// Translational restraint of a joint along each global axis.
///
/// # Examples
/// ```
/// use trussfos::{Axis, Support};
///
/// let roller = Support::roller(Axis::Y).planar();
/// assert_eq!(roller.flags(), [false, true, true]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Support {
    /// `true` where translation along the axis is restrained.
    restrained: [bool; 3],
}

impl Support {
    /// Joint free to translate along every axis.
    #[must_use]
    pub const fn free() -> Self {
        Self {
            restrained: [false; 3],
        }
    }

    /// Joint restrained along every axis.
    #[must_use]
    pub const fn pinned() -> Self {
        Self {
            restrained: [true; 3],
        }
    }

    /// Joint restrained along `axis` only.
    #[must_use]
    pub const fn roller(axis: Axis) -> Self {
        let mut restrained = [false; 3];
        restrained[axis.index()] = true;
        Self { restrained }
    }

    /// Apply the planar adjustment, which restrains the out-of-plane Z axis.
    #[must_use]
    pub const fn planar(self) -> Self {
        let mut restrained = self.restrained;
        restrained[2] = true;
        Self { restrained }
    }

    /// Apply [`Support::planar`] when `dimension` is [`Dimension::Planar`].
    #[must_use]
    pub const fn in_dimension(self, dimension: Dimension) -> Self {
        match dimension {
            Dimension::Planar => self.planar(),
            Dimension::Spatial => self,
        }
    }

    /// Whether translation along `axis` is restrained.
    #[must_use]
    pub const fn is_restrained(self, axis: Axis) -> bool {
        self.restrained[axis.index()]
    }

    /// Restraint flags in X, Y, Z order.
    #[must_use]
    pub const fn flags(self) -> [bool; 3] {
        self.restrained
    }
}

impl From<[bool; 3]> for Support {
    fn from(restrained: [bool; 3]) -> Self {
        Self { restrained }
    }
}

/// Whether a joint belongs to a planar (X-Y) or a spatial truss.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    /// Two dimensional truss in the X-Y plane.
    Planar,
    /// Three dimensional truss.
    #[default]
    Spatial,
}

/// Reaction and deflection of a joint after analysis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JointResponse {
    /// Reaction force; zero along free axes.
    pub reaction: Force,
    /// Deflection; zero along restrained axes.
    pub deflection: Displacement,
}

/// A pin joint of the truss.
#[derive(Clone, Debug, PartialEq)]
pub struct Joint {
    /// Position of the joint in metres.
    position: Point,
    /// Translational restraint.
    support: Support,
    /// External load applied to the joint in newtons, excluding self-weight.
    load: Force,
    /// Solved response, present after a successful analysis.
    response: Option<JointResponse>,
}

impl Joint {
    /// Create a free, unloaded joint.
    pub(crate) fn new(position: Point) -> Self {
        Self {
            position,
            support: Support::free(),
            load: Force::default(),
            response: None,
        }
    }

    /// Position of the joint.
    #[must_use]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Support condition of the joint.
    #[must_use]
    pub fn support(&self) -> Support {
        self.support
    }

    /// User supplied load, excluding self-weight.
    #[must_use]
    pub fn load(&self) -> Force {
        self.load
    }

    /// Solved response, if the truss has been analysed since the last edit.
    #[must_use]
    pub fn response(&self) -> Option<&JointResponse> {
        self.response.as_ref()
    }

    /// Reaction along `axis`; `None` when the axis is free or the truss is unsolved.
    #[must_use]
    pub fn reaction(&self, axis: Axis) -> Option<f64> {
        let response = self.response.as_ref()?;
        self.support
            .is_restrained(axis)
            .then(|| response.reaction.component(axis))
    }

    /// Deflection along `axis`; `None` when the axis is restrained or the truss is unsolved.
    #[must_use]
    pub fn deflection(&self, axis: Axis) -> Option<f64> {
        let response = self.response.as_ref()?;
        (!self.support.is_restrained(axis)).then(|| response.deflection.component(axis))
    }

    pub(crate) fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    pub(crate) fn set_support(&mut self, support: Support) {
        self.support = support;
    }

    pub(crate) fn set_load(&mut self, load: Force) {
        self.load = load;
    }

    /// Store the response from a solve, masking values along axes where they do not apply.
    pub(crate) fn set_response(&mut self, reaction: Force, deflection: Displacement) {
        let mask = |value: f64, keep: bool| if keep { value } else { 0.0 };
        let [x, y, z] = self.support.flags();
        self.response = Some(JointResponse {
            reaction: Force::new(mask(reaction.x, x), mask(reaction.y, y), mask(reaction.z, z)),
            deflection: Displacement::new(
                mask(deflection.x, !x),
                mask(deflection.y, !y),
                mask(deflection.z, !z),
            ),
        });
    }

    pub(crate) fn clear_response(&mut self) {
        self.response = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point;

    #[test]
    fn planar_adjustment_restrains_z() {
        assert_eq!(Support::free().planar().flags(), [false, false, true]);
        assert_eq!(
            Support::roller(Axis::X).in_dimension(Dimension::Planar).flags(),
            [true, false, true]
        );
        assert_eq!(
            Support::roller(Axis::X).in_dimension(Dimension::Spatial).flags(),
            [true, false, false]
        );
    }

    #[test]
    fn results_are_reported_only_on_meaningful_axes() {
        let mut joint = Joint::new(point(0.0, 0.0, 0.0));
        joint.set_support(Support::roller(Axis::Y));
        assert_eq!(joint.reaction(Axis::Y), None);

        joint.set_response(
            Force::new(1.0e-12, 10.0, -1.0e-12),
            Displacement::new(0.5, 0.0, 0.25),
        );
        assert_eq!(joint.reaction(Axis::Y), Some(10.0));
        assert_eq!(joint.reaction(Axis::X), None);
        assert_eq!(joint.deflection(Axis::X), Some(0.5));
        assert_eq!(joint.deflection(Axis::Y), None);

        let response = joint.response().expect("response stored");
        assert_eq!(response.reaction, Force::new(0.0, 10.0, 0.0));

        joint.clear_response();
        assert!(joint.response().is_none());
    }
}
