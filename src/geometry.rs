//! Three-component value types for positions, loads and deflections.

use std::fmt;
use std::ops::Add;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One of the three global axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Global X axis.
    X,
    /// Global Y axis.
    Y,
    /// Global Z axis.
    Z,
}

impl Axis {
    /// All axes in degree-of-freedom order.
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Offset of the axis within a joint's block of degrees of freedom.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Declare a plain `x`, `y`, `z` record with `Vector3` conversions.
macro_rules! cartesian {
    ($(#[$meta:meta])* $name:ident, $unit:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
        pub struct $name {
            #[doc = concat!("X component in ", $unit, ".")]
            pub x: f64,
            #[doc = concat!("Y component in ", $unit, ".")]
            pub y: f64,
            #[doc = concat!("Z component in ", $unit, ".")]
            pub z: f64,
        }

        impl $name {
            #[doc = concat!("Create a [`", stringify!($name), "`] from its components.")]
            #[must_use]
            pub const fn new(x: f64, y: f64, z: f64) -> Self {
                Self { x, y, z }
            }

            /// Components as an algebraic vector.
            #[must_use]
            pub fn to_vector(self) -> Vector3<f64> {
                Vector3::new(self.x, self.y, self.z)
            }

            /// Component along `axis`.
            #[must_use]
            pub const fn component(self, axis: Axis) -> f64 {
                match axis {
                    Axis::X => self.x,
                    Axis::Y => self.y,
                    Axis::Z => self.z,
                }
            }
        }

        impl From<Vector3<f64>> for $name {
            fn from(value: Vector3<f64>) -> Self {
                Self::new(value.x, value.y, value.z)
            }
        }

        impl From<$name> for Vector3<f64> {
            fn from(value: $name) -> Self {
                value.to_vector()
            }
        }
    };
}

cartesian!(
    /// Joint position.
    Point,
    "metres"
);

cartesian!(
    /// Point load or support reaction.
    Force,
    "newtons"
);

cartesian!(
    /// Joint deflection from the unloaded position.
    Displacement,
    "metres"
);

impl Point {
    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other.to_vector() - self.to_vector()).norm()
    }
}

impl Force {
    /// Whether every component is exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.to_vector() == Vector3::zeros()
    }
}

impl Add for Force {
    type Output = Force;

    fn add(self, rhs: Force) -> Force {
        Force::from(self.to_vector() + rhs.to_vector())
    }
}

impl Displacement {
    /// Length of the deflection vector.
    #[must_use]
    pub fn magnitude(self) -> f64 {
        self.to_vector().norm()
    }
}

/// Shorthand for [`Point::new`].
///
/// # Examples
/// ```
/// use trussfos::point;
///
/// let apex = point(1.0, 3.0, 0.0);
/// assert_eq!(apex.y, 3.0);
/// ```
#[must_use]
pub const fn point(x: f64, y: f64, z: f64) -> Point {
    Point::new(x, y, z)
}

/// Shorthand for [`Force::new`].
///
/// # Examples
/// ```
/// use trussfos::{force, Axis};
///
/// let load = force(0.0, -20_000.0, 0.0);
/// assert_eq!(load.component(Axis::Y), -20_000.0);
/// ```
#[must_use]
pub const fn force(x: f64, y: f64, z: f64) -> Force {
    Force::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions_preserve_components() {
        let position = point(1.0, 2.0, 3.0);
        let vector: Vector3<f64> = position.into();
        assert_eq!(vector, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(Point::from(vector), position);
        assert_eq!(position.component(Axis::Z), 3.0);
    }

    #[test]
    fn distance_is_euclidean() {
        let a = point(0.0, 0.0, 0.0);
        let b = point(3.0, 4.0, 0.0);
        assert!((a.distance_to(b) - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn forces_add_componentwise() {
        let total = force(1.0, -2.0, 0.5) + force(0.5, 2.0, 0.0);
        assert_eq!(total, Force::new(1.5, 0.0, 0.5));
        assert!(Force::default().is_zero());
        assert!(!total.is_zero());
    }

    #[test]
    fn displacement_magnitude() {
        let delta = Displacement::from(Vector3::new(0.0, -3.0, 4.0));
        assert!((delta.magnitude() - 5.0).abs() < 1.0e-12);
        assert_eq!(delta.component(Axis::Z), 4.0);
    }

    #[test]
    fn axes_follow_degree_of_freedom_order() {
        let indices: Vec<usize> = Axis::ALL.iter().map(|axis| axis.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(Axis::Y.to_string(), "y");
    }
}
