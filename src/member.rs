//! Truss members: material, cross-section, derived geometry and factors of safety.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;
use crate::material::Material;
use crate::section::{CrossSection, SectionProperties};

/// Buckling factor of safety reported by members that are not in compression.
///
/// Non-positive so it can never be mistaken for an Euler ratio.
pub const BUCKLING_NOT_APPLICABLE: f64 = -1.0;

/// Axial force, stress and factors of safety of a member after analysis.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MemberResponse {
    /// Axial force in newtons; positive in tension.
    pub axial_force: f64,
    /// Axial stress in pascals; positive in tension.
    pub stress: f64,
    /// Yield strength over the magnitude of the stress.
    pub fos_yielding: f64,
    /// Euler critical load over the magnitude of the compressive force, or
    /// [`BUCKLING_NOT_APPLICABLE`].
    pub fos_buckling: f64,
}

impl MemberResponse {
    /// Whether the buckling factor of safety is a real ratio.
    #[must_use]
    pub fn buckling_applies(&self) -> bool {
        self.fos_buckling > 0.0
    }

    /// Governing factor of safety of the member.
    #[must_use]
    pub fn fos_limit(&self) -> f64 {
        if self.buckling_applies() {
            self.fos_yielding.min(self.fos_buckling)
        } else {
            self.fos_yielding
        }
    }
}

/// A two-force member connecting two joints.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    /// Name of the material in the truss's material table.
    material_name: String,
    /// Resolved material properties.
    material: Material,
    /// Shape and named dimensions.
    section: CrossSection,
    /// Area and minimum inertia resolved from `section`.
    properties: SectionProperties,
    /// Distance between the end joints in metres.
    length: f64,
    /// Solved response, present after a successful analysis.
    response: Option<MemberResponse>,
}

impl Member {
    /// Create a member, resolving its cross-section.
    pub(crate) fn new(
        material_name: &str,
        material: Material,
        section: CrossSection,
        length: f64,
    ) -> Result<Self, ConfigurationError> {
        let properties = section.resolve()?;
        Ok(Self {
            material_name: material_name.to_owned(),
            material,
            section,
            properties,
            length,
            response: None,
        })
    }

    /// Name of the member's material.
    #[must_use]
    pub fn material_name(&self) -> &str {
        &self.material_name
    }

    /// Material properties of the member.
    #[must_use]
    pub fn material(&self) -> Material {
        self.material
    }

    /// Cross-section of the member.
    #[must_use]
    pub fn section(&self) -> &CrossSection {
        &self.section
    }

    /// Cross-sectional area in square metres.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.properties.area
    }

    /// Minimum second moment of area in metres⁴.
    #[must_use]
    pub fn min_inertia(&self) -> f64 {
        self.properties.min_inertia
    }

    /// Length in metres.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Mass in kilograms.
    #[must_use]
    pub fn mass(&self) -> f64 {
        self.material.density * self.properties.area * self.length
    }

    /// Axial stiffness `EA / L` in newtons per metre.
    #[must_use]
    pub fn axial_stiffness(&self) -> f64 {
        self.material.elastic_modulus * self.properties.area / self.length
    }

    /// Euler critical buckling load `π²EI / L²` in newtons.
    #[must_use]
    pub fn critical_buckling_load(&self) -> f64 {
        PI.powi(2) * self.material.elastic_modulus * self.properties.min_inertia
            / self.length.powi(2)
    }

    /// Solved response, if the truss has been analysed since the last edit.
    #[must_use]
    pub fn response(&self) -> Option<&MemberResponse> {
        self.response.as_ref()
    }

    pub(crate) fn set_material(&mut self, material_name: &str, material: Material) {
        self.material_name = material_name.to_owned();
        self.material = material;
    }

    pub(crate) fn set_section(&mut self, section: CrossSection) -> Result<(), ConfigurationError> {
        self.properties = section.resolve()?;
        self.section = section;
        Ok(())
    }

    pub(crate) fn set_length(&mut self, length: f64) {
        self.length = length;
    }

    /// Derive stress and factors of safety from the solved axial force.
    ///
    /// Negative force is compression and is the only case checked for buckling.
    pub(crate) fn set_axial_force(&mut self, axial_force: f64) {
        let stress = axial_force / self.properties.area;
        let fos_yielding = if stress == 0.0 {
            f64::INFINITY
        } else {
            self.material.yield_strength / stress.abs()
        };
        let fos_buckling = if axial_force < 0.0 {
            self.critical_buckling_load() / axial_force.abs()
        } else {
            BUCKLING_NOT_APPLICABLE
        };
        self.response = Some(MemberResponse {
            axial_force,
            stress,
            fos_yielding,
            fos_buckling,
        });
    }

    pub(crate) fn clear_response(&mut self) {
        self.response = None;
    }
}
