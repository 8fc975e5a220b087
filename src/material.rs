//! Material properties and the lookup table members resolve their names against.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::ConfigurationError;

/// Isotropic material properties in SI units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Density in kg/m³.
    pub density: f64,
    /// Elastic modulus in pascals.
    pub elastic_modulus: f64,
    /// Yield strength in pascals.
    pub yield_strength: f64,
}

impl Material {
    /// Create a material from its density, elastic modulus and yield strength.
    #[must_use]
    pub const fn new(density: f64, elastic_modulus: f64, yield_strength: f64) -> Self {
        Self {
            density,
            elastic_modulus,
            yield_strength,
        }
    }

    /// Check that every property is a positive finite number.
    fn validate(&self, name: &str) -> Result<(), ConfigurationError> {
        let checks = [
            ("density", self.density),
            ("elastic modulus", self.elastic_modulus),
            ("yield strength", self.yield_strength),
        ];
        for (property, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigurationError::InvalidMaterial {
                    name: name.to_owned(),
                    reason: format!("{property} must be positive and finite (received {value})"),
                });
            }
        }
        Ok(())
    }
}

/// Structural steel, ASTM A36.
pub const A36: Material = Material::new(7800.0, 200.0e9, 250.0e6);
/// Structural steel, ASTM A992.
pub const A992: Material = Material::new(7800.0, 200.0e9, 345.0e6);
/// Aluminium alloy 6061-T6.
pub const AL_6061_T6: Material = Material::new(2700.0, 68.9e9, 276.0e6);
/// Near-weightless steel used to study trusses without self-weight.
pub const ZERO_MASS: Material = Material::new(0.0001, 200.0e9, 345.0e6);

static STANDARD_MATERIALS: Lazy<MaterialTable> = Lazy::new(|| MaterialTable {
    entries: [
        ("A36", A36),
        ("A992", A992),
        ("6061_T6", AL_6061_T6),
        ("zero_mat", ZERO_MASS),
    ]
    .into_iter()
    .map(|(name, material)| (name.to_owned(), material))
    .collect(),
});

/// Immutable mapping from material name to [`Material`].
///
/// The standard table is built once per process. Custom tables are derived from it
/// (or from an empty table) with [`MaterialTable::with_material`], which consumes the
/// table so a table is never modified after it has been handed to a truss.
///
/// # Examples
/// ```
/// use trussfos::{Material, MaterialTable};
///
/// let table = MaterialTable::standard()
///     .with_material("unit", Material::new(1.0, 1.0, 1.0))
///     .expect("valid material");
/// assert!(table.contains("A36"));
/// assert_eq!(table.get("unit").unwrap().elastic_modulus, 1.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialTable {
    /// Materials keyed by name.
    entries: BTreeMap<String, Material>,
}

impl MaterialTable {
    /// Table with no materials.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table holding the standard structural materials.
    #[must_use]
    pub fn standard() -> Self {
        STANDARD_MATERIALS.clone()
    }

    /// Return a copy of this table extended with (or overriding) `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InvalidMaterial`] when a property is not positive, or
    /// when the name is empty or contains whitespace and so cannot be written to a truss
    /// file.
    pub fn with_material(
        mut self,
        name: impl Into<String>,
        material: Material,
    ) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(ConfigurationError::InvalidMaterial {
                reason: "name must be a single non-empty word".to_owned(),
                name,
            });
        }
        material.validate(&name)?;
        self.entries.insert(name, material);
        Ok(self)
    }

    /// Whether `name` is a valid material.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Look up a material by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownMaterial`] when `name` is not in the table.
    pub fn get(&self, name: &str) -> Result<Material, ConfigurationError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| ConfigurationError::UnknownMaterial(name.to_owned()))
    }

    /// Iterate over materials in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Material)> {
        self.entries.iter().map(|(name, material)| (name.as_str(), material))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_contains_structural_materials() {
        let table = MaterialTable::standard();
        assert_eq!(table.get("A36"), Ok(A36));
        assert_eq!(table.get("6061_T6").unwrap().density, 2700.0);
        assert_eq!(table.iter().count(), 4);
    }

    #[test]
    fn unknown_material_is_rejected() {
        let error = MaterialTable::standard()
            .get("unobtainium")
            .expect_err("unknown material rejected");
        assert_eq!(
            error,
            ConfigurationError::UnknownMaterial("unobtainium".to_owned())
        );
    }

    #[test]
    fn custom_materials_must_be_positive() {
        let error = MaterialTable::empty()
            .with_material("foam", Material::new(10.0, 0.0, 1.0))
            .expect_err("zero modulus rejected");
        assert!(matches!(error, ConfigurationError::InvalidMaterial { .. }));
    }

    #[test]
    fn material_names_must_be_single_words() {
        for name in ["", "mild steel", "tab\tname", " A36"] {
            let error = MaterialTable::standard()
                .with_material(name, Material::new(1.0, 1.0, 1.0))
                .expect_err("name rejected");
            let ConfigurationError::InvalidMaterial { name: rejected, .. } = error else {
                panic!("unexpected error for {name:?}: {error}");
            };
            assert_eq!(rejected, name);
        }
        assert!(MaterialTable::empty()
            .with_material("mild_steel", A36)
            .is_ok());
    }

    #[test]
    fn extending_does_not_touch_the_standard_table() {
        let custom = MaterialTable::standard()
            .with_material("A36", Material::new(1.0, 1.0, 1.0))
            .expect("override accepted");
        assert_eq!(custom.get("A36").unwrap().density, 1.0);
        assert_eq!(MaterialTable::standard().get("A36"), Ok(A36));
    }
}
