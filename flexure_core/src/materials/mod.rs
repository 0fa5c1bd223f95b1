//! # Materials
//!
//! Elastic and strength properties for the stress and deflection checks.
//! All values are in one consistent unit system; the built-in table uses
//! SI (Pa).
//!
//! Lookups go through the [`MaterialLibrary`] trait so the analysis never
//! depends on where a material came from:
//!
//! - [`BuiltinMaterials`] - Static table of common engineering materials
//! - [`MaterialTable`] - User materials (JSON or CSV) layered over the built-ins
//!
//! A remote materials database would be one more `MaterialLibrary`
//! implementation, resolved by the caller before analysis starts.
//!
//! ## Example
//!
//! ```rust
//! use flexure_core::materials::{BuiltinMaterials, MaterialLibrary};
//!
//! let steel = BuiltinMaterials.lookup_material("Carbon Steel A36").unwrap();
//! assert_eq!(steel.elastic_modulus, 2.0e11);
//! ```

pub mod builtin;

pub use builtin::BuiltinMaterials;

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::errors::{CalcError, CalcResult};

/// A linear-elastic material
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// Young's modulus E
    pub elastic_modulus: f64,
    /// Yield strength Sy (required for safety factors)
    #[serde(default)]
    pub yield_strength: Option<f64>,
    /// Ultimate tensile strength Su
    #[serde(default)]
    pub ultimate_strength: Option<f64>,
}

impl Material {
    pub fn new(name: impl Into<String>, elastic_modulus: f64) -> Self {
        Material {
            name: name.into(),
            elastic_modulus,
            yield_strength: None,
            ultimate_strength: None,
        }
    }

    pub fn with_yield(mut self, yield_strength: f64) -> Self {
        self.yield_strength = Some(yield_strength);
        self
    }

    pub fn with_ultimate(mut self, ultimate_strength: f64) -> Self {
        self.ultimate_strength = Some(ultimate_strength);
        self
    }

    /// Check that every given property is positive and finite
    pub fn validate(&self) -> CalcResult<()> {
        let fields = [
            ("elastic_modulus", Some(self.elastic_modulus)),
            ("yield_strength", self.yield_strength),
            ("ultimate_strength", self.ultimate_strength),
        ];
        for (field, value) in fields {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(CalcError::invalid_input(
                        format!("material.{}", field),
                        v.to_string(),
                        "Material properties must be positive and finite",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Yield strength, or `MissingMaterialProperty` when absent
    pub fn require_yield(&self) -> CalcResult<f64> {
        self.yield_strength
            .ok_or_else(|| CalcError::missing_property(&self.name, "yield strength"))
    }
}

/// Source of materials by name.
pub trait MaterialLibrary {
    /// Resolve a material, failing with `MaterialNotFound`
    fn lookup_material(&self, name: &str) -> CalcResult<Material>;

    /// Every material name the library knows
    fn material_names(&self) -> Vec<String>;

    /// Names containing `filter` (case-insensitive), sorted case-insensitively
    fn search(&self, filter: &str) -> Vec<String> {
        let needle = filter.trim().to_lowercase();
        let mut names: Vec<String> = self
            .material_names()
            .into_iter()
            .filter(|name| name.to_lowercase().contains(&needle))
            .collect();
        names.sort_by_key(|name| name.to_lowercase());
        names.dedup_by(|a, b| a.eq_ignore_ascii_case(b));
        names
    }
}

/// User-defined materials, consulted before the built-in table.
///
/// Serializes as a plain JSON array of materials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialTable {
    entries: Vec<Material>,
}

impl MaterialTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace (by case-insensitive name) a user material
    pub fn insert(&mut self, material: Material) -> CalcResult<()> {
        material.validate()?;
        match self
            .entries
            .iter_mut()
            .find(|m| m.name.eq_ignore_ascii_case(&material.name))
        {
            Some(existing) => *existing = material,
            None => self.entries.push(material),
        }
        Ok(())
    }

    /// Remove a user material; built-ins cannot be removed
    pub fn remove(&mut self, name: &str) -> Option<Material> {
        let index = self
            .entries
            .iter()
            .position(|m| m.name.eq_ignore_ascii_case(name))?;
        Some(self.entries.remove(index))
    }

    /// User materials only
    pub fn user_materials(&self) -> &[Material] {
        &self.entries
    }

    /// Parse a JSON array of materials
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let entries: Vec<Material> = serde_json::from_str(json).map_err(|e| {
            CalcError::SerializationError {
                reason: format!("Failed to parse material table: {}", e),
            }
        })?;
        let mut table = MaterialTable::new();
        for material in entries {
            table.insert(material)?;
        }
        Ok(table)
    }

    pub fn to_json(&self) -> CalcResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CalcError::SerializationError {
            reason: format!("Failed to serialize material table: {}", e),
        })
    }

    /// Import `name,E,Sy` rows. A header row is optional; rows that do not
    /// have three fields or an E value that parses are skipped. Returns the
    /// number of materials imported.
    pub fn import_csv<R: Read>(&mut self, reader: R) -> CalcResult<usize> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut count = 0;
        for record in csv_reader.records() {
            let record = record.map_err(|e| CalcError::SerializationError {
                reason: format!("Failed to read materials CSV: {}", e),
            })?;
            if record.len() != 3 || record[0].is_empty() {
                continue;
            }
            let Ok(elastic_modulus) = record[1].parse::<f64>() else {
                continue;
            };
            let yield_strength = match &record[2] {
                "" => None,
                text => match text.parse::<f64>() {
                    Ok(v) => Some(v),
                    Err(_) => continue,
                },
            };
            let material = Material {
                name: record[0].to_string(),
                elastic_modulus,
                yield_strength,
                ultimate_strength: None,
            };
            if self.insert(material).is_ok() {
                count += 1;
            }
        }
        tracing::debug!("Imported {} materials from CSV", count);
        Ok(count)
    }

    /// Export user and built-in materials as `name,E_Pa,Sy_Pa`, sorted by name
    pub fn export_csv<W: Write>(&self, writer: W) -> CalcResult<()> {
        let to_error = |e: csv::Error| CalcError::SerializationError {
            reason: format!("Failed to write materials CSV: {}", e),
        };
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer
            .write_record(["name", "E_Pa", "Sy_Pa"])
            .map_err(to_error)?;
        for name in self.search("") {
            let material = self.lookup_material(&name)?;
            let yield_text = material
                .yield_strength
                .map(|sy| format!("{:.6e}", sy))
                .unwrap_or_default();
            csv_writer
                .write_record([
                    material.name.as_str(),
                    format!("{:.6e}", material.elastic_modulus).as_str(),
                    yield_text.as_str(),
                ])
                .map_err(to_error)?;
        }
        csv_writer.flush().map_err(|e| CalcError::SerializationError {
            reason: format!("Failed to write materials CSV: {}", e),
        })?;
        Ok(())
    }
}

impl MaterialLibrary for MaterialTable {
    fn lookup_material(&self, name: &str) -> CalcResult<Material> {
        let name = name.trim();
        match self.entries.iter().find(|m| m.name.eq_ignore_ascii_case(name)) {
            Some(material) => Ok(material.clone()),
            None => BuiltinMaterials.lookup_material(name),
        }
    }

    fn material_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|m| m.name.clone()).collect();
        names.extend(
            BuiltinMaterials::all()
                .iter()
                .filter(|b| !self.entries.iter().any(|m| m.name.eq_ignore_ascii_case(&b.name)))
                .map(|b| b.name.clone()),
        );
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_missing_yield_is_reported() {
        let material = Material::new("Mystery alloy", 1.0e11);
        assert_eq!(
            material.require_yield().unwrap_err(),
            CalcError::missing_property("Mystery alloy", "yield strength")
        );
        assert_relative_eq!(material.with_yield(3.0e8).require_yield().unwrap(), 3.0e8);
    }

    #[test]
    fn test_validation() {
        assert!(Material::new("bad", -1.0).validate().is_err());
        assert!(Material::new("bad", 1.0).with_yield(f64::NAN).validate().is_err());
        assert!(Material::new("ok", 1.0).with_yield(2.0).with_ultimate(3.0).validate().is_ok());
    }

    #[test]
    fn test_user_table_shadows_builtins() {
        let mut table = MaterialTable::new();
        table
            .insert(Material::new("Carbon Steel A36", 1.99e11).with_yield(2.6e8))
            .unwrap();
        assert_relative_eq!(table.lookup_material("CARBON STEEL A36").unwrap().elastic_modulus, 1.99e11);
        // Built-ins still resolve
        assert!(table.lookup_material("Aluminum 6061-T6").is_ok());
        // No duplicate name in the pick list
        assert_eq!(table.search("a36"), vec!["Carbon Steel A36".to_string()]);

        table.remove("carbon steel a36").unwrap();
        assert_relative_eq!(table.lookup_material("Carbon Steel A36").unwrap().elastic_modulus, 2.0e11);
    }

    #[test]
    fn test_json_round_trip() {
        let json = r#"[{"name": "Custom Wood", "elastic_modulus": 9.5e9, "yield_strength": 4.2e7}]"#;
        let table = MaterialTable::from_json(json).unwrap();
        assert_eq!(table.user_materials().len(), 1);
        let parsed = MaterialTable::from_json(&table.to_json().unwrap()).unwrap();
        assert_eq!(parsed, table);
        assert!(MaterialTable::from_json("{not json").is_err());
    }

    #[test]
    fn test_csv_import_skips_bad_rows() {
        let data = "name,E_Pa,Sy_Pa\n\
                    Foam Core,3.5e7,1.2e6\n\
                    No Yield,1.0e9,\n\
                    Broken,abc,1.0\n\
                    too,few\n";
        let mut table = MaterialTable::new();
        let count = table.import_csv(data.as_bytes()).unwrap();
        assert_eq!(count, 2);
        assert!(table.lookup_material("foam core").unwrap().yield_strength.is_some());
        assert!(table.lookup_material("No Yield").unwrap().yield_strength.is_none());
        assert!(table.lookup_material("Broken").is_err());
    }

    #[test]
    fn test_csv_export() {
        let mut table = MaterialTable::new();
        table.insert(Material::new("AAA Test", 1.0e9)).unwrap();
        let mut buffer = Vec::new();
        table.export_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("name,E_Pa,Sy_Pa"));
        assert_eq!(lines.next(), Some("AAA Test,1.000000e9,"));
        assert_eq!(text.lines().count(), 2 + BuiltinMaterials::all().len());
    }
}
