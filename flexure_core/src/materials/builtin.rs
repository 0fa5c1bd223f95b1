//! # Built-in Materials
//!
//! Common engineering materials with typical room-temperature values in SI
//! units: elastic modulus E (Pa) and yield strength Sy (Pa). Brittle
//! materials (ceramics, glass, concrete) list a representative strength in
//! place of yield.
//!
//! Values are typical, not minimums. Verify against the supplier's data
//! before relying on them for design.

use once_cell::sync::Lazy;

use super::{Material, MaterialLibrary};
use crate::errors::{CalcError, CalcResult};

/// (name, E in Pa, Sy in Pa)
const TABLE: &[(&str, f64, f64)] = &[
    // Steels (carbon, alloy, structural)
    ("Carbon Steel 1018", 2.05e11, 3.70e8),
    ("Carbon Steel 1020", 2.05e11, 3.50e8),
    ("Carbon Steel 1040", 2.05e11, 4.50e8),
    ("Carbon Steel 1045", 2.05e11, 5.30e8),
    ("Carbon Steel 1060", 2.05e11, 6.20e8),
    ("Carbon Steel 1095 (Spring)", 2.05e11, 8.00e8),
    ("Carbon Steel A36", 2.00e11, 2.50e8),
    ("Carbon Steel AISI 4140 (QT)", 2.10e11, 6.55e8),
    ("Alloy Steel 4340 (QT)", 2.10e11, 1.00e9),
    ("Alloy Steel 8620", 2.05e11, 6.20e8),
    ("HSLA Steel A572-50", 2.00e11, 3.45e8),
    ("HSLA Steel A992", 2.00e11, 3.45e8),
    ("Tool Steel D2", 2.10e11, 5.50e8),
    ("Tool Steel O1", 2.10e11, 5.00e8),
    ("Tool Steel H13", 2.10e11, 1.40e9),
    // Stainless steels
    ("Stainless Steel 301", 1.93e11, 2.75e8),
    ("Stainless Steel 302", 1.93e11, 2.75e8),
    ("Stainless Steel 303", 1.93e11, 2.15e8),
    ("Stainless Steel 304", 1.93e11, 2.15e8),
    ("Stainless Steel 304L", 1.93e11, 1.70e8),
    ("Stainless Steel 316", 1.93e11, 2.90e8),
    ("Stainless Steel 316L", 1.93e11, 1.70e8),
    ("Stainless Steel 321", 1.93e11, 2.05e8),
    ("Stainless Steel 347", 1.93e11, 2.05e8),
    ("Stainless Steel 409", 2.00e11, 2.00e8),
    ("Stainless Steel 410", 2.00e11, 2.75e8),
    ("Stainless Steel 420", 2.00e11, 5.00e8),
    ("Stainless Steel 430", 2.00e11, 2.75e8),
    ("Stainless Steel 17-4PH", 1.96e11, 1.10e9),
    // Aluminum alloys
    ("Aluminum 1100-O", 6.90e10, 3.40e7),
    ("Aluminum 2024-T3", 7.30e10, 3.20e8),
    ("Aluminum 3003-H14", 6.90e10, 1.45e8),
    ("Aluminum 5052-H32", 7.00e10, 1.93e8),
    ("Aluminum 5083-H116", 7.00e10, 2.15e8),
    ("Aluminum 6061-T4", 6.90e10, 1.45e8),
    ("Aluminum 6061-T6", 6.90e10, 2.70e8),
    ("Aluminum 6063-T5", 6.90e10, 1.45e8),
    ("Aluminum 6063-T6", 6.90e10, 2.40e8),
    ("Aluminum 7075-T6", 7.20e10, 5.00e8),
    ("Aluminum 7075-T73", 7.20e10, 4.30e8),
    // Titanium
    ("Titanium Grade 2", 1.05e11, 3.40e8),
    ("Titanium Grade 4", 1.05e11, 4.80e8),
    ("Titanium Ti-6Al-4V (Grade 5)", 1.14e11, 8.80e8),
    ("Titanium Ti-6Al-4V ELI (Gr 23)", 1.14e11, 7.60e8),
    // Nickel / Cobalt / Superalloys
    ("Inconel 625", 2.05e11, 7.60e8),
    ("Inconel 718", 2.10e11, 1.00e9),
    ("Hastelloy C-276", 2.06e11, 3.50e8),
    ("Monel 400", 1.79e11, 1.70e8),
    ("Nickel 200", 2.06e11, 1.48e8),
    ("Cobalt-Chrome (CoCr)", 2.30e11, 6.00e8),
    // Copper & friends
    ("Copper C11000", 1.10e11, 7.00e7),
    ("Copper C10100 (OFHC)", 1.10e11, 6.90e7),
    ("Brass 260 (Cartridge)", 1.00e11, 2.00e8),
    ("Brass 360 (Free-Cutting)", 1.00e11, 2.10e8),
    ("Bronze (Phosphor)", 1.10e11, 2.40e8),
    // Magnesium / Zinc / Lead / Others
    ("Magnesium AZ31B", 4.50e10, 2.00e8),
    ("Magnesium AZ91D", 4.50e10, 1.60e8),
    ("Zinc", 1.08e11, 5.50e7),
    ("Lead", 1.60e10, 1.20e7),
    ("Molybdenum", 3.30e11, 5.50e8),
    ("Tungsten", 4.00e11, 5.50e8),
    ("Beryllium", 2.87e11, 2.40e8),
    // Structural (common specs)
    ("ASTM A500 Gr B (Tube)", 2.00e11, 3.17e8),
    ("ASTM A500 Gr C (Tube)", 2.00e11, 3.45e8),
    ("ASTM A53 Gr B (Pipe)", 2.00e11, 2.40e8),
    // Polymers (engineering plastics)
    ("ABS", 2.00e9, 3.50e7),
    ("Acetal (POM, Delrin)", 3.00e9, 6.90e7),
    ("Acrylic (PMMA)", 3.20e9, 6.00e7),
    ("Nylon 6", 2.50e9, 6.50e7),
    ("Nylon 6/6", 2.80e9, 7.00e7),
    ("Nylon 12", 1.60e9, 4.50e7),
    ("Polycarbonate", 2.30e9, 7.00e7),
    ("PEEK", 3.60e9, 9.00e7),
    ("UHMW-PE", 8.00e8, 2.00e7),
    ("HDPE", 1.00e9, 2.50e7),
    ("LDPE", 2.00e9, 2.00e7),
    ("PP (Polypropylene)", 1.50e9, 3.00e7),
    ("PET", 2.70e9, 6.00e7),
    ("PTFE (Teflon)", 5.00e8, 2.00e7),
    ("PVC (Rigid)", 2.90e9, 5.50e7),
    ("PS (Polystyrene)", 3.00e9, 4.00e7),
    ("SAN", 2.20e9, 5.00e7),
    ("PC-ABS (Blend)", 2.50e9, 5.50e7),
    ("PEI (Ultem)", 3.20e9, 1.10e8),
    ("PBT", 2.40e9, 5.50e7),
    ("PPS", 3.00e9, 1.00e8),
    // Composites / Fibers / Laminates
    ("Carbon Fiber/Epoxy (UD)", 1.45e11, 6.00e8),
    ("Carbon Fiber/Epoxy (Woven)", 7.00e10, 4.00e8),
    ("Glass Fiber/Epoxy (E-glass)", 4.00e10, 3.50e8),
    ("Kevlar/Epoxy", 7.00e10, 3.60e8),
    ("G10/FR4", 2.40e10, 3.10e8),
    // Ceramics / Glass
    ("Alumina (Al2O3, 95%)", 3.00e11, 2.50e8),
    ("Zirconia (Y-TZP)", 2.10e11, 1.20e9),
    ("Silicon Carbide (SiC)", 4.50e11, 4.00e8),
    ("Silicon Nitride (Si3N4)", 3.05e11, 8.00e8),
    ("Glass (Soda-lime)", 7.00e10, 1.00e8),
    ("Glass (Borosilicate)", 6.40e10, 1.20e8),
    ("Fused Silica", 7.20e10, 5.00e7),
    ("Silicon (single-crystal)", 1.30e11, 7.00e9),
    // Concrete / Masonry
    ("Concrete (Normal Strength)", 3.00e10, 3.00e7),
    ("Concrete (High Strength)", 4.00e10, 6.00e7),
    ("Mortar", 1.50e10, 1.50e7),
    // Woods (typical along grain)
    ("Wood (Pine)", 8.00e9, 4.00e7),
    ("Wood (Douglas Fir)", 1.20e10, 5.00e7),
    ("Wood (Oak)", 1.10e10, 6.00e7),
    ("Wood (Maple)", 1.10e10, 6.00e7),
    ("Wood (Birch)", 1.05e10, 5.50e7),
    ("Wood (Teak)", 1.20e10, 6.00e7),
    ("Bamboo", 1.10e10, 1.60e8),
];

static BUILTIN: Lazy<Vec<Material>> = Lazy::new(|| {
    TABLE
        .iter()
        .map(|(name, e, sy)| Material::new(*name, *e).with_yield(*sy))
        .collect()
});

/// The built-in material table
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMaterials;

impl BuiltinMaterials {
    /// All built-in materials in table order
    pub fn all() -> &'static [Material] {
        &BUILTIN
    }

    /// Find a material by name, ignoring case
    pub fn find(name: &str) -> Option<&'static Material> {
        BUILTIN.iter().find(|m| m.name.eq_ignore_ascii_case(name.trim()))
    }
}

impl MaterialLibrary for BuiltinMaterials {
    fn lookup_material(&self, name: &str) -> CalcResult<Material> {
        BuiltinMaterials::find(name)
            .cloned()
            .ok_or_else(|| CalcError::material_not_found(name))
    }

    fn material_names(&self) -> Vec<String> {
        BUILTIN.iter().map(|m| m.name.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_table_is_well_formed() {
        assert!(BuiltinMaterials::all().len() > 100);
        for material in BuiltinMaterials::all() {
            assert!(material.validate().is_ok(), "{}", material.name);
            assert!(material.yield_strength.is_some());
        }
    }

    #[test]
    fn test_lookup_a36() {
        let a36 = BuiltinMaterials.lookup_material("carbon steel a36").unwrap();
        assert_eq!(a36.name, "Carbon Steel A36");
        assert_relative_eq!(a36.elastic_modulus, 2.0e11);
        assert_relative_eq!(a36.yield_strength.unwrap(), 2.5e8);
    }

    #[test]
    fn test_unknown_material() {
        let err = BuiltinMaterials.lookup_material("Unobtainium").unwrap_err();
        assert_eq!(err, CalcError::material_not_found("Unobtainium"));
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let hits = BuiltinMaterials.search("ALUMINUM 6061");
        assert_eq!(hits, vec!["Aluminum 6061-T4".to_string(), "Aluminum 6061-T6".to_string()]);
    }
}
