//! # flexure_core - Beam Analysis Engine
//!
//! `flexure_core` analyses straight, statically determinate beams: support
//! reactions, exact shear/moment/slope/deflection diagrams, peak stresses
//! and safety factors. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Exact**: Diagrams are piecewise polynomials, extremes found analytically
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use flexure_core::calculations::{analyze, Beam, SupportConfig};
//! use flexure_core::loads::{Load, LoadSet};
//! use flexure_core::materials::{BuiltinMaterials, MaterialLibrary};
//! use flexure_core::sections::{SectionLibrary, StandardSections};
//!
//! let beam = Beam::new(8.0).unwrap();
//! let supports = SupportConfig::simply_supported(8.0);
//! let loads = LoadSet::new().with_load(Load::uniform_full(50.0, &beam));
//! let section = StandardSections.lookup_section("rectangle", &[0.05, 0.1]).unwrap();
//! let steel = BuiltinMaterials.lookup_material("Carbon Steel A36").unwrap();
//!
//! let result = analyze(&beam, &supports, &loads, &section, &steel).unwrap();
//! assert!((result.max_moment.value - 400.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Supports, equilibrium, diagrams, stress, `analyze`
//! - [`loads`] - Point forces, couples and line loads
//! - [`sections`] - Section properties and the standard shape library
//! - [`materials`] - Material definitions and lookup tables
//! - [`math`] - Polynomials, piecewise polynomials, small linear solves
//! - [`equations`] - Closed-form reference formulas
//! - [`project`] - Project container, metadata, and settings
//! - [`file_io`] - File operations with atomic saves and locking
//! - [`export`] - Diagram CSV export
//! - [`report`] - Plain-text result report
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod equations;
pub mod errors;
pub mod export;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_io;
pub mod loads;
pub mod materials;
pub mod math;
pub mod project;
pub mod report;
pub mod sections;

// Re-export commonly used types at crate root for convenience
pub use calculations::{analyze, AnalysisResult, AnalysisSettings, Beam, SupportConfig};
pub use errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
pub use file_io::{load_project, save_project, FileLock};
pub use loads::{Load, LoadSet};
pub use materials::{Material, MaterialLibrary};
pub use project::{BeamCase, Project, ProjectMetadata, ProjectSettings};
pub use sections::{SectionLibrary, SectionProperties};
