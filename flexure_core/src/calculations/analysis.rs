//! # Beam Analysis
//!
//! The single entry point of the engine:
//!
//! ```text
//! LoadSet + SupportConfig ──► solve_reactions ──► build_diagrams (EI = E·I)
//!                                                       │
//!                         AnalysisResult ◄── analyze_stress (|M|max, |V|max)
//! ```
//!
//! Inputs are plain, already-resolved data: material and section lookups
//! happen before this module is called. Each call builds a fresh
//! [`AnalysisResult`] and shares nothing with other calls.
//!
//! ## Example
//!
//! ```rust
//! use flexure_core::calculations::{analyze, Beam, SupportConfig};
//! use flexure_core::loads::{Load, LoadSet};
//! use flexure_core::materials::Material;
//! use flexure_core::sections::SectionProperties;
//!
//! let beam = Beam::new(10.0).unwrap();
//! let supports = SupportConfig::simply_supported(10.0);
//! let loads = LoadSet::new().with_load(Load::point(1000.0, 5.0));
//! let section = SectionProperties::explicit(8.0e-6, 0.05).unwrap();
//! let steel = Material::new("Steel", 2.0e11).with_yield(2.5e8);
//!
//! let result = analyze(&beam, &supports, &loads, &section, &steel).unwrap();
//! assert!((result.max_moment.value - 2500.0).abs() < 1e-9);
//! println!("Safety factor: {:?}", result.stress.safety_factor);
//! ```

use serde::{Deserialize, Serialize};

use super::diagrams::{build_diagrams, DiagramSet};
use super::equilibrium::{solve_reactions, Reactions};
use super::stress::{analyze_stress, FailureCriterion, StressResult, DEFAULT_LOW_MARGIN};
use super::supports::{SupportConfig, SupportLayout};
use super::Beam;
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadSet;
use crate::materials::Material;
use crate::math::Extremum;
use crate::sections::SectionProperties;

/// Default number of evenly spaced diagram samples
pub const DEFAULT_SAMPLE_COUNT: usize = 101;

/// Default relative tolerance for the equilibrium and closure checks
pub const DEFAULT_EQUILIBRIUM_TOLERANCE: f64 = 1e-9;

/// Tunable analysis options.
///
/// Every field has a serde default so a partial settings block (or TOML
/// file) only needs the values it changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// How bending and shear stress combine
    #[serde(default)]
    pub criterion: FailureCriterion,

    /// Safety factor below which a design is flagged as low-margin
    #[serde(default = "default_low_margin")]
    pub low_margin_threshold: f64,

    /// Evenly spaced samples for plotting and CSV export
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,

    /// Relative tolerance for ΣF = 0, ΣM = 0 and diagram closure
    #[serde(default = "default_tolerance")]
    pub equilibrium_tolerance: f64,
}

fn default_low_margin() -> f64 {
    DEFAULT_LOW_MARGIN
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

fn default_tolerance() -> f64 {
    DEFAULT_EQUILIBRIUM_TOLERANCE
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        AnalysisSettings {
            criterion: FailureCriterion::default(),
            low_margin_threshold: DEFAULT_LOW_MARGIN,
            sample_count: DEFAULT_SAMPLE_COUNT,
            equilibrium_tolerance: DEFAULT_EQUILIBRIUM_TOLERANCE,
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> CalcResult<()> {
        if !self.low_margin_threshold.is_finite() || self.low_margin_threshold <= 0.0 {
            return Err(CalcError::invalid_input(
                "settings.low_margin_threshold",
                self.low_margin_threshold.to_string(),
                "Threshold must be positive",
            ));
        }
        if self.sample_count < 2 {
            return Err(CalcError::invalid_input(
                "settings.sample_count",
                self.sample_count.to_string(),
                "At least two samples are needed",
            ));
        }
        if !self.equilibrium_tolerance.is_finite() || self.equilibrium_tolerance <= 0.0 {
            return Err(CalcError::invalid_input(
                "settings.equilibrium_tolerance",
                self.equilibrium_tolerance.to_string(),
                "Tolerance must be positive",
            ));
        }
        Ok(())
    }
}

/// Everything one analysis needs, fully resolved.
///
/// ## JSON Example
///
/// ```json
/// {
///   "beam": { "length": 4.0 },
///   "supports": [ { "position": 0.0, "kind": "Fixed" } ],
///   "loads": [ { "type": "PointForce", "position": 4.0, "magnitude": 100.0 } ],
///   "section": { "moment_of_inertia": 8.0e-6, "extreme_fiber": 0.05,
///                "area": null, "shear_area": null, "shear_factor": 1.5 },
///   "material": { "name": "Steel", "elastic_modulus": 2.0e11, "yield_strength": 2.5e8 }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisInput {
    pub beam: Beam,
    pub supports: SupportConfig,
    #[serde(default)]
    pub loads: LoadSet,
    pub section: SectionProperties,
    pub material: Material,
}

impl AnalysisInput {
    /// Run the analysis with the given settings
    pub fn analyze(&self, settings: &AnalysisSettings) -> CalcResult<AnalysisResult> {
        analyze_with_settings(self, settings)
    }
}

/// One sampled row of the four diagrams
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramRow {
    pub x: f64,
    pub shear: f64,
    pub moment: f64,
    pub slope: f64,
    pub deflection: f64,
}

/// Output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Layout the supports were classified as
    pub layout: SupportLayout,

    /// Support reactions (upward force, counterclockwise moment)
    pub reactions: Reactions,

    /// V, M, θ and y over the whole beam
    pub diagrams: DiagramSet,

    /// Flexural rigidity EI used for θ and y
    pub flexural_rigidity: f64,

    /// Largest |V|, signed, with its position
    pub max_shear: Extremum,

    /// Largest |M|, signed, with its position
    pub max_moment: Extremum,

    /// Largest |y|, signed (negative = downward), with its position
    pub max_deflection: Extremum,

    /// Peak stresses and safety factors
    pub stress: StressResult,

    /// Safety factor below which the design is flagged as low-margin
    pub low_margin_threshold: f64,
}

impl AnalysisResult {
    /// True unless the design is predicted to yield
    pub fn passes(&self) -> bool {
        self.stress.passes()
    }

    /// True when the safety factor is below the configured threshold
    pub fn is_low_margin(&self) -> bool {
        self.stress.is_low_margin(self.low_margin_threshold)
    }

    /// Sample all four diagrams on a shared grid.
    ///
    /// `n` evenly spaced positions plus both one-sided limits at every
    /// breakpoint, so jumps appear as vertical steps when plotted.
    pub fn sample_diagrams(&self, n: usize) -> Vec<DiagramRow> {
        let d = &self.diagrams;
        d.shear
            .sample_grid(n)
            .into_iter()
            .map(|(x, side)| DiagramRow {
                x,
                shear: d.shear.evaluate_at(x, side),
                moment: d.moment.evaluate_at(x, side),
                slope: d.slope.evaluate_at(x, side),
                deflection: d.deflection.evaluate_at(x, side),
            })
            .collect()
    }
}

/// Analyze a beam with default settings.
pub fn analyze(
    beam: &Beam,
    supports: &SupportConfig,
    loads: &LoadSet,
    section: &SectionProperties,
    material: &Material,
) -> CalcResult<AnalysisResult> {
    run(beam, supports, loads, section, material, &AnalysisSettings::default())
}

/// Analyze a beam with explicit settings.
pub fn analyze_with_settings(input: &AnalysisInput, settings: &AnalysisSettings) -> CalcResult<AnalysisResult> {
    run(
        &input.beam,
        &input.supports,
        &input.loads,
        &input.section,
        &input.material,
        settings,
    )
}

fn run(
    beam: &Beam,
    supports: &SupportConfig,
    loads: &LoadSet,
    section: &SectionProperties,
    material: &Material,
    settings: &AnalysisSettings,
) -> CalcResult<AnalysisResult> {
    settings.validate()?;
    beam.validate()?;
    section.validate()?;
    material.validate()?;

    let layout = supports.classify(beam)?;
    let reactions = solve_reactions(beam, supports, loads)?;
    check_equilibrium(beam, loads, &reactions, settings.equilibrium_tolerance)?;

    let flexural_rigidity = material.elastic_modulus * section.moment_of_inertia;
    let diagrams = build_diagrams(
        beam,
        supports,
        loads,
        &reactions,
        flexural_rigidity,
        settings.equilibrium_tolerance,
    )?;

    let max_shear = diagrams.max_shear();
    let max_moment = diagrams.max_moment();
    let max_deflection = diagrams.max_deflection();

    let stress = analyze_stress(max_moment.value, max_shear.value, section, material, settings.criterion)?;
    if stress.is_low_margin(settings.low_margin_threshold) {
        tracing::warn!(
            "Low safety factor {:.3} (threshold {}): consider a larger section or stronger material",
            stress.safety_factor.unwrap_or_default(),
            settings.low_margin_threshold
        );
    }

    tracing::debug!(
        "{} beam L = {}: |M|max = {:e} at x = {}, |y|max = {:e}",
        layout.display_name(),
        beam.length,
        max_moment.magnitude(),
        max_moment.position,
        max_deflection.magnitude()
    );

    Ok(AnalysisResult {
        layout,
        reactions,
        diagrams,
        flexural_rigidity,
        max_shear,
        max_moment,
        max_deflection,
        stress,
        low_margin_threshold: settings.low_margin_threshold,
    })
}

/// ΣF and ΣM about x = 0 of loads plus reactions must vanish
fn check_equilibrium(beam: &Beam, loads: &LoadSet, reactions: &Reactions, tolerance: f64) -> CalcResult<()> {
    let (force, moment) = reactions.residuals(loads);
    let scale = loads.magnitude_scale().max(f64::MIN_POSITIVE);
    if force.abs() > tolerance * scale || moment.abs() > tolerance * scale * beam.length {
        return Err(CalcError::internal(format!(
            "reactions leave residual ΣF = {:e}, ΣM = {:e}",
            force, moment
        )));
    }
    Ok(())
}
