//! # Stress Analysis
//!
//! Peak stresses and safety factors from the diagram extremes.
//!
//! ## Formulas
//!
//! - Bending stress: σ = |M|max · c / I
//! - Shear stress: τ = k · |V|max / A (only when the section has an area)
//! - Safety factor: n = Sy / σ_eq
//!
//! σ peaks at the extreme fiber and τ at the neutral axis, usually at
//! different positions along the beam. The failure criteria therefore
//! compare the worst of each rather than combining them at one point:
//!
//! | Criterion         | σ_eq               |
//! |-------------------|--------------------|
//! | Max normal stress | max(σ, τ)          |
//! | Tresca            | max(σ, 2τ)         |
//! | von Mises         | max(σ, √3·τ)       |
//!
//! A safety factor below 1.0 is a result, not an error: the design fails
//! and the caller decides what to do about it.

use serde::{Deserialize, Serialize};

use crate::errors::CalcResult;
use crate::materials::Material;
use crate::sections::SectionProperties;

/// Safety factor below which a design is flagged as low-margin
pub const DEFAULT_LOW_MARGIN: f64 = 1.5;

/// How bending and shear stress combine into one equivalent stress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FailureCriterion {
    /// Largest principal stress; pure shear τ has principal stress τ
    #[default]
    MaxNormalStress,
    /// Maximum shear stress theory
    Tresca,
    /// Distortion energy theory
    VonMises,
}

impl FailureCriterion {
    pub const ALL: [FailureCriterion; 3] = [
        FailureCriterion::MaxNormalStress,
        FailureCriterion::Tresca,
        FailureCriterion::VonMises,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            FailureCriterion::MaxNormalStress => "Max normal stress",
            FailureCriterion::Tresca => "Tresca",
            FailureCriterion::VonMises => "von Mises",
        }
    }

    /// Equivalent uniaxial stress for peak bending stress σ and shear stress τ
    pub fn equivalent_stress(&self, bending: f64, shear: Option<f64>) -> f64 {
        let tau = shear.unwrap_or(0.0);
        match self {
            FailureCriterion::MaxNormalStress => bending.max(tau),
            FailureCriterion::Tresca => bending.max(2.0 * tau),
            FailureCriterion::VonMises => bending.max(3f64.sqrt() * tau),
        }
    }
}

impl std::fmt::Display for FailureCriterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Peak stresses and safety factors for one analysis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StressResult {
    /// Peak bending stress σ = |M|max·c/I
    pub bending_stress: f64,

    /// Peak shear stress τ = k·|V|max/A, if the section has an area
    pub shear_stress: Option<f64>,

    /// Criterion used to combine σ and τ
    pub criterion: FailureCriterion,

    /// Equivalent stress compared against the material strength
    pub equivalent_stress: f64,

    /// Yield strength used
    pub yield_strength: f64,

    /// Sy / σ_eq; `None` when the beam is unstressed
    pub safety_factor: Option<f64>,

    /// Su / σ_eq when the material has an ultimate strength
    pub ultimate_safety_factor: Option<f64>,
}

impl StressResult {
    /// True unless the safety factor is below 1.0
    pub fn passes(&self) -> bool {
        self.safety_factor.map_or(true, |n| n >= 1.0)
    }

    /// "PASS" or "FAIL"
    pub fn status(&self) -> &'static str {
        if self.passes() {
            "PASS"
        } else {
            "FAIL"
        }
    }

    /// True when the safety factor exists and is below `threshold`
    pub fn is_low_margin(&self, threshold: f64) -> bool {
        self.safety_factor.map_or(false, |n| n < threshold)
    }

    /// Stress utilisation σ_eq / Sy (1/n), 0 for an unstressed beam
    pub fn utilization(&self) -> f64 {
        self.equivalent_stress / self.yield_strength
    }
}

/// Compute peak stresses and safety factors.
///
/// `max_moment` and `max_shear` are the signed diagram extremes; only their
/// magnitudes matter. Fails with `MissingMaterialProperty` when the
/// material has no yield strength.
///
/// # Example
///
/// ```rust
/// use flexure_core::calculations::stress::{analyze_stress, FailureCriterion};
/// use flexure_core::materials::Material;
/// use flexure_core::sections::SectionProperties;
///
/// // σ = 300 with Sy = 250 → n = 0.833, reported, not an error
/// let section = SectionProperties::explicit(1.0, 1.0).unwrap();
/// let material = Material::new("Test", 2.0e5).with_yield(250.0);
/// let stress = analyze_stress(300.0, 0.0, &section, &material, FailureCriterion::MaxNormalStress).unwrap();
/// assert!((stress.safety_factor.unwrap() - 0.8333).abs() < 1e-3);
/// assert_eq!(stress.status(), "FAIL");
/// ```
pub fn analyze_stress(
    max_moment: f64,
    max_shear: f64,
    section: &SectionProperties,
    material: &Material,
    criterion: FailureCriterion,
) -> CalcResult<StressResult> {
    let yield_strength = material.require_yield()?;
    section.validate()?;

    let bending_stress = section.bending_stress(max_moment);
    let shear_stress = section.shear_stress(max_shear);
    let equivalent_stress = criterion.equivalent_stress(bending_stress, shear_stress);

    let ratio = |strength: f64| {
        if equivalent_stress > 0.0 {
            Some(strength / equivalent_stress)
        } else {
            None
        }
    };
    let safety_factor = ratio(yield_strength);
    let ultimate_safety_factor = material.ultimate_strength.and_then(ratio);

    Ok(StressResult {
        bending_stress,
        shear_stress,
        criterion,
        equivalent_stress,
        yield_strength,
        safety_factor,
        ultimate_safety_factor,
    })
}
