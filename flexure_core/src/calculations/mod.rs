//! # Structural Calculations
//!
//! The analysis pipeline for a straight, statically determinate beam:
//!
//! - [`supports`] - Support conditions and the determinacy check
//! - [`equilibrium`] - Reaction forces and moments from ΣFy = 0, ΣM = 0
//! - [`diagrams`] - Shear, moment, slope and deflection as piecewise polynomials
//! - [`stress`] - Bending/shear stress and safety factors
//! - [`analysis`] - The `analyze` entry point tying the stages together
//!
//! Every stage is a pure function of its arguments. Nothing here touches
//! the filesystem or keeps state between calls, so analyses can run on any
//! number of threads at once.
//!
//! ## Sign Convention
//! - Applied forces and distributed loads: positive downward
//! - Reactions: positive upward
//! - Applied and reaction moments: positive counterclockwise
//! - Shear: sum of upward forces left of the cut
//! - Moment: positive sagging (tension on bottom fiber), dM/dx = V
//! - Deflection: positive upward, EI·y'' = M

pub mod analysis;
pub mod diagrams;
pub mod equilibrium;
pub mod stress;
pub mod supports;

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

// Re-export commonly used types
pub use analysis::{analyze, analyze_with_settings, AnalysisInput, AnalysisResult, AnalysisSettings, DiagramRow};
pub use diagrams::{build_diagrams, DiagramSet};
pub use equilibrium::{solve_reactions, Reaction, Reactions};
pub use stress::{analyze_stress, FailureCriterion, StressResult};
pub use supports::{Support, SupportConfig, SupportLayout, SupportType};

/// A straight prismatic beam, origin at the left end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beam {
    /// Length of the beam (any consistent length unit)
    pub length: f64,
}

impl Beam {
    /// Create a beam, rejecting non-positive or non-finite lengths.
    pub fn new(length: f64) -> CalcResult<Self> {
        let beam = Beam { length };
        beam.validate()?;
        Ok(beam)
    }

    /// Validate the length (deserialized beams bypass [`Beam::new`]).
    pub fn validate(&self) -> CalcResult<()> {
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(CalcError::invalid_dimension(
                "length",
                self.length,
                "Beam length must be positive and finite",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_beam_validation() {
        assert!(Beam::new(10.0).is_ok());
        assert_eq!(Beam::new(0.0).unwrap_err().error_code(), "INVALID_DIMENSION");
        assert!(Beam::new(-2.0).is_err());
        assert!(Beam::new(f64::NAN).is_err());
        assert!(Beam::new(f64::INFINITY).is_err());
    }

    #[test]
    fn test_beam_json() {
        let beam: Beam = serde_json::from_str(r#"{"length": 8.0}"#).unwrap();
        assert_eq!(beam, Beam::new(8.0).unwrap());
        let bad: Beam = serde_json::from_str(r#"{"length": -1.0}"#).unwrap();
        assert!(bad.validate().is_err());
    }
}
