//! # Supports
//!
//! Support conditions and the determinacy check.
//!
//! A transverse-load beam has two independent equilibrium equations
//! (ΣFy = 0, ΣM = 0). Each support contributes reaction unknowns:
//!
//! | Support | Unknowns            |
//! |---------|---------------------|
//! | Pinned  | 1 (vertical force)  |
//! | Roller  | 1 (vertical force)  |
//! | Fixed   | 2 (force + moment)  |
//! | Free    | 0                   |
//!
//! Axial reactions are ignored since no axial load is modelled. Only
//! configurations with exactly two unknowns are accepted:
//!
//! ```text
//! Simply supported      Overhanging            Cantilever
//!   △─────────────○      ───△──────────○───     ▣─────────────
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::Beam;
use crate::errors::{CalcError, CalcResult};

/// Number of independent equilibrium equations for a transverse-load beam
pub const EQUILIBRIUM_EQUATIONS: usize = 2;

/// Support condition at a point on the beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SupportType {
    /// Free end - no restraint, marks a cantilever tip
    Free,

    /// Pinned/hinged support - restrains vertical displacement, allows rotation
    #[default]
    Pinned,

    /// Roller support - same as pinned for transverse loading
    Roller,

    /// Fixed support - restrains both displacement and rotation
    Fixed,
}

impl SupportType {
    /// All available support types for UI selection
    pub const ALL: [SupportType; 4] = [
        SupportType::Pinned,
        SupportType::Roller,
        SupportType::Fixed,
        SupportType::Free,
    ];

    /// Returns true if this support restrains vertical displacement
    pub fn restrains_vertical(&self) -> bool {
        matches!(
            self,
            SupportType::Pinned | SupportType::Roller | SupportType::Fixed
        )
    }

    /// Returns true if this support restrains rotation
    pub fn restrains_rotation(&self) -> bool {
        matches!(self, SupportType::Fixed)
    }

    /// Reaction unknowns contributed by this support
    pub fn unknowns(&self) -> usize {
        usize::from(self.restrains_vertical()) + usize::from(self.restrains_rotation())
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportType::Free => "Free",
            SupportType::Pinned => "Pinned",
            SupportType::Roller => "Roller",
            SupportType::Fixed => "Fixed",
        }
    }

    /// Get short symbol for diagrams
    pub fn symbol(&self) -> &'static str {
        match self {
            SupportType::Free => "",
            SupportType::Pinned => "△",
            SupportType::Roller => "○",
            SupportType::Fixed => "▣",
        }
    }
}

impl std::fmt::Display for SupportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A support at a position on the beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Support {
    /// Distance from the left end
    pub position: f64,
    pub kind: SupportType,
}

impl Support {
    pub fn new(position: f64, kind: SupportType) -> Self {
        Support { position, kind }
    }

    pub fn pinned(position: f64) -> Self {
        Support::new(position, SupportType::Pinned)
    }

    pub fn roller(position: f64) -> Self {
        Support::new(position, SupportType::Roller)
    }

    pub fn fixed(position: f64) -> Self {
        Support::new(position, SupportType::Fixed)
    }

    pub fn free(position: f64) -> Self {
        Support::new(position, SupportType::Free)
    }
}

/// Statically determinate support layouts the solver accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SupportLayout {
    /// Two vertical supports, one at each end
    SimplySupported,
    /// Two vertical supports with at least one end hanging past them
    Overhanging,
    /// A single fixed support
    Cantilever,
}

impl SupportLayout {
    pub fn display_name(&self) -> &'static str {
        match self {
            SupportLayout::SimplySupported => "Simply supported",
            SupportLayout::Overhanging => "Overhanging",
            SupportLayout::Cantilever => "Cantilever",
        }
    }
}

/// The supports of one beam
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SupportConfig {
    supports: Vec<Support>,
}

impl SupportConfig {
    pub fn new(supports: Vec<Support>) -> Self {
        SupportConfig { supports }
    }

    /// Pin at the left end, roller at the right end
    pub fn simply_supported(length: f64) -> Self {
        SupportConfig::new(vec![Support::pinned(0.0), Support::roller(length)])
    }

    /// Fixed at the left end, free at the right end
    pub fn cantilever(length: f64) -> Self {
        SupportConfig::new(vec![Support::fixed(0.0), Support::free(length)])
    }

    /// Free at the left end, fixed at the right end
    pub fn cantilever_right(length: f64) -> Self {
        SupportConfig::new(vec![Support::free(0.0), Support::fixed(length)])
    }

    /// Pin at `a`, roller at `b`, with the beam running past them to 0 and `length`
    pub fn overhang(a: f64, b: f64, length: f64) -> Self {
        let mut supports = vec![Support::pinned(a), Support::roller(b)];
        if a > 0.0 {
            supports.insert(0, Support::free(0.0));
        }
        if b < length {
            supports.push(Support::free(length));
        }
        SupportConfig::new(supports)
    }

    /// Add a support and return self (builder pattern)
    pub fn with_support(mut self, support: Support) -> Self {
        self.supports.push(support);
        self
    }

    pub fn supports(&self) -> &[Support] {
        &self.supports
    }

    /// Supports that produce a reaction, with their index in the config
    pub fn restraining(&self) -> impl Iterator<Item = (usize, &Support)> {
        self.supports
            .iter()
            .enumerate()
            .filter(|(_, s)| s.kind.unknowns() > 0)
    }

    /// Total reaction unknowns
    pub fn unknowns(&self) -> usize {
        self.supports.iter().map(|s| s.kind.unknowns()).sum()
    }

    /// Check positions against the beam
    pub fn validate(&self, beam: &Beam) -> CalcResult<()> {
        for support in &self.supports {
            if !support.position.is_finite() || support.position < 0.0 || support.position > beam.length {
                return Err(CalcError::invalid_placement(
                    format!("{} support", support.kind),
                    support.position,
                    beam.length,
                ));
            }
        }
        Ok(())
    }

    /// Classify the structure, rejecting anything that is not statically
    /// determinate and stable.
    pub fn classify(&self, beam: &Beam) -> CalcResult<SupportLayout> {
        self.validate(beam)?;

        let unknowns = self.unknowns();
        if unknowns > EQUILIBRIUM_EQUATIONS {
            return Err(CalcError::IndeterminateStructure {
                unknowns,
                equations: EQUILIBRIUM_EQUATIONS,
            });
        }
        if unknowns < EQUILIBRIUM_EQUATIONS {
            return Err(CalcError::unstable(format!(
                "{} reaction unknown(s) cannot satisfy {} equilibrium equations",
                unknowns, EQUILIBRIUM_EQUATIONS
            )));
        }

        let restraints: Vec<&Support> = self.restraining().map(|(_, s)| s).collect();
        match restraints.as_slice() {
            [only] if only.kind == SupportType::Fixed => Ok(SupportLayout::Cantilever),
            [first, second] => {
                if first.position == second.position {
                    return Err(CalcError::unstable(format!(
                        "both vertical supports sit at x = {}; the beam can rotate freely",
                        first.position
                    )));
                }
                let (left, right) = if first.position < second.position {
                    (first.position, second.position)
                } else {
                    (second.position, first.position)
                };
                if left == 0.0 && right == beam.length {
                    Ok(SupportLayout::SimplySupported)
                } else {
                    Ok(SupportLayout::Overhanging)
                }
            }
            _ => Err(CalcError::internal("unknown count does not match support list")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beam() -> Beam {
        Beam::new(10.0).unwrap()
    }

    #[test]
    fn test_support_type_display() {
        assert_eq!(SupportType::Pinned.to_string(), "Pinned");
        assert_eq!(SupportType::Fixed.symbol(), "▣");
    }

    #[test]
    fn test_support_type_restraints() {
        assert!(SupportType::Pinned.restrains_vertical());
        assert!(!SupportType::Pinned.restrains_rotation());
        assert!(SupportType::Fixed.restrains_rotation());
        assert!(!SupportType::Free.restrains_vertical());
        assert_eq!(SupportType::Roller.unknowns(), 1);
        assert_eq!(SupportType::Fixed.unknowns(), 2);
        assert_eq!(SupportType::Free.unknowns(), 0);
    }

    #[test]
    fn test_classify_standard_layouts() {
        let b = beam();
        assert_eq!(
            SupportConfig::simply_supported(10.0).classify(&b).unwrap(),
            SupportLayout::SimplySupported
        );
        assert_eq!(
            SupportConfig::cantilever(10.0).classify(&b).unwrap(),
            SupportLayout::Cantilever
        );
        assert_eq!(
            SupportConfig::cantilever_right(10.0).classify(&b).unwrap(),
            SupportLayout::Cantilever
        );
        assert_eq!(
            SupportConfig::overhang(2.0, 8.0, 10.0).classify(&b).unwrap(),
            SupportLayout::Overhanging
        );
        assert_eq!(SupportConfig::overhang(2.0, 8.0, 10.0).supports().len(), 4);
    }

    #[test]
    fn test_classify_rejects_indeterminate() {
        let fixed_fixed = SupportConfig::new(vec![Support::fixed(0.0), Support::fixed(10.0)]);
        assert_eq!(
            fixed_fixed.classify(&beam()).unwrap_err(),
            CalcError::IndeterminateStructure { unknowns: 4, equations: 2 }
        );

        let propped = SupportConfig::cantilever(10.0).with_support(Support::roller(10.0));
        assert_eq!(propped.classify(&beam()).unwrap_err().error_code(), "INDETERMINATE_STRUCTURE");

        let three_pins = SupportConfig::simply_supported(10.0).with_support(Support::pinned(5.0));
        assert_eq!(three_pins.classify(&beam()).unwrap_err().error_code(), "INDETERMINATE_STRUCTURE");
    }

    #[test]
    fn test_classify_rejects_mechanisms() {
        let free_free = SupportConfig::new(vec![Support::free(0.0), Support::free(10.0)]);
        assert_eq!(free_free.classify(&beam()).unwrap_err().error_code(), "UNSTABLE_STRUCTURE");

        let single_pin = SupportConfig::new(vec![Support::pinned(0.0)]);
        assert_eq!(single_pin.classify(&beam()).unwrap_err().error_code(), "UNSTABLE_STRUCTURE");

        let stacked = SupportConfig::new(vec![Support::pinned(4.0), Support::roller(4.0)]);
        assert_eq!(stacked.classify(&beam()).unwrap_err().error_code(), "UNSTABLE_STRUCTURE");
    }

    #[test]
    fn test_support_outside_beam() {
        let config = SupportConfig::new(vec![Support::pinned(0.0), Support::roller(11.0)]);
        assert_eq!(
            config.classify(&beam()).unwrap_err().error_code(),
            "INVALID_LOAD_PLACEMENT"
        );
    }

    #[test]
    fn test_serialization() {
        let config = SupportConfig::cantilever(4.0);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(
            json,
            r#"[{"position":0.0,"kind":"Fixed"},{"position":4.0,"kind":"Free"}]"#
        );
        let parsed: SupportConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
