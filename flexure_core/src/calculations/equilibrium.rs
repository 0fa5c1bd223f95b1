//! # Equilibrium Solver
//!
//! Reactions from the two global equilibrium equations, written with
//! upward reactions and counterclockwise moments positive:
//!
//! ```text
//! ΣFy = 0:       Σ Rⱼ                 = Σ (downward load resultants)
//! ΣM about 0:    Σ Rⱼ·xⱼ + Σ Cⱼ       = -(moment of applied loads about 0)
//! ```
//!
//! Each vertical reaction contributes the column `(1, xⱼ)`, a fixed-end
//! reaction moment contributes `(0, 1)`. After the determinacy check there
//! are exactly two unknowns, so the system is 2×2 and solved directly.

use serde::{Deserialize, Serialize};

use super::supports::{SupportConfig, SupportType};
use super::Beam;
use crate::errors::{CalcError, CalcResult};
use crate::loads::LoadSet;
use crate::math::solve_2x2;

/// Reaction exerted by one support on the beam
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Index of the support in its [`SupportConfig`]
    pub support_index: usize,
    pub position: f64,
    pub kind: SupportType,
    /// Vertical force, positive upward
    pub force: f64,
    /// Reaction moment, positive counterclockwise (fixed supports only)
    pub moment: f64,
}

/// All reactions of one analysis, ordered by support index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reactions {
    reactions: Vec<Reaction>,
}

impl Reactions {
    pub fn iter(&self) -> std::slice::Iter<'_, Reaction> {
        self.reactions.iter()
    }

    pub fn len(&self) -> usize {
        self.reactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reactions.is_empty()
    }

    /// Reaction at a given support, if that support restrains anything
    pub fn at_support(&self, support_index: usize) -> Option<&Reaction> {
        self.reactions
            .iter()
            .find(|r| r.support_index == support_index)
    }

    /// Sum of vertical reaction forces (upward)
    pub fn total_force(&self) -> f64 {
        self.reactions.iter().map(|r| r.force).sum()
    }

    /// Counterclockwise moment of the reactions about `x_ref`
    pub fn moment_about(&self, x_ref: f64) -> f64 {
        self.reactions
            .iter()
            .map(|r| r.force * (r.position - x_ref) + r.moment)
            .sum()
    }

    /// Equilibrium residuals `(ΣFy, ΣM about 0)` of loads plus reactions.
    ///
    /// Both are zero, to round-off, for a correct solution.
    pub fn residuals(&self, loads: &LoadSet) -> (f64, f64) {
        let force = self.total_force() - loads.total_force();
        let moment = self.moment_about(0.0) + loads.moment_about(0.0);
        (force, moment)
    }
}

impl<'a> IntoIterator for &'a Reactions {
    type Item = &'a Reaction;
    type IntoIter = std::slice::Iter<'a, Reaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.reactions.iter()
    }
}

/// One reaction component being solved for
#[derive(Debug, Clone, Copy)]
enum Unknown {
    Force { support_index: usize, position: f64 },
    Moment { support_index: usize },
}

impl Unknown {
    /// Coefficients in the (ΣFy, ΣM) rows
    fn column(&self) -> [f64; 2] {
        match self {
            Unknown::Force { position, .. } => [1.0, *position],
            Unknown::Moment { .. } => [0.0, 1.0],
        }
    }
}

/// Solve the support reactions of a determinate beam.
///
/// Validates the loads and the support layout first, so a structure that
/// reaches the linear solve is known to have exactly two unknowns.
///
/// # Example
///
/// ```rust
/// use flexure_core::calculations::{solve_reactions, Beam, SupportConfig};
/// use flexure_core::loads::{Load, LoadSet};
///
/// let beam = Beam::new(10.0).unwrap();
/// let supports = SupportConfig::simply_supported(10.0);
/// let loads = LoadSet::new().with_load(Load::point(1000.0, 5.0));
///
/// let reactions = solve_reactions(&beam, &supports, &loads).unwrap();
/// assert!((reactions.total_force() - 1000.0).abs() < 1e-9);
/// ```
pub fn solve_reactions(beam: &Beam, supports: &SupportConfig, loads: &LoadSet) -> CalcResult<Reactions> {
    beam.validate()?;
    loads.validate(beam)?;
    let layout = supports.classify(beam)?;

    let mut unknowns = Vec::with_capacity(2);
    for (support_index, support) in supports.restraining() {
        if support.kind.restrains_vertical() {
            unknowns.push(Unknown::Force {
                support_index,
                position: support.position,
            });
        }
        if support.kind.restrains_rotation() {
            unknowns.push(Unknown::Moment { support_index });
        }
    }

    let (first, second) = match unknowns.as_slice() {
        [a, b] => (a.column(), b.column()),
        _ => {
            return Err(CalcError::internal(format!(
                "determinate layout produced {} unknowns",
                unknowns.len()
            )))
        }
    };
    let matrix = [[first[0], second[0]], [first[1], second[1]]];
    let rhs = [loads.total_force(), -loads.moment_about(0.0)];
    let solution = solve_2x2(matrix, rhs, "support reactions")?;

    let mut reactions: Vec<Reaction> = Vec::with_capacity(2);
    for (unknown, value) in unknowns.iter().zip(solution) {
        match *unknown {
            Unknown::Force { support_index, position } => reactions.push(Reaction {
                support_index,
                position,
                kind: supports.supports()[support_index].kind,
                force: value,
                moment: 0.0,
            }),
            Unknown::Moment { support_index } => {
                // The force component of the same support was pushed first
                if let Some(reaction) = reactions
                    .iter_mut()
                    .find(|r| r.support_index == support_index)
                {
                    reaction.moment = value;
                }
            }
        }
    }

    tracing::debug!(
        "Solved {} reactions for {} layout: {:?}",
        reactions.len(),
        layout.display_name(),
        reactions
            .iter()
            .map(|r| (r.position, r.force, r.moment))
            .collect::<Vec<_>>()
    );

    Ok(Reactions { reactions })
}
