//! Small dense linear systems.
//!
//! Determinate beams never produce more than two unknowns at a time (two
//! reactions, or the two integration constants of the elastic curve), so a
//! closed-form 2x2 solve is all the engine needs.

use crate::errors::{CalcError, CalcResult};

/// Relative size of the determinant below which a system is singular
const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Solve `a · [u, v] = b` by Cramer's rule.
///
/// `system` names the system in the error if the matrix is singular.
pub fn solve_2x2(a: [[f64; 2]; 2], b: [f64; 2], system: &str) -> CalcResult<[f64; 2]> {
    let det = a[0][0] * a[1][1] - a[0][1] * a[1][0];
    let scale = (a[0][0] * a[1][1]).abs() + (a[0][1] * a[1][0]).abs();
    if !det.is_finite() || det == 0.0 || det.abs() <= SINGULAR_TOLERANCE * scale {
        return Err(CalcError::singular(system));
    }
    let u = (b[0] * a[1][1] - a[0][1] * b[1]) / det;
    let v = (a[0][0] * b[1] - b[0] * a[1][0]) / det;
    Ok([u, v])
}
