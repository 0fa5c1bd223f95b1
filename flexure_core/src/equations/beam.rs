//! # Closed-Form Beam Formulas
//!
//! Textbook results for the standard single-load cases. The general solver
//! never calls these; they are independent reference values for checking
//! it and for quick hand calculations.
//!
//! ## Notation
//!
//! - `L` = Span length
//! - `a` = Load position from the left end
//! - `P` = Point load magnitude
//! - `w` = Uniform load intensity (force per unit length)
//! - `E` = Modulus of elasticity
//! - `I` = Moment of inertia
//! - `R1` = Left reaction, `R2` = Right reaction
//!
//! ## Sign Conventions
//!
//! Magnitudes only: loads are taken downward and every result is returned
//! as a positive number. Deflections are downward distances.
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Table 8.1
//! - AISC Steel Construction Manual, Table 3-23

// =============================================================================
// SIMPLY-SUPPORTED: POINT LOAD
// Pin at x = 0, roller at x = L, load P at x = a
// =============================================================================

/// Reactions for point load P at position a on span L
///
/// ```text
///        P
///        ↓
///    ────┬────────────
///    △   a            ○
///   R1  ←───────L────→ R2
/// ```
///
/// # Formulas (Roark's Table 8.1, Case 1a)
/// - R1 = P(L-a)/L
/// - R2 = Pa/L
#[inline]
pub fn simple_point_reactions(p: f64, a: f64, l: f64) -> (f64, f64) {
    (p * (l - a) / l, p * a / l)
}

/// Maximum moment, under the load
///
/// # Formula
/// M_max = Pa(L-a)/L
#[inline]
pub fn simple_point_max_moment(p: f64, a: f64, l: f64) -> f64 {
    p * a * (l - a) / l
}

/// Midspan deflection for a load at midspan
///
/// # Formula
/// δ = PL³/(48EI)
#[inline]
pub fn simple_point_center_deflection(p: f64, l: f64, e: f64, i: f64) -> f64 {
    p * l.powi(3) / (48.0 * e * i)
}

// =============================================================================
// SIMPLY-SUPPORTED: UNIFORM LOAD
// =============================================================================

/// Reactions for uniform load w over the full span
///
/// # Formula
/// R1 = R2 = wL/2
#[inline]
pub fn simple_uniform_reactions(w: f64, l: f64) -> (f64, f64) {
    let r = w * l / 2.0;
    (r, r)
}

/// Maximum moment at midspan
///
/// # Formula
/// M_max = wL²/8
///
/// # Example
/// ```rust
/// use flexure_core::equations::beam::simple_uniform_max_moment;
///
/// assert!((simple_uniform_max_moment(50.0, 8.0) - 400.0).abs() < 1e-12);
/// ```
#[inline]
pub fn simple_uniform_max_moment(w: f64, l: f64) -> f64 {
    w * l * l / 8.0
}

/// Maximum deflection at midspan
///
/// # Formula
/// δ_max = 5wL⁴/(384EI)
#[inline]
pub fn simple_uniform_max_deflection(w: f64, l: f64, e: f64, i: f64) -> f64 {
    5.0 * w * l.powi(4) / (384.0 * e * i)
}

// =============================================================================
// SIMPLY-SUPPORTED: APPLIED MOMENT
// =============================================================================

/// Reactions for an applied couple M0 anywhere on the span
///
/// The reactions form an equal and opposite couple M0/L, independent of
/// where M0 is applied.
///
/// # Formula
/// |R1| = |R2| = M0/L
#[inline]
pub fn simple_moment_reaction(m0: f64, l: f64) -> f64 {
    m0 / l
}

// =============================================================================
// CANTILEVER
// Fixed at x = 0, free at x = L
// =============================================================================

/// Fixed-end moment for point load P at the free end
///
/// ```text
///    ▣────────────────┬
///    │                ↓ P
///    ←────── L ──────→
/// ```
///
/// # Formula
/// M_fixed = PL
#[inline]
pub fn cantilever_point_fixed_moment(p: f64, l: f64) -> f64 {
    p * l
}

/// Tip deflection for point load P at the free end
///
/// # Formula
/// δ_tip = PL³/(3EI)
#[inline]
pub fn cantilever_point_tip_deflection(p: f64, l: f64, e: f64, i: f64) -> f64 {
    p * l.powi(3) / (3.0 * e * i)
}

/// Fixed-end moment for uniform load w over the full length
///
/// # Formula
/// M_fixed = wL²/2
#[inline]
pub fn cantilever_uniform_fixed_moment(w: f64, l: f64) -> f64 {
    w * l * l / 2.0
}

/// Tip deflection for uniform load w over the full length
///
/// # Formula
/// δ_tip = wL⁴/(8EI)
#[inline]
pub fn cantilever_uniform_tip_deflection(w: f64, l: f64, e: f64, i: f64) -> f64 {
    w * l.powi(4) / (8.0 * e * i)
}

// =============================================================================
// UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_point_load_reactions_sum_to_load() {
        let (r1, r2) = simple_point_reactions(1000.0, 3.0, 10.0);
        assert_relative_eq!(r1, 700.0);
        assert_relative_eq!(r2, 300.0);
        assert_relative_eq!(r1 + r2, 1000.0);
    }

    #[test]
    fn test_point_load_max_moment_at_midspan() {
        // PL/4 for a = L/2
        assert_relative_eq!(simple_point_max_moment(1000.0, 5.0, 10.0), 2500.0);
    }

    #[test]
    fn test_uniform_load_formulas() {
        let (r1, r2) = simple_uniform_reactions(50.0, 8.0);
        assert_relative_eq!(r1, 200.0);
        assert_relative_eq!(r2, 200.0);
        assert_relative_eq!(simple_uniform_max_deflection(1.0, 1.0, 1.0, 1.0), 5.0 / 384.0);
    }

    #[test]
    fn test_cantilever_formulas() {
        assert_relative_eq!(cantilever_point_fixed_moment(100.0, 4.0), 400.0);
        assert_relative_eq!(cantilever_uniform_fixed_moment(20.0, 3.0), 90.0);
        assert_relative_eq!(cantilever_point_tip_deflection(3.0, 1.0, 1.0, 1.0), 1.0);
        assert_relative_eq!(cantilever_uniform_tip_deflection(8.0, 1.0, 1.0, 1.0), 1.0);
    }
}
