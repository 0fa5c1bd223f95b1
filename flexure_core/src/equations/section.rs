//! # Cross-Section Property Formulas
//!
//! Closed-form geometric properties of the standard cross-sections. These
//! feed the bending stress σ = M·c/I, the shear stress τ = k·V/A and the
//! flexural rigidity EI.
//!
//! ## Notation
//!
//! - `A` = Cross-sectional area
//! - `I` = Moment of inertia (second moment of area) about the bending axis
//! - `c` = Distance from the neutral axis to the extreme fiber
//! - `S` = Section modulus (I/c)
//!
//! All functions take dimensions in one consistent length unit and do not
//! validate them; see [`crate::sections`] for checked construction.
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition, Appendix A
//! - Gere & Goodno, Mechanics of Materials, Appendix E

use std::f64::consts::PI;

// =============================================================================
// SOLID RECTANGLE
// =============================================================================

/// Area of a solid rectangle
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │         │
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// A = b × h
#[inline]
pub fn rectangle_area(b: f64, h: f64) -> f64 {
    b * h
}

/// Moment of inertia of a solid rectangle about its horizontal centroidal axis
///
/// ```text
///     ┌─────────┐
///     │         │
///   h │ ════════│ ← neutral axis at h/2
///     │         │
///     └─────────┘
///          b
/// ```
///
/// # Formula
/// I = bh³/12
///
/// # Example
/// ```rust
/// use flexure_core::equations::section::rectangle_moment_of_inertia;
///
/// // 50 mm x 100 mm bar, in metres
/// let i = rectangle_moment_of_inertia(0.05, 0.1);
/// assert!((i - 4.1667e-6).abs() < 1e-9);
/// ```
#[inline]
pub fn rectangle_moment_of_inertia(b: f64, h: f64) -> f64 {
    b * h.powi(3) / 12.0
}

// =============================================================================
// SOLID AND HOLLOW CIRCLES
// =============================================================================

/// Area of a solid circle of diameter `d`
///
/// # Formula
/// A = πD²/4
#[inline]
pub fn circle_area(d: f64) -> f64 {
    PI * d * d / 4.0
}

/// Moment of inertia of a solid circle of diameter `d`
///
/// ```text
///        ╭───╮
///      ╱       ╲
///     │ ═══════ │ ← neutral axis through the centre
///      ╲       ╱
///        ╰───╯
///        ← D →
/// ```
///
/// # Formula
/// I = πD⁴/64
#[inline]
pub fn circle_moment_of_inertia(d: f64) -> f64 {
    PI * d.powi(4) / 64.0
}

/// Area of a hollow circle (pipe) with outer diameter `d_o`, inner `d_i`
///
/// # Formula
/// A = π(Do² − Di²)/4
#[inline]
pub fn hollow_circle_area(d_o: f64, d_i: f64) -> f64 {
    PI * (d_o * d_o - d_i * d_i) / 4.0
}

/// Moment of inertia of a hollow circle
///
/// # Formula
/// I = π(Do⁴ − Di⁴)/64
#[inline]
pub fn hollow_circle_moment_of_inertia(d_o: f64, d_i: f64) -> f64 {
    PI * (d_o.powi(4) - d_i.powi(4)) / 64.0
}

/// Area of a thin-walled round tube using the thin-wall approximation
///
/// # Formula
/// A ≈ π·Do·t
#[inline]
pub fn thin_tube_area(d_o: f64, t: f64) -> f64 {
    PI * d_o * t
}

/// Moment of inertia of a thin-walled round tube
///
/// Thin-wall approximation, accurate when t ≪ Do:
///
/// # Formula
/// I ≈ (π/8)·Do³·t
#[inline]
pub fn thin_tube_moment_of_inertia(d_o: f64, t: f64) -> f64 {
    PI / 8.0 * d_o.powi(3) * t
}

// =============================================================================
// RECTANGULAR TUBE
// =============================================================================

/// Area of a rectangular tube with uniform wall thickness `t`
///
/// ```text
///     ┌─────────┐
///     │ ┌─────┐ │
///   h │ │     │ │
///     │ └─────┘ │
///     └─────────┘
///          b      wall t
/// ```
///
/// # Formula
/// A = bh − (b − 2t)(h − 2t)
#[inline]
pub fn rectangular_tube_area(b: f64, h: f64, t: f64) -> f64 {
    b * h - (b - 2.0 * t) * (h - 2.0 * t)
}

/// Moment of inertia of a rectangular tube
///
/// # Formula
/// I = [bh³ − (b − 2t)(h − 2t)³]/12
#[inline]
pub fn rectangular_tube_moment_of_inertia(b: f64, h: f64, t: f64) -> f64 {
    (b * h.powi(3) - (b - 2.0 * t) * (h - 2.0 * t).powi(3)) / 12.0
}

/// Shear area of a rectangular tube: the two side walls
///
/// # Formula
/// A_web = 2·t·(h − 2t)
#[inline]
pub fn rectangular_tube_web_area(h: f64, t: f64) -> f64 {
    2.0 * t * (h - 2.0 * t)
}

// =============================================================================
// SOLID ELLIPSE
// =============================================================================

/// Area of a solid ellipse with semi-axes `a` (horizontal) and `b` (vertical)
///
/// # Formula
/// A = π·a·b
#[inline]
pub fn ellipse_area(a: f64, b: f64) -> f64 {
    PI * a * b
}

/// Moment of inertia of a solid ellipse about its horizontal axis
///
/// # Formula
/// I = (π/4)·a·b³
#[inline]
pub fn ellipse_moment_of_inertia(a: f64, b: f64) -> f64 {
    PI / 4.0 * a * b.powi(3)
}

// =============================================================================
// DOUBLY SYMMETRIC I-BEAM
// =============================================================================

/// Area of a doubly symmetric I-beam
///
/// ```text
///     ┌─────────────┐  ─┬─ tf
///     └────┐   ┌────┘   │
///          │   │        │
///          │tw │        h
///          │   │        │
///     ┌────┘   └────┐   │
///     └─────────────┘  ─┴─
///           bf
/// ```
///
/// # Formula
/// A = 2·bf·tf + tw·hw, with hw = h − 2tf
#[inline]
pub fn i_beam_area(bf: f64, tf: f64, tw: f64, h: f64) -> f64 {
    2.0 * bf * tf + tw * (h - 2.0 * tf)
}

/// Moment of inertia of a doubly symmetric I-beam about its strong axis
///
/// Parallel-axis theorem on both flanges plus the web:
///
/// # Formula
/// I = 2[bf·tf³/12 + bf·tf·(h/2 − tf/2)²] + tw·hw³/12
///
/// # Example
/// ```rust
/// use flexure_core::equations::section::i_beam_moment_of_inertia;
///
/// let i = i_beam_moment_of_inertia(100.0, 10.0, 6.0, 200.0);
/// // flanges: 2 × (8333.3 + 1000 × 95²) = 18_066_666.7, web: 6 × 180³/12 = 2_916_000
/// assert!((i - 20_982_666.7).abs() < 1.0);
/// ```
#[inline]
pub fn i_beam_moment_of_inertia(bf: f64, tf: f64, tw: f64, h: f64) -> f64 {
    let hw = h - 2.0 * tf;
    let flange = bf * tf.powi(3) / 12.0 + bf * tf * (h / 2.0 - tf / 2.0).powi(2);
    2.0 * flange + tw * hw.powi(3) / 12.0
}

/// Shear area of an I-beam: the clear web
///
/// # Formula
/// A_web = tw·(h − 2tf)
#[inline]
pub fn i_beam_web_area(tf: f64, tw: f64, h: f64) -> f64 {
    tw * (h - 2.0 * tf)
}

// =============================================================================
// GENERAL
// =============================================================================

/// Elastic section modulus S = I/c
///
/// σ_max = M/S for any section.
#[inline]
pub fn section_modulus(moment_of_inertia: f64, extreme_fiber: f64) -> f64 {
    moment_of_inertia / extreme_fiber
}

// =============================================================================
// UNIT TESTS
// =============================================================================
