//! # Diagram Builder
//!
//! Shear, moment, slope and deflection as exact piecewise polynomials.
//!
//! ## Method
//!
//! 1. Every support, point load, couple and line-load end is an event. The
//!    sorted events split `[0, L]` into pieces.
//! 2. Within a piece the line load `q(x)` is linear, so
//!    `V = -∫q dx` is at most quadratic. At each event `V` jumps by the
//!    reactions (+R) and point forces (-P) applied there.
//! 3. `M = ∫V dx`, jumping by `-C` under a counterclockwise couple `C`
//!    (applied or fixed-end reaction).
//! 4. `θ = ∫M/EI dx + C1` and `y = ∫θ dx + C1·x + C2`, with `C1, C2` fixed by
//!    `y = 0` at every vertical support and `θ = 0` at a fixed support.
//!
//! After the sweep `V` and `M` just right of `x = L` must be zero again. A
//! residual there means the reactions did not balance the loads, which is
//! reported rather than papered over.
//!
//! ```text
//!   w ↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓          V ──╮                 M    ╭──╮
//!     △──────────────○              ╰───╮                ╭╯    ╰╮
//!                                        ╰──            ─╯        ╰─
//! ```

use serde::{Deserialize, Serialize};

use super::equilibrium::Reactions;
use super::supports::SupportConfig;
use super::Beam;
use crate::errors::{CalcError, CalcResult};
use crate::loads::{Load, LoadSet};
use crate::math::{solve_2x2, Extremum, PiecewisePolynomial, Polynomial};

/// Integration constants the elastic curve needs
const REQUIRED_BOUNDARY_CONDITIONS: usize = 2;

/// The four beam diagrams over `[0, L]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramSet {
    /// Shear force V(x)
    pub shear: PiecewisePolynomial,
    /// Bending moment M(x)
    pub moment: PiecewisePolynomial,
    /// Slope θ(x)
    pub slope: PiecewisePolynomial,
    /// Deflection y(x), positive upward
    pub deflection: PiecewisePolynomial,
}

impl DiagramSet {
    /// Largest |V| and where it occurs
    pub fn max_shear(&self) -> Extremum {
        self.shear.extreme_abs()
    }

    /// Largest |M| and where it occurs
    pub fn max_moment(&self) -> Extremum {
        self.moment.extreme_abs()
    }

    /// Largest |y| and where it occurs
    pub fn max_deflection(&self) -> Extremum {
        self.deflection.extreme_abs()
    }

    /// Piece boundaries shared by all four diagrams
    pub fn breakpoints(&self) -> Vec<f64> {
        self.shear.breakpoints()
    }
}

/// Sorted distinct event positions; always starts at 0 and ends at `L`.
///
/// Only identical positions are merged. Snapping nearby events together
/// would shift line-load ends, and a load shorter than the snap distance
/// would vanish from the diagrams.
fn event_breakpoints(beam: &Beam, supports: &SupportConfig, loads: &LoadSet) -> Vec<f64> {
    let mut interior: Vec<f64> = supports
        .supports()
        .iter()
        .map(|s| s.position)
        .chain(loads.event_positions())
        .filter(|x| *x > 0.0 && *x < beam.length)
        .collect();
    interior.sort_by(f64::total_cmp);
    interior.dedup();

    let mut points = Vec::with_capacity(interior.len() + 2);
    points.push(0.0);
    points.extend(interior);
    points.push(beam.length);
    points
}

/// Index of the breakpoint closest to `x`
fn nearest_index(points: &[f64], x: f64) -> usize {
    points
        .iter()
        .enumerate()
        .fold((0, f64::INFINITY), |(best, best_dist), (i, p)| {
            let dist = (p - x).abs();
            if dist < best_dist {
                (i, dist)
            } else {
                (best, best_dist)
            }
        })
        .0
}

/// Downward line-load intensity over `[start, end]`, in the local coordinate
fn line_load(loads: &LoadSet, start: f64, end: f64) -> Polynomial {
    let mid = 0.5 * (start + end);
    loads
        .iter()
        .filter_map(|load| match load {
            Load::Distributed {
                start: xa,
                end: xb,
                start_intensity,
                end_intensity,
            } if *xa < mid && mid < *xb => {
                let slope = (end_intensity - start_intensity) / (xb - xa);
                Some(Polynomial::linear(start_intensity + slope * (start - xa), slope))
            }
            _ => None,
        })
        .fold(Polynomial::zero(), |acc, q| &acc + &q)
}

/// Shear and moment diagrams from loads and solved reactions.
///
/// `tolerance` is relative to the load magnitudes and is used for the
/// closure check at `x = L`.
pub fn shear_and_moment(
    beam: &Beam,
    supports: &SupportConfig,
    loads: &LoadSet,
    reactions: &Reactions,
    tolerance: f64,
) -> CalcResult<(PiecewisePolynomial, PiecewisePolynomial)> {
    let points = event_breakpoints(beam, supports, loads);
    let piece_count = points.len() - 1;

    // Index i holds jumps at points[i]; the last slot is x = L.
    let mut shear_jumps = vec![0.0; points.len()];
    let mut moment_jumps = vec![0.0; points.len()];

    for reaction in reactions {
        let i = nearest_index(&points, reaction.position);
        shear_jumps[i] += reaction.force;
        moment_jumps[i] -= reaction.moment;
    }
    for load in loads {
        match load {
            Load::PointForce { position, .. } => {
                shear_jumps[nearest_index(&points, *position)] -= load.resultant();
            }
            Load::PointMoment { position, magnitude } => {
                moment_jumps[nearest_index(&points, *position)] -= magnitude;
            }
            Load::Distributed { .. } => {}
        }
    }

    let intensity: Vec<Polynomial> = points
        .windows(2)
        .map(|bounds| -&line_load(loads, bounds[0], bounds[1]))
        .collect();
    let shear = PiecewisePolynomial::from_breakpoints(&points, intensity)?.integrate(&shear_jumps);
    let moment = shear.integrate(&moment_jumps);

    // Closure: everything past x = L must cancel
    let force_scale = loads
        .magnitude_scale()
        .max(reactions.iter().map(|r| r.force.abs()).sum())
        .max(f64::MIN_POSITIVE);
    let end_shear = shear.evaluate_left(beam.length) + shear_jumps[piece_count];
    let end_moment = moment.evaluate_left(beam.length) + moment_jumps[piece_count];
    if end_shear.abs() > tolerance * force_scale {
        return Err(CalcError::internal(format!(
            "shear does not close at x = L (residual {:e})",
            end_shear
        )));
    }
    if end_moment.abs() > tolerance * force_scale * beam.length {
        return Err(CalcError::internal(format!(
            "moment does not close at x = L (residual {:e})",
            end_moment
        )));
    }

    Ok((shear, moment))
}

/// Slope and deflection by double integration of `M/EI`.
///
/// Fails with `UnderconstrainedDeflection` when the supports give fewer
/// than two displacement conditions.
pub fn elastic_curve(
    moment: &PiecewisePolynomial,
    supports: &SupportConfig,
    flexural_rigidity: f64,
) -> CalcResult<(PiecewisePolynomial, PiecewisePolynomial)> {
    if !flexural_rigidity.is_finite() || flexural_rigidity <= 0.0 {
        return Err(CalcError::invalid_input(
            "flexural_rigidity",
            flexural_rigidity.to_string(),
            "EI must be positive and finite",
        ));
    }

    let slope_base = moment.scale(1.0 / flexural_rigidity).integrate(&[]);
    let deflection_base = slope_base.integrate(&[]);

    // Each row: [coefficient of C1, coefficient of C2], rhs
    let mut conditions: Vec<([f64; 2], f64)> = Vec::new();
    for support in supports.supports() {
        if support.kind.restrains_vertical() {
            conditions.push(([support.position, 1.0], -deflection_base.evaluate(support.position)));
        }
        if support.kind.restrains_rotation() {
            conditions.push(([1.0, 0.0], -slope_base.evaluate(support.position)));
        }
    }

    let (first, second) = match conditions.as_slice() {
        [first, second] => (*first, *second),
        [] | [_] => {
            return Err(CalcError::UnderconstrainedDeflection {
                available: conditions.len(),
                required: REQUIRED_BOUNDARY_CONDITIONS,
            })
        }
        _ => {
            return Err(CalcError::IndeterminateStructure {
                unknowns: supports.unknowns(),
                equations: REQUIRED_BOUNDARY_CONDITIONS,
            })
        }
    };
    let [c1, c2] = solve_2x2([first.0, second.0], [first.1, second.1], "deflection boundary conditions")?;
    tracing::debug!("Elastic curve constants: C1 = {:e}, C2 = {:e}", c1, c2);

    Ok((slope_base.add_linear(0.0, c1), deflection_base.add_linear(c1, c2)))
}

/// Build all four diagrams for a solved beam.
///
/// # Example
///
/// ```rust
/// use flexure_core::calculations::{build_diagrams, solve_reactions, Beam, SupportConfig};
/// use flexure_core::loads::{Load, LoadSet};
///
/// let beam = Beam::new(8.0).unwrap();
/// let supports = SupportConfig::simply_supported(8.0);
/// let loads = LoadSet::new().with_load(Load::uniform_full(50.0, &beam));
/// let reactions = solve_reactions(&beam, &supports, &loads).unwrap();
///
/// let diagrams = build_diagrams(&beam, &supports, &loads, &reactions, 1.0e6, 1e-9).unwrap();
/// assert!((diagrams.max_moment().value - 400.0).abs() < 1e-9);
/// ```
pub fn build_diagrams(
    beam: &Beam,
    supports: &SupportConfig,
    loads: &LoadSet,
    reactions: &Reactions,
    flexural_rigidity: f64,
    tolerance: f64,
) -> CalcResult<DiagramSet> {
    beam.validate()?;
    let (shear, moment) = shear_and_moment(beam, supports, loads, reactions, tolerance)?;
    let (slope, deflection) = elastic_curve(&moment, supports, flexural_rigidity)?;

    tracing::debug!(
        "Built diagrams over {} pieces",
        shear.pieces().len()
    );

    Ok(DiagramSet {
        shear,
        moment,
        slope,
        deflection,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::equilibrium::solve_reactions;
    use crate::calculations::Support;
    use approx::assert_relative_eq;

    const TOL: f64 = 1e-9;

    fn diagrams_for(beam: &Beam, supports: &SupportConfig, loads: &LoadSet, ei: f64) -> DiagramSet {
        let reactions = solve_reactions(beam, supports, loads).unwrap();
        build_diagrams(beam, supports, loads, &reactions, ei, TOL).unwrap()
    }

    #[test]
    fn test_breakpoints_merge_coincident_events() {
        let beam = Beam::new(10.0).unwrap();
        let supports = SupportConfig::simply_supported(10.0);
        let loads = LoadSet::new()
            .with_load(Load::point(1.0, 5.0))
            .with_load(Load::uniform(1.0, 5.0, 10.0))
            .with_load(Load::moment(1.0, 0.0));
        assert_eq!(event_breakpoints(&beam, &supports, &loads), vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn test_short_line_load_next_to_point_load() {
        // 4 units of load spread over 4e-9, just right of the point load
        let beam = Beam::new(10.0).unwrap();
        let supports = SupportConfig::simply_supported(10.0);
        let (start, end) = (5.0 + 4e-9, 5.0 + 8e-9);
        let loads = LoadSet::new()
            .with_load(Load::point(100.0, 5.0))
            .with_load(Load::uniform(1.0e9, start, end));

        assert_eq!(event_breakpoints(&beam, &supports, &loads), vec![0.0, 5.0, start, end, 10.0]);

        let reactions = solve_reactions(&beam, &supports, &loads).unwrap();
        let d = build_diagrams(&beam, &supports, &loads, &reactions, 1.0, TOL).unwrap();
        let left = reactions.at_support(0).unwrap().force;
        let spread = loads.total_force() - 100.0;

        assert_relative_eq!(spread, 4.0, max_relative = 1e-6);
        assert_relative_eq!(d.shear.evaluate_right(5.0), left - 100.0, epsilon = 1e-9);
        assert_relative_eq!(d.shear.evaluate(end), left - 100.0 - spread, epsilon = 1e-9);
    }

    #[test]
    fn test_midspan_point_load() {
        let beam = Beam::new(10.0).unwrap();
        let supports = SupportConfig::simply_supported(10.0);
        let loads = LoadSet::new().with_load(Load::point(1000.0, 5.0));
        let d = diagrams_for(&beam, &supports, &loads, 1.0);

        assert_relative_eq!(d.shear.evaluate_left(5.0), 500.0, epsilon = 1e-9);
        assert_relative_eq!(d.shear.evaluate_right(5.0), -500.0, epsilon = 1e-9);
        assert_relative_eq!(d.moment.evaluate(5.0), 2500.0, epsilon = 1e-9);

        let peak = d.max_moment();
        assert_relative_eq!(peak.value, 2500.0, epsilon = 1e-9);
        assert_relative_eq!(peak.position, 5.0, epsilon = 1e-9);

        // δ = PL³/48EI downward
        let dip = d.max_deflection();
        assert_relative_eq!(dip.value, -1000.0 * 1000.0 / 48.0, max_relative = 1e-9);
        assert_relative_eq!(dip.position, 5.0, epsilon = 1e-6);
        assert_relative_eq!(d.deflection.evaluate(0.0), 0.0, epsilon = 1e-9);
        assert_relative_eq!(d.deflection.evaluate(10.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cantilever_uniform_load() {
        // δ_tip = wL⁴/8EI, θ_tip = wL³/6EI
        let beam = Beam::new(3.0).unwrap();
        let supports = SupportConfig::cantilever(3.0);
        let loads = LoadSet::new().with_load(Load::uniform_full(20.0, &beam));
        let ei = 5.0e4;
        let d = diagrams_for(&beam, &supports, &loads, ei);

        assert_relative_eq!(d.moment.evaluate(0.0), -90.0, epsilon = 1e-9);
        assert_relative_eq!(d.slope.evaluate(0.0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(d.deflection.evaluate(3.0), -20.0 * 81.0 / (8.0 * ei), max_relative = 1e-9);
        assert_relative_eq!(d.slope.evaluate(3.0), -20.0 * 27.0 / (6.0 * ei), max_relative = 1e-9);
    }

    #[test]
    fn test_right_cantilever_point_load() {
        let beam = Beam::new(4.0).unwrap();
        let supports = SupportConfig::cantilever_right(4.0);
        let loads = LoadSet::new().with_load(Load::point(100.0, 0.0));
        let d = diagrams_for(&beam, &supports, &loads, 1.0);

        assert_relative_eq!(d.shear.evaluate(2.0), -100.0, epsilon = 1e-9);
        assert_relative_eq!(d.moment.evaluate(4.0), -400.0, epsilon = 1e-9);
        assert_relative_eq!(d.slope.evaluate(4.0), 0.0, epsilon = 1e-9);
        // δ_tip = PL³/3EI
        assert_relative_eq!(d.deflection.evaluate(0.0), -6400.0 / 3.0, max_relative = 1e-9);
    }

    #[test]
    fn test_couple_produces_moment_jump() {
        let beam = Beam::new(10.0).unwrap();
        let supports = SupportConfig::simply_supported(10.0);
        let loads = LoadSet::new().with_load(Load::moment(500.0, 3.0));
        let d = diagrams_for(&beam, &supports, &loads, 1.0);

        assert_relative_eq!(d.moment.evaluate_left(3.0), 150.0, epsilon = 1e-9);
        assert_relative_eq!(d.moment.evaluate_right(3.0), -350.0, epsilon = 1e-9);
        assert_relative_eq!(d.shear.evaluate(3.0), 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_triangular_load_peak_moment() {
        // M_max = wL²/(9√3) at x = L/√3
        let beam = Beam::new(6.0).unwrap();
        let supports = SupportConfig::simply_supported(6.0);
        let loads = LoadSet::new().with_load(Load::linear(0.0, 90.0, 0.0, 6.0));
        let d = diagrams_for(&beam, &supports, &loads, 1.0);

        let peak = d.moment.max();
        assert_relative_eq!(peak.value, 90.0 * 36.0 / (9.0 * 3f64.sqrt()), max_relative = 1e-9);
        assert_relative_eq!(peak.position, 6.0 / 3f64.sqrt(), max_relative = 1e-9);
    }

    #[test]
    fn test_moment_slope_matches_shear() {
        let beam = Beam::new(9.0).unwrap();
        let supports = SupportConfig::new(vec![Support::pinned(1.5), Support::roller(7.0)]);
        let loads = LoadSet::new()
            .with_load(Load::point(1200.0, 0.5))
            .with_load(Load::linear(40.0, 300.0, 2.0, 9.0))
            .with_load(Load::moment(-250.0, 4.0));
        let d = diagrams_for(&beam, &supports, &loads, 2.0e5);

        let dm = d.moment.derivative();
        for x in [0.2, 1.0, 2.5, 3.9, 4.1, 6.0, 8.5] {
            assert_relative_eq!(dm.evaluate(x), d.shear.evaluate(x), epsilon = 1e-7);
        }
        assert_relative_eq!(d.deflection.evaluate(1.5), 0.0, epsilon = 1e-12);
        assert_relative_eq!(d.deflection.evaluate(7.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_free_free_is_underconstrained() {
        let beam = Beam::new(5.0).unwrap();
        let supports = SupportConfig::new(vec![Support::free(0.0), Support::free(5.0)]);
        let loads = LoadSet::new();
        let err = build_diagrams(&beam, &supports, &loads, &Reactions::default(), 1.0, TOL).unwrap_err();
        assert_eq!(
            err,
            CalcError::UnderconstrainedDeflection { available: 0, required: 2 }
        );
    }

    #[test]
    fn test_unbalanced_reactions_are_reported() {
        let beam = Beam::new(10.0).unwrap();
        let supports = SupportConfig::simply_supported(10.0);
        let loads = LoadSet::new().with_load(Load::point(1000.0, 5.0));
        let err = build_diagrams(&beam, &supports, &loads, &Reactions::default(), 1.0, TOL).unwrap_err();
        assert_eq!(err.error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_rejects_non_positive_rigidity() {
        let beam = Beam::new(10.0).unwrap();
        let supports = SupportConfig::simply_supported(10.0);
        let loads = LoadSet::new();
        let reactions = solve_reactions(&beam, &supports, &loads).unwrap();
        assert!(build_diagrams(&beam, &supports, &loads, &reactions, 0.0, TOL).is_err());
    }
}
