//! # Text Report
//!
//! Plain-text summary of one analysed case: inputs, extremes, reactions
//! and a note when the safety margin is low. The same text is what a PDF
//! or GUI results pane lays out.
//!
//! Magnitudes use `2.500*10^8` style scientific notation; positions use
//! four decimals.

use crate::calculations::{AnalysisInput, AnalysisResult, SupportType};
use crate::loads::{Direction, Load};
use crate::project::BeamCase;

/// Format as `2.500*10^8`; zero prints as `0`.
///
/// ```rust
/// use flexure_core::report::sci_notation;
///
/// assert_eq!(sci_notation(2.5e8), "2.500*10^8");
/// assert_eq!(sci_notation(-0.00125), "-1.250*10^-3");
/// assert_eq!(sci_notation(0.0), "0");
/// ```
pub fn sci_notation(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let mut exponent = value.abs().log10().floor() as i32;
    let mut base = value / 10f64.powi(exponent);
    // 9.9996 rounds to 10.000 at three decimals
    if (base.abs() * 1000.0).round() >= 10_000.0 {
        base /= 10.0;
        exponent += 1;
    }
    format!("{:.3}*10^{}", base, exponent)
}

fn describe_load(load: &Load) -> String {
    match load {
        Load::PointForce {
            position,
            magnitude,
            direction,
        } => {
            let dir = match direction {
                Direction::Down => "down",
                Direction::Up => "up",
            };
            format!("Point force {} {} at x = {:.4}", sci_notation(*magnitude), dir, position)
        }
        Load::PointMoment { position, magnitude } => {
            format!("Moment {} (ccw +) at x = {:.4}", sci_notation(*magnitude), position)
        }
        Load::Distributed {
            start,
            end,
            start_intensity,
            end_intensity,
        } if start_intensity == end_intensity => format!(
            "Uniform load {} from x = {:.4} to {:.4}",
            sci_notation(*start_intensity),
            start,
            end
        ),
        Load::Distributed {
            start,
            end,
            start_intensity,
            end_intensity,
        } => format!(
            "Linear load {} to {} from x = {:.4} to {:.4}",
            sci_notation(*start_intensity),
            sci_notation(*end_intensity),
            start,
            end
        ),
    }
}

/// Build the report text for a case and its result.
///
/// `input` is the resolved form of `case` that produced `result`.
pub fn text_report(case: &BeamCase, input: &AnalysisInput, result: &AnalysisResult) -> String {
    let mut out = String::new();
    let material = &input.material;
    let section = &input.section;
    let stress = &result.stress;

    out.push_str(&format!("BEAM ANALYSIS: {}\n\n", case.label));

    out.push_str("INPUT SUMMARY\n");
    out.push_str(&format!("  Beam Type: {}\n", result.layout.display_name()));
    out.push_str(&format!("  Length (L): {:.4}\n", input.beam.length));
    for support in input.supports.supports() {
        out.push_str(&format!("  Support: {} at x = {:.4}\n", support.kind, support.position));
    }
    if input.loads.is_empty() {
        out.push_str("  Loads: none\n");
    }
    for load in &input.loads {
        out.push_str(&format!("  Load: {}\n", describe_load(load)));
    }
    out.push_str(&format!("  Section: {}\n", case.section.describe()));
    out.push_str(&format!("  Material: {}\n", material.name));
    out.push_str(&format!(
        "  Young's Modulus (E): {}\n",
        sci_notation(material.elastic_modulus)
    ));
    if let Some(sy) = material.yield_strength {
        out.push_str(&format!("  Yield Strength (Sy): {}\n", sci_notation(sy)));
    }
    if let Some(su) = material.ultimate_strength {
        out.push_str(&format!("  Ultimate Strength (Su): {}\n", sci_notation(su)));
    }
    out.push_str(&format!(
        "  Area Moment of Inertia (I): {}\n",
        sci_notation(section.moment_of_inertia)
    ));
    out.push_str(&format!(
        "  Outer Fiber Distance (c): {}\n",
        sci_notation(section.extreme_fiber)
    ));

    out.push_str("\nRESULTS\n");
    let extremes = [
        ("Max |V| (Shear Force)", &result.max_shear),
        ("Max |M| (Bending Moment)", &result.max_moment),
        ("Max |δ| (Deflection)", &result.max_deflection),
    ];
    for (label, extremum) in extremes {
        out.push_str(&format!(
            "  {}:  {} at x = {:.4}\n",
            label,
            sci_notation(extremum.magnitude()),
            extremum.position
        ));
    }
    out.push_str(&format!(
        "  Max σ (Bending Stress):  {}\n",
        sci_notation(stress.bending_stress)
    ));
    let tau = stress.shear_stress.map(sci_notation).unwrap_or_else(|| "N/A".to_string());
    out.push_str(&format!("  Max τ (Shear Stress):  {}\n", tau));
    out.push_str(&format!(
        "  σ_eq ({}):  {}\n",
        stress.criterion,
        sci_notation(stress.equivalent_stress)
    ));
    match stress.safety_factor {
        Some(n) => out.push_str(&format!(
            "  n (Safety Factor = Sy/σ_eq):  {:.2}  {}\n",
            n,
            stress.status()
        )),
        None => out.push_str("  n (Safety Factor = Sy/σ_eq):  N/A (unstressed)\n"),
    }
    if let Some(nu) = stress.ultimate_safety_factor {
        out.push_str(&format!("  n_u (Su/σ_eq):  {:.2}\n", nu));
    }

    if !result.reactions.is_empty() {
        out.push_str("\nSUPPORT REACTIONS\n");
        for (i, reaction) in result.reactions.iter().enumerate() {
            out.push_str(&format!(
                "  R{} ({} at x = {:.4}): {}\n",
                i + 1,
                reaction.kind,
                reaction.position,
                sci_notation(reaction.force)
            ));
            if reaction.kind == SupportType::Fixed {
                out.push_str(&format!("  M{} (ccw +): {}\n", i + 1, sci_notation(reaction.moment)));
            }
        }
    }

    if result.is_low_margin() {
        out.push_str("\nNOTE\n");
        out.push_str(&format!(
            "  Safety factor is low (<{}). Consider increasing I, reducing load, shortening span,\n",
            result.low_margin_threshold
        ));
        out.push_str("  or choosing a stronger material (higher Sy).\n");
    }

    out
}
