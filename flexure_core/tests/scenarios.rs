//! End-to-end checks of the analysis against hand results and the
//! closed-form formulas in `flexure_core::equations::beam`.

use approx::assert_relative_eq;

use flexure_core::calculations::{
    analyze, analyze_with_settings, AnalysisInput, AnalysisResult, AnalysisSettings, Beam, FailureCriterion,
    Support, SupportConfig, SupportType,
};
use flexure_core::equations::beam as reference;
use flexure_core::loads::{Load, LoadSet};
use flexure_core::materials::{BuiltinMaterials, Material, MaterialLibrary};
use flexure_core::sections::{SectionLibrary, SectionProperties, StandardSections};
use flexure_core::CalcError;

const E: f64 = 2.0e11;
const I: f64 = 8.0e-6;

fn steel() -> Material {
    Material::new("Steel", E).with_yield(2.5e8)
}

fn section() -> SectionProperties {
    SectionProperties::explicit(I, 0.05).unwrap().with_area(2.0e-3)
}

fn run(beam: &Beam, supports: &SupportConfig, loads: &LoadSet) -> AnalysisResult {
    analyze(beam, supports, loads, &section(), &steel()).unwrap()
}

/// ΣF and ΣM about 0 of loads plus reactions
fn assert_equilibrium(loads: &LoadSet, result: &AnalysisResult) {
    let (force, moment) = result.reactions.residuals(loads);
    let scale = loads.magnitude_scale().max(1.0);
    assert!(force.abs() <= 1e-9 * scale, "ΣF = {}", force);
    assert!(moment.abs() <= 1e-8 * scale, "ΣM = {}", moment);
}

/// y = 0 at every vertical support, θ = 0 at a fixed one
fn assert_boundary_conditions(supports: &SupportConfig, result: &AnalysisResult) {
    let scale = result.max_deflection.magnitude().max(1e-12);
    for support in supports.supports() {
        if support.kind.restrains_vertical() {
            let y = result.diagrams.deflection.evaluate(support.position);
            assert!(y.abs() <= 1e-9 * scale, "y({}) = {}", support.position, y);
        }
        if support.kind.restrains_rotation() {
            let theta = result.diagrams.slope.evaluate(support.position);
            assert!(theta.abs() <= 1e-9 * scale.max(1.0), "θ({}) = {}", support.position, theta);
        }
    }
}

#[test]
fn simple_beam_midspan_point_load() {
    let beam = Beam::new(10.0).unwrap();
    let supports = SupportConfig::simply_supported(10.0);
    let loads = LoadSet::new().with_load(Load::point(1000.0, 5.0));
    let result = run(&beam, &supports, &loads);

    let (r1, r2) = reference::simple_point_reactions(1000.0, 5.0, 10.0);
    assert_relative_eq!(result.reactions.at_support(0).unwrap().force, r1, epsilon = 1e-9);
    assert_relative_eq!(result.reactions.at_support(1).unwrap().force, r2, epsilon = 1e-9);
    assert_relative_eq!(r1, 500.0);

    assert_relative_eq!(result.max_moment.value, 2500.0, epsilon = 1e-9);
    assert_relative_eq!(result.max_moment.position, 5.0, epsilon = 1e-9);
    assert_relative_eq!(result.diagrams.shear.evaluate_left(5.0), 500.0, epsilon = 1e-9);
    assert_relative_eq!(result.diagrams.shear.evaluate_right(5.0), -500.0, epsilon = 1e-9);

    let delta = reference::simple_point_center_deflection(1000.0, 10.0, E, I);
    assert_relative_eq!(result.diagrams.deflection.evaluate(5.0), -delta, max_relative = 1e-9);

    assert_equilibrium(&loads, &result);
    assert_boundary_conditions(&supports, &result);
}

#[test]
fn cantilever_tip_load() {
    let beam = Beam::new(4.0).unwrap();
    let supports = SupportConfig::cantilever(4.0);
    let loads = LoadSet::new().with_load(Load::point(100.0, 4.0));
    let result = run(&beam, &supports, &loads);

    let fixed = result.reactions.at_support(0).unwrap();
    assert_eq!(fixed.kind, SupportType::Fixed);
    assert_relative_eq!(fixed.force, 100.0, epsilon = 1e-9);
    assert_relative_eq!(fixed.moment, reference::cantilever_point_fixed_moment(100.0, 4.0), epsilon = 1e-9);

    // M(x) = -100 (4 - x)
    for x in [0.0, 1.0, 2.5, 3.99, 4.0] {
        assert_relative_eq!(result.diagrams.moment.evaluate(x), -100.0 * (4.0 - x), epsilon = 1e-9);
    }
    assert_relative_eq!(
        result.max_deflection.value,
        -reference::cantilever_point_tip_deflection(100.0, 4.0, E, I),
        max_relative = 1e-9
    );
    assert_relative_eq!(result.max_deflection.position, 4.0, epsilon = 1e-9);

    assert_equilibrium(&loads, &result);
    assert_boundary_conditions(&supports, &result);
}

#[test]
fn uniform_load_on_simple_beam() {
    let beam = Beam::new(8.0).unwrap();
    let supports = SupportConfig::simply_supported(8.0);
    let loads = LoadSet::new().with_load(Load::uniform_full(50.0, &beam));
    let result = run(&beam, &supports, &loads);

    assert_relative_eq!(loads.total_force(), 400.0);
    let (r1, r2) = reference::simple_uniform_reactions(50.0, 8.0);
    assert_relative_eq!(result.reactions.at_support(0).unwrap().force, r1, epsilon = 1e-9);
    assert_relative_eq!(result.reactions.at_support(1).unwrap().force, r2, epsilon = 1e-9);

    assert_relative_eq!(result.max_moment.value, reference::simple_uniform_max_moment(50.0, 8.0), epsilon = 1e-9);
    assert_relative_eq!(result.max_moment.position, 4.0, epsilon = 1e-9);
    assert_relative_eq!(
        result.max_deflection.value,
        -reference::simple_uniform_max_deflection(50.0, 8.0, E, I),
        max_relative = 1e-9
    );

    assert_equilibrium(&loads, &result);
    assert_boundary_conditions(&supports, &result);
}

#[test]
fn cantilever_uniform_load() {
    let beam = Beam::new(3.0).unwrap();
    let supports = SupportConfig::cantilever(3.0);
    let loads = LoadSet::new().with_load(Load::uniform_full(20.0, &beam));
    let result = run(&beam, &supports, &loads);

    assert_relative_eq!(
        result.reactions.at_support(0).unwrap().moment,
        reference::cantilever_uniform_fixed_moment(20.0, 3.0),
        epsilon = 1e-9
    );
    assert_relative_eq!(
        result.diagrams.deflection.evaluate(3.0),
        -reference::cantilever_uniform_tip_deflection(20.0, 3.0, E, I),
        max_relative = 1e-9
    );
}

#[test]
fn applied_couple_on_simple_beam() {
    let beam = Beam::new(10.0).unwrap();
    let supports = SupportConfig::simply_supported(10.0);
    let loads = LoadSet::new().with_load(Load::moment(500.0, 3.0));
    let result = run(&beam, &supports, &loads);

    let r = reference::simple_moment_reaction(500.0, 10.0);
    assert_relative_eq!(result.reactions.at_support(0).unwrap().force, r, epsilon = 1e-9);
    assert_relative_eq!(result.reactions.at_support(1).unwrap().force, -r, epsilon = 1e-9);

    // M jumps by -C at the couple
    let jump = result.diagrams.moment.evaluate_right(3.0) - result.diagrams.moment.evaluate_left(3.0);
    assert_relative_eq!(jump, -500.0, epsilon = 1e-9);

    assert_equilibrium(&loads, &result);
    assert_boundary_conditions(&supports, &result);
}

#[test]
fn moment_slope_equals_shear_away_from_couples() {
    let beam = Beam::new(9.0).unwrap();
    let supports = SupportConfig::new(vec![
        Support::free(0.0),
        Support::pinned(1.5),
        Support::roller(7.0),
        Support::free(9.0),
    ]);
    let loads = LoadSet::new()
        .with_load(Load::point(1200.0, 0.0))
        .with_load(Load::linear(40.0, 300.0, 2.0, 9.0))
        .with_load(Load::moment(-250.0, 4.0))
        .with_load(Load::uniform(75.0, 0.5, 6.0));
    let result = run(&beam, &supports, &loads);

    let dm = result.diagrams.moment.derivative();
    for i in 1..90 {
        let x = i as f64 * 0.1 + 0.0137;
        if result.diagrams.breakpoints().iter().any(|b| (b - x).abs() < 1e-6) {
            continue;
        }
        assert_relative_eq!(dm.evaluate(x), result.diagrams.shear.evaluate(x), epsilon = 1e-6);
    }

    assert_equilibrium(&loads, &result);
    assert_boundary_conditions(&supports, &result);
}

#[test]
fn right_fixed_cantilever() {
    let beam = Beam::new(5.0).unwrap();
    let supports = SupportConfig::cantilever_right(5.0);
    let loads = LoadSet::new()
        .with_load(Load::uniform(30.0, 0.0, 5.0))
        .with_load(Load::point_up(20.0, 1.0));
    let result = run(&beam, &supports, &loads);

    assert_equilibrium(&loads, &result);
    assert_boundary_conditions(&supports, &result);
    assert_relative_eq!(result.diagrams.moment.evaluate(0.0), 0.0, epsilon = 1e-9);
}

#[test]
fn free_free_beam_is_rejected() {
    let beam = Beam::new(5.0).unwrap();
    let supports = SupportConfig::new(vec![Support::free(0.0), Support::free(5.0)]);
    let loads = LoadSet::new().with_load(Load::point(10.0, 2.5));
    let err = analyze(&beam, &supports, &loads, &section(), &steel()).unwrap_err();
    assert!(matches!(
        err,
        CalcError::UnstableStructure { .. } | CalcError::UnderconstrainedDeflection { .. }
    ));
}

#[test]
fn indeterminate_layouts_are_rejected() {
    let beam = Beam::new(6.0).unwrap();
    let loads = LoadSet::new().with_load(Load::point(10.0, 3.0));
    let layouts = [
        SupportConfig::new(vec![Support::fixed(0.0), Support::roller(6.0)]),
        SupportConfig::new(vec![Support::pinned(0.0), Support::roller(3.0), Support::roller(6.0)]),
    ];
    for supports in layouts {
        let err = analyze(&beam, &supports, &loads, &section(), &steel()).unwrap_err();
        assert_eq!(err.error_code(), "INDETERMINATE_STRUCTURE");
    }
}

#[test]
fn shear_governs_short_deep_span() {
    let beam = Beam::new(0.2).unwrap();
    let supports = SupportConfig::simply_supported(0.2);
    let loads = LoadSet::new().with_load(Load::point(1000.0, 0.1));
    let section = StandardSections.lookup_section("rectangle", &[0.1, 1.0]).unwrap();
    let material = Material::new("Soft", 1.0e9).with_yield(6000.0);

    let result = analyze(&beam, &supports, &loads, &section, &material).unwrap();
    assert_relative_eq!(result.stress.bending_stress, 3000.0, max_relative = 1e-9);
    assert_relative_eq!(result.stress.shear_stress.unwrap(), 7500.0, max_relative = 1e-9);
    assert_relative_eq!(result.stress.safety_factor.unwrap(), 0.8, max_relative = 1e-9);
    assert!(!result.passes());
}

#[test]
fn low_safety_factor_is_reported_not_thrown() {
    // I/c chosen so that σ = |M|max = 300 with Sy = 250
    let beam = Beam::new(10.0).unwrap();
    let supports = SupportConfig::simply_supported(10.0);
    let loads = LoadSet::new().with_load(Load::point(120.0, 5.0));
    let section = SectionProperties::explicit(1.0, 1.0).unwrap();
    let material = Material::new("Test", 2.0e5).with_yield(250.0);

    let result = analyze(&beam, &supports, &loads, &section, &material).unwrap();
    assert_relative_eq!(result.stress.bending_stress, 300.0, epsilon = 1e-9);
    assert_relative_eq!(result.stress.safety_factor.unwrap(), 250.0 / 300.0, epsilon = 1e-9);
    assert!(!result.passes());
    assert!(result.is_low_margin());
}

#[test]
fn repeated_analysis_is_identical() {
    let input = AnalysisInput {
        beam: Beam::new(7.0).unwrap(),
        supports: SupportConfig::overhang(1.0, 6.0, 7.0),
        loads: LoadSet::new()
            .with_load(Load::linear(0.0, 120.0, 0.0, 7.0))
            .with_load(Load::point(300.0, 3.3))
            .with_load(Load::moment(45.0, 6.5)),
        section: StandardSections.lookup_section("I-Beam (bf,tf,tw,h)", &[0.1, 0.01, 0.006, 0.2]).unwrap(),
        material: BuiltinMaterials.lookup_material("Carbon Steel A36").unwrap(),
    };
    let settings = AnalysisSettings {
        criterion: FailureCriterion::VonMises,
        ..AnalysisSettings::default()
    };
    let first = analyze_with_settings(&input, &settings).unwrap();
    let second = analyze_with_settings(&input, &settings).unwrap();
    assert_eq!(first, second);

    let json = serde_json::to_string(&first).unwrap();
    let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.reactions.len(), first.reactions.len());
    for (a, b) in parsed.reactions.iter().zip(first.reactions.iter()) {
        assert_relative_eq!(a.force, b.force, max_relative = 1e-12);
    }
    assert_equilibrium(&input.loads, &first);
    assert_boundary_conditions(&input.supports, &first);
}
