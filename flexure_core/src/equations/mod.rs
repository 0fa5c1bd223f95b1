//! # Structural Mechanics Equations
//!
//! Closed-form formulas kept in one place so they can be checked against
//! references independently of the general solver.
//!
//! ## Modules
//!
//! - [`beam`] - Textbook single-load beam cases (reactions, moments, deflections)
//! - [`section`] - Cross-section properties (A, I, web areas, S)
//!
//! ## References
//!
//! - Roark's Formulas for Stress and Strain, 8th Edition
//! - Gere & Goodno, Mechanics of Materials

pub mod beam;
pub mod section;

// Re-export commonly used items
pub use beam::{
    cantilever_point_fixed_moment,
    cantilever_point_tip_deflection,
    cantilever_uniform_fixed_moment,
    cantilever_uniform_tip_deflection,
    simple_moment_reaction,
    simple_point_center_deflection,
    simple_point_max_moment,
    simple_point_reactions,
    simple_uniform_max_deflection,
    simple_uniform_max_moment,
    simple_uniform_reactions,
};

pub use section::{
    circle_area,
    circle_moment_of_inertia,
    ellipse_area,
    ellipse_moment_of_inertia,
    hollow_circle_area,
    hollow_circle_moment_of_inertia,
    i_beam_area,
    i_beam_moment_of_inertia,
    i_beam_web_area,
    rectangle_area,
    rectangle_moment_of_inertia,
    rectangular_tube_area,
    rectangular_tube_moment_of_inertia,
    rectangular_tube_web_area,
    section_modulus,
    thin_tube_area,
    thin_tube_moment_of_inertia,
};
