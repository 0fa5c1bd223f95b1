//! # Numeric Utilities
//!
//! Building blocks shared by the solver and the diagram builder.
//!
//! - [`polynomial`] - Dense polynomials with exact low-degree root finding
//! - [`piecewise`] - Contiguous piecewise polynomials (the diagram type)
//! - [`linear`] - Closed-form small linear solves

pub mod linear;
pub mod piecewise;
pub mod polynomial;

pub use linear::solve_2x2;
pub use piecewise::{Extremum, Interval, Piece, PiecewisePolynomial, Side};
pub use polynomial::Polynomial;
