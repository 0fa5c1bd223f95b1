//! Dense polynomials in a local coordinate.
//!
//! Each diagram piece stores its polynomial in `t = x - x_start` so that
//! coefficients stay well conditioned no matter where the piece sits on
//! the beam. Coefficients are in ascending powers: `c[0] + c[1]·t + ...`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Neg};

/// Relative threshold below which a scaled coefficient counts as zero
/// when deciding the effective degree of a polynomial.
const DEGREE_TOLERANCE: f64 = 1e-12;

/// Bisection stops after this many halvings even if not converged.
const MAX_BISECTIONS: usize = 200;

/// Polynomial with coefficients in ascending powers of the local coordinate
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polynomial {
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Create from ascending coefficients. Trailing exact zeros are dropped.
    pub fn new(mut coeffs: Vec<f64>) -> Self {
        while coeffs.len() > 1 && coeffs.last() == Some(&0.0) {
            coeffs.pop();
        }
        if coeffs.is_empty() {
            coeffs.push(0.0);
        }
        Polynomial { coeffs }
    }

    /// The zero polynomial
    pub fn zero() -> Self {
        Polynomial { coeffs: vec![0.0] }
    }

    /// A constant polynomial
    pub fn constant(c: f64) -> Self {
        Polynomial::new(vec![c])
    }

    /// `c0 + c1·t`
    pub fn linear(c0: f64, c1: f64) -> Self {
        Polynomial::new(vec![c0, c1])
    }

    /// Coefficients in ascending powers
    pub fn coefficients(&self) -> &[f64] {
        &self.coeffs
    }

    /// Highest power with a nonzero coefficient (0 for constants)
    pub fn degree(&self) -> usize {
        self.coeffs
            .iter()
            .rposition(|c| *c != 0.0)
            .unwrap_or(0)
    }

    /// True when every coefficient is exactly zero
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(|c| *c == 0.0)
    }

    /// Evaluate at local coordinate `t` (Horner's scheme)
    pub fn evaluate(&self, t: f64) -> f64 {
        self.coeffs.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }

    /// First derivative with respect to `t`
    pub fn derivative(&self) -> Polynomial {
        if self.coeffs.len() <= 1 {
            return Polynomial::zero();
        }
        let coeffs = self
            .coeffs
            .iter()
            .enumerate()
            .skip(1)
            .map(|(power, c)| c * power as f64)
            .collect();
        Polynomial::new(coeffs)
    }

    /// Antiderivative whose value at `t = 0` is `constant`
    pub fn antiderivative(&self, constant: f64) -> Polynomial {
        let mut coeffs = Vec::with_capacity(self.coeffs.len() + 1);
        coeffs.push(constant);
        coeffs.extend(
            self.coeffs
                .iter()
                .enumerate()
                .map(|(power, c)| c / (power as f64 + 1.0)),
        );
        Polynomial::new(coeffs)
    }

    /// Multiply every coefficient by `factor`
    pub fn scale(&self, factor: f64) -> Polynomial {
        Polynomial::new(self.coeffs.iter().map(|c| c * factor).collect())
    }

    /// Effective degree over a span of length `h`: trailing terms whose
    /// contribution `|c_i|·h^i` is negligible against the largest term are
    /// ignored so round-off noise does not masquerade as curvature.
    fn effective_degree(&self, h: f64) -> Option<usize> {
        let h = h.abs().max(f64::MIN_POSITIVE);
        let magnitudes: Vec<f64> = self
            .coeffs
            .iter()
            .enumerate()
            .map(|(power, c)| c.abs() * h.powi(power as i32))
            .collect();
        let largest = magnitudes.iter().cloned().fold(0.0, f64::max);
        if largest == 0.0 {
            return None;
        }
        magnitudes
            .iter()
            .rposition(|m| *m > DEGREE_TOLERANCE * largest)
    }

    /// Real roots inside `[lo, hi]`, sorted ascending.
    ///
    /// Degrees one and two are solved in closed form. Higher degrees are
    /// split into monotone brackets at the roots of the derivative (found
    /// recursively) and each sign change is refined by bisection. A
    /// polynomial that is identically zero has no isolated roots and
    /// returns an empty list.
    pub fn real_roots(&self, lo: f64, hi: f64) -> Vec<f64> {
        if hi < lo {
            return Vec::new();
        }
        let degree = match self.effective_degree(hi.abs().max(lo.abs()).max(hi - lo)) {
            Some(d) => d,
            None => return Vec::new(),
        };

        let mut roots = match degree {
            0 => Vec::new(),
            1 => vec![-self.coeffs[0] / self.coeffs[1]],
            2 => quadratic_roots(self.coeffs[0], self.coeffs[1], self.coeffs[2]),
            _ => self.bracketed_roots(lo, hi),
        };

        roots.retain(|r| r.is_finite() && *r >= lo && *r <= hi);
        roots.sort_by(f64::total_cmp);
        roots.dedup_by(|a, b| (*a - *b).abs() <= 1e-12 * (1.0 + b.abs()));
        roots
    }

    fn bracketed_roots(&self, lo: f64, hi: f64) -> Vec<f64> {
        let mut nodes = vec![lo];
        nodes.extend(self.derivative().real_roots(lo, hi));
        nodes.push(hi);

        let scale = self
            .coeffs
            .iter()
            .enumerate()
            .map(|(power, c)| c.abs() * hi.abs().max(lo.abs()).max(1.0).powi(power as i32))
            .fold(0.0, f64::max);
        let touches_zero = |v: f64| v.abs() <= DEGREE_TOLERANCE * scale;

        let mut roots = Vec::new();
        for pair in nodes.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (fa, fb) = (self.evaluate(a), self.evaluate(b));
            if touches_zero(fa) {
                roots.push(a);
            } else if fa * fb < 0.0 {
                roots.push(self.bisect(a, b, fa));
            }
        }
        if touches_zero(self.evaluate(hi)) {
            roots.push(hi);
        }
        roots
    }

    fn bisect(&self, mut a: f64, mut b: f64, mut fa: f64) -> f64 {
        for _ in 0..MAX_BISECTIONS {
            let mid = 0.5 * (a + b);
            if mid <= a || mid >= b {
                break;
            }
            let fm = self.evaluate(mid);
            if fm == 0.0 {
                return mid;
            }
            if fa * fm < 0.0 {
                b = mid;
            } else {
                a = mid;
                fa = fm;
            }
        }
        0.5 * (a + b)
    }
}

/// Roots of `c0 + c1·t + c2·t²` using the cancellation-free form.
fn quadratic_roots(c0: f64, c1: f64, c2: f64) -> Vec<f64> {
    let disc = c1 * c1 - 4.0 * c2 * c0;
    let tolerance = 1e-12 * (c1 * c1 + (4.0 * c2 * c0).abs());
    if disc < -tolerance {
        return Vec::new();
    }
    if disc <= tolerance {
        return vec![-c1 / (2.0 * c2)];
    }
    // disc > 0 here, so q is nonzero (signum(0.0) is 1.0)
    let q = -0.5 * (c1 + c1.signum() * disc.sqrt());
    vec![q / c2, c0 / q]
}

impl Add for &Polynomial {
    type Output = Polynomial;

    fn add(self, other: &Polynomial) -> Polynomial {
        let len = self.coeffs.len().max(other.coeffs.len());
        let coeffs = (0..len)
            .map(|i| self.coeffs.get(i).unwrap_or(&0.0) + other.coeffs.get(i).unwrap_or(&0.0))
            .collect();
        Polynomial::new(coeffs)
    }
}

impl Neg for &Polynomial {
    type Output = Polynomial;

    fn neg(self) -> Polynomial {
        self.scale(-1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_evaluate_and_degree() {
        let p = Polynomial::new(vec![1.0, -3.0, 2.0, 0.0]);
        assert_eq!(p.degree(), 2);
        assert_relative_eq!(p.evaluate(2.0), 3.0);
        assert_eq!(Polynomial::zero().degree(), 0);
        assert!(Polynomial::new(vec![]).is_zero());
    }

    #[test]
    fn test_derivative_and_antiderivative() {
        // 5 + 2t + 3t²
        let p = Polynomial::new(vec![5.0, 2.0, 3.0]);
        assert_eq!(p.derivative().coefficients(), &[2.0, 6.0]);

        let integral = p.antiderivative(7.0);
        assert_relative_eq!(integral.evaluate(0.0), 7.0);
        // 7 + 5t + t² + t³ at t=2
        assert_relative_eq!(integral.evaluate(2.0), 7.0 + 10.0 + 4.0 + 8.0);
        assert_eq!(integral.derivative(), p);
    }

    #[test]
    fn test_add_and_neg() {
        let a = Polynomial::linear(1.0, 2.0);
        let b = Polynomial::new(vec![0.0, -2.0, 4.0]);
        let sum = &a + &b;
        assert_eq!(sum.coefficients(), &[1.0, 0.0, 4.0]);
        assert_eq!((-&a).coefficients(), &[-1.0, -2.0]);
    }

    #[test]
    fn test_linear_and_quadratic_roots() {
        assert_eq!(Polynomial::linear(-4.0, 2.0).real_roots(0.0, 10.0), vec![2.0]);
        assert!(Polynomial::linear(-4.0, 2.0).real_roots(3.0, 10.0).is_empty());

        // (t - 1)(t - 3)
        let roots = Polynomial::new(vec![3.0, -4.0, 1.0]).real_roots(0.0, 10.0);
        assert_eq!(roots.len(), 2);
        assert_relative_eq!(roots[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(roots[1], 3.0, epsilon = 1e-12);

        // No real roots
        assert!(Polynomial::new(vec![1.0, 0.0, 1.0]).real_roots(-5.0, 5.0).is_empty());
    }

    #[test]
    fn test_double_root_is_found() {
        // (t - 2)²
        let roots = Polynomial::new(vec![4.0, -4.0, 1.0]).real_roots(0.0, 5.0);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_quartic_roots_by_bracketing() {
        // (t-0.5)(t-1.5)(t-2.5)(t-3.5) expanded
        let p = Polynomial::new(vec![6.5625, -22.0, 21.5, -8.0, 1.0]);
        let roots = p.real_roots(0.0, 4.0);
        assert_eq!(roots.len(), 4);
        for (root, expected) in roots.iter().zip([0.5, 1.5, 2.5, 3.5]) {
            assert_relative_eq!(*root, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_noise_does_not_raise_degree() {
        // A tiny cubic term left over from cancellation should not invent roots
        let p = Polynomial::new(vec![-1.0, 1.0, 0.0, 1e-20]);
        let roots = p.real_roots(0.0, 10.0);
        assert_eq!(roots.len(), 1);
        assert_relative_eq!(roots[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let p = Polynomial::linear(1.5, -2.0);
        assert_eq!(serde_json::to_string(&p).unwrap(), "[1.5,-2.0]");
    }
}
