//! Piecewise polynomial diagrams.
//!
//! A [`PiecewisePolynomial`] is an ordered run of pieces that tile the beam
//! contiguously. Every piece keeps its polynomial in the local coordinate
//! `t = x - start`. Shear, moment, slope and deflection all use this one
//! representation, so evaluation, differentiation and integration are the
//! same array operations regardless of which diagram is involved.
//!
//! ## Limits at breakpoints
//!
//! Diagrams may jump at a breakpoint (shear under a point load, moment
//! under a couple). [`PiecewisePolynomial::evaluate`] returns the
//! right-hand limit, which includes everything applied at that position.
//! At the far end of the domain there is no piece to the right, so the
//! left-hand limit is returned there. Both limits are always available
//! through [`Side`].

use serde::{Deserialize, Serialize};

use super::polynomial::Polynomial;
use crate::errors::{CalcError, CalcResult};

/// Closed interval `[start, end]` on the beam axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn new(start: f64, end: f64) -> Self {
        Interval { start, end }
    }

    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }
}

/// One piece of a diagram: a polynomial over an interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    pub interval: Interval,
    /// Polynomial in `t = x - interval.start`
    pub poly: Polynomial,
}

impl Piece {
    /// Value at absolute position `x`
    pub fn value_at(&self, x: f64) -> f64 {
        self.poly.evaluate(x - self.interval.start)
    }

    /// Value at the right end of the piece (left-hand limit at `end`)
    pub fn end_value(&self) -> f64 {
        self.poly.evaluate(self.interval.length())
    }
}

/// Which one-sided limit to take at a discontinuity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// A signed extreme value and where it occurs
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extremum {
    /// Signed value of the diagram at the extreme point
    pub value: f64,
    /// Position along the beam
    pub position: f64,
}

impl Extremum {
    /// Magnitude of the extreme value
    pub fn magnitude(&self) -> f64 {
        self.value.abs()
    }
}

/// Contiguous piecewise polynomial over `[pieces[0].start, pieces[n-1].end]`
///
/// Serialized as its list of pieces; deserialization goes through
/// [`PiecewisePolynomial::new`] so the same checks apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Piece>", into = "Vec<Piece>")]
pub struct PiecewisePolynomial {
    pieces: Vec<Piece>,
}

impl TryFrom<Vec<Piece>> for PiecewisePolynomial {
    type Error = CalcError;

    fn try_from(pieces: Vec<Piece>) -> Result<Self, Self::Error> {
        PiecewisePolynomial::new(pieces)
    }
}

impl From<PiecewisePolynomial> for Vec<Piece> {
    fn from(function: PiecewisePolynomial) -> Self {
        function.pieces
    }
}

impl PiecewisePolynomial {
    /// Build from explicit pieces.
    ///
    /// Pieces must be non-empty, each with `start < end`, and each must start
    /// exactly where the previous one ended.
    pub fn new(pieces: Vec<Piece>) -> CalcResult<Self> {
        if pieces.is_empty() {
            return Err(CalcError::internal("piecewise polynomial needs at least one piece"));
        }
        for (i, piece) in pieces.iter().enumerate() {
            if !(piece.interval.start < piece.interval.end) {
                return Err(CalcError::internal(format!(
                    "piece {} has empty interval [{}, {}]",
                    i, piece.interval.start, piece.interval.end
                )));
            }
        }
        for pair in pieces.windows(2) {
            if pair[0].interval.end != pair[1].interval.start {
                return Err(CalcError::internal(format!(
                    "pieces are not contiguous at {} / {}",
                    pair[0].interval.end, pair[1].interval.start
                )));
            }
        }
        Ok(PiecewisePolynomial { pieces })
    }

    /// Build from sorted breakpoints and one polynomial per gap.
    pub fn from_breakpoints(breakpoints: &[f64], polys: Vec<Polynomial>) -> CalcResult<Self> {
        if breakpoints.len() != polys.len() + 1 {
            return Err(CalcError::internal(format!(
                "{} breakpoints cannot bound {} pieces",
                breakpoints.len(),
                polys.len()
            )));
        }
        let pieces = breakpoints
            .windows(2)
            .zip(polys)
            .map(|(bounds, poly)| Piece {
                interval: Interval::new(bounds[0], bounds[1]),
                poly,
            })
            .collect();
        PiecewisePolynomial::new(pieces)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Interval covered by the whole function
    pub fn domain(&self) -> Interval {
        Interval::new(
            self.pieces[0].interval.start,
            self.pieces[self.pieces.len() - 1].interval.end,
        )
    }

    /// Every piece boundary, including both ends of the domain
    pub fn breakpoints(&self) -> Vec<f64> {
        let mut points: Vec<f64> = self.pieces.iter().map(|p| p.interval.start).collect();
        points.push(self.domain().end);
        points
    }

    /// Value at `x` using the right-limit convention (left limit at the far end).
    ///
    /// Positions outside the domain are clamped to it.
    pub fn evaluate(&self, x: f64) -> f64 {
        let domain = self.domain();
        if x >= domain.end {
            self.evaluate_left(domain.end)
        } else {
            self.evaluate_right(x.max(domain.start))
        }
    }

    /// One-sided limit at `x`
    pub fn evaluate_at(&self, x: f64, side: Side) -> f64 {
        match side {
            Side::Left => self.evaluate_left(x),
            Side::Right => self.evaluate_right(x),
        }
    }

    /// Limit from the left; at the domain start this is the start value.
    pub fn evaluate_left(&self, x: f64) -> f64 {
        let index = self
            .pieces
            .iter()
            .position(|p| x <= p.interval.end)
            .unwrap_or(self.pieces.len() - 1);
        self.pieces[index].value_at(x)
    }

    /// Limit from the right; at the domain end this is the end value.
    pub fn evaluate_right(&self, x: f64) -> f64 {
        let index = self
            .pieces
            .iter()
            .rposition(|p| x >= p.interval.start)
            .unwrap_or(0);
        self.pieces[index].value_at(x)
    }

    /// Derivative of every piece. Jumps are dropped (no delta terms).
    pub fn derivative(&self) -> PiecewisePolynomial {
        self.map(|poly| poly.derivative())
    }

    /// Multiply every piece by `factor`
    pub fn scale(&self, factor: f64) -> PiecewisePolynomial {
        self.map(|poly| poly.scale(factor))
    }

    /// Running integral from the domain start.
    ///
    /// `jumps[i]` is added at the start of piece `i`, so the integral is
    /// continuous except at breakpoints with a nonzero jump. `jumps[0]` acts
    /// as the initial value. Missing entries count as zero.
    pub fn integrate(&self, jumps: &[f64]) -> PiecewisePolynomial {
        let mut running = 0.0;
        let pieces = self
            .pieces
            .iter()
            .enumerate()
            .map(|(i, piece)| {
                running += jumps.get(i).copied().unwrap_or(0.0);
                let poly = piece.poly.antiderivative(running);
                running = poly.evaluate(piece.interval.length());
                Piece {
                    interval: piece.interval,
                    poly,
                }
            })
            .collect();
        PiecewisePolynomial { pieces }
    }

    /// Add the global linear function `c1·x + c0` to every piece
    pub fn add_linear(&self, c1: f64, c0: f64) -> PiecewisePolynomial {
        let pieces = self
            .pieces
            .iter()
            .map(|piece| {
                let shift = Polynomial::linear(c1 * piece.interval.start + c0, c1);
                Piece {
                    interval: piece.interval,
                    poly: &piece.poly + &shift,
                }
            })
            .collect();
        PiecewisePolynomial { pieces }
    }

    /// Every point where an extreme value can occur: both ends of each
    /// piece (one-sided limits) and interior roots of the derivative.
    fn candidates(&self) -> Vec<Extremum> {
        let mut candidates = Vec::new();
        for piece in &self.pieces {
            let length = piece.interval.length();
            candidates.push(Extremum {
                value: piece.poly.evaluate(0.0),
                position: piece.interval.start,
            });
            for t in piece.poly.derivative().real_roots(0.0, length) {
                if t > 0.0 && t < length {
                    candidates.push(Extremum {
                        value: piece.poly.evaluate(t),
                        position: piece.interval.start + t,
                    });
                }
            }
            candidates.push(Extremum {
                value: piece.end_value(),
                position: piece.interval.end,
            });
        }
        candidates
    }

    /// Largest absolute value, computed analytically. The first position
    /// wins on ties.
    pub fn extreme_abs(&self) -> Extremum {
        self.candidates()
            .into_iter()
            .fold(None, |best: Option<Extremum>, c| match best {
                Some(b) if b.value.abs() >= c.value.abs() => Some(b),
                _ => Some(c),
            })
            .unwrap_or_default()
    }

    /// Largest signed value
    pub fn max(&self) -> Extremum {
        self.candidates()
            .into_iter()
            .fold(None, |best: Option<Extremum>, c| match best {
                Some(b) if b.value >= c.value => Some(b),
                _ => Some(c),
            })
            .unwrap_or_default()
    }

    /// Smallest signed value
    pub fn min(&self) -> Extremum {
        self.candidates()
            .into_iter()
            .fold(None, |best: Option<Extremum>, c| match best {
                Some(b) if b.value <= c.value => Some(b),
                _ => Some(c),
            })
            .unwrap_or_default()
    }

    /// Sample positions for plotting: `n` evenly spaced points plus both
    /// one-sided limits at every interior breakpoint, in axis order.
    pub fn sample_grid(&self, n: usize) -> Vec<(f64, Side)> {
        let domain = self.domain();
        let n = n.max(2);
        let interior: Vec<f64> = self.breakpoints()[1..self.pieces.len()].to_vec();

        let mut grid: Vec<(f64, Side)> = (0..n)
            .map(|i| domain.start + domain.length() * i as f64 / (n - 1) as f64)
            .filter(|x| !interior.iter().any(|b| b == x))
            .map(|x| (x, if x >= domain.end { Side::Left } else { Side::Right }))
            .collect();
        for x in interior {
            grid.push((x, Side::Left));
            grid.push((x, Side::Right));
        }
        grid.sort_by(|a, b| {
            a.0.total_cmp(&b.0).then_with(|| match (a.1, b.1) {
                (Side::Left, Side::Right) => std::cmp::Ordering::Less,
                (Side::Right, Side::Left) => std::cmp::Ordering::Greater,
                _ => std::cmp::Ordering::Equal,
            })
        });
        grid
    }

    /// `(x, value)` pairs on [`sample_grid`](Self::sample_grid)
    pub fn sample(&self, n: usize) -> Vec<(f64, f64)> {
        self.sample_grid(n)
            .into_iter()
            .map(|(x, side)| (x, self.evaluate_at(x, side)))
            .collect()
    }

    fn map(&self, f: impl Fn(&Polynomial) -> Polynomial) -> PiecewisePolynomial {
        let pieces = self
            .pieces
            .iter()
            .map(|piece| Piece {
                interval: piece.interval,
                poly: f(&piece.poly),
            })
            .collect();
        PiecewisePolynomial { pieces }
    }
}
