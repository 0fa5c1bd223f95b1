//! # Loads
//!
//! Applied loads on the beam axis and the ordered collection that holds
//! them.
//!
//! ## Sign Convention
//!
//! - Point forces and distributed intensities: positive downward
//! - Point moments: positive counterclockwise
//! - Positions: measured from the left end (x = 0)
//!
//! ## Example
//!
//! ```rust
//! use flexure_core::loads::{Load, LoadSet};
//!
//! let loads = LoadSet::new()
//!     .with_load(Load::point(1000.0, 5.0))
//!     .with_load(Load::uniform(50.0, 0.0, 10.0));
//!
//! assert_eq!(loads.len(), 2);
//! assert_eq!(loads.total_force(), 1500.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::Beam;
use crate::errors::{CalcError, CalcResult};

/// Direction of a point force, perpendicular to the beam axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    Down,
    Up,
}

impl Direction {
    /// +1 for downward, -1 for upward
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Down => 1.0,
            Direction::Up => -1.0,
        }
    }
}

/// A single load applied to the beam
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Load {
    /// Concentrated force at a position
    PointForce {
        position: f64,
        magnitude: f64,
        #[serde(default)]
        direction: Direction,
    },

    /// Concentrated couple at a position (positive counterclockwise)
    PointMoment { position: f64, magnitude: f64 },

    /// Linearly varying line load between two positions.
    /// Uniform when `start_intensity == end_intensity`.
    Distributed {
        start: f64,
        end: f64,
        start_intensity: f64,
        end_intensity: f64,
    },
}

impl Load {
    /// Downward point force
    pub fn point(magnitude: f64, position: f64) -> Self {
        Load::PointForce {
            position,
            magnitude,
            direction: Direction::Down,
        }
    }

    /// Upward point force
    pub fn point_up(magnitude: f64, position: f64) -> Self {
        Load::PointForce {
            position,
            magnitude,
            direction: Direction::Up,
        }
    }

    /// Counterclockwise couple
    pub fn moment(magnitude: f64, position: f64) -> Self {
        Load::PointMoment { position, magnitude }
    }

    /// Uniform line load over `[start, end]`
    pub fn uniform(intensity: f64, start: f64, end: f64) -> Self {
        Load::linear(intensity, intensity, start, end)
    }

    /// Uniform line load over the whole beam
    pub fn uniform_full(intensity: f64, beam: &Beam) -> Self {
        Load::uniform(intensity, 0.0, beam.length)
    }

    /// Trapezoidal (or triangular) line load over `[start, end]`
    pub fn linear(start_intensity: f64, end_intensity: f64, start: f64, end: f64) -> Self {
        Load::Distributed {
            start,
            end,
            start_intensity,
            end_intensity,
        }
    }

    /// Get display name for UI
    pub fn display_name(&self) -> &'static str {
        match self {
            Load::PointForce { .. } => "Point force",
            Load::PointMoment { .. } => "Point moment",
            Load::Distributed {
                start_intensity,
                end_intensity,
                ..
            } if start_intensity == end_intensity => "Uniform load",
            Load::Distributed { .. } => "Linear load",
        }
    }

    /// Net downward force (area under the intensity for line loads)
    pub fn resultant(&self) -> f64 {
        match self {
            Load::PointForce {
                magnitude,
                direction,
                ..
            } => magnitude * direction.sign(),
            Load::PointMoment { .. } => 0.0,
            Load::Distributed {
                start,
                end,
                start_intensity,
                end_intensity,
            } => 0.5 * (start_intensity + end_intensity) * (end - start),
        }
    }

    /// Line of action of the resultant, if it has one.
    ///
    /// A line load whose intensities cancel (equal and opposite ends) has
    /// zero resultant and no centroid; it still carries a moment, see
    /// [`moment_about`](Self::moment_about).
    pub fn centroid(&self) -> Option<f64> {
        match self {
            Load::PointForce { position, .. } => Some(*position),
            Load::PointMoment { .. } => None,
            Load::Distributed {
                start,
                end,
                start_intensity,
                end_intensity,
            } => {
                let sum = start_intensity + end_intensity;
                if sum == 0.0 {
                    None
                } else {
                    Some(start + (end - start) * (start_intensity + 2.0 * end_intensity) / (3.0 * sum))
                }
            }
        }
    }

    /// Moment of this load about `x_ref`, counterclockwise positive
    pub fn moment_about(&self, x_ref: f64) -> f64 {
        match self {
            Load::PointForce { position, .. } => -self.resultant() * (position - x_ref),
            Load::PointMoment { magnitude, .. } => *magnitude,
            Load::Distributed {
                start,
                end,
                start_intensity,
                end_intensity,
            } => {
                // ∫ w(x)·(x - x_ref) dx over [start, end], exact for linear w
                let a = start - x_ref;
                let l = end - start;
                let first_moment =
                    a * l * (start_intensity + end_intensity) / 2.0
                        + l * l * (start_intensity / 6.0 + end_intensity / 3.0);
                -first_moment
            }
        }
    }

    /// Positions where this load starts, stops, or acts
    pub fn event_positions(&self) -> Vec<f64> {
        match self {
            Load::PointForce { position, .. } | Load::PointMoment { position, .. } => {
                vec![*position]
            }
            Load::Distributed { start, end, .. } => vec![*start, *end],
        }
    }

    /// Downward intensity of a line load at `x` (zero outside it or for
    /// concentrated loads)
    pub fn intensity_at(&self, x: f64) -> f64 {
        match self {
            Load::Distributed {
                start,
                end,
                start_intensity,
                end_intensity,
            } if x >= *start && x <= *end => {
                start_intensity + (end_intensity - start_intensity) * (x - start) / (end - start)
            }
            _ => 0.0,
        }
    }

    /// Validate the load against a beam
    pub fn validate(&self, beam: &Beam) -> CalcResult<()> {
        let check_finite = |field: &str, value: f64| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(CalcError::invalid_input(
                    field,
                    value.to_string(),
                    "Value must be finite",
                ))
            }
        };
        let check_position = |position: f64| {
            check_finite("position", position)?;
            if position < 0.0 || position > beam.length {
                return Err(CalcError::invalid_placement(
                    self.display_name(),
                    position,
                    beam.length,
                ));
            }
            Ok(())
        };

        match self {
            Load::PointForce {
                position,
                magnitude,
                ..
            }
            | Load::PointMoment {
                position,
                magnitude,
            } => {
                check_finite("magnitude", *magnitude)?;
                check_position(*position)
            }
            Load::Distributed {
                start,
                end,
                start_intensity,
                end_intensity,
            } => {
                check_finite("start_intensity", *start_intensity)?;
                check_finite("end_intensity", *end_intensity)?;
                check_position(*start)?;
                check_position(*end)?;
                if start >= end {
                    return Err(CalcError::invalid_input(
                        "start",
                        format!("{} >= {}", start, end),
                        "Distributed load must start before it ends",
                    ));
                }
                Ok(())
            }
        }
    }
}

/// Ordered collection of loads on one beam
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoadSet {
    loads: Vec<Load>,
}

impl LoadSet {
    /// Create an empty load set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a load and return self (builder pattern)
    pub fn with_load(mut self, load: Load) -> Self {
        self.loads.push(load);
        self
    }

    /// Add a load to this set
    pub fn add_load(&mut self, load: Load) {
        self.loads.push(load);
    }

    /// Remove the load at `index`
    pub fn remove_load(&mut self, index: usize) -> Option<Load> {
        if index < self.loads.len() {
            Some(self.loads.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Load> {
        self.loads.iter()
    }

    pub fn len(&self) -> usize {
        self.loads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loads.is_empty()
    }

    /// Net downward force of every load
    pub fn total_force(&self) -> f64 {
        self.loads.iter().map(Load::resultant).sum()
    }

    /// Net counterclockwise moment of every load about `x_ref`
    pub fn moment_about(&self, x_ref: f64) -> f64 {
        self.loads.iter().map(|l| l.moment_about(x_ref)).sum()
    }

    /// Sum of absolute load magnitudes, used to scale tolerances
    pub fn magnitude_scale(&self) -> f64 {
        self.loads
            .iter()
            .map(|load| match load {
                Load::PointForce { magnitude, .. } | Load::PointMoment { magnitude, .. } => {
                    magnitude.abs()
                }
                Load::Distributed {
                    start,
                    end,
                    start_intensity,
                    end_intensity,
                } => 0.5 * (start_intensity.abs() + end_intensity.abs()) * (end - start),
            })
            .sum()
    }

    /// Every position where a load starts, stops, or acts (unsorted)
    pub fn event_positions(&self) -> Vec<f64> {
        self.loads.iter().flat_map(Load::event_positions).collect()
    }

    /// Validate every load against the beam
    pub fn validate(&self, beam: &Beam) -> CalcResult<()> {
        for (i, load) in self.loads.iter().enumerate() {
            load.validate(beam).map_err(|e| match e {
                CalcError::InvalidInput { field, value, reason } => {
                    CalcError::invalid_input(format!("loads[{}].{}", i, field), value, reason)
                }
                other => other,
            })?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a LoadSet {
    type Item = &'a Load;
    type IntoIter = std::slice::Iter<'a, Load>;

    fn into_iter(self) -> Self::IntoIter {
        self.loads.iter()
    }
}

impl FromIterator<Load> for LoadSet {
    fn from_iter<I: IntoIterator<Item = Load>>(iter: I) -> Self {
        LoadSet {
            loads: iter.into_iter().collect(),
        }
    }
}
