//! # Section Properties
//!
//! The cross-section data the analysis needs, either given directly as
//! (I, c) or derived from a standard shape and its dimensions.
//!
//! ## Shapes
//!
//! | Shape              | Dimensions        | Shear stress      |
//! |--------------------|-------------------|-------------------|
//! | `rectangle`        | b, h              | 1.5·V/A           |
//! | `square`           | b                 | 1.5·V/A           |
//! | `circle`           | D                 | (4/3)·V/A         |
//! | `hollow_circle`    | Do, Di            | 2·V/A             |
//! | `thin_tube`        | Do, t             | 2·V/A             |
//! | `rectangular_tube` | b, h, t           | V/A_web           |
//! | `ellipse`          | a, b (semi-axes)  | (4/3)·V/A         |
//! | `i_beam`           | bf, tf, tw, h     | V/A_web           |
//!
//! Shape names are case-insensitive. The labels shown in the section
//! picker ("Rectangle (b,h)", "I-Beam (bf,tf,tw,h)", ...) are accepted too.
//!
//! ## Example
//!
//! ```rust
//! use flexure_core::sections::{SectionLibrary, StandardSections};
//!
//! let props = StandardSections.lookup_section("Rectangle (b,h)", &[0.05, 0.1]).unwrap();
//! assert!((props.extreme_fiber - 0.05).abs() < 1e-12);
//! assert!(props.shear_stress(1000.0).is_some());
//! ```

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::equations::section as formulas;
use crate::errors::{CalcError, CalcResult};

/// Shear coefficient for sections given only as (I, c) plus an area
pub const DEFAULT_SHEAR_FACTOR: f64 = 1.5;

/// Geometric properties used by the stress and deflection calculations
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionProperties {
    /// Second moment of area I about the bending axis
    pub moment_of_inertia: f64,
    /// Distance c from the neutral axis to the extreme fiber
    pub extreme_fiber: f64,
    /// Gross cross-sectional area, when known
    #[serde(default)]
    pub area: Option<f64>,
    /// Area resisting shear (the web for I and box shapes)
    #[serde(default)]
    pub shear_area: Option<f64>,
    /// Peak-to-average shear stress ratio k over `shear_area`
    #[serde(default = "default_shear_factor")]
    pub shear_factor: f64,
}

fn default_shear_factor() -> f64 {
    DEFAULT_SHEAR_FACTOR
}

impl SectionProperties {
    /// Section given directly as (I, c). Shear stress needs an area, see
    /// [`with_area`](Self::with_area).
    pub fn explicit(moment_of_inertia: f64, extreme_fiber: f64) -> CalcResult<Self> {
        let props = SectionProperties {
            moment_of_inertia,
            extreme_fiber,
            area: None,
            shear_area: None,
            shear_factor: DEFAULT_SHEAR_FACTOR,
        };
        props.validate()?;
        Ok(props)
    }

    /// Set the gross area, also used as the shear area
    pub fn with_area(mut self, area: f64) -> Self {
        self.area = Some(area);
        self.shear_area = Some(area);
        self
    }

    /// Override the shear coefficient k
    pub fn with_shear_factor(mut self, shear_factor: f64) -> Self {
        self.shear_factor = shear_factor;
        self
    }

    /// Check that every property is positive and finite
    pub fn validate(&self) -> CalcResult<()> {
        check_positive("moment_of_inertia", self.moment_of_inertia)?;
        check_positive("extreme_fiber", self.extreme_fiber)?;
        if let Some(area) = self.area {
            check_positive("area", area)?;
        }
        if let Some(area) = self.shear_area {
            check_positive("shear_area", area)?;
        }
        check_positive("shear_factor", self.shear_factor)?;
        Ok(())
    }

    /// Elastic section modulus S = I/c
    pub fn section_modulus(&self) -> f64 {
        formulas::section_modulus(self.moment_of_inertia, self.extreme_fiber)
    }

    /// Extreme-fiber bending stress σ = |M|·c/I
    pub fn bending_stress(&self, moment: f64) -> f64 {
        moment.abs() * self.extreme_fiber / self.moment_of_inertia
    }

    /// Peak shear stress τ = k·|V|/A, or `None` without a shear area
    pub fn shear_stress(&self, shear: f64) -> Option<f64> {
        self.shear_area
            .map(|area| self.shear_factor * shear.abs() / area)
    }
}

fn check_positive(field: &str, value: f64) -> CalcResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CalcError::invalid_dimension(field, value, "must be positive and finite"));
    }
    Ok(())
}

/// Standard cross-section shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionShape {
    Rectangle,
    Square,
    Circle,
    HollowCircle,
    ThinTube,
    RectangularTube,
    Ellipse,
    IBeam,
}

impl SectionShape {
    /// All shapes in picker order
    pub const ALL: [SectionShape; 8] = [
        SectionShape::Rectangle,
        SectionShape::Square,
        SectionShape::Circle,
        SectionShape::ThinTube,
        SectionShape::HollowCircle,
        SectionShape::RectangularTube,
        SectionShape::Ellipse,
        SectionShape::IBeam,
    ];

    /// Machine identifier
    pub fn id(&self) -> &'static str {
        match self {
            SectionShape::Rectangle => "rectangle",
            SectionShape::Square => "square",
            SectionShape::Circle => "circle",
            SectionShape::HollowCircle => "hollow_circle",
            SectionShape::ThinTube => "thin_tube",
            SectionShape::RectangularTube => "rectangular_tube",
            SectionShape::Ellipse => "ellipse",
            SectionShape::IBeam => "i_beam",
        }
    }

    /// Label for pickers, listing the expected dimensions
    pub fn display_name(&self) -> &'static str {
        match self {
            SectionShape::Rectangle => "Rectangle (b,h)",
            SectionShape::Square => "Square (b)",
            SectionShape::Circle => "Solid Circle (D)",
            SectionShape::HollowCircle => "Hollow Circle (Do,Di)",
            SectionShape::ThinTube => "Thin-Wall Tube (Do,t)",
            SectionShape::RectangularTube => "Rectangular Tube (b,h,t)",
            SectionShape::Ellipse => "Solid Ellipse (a,b)",
            SectionShape::IBeam => "I-Beam (bf,tf,tw,h)",
        }
    }

    /// Names of the dimensions, in the order they are passed
    pub fn dimension_names(&self) -> &'static [&'static str] {
        match self {
            SectionShape::Rectangle => &["b", "h"],
            SectionShape::Square => &["b"],
            SectionShape::Circle => &["D"],
            SectionShape::HollowCircle => &["Do", "Di"],
            SectionShape::ThinTube => &["Do", "t"],
            SectionShape::RectangularTube => &["b", "h", "t"],
            SectionShape::Ellipse => &["a", "b"],
            SectionShape::IBeam => &["bf", "tf", "tw", "h"],
        }
    }

    /// Parse a shape identifier or picker label (case-insensitive)
    pub fn from_name(name: &str) -> CalcResult<Self> {
        let base = name.split('(').next().unwrap_or("").trim().to_lowercase();
        let key: String = base
            .chars()
            .map(|c| if c == '-' || c.is_whitespace() { '_' } else { c })
            .collect();
        match key.as_str() {
            "rectangle" | "rect" => Ok(SectionShape::Rectangle),
            "square" => Ok(SectionShape::Square),
            "circle" | "solid_circle" => Ok(SectionShape::Circle),
            "hollow_circle" | "pipe" => Ok(SectionShape::HollowCircle),
            "thin_tube" | "thin_wall_tube" => Ok(SectionShape::ThinTube),
            "rectangular_tube" | "rect_tube" => Ok(SectionShape::RectangularTube),
            "ellipse" | "solid_ellipse" => Ok(SectionShape::Ellipse),
            "i_beam" | "ibeam" => Ok(SectionShape::IBeam),
            _ => Err(CalcError::unknown_shape(name)),
        }
    }

    /// Compute the section properties for the given dimensions.
    ///
    /// Fails with `InvalidDimension` for a wrong dimension count,
    /// non-positive values, or impossible geometry (e.g. Di ≥ Do).
    pub fn properties(&self, dims: &[f64]) -> CalcResult<SectionProperties> {
        let names = self.dimension_names();
        if dims.len() != names.len() {
            return Err(CalcError::invalid_dimension(
                "dimensions",
                dims.len() as f64,
                format!("{} expects {} values ({})", self.id(), names.len(), names.join(", ")),
            ));
        }
        for (name, value) in names.iter().zip(dims) {
            check_positive(name, *value)?;
        }

        let solid = |i: f64, c: f64, area: f64, k: f64| SectionProperties {
            moment_of_inertia: i,
            extreme_fiber: c,
            area: Some(area),
            shear_area: Some(area),
            shear_factor: k,
        };
        let webbed = |i: f64, c: f64, area: f64, web: f64| SectionProperties {
            moment_of_inertia: i,
            extreme_fiber: c,
            area: Some(area),
            shear_area: Some(web),
            shear_factor: 1.0,
        };

        let props = match (self, dims) {
            (SectionShape::Rectangle, &[b, h]) => solid(
                formulas::rectangle_moment_of_inertia(b, h),
                h / 2.0,
                formulas::rectangle_area(b, h),
                1.5,
            ),
            (SectionShape::Square, &[b]) => solid(
                formulas::rectangle_moment_of_inertia(b, b),
                b / 2.0,
                formulas::rectangle_area(b, b),
                1.5,
            ),
            (SectionShape::Circle, &[d]) => solid(
                formulas::circle_moment_of_inertia(d),
                d / 2.0,
                formulas::circle_area(d),
                4.0 / 3.0,
            ),
            (SectionShape::HollowCircle, &[d_o, d_i]) => {
                if d_i >= d_o {
                    return Err(CalcError::invalid_dimension(
                        "Di",
                        d_i,
                        "inner diameter must be smaller than outer diameter",
                    ));
                }
                solid(
                    formulas::hollow_circle_moment_of_inertia(d_o, d_i),
                    d_o / 2.0,
                    formulas::hollow_circle_area(d_o, d_i),
                    2.0,
                )
            }
            (SectionShape::ThinTube, &[d_o, t]) => {
                if d_o <= 2.0 * t {
                    return Err(CalcError::invalid_dimension("t", t, "require Do > 2t"));
                }
                solid(
                    formulas::thin_tube_moment_of_inertia(d_o, t),
                    d_o / 2.0,
                    formulas::thin_tube_area(d_o, t),
                    2.0,
                )
            }
            (SectionShape::RectangularTube, &[b, h, t]) => {
                if b <= 2.0 * t || h <= 2.0 * t {
                    return Err(CalcError::invalid_dimension("t", t, "require b > 2t and h > 2t"));
                }
                webbed(
                    formulas::rectangular_tube_moment_of_inertia(b, h, t),
                    h / 2.0,
                    formulas::rectangular_tube_area(b, h, t),
                    formulas::rectangular_tube_web_area(h, t),
                )
            }
            (SectionShape::Ellipse, &[a, b]) => solid(
                formulas::ellipse_moment_of_inertia(a, b),
                b,
                formulas::ellipse_area(a, b),
                4.0 / 3.0,
            ),
            (SectionShape::IBeam, &[bf, tf, tw, h]) => {
                if h <= 2.0 * tf {
                    return Err(CalcError::invalid_dimension("h", h, "require h > 2tf"));
                }
                webbed(
                    formulas::i_beam_moment_of_inertia(bf, tf, tw, h),
                    h / 2.0,
                    formulas::i_beam_area(bf, tf, tw, h),
                    formulas::i_beam_web_area(tf, tw, h),
                )
            }
            _ => return Err(CalcError::internal("dimension count checked above")),
        };
        Ok(props)
    }
}

impl std::fmt::Display for SectionShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for SectionShape {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionShape::from_name(s)
    }
}

/// Source of section properties by shape name.
///
/// The analysis only ever sees resolved [`SectionProperties`]; a library
/// is how callers turn user input into them.
pub trait SectionLibrary {
    fn lookup_section(&self, shape: &str, dims: &[f64]) -> CalcResult<SectionProperties>;
}

/// The built-in closed-form shapes
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardSections;

impl SectionLibrary for StandardSections {
    fn lookup_section(&self, shape: &str, dims: &[f64]) -> CalcResult<SectionProperties> {
        SectionShape::from_name(shape)?.properties(dims)
    }
}

/// Section as entered by the user: explicit values or a named shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SectionInput {
    Explicit {
        moment_of_inertia: f64,
        extreme_fiber: f64,
        #[serde(default)]
        area: Option<f64>,
        #[serde(default)]
        shear_factor: Option<f64>,
    },
    Shape {
        shape: String,
        dimensions: Vec<f64>,
    },
}

impl SectionInput {
    /// Resolve to concrete properties through `library`
    pub fn resolve(&self, library: &dyn SectionLibrary) -> CalcResult<SectionProperties> {
        match self {
            SectionInput::Explicit {
                moment_of_inertia,
                extreme_fiber,
                area,
                shear_factor,
            } => {
                let mut props = SectionProperties::explicit(*moment_of_inertia, *extreme_fiber)?;
                if let Some(area) = area {
                    props = props.with_area(*area);
                }
                if let Some(k) = shear_factor {
                    props = props.with_shear_factor(*k);
                }
                props.validate()?;
                Ok(props)
            }
            SectionInput::Shape { shape, dimensions } => library.lookup_section(shape, dimensions),
        }
    }

    /// Short description for reports
    pub fn describe(&self) -> String {
        match self {
            SectionInput::Explicit { .. } => "Explicit (I, c)".to_string(),
            SectionInput::Shape { shape, dimensions } => {
                let dims: Vec<String> = dimensions.iter().map(|d| format!("{}", d)).collect();
                match SectionShape::from_name(shape) {
                    Ok(known) => format!("{} = ({})", known.display_name(), dims.join(", ")),
                    Err(_) => format!("{} ({})", shape, dims.join(", ")),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_rectangle_properties() {
        let props = SectionShape::Rectangle.properties(&[0.05, 0.1]).unwrap();
        assert_relative_eq!(props.moment_of_inertia, 0.05 * 0.001 / 12.0);
        assert_relative_eq!(props.extreme_fiber, 0.05);
        assert_relative_eq!(props.area.unwrap(), 0.005);
        // τ = 1.5 V / A
        assert_relative_eq!(props.shear_stress(1000.0).unwrap(), 300_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_circle_and_ellipse() {
        let circle = SectionShape::Circle.properties(&[0.1]).unwrap();
        assert_relative_eq!(circle.moment_of_inertia, PI * 1e-4 / 64.0);
        assert_relative_eq!(circle.shear_factor, 4.0 / 3.0);

        let ellipse = SectionShape::Ellipse.properties(&[0.05, 0.05]).unwrap();
        assert_relative_eq!(ellipse.moment_of_inertia, circle.moment_of_inertia, max_relative = 1e-12);
        assert_relative_eq!(ellipse.extreme_fiber, 0.05);
    }

    #[test]
    fn test_i_beam_uses_web_for_shear() {
        let props = SectionShape::IBeam.properties(&[0.1, 0.01, 0.006, 0.2]).unwrap();
        assert_relative_eq!(props.shear_area.unwrap(), 0.006 * 0.18, max_relative = 1e-12);
        assert_relative_eq!(props.shear_factor, 1.0);
        assert_relative_eq!(props.extreme_fiber, 0.1);
        assert!(props.area.unwrap() > props.shear_area.unwrap());
    }

    #[test]
    fn test_from_name_accepts_picker_labels() {
        assert_eq!(SectionShape::from_name("Rectangle (b,h)").unwrap(), SectionShape::Rectangle);
        assert_eq!(SectionShape::from_name("Thin-Wall Tube (Do,t)").unwrap(), SectionShape::ThinTube);
        assert_eq!(SectionShape::from_name("I-Beam (bf,tf,tw,h)").unwrap(), SectionShape::IBeam);
        assert_eq!(SectionShape::from_name("HOLLOW_CIRCLE").unwrap(), SectionShape::HollowCircle);
        assert_eq!("solid ellipse".parse::<SectionShape>().unwrap(), SectionShape::Ellipse);
        for shape in SectionShape::ALL {
            assert_eq!(SectionShape::from_name(shape.display_name()).unwrap(), shape);
            assert_eq!(SectionShape::from_name(shape.id()).unwrap(), shape);
        }
    }

    #[test]
    fn test_unknown_shape() {
        let err = StandardSections.lookup_section("hexagon", &[1.0]).unwrap_err();
        assert_eq!(err, CalcError::unknown_shape("hexagon"));
    }

    #[test]
    fn test_invalid_dimensions() {
        let cases: [(&str, &[f64]); 6] = [
            ("rectangle", &[0.1]),
            ("rectangle", &[0.1, -0.2]),
            ("hollow_circle", &[0.1, 0.1]),
            ("thin_tube", &[0.1, 0.05]),
            ("rectangular_tube", &[0.1, 0.2, 0.05]),
            ("i_beam", &[0.1, 0.1, 0.01, 0.2]),
        ];
        for (shape, dims) in cases {
            let err = StandardSections.lookup_section(shape, dims).unwrap_err();
            assert_eq!(err.error_code(), "INVALID_DIMENSION", "{} {:?}", shape, dims);
        }
    }

    #[test]
    fn test_explicit_section() {
        let props = SectionProperties::explicit(8.0e-6, 0.05).unwrap();
        assert!(props.shear_stress(100.0).is_none());
        assert_relative_eq!(props.bending_stress(-2000.0), 2000.0 * 0.05 / 8.0e-6);
        assert_relative_eq!(props.section_modulus(), 1.6e-4);
        assert!(SectionProperties::explicit(0.0, 0.05).is_err());
        assert!(SectionProperties::explicit(1.0, f64::NAN).is_err());
    }

    #[test]
    fn test_section_input_resolution() {
        let shape: SectionInput =
            serde_json::from_str(r#"{"type":"Shape","shape":"square","dimensions":[0.1]}"#).unwrap();
        let props = shape.resolve(&StandardSections).unwrap();
        assert_relative_eq!(props.moment_of_inertia, 1e-4 / 12.0);

        let explicit = SectionInput::Explicit {
            moment_of_inertia: 1e-6,
            extreme_fiber: 0.02,
            area: Some(1e-3),
            shear_factor: None,
        };
        let props = explicit.resolve(&StandardSections).unwrap();
        assert_relative_eq!(props.shear_stress(10.0).unwrap(), 1.5 * 10.0 / 1e-3);
        assert_eq!(shape.describe(), "Square (b) = (0.1)");
    }
}
