//! # Error Types
//!
//! Structured error types for flexure_core. Every failure the engine can
//! report is a typed variant carrying enough context to point at the
//! offending input. None of them are transient: re-running the same
//! analysis with the same inputs fails the same way.
//!
//! ## Example
//!
//! ```rust
//! use flexure_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length: f64) -> CalcResult<()> {
//!     if length <= 0.0 {
//!         return Err(CalcError::invalid_dimension(
//!             "length",
//!             length,
//!             "Beam length must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for flexure_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for analysis operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// More reaction unknowns than equilibrium equations
    #[error("Statically indeterminate structure: {unknowns} reaction unknowns, {equations} equations")]
    IndeterminateStructure { unknowns: usize, equations: usize },

    /// Fewer reaction unknowns than equilibrium equations (a mechanism)
    #[error("Unstable structure: {reason}")]
    UnstableStructure { reason: String },

    /// The equilibrium or boundary-condition system could not be solved
    #[error("Singular system while solving {system}")]
    SingularSystem { system: String },

    /// Not enough displacement constraints to fix the integration constants
    #[error("Deflection is underconstrained: {available} boundary conditions, {required} required")]
    UnderconstrainedDeflection { available: usize, required: usize },

    /// Section shape identifier not in the library
    #[error("Unknown section shape: {shape}")]
    UnknownSectionShape { shape: String },

    /// A geometric dimension is non-positive or impossible
    #[error("Invalid dimension '{field}' = {value}: {reason}")]
    InvalidDimension {
        field: String,
        value: f64,
        reason: String,
    },

    /// The material lacks a property the analysis needs
    #[error("Material '{material}' is missing {property}")]
    MissingMaterialProperty { material: String, property: String },

    /// A load or support lies outside the beam
    #[error("{item} at x = {position} lies outside the beam [0, {length}]")]
    InvalidLoadPlacement {
        item: String,
        position: f64,
        length: f64,
    },

    /// An input value is invalid (non-finite, wrong ordering, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Material not found in the lookup table
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON/CSV serialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Internal consistency fault (should never surface for valid input)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an UnstableStructure error
    pub fn unstable(reason: impl Into<String>) -> Self {
        CalcError::UnstableStructure {
            reason: reason.into(),
        }
    }

    /// Create a SingularSystem error
    pub fn singular(system: impl Into<String>) -> Self {
        CalcError::SingularSystem {
            system: system.into(),
        }
    }

    /// Create an UnknownSectionShape error
    pub fn unknown_shape(shape: impl Into<String>) -> Self {
        CalcError::UnknownSectionShape {
            shape: shape.into(),
        }
    }

    /// Create an InvalidDimension error
    pub fn invalid_dimension(field: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        CalcError::InvalidDimension {
            field: field.into(),
            value,
            reason: reason.into(),
        }
    }

    /// Create a MissingMaterialProperty error
    pub fn missing_property(material: impl Into<String>, property: impl Into<String>) -> Self {
        CalcError::MissingMaterialProperty {
            material: material.into(),
            property: property.into(),
        }
    }

    /// Create an InvalidLoadPlacement error
    pub fn invalid_placement(item: impl Into<String>, position: f64, length: f64) -> Self {
        CalcError::InvalidLoadPlacement {
            item: item.into(),
            position,
            length,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        CalcError::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    ///
    /// Analysis errors are deterministic; only a held file lock may clear.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::IndeterminateStructure { .. } => "INDETERMINATE_STRUCTURE",
            CalcError::UnstableStructure { .. } => "UNSTABLE_STRUCTURE",
            CalcError::SingularSystem { .. } => "SINGULAR_SYSTEM",
            CalcError::UnderconstrainedDeflection { .. } => "UNDERCONSTRAINED_DEFLECTION",
            CalcError::UnknownSectionShape { .. } => "UNKNOWN_SECTION_SHAPE",
            CalcError::InvalidDimension { .. } => "INVALID_DIMENSION",
            CalcError::MissingMaterialProperty { .. } => "MISSING_MATERIAL_PROPERTY",
            CalcError::InvalidLoadPlacement { .. } => "INVALID_LOAD_PLACEMENT",
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}
