//! Error types shared by the control path, the render path and the preset store.

use thiserror::Error;

/// A parameter value outside its declared range, or of the wrong kind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Numeric value outside the closed range of the field.
    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// NaN or infinite input.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    /// Value that must be strictly positive (note frequency).
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// A number given for an enumerated field, or the reverse.
    #[error("{field} expects {expected}")]
    WrongKind {
        field: &'static str,
        expected: &'static str,
    },

    /// `category.field` does not name a parameter.
    #[error("unknown parameter {category}.{field}")]
    UnknownField { category: String, field: String },

    /// Enumerated value outside its closed set.
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Failures surfaced by `note_on` and the output device.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Rejected before any graph mutation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The render path could not take a new graph. Fatal to the current note only.
    #[error("render resources exhausted: {reason}")]
    ResourceExhaustion { reason: String },
}

impl EngineError {
    pub fn exhausted(reason: impl Into<String>) -> Self {
        Self::ResourceExhaustion {
            reason: reason.into(),
        }
    }
}

/// Failures of the preset gateway.
#[derive(Debug, Error)]
pub enum PresetError {
    /// Save or delete issued without an identity.
    #[error("an authenticated identity is required")]
    AuthRequired,

    /// Missing record or record owned by someone else. Deliberately one kind.
    #[error("preset not found")]
    NotFoundOrUnauthorized,

    /// Blank preset name.
    #[error("preset name must not be empty")]
    EmptyName,

    /// The parameter set being saved (or loaded) is out of range.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("preset file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("preset file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}
