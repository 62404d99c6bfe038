use crate::id::ElementId;

/// Validation failures for elements, scenes, and property edits.
///
/// A value that produces one of these is never written into a scene.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("`{field}` must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("`{field}` must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("`auto` size is only allowed on image elements")]
    AutoNotAllowed,

    #[error("text elements need a font family")]
    EmptyFontFamily,

    #[error("font size must be positive, got {0}")]
    FontSize(f64),

    #[error("canvas size must be positive, got {width}x{height}")]
    CanvasSize { width: u32, height: u32 },

    #[error("duplicate element id {0}")]
    DuplicateId(ElementId),

    #[error("no element with id {0}")]
    UnknownElement(ElementId),

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    #[error("invalid angle `{0}`")]
    InvalidAngle(String),

    #[error("unknown {kind} subtype `{value}`")]
    UnknownSubtype { kind: &'static str, value: String },

    #[error("unknown property `{0}`")]
    UnknownProperty(String),

    #[error("property `{key}` does not apply to {kind} elements")]
    NotApplicable { key: &'static str, kind: &'static str },

    #[error("invalid value for `{key}`: expected {expected}")]
    InvalidValue { key: &'static str, expected: &'static str },
}

/// Reject NaN and infinities.
pub fn finite(field: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NonFinite { field, value })
    }
}

/// Finite and `>= 0`.
pub fn non_negative(field: &'static str, value: f64) -> Result<f64, ModelError> {
    let value = finite(field, value)?;
    if value < 0.0 {
        Err(ModelError::Negative { field, value })
    } else {
        Ok(value)
    }
}
