use thiserror::Error;

/// Hard failures from the valuation engine.
///
/// Incomplete location data is never an error: it resolves to a documented
/// fallback zone instead (see [`super::zone::classify_from_name`]).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValuationError {
    #[error("invalid property attributes: {field}: {reason}")]
    InvalidAttributes { field: &'static str, reason: String },
}

impl ValuationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ValuationError::InvalidAttributes {
            field,
            reason: reason.into(),
        }
    }

    /// Name of the offending attribute, for form-level error display.
    pub fn field(&self) -> &'static str {
        match self {
            ValuationError::InvalidAttributes { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, ValuationError>;
