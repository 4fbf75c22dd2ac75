//! # Error Types
//!
//! Structured error types for design_core. Only structurally invalid input
//! raises an error: a candidate that merely fails a code check is recorded
//! inside the result (`is_feasible`/`is_valid` plus a reason) and the search
//! continues.
//!
//! ## Example
//!
//! ```rust
//! use design_core::errors::{DesignError, DesignResult};
//!
//! fn validate_width(b_mm: f64) -> DesignResult<()> {
//!     if b_mm <= 0.0 {
//!         return Err(DesignError::InvalidInput {
//!             field: "b_mm".to_string(),
//!             value: b_mm.to_string(),
//!             reason: "Beam width must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for design_core operations
pub type DesignResult<T> = Result<T, DesignError>;

/// Structured error type for the design engine.
///
/// Each variant provides specific context about what went wrong,
/// enabling programmatic handling by callers.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum DesignError {
    /// An input value is invalid (out of range, wrong sign, empty set, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A concrete grade appears in the search grid but has no unit rate
    /// in the cost profile
    #[error("No concrete rate for grade {grade} in cost profile")]
    CostRateMissing { grade: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DesignError {
    /// Create an InvalidInput error
    pub fn invalid_input(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DesignError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        DesignError::MissingField {
            field: field.into(),
        }
    }

    /// Create a CostRateMissing error
    pub fn cost_rate_missing(grade: impl Into<String>) -> Self {
        DesignError::CostRateMissing {
            grade: grade.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            DesignError::InvalidInput { .. } => "INVALID_INPUT",
            DesignError::MissingField { .. } => "MISSING_FIELD",
            DesignError::CostRateMissing { .. } => "COST_RATE_MISSING",
            DesignError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = DesignError::invalid_input("ast_required_mm2", "-804", "Required area must be positive");
        let json = serde_json::to_string(&error).unwrap();
        let roundtrip: DesignError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DesignError::missing_field("test").error_code(), "MISSING_FIELD");
        assert_eq!(DesignError::cost_rate_missing("M60").error_code(), "COST_RATE_MISSING");
    }

    #[test]
    fn test_error_display() {
        let error = DesignError::cost_rate_missing("M60");
        assert_eq!(error.to_string(), "No concrete rate for grade M60 in cost profile");
    }
}
