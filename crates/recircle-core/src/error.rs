//! # Error Types
//!
//! Domain-specific error types for recircle-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  recircle-core errors (this file)                                       │
//! │  ├── CoreError        - Business rule violations                        │
//! │  └── ValidationError  - Input validation failures                       │
//! │                                                                         │
//! │  recircle-db errors (separate crate)                                    │
//! │  └── DbError          - Database operation failures                     │
//! │                                                                         │
//! │  API errors (in app)                                                    │
//! │  └── ApiError         - What the client sees (serialized)               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (points, balance, minimum)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. They abort an operation
/// BEFORE any mutation happens and are translated to user-friendly messages
/// at the interaction boundary.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Quantity is zero or negative.
    #[error("Invalid quantity: {requested}")]
    InvalidQuantity { requested: i64 },

    /// Redemption quantity is below one full unit of the active rate.
    ///
    /// ## User Workflow
    /// ```text
    /// Redeem 30 points, rate = 40 bottles/unit
    ///      │
    ///      ▼
    /// 30 < 40
    ///      │
    ///      ▼
    /// BelowMinimumUnit { requested: 30, minimum: 40 }
    ///      │
    ///      ▼
    /// UI shows: "Minimum redemption is 40 points"
    /// ```
    #[error("Redemption of {requested} points is below the minimum unit of {minimum}")]
    BelowMinimumUnit { requested: i64, minimum: i64 },

    /// Redemption quantity exceeds the user's point balance.
    #[error("Insufficient balance: requested {requested}, available {balance}")]
    InsufficientBalance { requested: i64, balance: i64 },

    /// No active exchange rate exists.
    ///
    /// ## When This Occurs
    /// Every active rate row was deactivated by hand. Mutating operations
    /// fail rather than falling back to a silent default.
    #[error("No active exchange rate is configured")]
    NoActiveRate,

    /// Student ID is already registered.
    #[error("Student ID '{0}' is already registered")]
    DuplicateStudentId(String),

    /// Profile cannot be found.
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email, invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::BelowMinimumUnit {
            requested: 30,
            minimum: 40,
        };
        assert_eq!(
            err.to_string(),
            "Redemption of 30 points is below the minimum unit of 40"
        );

        let err = CoreError::InsufficientBalance {
            requested: 50,
            balance: 40,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: requested 50, available 40"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "student_id".to_string(),
        };
        assert_eq!(err.to_string(), "student_id is required");

        let err = ValidationError::TooShort {
            field: "password".to_string(),
            min: 6,
        };
        assert_eq!(err.to_string(), "password must be at least 6 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "name".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
