//! # Validation Module
//!
//! Input validation utilities for recircle.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: API handler (deserialization)                                 │
//! │  └── Type validation of the JSON payload                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL / CHECK constraints                                       │
//! │  ├── UNIQUE constraints (student_id, email)                             │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_BOTTLES_PER_SUBMISSION, MIN_PASSWORD_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a student ID.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 20 characters
/// - Should contain only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use recircle_core::validation::validate_student_id;
///
/// assert!(validate_student_id("6401234").is_ok());
/// assert!(validate_student_id("ADMIN-001").is_ok());
/// assert!(validate_student_id("").is_err());
/// assert!(validate_student_id("has space").is_err());
/// ```
pub fn validate_student_id(student_id: &str) -> ValidationResult<()> {
    let student_id = student_id.trim();

    if student_id.is_empty() {
        return Err(ValidationError::Required {
            field: "student_id".to_string(),
        });
    }

    if student_id.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "student_id".to_string(),
            max: 20,
        });
    }

    if !student_id
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "student_id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a display name.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 100 characters
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// Intentionally shallow: non-empty, hosts an `@` with text on both sides,
/// at most 254 characters. Deliverability is not our problem.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(())
}

/// Validates a password.
///
/// ## Rules
/// - At least MIN_PASSWORD_LEN (6) characters
/// - At most 128 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a bottle count for a recycling submission.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_BOTTLES_PER_SUBMISSION (9999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Submit Recycling                                                       │
/// │                                                                         │
/// │  User enters bottle count: 40                                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_bottle_count(40) ← THIS FUNCTION                              │
/// │       │                                                                 │
/// │       ├── count <= 0?   → Error: "bottles must be positive"             │
/// │       ├── count > 9999? → Error: "bottles must be between 1 and 9999"   │
/// │       └── OK → Proceed with submission                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_bottle_count(bottles: i64) -> ValidationResult<()> {
    if bottles <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "bottles".to_string(),
        });
    }

    if bottles > MAX_BOTTLES_PER_SUBMISSION {
        return Err(ValidationError::OutOfRange {
            field: "bottles".to_string(),
            min: 1,
            max: MAX_BOTTLES_PER_SUBMISSION,
        });
    }

    Ok(())
}

/// Validates the fields of a new exchange rate.
///
/// ## Rules
/// - `bottles_per_unit` must be positive
/// - `money_per_unit_satang` must be positive
pub fn validate_rate_fields(bottles_per_unit: i64, money_per_unit_satang: i64) -> ValidationResult<()> {
    if bottles_per_unit <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "bottles_per_unit".to_string(),
        });
    }

    if money_per_unit_satang <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "money_per_unit_satang".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_student_id() {
        assert!(validate_student_id("6401234").is_ok());
        assert!(validate_student_id("ADMIN-001").is_ok());
        assert!(validate_student_id("student_1").is_ok());

        assert!(validate_student_id("").is_err());
        assert!(validate_student_id("   ").is_err());
        assert!(validate_student_id("has space").is_err());
        assert!(validate_student_id(&"9".repeat(30)).is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Somchai J.").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"A".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("s6401234@university.ac.th").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@nodomain").is_err());
        assert!(validate_email("x@nodot").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("12345").is_err());
        assert!(validate_password(&"p".repeat(200)).is_err());
    }

    #[test]
    fn test_validate_bottle_count() {
        assert!(validate_bottle_count(1).is_ok());
        assert!(validate_bottle_count(40).is_ok());
        assert!(validate_bottle_count(9999).is_ok());

        assert!(validate_bottle_count(0).is_err());
        assert!(validate_bottle_count(-1).is_err());
        assert!(validate_bottle_count(10000).is_err());
    }

    #[test]
    fn test_validate_rate_fields() {
        assert!(validate_rate_fields(40, 500).is_ok());
        assert!(validate_rate_fields(0, 500).is_err());
        assert!(validate_rate_fields(40, 0).is_err());
        assert!(validate_rate_fields(-1, -1).is_err());
    }

}
