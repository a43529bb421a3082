//! # recircle-core: Pure Business Logic for recircle
//!
//! This crate is the **heart** of recircle. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       recircle Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      HTTP API (axum)                            │   │
//! │  │    signup, signin, submit bottles, redeem points, set rate      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ recircle-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  convert  │  │ validation│  │   │
//! │  │   │  Profile  │  │   Money   │  │ rate math │  │   rules   │  │   │
//! │  │   │   Rate    │  │  satang   │  │ redeem    │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  recircle-db (Database Layer)                   │   │
//! │  │          SQLite queries, migrations, repositories               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Profile, ExchangeRate, ledger rows)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`convert`] - The conversion & redemption engine
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in satang (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use recircle_core::convert::points_to_money;
//! use recircle_core::types::ExchangeRate;
//!
//! let rate = ExchangeRate {
//!     id: "rate".into(),
//!     bottles_per_unit: 40,
//!     money_per_unit_satang: 500,
//!     is_active: true,
//!     created_at: Utc::now(),
//! };
//!
//! // 120 points at 40 bottles = 5.00 baht per unit → 15.00 baht
//! assert_eq!(points_to_money(120, &rate).satang(), 1500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod convert;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use recircle_core::Money` instead of
// `use recircle_core::money::Money`

pub use convert::{points_to_money, submission_credit, validate_redemption};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::{
    validate_bottle_count, validate_email, validate_name, validate_password, validate_rate_fields,
    validate_student_id,
};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default exchange rate seeded into a fresh database: 40 bottles per unit.
///
/// ## Why a constant?
/// The seed migration and the tests both reference the documented default
/// (40 bottles = 5 baht). Runtime code never falls back to this: operations
/// without an active rate fail with [`CoreError::NoActiveRate`].
pub const DEFAULT_BOTTLES_PER_UNIT: i64 = 40;

/// Default money per unit in satang (5 baht). See [`DEFAULT_BOTTLES_PER_UNIT`].
pub const DEFAULT_MONEY_PER_UNIT_SATANG: i64 = 500;

/// Maximum bottles accepted in a single submission.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., typing 4000 instead of 40).
pub const MAX_BOTTLES_PER_SUBMISSION: i64 = 9999;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;
