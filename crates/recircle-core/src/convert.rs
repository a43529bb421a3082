//! # Conversion & Redemption Engine
//!
//! The single home of the points-to-money conversion formula and the
//! redemption preconditions.
//!
//! ## The One Canonical Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  money = (points / rate.bottles_per_unit) * rate.money_per_unit         │
//! │           └────────────┬────────────────┘                               │
//! │                 integer (floor) division into whole units               │
//! │                                                                         │
//! │  Example: rate = 40 bottles : 5.00 baht                                 │
//! │    points = 40  → 1 unit  → 5.00 baht                                   │
//! │    points = 79  → 1 unit  → 5.00 baht  (39 points stay on balance)      │
//! │    points = 120 → 3 units → 15.00 baht                                  │
//! │                                                                         │
//! │  The SAME formula is used for submission crediting and for redemption.  │
//! │  Partial units never pay out; the remainder points remain owned by the  │
//! │  user, so the ledger stays consistent and no value is destroyed.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Redemption Preconditions
//! Checked in order, all BEFORE any mutation:
//! 1. quantity must be positive            → `InvalidQuantity`
//! 2. quantity >= rate.bottles_per_unit    → `BelowMinimumUnit`
//! 3. quantity <= balance                  → `InsufficientBalance`
//!
//! Rate resolution itself happens in the storage layer; callers that cannot
//! resolve a rate fail with `NoActiveRate` before ever reaching this module.

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::ExchangeRate;

/// Converts a point quantity to money using the canonical whole-unit formula.
///
/// Non-positive quantities convert to zero; rejection of invalid quantities
/// is the caller's concern (see [`validate_redemption`]).
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use recircle_core::convert::points_to_money;
/// use recircle_core::types::ExchangeRate;
///
/// let rate = ExchangeRate {
///     id: "r".into(),
///     bottles_per_unit: 40,
///     money_per_unit_satang: 500,
///     is_active: true,
///     created_at: Utc::now(),
/// };
/// assert_eq!(points_to_money(40, &rate).satang(), 500);
/// assert_eq!(points_to_money(79, &rate).satang(), 500);
/// assert_eq!(points_to_money(0, &rate).satang(), 0);
/// ```
pub fn points_to_money(points: i64, rate: &ExchangeRate) -> Money {
    if points <= 0 {
        return Money::zero();
    }
    let units = points / rate.bottles_per_unit;
    rate.money_per_unit().multiply_units(units)
}

/// Money credited for a recycling submission of `bottles` bottles.
///
/// Same formula as redemption. The bottle count itself is what gets added
/// to the point balance; this value is only the attributed money recorded
/// on the audit entry.
pub fn submission_credit(bottles: i64, rate: &ExchangeRate) -> Money {
    points_to_money(bottles, rate)
}

/// Validates a redemption request and returns the money amount it would pay.
///
/// No mutation happens here; the storage layer re-checks the balance under
/// a transaction when the redemption is actually applied.
///
/// ## Errors
/// - `InvalidQuantity` if `points <= 0`
/// - `BelowMinimumUnit` if `points < rate.bottles_per_unit`
/// - `InsufficientBalance` if `points > balance`
pub fn validate_redemption(points: i64, balance: i64, rate: &ExchangeRate) -> CoreResult<Money> {
    if points <= 0 {
        return Err(CoreError::InvalidQuantity { requested: points });
    }

    if points < rate.bottles_per_unit {
        return Err(CoreError::BelowMinimumUnit {
            requested: points,
            minimum: rate.bottles_per_unit,
        });
    }

    if points > balance {
        return Err(CoreError::InsufficientBalance {
            requested: points,
            balance,
        });
    }

    Ok(points_to_money(points, rate))
}

// =============================================================================
// Unit Tests
// =============================================================================
