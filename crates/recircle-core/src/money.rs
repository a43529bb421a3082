//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Satang                                           │
//! │    5 baht = 500 satang, always exact                                    │
//! │    Whole-unit conversion uses integer division; the remainder stays     │
//! │    on the point balance, so no value is ever silently lost              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use recircle_core::money::Money;
//!
//! // Create from satang (preferred)
//! let payout = Money::from_satang(500); // 5.00 baht
//!
//! // Arithmetic operations
//! let doubled = payout * 2;                   // 10.00 baht
//! let total = payout + Money::from_satang(50); // 5.50 baht
//!
//! // NEVER do this:
//! // let bad = Money::from_float(5.00); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (satang).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values in arithmetic intermediates
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// Every monetary value in the system flows through this type: the credited
/// amount on a recycling entry, the payout on a redemption record, and the
/// `money_per_unit` half of an exchange rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from satang (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use recircle_core::money::Money;
    ///
    /// let payout = Money::from_satang(500); // Represents 5.00 baht
    /// assert_eq!(payout.satang(), 500);
    /// ```
    ///
    /// ## Why Satang?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// The database, calculations, and API all use satang.
    /// Only the UI converts to baht for display.
    #[inline]
    pub const fn from_satang(satang: i64) -> Self {
        Money(satang)
    }

    /// Creates a Money value from whole baht.
    ///
    /// ## Example
    /// ```rust
    /// use recircle_core::money::Money;
    ///
    /// let payout = Money::from_baht(5);
    /// assert_eq!(payout.satang(), 500);
    /// ```
    #[inline]
    pub const fn from_baht(baht: i64) -> Self {
        Money(baht * 100)
    }

    /// Returns the value in satang (smallest currency unit).
    #[inline]
    pub const fn satang(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (baht) portion.
    ///
    /// ## Example
    /// ```rust
    /// use recircle_core::money::Money;
    ///
    /// let payout = Money::from_satang(550);
    /// assert_eq!(payout.baht(), 5);
    /// ```
    #[inline]
    pub const fn baht(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (satang) portion (always 0-99).
    #[inline]
    pub const fn satang_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a whole-unit count.
    ///
    /// ## Example
    /// ```rust
    /// use recircle_core::money::Money;
    ///
    /// let per_unit = Money::from_satang(500); // 5.00 baht per unit
    /// let payout = per_unit.multiply_units(3);
    /// assert_eq!(payout.satang(), 1500); // 15.00 baht
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Redeem 120 points at 40 bottles = 5.00 baht
    ///      │
    ///      ▼
    /// units = 120 / 40 = 3
    ///      │
    ///      ▼
    /// multiply_units(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Payout: 15.00 baht
    /// ```
    #[inline]
    pub const fn multiply_units(&self, units: i64) -> Self {
        Money(self.0 * units)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and logs. Use frontend formatting for actual UI
/// display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}฿{}.{:02}", sign, self.baht().abs(), self.satang_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for unit calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, units: i64) -> Self {
        Money(self.0 * units)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_satang() {
        let money = Money::from_satang(550);
        assert_eq!(money.satang(), 550);
        assert_eq!(money.baht(), 5);
        assert_eq!(money.satang_part(), 50);
    }

    #[test]
    fn test_from_baht() {
        assert_eq!(Money::from_baht(5).satang(), 500);
        assert_eq!(Money::from_baht(0).satang(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_satang(550)), "฿5.50");
        assert_eq!(format!("{}", Money::from_satang(500)), "฿5.00");
        assert_eq!(format!("{}", Money::from_satang(-550)), "-฿5.50");
        assert_eq!(format!("{}", Money::from_satang(0)), "฿0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_satang(1000);
        let b = Money::from_satang(500);

        assert_eq!((a + b).satang(), 1500);
        assert_eq!((a - b).satang(), 500);
        let result: Money = a * 3;
        assert_eq!(result.satang(), 3000);
    }

    #[test]
    fn test_multiply_units() {
        let per_unit = Money::from_satang(500);
        assert_eq!(per_unit.multiply_units(3).satang(), 1500);
        assert_eq!(per_unit.multiply_units(0).satang(), 0);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_satang(100);
        assert!(!positive.is_zero());
        assert!(positive.is_positive());
        assert!(!positive.is_negative());

        let negative = Money::from_satang(-100);
        assert!(!negative.is_zero());
        assert!(!negative.is_positive());
        assert!(negative.is_negative());
    }
}
