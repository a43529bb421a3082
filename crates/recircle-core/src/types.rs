//! # Domain Types
//!
//! Core domain types used throughout recircle.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌──────────────────┐     │
//! │  │    Profile      │   │  ExchangeRate    │   │ RecyclingEntry   │     │
//! │  │  ─────────────  │   │  ──────────────  │   │  ──────────────  │     │
//! │  │  id (UUID)      │   │  id (UUID)       │   │  id (UUID)       │     │
//! │  │  student_id     │   │  bottles_per_unit│   │  bottles         │     │
//! │  │  points         │   │  money_per_unit  │   │  money_received  │     │
//! │  └─────────────────┘   │  is_active       │   │  rate_id         │     │
//! │                        └──────────────────┘   └──────────────────┘     │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐                            │
//! │  │ RedemptionRecord│   │    UserRole      │                            │
//! │  │  ─────────────  │   │  ──────────────  │                            │
//! │  │  points_redeemed│   │  Student         │                            │
//! │  │  money_amount   │   │  Admin           │                            │
//! │  │  rate_id        │   └──────────────────┘                            │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (`student_id`) - human-readable, unique

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// User Role
// =============================================================================

/// Role of an authenticated account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular student: submits bottles, views own history.
    Student,
    /// Administrator: sets rates, performs redemptions, views all data.
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::Student
    }
}

// =============================================================================
// User Account
// =============================================================================

/// An authentication account. Credentials only; everything user-facing
/// (name, balance) lives on the [`Profile`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UserAccount {
    pub id: String,
    pub email: String,
    /// Argon2 PHC-format hash. Never the plaintext password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Profile
// =============================================================================

/// A student profile holding the point balance.
///
/// ## Balance Semantics
/// `points` is bottle-denominated: 1 submitted bottle = 1 point. Submission
/// increments it by the bottle count, redemption decrements it by the
/// redeemed point count. These are the ONLY two mutations in the system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profile {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning authentication account.
    pub user_id: String,

    /// Student identifier - business key, unique across the system.
    pub student_id: String,

    /// Display name.
    pub name: String,

    /// Contact email (denormalized from the account for display).
    pub email: String,

    /// Current point balance (bottle count). Never negative.
    pub points: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Exchange Rate
// =============================================================================

/// A bottles-to-money exchange rate.
///
/// ## Lifecycle
/// Rows are append-only with soft deactivation: setting a new rate
/// deactivates the old one and inserts a new active row. The "current" rate
/// is the most recently created active row. A partial unique index in the
/// schema guarantees at most one active row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ExchangeRate {
    pub id: String,

    /// Smallest redeemable block of points. Must be positive.
    pub bottles_per_unit: i64,

    /// Money paid out per whole unit, in satang. Must be positive.
    pub money_per_unit_satang: i64,

    /// Whether this rate is currently in effect.
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}

impl ExchangeRate {
    /// Returns the per-unit payout as Money.
    #[inline]
    pub fn money_per_unit(&self) -> Money {
        Money::from_satang(self.money_per_unit_satang)
    }
}

// =============================================================================
// Recycling Entry
// =============================================================================

/// One recycling submission. Write-once audit row.
///
/// ## Snapshot Pattern
/// `money_received_satang` and `rate_id` freeze the rate that was active at
/// submission time; later rate changes never rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RecyclingEntry {
    pub id: String,
    pub user_id: String,
    /// Number of bottles submitted (equals the points credited).
    pub bottles: i64,
    /// Money value attributed at submission time (whole-unit floor).
    pub money_received_satang: i64,
    /// The rate that was active when this entry was created.
    pub rate_id: String,
    pub created_at: DateTime<Utc>,
}

impl RecyclingEntry {
    /// Returns the attributed money value as Money.
    #[inline]
    pub fn money_received(&self) -> Money {
        Money::from_satang(self.money_received_satang)
    }
}

// =============================================================================
// Redemption Record
// =============================================================================

/// One redemption event. Write-once audit row, created atomically with the
/// balance decrement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RedemptionRecord {
    pub id: String,
    pub user_id: String,
    pub points_redeemed: i64,
    pub money_amount_satang: i64,
    /// The rate that was active when this redemption was performed.
    pub rate_id: String,
    pub redeemed_at: DateTime<Utc>,
}

impl RedemptionRecord {
    /// Returns the paid-out money amount as Money.
    #[inline]
    pub fn money_amount(&self) -> Money {
        Money::from_satang(self.money_amount_satang)
    }
}

// =============================================================================
// Read Models
// =============================================================================

/// Redemption history row joined with the profile, for admin listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RedemptionHistoryEntry {
    pub id: String,
    pub user_id: String,
    pub points_redeemed: i64,
    pub money_amount_satang: i64,
    pub redeemed_at: DateTime<Utc>,
    pub student_id: String,
    pub name: String,
}

/// Per-user recycling aggregate for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct RecyclingStats {
    pub user_id: String,
    pub student_id: String,
    pub name: String,
    pub total_bottles: i64,
    pub total_money_satang: i64,
    pub entry_count: i64,
    pub last_entry_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn rate(bottles: i64, satang: i64) -> ExchangeRate {
        ExchangeRate {
            id: "rate-1".to_string(),
            bottles_per_unit: bottles,
            money_per_unit_satang: satang,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_rate_money_per_unit() {
        let r = rate(40, 500);
        assert_eq!(r.money_per_unit(), Money::from_satang(500));
    }

    #[test]
    fn test_user_role_default() {
        assert_eq!(UserRole::default(), UserRole::Student);
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let account = UserAccount {
            id: "u-1".to_string(),
            email: "s6401@university.ac.th".to_string(),
            password_hash: "$argon2id$...".to_string(),
            role: UserRole::Student,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("argon2id"));
    }
}
