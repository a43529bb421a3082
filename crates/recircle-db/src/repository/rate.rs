//! # Rate Repository
//!
//! Database operations for exchange rates.
//!
//! ## Rate Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Exchange Rate Lifecycle                             │
//! │                                                                         │
//! │  set_rate(50, 600)                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                      │
//! │       ├── UPDATE bottle_rates SET is_active = 0 WHERE is_active = 1     │
//! │       └── INSERT new active row                                         │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Rows are append-only: deactivated rates stay forever so ledger rows    │
//! │  can keep referencing the rate they were priced with.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use recircle_core::ExchangeRate;

/// Repository for exchange-rate database operations.
#[derive(Debug, Clone)]
pub struct RateRepository {
    pool: SqlitePool,
}

impl RateRepository {
    /// Creates a new RateRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RateRepository { pool }
    }

    /// Resolves the current active rate.
    ///
    /// "Current" = the most recently created row flagged active. The schema
    /// enforces at most one active row; the ORDER BY keeps the query correct
    /// even on databases created before that index existed.
    pub async fn active(&self) -> DbResult<Option<ExchangeRate>> {
        let rate = sqlx::query_as::<_, ExchangeRate>(
            r#"
            SELECT id, bottles_per_unit, money_per_unit_satang, is_active, created_at
            FROM bottle_rates
            WHERE is_active = 1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(rate)
    }

    /// Replaces the active rate: deactivates the current one and inserts the
    /// new rate as active, in a single transaction.
    ///
    /// ## Returns
    /// The newly created active rate.
    pub async fn set_rate(
        &self,
        bottles_per_unit: i64,
        money_per_unit_satang: i64,
    ) -> DbResult<ExchangeRate> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(
            bottles_per_unit,
            money_per_unit_satang, "Rotating exchange rate"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query("UPDATE bottle_rates SET is_active = 0 WHERE is_active = 1")
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO bottle_rates (id, bottles_per_unit, money_per_unit_satang, is_active, created_at)
            VALUES (?1, ?2, ?3, 1, ?4)
            "#,
        )
        .bind(&id)
        .bind(bottles_per_unit)
        .bind(money_per_unit_satang)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(rate_id = %id, bottles_per_unit, money_per_unit_satang, "Exchange rate updated");

        Ok(ExchangeRate {
            id,
            bottles_per_unit,
            money_per_unit_satang,
            is_active: true,
            created_at: now,
        })
    }

    /// Lists past and present rates, newest first.
    pub async fn history(&self, limit: u32) -> DbResult<Vec<ExchangeRate>> {
        let rates = sqlx::query_as::<_, ExchangeRate>(
            r#"
            SELECT id, bottles_per_unit, money_per_unit_satang, is_active, created_at
            FROM bottle_rates
            ORDER BY created_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rates)
    }

    /// Deactivates every rate. Admin escape hatch; after this, mutating
    /// operations fail with NoActiveRate until a new rate is set.
    pub async fn deactivate_all(&self) -> DbResult<u64> {
        let result = sqlx::query("UPDATE bottle_rates SET is_active = 0 WHERE is_active = 1")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
