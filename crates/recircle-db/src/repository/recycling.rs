//! # Recycling Repository
//!
//! Database operations for bottle submissions.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bottle Submission Flow                             │
//! │                                                                         │
//! │  submit(user, 40 bottles, credit ฿5.00, rate)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                      │
//! │       ├── UPDATE profiles SET points = points + 40                      │
//! │       └── INSERT recycling_history row (bottles, money, rate_id)        │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Both writes land or neither does: the balance can never drift from     │
//! │  the sum of the ledger.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use recircle_core::{Money, RecyclingEntry, RecyclingStats};

/// Repository for recycling-submission database operations.
#[derive(Debug, Clone)]
pub struct RecyclingRepository {
    pool: SqlitePool,
}

impl RecyclingRepository {
    /// Creates a new RecyclingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RecyclingRepository { pool }
    }

    /// Records a bottle submission: credits the student's balance and appends
    /// the ledger row in a single transaction.
    ///
    /// `money_received` is the floor-converted credit computed by the caller
    /// against `rate_id`; it is stored alongside the bottle count so history
    /// stays meaningful after the rate changes.
    pub async fn submit(
        &self,
        user_id: &str,
        bottles: i64,
        money_received: Money,
        rate_id: &str,
    ) -> DbResult<RecyclingEntry> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(user_id, bottles, rate_id, "Recording bottle submission");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET points = points + ?1, updated_at = ?2
            WHERE user_id = ?3
            "#,
        )
        .bind(bottles)
        .bind(now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::not_found("profile", user_id));
        }

        sqlx::query(
            r#"
            INSERT INTO recycling_history (id, user_id, bottles, money_received_satang, rate_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(bottles)
        .bind(money_received.satang())
        .bind(rate_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            entry_id = %id,
            user_id,
            bottles,
            money_satang = money_received.satang(),
            "Bottle submission recorded"
        );

        Ok(RecyclingEntry {
            id,
            user_id: user_id.to_string(),
            bottles,
            money_received_satang: money_received.satang(),
            rate_id: rate_id.to_string(),
            created_at: now,
        })
    }

    /// Lists a student's submissions, newest first.
    pub async fn list_by_user(&self, user_id: &str, limit: u32) -> DbResult<Vec<RecyclingEntry>> {
        let entries = sqlx::query_as::<_, RecyclingEntry>(
            r#"
            SELECT id, user_id, bottles, money_received_satang, rate_id, created_at
            FROM recycling_history
            WHERE user_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Aggregates submissions per student for the admin dashboard.
    ///
    /// Students with no submissions yet still appear, with zeroed totals.
    pub async fn stats(&self) -> DbResult<Vec<RecyclingStats>> {
        let stats = sqlx::query_as::<_, RecyclingStats>(
            r#"
            SELECT
                p.user_id,
                p.student_id,
                p.name,
                COALESCE(SUM(r.bottles), 0) AS total_bottles,
                COALESCE(SUM(r.money_received_satang), 0) AS total_money_satang,
                COUNT(r.id) AS entry_count,
                MAX(r.created_at) AS last_entry_at
            FROM profiles p
            LEFT JOIN recycling_history r ON r.user_id = p.user_id
            GROUP BY p.user_id, p.student_id, p.name
            ORDER BY total_bottles DESC, p.student_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
