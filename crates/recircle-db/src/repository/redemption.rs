//! # Redemption Repository
//!
//! Database operations for point redemptions.
//!
//! ## Guarded Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Atomic Redemption Flow                              │
//! │                                                                         │
//! │  redeem(user, 40 points, ฿5.00, rate)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                      │
//! │       ├── UPDATE profiles SET points = points - 40                      │
//! │       │        WHERE user_id = ? AND points >= 40                       │
//! │       │              │                                                  │
//! │       │     0 rows? ─┴─► ROLLBACK, Conflict (balance moved under us)    │
//! │       │                                                                 │
//! │       └── INSERT point_redemptions row (points, money, rate_id)         │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The balance check is part of the UPDATE itself, so two concurrent      │
//! │  redemptions can never both spend the same points.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use recircle_core::{Money, RedemptionHistoryEntry, RedemptionRecord};

/// Repository for point-redemption database operations.
#[derive(Debug, Clone)]
pub struct RedemptionRepository {
    pool: SqlitePool,
}

impl RedemptionRepository {
    /// Creates a new RedemptionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RedemptionRepository { pool }
    }

    /// Redeems points for money: decrements the student's balance and appends
    /// the payout row in a single transaction.
    ///
    /// The decrement re-checks the balance inside the transaction. If the
    /// balance has dropped below `points` since the caller validated it, the
    /// transaction rolls back and `DbError::Conflict` is returned; nothing is
    /// written.
    pub async fn redeem(
        &self,
        user_id: &str,
        points: i64,
        money_amount: Money,
        rate_id: &str,
    ) -> DbResult<RedemptionRecord> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(user_id, points, rate_id, "Recording point redemption");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE profiles
            SET points = points - ?1, updated_at = ?2
            WHERE user_id = ?3 AND points >= ?1
            "#,
        )
        .bind(points)
        .bind(now)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;

            let exists: Option<(i64,)> =
                sqlx::query_as("SELECT 1 FROM profiles WHERE user_id = ?1")
                    .bind(user_id)
                    .fetch_optional(&self.pool)
                    .await?;

            return match exists {
                None => Err(DbError::not_found("profile", user_id)),
                Some(_) => {
                    warn!(user_id, points, "Redemption lost balance race, rolled back");
                    Err(DbError::conflict(format!(
                        "balance below {points} points for user {user_id}"
                    )))
                }
            };
        }

        sqlx::query(
            r#"
            INSERT INTO point_redemptions (id, user_id, points_redeemed, money_amount_satang, rate_id, redeemed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(points)
        .bind(money_amount.satang())
        .bind(rate_id)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            redemption_id = %id,
            user_id,
            points,
            money_satang = money_amount.satang(),
            "Point redemption recorded"
        );

        Ok(RedemptionRecord {
            id,
            user_id: user_id.to_string(),
            points_redeemed: points,
            money_amount_satang: money_amount.satang(),
            rate_id: rate_id.to_string(),
            redeemed_at: now,
        })
    }

    /// Lists redemptions across all students, newest first, with the student
    /// identity joined in for the admin view.
    pub async fn history(&self, limit: u32) -> DbResult<Vec<RedemptionHistoryEntry>> {
        let entries = sqlx::query_as::<_, RedemptionHistoryEntry>(
            r#"
            SELECT
                d.id,
                d.user_id,
                p.student_id,
                p.name,
                d.points_redeemed,
                d.money_amount_satang,
                d.redeemed_at
            FROM point_redemptions d
            JOIN profiles p ON p.user_id = d.user_id
            ORDER BY d.redeemed_at DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    /// Lists a single student's redemptions, newest first.
    pub async fn list_by_user(&self, user_id: &str, limit: u32) -> DbResult<Vec<RedemptionRecord>> {
        let records = sqlx::query_as::<_, RedemptionRecord>(
            r#"
            SELECT id, user_id, points_redeemed, money_amount_satang, rate_id, redeemed_at
            FROM point_redemptions
            WHERE user_id = ?1
            ORDER BY redeemed_at DESC
            LIMIT ?2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::account::NewAccount;
    use recircle_core::UserRole;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Creates a student and credits them an opening balance via the
    /// recycling path, returning the user id.
    async fn seed_student_with_points(db: &Database, student_id: &str, points: i64) -> String {
        let profile = db
            .accounts()
            .create_account(&NewAccount {
                student_id: student_id.to_string(),
                name: format!("Student {student_id}"),
                email: format!("{student_id}@school.ac.th"),
                password_hash: "hash".to_string(),
                role: UserRole::Student,
            })
            .await
            .unwrap();

        if points > 0 {
            let rate_id = db.rates().active().await.unwrap().unwrap().id;
            db.recycling()
                .submit(&profile.user_id, points, Money::zero(), &rate_id)
                .await
                .unwrap();
        }
        profile.user_id
    }

    #[tokio::test]
    async fn test_redeem_decrements_balance_and_records_payout() {
        let db = test_db().await;
        let user_id = seed_student_with_points(&db, "6401234", 100).await;
        let rate_id = db.rates().active().await.unwrap().unwrap().id;

        // 40 points at the default rate pays out one unit of ฿5.00
        let record = db
            .redemptions()
            .redeem(&user_id, 40, Money::from_satang(500), &rate_id)
            .await
            .unwrap();

        assert_eq!(record.points_redeemed, 40);
        assert_eq!(record.money_amount_satang, 500);
        assert_eq!(record.rate_id, rate_id);

        let profile = db.accounts().require_profile(&user_id).await.unwrap();
        assert_eq!(profile.points, 60);
    }

    #[tokio::test]
    async fn test_redeem_exact_balance_then_conflict() {
        let db = test_db().await;
        let user_id = seed_student_with_points(&db, "6401234", 40).await;
        let rate_id = db.rates().active().await.unwrap().unwrap().id;

        // Spending the entire balance is allowed
        db.redemptions()
            .redeem(&user_id, 40, Money::from_satang(500), &rate_id)
            .await
            .unwrap();

        let profile = db.accounts().require_profile(&user_id).await.unwrap();
        assert_eq!(profile.points, 0);

        // A second redemption for the same amount must fail
        let err = db
            .redemptions()
            .redeem(&user_id, 40, Money::from_satang(500), &rate_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_failed_redeem_writes_nothing() {
        let db = test_db().await;
        let user_id = seed_student_with_points(&db, "6401234", 30).await;
        let rate_id = db.rates().active().await.unwrap().unwrap().id;

        let err = db
            .redemptions()
            .redeem(&user_id, 40, Money::from_satang(500), &rate_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Conflict { .. }));

        // Balance untouched, no payout row
        let profile = db.accounts().require_profile(&user_id).await.unwrap();
        assert_eq!(profile.points, 30);

        let records = db.redemptions().list_by_user(&user_id, 10).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_redeem_unknown_user_is_not_found() {
        let db = test_db().await;
        let rate_id = db.rates().active().await.unwrap().unwrap().id;

        let err = db
            .redemptions()
            .redeem("no-such-user", 40, Money::from_satang(500), &rate_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_history_joins_student_identity() {
        let db = test_db().await;
        let user_id = seed_student_with_points(&db, "6401234", 80).await;
        let rate_id = db.rates().active().await.unwrap().unwrap().id;

        db.redemptions()
            .redeem(&user_id, 40, Money::from_satang(500), &rate_id)
            .await
            .unwrap();

        let history = db.redemptions().history(10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].student_id, "6401234");
        assert_eq!(history[0].points_redeemed, 40);
    }
}
