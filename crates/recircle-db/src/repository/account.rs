//! # Account Repository
//!
//! Database operations for authentication accounts and student profiles.
//!
//! ## Registration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Registration Flow                                   │
//! │                                                                         │
//! │  create_account(student_id, name, email, password_hash, role)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  BEGIN TRANSACTION                                                      │
//! │       ├── INSERT INTO users    (credentials + role)                     │
//! │       └── INSERT INTO profiles (student_id, name, points = 0)           │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  UNIQUE(student_id) / UNIQUE(email) violations roll the whole pair      │
//! │  back, so a half-registered account can never exist.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use recircle_core::{Profile, UserAccount, UserRole};

/// Parameters for creating a new account.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub student_id: String,
    pub name: String,
    pub email: String,
    /// Already hashed by the caller. This layer never sees plaintext.
    pub password_hash: String,
    pub role: UserRole,
}

/// Repository for account and profile database operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    pool: SqlitePool,
}

impl AccountRepository {
    /// Creates a new AccountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AccountRepository { pool }
    }

    /// Creates an authentication account and its profile in one transaction.
    ///
    /// ## Returns
    /// The created profile (points start at 0).
    ///
    /// ## Errors
    /// `DbError::UniqueViolation` if the student_id or email is taken.
    pub async fn create_account(&self, new: &NewAccount) -> DbResult<Profile> {
        let user_id = Uuid::new_v4().to_string();
        let profile_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(student_id = %new.student_id, "Creating account");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&user_id)
        .bind(&new.email)
        .bind(&new.password_hash)
        .bind(new.role)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO profiles (id, user_id, student_id, name, email, points, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?6)
            "#,
        )
        .bind(&profile_id)
        .bind(&user_id)
        .bind(&new.student_id)
        .bind(&new.name)
        .bind(&new.email)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Profile {
            id: profile_id,
            user_id,
            student_id: new.student_id.clone(),
            name: new.name.clone(),
            email: new.email.clone(),
            points: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Looks up the authentication account behind a student ID.
    ///
    /// Used by sign-in: the login ID is the student ID, credentials live on
    /// the users row.
    pub async fn get_account_by_student_id(
        &self,
        student_id: &str,
    ) -> DbResult<Option<UserAccount>> {
        let account = sqlx::query_as::<_, UserAccount>(
            r#"
            SELECT u.id, u.email, u.password_hash, u.role, u.created_at
            FROM users u
            INNER JOIN profiles p ON p.user_id = u.id
            WHERE p.student_id = ?1
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(account)
    }

    /// Gets a profile by the owning user's ID.
    pub async fn get_profile_by_user_id(&self, user_id: &str) -> DbResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, student_id, name, email, points, created_at, updated_at
            FROM profiles
            WHERE user_id = ?1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Gets a profile by student ID.
    pub async fn get_profile_by_student_id(&self, student_id: &str) -> DbResult<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, student_id, name, email, points, created_at, updated_at
            FROM profiles
            WHERE student_id = ?1
            "#,
        )
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(profile)
    }

    /// Lists all profiles ordered by student ID.
    ///
    /// Used by the admin redemption screen to pick a user.
    pub async fn list_profiles(&self) -> DbResult<Vec<Profile>> {
        let profiles = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, student_id, name, email, points, created_at, updated_at
            FROM profiles
            ORDER BY student_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(profiles)
    }

    /// Checks whether a student ID is already registered.
    pub async fn student_id_exists(&self, student_id: &str) -> DbResult<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM profiles WHERE student_id = ?1")
                .bind(student_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count > 0)
    }

    /// Gets a profile by user ID, erroring when absent.
    pub async fn require_profile(&self, user_id: &str) -> DbResult<Profile> {
        self.get_profile_by_user_id(user_id)
            .await?
            .ok_or_else(|| DbError::not_found("Profile", user_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn student(student_id: &str) -> NewAccount {
        NewAccount {
            student_id: student_id.to_string(),
            name: "Test Student".to_string(),
            email: format!("{}@university.ac.th", student_id),
            password_hash: "$argon2id$test".to_string(),
            role: UserRole::Student,
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch_account() {
        let db = test_db().await;
        let repo = db.accounts();

        let profile = repo.create_account(&student("6401001")).await.unwrap();
        assert_eq!(profile.points, 0);
        assert_eq!(profile.student_id, "6401001");

        let fetched = repo
            .get_profile_by_user_id(&profile.user_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.id, profile.id);

        let account = repo
            .get_account_by_student_id("6401001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.id, profile.user_id);
        assert_eq!(account.role, UserRole::Student);
    }

    #[tokio::test]
    async fn test_duplicate_student_id_rejected() {
        let db = test_db().await;
        let repo = db.accounts();

        repo.create_account(&student("6401002")).await.unwrap();
        assert!(repo.student_id_exists("6401002").await.unwrap());

        let mut dup = student("6401002");
        dup.email = "other@university.ac.th".to_string();
        let err = repo.create_account(&dup).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_profiles_ordered() {
        let db = test_db().await;
        let repo = db.accounts();

        repo.create_account(&student("6401005")).await.unwrap();
        repo.create_account(&student("6401003")).await.unwrap();

        let profiles = repo.list_profiles().await.unwrap();
        let ids: Vec<_> = profiles.iter().map(|p| p.student_id.as_str()).collect();
        assert_eq!(ids, vec!["6401003", "6401005"]);
    }

    #[tokio::test]
    async fn test_missing_profile() {
        let db = test_db().await;
        let repo = db.accounts();

        assert!(repo.get_profile_by_user_id("nope").await.unwrap().is_none());
        let err = repo.require_profile("nope").await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
