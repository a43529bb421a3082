//! Shared application state.
//!
//! One `AppState` instance is built at startup and handed to every handler
//! behind an `Arc`.

use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use crate::auth::JwtManager;
use crate::config::ApiConfig;
use crate::error::ApiResult;
use recircle_core::{CoreError, ExchangeRate};
use recircle_db::{Database, DbResult};

/// Shared state for all HTTP handlers.
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub jwt: JwtManager,
    pub rate_cache: RateCache,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(
            config.jwt_secret.clone(),
            config.jwt_access_lifetime_secs,
            config.jwt_refresh_lifetime_secs,
        );
        let rate_cache = RateCache::new(Duration::from_secs(config.rate_cache_ttl_secs));

        AppState {
            db,
            config,
            jwt,
            rate_cache,
        }
    }

    /// Resolves the active rate, failing with NO_ACTIVE_RATE when none exists.
    ///
    /// Every mutating operation goes through this: there is exactly one
    /// absent-rate policy across the whole API.
    pub async fn require_active_rate(&self) -> ApiResult<ExchangeRate> {
        let rate = self.rate_cache.get_or_fetch(&self.db).await?;
        rate.ok_or_else(|| CoreError::NoActiveRate.into())
    }
}

/// Cached copy of the most recent active rate.
struct CachedRate {
    fetched_at: Instant,
    rate: ExchangeRate,
}

/// Read-through cache for the active exchange rate.
///
/// The rate changes rarely but is read on every submission, redemption, and
/// dashboard load, so hits are served from memory for `ttl`. Admin rate
/// updates call [`RateCache::invalidate`] so the new rate is visible on the
/// next request rather than up to a TTL later.
pub struct RateCache {
    ttl: Duration,
    inner: RwLock<Option<CachedRate>>,
}

impl RateCache {
    pub fn new(ttl: Duration) -> Self {
        RateCache {
            ttl,
            inner: RwLock::new(None),
        }
    }

    /// Returns the cached rate if fresh, otherwise queries the database and
    /// refreshes the cache. An absent rate is never cached, so a newly set
    /// rate shows up immediately.
    pub async fn get_or_fetch(&self, db: &Database) -> DbResult<Option<ExchangeRate>> {
        {
            let guard = self.inner.read().await;
            if let Some(cached) = guard.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    return Ok(Some(cached.rate.clone()));
                }
            }
        }

        let rate = db.rates().active().await?;
        debug!(found = rate.is_some(), "Refreshed active rate cache");

        let mut guard = self.inner.write().await;
        *guard = rate.clone().map(|rate| CachedRate {
            fetched_at: Instant::now(),
            rate,
        });

        Ok(rate)
    }

    /// Drops the cached rate so the next read hits the database.
    pub async fn invalidate(&self) {
        let mut guard = self.inner.write().await;
        *guard = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recircle_db::DbConfig;

    async fn test_state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let config = ApiConfig {
            http_port: 0,
            database_path: ":memory:".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_access_lifetime_secs: 3600,
            jwt_refresh_lifetime_secs: 86400,
            rate_cache_ttl_secs: 60,
            admin_student_id: None,
            admin_password: None,
        };
        AppState::new(db, config)
    }

    #[tokio::test]
    async fn test_cache_serves_stale_rate_until_invalidated() {
        let state = test_state().await;

        let first = state.require_active_rate().await.unwrap();
        assert_eq!(first.bottles_per_unit, 40);

        // A direct database write is invisible until the TTL expires...
        state.db.rates().set_rate(50, 600).await.unwrap();
        let cached = state.require_active_rate().await.unwrap();
        assert_eq!(cached.id, first.id);

        // ...unless the cache is invalidated
        state.rate_cache.invalidate().await;
        let fresh = state.require_active_rate().await.unwrap();
        assert_eq!(fresh.bottles_per_unit, 50);
    }

    #[tokio::test]
    async fn test_absent_rate_fails_with_no_active_rate() {
        let state = test_state().await;
        state.db.rates().deactivate_all().await.unwrap();
        state.rate_cache.invalidate().await;

        let err = state.require_active_rate().await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::NoActiveRate);
    }
}
