//! # recircle-db: Database Layer for ReCircle
//!
//! This crate provides database access for the ReCircle recycling rewards
//! system. It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       ReCircle Data Flow                                │
//! │                                                                         │
//! │  HTTP Handler (submit_recycling)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   recircle-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │ (account.rs)   │    │  (embedded)  │ │   │
//! │  │   │               │    │                │    │              │ │   │
//! │  │   │ SqlitePool    │    │ AccountRepo    │    │ 001_init.sql │ │   │
//! │  │   │ Connection    │◄───│ RateRepo       │    │ 002_seed.sql │ │   │
//! │  │   │ Management    │    │ RecyclingRepo  │    │              │ │   │
//! │  │   │               │    │ RedemptionRepo │    │              │ │   │
//! │  │   └───────────────┘    └────────────────┘    └──────────────┘ │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │                  /var/lib/recircle/recircle.db                  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (account, rate, etc.)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use recircle_db::{Database, DbConfig};
//!
//! // Create database with default config (runs migrations)
//! let config = DbConfig::new("path/to/recircle.db");
//! let db = Database::new(config).await?;
//!
//! // Use repositories
//! let rate = db.rates().active().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::account::{AccountRepository, NewAccount};
pub use repository::rate::RateRepository;
pub use repository::recycling::RecyclingRepository;
pub use repository::redemption::RedemptionRepository;
