//! # Repository Module
//!
//! Database repository implementations for recircle.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  API handler                                                            │
//! │       │                                                                 │
//! │       │  db.rates().active()                                            │
//! │       ▼                                                                 │
//! │  RateRepository                                                         │
//! │  ├── active(&self)                                                      │
//! │  ├── set_rate(&self, bottles, satang)                                   │
//! │  └── history(&self, limit)                                              │
//! │       │                                                                 │
//! │       │  SQL query / transaction                                        │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                         │
//! │  • Transactions wrap every multi-row invariant                          │
//! │  • Easy to exercise against an in-memory database in tests              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`account::AccountRepository`] - users + profiles (registration, lookup)
//! - [`rate::RateRepository`] - exchange-rate resolution and rotation
//! - [`recycling::RecyclingRepository`] - submission ledger + balance credit
//! - [`redemption::RedemptionRepository`] - atomic redemption transaction

pub mod account;
pub mod rate;
pub mod recycling;
pub mod redemption;
