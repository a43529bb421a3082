//! HTTP request handlers.
//!
//! ## Handler Organization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Route → Handler Map                              │
//! │                                                                         │
//! │  /api/v1/auth/*      → auth.rs     signup, signin, refresh             │
//! │  /api/v1/profile     → profile.rs  own profile                         │
//! │  /api/v1/rate        → rate.rs     active rate (cached)                │
//! │  /api/v1/recycle*    → recycle.rs  submissions + own history           │
//! │  /api/v1/admin/*     → profile.rs / rate.rs / recycle.rs / redeem.rs   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod profile;
pub mod rate;
pub mod recycle;
pub mod redeem;
