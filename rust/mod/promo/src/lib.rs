//! Promotions feed with a gamified scoring engine.
//!
//! Users post promotions and react to each other's. Every reaction becomes a
//! signed entry in an append-only score ledger; the owner's total score,
//! level and tier are kept in step with it, and leaderboards rank users by
//! points earned in a trailing window.

pub mod config;
pub mod engine;
pub mod model;
pub mod repository;
pub mod service;
pub mod store_impls;

pub use config::{EngineConfig, PromoSettings};
pub use repository::PromoRepository;
pub use service::PromoService;
pub use store_impls::KvRepository;
