//! Deposit Sync Core
//!
//! This module provides the incremental chain-sync engine that watches a
//! fixed set of Filecoin addresses for incoming deposits and records each
//! one exactly once. It is composed of several submodules, each responsible
//! for one aspect of a sync pass:
//!
//! - `service`: The poll loop and the single-pass driver wiring all the
//!   pieces together, with per-item failure isolation.
//! - `cursor`: The persisted per-network synced-height state machine.
//! - `height_oracle`: Chain tip lookups, memoized with a short TTL.
//! - `sources`: The primary chain-query discovery path.
//! - `recorder`: The deduplication and persistence point both discovery
//!   sources funnel through.
//! - `repositories`: Persistence trait seams plus file-based
//!   implementations.
//! - `address`: Address prefix normalization between network variants.
//! - `types`: The domain model and the core error type.
//!
//! Passes run sequentially per network and never overlap; the cursor only
//! advances after a pass has fully processed its height range, so a crash
//! mid-pass re-reads the same range and the recorder's deduplication makes
//! that replay idempotent.

/// Address prefix normalization between network variants
pub mod address;
/// Persisted synced-height state machine
pub mod cursor;
/// Memoized chain tip lookups
pub mod height_oracle;
/// Deduplicating deposit persistence
pub mod recorder;
/// Persistence trait seams and file-based implementations
pub mod repositories;
/// Poll loop and single-pass driver
pub mod service;
/// Chain-query discovery path
pub mod sources;
/// Domain model and core error type
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use service::DepositIndexer;
pub use types::*;
