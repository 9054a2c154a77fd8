//!
//! Utility module for the deposit indexer.
//!
//! Re-exports formatting helpers for use throughout the codebase.
/// Utility functions for formatting and display
pub mod index;

pub use index::format_fil_amount;
