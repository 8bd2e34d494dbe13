//! Repository Module
//!
//! Storage layer for the dashboard. The whole session lives in memory and is
//! gone when the process exits.

pub mod activity_log;
pub mod session;

// Re-export for convenience
pub use session as session_repository;
