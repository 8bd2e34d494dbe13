//! Core domain types
//!
//! This module contains the core domain structures used across Sentinel crates.
//! They are shared between the server (which holds them in session state), the
//! analysis client (which sends snapshots out and parses match results back)
//! and the CLI (which renders them).

pub mod log;
pub mod matching;
pub mod session;
pub mod snapshot;
pub mod stats;
