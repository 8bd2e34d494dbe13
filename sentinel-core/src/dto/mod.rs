//! Data Transfer Objects
//!
//! Payloads exchanged between the dashboard server and its clients (the CLI
//! and any browser script). Domain types are embedded where the shape is
//! already right for the wire.

pub mod session;
pub mod snapshot;
