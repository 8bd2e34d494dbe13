//! Service Module
//!
//! Business logic layer for the dashboard.
//! Services coordinate the session repository and the analysis client.

pub mod session;
pub mod upload;

// Re-export for convenience
pub use session as session_service;
pub use upload as upload_service;
