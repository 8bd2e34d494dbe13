//! Sentinel Core
//!
//! Core types and abstractions for the Sentinel vehicle identity verification
//! dashboard.
//!
//! This crate contains:
//! - Domain types: snapshots, match results, session status, statistics
//! - DTOs: payloads exchanged between the dashboard server and its clients
//! - Data URL encoding used to inline images into analysis requests

pub mod data_url;
pub mod domain;
pub mod dto;

pub use data_url::{DataUrl, DataUrlError};
