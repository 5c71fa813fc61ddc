//! # API Shared
//!
//! Shared definitions for the rxcheck HTTP API.
//!
//! Contains:
//! - JSON wire types (`wire` module) used by both the server and the HTTP client
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` and `rx-client`.

pub mod health;
pub mod wire;

pub use health::HealthService;
pub use wire::*;
