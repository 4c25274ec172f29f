//! tripplan server library entry.
//!
//! Wires config, the CORS admission layer, ops endpoints and externally
//! supplied route groups into an axum application. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod bootstrap;
pub mod config;
pub mod migrate;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
