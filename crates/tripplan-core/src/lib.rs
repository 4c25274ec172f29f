//! tripplan core: transport-agnostic origin admission and the shared error type.
//!
//! The crate carries no HTTP or runtime dependencies; the server crate adapts
//! [`origin::OriginFilter`] into its middleware stack.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod origin;

/// Shared result type.
pub use error::{ErrorCode, Result, TripPlanError};
pub use origin::{Admission, AllowedOrigins, OriginFilter};
