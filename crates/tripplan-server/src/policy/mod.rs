//! HTTP boundary policy.
//!
//! Adapts the core origin filter into the tower middleware stack.

pub mod cors;
