//! Top-level facade crate for tripplan.
//!
//! Re-exports the core admission types and the server library so users can depend on a single crate.

pub mod core {
    pub use tripplan_core::*;
}

pub mod server {
    pub use tripplan_server::*;
}
