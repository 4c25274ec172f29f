//! Shared error type across tripplan crates.

use thiserror::Error;

/// Stable error codes (used in logs and by tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Configuration could not be read, parsed, or validated.
    Config,
    /// Migration bootstrap failed.
    Migration,
    /// Socket or filesystem failure.
    Io,
    /// Internal server error.
    Internal,
}

impl ErrorCode {
    /// String representation used in structured log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Config => "CONFIG",
            ErrorCode::Migration => "MIGRATION",
            ErrorCode::Io => "IO",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TripPlanError>;

/// Unified error type used by core and server.
///
/// Admission denial is not represented here: a denied origin is a normal
/// outcome of [`crate::origin::OriginFilter::admit`].
#[derive(Debug, Error)]
pub enum TripPlanError {
    #[error("config: {0}")]
    Config(String),
    #[error("migration failed: {0}")]
    Migration(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl TripPlanError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            TripPlanError::Config(_) => ErrorCode::Config,
            TripPlanError::Migration(_) => ErrorCode::Migration,
            TripPlanError::Io(_) => ErrorCode::Io,
            TripPlanError::Internal(_) => ErrorCode::Internal,
        }
    }
}
