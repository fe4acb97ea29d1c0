//! Error types
//!
//! Everything here is a configuration problem caught before the first tick.
//! Runtime ticks never fail.

use thiserror::Error;

/// Errors raised while building tethers or loading settings
#[derive(Debug, Error)]
pub enum TetherError {
    /// The requested anchor does not exist in the registry
    #[error("no anchor with id {anchor_id}")]
    MissingAnchor { anchor_id: u32 },

    /// A tuning value is unusable (non-finite, or a zero/negative divisor)
    #[error("invalid {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    /// Settings file could not be read or written
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid JSON for `Settings`
    #[error("settings parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

impl TetherError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        TetherError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TetherError>;
