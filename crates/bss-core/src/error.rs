//! Shared error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

use crate::ScenarioParams;

/// The error type for `bss-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    /// A cached artefact was produced under a different scenario descriptor.
    /// Never coerced: the operator has to rebuild the cache or change the
    /// scenario.
    #[error("incompatible parameters: expected {expected:?}, cache was built with {found:?}")]
    IncompatibleParams {
        expected: Box<ScenarioParams>,
        found:    Box<ScenarioParams>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shorthand result type for `bss-core`.
pub type CoreResult<T> = Result<T, CoreError>;
