//! Tool-specific error types.

use thiserror::Error;

/// Errors that can occur during tool operations.
///
/// `InsufficientData` and `DomainValidation` are raised by the calculator
/// functions themselves; the remaining variants belong to the dispatch layer.
/// All of them are converted to in-band error results at the dispatcher
/// boundary and never escape as process-level failures.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Not enough data points to run the algorithm.
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Semantically invalid input (out-of-range value, zero divisor).
    #[error("Invalid input: {0}")]
    DomainValidation(String),

    /// The tool execution failed.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new "insufficient data" error.
    pub fn insufficient_data(msg: impl Into<String>) -> Self {
        Self::InsufficientData(msg.into())
    }

    /// Create a new "domain validation" error.
    pub fn domain_validation(msg: impl Into<String>) -> Self {
        Self::DomainValidation(msg.into())
    }

    /// Create a new "execution failed" error.
    pub fn execution_failed(msg: impl Into<String>) -> Self {
        Self::ExecutionFailed(msg.into())
    }
}
