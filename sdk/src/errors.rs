//! Error types and handling
//!
//! This module provides the error types used throughout the Strand engine.
//! All errors implement the `StrandErrorExt` trait which provides user-friendly
//! hints and indicates whether errors are recoverable.
//!
//! # Propagation
//!
//! Tool handler failures are carried through `EngineError::Tool` untouched:
//! the variant is transparent, so `Display` and `source()` are exactly the
//! handler's own error.

use std::time::Duration;
use thiserror::Error;

/// Message returned when a workflow with no steps is invoked.
///
/// Callers match on this text in negative tests; it must not change.
pub const NO_STEPS_MESSAGE: &str = "No steps registered in the LangChain workflow.";

/// Trait for Strand error extensions
///
/// This trait provides additional context for errors, including user-friendly
/// hints and recoverability information. All engine errors implement this trait.
pub trait StrandErrorExt {
    /// Returns a user-friendly hint for the error
    ///
    /// The hint is a static string and never echoes handler output or
    /// caller-supplied text.
    fn user_hint(&self) -> &str;

    /// Returns whether the error is recoverable
    ///
    /// Recoverable errors can be retried or worked around. Non-recoverable
    /// errors require the workflow definition to be fixed.
    fn is_recoverable(&self) -> bool;
}

/// Main engine error type
///
/// # Error Categories
///
/// - **Build**: a step referenced a tool that was never registered
/// - **Invocation guard**: the workflow has no steps
/// - **Tool**: a handler failed or exceeded its configured timeout
/// - **Synthesis**: a pluggable response synthesizer failed
/// - **Configuration**: invalid or unreadable configuration
///
/// # Examples
///
/// ```
/// use sdk::errors::{EngineError, StrandErrorExt};
///
/// let error = EngineError::UnregisteredTool("search".to_string());
/// assert_eq!(error.to_string(), "Tool not registered: search");
/// assert!(!error.is_recoverable());
///
/// let guard = EngineError::NoSteps;
/// assert_eq!(guard.to_string(), "No steps registered in the LangChain workflow.");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    // Build errors
    #[error("Tool not registered: {0}")]
    UnregisteredTool(String),

    // Invocation guard
    #[error("No steps registered in the LangChain workflow.")]
    NoSteps,

    // Tool errors
    #[error(transparent)]
    Tool(anyhow::Error),

    #[error("Tool '{tool}' timed out after {limit:?}")]
    ToolTimeout { tool: String, limit: Duration },

    // Response synthesis errors
    #[error(transparent)]
    Synthesis(anyhow::Error),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StrandErrorExt for EngineError {
    fn user_hint(&self) -> &str {
        match self {
            Self::UnregisteredTool(_) => "Register the tool before adding a step that uses it",
            Self::NoSteps => "Add at least one step to the workflow",
            Self::Tool(_) => "Tool operation failed",
            Self::ToolTimeout { .. } => "Tool took too long to respond. Try again",
            Self::Synthesis(_) => "Could not produce a response for this step",
            Self::Config(_) => "Check your config.toml file for errors",
            Self::Io(_) => "File system operation failed",
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            // Definition errors: retrying the same workflow cannot succeed
            Self::UnregisteredTool(_) | Self::NoSteps | Self::Config(_) => false,

            Self::Tool(_) | Self::ToolTimeout { .. } | Self::Synthesis(_) | Self::Io(_) => true,
        }
    }
}
