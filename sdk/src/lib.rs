//! Strand SDK
//!
//! Shared types for Strand components: the engine error taxonomy and the
//! metadata values callers thread through a workflow invocation.

/// Error types and handling
pub mod errors;

/// Roles and metadata types
pub mod types;

// Re-export commonly used types
pub use errors::{EngineError, StrandErrorExt, NO_STEPS_MESSAGE};
pub use types::{Metadata, MetadataValue, Role};
