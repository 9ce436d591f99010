//! Strand Engine Library
//!
//! Conversational workflow orchestration: a bounded conversation memory,
//! prompt templates, a tool registry and a sequential step pipeline.
//! It is used by both the `strand` binary and integration tests.

/// Configuration management module
pub mod config;

/// Bounded conversation memory
pub mod memory;

/// Prompt template substitution
pub mod template;

/// Tools and the tool registry
pub mod tools;

/// Workflow build and execution
pub mod workflow;

/// Telemetry and Observability
pub mod telemetry;

/// CLI interface module
pub mod cli;

/// Command handlers module
pub mod handlers;

pub use memory::{ConversationMemory, MemoryEntry, SharedMemory};
pub use template::PromptTemplate;
pub use tools::{Tool, ToolHandler, ToolRegistry};
pub use workflow::{ChainContext, StepTrace, Workflow, WorkflowOptions, WorkflowResult};
