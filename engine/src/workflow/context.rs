//! Per-invocation chain context
//!
//! Created fresh for every `Workflow::invoke` call and dropped when it
//! returns. Tool outputs accumulate here step by step, so a step only ever
//! sees results from tools invoked before it (and its own, once recorded).

use crate::memory::SharedMemory;
use sdk::types::Metadata;
use std::collections::BTreeMap;

/// State threaded through every step of one invocation
#[derive(Debug, Clone)]
pub struct ChainContext {
    memory: SharedMemory,
    metadata: Metadata,
    tool_results: BTreeMap<String, String>,
}

impl ChainContext {
    pub(crate) fn new(memory: SharedMemory, metadata: Metadata) -> Self {
        Self {
            memory,
            metadata,
            tool_results: BTreeMap::new(),
        }
    }

    /// The workflow's persistent conversation memory
    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    /// Caller-supplied metadata for this invocation
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Last wrapped output of every tool invoked so far, keyed by tool name
    pub fn tool_results(&self) -> &BTreeMap<String, String> {
        &self.tool_results
    }

    pub fn tool_result(&self, tool: &str) -> Option<&str> {
        self.tool_results.get(tool).map(String::as_str)
    }

    /// Last write wins when the same tool runs in several steps.
    pub(crate) fn record_tool_result(&mut self, tool: &str, output: String) {
        self.tool_results.insert(tool.to_string(), output);
    }

    /// Metadata rendered as compact JSON for template substitution
    pub fn metadata_json(&self) -> String {
        serde_json::to_string(&self.metadata).unwrap_or_else(|_| "{}".to_string())
    }

    /// Accumulated tool results rendered as compact JSON for template substitution
    pub fn tool_results_json(&self) -> String {
        serde_json::to_string(&self.tool_results).unwrap_or_else(|_| "{}".to_string())
    }
}
