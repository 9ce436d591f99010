//! Workflow step definitions and invocation results

use crate::template::PromptTemplate;
use crate::tools::Tool;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One pipeline stage: a prompt template and an optional tool.
///
/// The tool is resolved when the step is added and held directly, so later
/// registry changes never rebind it.
#[derive(Debug, Clone)]
pub struct Step {
    pub(crate) name: String,
    pub(crate) template: PromptTemplate,
    pub(crate) tool: Option<Arc<Tool>>,
}

impl Step {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &PromptTemplate {
        &self.template
    }

    pub fn tool(&self) -> Option<&Arc<Tool>> {
        self.tool.as_ref()
    }

    pub fn tool_name(&self) -> Option<&str> {
        self.tool.as_deref().map(Tool::name)
    }
}

/// Record of one executed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTrace {
    pub step: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_result: Option<String>,
    pub response: String,
}

/// Outcome of a successful invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResult {
    /// Response of the last step
    #[serde(rename = "final")]
    pub final_answer: String,

    /// One entry per configured step, in step order
    pub trace: Vec<StepTrace>,
}
