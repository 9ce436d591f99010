//! Workflow Engine
//!
//! Owns a tool registry, an ordered list of steps and one conversation
//! memory. Each invocation runs every step in order:
//!
//! 1. Format the step template with `input`, `memory`, `metadata` and `toolResults`
//! 2. Invoke the bound tool, if any, and record its output in the context
//! 3. Synthesize the step response and append it to the trace
//! 4. Append the response to memory and feed it to the next step as `input`
//!
//! An invocation either returns a complete trace or fails; no partial
//! results are returned. Invocations on one workflow are serialized, so
//! memory appends from concurrent callers never interleave.

pub mod context;
pub mod synthesis;
pub mod types;

pub use context::ChainContext;
pub use synthesis::{HeuristicSynthesizer, Synthesizer, FALLBACK_RESPONSE};
pub use types::{Step, StepTrace, WorkflowResult};

use anyhow::Result as AnyResult;
use sdk::errors::EngineError;
use sdk::types::{Metadata, Role};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::memory::{ConversationMemory, SharedMemory, DEFAULT_MEMORY_WINDOW};
use crate::template::PromptTemplate;
use crate::tools::builtin::register_builtins;
use crate::tools::{Tool, ToolRegistry};

/// Tunables fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkflowOptions {
    /// Conversation memory window, in entries
    pub memory_window: usize,

    /// Upper bound on a single tool call; `None` waits indefinitely
    pub tool_timeout: Option<Duration>,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            memory_window: DEFAULT_MEMORY_WINDOW,
            tool_timeout: None,
        }
    }
}

/// Sequential prompt/tool pipeline with persistent conversation memory
pub struct Workflow {
    tools: ToolRegistry,
    steps: Vec<Step>,
    memory: SharedMemory,
    synthesizer: Arc<dyn Synthesizer>,
    options: WorkflowOptions,
    invoke_lock: Mutex<()>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::with_options(WorkflowOptions::default())
    }

    pub fn with_options(options: WorkflowOptions) -> Self {
        Self {
            tools: ToolRegistry::new(),
            steps: Vec::new(),
            memory: SharedMemory::new(ConversationMemory::with_limit(options.memory_window)),
            synthesizer: Arc::new(HeuristicSynthesizer),
            options,
            invoke_lock: Mutex::new(()),
        }
    }

    /// Build a workflow from configuration: enabled built-in tools first,
    /// then the configured steps in file order.
    pub fn from_config(config: &Config) -> Result<Self, EngineError> {
        let mut workflow = Self::with_options(WorkflowOptions {
            memory_window: config.memory.window,
            tool_timeout: config.execution.tool_timeout_secs.map(Duration::from_secs),
        });

        register_builtins(
            &mut workflow.tools,
            config.tools.enabled.iter().map(String::as_str),
        )
        .map_err(|name| EngineError::Config(format!("Unknown built-in tool: {}", name)))?;

        for step in &config.steps {
            workflow.add_step(&step.name, step.template.as_str(), step.tool.as_deref())?;
        }

        info!(
            "Built workflow with {} steps and {} tools",
            workflow.steps.len(),
            workflow.tools.len()
        );
        Ok(workflow)
    }

    /// Replace the response synthesizer
    pub fn with_synthesizer(mut self, synthesizer: impl Synthesizer + 'static) -> Self {
        self.synthesizer = Arc::new(synthesizer);
        self
    }

    /// Insert or replace a tool. Steps already added keep the tool they resolved.
    pub fn register_tool(&mut self, tool: Tool) -> Arc<Tool> {
        self.tools.register(tool)
    }

    /// Register a synchronous closure as a tool
    pub fn register_fn<F>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        f: F,
    ) -> Arc<Tool>
    where
        F: Fn(&str, &ChainContext) -> AnyResult<String> + Send + Sync + 'static,
    {
        self.register_tool(Tool::from_fn(name, description, f))
    }

    /// Register an asynchronous closure as a tool
    pub fn register_async<F, Fut>(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        f: F,
    ) -> Arc<Tool>
    where
        F: Fn(String, ChainContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AnyResult<String>> + Send + 'static,
    {
        self.register_tool(Tool::from_async(name, description, f))
    }

    /// Append a step. A named tool must already be registered; it is bound now.
    pub fn add_step(
        &mut self,
        name: impl Into<String>,
        template: impl Into<PromptTemplate>,
        tool: Option<&str>,
    ) -> Result<(), EngineError> {
        let name = name.into();
        let tool = match tool {
            Some(tool_name) => Some(
                self.tools
                    .lookup(tool_name)
                    .ok_or_else(|| EngineError::UnregisteredTool(tool_name.to_string()))?,
            ),
            None => None,
        };

        debug!(step = %name, tool = ?tool.as_deref().map(Tool::name), "Added step");
        self.steps.push(Step {
            name,
            template: template.into(),
            tool,
        });
        Ok(())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Handle to the workflow's conversation memory
    pub fn memory(&self) -> &SharedMemory {
        &self.memory
    }

    pub fn options(&self) -> WorkflowOptions {
        self.options
    }

    /// Invoke with no metadata
    pub async fn run(&self, query: &str) -> Result<WorkflowResult, EngineError> {
        self.invoke(query, Metadata::new()).await
    }

    /// Run every step once for `query`.
    ///
    /// # Errors
    ///
    /// - `EngineError::NoSteps` when no steps are configured
    /// - `EngineError::Tool` with the handler's own error when a tool fails
    /// - `EngineError::ToolTimeout` when a configured tool timeout expires
    /// - `EngineError::Synthesis` when the synthesizer fails
    pub async fn invoke(
        &self,
        query: &str,
        metadata: Metadata,
    ) -> Result<WorkflowResult, EngineError> {
        if self.steps.is_empty() {
            return Err(EngineError::NoSteps);
        }

        let _serial = self.invoke_lock.lock().await;
        let start = Instant::now();
        info!("Invoking workflow ({} steps)", self.steps.len());

        let mut ctx = ChainContext::new(self.memory.clone(), metadata);
        self.memory.append(Role::User, query);

        let mut previous = query.to_string();
        let mut trace = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            let mut variables: HashMap<&str, String> = HashMap::with_capacity(4);
            variables.insert("input", std::mem::take(&mut previous));
            variables.insert("memory", self.memory.summarize());
            variables.insert("metadata", ctx.metadata_json());
            variables.insert("toolResults", ctx.tool_results_json());

            let prompt = step.template.format(&variables);
            debug!(step = %step.name, "Formatted prompt ({} bytes)", prompt.len());

            let tool_result = match &step.tool {
                Some(tool) => {
                    let output = self.call_tool(tool, &prompt, &ctx).await?;
                    ctx.record_tool_result(tool.name(), output.clone());
                    Some(output)
                }
                None => None,
            };

            let response = self
                .synthesizer
                .synthesize(&prompt, tool_result.as_deref())
                .await
                .map_err(EngineError::Synthesis)?;

            trace.push(StepTrace {
                step: step.name.clone(),
                prompt,
                tool_result,
                response: response.clone(),
            });

            self.memory.append(Role::Assistant, response.as_str());
            previous = response;
        }

        info!(
            "Workflow completed in {:.1}ms ({} steps)",
            start.elapsed().as_secs_f64() * 1000.0,
            trace.len()
        );

        Ok(WorkflowResult {
            final_answer: previous,
            trace,
        })
    }

    async fn call_tool(
        &self,
        tool: &Tool,
        prompt: &str,
        ctx: &ChainContext,
    ) -> Result<String, EngineError> {
        let call = tool.invoke(prompt, ctx);

        let outcome = match self.options.tool_timeout {
            Some(limit) => timeout(limit, call).await.map_err(|_| {
                warn!("Tool '{}' timed out after {:?}", tool.name(), limit);
                EngineError::ToolTimeout {
                    tool: tool.name().to_string(),
                    limit,
                }
            })?,
            None => call.await,
        };

        outcome.map_err(|e| {
            warn!("Tool '{}' failed: {}", tool.name(), e);
            EngineError::Tool(e)
        })
    }
}

impl Default for Workflow {
    fn default() -> Self {
        Self::new()
    }
}
