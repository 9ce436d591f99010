pub mod builtin;

use crate::workflow::ChainContext;
use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// Behavior behind a tool.
///
/// Synchronous and asynchronous handlers share this one awaited entry point,
/// so the step loop treats both identically.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, input: &str, ctx: &ChainContext) -> Result<String>;
}

struct FnHandler<F>(F);

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(&str, &ChainContext) -> Result<String> + Send + Sync,
{
    async fn call(&self, input: &str, ctx: &ChainContext) -> Result<String> {
        (self.0)(input, ctx)
    }
}

type AsyncFn = dyn Fn(String, ChainContext) -> BoxFuture<'static, Result<String>> + Send + Sync;

struct AsyncFnHandler(Box<AsyncFn>);

#[async_trait]
impl ToolHandler for AsyncFnHandler {
    async fn call(&self, input: &str, ctx: &ChainContext) -> Result<String> {
        (self.0)(input.to_string(), ctx.clone()).await
    }
}

/// A named, described capability a step can invoke
pub struct Tool {
    name: String,
    description: String,
    handler: Box<dyn ToolHandler>,
}

impl Tool {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl ToolHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            handler: Box::new(handler),
        }
    }

    /// Wrap a synchronous closure
    pub fn from_fn<F>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(&str, &ChainContext) -> Result<String> + Send + Sync + 'static,
    {
        Self::new(name, description, FnHandler(f))
    }

    /// Wrap a closure returning a future. The closure receives owned copies
    /// of the input and context so the future can outlive the call site.
    pub fn from_async<F, Fut>(name: impl Into<String>, description: impl Into<String>, f: F) -> Self
    where
        F: Fn(String, ChainContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        let boxed: Box<AsyncFn> = Box::new(
            move |input: String, ctx: ChainContext| -> BoxFuture<'static, Result<String>> {
                Box::pin(f(input, ctx))
            },
        );
        Self::new(name, description, AsyncFnHandler(boxed))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Run the handler and label its output as `name (description): result`.
    ///
    /// Handler errors are returned as-is.
    pub async fn invoke(&self, input: &str, ctx: &ChainContext) -> Result<String> {
        debug!("Invoking tool '{}' ({} bytes input)", self.name, input.len());
        let raw = self.handler.call(input, ctx).await?;
        Ok(format!("{} ({}): {}", self.name, self.description, raw))
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Registry of tools available to workflow steps.
///
/// Steps keep the `Arc<Tool>` they resolved when they were added, so
/// re-registering a name only affects steps added afterwards.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the tool under its name
    pub fn register(&mut self, tool: Tool) -> Arc<Tool> {
        let tool = Arc::new(tool);
        if self
            .tools
            .insert(tool.name().to_string(), Arc::clone(&tool))
            .is_some()
        {
            debug!("Replaced tool '{}'", tool.name());
        }
        tool
    }

    pub fn lookup(&self, name: &str) -> Option<Arc<Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tools sorted by name
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Tool>> {
        let mut tools: Vec<&Arc<Tool>> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name().cmp(b.name()));
        tools.into_iter()
    }
}
