//! Built-in Tools
//!
//! Small native tools the `strand` binary can register by name from the
//! `[tools] enabled` list.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};

use super::{Tool, ToolHandler, ToolRegistry};
use crate::workflow::ChainContext;

/// Names accepted in `[tools] enabled`
pub const BUILTIN_TOOL_NAMES: &[&str] = &["echo", "clock", "word_count"];

/// Characters of input the echo tool repeats back
const ECHO_TAIL_CHARS: usize = 30;

/// Repeats the tail of its input
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoTool;

impl EchoTool {
    pub fn echo(&self, input: &str) -> String {
        let count = input.chars().count();
        let tail: String = input.chars().skip(count.saturating_sub(ECHO_TAIL_CHARS)).collect();
        format!("echo:{}", tail)
    }
}

#[async_trait]
impl ToolHandler for EchoTool {
    async fn call(&self, input: &str, _ctx: &ChainContext) -> Result<String> {
        Ok(self.echo(input))
    }
}

/// Reports the current UTC time
#[derive(Debug, Clone, Copy, Default)]
pub struct ClockTool;

#[async_trait]
impl ToolHandler for ClockTool {
    async fn call(&self, _input: &str, _ctx: &ChainContext) -> Result<String> {
        Ok(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// Counts whitespace-separated words
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCountTool;

#[async_trait]
impl ToolHandler for WordCountTool {
    async fn call(&self, input: &str, _ctx: &ChainContext) -> Result<String> {
        Ok(input.split_whitespace().count().to_string())
    }
}

/// Build a built-in tool by name
pub fn builtin_tool(name: &str) -> Option<Tool> {
    let tool = match name {
        "echo" => Tool::new("echo", "repeats the tail of its input", EchoTool),
        "clock" => Tool::new("clock", "current UTC time", ClockTool),
        "word_count" => Tool::new("word_count", "counts words in its input", WordCountTool),
        _ => return None,
    };
    Some(tool)
}

/// Register each named built-in, returning the first unknown name on failure.
pub fn register_builtins<'a>(
    registry: &mut ToolRegistry,
    names: impl IntoIterator<Item = &'a str>,
) -> std::result::Result<(), String> {
    for name in names {
        let tool = builtin_tool(name).ok_or_else(|| name.to_string())?;
        registry.register(tool);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{ConversationMemory, SharedMemory};
    use sdk::types::Metadata;

    fn ctx() -> ChainContext {
        ChainContext::new(
            SharedMemory::new(ConversationMemory::with_limit(2)),
            Metadata::new(),
        )
    }

    #[test]
    fn test_echo_keeps_last_30_chars() {
        let echo = EchoTool;
        assert_eq!(echo.echo("short"), "echo:short");

        let long = "a".repeat(10) + &"b".repeat(30);
        assert_eq!(echo.echo(&long), format!("echo:{}", "b".repeat(30)));
    }

    #[test]
    fn test_echo_is_char_boundary_safe() {
        let input = "é".repeat(40);
        assert_eq!(EchoTool.echo(&input), format!("echo:{}", "é".repeat(30)));
    }

    #[tokio::test]
    async fn test_word_count() {
        let out = WordCountTool.call("  one two\tthree\n", &ctx()).await.unwrap();
        assert_eq!(out, "3");
    }

    #[tokio::test]
    async fn test_clock_is_rfc3339() {
        let out = ClockTool.call("", &ctx()).await.unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&out).is_ok());
    }

    #[test]
    fn test_every_listed_builtin_exists() {
        for name in BUILTIN_TOOL_NAMES {
            let tool = builtin_tool(name).expect("listed builtin must build");
            assert_eq!(tool.name(), *name);
        }
        assert!(builtin_tool("rm").is_none());
    }

    #[test]
    fn test_register_builtins_reports_unknown() {
        let mut registry = ToolRegistry::new();
        let err = register_builtins(&mut registry, ["echo", "teleport"]).unwrap_err();
        assert_eq!(err, "teleport");
        assert!(registry.contains("echo"));
    }
}
