//! Command handlers for CLI operations
//!
//! - run: invoke the workflow once
//! - chat: line-by-line conversation over stdin
//! - steps / tools: inspect the configured workflow
//! - config show / path

use anyhow::Result;
use sdk::errors::StrandErrorExt;
use sdk::types::{Metadata, MetadataValue};
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::workflow::{Workflow, WorkflowResult};

/// Output format for command results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON output for machine consumption
    Json,
}

/// Build metadata from `--meta` pairs, parsing values as bool, number or string.
pub fn metadata_from_pairs(pairs: &[(String, String)]) -> Metadata {
    pairs
        .iter()
        .map(|(key, value)| (key.clone(), MetadataValue::parse_loose(value)))
        .collect()
}

fn print_result(result: &WorkflowResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{}", result.final_answer);
        }
        OutputFormat::Json => {
            let output = json!({
                "status": "completed",
                "final": result.final_answer,
                "trace": result.trace,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_failure(error: &sdk::EngineError, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("✗ {}", error);
            println!("  Hint: {}", error.user_hint());
        }
        OutputFormat::Json => {
            let output = json!({
                "status": "failed",
                "error": error.to_string(),
                "hint": error.user_hint(),
                "recoverable": error.is_recoverable(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

/// Run the workflow once for `query`.
///
/// A failed invocation is reported here and returns `Ok(false)`, so the
/// caller only has to pick the exit status.
pub async fn handle_run(
    query: String,
    meta: &[(String, String)],
    config: &Config,
    format: OutputFormat,
) -> Result<bool> {
    let workflow = Workflow::from_config(config)?;

    match workflow.invoke(&query, metadata_from_pairs(meta)).await {
        Ok(result) => {
            if format == OutputFormat::Text {
                for step in &result.trace {
                    tracing::debug!("[{}] {}", step.step, step.response);
                }
            }
            print_result(&result, format)?;
            Ok(true)
        }
        Err(e) => {
            print_failure(&e, format)?;
            Ok(false)
        }
    }
}

/// Read queries from stdin until EOF or `/quit`.
///
/// Failures are reported and the session continues. `/memory` prints the
/// current conversation summary.
pub async fn handle_chat(config: &Config, format: OutputFormat) -> Result<()> {
    let workflow = Workflow::from_config(config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let query = line.trim();
        match query {
            "" => continue,
            "/quit" | "/exit" => break,
            "/memory" => {
                println!("{}", workflow.memory().summarize());
                continue;
            }
            _ => {}
        }

        match workflow.invoke(query, Metadata::new()).await {
            Ok(result) => print_result(&result, format)?,
            Err(e) => print_failure(&e, format)?,
        }
    }

    Ok(())
}

/// List configured steps and their bound tools
pub fn handle_steps(config: &Config, format: OutputFormat) -> Result<()> {
    let workflow = Workflow::from_config(config)?;

    match format {
        OutputFormat::Text => {
            if workflow.steps().is_empty() {
                println!("No steps configured.");
            }
            for (index, step) in workflow.steps().iter().enumerate() {
                println!(
                    "{}. {} (tool: {})",
                    index + 1,
                    step.name(),
                    step.tool_name().unwrap_or("none")
                );
            }
        }
        OutputFormat::Json => {
            let steps: Vec<_> = workflow
                .steps()
                .iter()
                .map(|step| {
                    json!({
                        "name": step.name(),
                        "template": step.template().source(),
                        "placeholders": step.template().placeholders(),
                        "tool": step.tool_name(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&steps)?);
        }
    }
    Ok(())
}

/// List registered tools
pub fn handle_tools(config: &Config, format: OutputFormat) -> Result<()> {
    let workflow = Workflow::from_config(config)?;

    match format {
        OutputFormat::Text => {
            for tool in workflow.tools().iter() {
                println!("{:<12} {}", tool.name(), tool.description());
            }
        }
        OutputFormat::Json => {
            let tools: Vec<_> = workflow
                .tools()
                .iter()
                .map(|tool| json!({ "name": tool.name(), "description": tool.description() }))
                .collect();
            println!("{}", serde_json::to_string_pretty(&tools)?);
        }
    }
    Ok(())
}

/// Print the effective configuration
pub fn handle_config_show(config: &Config, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print!("{}", config.to_toml_string()?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config)?),
    }
    Ok(())
}

/// Print the default configuration path
pub fn handle_config_path(format: OutputFormat) -> Result<()> {
    let path = Config::default_config_path()?;
    match format {
        OutputFormat::Text => println!("{}", path.display()),
        OutputFormat::Json => println!("{}", json!({ "path": path })),
    }
    Ok(())
}
