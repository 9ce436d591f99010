//! Integration tests for configuration management
//!
//! These tests verify that configuration files load, validate, and build
//! the workflow they describe.

use std::fs;
use tempfile::TempDir;

use sdk::errors::EngineError;
use strand_engine::config::Config;
use strand_engine::workflow::Workflow;

const STATION_CONFIG: &str = r#"
[core]
log_level = "debug"

[memory]
window = 2

[execution]
tool_timeout_secs = 5

[tools]
enabled = ["echo", "word_count"]

[[steps]]
name = "observe"
template = "{{ memory }}\n{{ input }}"
tool = "echo"

[[steps]]
name = "count"
template = "{{ metadata }}"
tool = "word_count"

[[steps]]
name = "answer"
template = "Observations: {{ toolResults }}"
"#;

#[test]
fn test_load_from_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, STATION_CONFIG).unwrap();

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.core.log_level, "debug");
    assert_eq!(config.memory.window, 2);
    assert_eq!(config.execution.tool_timeout_secs, Some(5));
    assert_eq!(config.steps.len(), 3);
    assert_eq!(config.steps[2].tool, None);
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, EngineError::Config(_)));
}

#[test]
fn test_malformed_toml_is_config_error() {
    let err = Config::from_toml_str("[memory\nwindow = 2").unwrap_err();
    assert!(err.to_string().starts_with("Configuration error: Failed to parse config"));
}

#[tokio::test]
async fn test_workflow_from_config() {
    let config = Config::from_toml_str(STATION_CONFIG).unwrap();
    let workflow = Workflow::from_config(&config).unwrap();

    assert_eq!(workflow.steps().len(), 3);
    assert_eq!(workflow.tools().len(), 2);
    assert_eq!(workflow.memory().limit(), 2);

    let result = workflow.run("how many alarms are active").await.unwrap();
    assert_eq!(result.trace.len(), 3);
    assert!(result.trace[0].tool_result.as_deref().unwrap().starts_with("echo ("));
    assert_eq!(
        result.trace[1].tool_result.as_deref(),
        Some("word_count (counts words in its input): 1")
    );
    assert!(result.final_answer.contains("word_count"));
    assert_eq!(workflow.memory().len(), 2);
}

#[test]
fn test_step_referencing_disabled_tool_fails() {
    let toml = r#"
[tools]
enabled = ["clock"]

[[steps]]
name = "observe"
template = "{{ input }}"
tool = "echo"
"#;
    let config = Config::from_toml_str(toml).unwrap();
    let err = Workflow::from_config(&config).err().unwrap();
    assert!(matches!(err, EngineError::UnregisteredTool(ref name) if name == "echo"));
}

#[test]
fn test_default_config_builds() {
    let config = Config::default_config();
    let workflow = Workflow::from_config(&config).unwrap();
    assert_eq!(workflow.steps()[0].tool_name(), Some("echo"));
    assert_eq!(workflow.steps()[1].tool_name(), None);
}
