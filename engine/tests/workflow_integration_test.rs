//! Integration tests for the workflow engine
//!
//! End-to-end scenarios through the public API:
//! - Trace completeness and step ordering
//! - Tool output accumulation across steps
//! - Fail-fast tool binding and the empty-workflow guard
//! - Memory window trimming across invocations

use std::sync::{Arc, Mutex};

use sdk::errors::EngineError;
use sdk::types::{Metadata, MetadataValue, Role};
use strand_engine::workflow::{Workflow, WorkflowOptions, FALLBACK_RESPONSE};

fn echo_workflow(window: usize) -> Workflow {
    let mut workflow = Workflow::with_options(WorkflowOptions {
        memory_window: window,
        tool_timeout: None,
    });
    workflow.register_fn("echo", "repeats the tail of its input", |input, _ctx| {
        let count = input.chars().count();
        let tail: String = input.chars().skip(count.saturating_sub(30)).collect();
        Ok(format!("echo:{}", tail))
    });
    workflow
}

#[tokio::test]
async fn test_echo_two_step_scenario() {
    let mut workflow = echo_workflow(8);
    workflow
        .add_step("gather", "Context:\n{{memory}}\nTask: {{input}}", Some("echo"))
        .unwrap();
    workflow
        .add_step("answer", "Tools: {{toolResults}}\nAnswer: {{input}}", None)
        .unwrap();

    let result = workflow.run("Summarize station status").await.unwrap();

    assert_eq!(result.trace.len(), 2);
    let first_tool = result.trace[0].tool_result.as_deref().unwrap();
    assert!(!first_tool.is_empty());
    assert!(first_tool.contains("echo"));
    assert_eq!(
        first_tool,
        "echo (repeats the tail of its input): echo:Task: Summarize station status"
    );
    assert_eq!(result.trace[1].tool_result, None);
    assert!(!result.final_answer.is_empty());
    assert_eq!(result.final_answer, result.trace[1].response);
}

#[tokio::test]
async fn test_trace_matches_step_order() {
    let mut workflow = Workflow::new();
    let names = ["parse", "plan", "act", "report"];
    for name in names {
        workflow.add_step(name, "{{input}}", None).unwrap();
    }

    let result = workflow.run("go").await.unwrap();
    let traced: Vec<&str> = result.trace.iter().map(|t| t.step.as_str()).collect();
    assert_eq!(traced, names);
}

#[tokio::test]
async fn test_tool_sees_only_earlier_results() {
    let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));

    let mut workflow = Workflow::new();
    for name in ["first", "second", "third"] {
        let seen = Arc::clone(&seen);
        workflow.register_fn(name, "records visible results", move |_input, ctx| {
            let keys = ctx.tool_results().keys().cloned().collect();
            seen.lock().unwrap().push(keys);
            Ok("done".to_string())
        });
    }
    workflow.add_step("s1", "{{input}}", Some("first")).unwrap();
    workflow.add_step("s2", "{{input}}", Some("second")).unwrap();
    workflow.add_step("s3", "{{input}}", Some("third")).unwrap();

    workflow.run("q").await.unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0], Vec::<String>::new());
    assert_eq!(seen[1], vec!["first"]);
    assert_eq!(seen[2], vec!["first", "second"]);
}

#[tokio::test]
async fn test_same_tool_twice_last_write_wins() {
    let mut workflow = Workflow::new();
    workflow.register_fn("len", "input length", |input, _ctx| Ok(input.len().to_string()));
    workflow.add_step("a", "xx", Some("len")).unwrap();
    workflow.add_step("b", "{{toolResults}}", Some("len")).unwrap();
    workflow.add_step("c", "{{toolResults}}", None).unwrap();

    let result = workflow.run("q").await.unwrap();
    assert_eq!(result.trace[1].prompt, r#"{"len":"len (input length): 2"}"#);
    let final_prompt = &result.trace[2].prompt;
    assert!(final_prompt.starts_with(r#"{"len":"len (input length): "#));
    assert!(!final_prompt.contains("): 2\""));
}

#[test]
fn test_dangling_tool_reference_fails_at_build_time() {
    let mut workflow = Workflow::new();
    let err = workflow.add_step("s", "t", Some("missingTool")).unwrap_err();
    assert!(matches!(err, EngineError::UnregisteredTool(_)));
    assert!(err.to_string().contains("missingTool"));
}

#[tokio::test]
async fn test_empty_workflow_guard_message() {
    let err = Workflow::new().run("x").await.unwrap_err();
    assert_eq!(err.to_string(), "No steps registered in the LangChain workflow.");
    assert_eq!(err.to_string(), sdk::NO_STEPS_MESSAGE);
}

#[tokio::test]
async fn test_memory_trim_across_invocations() {
    let mut workflow = echo_workflow(2);
    workflow.add_step("echo-step", "{{input}}", Some("echo")).unwrap();

    workflow.run("first question").await.unwrap();
    workflow.run("second question").await.unwrap();
    workflow.run("third question").await.unwrap();

    let snapshot = workflow.memory().snapshot();
    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.iter().all(|e| e.text != "first question"));
    assert_eq!(snapshot[0].role, Role::User);
    assert_eq!(snapshot[0].text, "third question");
    assert_eq!(snapshot[1].role, Role::Assistant);
}

#[tokio::test]
async fn test_metadata_reaches_templates_and_tools() {
    let mut workflow = Workflow::new();
    workflow.register_fn("station", "reads station metadata", |_input, ctx| {
        Ok(ctx
            .metadata()
            .get("station")
            .and_then(MetadataValue::as_str)
            .unwrap_or("unknown")
            .to_string())
    });
    workflow.add_step("s", "meta={{metadata}}", Some("station")).unwrap();

    let mut metadata = Metadata::new();
    metadata.insert("station".to_string(), "north".into());
    metadata.insert("alerts".to_string(), 2i64.into());

    let result = workflow.invoke("q", metadata).await.unwrap();
    assert_eq!(result.trace[0].prompt, r#"meta={"alerts":2,"station":"north"}"#);
    assert_eq!(
        result.trace[0].tool_result.as_deref(),
        Some("station (reads station metadata): north")
    );
}

#[tokio::test]
async fn test_async_tool_failure_is_unwrapped() {
    let mut workflow = Workflow::new();
    workflow.register_async("remote", "remote lookup", |_input, _ctx| async {
        tokio::task::yield_now().await;
        Err::<String, _>(anyhow::anyhow!("upstream returned 503"))
    });
    workflow.add_step("lookup", "{{input}}", Some("remote")).unwrap();

    let err = workflow.run("q").await.unwrap_err();
    match err {
        EngineError::Tool(inner) => assert_eq!(inner.to_string(), "upstream returned 503"),
        other => panic!("expected tool error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_prompt_uses_fallback() {
    let mut workflow = Workflow::new();
    workflow.add_step("blank", "   ", None).unwrap();
    let result = workflow.run("q").await.unwrap();
    assert_eq!(result.final_answer, FALLBACK_RESPONSE);
}

#[tokio::test]
async fn test_rebinding_does_not_affect_existing_steps() {
    let mut workflow = Workflow::new();
    workflow.register_fn("t", "v1", |_input, _ctx| Ok("old".to_string()));
    workflow.add_step("early", "x", Some("t")).unwrap();
    workflow.register_fn("t", "v2", |_input, _ctx| Ok("new".to_string()));
    workflow.add_step("late", "x", Some("t")).unwrap();

    let result = workflow.run("q").await.unwrap();
    assert_eq!(result.trace[0].tool_result.as_deref(), Some("t (v1): old"));
    assert_eq!(result.trace[1].tool_result.as_deref(), Some("t (v2): new"));
}

#[tokio::test]
async fn test_result_serializes_with_final_key() {
    let mut workflow = Workflow::new();
    workflow.add_step("only", "{{input}}", None).unwrap();
    let result = workflow.run("hello").await.unwrap();

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["final"], "hello");
    assert_eq!(value["trace"][0]["step"], "only");
    assert!(value["trace"][0].get("tool_result").is_none());
}
