use anyhow::{anyhow, Result};
use serde_json::{json, Value};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use think_tool::config::ConversationConfig;
use think_tool::errors::{ClientError, ConfigError, Phase, ThinkError, TransportError};
use think_tool::executor::{PlaceholderAnalyzer, ToolExecutor};
use think_tool::orchestrator::Orchestrator;
use think_tool::providers::mock::MockClient;

fn text_response(text: &str) -> Value {
    json!({
        "id": "msg_123",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "stop_reason": "end_turn",
        "model": "claude-3-7-sonnet-20250219"
    })
}

fn tool_use_response(content: Value) -> Value {
    json!({
        "id": "msg_456",
        "type": "message",
        "role": "assistant",
        "content": content,
        "stop_reason": "tool_use",
        "model": "claude-3-7-sonnet-20250219"
    })
}

/// Records what the orchestrator asks it to run.
#[derive(Default)]
struct RecordingExecutor {
    calls: Mutex<Vec<(String, String)>>,
}

impl ToolExecutor for RecordingExecutor {
    fn execute(&self, tool_name: &str, thought: &str) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((tool_name.to_string(), thought.to_string()));
        Ok(format!("analysis of {}", thought))
    }
}

struct FailingExecutor;

impl ToolExecutor for FailingExecutor {
    fn execute(&self, _tool_name: &str, _thought: &str) -> Result<String> {
        Err(anyhow!("analysis backend unavailable"))
    }
}

#[test]
fn test_simple_thought_single_round_trip() -> Result<()> {
    let client = MockClient::new(vec![text_response("hello")]);
    let executor = RecordingExecutor::default();
    let orchestrator = Orchestrator::new(&client, &executor);

    let result = orchestrator.run("Simple thought", &ConversationConfig::default())?;

    assert_eq!(result.text, "hello\n");
    assert_eq!(result.raw, text_response("hello"));
    assert_eq!(client.call_count(), 1);
    assert!(executor.calls.lock().unwrap().is_empty());
    Ok(())
}

#[test]
fn test_initial_request_shape() -> Result<()> {
    let client = MockClient::new(vec![text_response("ok")]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);
    let config = ConversationConfig::new("claude-3-opus-20240229").with_max_tokens(2048);

    orchestrator.run("Simple thought", &config)?;

    let request = &client.requests()[0];
    assert_eq!(request["model"], "claude-3-opus-20240229");
    assert_eq!(request["max_tokens"], 2048);
    assert_eq!(
        request["messages"],
        json!([{"role": "user", "content": "Please analyze the following thought: Simple thought"}])
    );
    assert_eq!(request["tools"][0]["type"], "custom");
    assert_eq!(request["tools"][0]["name"], "think");
    assert_eq!(request["tools"][0]["input_schema"]["required"], json!(["thought"]));
    Ok(())
}

#[test]
fn test_prompt_template_is_used() -> Result<()> {
    let client = MockClient::new(vec![text_response("ok")]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);
    let config = ConversationConfig::default().with_prompt_template(Some("Analyze this:"));

    orchestrator.run("cats are great", &config)?;

    assert_eq!(
        client.requests()[0]["messages"][0]["content"],
        "Analyze this: cats are great"
    );
    Ok(())
}

#[test]
fn test_tool_use_two_round_trips() -> Result<()> {
    let first_content = json!([
        {"type": "text", "text": "I'll think about this."},
        {"type": "tool_use", "id": "tu_1", "name": "think", "input": {"thought": "Launch it"}}
    ]);
    let client = MockClient::new(vec![
        tool_use_response(first_content.clone()),
        text_response("done"),
    ]);
    let executor = RecordingExecutor::default();
    let orchestrator = Orchestrator::new(&client, &executor);

    let result = orchestrator.run("Launch it", &ConversationConfig::default())?;

    assert_eq!(result.text, "done\n");
    assert_eq!(client.call_count(), 2);
    assert_eq!(
        *executor.calls.lock().unwrap(),
        vec![("think".to_string(), "Launch it".to_string())]
    );

    let requests = client.requests();
    let messages = requests[1]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], requests[0]["messages"][0]);
    assert_eq!(messages[1], json!({"role": "assistant", "content": first_content}));
    assert_eq!(
        messages[2],
        json!({
            "role": "user",
            "content": [{
                "type": "tool_result",
                "tool_use_id": "tu_1",
                "content": "analysis of Launch it"
            }]
        })
    );
    Ok(())
}

#[test]
fn test_first_tool_use_wins() -> Result<()> {
    let client = MockClient::new(vec![
        tool_use_response(json!([
            {"type": "tool_use", "id": "tu_first", "name": "think", "input": {}},
            {"type": "tool_use", "id": "tu_second", "name": "think", "input": {}}
        ])),
        text_response("done"),
    ]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

    orchestrator.run("Launch it", &ConversationConfig::default())?;

    let follow_up = &client.requests()[1];
    let last = follow_up["messages"].as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["content"][0]["tool_use_id"], "tu_first");
    assert_eq!(last["content"].as_array().unwrap().len(), 1);
    Ok(())
}

#[test]
fn test_assistant_turn_is_replayed_verbatim() -> Result<()> {
    let first_content = json!([
        {"type": "thinking", "thinking": "hmm", "signature": "sig"},
        {"type": "text", "text": "Checking.", "citations": null},
        {"type": "tool_use", "id": "tu_7", "name": "think", "input": {"thought": "x"}}
    ]);
    let client = MockClient::new(vec![
        tool_use_response(first_content.clone()),
        text_response("done"),
    ]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

    orchestrator.run("x", &ConversationConfig::default())?;

    assert_eq!(client.requests()[1]["messages"][1]["content"], first_content);
    Ok(())
}

#[test]
fn test_tool_use_without_block_is_protocol_error() {
    let client = MockClient::new(vec![
        tool_use_response(json!([{"type": "text", "text": "I meant to call a tool"}])),
        text_response("never sent"),
    ]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

    let err = orchestrator
        .run("Launch it", &ConversationConfig::default())
        .unwrap_err();

    assert!(matches!(err, ThinkError::Protocol { phase: Phase::Initial, .. }));
    assert!(err.to_string().contains("no valid tool-use block"));
    assert_eq!(client.call_count(), 1);
}

#[test]
fn test_tool_use_without_id_is_protocol_error() {
    let client = MockClient::new(vec![tool_use_response(json!([
        {"type": "tool_use", "name": "think", "input": {}}
    ]))]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

    let err = orchestrator
        .run("Launch it", &ConversationConfig::default())
        .unwrap_err();

    assert!(matches!(err, ThinkError::Protocol { .. }));
    assert_eq!(client.call_count(), 1);
}

#[test]
fn test_initial_transport_failure_stops_run() {
    let client = MockClient::with_results(vec![
        Err(ClientError::Transport(TransportError::Status {
            status: 500,
            body: "internal".to_string(),
        })),
        Ok(text_response("never sent").to_string().into_bytes()),
    ]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

    let err = orchestrator
        .run("Launch it", &ConversationConfig::default())
        .unwrap_err();

    assert!(matches!(
        err,
        ThinkError::Transport {
            phase: Phase::Initial,
            source: TransportError::Status { status: 500, .. }
        }
    ));
    assert!(err.to_string().starts_with("initial request failed"));
    assert_eq!(client.call_count(), 1);
}

#[test]
fn test_follow_up_transport_failure_is_tagged() {
    let client = MockClient::with_results(vec![
        Ok(tool_use_response(json!([
            {"type": "tool_use", "id": "tu_1", "name": "think", "input": {}}
        ]))
        .to_string()
        .into_bytes()),
        Err(ClientError::Transport(TransportError::Timeout)),
    ]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

    let err = orchestrator
        .run("Launch it", &ConversationConfig::default())
        .unwrap_err();

    assert!(matches!(
        err,
        ThinkError::Transport {
            phase: Phase::FollowUp,
            source: TransportError::Timeout
        }
    ));
    assert!(err.to_string().starts_with("follow-up request failed"));
    assert_eq!(client.call_count(), 2);
}

#[test]
fn test_missing_credential_propagates_unchanged() {
    let client =
        MockClient::with_results(vec![Err(ClientError::Config(ConfigError::MissingApiKey))]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

    let err = orchestrator
        .run("Launch it", &ConversationConfig::default())
        .unwrap_err();

    assert!(matches!(err, ThinkError::Config(ConfigError::MissingApiKey)));
    assert_eq!(client.call_count(), 1);
}

#[test]
fn test_malformed_payloads_are_protocol_errors() {
    let cases = vec![
        b"not json at all".to_vec(),
        json!({"id": "msg_1", "content": "oops", "stop_reason": "end_turn"})
            .to_string()
            .into_bytes(),
        json!({"id": "msg_1", "content": []}).to_string().into_bytes(),
    ];

    for body in cases {
        let client = MockClient::with_results(vec![Ok(body)]);
        let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

        let err = orchestrator
            .run("Launch it", &ConversationConfig::default())
            .unwrap_err();

        assert!(matches!(err, ThinkError::Protocol { phase: Phase::Initial, .. }));
        assert_eq!(client.call_count(), 1);
    }
}

#[test]
fn test_executor_failure_is_protocol_error() {
    let client = MockClient::new(vec![tool_use_response(json!([
        {"type": "tool_use", "id": "tu_1", "name": "think", "input": {}}
    ]))]);
    let orchestrator = Orchestrator::new(&client, &FailingExecutor);

    let err = orchestrator
        .run("Launch it", &ConversationConfig::default())
        .unwrap_err();

    assert!(matches!(err, ThinkError::Protocol { .. }));
    assert!(err.to_string().contains("analysis backend unavailable"));
    assert_eq!(client.call_count(), 1);
}

#[test]
fn test_result_text_comes_from_final_response() -> Result<()> {
    let client = MockClient::new(vec![
        tool_use_response(json!([
            {"type": "text", "text": "thinking out loud"},
            {"type": "tool_use", "id": "tu_1", "name": "think", "input": {}}
        ])),
        json!({
            "id": "msg_789",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Strengths noted."},
                {"type": "text", "text": "Add a rollback plan."}
            ],
            "stop_reason": "end_turn"
        }),
    ]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

    let result = orchestrator.run("Launch it", &ConversationConfig::default())?;

    assert_eq!(result.text, "Strengths noted.\nAdd a rollback plan.\n");
    assert_eq!(result.raw["id"], "msg_789");
    Ok(())
}

#[test]
fn test_orchestrator_is_shareable_across_threads() {
    let client = MockClient::new(vec![
        text_response("hello"),
        text_response("hello"),
        text_response("hello"),
        text_response("hello"),
    ]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);
    let config = ConversationConfig::default();

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let orchestrator = &orchestrator;
                let config = &config;
                scope.spawn(move || orchestrator.run(&format!("thought {}", i), config))
            })
            .collect();

        for handle in handles {
            let result = handle.join().unwrap().unwrap();
            assert_eq!(result.text, "hello\n");
        }
    });

    assert_eq!(client.call_count(), 4);
}

#[test]
fn test_both_turns_share_one_deadline() -> Result<()> {
    let client = MockClient::new(vec![
        tool_use_response(json!([
            {"type": "tool_use", "id": "tu_1", "name": "think", "input": {}}
        ])),
        text_response("done"),
    ]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);
    let deadline = Instant::now() + Duration::from_secs(5);

    orchestrator.run_until("Launch it", &ConversationConfig::default(), deadline)?;

    assert_eq!(client.deadlines(), vec![deadline, deadline]);
    Ok(())
}

#[test]
fn test_run_deadline_follows_configured_timeout() -> Result<()> {
    let client = MockClient::new(vec![text_response("ok")]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);
    let config = ConversationConfig::default().with_timeout(Duration::from_secs(60));

    let before = Instant::now();
    orchestrator.run("Launch it", &config)?;
    let after = Instant::now();

    let deadline = client.deadlines()[0];
    assert!(deadline >= before + Duration::from_secs(60));
    assert!(deadline <= after + Duration::from_secs(60));
    Ok(())
}

#[test]
fn test_huge_timeout_does_not_overflow() -> Result<()> {
    let client = MockClient::new(vec![text_response("ok")]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);
    let config = ConversationConfig::default().with_timeout(Duration::MAX);

    let result = orchestrator.run("Launch it", &config)?;

    assert_eq!(result.text, "ok\n");
    assert!(client.deadlines()[0] > Instant::now());
    Ok(())
}

#[test]
fn test_malformed_block_does_not_fail_run() -> Result<()> {
    let client = MockClient::new(vec![json!({
        "id": "msg_1",
        "role": "assistant",
        "content": [{"type": "text", "text": "hi"}, "stray", {"type": "text"}],
        "stop_reason": "end_turn"
    })]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

    let result = orchestrator.run("Launch it", &ConversationConfig::default())?;

    assert_eq!(result.text, "hi\n");
    Ok(())
}

#[test]
fn test_malformed_first_tool_use_is_protocol_error() {
    let client = MockClient::new(vec![
        tool_use_response(json!([
            {"type": "tool_use", "id": 17, "name": "think", "input": {}},
            {"type": "tool_use", "id": "tu_2", "name": "think", "input": {}}
        ])),
        text_response("never sent"),
    ]);
    let orchestrator = Orchestrator::new(&client, &PlaceholderAnalyzer);

    let err = orchestrator
        .run("Launch it", &ConversationConfig::default())
        .unwrap_err();

    assert!(matches!(err, ThinkError::Protocol { phase: Phase::Initial, .. }));
    assert!(err.to_string().contains("no valid tool-use block"));
    assert_eq!(client.call_count(), 1);
}
