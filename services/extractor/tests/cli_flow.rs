// End-to-end tests for the extractor pipeline.
//
// Runs `extractor_lib::run` against a local Axum stub of the OpenAI
// chat-completions endpoint, with inputs and outputs in temp files.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use extractor_lib::{error::ExtractorError, run, Cli};
use serde_json::{json, Value};

const HIERARCHY: &str = r#"{"Photosynthesis":{"Light reactions":["Split water","Make ATP"]}}"#;

#[derive(Clone)]
struct Stub {
    status: StatusCode,
    reply: Value,
    requests: Arc<Mutex<Vec<Value>>>,
}

async fn completions(State(stub): State<Stub>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    stub.requests.lock().unwrap().push(body);
    (stub.status, Json(stub.reply.clone()))
}

fn chat_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1700000000,
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// Starts the stub and returns its `/v1` base URL plus the captured request bodies.
async fn spawn_stub(status: StatusCode, reply: Value) -> (String, Arc<Mutex<Vec<Value>>>) {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(Stub {
            status,
            reply,
            requests: requests.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{}/v1", addr), requests)
}

fn cli(input: &str, base: &str) -> Cli {
    Cli {
        input: input.to_string(),
        api_key: Some("sk-test".to_string()),
        model: "gpt-4o".to_string(),
        output: None,
        quiz: false,
        api_base: Some(base.to_string()),
    }
}

fn user_content(request: &Value) -> &str {
    request["messages"][1]["content"].as_str().unwrap()
}

#[tokio::test]
async fn file_input_is_read_and_result_saved() {
    let (base, requests) = spawn_stub(StatusCode::OK, chat_reply(HIERARCHY)).await;
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    std::fs::write(&input, "Chlorophyll absorbs light.").unwrap();
    let output = dir.path().join("knowledge.json");

    let mut args = cli(input.to_str().unwrap(), &base);
    args.output = Some(output.clone());
    let mut out = Vec::new();
    run(args, &mut out).await.unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(user_content(&requests[0]), "Input: Chlorophyll absorbs light.");
    assert_eq!(requests[0]["model"], "gpt-4o");
    assert_eq!(requests[0]["response_format"]["type"], "json_object");
    assert_eq!(requests[0]["messages"][0]["role"], "system");

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.starts_with("Extracting knowledge...\n"));
    assert!(printed.contains("--- Extracted Knowledge ---"));
    assert!(printed.contains("\"Light reactions\": ["));
    assert!(printed.contains(&format!("Result saved to {}", output.display())));

    let saved: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(saved["Photosynthesis"]["Light reactions"][1], "Make ATP");
}

#[tokio::test]
async fn short_inline_text_is_still_sent() {
    let (base, requests) = spawn_stub(StatusCode::OK, chat_reply(HIERARCHY)).await;

    let mut out = Vec::new();
    run(cli("hi", &base), &mut out).await.unwrap();

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(user_content(&requests[0]), "Input: hi");
}

#[tokio::test]
async fn quiz_flag_changes_the_system_prompt() {
    let (base, requests) = spawn_stub(StatusCode::OK, chat_reply(HIERARCHY)).await;

    let mut args = cli("Cells divide by mitosis.", &base);
    args.quiz = true;
    let mut out = Vec::new();
    run(args, &mut out).await.unwrap();

    let system = requests.lock().unwrap()[0]["messages"][0]["content"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(system.contains("Generate a Quiz"));
    assert!(String::from_utf8(out)
        .unwrap()
        .starts_with("Extracting knowledge and generating quiz..."));
}

#[tokio::test]
async fn empty_input_fails_before_any_request() {
    let (base, requests) = spawn_stub(StatusCode::OK, chat_reply(HIERARCHY)).await;

    let mut out = Vec::new();
    let err = run(cli("   ", &base), &mut out).await.unwrap_err();

    assert!(matches!(err, ExtractorError::Input(_)));
    assert_eq!(err.exit_code(), 1);
    assert!(out.is_empty());
    assert!(requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn provider_rejection_is_reported_once() {
    let (base, requests) = spawn_stub(
        StatusCode::UNAUTHORIZED,
        json!({
            "error": {
                "message": "Incorrect API key provided",
                "type": "invalid_request_error",
                "param": null,
                "code": "invalid_api_key"
            }
        }),
    )
    .await;

    let mut out = Vec::new();
    let err = run(cli("Some text", &base), &mut out).await.unwrap_err();

    assert!(matches!(err, ExtractorError::Provider(_)));
    assert_eq!(err.exit_code(), 2);
    assert!(err.to_string().contains("Incorrect API key provided"));
    assert!(!String::from_utf8(out).unwrap().contains("Extracted Knowledge"));
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn non_json_content_is_a_provider_error() {
    let (base, _) = spawn_stub(StatusCode::OK, chat_reply("Here is your summary!")).await;

    let mut out = Vec::new();
    let err = run(cli("Some text", &base), &mut out).await.unwrap_err();
    assert!(matches!(err, ExtractorError::Provider(_)));
}

#[tokio::test]
async fn write_failure_comes_after_the_print() {
    let (base, _) = spawn_stub(StatusCode::OK, chat_reply(HIERARCHY)).await;
    let dir = tempfile::tempdir().unwrap();

    let mut args = cli("Some text", &base);
    // A directory cannot be opened as a file for writing.
    args.output = Some(PathBuf::from(dir.path()));
    let mut out = Vec::new();
    let err = run(args, &mut out).await.unwrap_err();

    assert!(matches!(err, ExtractorError::Output { .. }));
    assert_eq!(err.exit_code(), 1);
    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("\"Photosynthesis\""));
    assert!(!printed.contains("Result saved"));
}
