//! End-to-end session over an in-memory transport.
//!
//! Every request must get exactly one response carrying its `id`, and
//! notifications must produce nothing.

use evidence_mcp::{serve, EvidenceServer, ServerConfig};
use serde_json::{json, Value};

async fn session(messages: &[Value]) -> Vec<Value> {
    let mut input = String::new();
    for message in messages {
        input.push_str(&message.to_string());
        input.push('\n');
    }

    let mut output = Vec::new();
    serve(&EvidenceServer::new(ServerConfig::default()), input.as_bytes(), &mut output)
        .await
        .expect("session should end cleanly at EOF");

    String::from_utf8(output)
        .expect("output is UTF-8")
        .lines()
        .map(|line| serde_json::from_str(line).expect("each output line is JSON"))
        .collect()
}

fn tool_text(response: &Value) -> &str {
    response["result"]["content"][0]["text"]
        .as_str()
        .unwrap_or_else(|| panic!("no text content in {}", response))
}

#[tokio::test]
async fn test_full_session() {
    let responses = session(&[
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": { "name": "host", "version": "0.1" }
            }
        }),
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list" }),
        json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {
                "name": "check_evidence_required",
                "arguments": { "user_request": "Did it work? Check the console logs" }
            }
        }),
        json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {
                "name": "validate_evidence_claim",
                "arguments": {
                    "context": "evaluation",
                    "claim": "The import job completed",
                    "evidence": "$ ./import.sh\nimported 1200 rows\n2025-01-04T09:12:44Z",
                    "trigger_phrases": ["did it work"]
                }
            }
        }),
        json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": { "name": "summarize", "arguments": {} }
        }),
    ])
    .await;

    let ids: Vec<Value> = responses.iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);

    assert_eq!(responses[0]["result"]["protocolVersion"], "2025-03-26");

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["validate_evidence_claim", "check_evidence_required"]);

    let report: Value = serde_json::from_str(tool_text(&responses[2])).unwrap();
    assert_eq!(
        report,
        json!({
            "requires_evidence": true,
            "context": "evaluation",
            "matched_triggers": ["check", "did it work", "logs", "console"],
            "recommendation": "Use CLAIM → EVIDENCE → STATUS format"
        })
    );

    assert_eq!(
        tool_text(&responses[3]),
        "✅ EVIDENCE PROVIDED: Claim \"The import job completed\" supported by evidence in context \"evaluation\""
    );

    assert_eq!(responses[4]["error"]["message"], "Unknown tool: summarize");
}

#[tokio::test]
async fn test_guard_violations_over_the_wire() {
    let responses = session(&[
        json!({
            "jsonrpc": "2.0",
            "id": "a",
            "method": "tools/call",
            "params": {
                "name": "validate_evidence_claim",
                "arguments": {
                    "context": "status",
                    "claim": "Verified the login flow with Playwright",
                    "evidence": "screenshot attached"
                }
            }
        }),
        json!({
            "jsonrpc": "2.0",
            "id": "b",
            "method": "tools/call",
            "params": {
                "name": "validate_evidence_claim",
                "arguments": {
                    "context": "normal_task",
                    "claim": "Cleanup done",
                    "evidence": "Script execution failed (exit 1)"
                }
            }
        }),
        json!({
            "jsonrpc": "2.0",
            "id": "c",
            "method": "tools/call",
            "params": {
                "name": "validate_evidence_claim",
                "arguments": { "context": "normal_task", "claim": "Cleanup done" }
            }
        }),
    ])
    .await;

    assert_eq!(
        tool_text(&responses[0]),
        "❌ PLAYWRIGHT VIOLATION: Playwright usage detected without explicit user permission. Use macOS automation instead."
    );
    assert_eq!(
        tool_text(&responses[1]),
        "❌ NON-TERMINATING ERROR VIOLATION: Script execution failure detected but not properly reported with ERROR TYPE format. Must report non-terminating errors immediately with full context."
    );
    assert_eq!(
        tool_text(&responses[2]),
        "ℹ️ NO EVIDENCE REQUIRED: Context \"normal_task\" does not require evidence validation"
    );
    assert!(responses.iter().all(|r| r["result"]["isError"] == false));
}

#[tokio::test]
async fn test_malformed_input_does_not_end_session() {
    let mut output = Vec::new();
    let input = b"garbage\n{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n";
    serve(&EvidenceServer::default(), &input[..], &mut output)
        .await
        .unwrap();

    let lines: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["error"]["code"], -32700);
    assert_eq!(lines[0]["id"], Value::Null);
    assert_eq!(lines[1]["id"], 1);
}

#[tokio::test]
async fn test_only_notifications_produce_no_output() {
    let responses = session(&[
        json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
        json!({ "jsonrpc": "2.0", "method": "notifications/cancelled", "params": { "requestId": 1 } }),
    ])
    .await;
    assert!(responses.is_empty());
}
