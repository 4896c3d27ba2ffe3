//! Integration tests for MCP protocol handling.
//!
//! These tests verify the JSON-RPC 2.0 protocol implementation and the
//! server lifecycle: initialisation handshake, tool discovery, tool call
//! error surfacing, and state gating.

use nexar_supply_mcp::mcp::protocol::{parse_message, IncomingMessage, RequestId};
use nexar_supply_mcp::mcp::server::{McpServer, Outbound, ServerState};
use nexar_supply_mcp::nexar::NexarClient;

// =============================================================================
// Protocol Parsing Tests
// =============================================================================

#[test]
fn test_parse_initialize_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {
                "name": "test-client",
                "version": "1.0.0"
            }
        }
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Request(req) = result.unwrap() {
        assert_eq!(req.method, "initialize");
        assert_eq!(req.id, RequestId::Number(1));
    } else {
        panic!("Expected Request");
    }
}

#[test]
fn test_parse_tools_call_request() {
    let json = r#"{
        "jsonrpc": "2.0",
        "id": 2,
        "method": "tools/call",
        "params": {
            "name": "search_components",
            "arguments": {"query": "ESP32", "limit": 5}
        }
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Request(req) = result.unwrap() {
        assert_eq!(req.method, "tools/call");
        assert_eq!(req.params.unwrap()["name"], "search_components");
    } else {
        panic!("Expected Request");
    }
}

#[test]
fn test_parse_notification() {
    let json = r#"{
        "jsonrpc": "2.0",
        "method": "notifications/initialized"
    }"#;

    let result = parse_message(json);
    assert!(result.is_ok());

    if let IncomingMessage::Notification(notif) = result.unwrap() {
        assert_eq!(notif.method, "notifications/initialized");
    } else {
        panic!("Expected Notification");
    }
}

#[test]
fn test_parse_invalid_json() {
    assert!(parse_message("not valid json").is_err());
}

#[test]
fn test_parse_missing_jsonrpc_version() {
    let json = r#"{
        "id": 1,
        "method": "ping"
    }"#;

    assert!(parse_message(json).is_err());
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

fn make_server() -> McpServer {
    // Endpoints are unroutable: lifecycle tests must never reach the network.
    let client = NexarClient::with_endpoints(
        "test-id",
        "test-secret",
        "http://127.0.0.1:1/token",
        "http://127.0.0.1:1/graphql",
    )
    .unwrap();
    McpServer::new(client)
}

const INIT: &str = r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test-client","version":"1.0.0"}}}"#;
const INITIALIZED: &str = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;

#[tokio::test]
async fn test_full_handshake() {
    let mut server = make_server();
    assert_eq!(server.state(), ServerState::AwaitingInit);

    let out = server.handle_raw(INIT).await.expect("initialize replies");
    let Outbound::Response(resp) = out else {
        panic!("Expected success response to initialize");
    };
    assert_eq!(resp.result["protocolVersion"], "2024-11-05");
    assert_eq!(server.state(), ServerState::Initialising);

    assert!(server.handle_raw(INITIALIZED).await.is_none());
    assert_eq!(server.state(), ServerState::Running);
}

#[tokio::test]
async fn test_discovery_advertises_search_components_with_required_query() {
    let mut server = make_server();
    server.handle_raw(INIT).await;
    server.handle_raw(INITIALIZED).await;

    let out = server
        .handle_raw(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
        .await
        .unwrap();
    let Outbound::Response(resp) = out else {
        panic!("Expected success response to tools/list");
    };

    let tools = resp.result["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "search_components");

    let schema = &tools[0]["inputSchema"];
    assert_eq!(schema["required"], serde_json::json!(["query"]));
    assert_eq!(schema["properties"]["limit"]["default"], 10);
}

#[tokio::test]
async fn test_missing_query_fails_before_network() {
    let mut server = make_server();
    server.handle_raw(INIT).await;
    server.handle_raw(INITIALIZED).await;

    // The client's endpoints are unroutable, so this passing proves the
    // argument check happens before any network activity.
    let out = server
        .handle_raw(
            r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"search_components","arguments":{"limit":5}}}"#,
        )
        .await
        .unwrap();

    let Outbound::Response(resp) = out else {
        panic!("Expected a tool result envelope");
    };
    assert_eq!(resp.result["isError"], true);
    assert!(resp.result["content"][0]["text"]
        .as_str()
        .unwrap()
        .contains("query parameter is required"));
}

#[tokio::test]
async fn test_requests_before_initialisation_are_rejected() {
    let mut server = make_server();

    for method in ["tools/list", "tools/call"] {
        let raw = format!(r#"{{"jsonrpc":"2.0","id":9,"method":"{method}"}}"#);
        let out = server.handle_raw(&raw).await.unwrap();
        let Outbound::Error(err) = out else {
            panic!("Expected error for {method} before initialisation");
        };
        assert!(err.error.message.contains("not initialised"));
    }

    assert_eq!(server.state(), ServerState::AwaitingInit);
}

#[tokio::test]
async fn test_unknown_method_not_found() {
    let mut server = make_server();
    server.handle_raw(INIT).await;
    server.handle_raw(INITIALIZED).await;

    let out = server
        .handle_raw(r#"{"jsonrpc":"2.0","id":7,"method":"prompts/list"}"#)
        .await
        .unwrap();
    let Outbound::Error(err) = out else {
        panic!("Expected method-not-found error");
    };
    assert_eq!(err.error.code, -32601);
    assert!(err.error.message.contains("prompts/list"));
}

#[tokio::test]
async fn test_parse_error_reply_for_garbage_input() {
    let mut server = make_server();

    let out = server.handle_raw("{{{").await.unwrap();
    let Outbound::Error(err) = out else {
        panic!("Expected parse error");
    };
    assert_eq!(err.error.code, -32700);
}
