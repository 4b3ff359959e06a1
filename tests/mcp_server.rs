use calendly_mcp::components::CalendlyHandle;
use calendly_mcp::config::Config;
use calendly_mcp::error::AppResult;
use calendly_mcp::mcp::{Exit, McpServer};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// In-memory MCP session
struct Session {
    input: Option<DuplexStream>,
    output: Lines<BufReader<DuplexStream>>,
    shutdown: CancellationToken,
    server: JoinHandle<AppResult<Exit>>,
}

impl Session {
    fn start(base_url: &str) -> Self {
        let config = Config::new("test-token")
            .with_base_url(base_url)
            .with_timeout_secs(10);
        let server = McpServer::new(CalendlyHandle::new(&config).unwrap());

        let (input, server_input) = tokio::io::duplex(64 * 1024);
        let (server_output, output) = tokio::io::duplex(64 * 1024);
        let shutdown = CancellationToken::new();

        let token = shutdown.clone();
        let server =
            tokio::spawn(async move { server.serve(server_input, server_output, token).await });

        Self {
            input: Some(input),
            output: BufReader::new(output).lines(),
            shutdown,
            server,
        }
    }

    async fn send(&mut self, message: Value) {
        self.send_raw(&message.to_string()).await;
    }

    async fn send_raw(&mut self, line: &str) {
        self.send_bytes(line.as_bytes()).await;
    }

    async fn send_bytes(&mut self, line: &[u8]) {
        let input = self.input.as_mut().unwrap();
        input.write_all(line).await.unwrap();
        input.write_all(b"\n").await.unwrap();
    }

    async fn recv(&mut self) -> Value {
        let line = tokio::time::timeout(Duration::from_secs(5), self.output.next_line())
            .await
            .expect("timed out waiting for a response")
            .unwrap()
            .expect("server closed its output");
        serde_json::from_str(&line).unwrap()
    }

    /// Close input and collect everything the server still writes
    async fn finish(mut self) -> (Exit, Vec<Value>) {
        drop(self.input.take());
        let mut rest = Vec::new();
        while let Some(line) = self.output.next_line().await.unwrap() {
            rest.push(serde_json::from_str(&line).unwrap());
        }
        let exit = self.server.await.unwrap().unwrap();
        (exit, rest)
    }
}

/// A TCP endpoint that accepts connections and never answers
async fn silent_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_initialize_and_list_tools() {
    let mut session = Session::start("http://127.0.0.1:1");

    session
        .send(json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {
            "protocolVersion": "2024-11-05",
            "capabilities": {},
            "clientInfo": {"name": "test", "version": "0"}
        }}))
        .await;
    let response = session.recv().await;
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"]["protocolVersion"], "2024-11-05");
    assert_eq!(response["result"]["serverInfo"]["name"], "calendly-mcp");
    assert!(response["result"]["capabilities"]["tools"].is_object());

    session
        .send(json!({"jsonrpc": "2.0", "method": "notifications/initialized"}))
        .await;
    session
        .send(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/list"}))
        .await;
    let response = session.recv().await;
    assert_eq!(response["id"], 2);

    let tools = response["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 44);
    let update = tools
        .iter()
        .find(|tool| tool["name"] == "update_event_type")
        .unwrap();
    assert_eq!(update["inputSchema"]["type"], "object");
    assert_eq!(update["inputSchema"]["required"], json!(["uuid"]));

    let (exit, rest) = session.finish().await;
    assert_eq!(exit, Exit::InputClosed);
    assert!(rest.is_empty(), "notification must not be answered");
}

#[tokio::test]
async fn test_tools_call_success_and_sentinel() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/users/me")
        .with_status(200)
        .with_body(r#"{"resource":{"name":"Test User"}}"#)
        .create_async()
        .await;
    server
        .mock("DELETE", "/event_types/ET1")
        .with_status(204)
        .create_async()
        .await;

    let mut session = Session::start(&server.url());

    session
        .send(json!({"jsonrpc": "2.0", "id": "a", "method": "tools/call",
            "params": {"name": "get_current_user", "arguments": {}}}))
        .await;
    let response = session.recv().await;
    assert_eq!(response["id"], "a");
    assert_eq!(response["result"]["isError"], false);
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["resource"]["name"], "Test User");

    session
        .send(json!({"jsonrpc": "2.0", "id": "b", "method": "tools/call",
            "params": {"name": "delete_event_type", "arguments": {"uuid": "ET1"}}}))
        .await;
    let response = session.recv().await;
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(
        payload,
        json!({"success": true, "message": "Operation completed successfully"})
    );

    session.finish().await;
}

#[tokio::test]
async fn test_tool_failures_are_error_results() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/event_types/missing")
        .with_status(404)
        .with_body(r#"{"title":"Resource Not Found"}"#)
        .create_async()
        .await;

    let mut session = Session::start(&server.url());

    session
        .send(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "get_event_type", "arguments": {"uuid": "missing"}}}))
        .await;
    let response = session.recv().await;
    assert_eq!(response["result"]["isError"], true);
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["kind"], "remote_rejection");
    assert_eq!(payload["status_code"], 404);
    assert_eq!(payload["message"], r#"{"title":"Resource Not Found"}"#);

    session
        .send(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call",
            "params": {"name": "get_event_type", "arguments": {}}}))
        .await;
    let response = session.recv().await;
    assert_eq!(response["result"]["isError"], true);
    let text = response["result"]["content"][0]["text"].as_str().unwrap();
    let payload: Value = serde_json::from_str(text).unwrap();
    assert_eq!(payload["kind"], "caller_error");

    session.finish().await;
}

#[tokio::test]
async fn test_protocol_errors() {
    let mut session = Session::start("http://127.0.0.1:1");

    session
        .send(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "book_everything", "arguments": {}}}))
        .await;
    let response = session.recv().await;
    assert_eq!(response["id"], 1);
    assert_eq!(response["error"]["code"], -32602);

    session
        .send(json!({"jsonrpc": "2.0", "id": 2, "method": "resources/list"}))
        .await;
    let response = session.recv().await;
    assert_eq!(response["error"]["code"], -32601);

    session.send_raw("{not json").await;
    let response = session.recv().await;
    assert_eq!(response["id"], Value::Null);
    assert_eq!(response["error"]["code"], -32700);

    session
        .send(json!({"jsonrpc": "1.0", "id": 3, "method": "ping"}))
        .await;
    let response = session.recv().await;
    assert_eq!(response["id"], 3);
    assert_eq!(response["error"]["code"], -32600);

    session
        .send(json!({"jsonrpc": "2.0", "id": 4, "method": "ping"}))
        .await;
    let response = session.recv().await;
    assert_eq!(response["id"], 4);
    assert_eq!(response["result"], json!({}));

    session.finish().await;
}

#[tokio::test]
async fn test_invalid_utf8_keeps_session_alive() {
    let mut session = Session::start("http://127.0.0.1:1");

    session.send_bytes(b"\xff\xfe").await;
    let response = session.recv().await;
    assert_eq!(response["id"], Value::Null);
    assert_eq!(response["error"]["code"], -32700);

    session
        .send(json!({"jsonrpc": "2.0", "id": 1, "method": "ping"}))
        .await;
    let response = session.recv().await;
    assert_eq!(response["id"], 1);
    assert_eq!(response["result"], json!({}));

    let (exit, rest) = session.finish().await;
    assert_eq!(exit, Exit::InputClosed);
    assert!(rest.is_empty());
}

#[tokio::test]
async fn test_duplicate_in_flight_id_is_rejected() {
    let upstream = silent_upstream().await;
    let mut session = Session::start(&upstream);

    let call = json!({"jsonrpc": "2.0", "id": 7, "method": "tools/call",
        "params": {"name": "get_current_user", "arguments": {}}});
    session.send(call.clone()).await;
    session.send(call).await;

    let response = session.recv().await;
    assert_eq!(response["id"], 7);
    assert_eq!(response["error"]["code"], -32600);

    // The original call is still cancellable
    session
        .send(json!({"jsonrpc": "2.0", "method": "notifications/cancelled",
            "params": {"requestId": 7}}))
        .await;
    session
        .send(json!({"jsonrpc": "2.0", "id": 8, "method": "ping"}))
        .await;
    assert_eq!(session.recv().await["id"], 8);

    let (exit, rest) = tokio::time::timeout(Duration::from_secs(5), session.finish())
        .await
        .expect("cancelled call kept the session open");
    assert_eq!(exit, Exit::InputClosed);
    assert!(rest.is_empty(), "unexpected responses: {:?}", rest);
}

#[tokio::test]
async fn test_cancelled_call_gets_no_response() {
    let upstream = silent_upstream().await;
    let mut session = Session::start(&upstream);

    session
        .send(json!({"jsonrpc": "2.0", "id": 5, "method": "tools/call",
            "params": {"name": "get_current_user", "arguments": {}}}))
        .await;
    session
        .send(json!({"jsonrpc": "2.0", "method": "notifications/cancelled",
            "params": {"requestId": 5, "reason": "user aborted"}}))
        .await;
    session
        .send(json!({"jsonrpc": "2.0", "id": 6, "method": "ping"}))
        .await;

    let response = session.recv().await;
    assert_eq!(response["id"], 6);

    let (exit, rest) = session.finish().await;
    assert_eq!(exit, Exit::InputClosed);
    assert!(rest.iter().all(|r| r["id"] != 5), "cancelled call answered: {:?}", rest);
}

#[tokio::test]
async fn test_input_close_drains_in_flight_calls() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/organizations/O1")
        .with_status(200)
        .with_body(r#"{"resource":{"name":"Acme"}}"#)
        .create_async()
        .await;

    let mut session = Session::start(&server.url());
    session
        .send(json!({"jsonrpc": "2.0", "id": 9, "method": "tools/call",
            "params": {"name": "get_organization", "arguments": {"uuid": "O1"}}}))
        .await;

    let (exit, rest) = session.finish().await;
    assert_eq!(exit, Exit::InputClosed);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0]["id"], 9);
    assert_eq!(rest[0]["result"]["isError"], false);
}

#[tokio::test]
async fn test_shutdown_cancels_in_flight_calls() {
    let upstream = silent_upstream().await;
    let mut session = Session::start(&upstream);

    session
        .send(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/call",
            "params": {"name": "get_current_user", "arguments": {}}}))
        .await;
    session
        .send(json!({"jsonrpc": "2.0", "id": 2, "method": "ping"}))
        .await;
    assert_eq!(session.recv().await["id"], 2);

    session.shutdown.cancel();

    let exit = tokio::time::timeout(Duration::from_secs(5), &mut session.server)
        .await
        .expect("server did not stop")
        .unwrap()
        .unwrap();
    assert_eq!(exit, Exit::Shutdown);

    assert!(session.output.next_line().await.unwrap().is_none());
}
