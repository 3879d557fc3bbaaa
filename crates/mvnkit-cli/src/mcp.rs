//! MCP (Model Context Protocol) server implementation

use mvnkit::{MvnClient, Tools};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// JSON-RPC 2.0 request
#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: Option<Value>,
    method: String,
    #[serde(default)]
    params: Value,
}

/// JSON-RPC 2.0 response
#[derive(Debug, Serialize)]
struct JsonRpcResponse {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

/// JSON-RPC 2.0 error
#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i32,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<Value>,
}

impl JsonRpcResponse {
    fn success(id: Option<Value>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: Some(result),
            error: None,
        }
    }

    fn error(id: Option<Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }
}

/// MCP Server implementation
struct McpServer {
    tools: Tools,
}

impl McpServer {
    fn new(client: MvnClient) -> Self {
        Self {
            tools: Tools::new(client),
        }
    }

    async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            _ => JsonRpcResponse::error(
                request.id,
                -32601,
                format!("Method not found: {}", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": "2024-11-05",
                "capabilities": {
                    "tools": {}
                },
                "serverInfo": {
                    "name": "mvnkit",
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": self.tools.definitions() }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: Value) -> JsonRpcResponse {
        let tool_name = params
            .get("name")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));

        match self.tools.call(tool_name, arguments).await {
            Ok(output) => {
                let mut result = json!({
                    "content": [{
                        "type": "text",
                        "text": output.text
                    }]
                });
                if output.is_error {
                    result["isError"] = json!(true);
                }
                JsonRpcResponse::success(id, result)
            }
            Err(e) => JsonRpcResponse::error(id, -32602, e.to_string()),
        }
    }
}

/// Run the MCP server over stdio
///
/// Requests are handled concurrently; responses are written as they complete.
pub async fn run_server(client: MvnClient) {
    let server = Arc::new(McpServer::new(client));
    let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

    let writer = tokio::spawn(async move {
        let mut stdout = io::stdout();
        while let Some(response) = rx.recv().await {
            let json = serde_json::to_string(&response).unwrap_or_default();
            if let Err(e) = write_line(&mut stdout, &json).await {
                error!(error = %e, "Error writing to stdout");
                break;
            }
        }
    });

    info!("MvnKit MCP server running on stdio");

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Error reading stdin");
                continue;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let request: JsonRpcRequest = match serde_json::from_str(&line) {
            Ok(req) => req,
            Err(e) => {
                let response = JsonRpcResponse::error(None, -32700, format!("Parse error: {}", e));
                let _ = tx.send(response);
                continue;
            }
        };

        // Notifications (no id) get no response
        if request.id.is_none() {
            debug!(method = %request.method, "Ignoring notification");
            continue;
        }

        let server = Arc::clone(&server);
        let tx = tx.clone();
        tokio::spawn(async move {
            let response = server.handle_request(request).await;
            let _ = tx.send(response);
        });
    }

    // Let in-flight requests finish writing
    drop(tx);
    let _ = writer.await;
}

async fn write_line(stdout: &mut io::Stdout, line: &str) -> std::io::Result<()> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await
}
