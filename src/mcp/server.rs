//! Line-delimited JSON-RPC server exposing a [`ToolRegistry`].
//!
//! One message per line in, one response per line out. Notifications get no
//! response. Requests are handled one at a time.

use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, info};

use super::protocol::{
    error_response, success_response, tool_call_result, RpcError, JSONRPC_VERSION,
    MCP_PROTOCOL_VERSION,
};
use crate::error::{into_envelope, Result};
use crate::tools::ToolRegistry;

pub const SERVER_NAME: &str = "knot-api-mcp";

pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Serve on the process's stdin/stdout until stdin closes.
    pub async fn serve_stdio(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(tools = ?self.registry.names(), "MCP server ready");
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_line(&line).await {
                let mut out = response.to_string();
                out.push('\n');
                writer.write_all(out.as_bytes()).await?;
                writer.flush().await?;
            }
        }
        info!("stdin closed, MCP server stopping");
        Ok(())
    }

    /// Handle one raw line, returning the response to write, if any.
    pub async fn handle_line(&self, line: &str) -> Option<Value> {
        let incoming: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                return Some(error_response(
                    Value::Null,
                    RpcError::parse_error(format!("invalid JSON: {e}")),
                ))
            }
        };

        let Value::Array(batch) = incoming else {
            return self.handle_message(incoming).await;
        };
        if batch.is_empty() {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("batch must not be empty"),
            ));
        }
        let mut responses = Vec::new();
        for item in batch {
            if let Some(response) = self.handle_message(item).await {
                responses.push(response);
            }
        }
        (!responses.is_empty()).then_some(Value::Array(responses))
    }

    async fn handle_message(&self, incoming: Value) -> Option<Value> {
        let Some(obj) = incoming.as_object() else {
            return Some(error_response(
                Value::Null,
                RpcError::invalid_request("message must be a JSON object"),
            ));
        };

        let id = obj.get("id").cloned();
        if obj.get("jsonrpc").and_then(Value::as_str) != Some(JSONRPC_VERSION) {
            return Some(error_response(
                id.unwrap_or(Value::Null),
                RpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        // Responses to server-initiated requests; this server sends none.
        let method = obj.get("method").and_then(Value::as_str)?;
        let params = obj.get("params").cloned().unwrap_or(Value::Null);

        match id {
            Some(id) => Some(match self.handle_request(method, params).await {
                Ok(result) => success_response(id, result),
                Err(err) => error_response(id, err),
            }),
            None => {
                debug!(method, "notification");
                None
            }
        }
    }

    async fn handle_request(
        &self,
        method: &str,
        params: Value,
    ) -> std::result::Result<Value, RpcError> {
        match method {
            "initialize" => Ok(self.initialize_payload()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.tools_list_payload()),
            "tools/call" => self.handle_tools_call(params).await,
            _ => Err(RpcError::method_not_found(method)),
        }
    }

    fn initialize_payload(&self) -> Value {
        json!({
            "protocolVersion": MCP_PROTOCOL_VERSION,
            "capabilities": {
                "tools": { "listChanged": false },
            },
            "serverInfo": {
                "name": SERVER_NAME,
                "version": env!("CARGO_PKG_VERSION"),
            },
        })
    }

    fn tools_list_payload(&self) -> Value {
        json!({ "tools": self.registry.definitions() })
    }

    async fn handle_tools_call(&self, params: Value) -> std::result::Result<Value, RpcError> {
        let params = params
            .as_object()
            .ok_or_else(|| RpcError::invalid_params("tools/call params must be an object"))?;
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| RpcError::invalid_params("tools/call requires string field 'name'"))?;
        let args = match params.get("arguments") {
            Some(Value::Object(map)) => Value::Object(map.clone()),
            Some(Value::Null) | None => Value::Object(Map::new()),
            Some(_) => {
                return Err(RpcError::invalid_params(
                    "tools/call 'arguments' must be an object",
                ))
            }
        };

        let result = self.registry.call(name, args).await;
        let is_error = result.is_err();
        if let Err(e) = &result {
            info!(tool = name, kind = %e.kind(), error = %e, "tool call returned error envelope");
        }
        Ok(tool_call_result(into_envelope(result), is_error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::error::KnotError;
    use crate::tools::{AgentTool, Tool, ToolParameters};

    fn echo_registry() -> ToolRegistry {
        let echo: Arc<dyn Tool> = Arc::new(AgentTool::new(
            "extend_session",
            "Echo the session id",
            ToolParameters::object()
                .string("session_id", "Session", true)
                .build(),
            |args| async move {
                let id = args.get_str("session_id")?;
                if id == "expired" {
                    return Err(KnotError::api(404, "session not found"));
                }
                Ok(json!({ "session_id": id }))
            },
        ));
        ToolRegistry::new(vec![echo])
    }

    fn server() -> McpServer {
        McpServer::new(echo_registry())
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
            .await
            .unwrap();
        assert_eq!(response["id"], 1);
        assert_eq!(response["result"]["serverInfo"]["name"], SERVER_NAME);
        assert_eq!(response["result"]["protocolVersion"], MCP_PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn tools_list_uses_input_schema_key() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","id":"a","method":"tools/list"}"#)
            .await
            .unwrap();
        let tools = response["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "extend_session");
        assert_eq!(tools[0]["inputSchema"]["required"], json!(["session_id"]));
    }

    #[tokio::test]
    async fn tools_call_wraps_success_envelope() {
        let response = server()
            .handle_line(
                r#"{"jsonrpc":"2.0","id":2,"method":"tools/call","params":{"name":"extend_session","arguments":{"session_id":"s-1"}}}"#,
            )
            .await
            .unwrap();
        let result = &response["result"];
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"], json!({ "session_id": "s-1" }));
        assert_eq!(result["content"][0]["text"], r#"{"session_id":"s-1"}"#);
    }

    #[tokio::test]
    async fn tools_call_flags_error_envelope() {
        let response = server()
            .handle_line(
                r#"{"jsonrpc":"2.0","id":3,"method":"tools/call","params":{"name":"extend_session","arguments":{"session_id":"expired"}}}"#,
            )
            .await
            .unwrap();
        let result = &response["result"];
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["error"], "404 session not found");
        assert_eq!(result["structuredContent"]["kind"], "backend");
    }

    #[tokio::test]
    async fn non_object_result_is_text_only() {
        let list: Arc<dyn Tool> = Arc::new(AgentTool::new(
            "extend_session",
            "Returns a bare array",
            ToolParameters::object().build(),
            |_args| async move { Ok(json!(["a", "b"])) },
        ));
        let server = McpServer::new(ToolRegistry::new(vec![list]));

        let response = server
            .handle_line(
                r#"{"jsonrpc":"2.0","id":5,"method":"tools/call","params":{"name":"extend_session"}}"#,
            )
            .await
            .unwrap();
        let result = &response["result"];
        assert_eq!(result["isError"], false);
        assert!(result.get("structuredContent").is_none());
        assert_eq!(result["content"][0]["text"], r#"["a","b"]"#);
    }

    #[tokio::test]
    async fn validation_failure_is_a_tool_error_not_a_protocol_error() {
        let response = server()
            .handle_line(
                r#"{"jsonrpc":"2.0","id":4,"method":"tools/call","params":{"name":"extend_session"}}"#,
            )
            .await
            .unwrap();
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["structuredContent"]["kind"], "validation");
    }

    #[tokio::test]
    async fn notifications_get_no_response() {
        let response = server()
            .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
            .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn protocol_errors_use_jsonrpc_codes() {
        let s = server();
        let unknown = s
            .handle_line(r#"{"jsonrpc":"2.0","id":5,"method":"resources/list"}"#)
            .await
            .unwrap();
        assert_eq!(unknown["error"]["code"], -32601);

        let bad_params = s
            .handle_line(r#"{"jsonrpc":"2.0","id":6,"method":"tools/call","params":[]}"#)
            .await
            .unwrap();
        assert_eq!(bad_params["error"]["code"], -32602);

        let garbage = s.handle_line("{not json").await.unwrap();
        assert_eq!(garbage["error"]["code"], -32700);
        assert_eq!(garbage["id"], Value::Null);

        let wrong_version = s
            .handle_line(r#"{"jsonrpc":"1.0","id":7,"method":"ping"}"#)
            .await
            .unwrap();
        assert_eq!(wrong_version["error"]["code"], -32600);
    }

    #[tokio::test]
    async fn batch_returns_only_request_responses() {
        let response = server()
            .handle_line(
                r#"[{"jsonrpc":"2.0","id":1,"method":"ping"},{"jsonrpc":"2.0","method":"notifications/initialized"}]"#,
            )
            .await
            .unwrap();
        assert_eq!(response.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn serve_writes_one_line_per_response() {
        let input = concat!(
            r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#,
            "\n\n",
            r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
            "\n",
            r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
            "\n",
        );
        let mut output = Vec::new();
        server().serve(input.as_bytes(), &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["result"], json!({}));
    }
}
