//! Tool adapter: bridges MCP tool invocations to the Nexar client.
//!
//! One tool is exposed, `search_components`. Argument validation happens
//! here, before anything touches the network; client failures are folded
//! into `isError` tool results so a bad search never takes the serving
//! process down.

use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::nexar::NexarClient;

/// Default result limit when the caller does not supply one.
pub const DEFAULT_LIMIT: u32 = 10;

/// A tool definition for the tools/list response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique tool name.
    pub name: String,
    /// Human-readable description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON Schema for the tool's input parameters.
    pub input_schema: Value,
}

/// Content item in a tool call response.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Text content.
    Text {
        /// The text content.
        text: String,
    },
}

/// Result of a tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    /// Content returned by the tool.
    pub content: Vec<ToolContent>,
    /// Whether the tool call resulted in an error.
    #[serde(skip_serializing_if = "is_false")]
    pub is_error: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // serde's skip_serializing_if requires fn(&T) -> bool
const fn is_false(b: &bool) -> bool {
    !*b
}

impl ToolCallResult {
    /// Creates a successful text result.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Creates an error text result.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: message.into(),
            }],
            is_error: true,
        }
    }
}

/// Returns the list of available tools.
#[must_use]
pub fn definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: "search_components".to_string(),
        description: Some(
            "Search for electronic components using the Nexar Supply API. Returns a list \
             of compatible components with specifications, pricing, and availability."
                .to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query describing the component needed \
                                    (e.g., \"ESP32 microcontroller with WiFi\", \
                                    \"3.3V LDO regulator 600mA\")"
                },
                "limit": {
                    "type": "number",
                    "description": "Maximum number of results to return",
                    "default": DEFAULT_LIMIT
                }
            },
            "required": ["query"]
        }),
    }]
}

/// Invokes a tool by name, folding failures into an `isError` result.
pub async fn call(client: &NexarClient, name: &str, arguments: &Value) -> ToolCallResult {
    match invoke(client, name, arguments).await {
        Ok(result) => result,
        Err(e) => ToolCallResult::error(e.to_string()),
    }
}

/// Invokes a tool by name.
///
/// # Errors
///
/// - [`ToolError::UnknownTool`] for an unrecognised tool name
/// - [`ToolError::InvalidArgument`] for malformed arguments (checked
///   before any network activity)
/// - [`ToolError::Execution`] wrapping any client failure
pub async fn invoke(
    client: &NexarClient,
    name: &str,
    arguments: &Value,
) -> Result<ToolCallResult, ToolError> {
    if name != "search_components" {
        return Err(ToolError::UnknownTool(name.to_string()));
    }

    let query = arguments
        .get("query")
        .and_then(Value::as_str)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| {
            ToolError::InvalidArgument(
                "query parameter is required and must be a string".to_string(),
            )
        })?;

    let limit = parse_limit(arguments.get("limit"))?;

    let parts = client
        .search_components(query, limit)
        .await
        .map_err(|e| ToolError::Execution(e.to_string()))?;

    let rendered = serde_json::to_string_pretty(&parts)
        .map_err(|e| ToolError::Execution(e.to_string()))?;

    Ok(ToolCallResult::text(rendered))
}

/// Parses the optional `limit` argument, defaulting to [`DEFAULT_LIMIT`].
fn parse_limit(value: Option<&Value>) -> Result<u32, ToolError> {
    match value {
        None | Some(Value::Null) => Ok(DEFAULT_LIMIT),
        Some(v) => v
            .as_f64()
            .filter(|l| *l >= 1.0 && *l <= f64::from(u32::MAX))
            .map(|l| {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // range-checked above
                {
                    l as u32
                }
            })
            .ok_or_else(|| {
                ToolError::InvalidArgument(
                    "limit parameter must be a positive number".to_string(),
                )
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ToolError;
    use crate::nexar::NexarClient;

    /// A client whose endpoints are unroutable. Any test that reaches the
    /// network through it would fail, which is exactly the point: argument
    /// validation must reject bad input first.
    fn offline_client() -> NexarClient {
        NexarClient::with_endpoints(
            "id",
            "secret",
            "http://127.0.0.1:1/token",
            "http://127.0.0.1:1/graphql",
        )
        .unwrap()
    }

    #[test]
    fn advertises_exactly_one_tool() {
        let tools = definitions();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "search_components");

        let schema = &tools[0].input_schema;
        assert_eq!(schema["required"], serde_json::json!(["query"]));
        assert_eq!(schema["properties"]["limit"]["default"], DEFAULT_LIMIT);
    }

    #[tokio::test]
    async fn unknown_tool_is_rejected() {
        let client = offline_client();
        let err = invoke(&client, "generate_footprint", &serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            ToolError::UnknownTool(name) => assert_eq!(name, "generate_footprint"),
            other => panic!("expected UnknownTool, got {other}"),
        }
    }

    #[tokio::test]
    async fn missing_query_never_reaches_the_network() {
        let client = offline_client();
        let err = invoke(&client, "search_components", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn non_string_query_is_rejected() {
        let client = offline_client();
        let err = invoke(
            &client,
            "search_components",
            &serde_json::json!({"query": 42}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn empty_query_is_rejected() {
        let client = offline_client();
        let err = invoke(
            &client,
            "search_components",
            &serde_json::json!({"query": ""}),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn non_positive_limit_is_rejected() {
        let client = offline_client();
        for bad in [serde_json::json!(0), serde_json::json!(-3), serde_json::json!("ten")] {
            let err = invoke(
                &client,
                "search_components",
                &serde_json::json!({"query": "esp32", "limit": bad}),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ToolError::InvalidArgument(_)));
        }
    }

    #[test]
    fn limit_defaults_and_parses() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_LIMIT);
        assert_eq!(parse_limit(Some(&serde_json::json!(25))).unwrap(), 25);
        assert_eq!(parse_limit(Some(&serde_json::Value::Null)).unwrap(), DEFAULT_LIMIT);
    }

    #[tokio::test]
    async fn execution_failure_folds_into_error_result() {
        let client = offline_client();
        let result = call(
            &client,
            "search_components",
            &serde_json::json!({"query": "esp32"}),
        )
        .await;
        assert!(result.is_error);
        let ToolContent::Text { text } = &result.content[0];
        assert!(text.starts_with("Failed to search components:"));
    }
}
