use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const THINK_TOOL_NAME: &str = "think";

/// A custom tool advertised to the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Tool kind, always `custom` for client-side tools
    #[serde(rename = "type")]
    pub kind: String,
    /// The name of the tool
    pub name: String,
    /// A description of what the tool does
    pub description: String,
    /// A json schema of the input the tool accepts
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a new custom tool with the given name and description
    pub fn custom<N, D>(name: N, description: D, input_schema: Value) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        ToolDefinition {
            kind: "custom".to_string(),
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// The `think` tool: the model hands it a thought to analyze and verify.
pub fn think_tool() -> ToolDefinition {
    ToolDefinition::custom(
        THINK_TOOL_NAME,
        "A tool to analyze and verify thinking processes",
        json!({
            "type": "object",
            "properties": {
                "thought": {
                    "type": "string",
                    "description": "The thought content to be analyzed and verified"
                }
            },
            "required": ["thought"]
        }),
    )
}
