use serde::{Deserialize, Serialize};
use serde_json::Value;

// Text content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
}

// Tool use content, as requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub input: Value,
}

impl ToolUse {
    /// A tool use is only actionable when it can be answered by id and dispatched by name.
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty() && !self.name.is_empty()
    }
}

// Tool result content, sent back in the next user turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    pub tool_use_id: String,
    pub content: String,
}

/// One entry of a message's content sequence, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text(Text),
    ToolUse(ToolUse),
    ToolResult(ToolResult),
    /// Any block type this crate does not model. It survives in the raw payload.
    #[serde(other)]
    Unknown,
}

impl ContentBlock {
    /// Decode one block without failing. A block that does not match its declared
    /// shape becomes `Unknown`, except a malformed `tool_use`, which keeps its
    /// position with whatever `id` and `name` strings it has.
    pub fn from_value_lossy(value: Value) -> Self {
        if let Ok(block) = serde_json::from_value(value.clone()) {
            return block;
        }
        if value.get("type").and_then(Value::as_str) != Some("tool_use") {
            return ContentBlock::Unknown;
        }

        let field = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        ContentBlock::ToolUse(ToolUse {
            id: field("id"),
            name: field("name"),
            input: value.get("input").cloned().unwrap_or(Value::Null),
        })
    }

    pub fn text<S: Into<String>>(text: S) -> Self {
        ContentBlock::Text(Text { text: text.into() })
    }

    pub fn tool_result<I, C>(tool_use_id: I, content: C) -> Self
    where
        I: Into<String>,
        C: Into<String>,
    {
        ContentBlock::ToolResult(ToolResult {
            tool_use_id: tool_use_id.into(),
            content: content.into(),
        })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Text(_) => "text",
            ContentBlock::ToolUse(_) => "tool_use",
            ContentBlock::ToolResult(_) => "tool_result",
            ContentBlock::Unknown => "unknown",
        }
    }
}
