use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::content::ContentBlock;
use crate::tool::ToolDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Message content is either a bare string or an ordered sequence of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
    /// Blocks echoed back exactly as the model sent them, unknown fields included.
    Raw(Vec<Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
}

impl Message {
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    /// Replays an assistant turn from the raw `content` array of a response.
    pub fn assistant_raw(content: Vec<Value>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Raw(content),
        }
    }

    /// A user turn answering a single tool use.
    pub fn tool_result<I, C>(tool_use_id: I, output: C) -> Self
    where
        I: Into<String>,
        C: Into<String>,
    {
        Self {
            role: Role::User,
            content: MessageContent::Blocks(vec![ContentBlock::tool_result(tool_use_id, output)]),
        }
    }
}

/// Body of a `POST /v1/messages` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// A decoded model reply. `raw` keeps the complete payload for callers that need
/// fields this struct does not model.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub role: String,
    #[serde(deserialize_with = "lossy_blocks")]
    pub content: Vec<ContentBlock>,
    pub stop_reason: String,
    #[serde(default)]
    pub model: String,
    #[serde(skip)]
    pub raw: Value,
}

/// `content` must be an array, but one malformed entry does not sink the others.
fn lossy_blocks<'de, D>(deserializer: D) -> Result<Vec<ContentBlock>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    Ok(values.into_iter().map(ContentBlock::from_value_lossy).collect())
}

impl ModelResponse {
    pub const TOOL_USE: &'static str = "tool_use";

    pub fn wants_tool(&self) -> bool {
        self.stop_reason == Self::TOOL_USE
    }

    /// The raw `content` array, in the order the model produced it.
    pub fn raw_content(&self) -> Vec<Value> {
        self.raw
            .get("content")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default()
    }
}
