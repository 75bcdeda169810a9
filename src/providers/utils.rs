use serde_json::Value;

use super::types::{
    content::{ContentBlock, Text, ToolUse},
    message::ModelResponse,
};

/// Concatenate the text of every text block, each followed by a newline.
pub fn extract_text(content: &[ContentBlock]) -> String {
    content
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text(Text { text }) => Some(format!("{}\n", text)),
            _ => None,
        })
        .collect()
}

/// The first tool use in document order, if any. Later tool uses are ignored.
pub fn first_tool_use(content: &[ContentBlock]) -> Option<&ToolUse> {
    content.iter().find_map(|block| match block {
        ContentBlock::ToolUse(tool_use) => Some(tool_use),
        _ => None,
    })
}

pub fn count_tool_uses(content: &[ContentBlock]) -> usize {
    content
        .iter()
        .filter(|block| matches!(block, ContentBlock::ToolUse(_)))
        .count()
}

/// Decode a messages endpoint reply, keeping the complete payload alongside the
/// typed view.
pub fn decode_response(bytes: &[u8]) -> serde_json::Result<ModelResponse> {
    let raw: Value = serde_json::from_slice(bytes)?;
    let mut response: ModelResponse = serde_json::from_value(raw.clone())?;
    response.raw = raw;
    Ok(response)
}
