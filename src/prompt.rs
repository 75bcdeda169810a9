pub const DEFAULT_PROMPT: &str = "Please analyze the following thought:";

/// Builds the user prompt for a thought. A non-empty template is prefixed to the
/// thought; otherwise the default analysis request is used.
pub fn compose(thought: &str, template: Option<&str>) -> String {
    match template {
        Some(template) if !template.is_empty() => format!("{} {}", template, thought),
        _ => format!("{} {}", DEFAULT_PROMPT, thought),
    }
}
