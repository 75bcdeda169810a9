use anyhow::Result;

/// Produces the result text for a tool the model asked to use.
pub trait ToolExecutor: Send + Sync {
    fn execute(&self, tool_name: &str, thought: &str) -> Result<String>;
}

/// Canned analysis standing in for a real reasoning backend.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderAnalyzer;

const JAPAN_ANALYSIS: &str = r#"I've analyzed the thought "Japan is cool":

Strengths:
- Simple and clear statement of opinion
- Easy to understand sentiment
- Broadly relatable to many audiences

Concerns:
- Very general statement lacking specific details
- No supporting evidence or reasoning provided
- Could be perceived as overly simplistic

Recommendation:
- Consider adding specific aspects of Japan that are "cool"
- Provide personal experiences or facts that support this opinion
- Consider cultural context and avoid generalizations"#;

const GENERIC_ANALYSIS: &str = "I've analyzed the thought. Here are my observations:

Strengths:
- Clear statement of opinion
- Easy to understand the main point

Concerns:
- Limited supporting details or evidence
- Could benefit from more specific examples

Recommendation:
- Add specific supporting details
- Consider different perspectives
- Clarify reasoning behind the thought";

impl ToolExecutor for PlaceholderAnalyzer {
    fn execute(&self, _tool_name: &str, thought: &str) -> Result<String> {
        let analysis = match thought {
            "Japan is cool" => JAPAN_ANALYSIS,
            _ => GENERIC_ANALYSIS,
        };
        Ok(analysis.to_string())
    }
}
