use clap::ValueEnum;

use crate::orchestrator::NormalizedResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the text the model wrote
    #[default]
    Text,
    /// The complete final response payload
    Json,
}

pub fn format_output(
    result: &NormalizedResult,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(result.text.clone()),
        OutputFormat::Json => serde_json::to_string_pretty(&result.raw),
    }
}
