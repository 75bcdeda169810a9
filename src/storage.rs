use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Read a thought from a file.
pub fn read_thought(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    fs::read_to_string(path).with_context(|| format!("failed to read file {}", path.display()))
}

/// Write formatted output to a file, replacing any previous content.
pub fn write_output(path: impl AsRef<Path>, content: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, content).with_context(|| format!("failed to write file {}", path.display()))
}
