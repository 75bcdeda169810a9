pub mod config;
pub mod errors;
pub mod executor;
pub mod format;
pub mod orchestrator;
pub mod prompt;
pub mod providers;
pub mod storage;
pub mod tool;
