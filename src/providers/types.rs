pub mod content;
pub mod message;
