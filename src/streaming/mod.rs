//! Streaming client module
//!
//! Provides the Ollama chat client and the newline-delimited reply consumer.

pub mod client;
pub mod parser;
pub mod reply;

// Re-export commonly used types
pub use client::{ChatBackend, OllamaClient, DEFAULT_CHAT_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT};
pub use parser::{parse_record, LineParser, StreamRecord, MAX_LINE_SIZE};
pub use reply::{consume_stream, Reply, ReplyAccumulator, StreamState};
