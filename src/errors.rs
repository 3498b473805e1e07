//! Error types for ollama-chat
//!
//! Every failure an exchange can hit is a `ChatError`; the exchange boundary
//! turns it into a textual reply instead of propagating it.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the chat client
#[derive(Error, Debug)]
pub enum ChatError {
    /// Transport failures: connect, DNS, timeout, body read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status from the chat endpoint
    #[error("HTTP {status}{}", body_suffix(.body))]
    Status { status: StatusCode, body: String },

    /// A streamed line that is not a valid record
    #[error("{reason}: {line}")]
    MalformedChunk { line: String, reason: String },

    /// Valid JSON that is not a usable record
    #[error("Unexpected record: {0}")]
    UnexpectedRecord(String),

    /// The server reported an error inside the stream
    #[error("Server error: {0}")]
    Server(String),

    /// A pending line grew past the parser limit
    #[error("Stream line exceeds {max} bytes")]
    LineTooLong { max: usize },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Line editor errors
    #[error("Readline error: {0}")]
    Readline(String),
}

impl ChatError {
    /// Whether this error came from a line that failed to decode
    pub fn is_malformed_chunk(&self) -> bool {
        matches!(self, ChatError::MalformedChunk { .. })
    }

    /// Textual marker recorded in place of a reply
    pub fn to_reply_text(&self) -> String {
        match self {
            ChatError::MalformedChunk { .. } => format!("[JSON Error] {}", self),
            other => format!("[Error] {}", other),
        }
    }
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

/// Result type alias for chat operations
pub type Result<T> = std::result::Result<T, ChatError>;

impl From<rustyline::error::ReadlineError> for ChatError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        ChatError::Readline(err.to_string())
    }
}
