//! ollama-chat - minimal terminal chat client
//!
//! Forwards each user turn, together with the whole conversation so far, to
//! an Ollama chat endpoint and prints the streamed reply as it arrives.
//!
//! # Architecture
//!
//! - **streaming**: HTTP client and newline-delimited reply consumer
//! - **repl**: conversation state, line input and the chat loop
//! - **cli / config / telemetry**: flags, TOML settings, logging

pub mod errors;
pub mod types;
pub mod streaming;
pub mod repl;

// Re-export commonly used types
pub use errors::{ChatError, Result};

pub mod cli;
pub mod config;
pub mod telemetry;
