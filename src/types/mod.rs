//! Type definitions module
//!
//! Conversation turns exchanged with the chat endpoint.

pub mod messages;

pub use messages::{Role, Turn};
