//! CLI module for ollama-chat
//!
//! Handles command-line argument parsing.

pub mod args;

pub use args::{Args, Verbosity};
