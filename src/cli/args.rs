//! Command-line argument parsing for ollama-chat
//!
//! Every flag is optional; with none the client talks to the built-in
//! endpoint and model.

use clap::Parser;
use std::path::PathBuf;

/// ollama-chat - stream replies from an Ollama chat endpoint in the terminal
#[derive(Parser, Debug)]
#[command(name = "ollama-chat")]
#[command(version)]
#[command(about = "Minimal terminal chat client for an Ollama chat endpoint", long_about = None)]
pub struct Args {
    /// Chat endpoint URL (POST, newline-delimited JSON replies)
    #[arg(long)]
    pub url: Option<String>,

    /// Model name sent with every request
    #[arg(short, long)]
    pub model: Option<String>,

    /// Timeout for a whole exchange, in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbosity level: default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only in the log)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }
}

impl Verbosity {
    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "quiet",
            Verbosity::Normal => "normal",
            Verbosity::Verbose => "verbose",
            Verbosity::VeryVerbose => "very_verbose",
        }
    }

    /// Default tracing filter when RUST_LOG is unset
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "warn,ollama_chat=debug",
            Verbosity::VeryVerbose => "warn,ollama_chat=trace",
        }
    }

    /// Check if should show per-exchange statistics
    pub fn show_stats(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
