//! Display manager for the chat terminal UI
//!
//! Streams reply deltas to stdout as they arrive. A spinner runs on stderr
//! while the first chunk is still outstanding.

use crate::streaming::Reply;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::time::Duration;

/// Label printed before each assistant reply
pub const ASSISTANT_LABEL: &str = "Ollama: ";

/// Banner lines shown on launch: title, endpoint and model, exit hint
pub fn banner_lines(url: &str, model: &str) -> [String; 3] {
    [
        "=== Ollama Chat TUI ===".to_string(),
        format!("Connected to: {}, using model: {}", url, model),
        "Type 'exit' to quit.".to_string(),
    ]
}

/// Display manager for the REPL
pub struct DisplayManager {
    spinner: Option<ProgressBar>,
    /// Whether the current reply has printed anything yet
    streaming: bool,
    tick_interval: Duration,
}

impl DisplayManager {
    pub fn new() -> Self {
        DisplayManager {
            spinner: None,
            streaming: false,
            tick_interval: Duration::from_millis(100),
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, url: &str, model: &str) {
        let [title, endpoint, hint] = banner_lines(url, model);
        println!("{}", title.bold().cyan());
        println!("{}", endpoint);
        println!("{}\n", hint);
    }

    /// Start a reply: spin until the first delta shows up
    pub fn begin_reply(&mut self) {
        self.streaming = false;

        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message("waiting for the model...");
        spinner.enable_steady_tick(self.tick_interval);
        self.spinner = Some(spinner);
    }

    /// Print one delta as soon as it arrives
    pub fn stream_delta(&mut self, delta: &str) {
        if !self.streaming {
            self.clear_spinner();
            print!("{}", ASSISTANT_LABEL.bold().blue());
            self.streaming = true;
        }
        print!("{}", delta);
        let _ = io::stdout().flush();
    }

    /// Close out the reply line
    ///
    /// A failed exchange prints its error marker; anything already streamed
    /// stays on screen above it.
    pub fn end_reply(&mut self, reply: &Reply, show_stats: bool) {
        self.clear_spinner();

        match reply.error() {
            None => {
                if !self.streaming {
                    print!("{}", ASSISTANT_LABEL.bold().blue());
                }
                println!();
            }
            Some(error) => {
                if self.streaming {
                    println!();
                }
                print!("{}", ASSISTANT_LABEL.bold().blue());
                println!("{}", error.to_reply_text().red());
            }
        }
        self.streaming = false;

        if show_stats {
            if let Some(stats) = reply.stats() {
                println!("{}", stats.summary().dimmed());
            }
        }
        let _ = io::stdout().flush();
    }

    pub fn show_goodbye(&self) {
        println!("{}", "Bye.".dimmed());
    }

    /// Whether the current reply has printed a delta
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    fn clear_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Default for DisplayManager {
    fn default() -> Self {
        Self::new()
    }
}
