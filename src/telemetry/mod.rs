//! Telemetry for ollama-chat
//!
//! Installs the tracing subscriber and carries per-exchange statistics.
//! Log output goes to stderr; stdout belongs to the conversation.

use std::io::IsTerminal;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over `default_filter` when set. Calling this more than
/// once is harmless.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();
}

/// Statistics for one exchange
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExchangeStats {
    /// Non-empty lines decoded
    pub records: usize,
    /// Records that carried text
    pub deltas: usize,
    /// Bytes of reply text
    pub bytes: usize,
    /// Whether the server sent the terminal marker
    pub saw_done: bool,
    pub elapsed: Duration,
}

impl ExchangeStats {
    /// One-line summary for verbose display
    pub fn summary(&self) -> String {
        let elapsed = if self.elapsed.as_millis() >= 1000 {
            format!("{:.1}s", self.elapsed.as_secs_f64())
        } else {
            format!("{}ms", self.elapsed.as_millis())
        };
        let ending = if self.saw_done { "done" } else { "closed" };

        format!(
            "{} records, {} deltas, {} bytes in {} ({})",
            self.records, self.deltas, self.bytes, elapsed, ending
        )
    }
}
