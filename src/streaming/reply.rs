//! Streaming reply consumer
//!
//! Turns the response body into the assistant's reply: every text delta is
//! handed to a sink as soon as it is decoded and also appended to a buffer.
//! The buffer is what ends up in the conversation.
//!
//! ```text
//! AwaitingFirstChunk ──record──▶ Streaming ──done──▶ Done
//!         │                          │
//!         └──────── end of body ─────┴─────────────▶ Closed
//!         └──────── bad line / error record ───────▶ Failed
//! ```

use crate::errors::{ChatError, Result};
use crate::streaming::parser::{parse_record, LineParser};
use crate::telemetry::ExchangeStats;
use bytes::Bytes;
use futures_util::{pin_mut, Stream, StreamExt};
use std::time::Instant;
use tracing::{debug, trace};

/// Consumer states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    AwaitingFirstChunk,
    Streaming,
    /// Terminal marker received
    Done,
    /// Body ended without a terminal marker
    Closed,
    Failed,
}

impl StreamState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StreamState::Done | StreamState::Closed | StreamState::Failed)
    }
}

/// What the caller should do after feeding a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    Continue,
    Done,
}

/// Accumulates one assistant reply from decoded lines
#[derive(Debug)]
pub struct ReplyAccumulator {
    buffer: String,
    state: StreamState,
    stats: ExchangeStats,
}

impl ReplyAccumulator {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            state: StreamState::AwaitingFirstChunk,
            stats: ExchangeStats::default(),
        }
    }

    /// Feed one line of the response body
    ///
    /// Empty lines are skipped; anything else must decode. A line that does
    /// not decode, or a record carrying an `error`, moves the accumulator to
    /// `Failed`.
    pub fn feed_line(&mut self, line: &str, sink: &mut dyn FnMut(&str)) -> Result<LineOutcome> {
        if self.state.is_terminal() {
            return Ok(LineOutcome::Done);
        }
        if line.is_empty() {
            return Ok(LineOutcome::Continue);
        }
        trace!(line, "stream line");

        let record = match parse_record(line) {
            Ok(record) => record,
            Err(e) => {
                self.state = StreamState::Failed;
                return Err(e);
            }
        };
        self.state = StreamState::Streaming;
        self.stats.records += 1;
        debug!(
            record = self.stats.records,
            delta_len = record.delta().map_or(0, str::len),
            done = record.is_done(),
            "record received"
        );

        if let Some(message) = &record.error {
            self.state = StreamState::Failed;
            return Err(ChatError::Server(message.clone()));
        }

        if let Some(delta) = record.delta() {
            self.buffer.push_str(delta);
            self.stats.deltas += 1;
            self.stats.bytes += delta.len();
            sink(delta);
        }

        if record.is_done() {
            debug!(records = self.stats.records, "terminal marker received");
            self.state = StreamState::Done;
            self.stats.saw_done = true;
            return Ok(LineOutcome::Done);
        }

        Ok(LineOutcome::Continue)
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Text accumulated so far
    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn stats(&self) -> &ExchangeStats {
        &self.stats
    }

    /// Mark the body as ended; a reply without a terminal marker still counts
    pub fn close(&mut self) {
        if !self.state.is_terminal() {
            self.state = StreamState::Closed;
        }
    }

    /// Take the accumulated reply
    pub fn finish(self) -> (String, ExchangeStats) {
        (self.buffer, self.stats)
    }
}

impl Default for ReplyAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

/// Consume a streamed response body into a complete reply
///
/// Stops at the terminal marker even if the body has more data; the stream
/// is dropped (and the connection released) on every return path.
pub async fn consume_stream<S, E>(
    stream: S,
    sink: &mut dyn FnMut(&str),
) -> Result<(String, ExchangeStats)>
where
    S: Stream<Item = std::result::Result<Bytes, E>>,
    ChatError: From<E>,
{
    let started = Instant::now();
    let mut parser = LineParser::new();
    let mut accumulator = ReplyAccumulator::new();
    pin_mut!(stream);

    'body: while let Some(chunk) = stream.next().await {
        parser.add_bytes(&chunk?)?;
        while let Some(line) = parser.next_line()? {
            if accumulator.feed_line(&line, sink)? == LineOutcome::Done {
                break 'body;
            }
        }
    }

    if !accumulator.state().is_terminal() {
        if let Some(line) = parser.finish()? {
            accumulator.feed_line(&line, sink)?;
        }
        accumulator.close();
    }

    let (text, mut stats) = accumulator.finish();
    stats.elapsed = started.elapsed();
    Ok((text, stats))
}

/// Result of one exchange
#[derive(Debug)]
pub enum Reply {
    Complete { text: String, stats: ExchangeStats },
    Failed(ChatError),
}

impl Reply {
    pub fn is_success(&self) -> bool {
        matches!(self, Reply::Complete { .. })
    }

    pub fn error(&self) -> Option<&ChatError> {
        match self {
            Reply::Failed(error) => Some(error),
            Reply::Complete { .. } => None,
        }
    }

    pub fn stats(&self) -> Option<&ExchangeStats> {
        match self {
            Reply::Complete { stats, .. } => Some(stats),
            Reply::Failed(_) => None,
        }
    }

    /// Text recorded as the assistant turn
    ///
    /// A failed exchange yields its error marker; deltas streamed before the
    /// failure are not part of it.
    pub fn into_text(self) -> String {
        match self {
            Reply::Complete { text, .. } => text,
            Reply::Failed(error) => error.to_reply_text(),
        }
    }
}

impl From<Result<(String, ExchangeStats)>> for Reply {
    fn from(result: Result<(String, ExchangeStats)>) -> Self {
        match result {
            Ok((text, stats)) => Reply::Complete { text, stats },
            Err(error) => Reply::Failed(error),
        }
    }
}
