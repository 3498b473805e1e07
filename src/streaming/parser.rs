//! Newline-delimited JSON parser for streaming chat responses
//!
//! Network chunks do not line up with records, so bytes are buffered until
//! a full line is available. Each complete line is then decoded on its own
//! as one `StreamRecord`.

use crate::errors::{ChatError, Result};
use serde_json::Value;

/// Maximum size of a single pending line (1MB)
pub const MAX_LINE_SIZE: usize = 1_048_576;

/// Splits a byte stream into lines
#[derive(Debug)]
pub struct LineParser {
    /// Bytes received but not yet returned as lines
    buffer: Vec<u8>,

    /// Upper bound on an unterminated line
    max_line_size: usize,
}

impl LineParser {
    pub fn new() -> Self {
        Self::with_capacity(MAX_LINE_SIZE)
    }

    /// Create parser with a custom line limit
    pub fn with_capacity(max_line_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            max_line_size,
        }
    }

    /// Append bytes received from the network
    ///
    /// Fails when the unterminated tail would exceed the line limit.
    pub fn add_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(bytes);

        let pending = match self.buffer.iter().rposition(|&b| b == b'\n') {
            Some(last_newline) => self.buffer.len() - last_newline - 1,
            None => self.buffer.len(),
        };
        if pending > self.max_line_size {
            return Err(ChatError::LineTooLong {
                max: self.max_line_size,
            });
        }

        Ok(())
    }

    /// Take the next complete line out of the buffer, without its terminator
    pub fn next_line(&mut self) -> Result<Option<String>> {
        let Some(newline) = self.buffer.iter().position(|&b| b == b'\n') else {
            return Ok(None);
        };

        let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        decode_line(line).map(Some)
    }

    /// Return whatever is left once the stream has ended
    pub fn finish(&mut self) -> Result<Option<String>> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let mut line = std::mem::take(&mut self.buffer);
        if line.last() == Some(&b'\r') {
            line.pop();
        }

        decode_line(line).map(Some)
    }

    /// Get current buffer size
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_line(line: Vec<u8>) -> Result<String> {
    String::from_utf8(line).map_err(|e| ChatError::MalformedChunk {
        line: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        reason: e.utf8_error().to_string(),
    })
}

/// One decoded line of the response body
///
/// The server adds fields of its own (`model`, `created_at`, timings);
/// only the ones the client acts on are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamRecord {
    /// `message.content`, when present
    pub content: Option<String>,

    /// Terminal marker, by truthiness of `done`
    pub done: bool,

    pub error: Option<String>,
}

impl StreamRecord {
    /// Pick the fields the client acts on out of a decoded JSON value
    ///
    /// Field types are checked loosely: `done` counts when truthy and a
    /// non-string `error` is kept as its JSON text. Only a record that
    /// cannot be read at all (not an object, or non-text content) fails.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Some(fields) = value.as_object() else {
            return Err(ChatError::UnexpectedRecord(format!(
                "expected a JSON object, got {}",
                value
            )));
        };

        let content = match fields.get("message") {
            None | Some(Value::Null) => None,
            Some(Value::Object(message)) => match message.get("content") {
                None | Some(Value::Null) => None,
                Some(Value::String(text)) => Some(text.clone()),
                Some(other) => {
                    return Err(ChatError::UnexpectedRecord(format!(
                        "message content is not text: {}",
                        other
                    )))
                }
            },
            Some(other) => {
                return Err(ChatError::UnexpectedRecord(format!(
                    "message is not an object: {}",
                    other
                )))
            }
        };

        let error = match fields.get("error") {
            None | Some(Value::Null) => None,
            Some(Value::String(message)) => Some(message.clone()),
            Some(other) => Some(other.to_string()),
        };

        Ok(Self {
            content,
            done: fields.get("done").map_or(false, is_truthy),
            error,
        })
    }

    /// Text delta carried by this record, if any
    pub fn delta(&self) -> Option<&str> {
        self.content.as_deref().filter(|content| !content.is_empty())
    }

    /// Whether this is the terminal record
    pub fn is_done(&self) -> bool {
        self.done
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Decode one line into a record
///
/// Only a line that is not valid JSON is a malformed chunk.
pub fn parse_record(line: &str) -> Result<StreamRecord> {
    let value: Value = serde_json::from_str(line).map_err(|e| ChatError::MalformedChunk {
        line: line.to_string(),
        reason: e.to_string(),
    })?;
    StreamRecord::from_value(&value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        let mut parser = LineParser::new();
        parser.add_bytes(b"{\"done\":true}\n").unwrap();

        assert_eq!(parser.next_line().unwrap().as_deref(), Some("{\"done\":true}"));
        assert!(parser.next_line().unwrap().is_none());
        assert!(parser.is_empty());
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut parser = LineParser::new();

        parser.add_bytes(br#"{"message":{"con"#).unwrap();
        assert!(parser.next_line().unwrap().is_none());

        parser.add_bytes(b"tent\":\"He\"}}\n{\"do").unwrap();
        assert_eq!(
            parser.next_line().unwrap().as_deref(),
            Some(r#"{"message":{"content":"He"}}"#)
        );
        assert!(parser.next_line().unwrap().is_none());
        assert_eq!(parser.buffer_size(), 4);
    }

    #[test]
    fn test_multiple_lines_in_one_chunk() {
        let mut parser = LineParser::new();
        parser.add_bytes(b"a\n\nb\r\n").unwrap();

        assert_eq!(parser.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(parser.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(parser.next_line().unwrap().as_deref(), Some("b"));
        assert!(parser.next_line().unwrap().is_none());
    }

    #[test]
    fn test_finish_returns_unterminated_tail() {
        let mut parser = LineParser::new();
        parser.add_bytes(b"{\"done\":true}").unwrap();

        assert!(parser.next_line().unwrap().is_none());
        assert_eq!(parser.finish().unwrap().as_deref(), Some("{\"done\":true}"));
        assert!(parser.finish().unwrap().is_none());
    }

    #[test]
    fn test_multibyte_char_split_across_chunks() {
        let mut parser = LineParser::new();
        let line = "{\"message\":{\"content\":\"héllo\"}}\n".as_bytes();
        let split = line.iter().position(|&b| b == 0xC3).unwrap() + 1;

        parser.add_bytes(&line[..split]).unwrap();
        assert!(parser.next_line().unwrap().is_none());
        parser.add_bytes(&line[split..]).unwrap();

        let decoded = parser.next_line().unwrap().unwrap();
        assert!(decoded.contains("héllo"));
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let mut parser = LineParser::new();
        parser.add_bytes(&[b'{', 0xFF, b'}', b'\n']).unwrap();

        let err = parser.next_line().unwrap_err();
        assert!(err.is_malformed_chunk());
    }

    #[test]
    fn test_line_limit() {
        let mut parser = LineParser::with_capacity(100);

        let result = parser.add_bytes(&vec![b'a'; 150]);
        assert!(matches!(result, Err(ChatError::LineTooLong { max: 100 })));
    }

    #[test]
    fn test_line_limit_ignores_completed_lines() {
        let mut parser = LineParser::with_capacity(100);

        let mut data = vec![b'a'; 90];
        data.push(b'\n');
        data.extend_from_slice(&[b'b'; 90]);
        assert!(parser.add_bytes(&data).is_ok());
    }

    #[test]
    fn test_parse_delta_record() {
        let record = parse_record(
            r#"{"model":"qwen2:1.5b","message":{"role":"assistant","content":"He"},"done":false}"#,
        )
        .unwrap();

        assert_eq!(record.delta(), Some("He"));
        assert!(!record.is_done());
    }

    #[test]
    fn test_parse_done_record() {
        let record = parse_record(r#"{"done":true,"total_duration":12345}"#).unwrap();
        assert!(record.is_done());
        assert_eq!(record.delta(), None);
    }

    #[test]
    fn test_parse_final_record_with_empty_message() {
        let record =
            parse_record(r#"{"message":{"role":"assistant","content":""},"done":true}"#).unwrap();
        assert!(record.is_done());
        assert_eq!(record.delta(), None);
    }

    #[test]
    fn test_parse_error_record() {
        let record = parse_record(r#"{"error":"model 'nope' not found"}"#).unwrap();
        assert_eq!(record.error.as_deref(), Some("model 'nope' not found"));
    }

    #[test]
    fn test_parse_invalid_json() {
        let err = parse_record("{not json").unwrap_err();
        match err {
            ChatError::MalformedChunk { line, reason } => {
                assert_eq!(line, "{not json");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_object_json() {
        let err = parse_record("42").unwrap_err();
        assert!(matches!(err, ChatError::UnexpectedRecord(_)));
        assert!(!err.is_malformed_chunk());
    }

    #[test]
    fn test_done_is_truthy() {
        assert!(parse_record(r#"{"done":1}"#).unwrap().is_done());
        assert!(parse_record(r#"{"done":"yes"}"#).unwrap().is_done());
        assert!(!parse_record(r#"{"done":0}"#).unwrap().is_done());
        assert!(!parse_record(r#"{"done":null}"#).unwrap().is_done());
        assert!(!parse_record(r#"{"done":""}"#).unwrap().is_done());
    }

    #[test]
    fn test_non_text_content_is_unexpected() {
        let err = parse_record(r#"{"message":{"content":5}}"#).unwrap_err();
        assert!(matches!(err, ChatError::UnexpectedRecord(_)));
        assert!(err.to_reply_text().starts_with("[Error] "));
    }

    #[test]
    fn test_message_without_content() {
        let record = parse_record(r#"{"message":{"role":"assistant"}}"#).unwrap();
        assert_eq!(record.delta(), None);
        assert!(!record.is_done());
    }

    #[test]
    fn test_structured_error_kept_as_json() {
        let record = parse_record(r#"{"error":{"code":500}}"#).unwrap();
        assert_eq!(record.error.as_deref(), Some(r#"{"code":500}"#));
    }

    #[test]
    fn test_whitespace_only_line_is_malformed() {
        assert!(parse_record("   ").unwrap_err().is_malformed_chunk());
    }
}
