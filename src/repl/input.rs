//! Input handler for REPL using rustyline
//!
//! Provides readline editing with an in-memory history. History is never
//! written to disk.

use crate::errors::{ChatError, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// Default prompt shown for the user's turn
pub const DEFAULT_PROMPT: &str = "You: ";

/// Source of input lines for the chat loop
pub trait LineSource {
    /// Read the next line
    ///
    /// Returns:
    /// - Ok(Some(line)) for normal input
    /// - Ok(None) when the user is done (EOF or interrupt)
    fn read_line(&mut self) -> Result<Option<String>>;
}

/// Input handler managing the readline interface
pub struct InputHandler {
    editor: DefaultEditor,
    prompt: String,
}

impl InputHandler {
    /// Create new input handler
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()?;

        Ok(InputHandler {
            editor,
            prompt: DEFAULT_PROMPT.to_string(),
        })
    }
}

impl LineSource for InputHandler {
    fn read_line(&mut self) -> Result<Option<String>> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(Some(line))
            }
            // Ctrl-C and Ctrl-D both end the session
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(ChatError::Readline(err.to_string())),
        }
    }
}
