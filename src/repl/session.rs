//! Conversation state for the REPL
//!
//! The full ordered list of turns is sent with every request, so this is
//! the model's only context window. It is append-only and unbounded for
//! the lifetime of the process.

use crate::types::{Role, Turn};

/// Ordered, append-only sequence of turns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn at the end of the conversation
    pub fn append(&mut self, role: Role, content: impl Into<String>) {
        self.turns.push(Turn::new(role, content));
    }

    /// Full ordered sequence for transmission
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }
}
