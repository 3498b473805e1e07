//! REPL (Read-Eval-Print Loop) module for the chat client
//!
//! One line of input becomes a user turn, the whole conversation goes to
//! the backend, the streamed reply is printed live and then recorded as
//! the assistant turn. Exchanges run one at a time; the prompt is blocked
//! until the current one finishes.

pub mod commands;
pub mod display;
pub mod input;
pub mod session;

use crate::errors::Result;
use crate::streaming::ChatBackend;
use crate::types::Role;
use tracing::debug;

use crate::repl::commands::Command;
pub use crate::repl::display::DisplayManager;
pub use crate::repl::input::{InputHandler, LineSource};
pub use crate::repl::session::Conversation;

/// Chat session coordinator
///
/// Owns the conversation; nothing else reads or writes it.
pub struct ChatSession<B> {
    backend: B,
    conversation: Conversation,
    display: DisplayManager,
    show_stats: bool,
}

impl<B: ChatBackend> ChatSession<B> {
    pub fn new(backend: B) -> Self {
        ChatSession {
            backend,
            conversation: Conversation::new(),
            display: DisplayManager::new(),
            show_stats: false,
        }
    }

    /// Print per-exchange statistics after each reply
    pub fn with_stats(mut self, show_stats: bool) -> Self {
        self.show_stats = show_stats;
        self
    }

    /// Show welcome banner
    pub fn show_welcome(&self, url: &str, model: &str) {
        self.display.show_banner(url, model);
    }

    /// Run until the user exits or input ends
    pub async fn run<L: LineSource>(&mut self, input: &mut L) -> Result<()> {
        while let Some(line) = input.read_line()? {
            if !self.handle_input(&line).await {
                break;
            }
        }

        debug!(turns = self.conversation.len(), "session finished");
        self.display.show_goodbye();
        Ok(())
    }

    /// Handle one line of input
    ///
    /// Returns true if session should continue, false to exit
    pub async fn handle_input(&mut self, input: &str) -> bool {
        match commands::parse(input) {
            Command::Exit => false,
            Command::Blank => true,
            Command::Message(text) => {
                self.send(text).await;
                true
            }
        }
    }

    /// Run one exchange for a user message and record both turns
    ///
    /// Returns the recorded assistant text: the streamed reply, or the
    /// error marker when the exchange failed.
    pub async fn send(&mut self, text: String) -> String {
        self.conversation.append(Role::User, text);

        self.display.begin_reply();
        let display = &mut self.display;
        let reply = self
            .backend
            .exchange(self.conversation.snapshot(), &mut |delta: &str| {
                display.stream_delta(delta)
            })
            .await;
        self.display.end_reply(&reply, self.show_stats);

        let reply_text = reply.into_text();
        self.conversation.append(Role::Assistant, reply_text.clone());
        reply_text
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
