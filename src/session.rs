//! Conversation history for the interactive front end.
//!
//! [`ChatSession`] is an append-only, ordered list of `{role, content}`
//! messages owned by one session. It can be cleared, printed and exported as
//! JSON; it is never shared between sessions.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Ordered message history of one interactive session.
///
/// # Example
/// ```rust
/// use ottoman_converter::session::{ChatSession, Role};
///
/// let mut session = ChatSession::new();
/// session.push_user("kitap");
/// session.push_assistant("كتاب");
/// assert_eq!(session.messages()[1].role, Role::Assistant);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
        });
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Role::User, content);
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Role::Assistant, content);
    }

    /// Drop every message (the "clear chat" action).
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Plain-text transcript, one `role: content` block per message.
    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .map(|m| format!("{}: {}", m.role, m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Write the history as pretty JSON, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&self.messages)?)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn starts_empty() {
        let session = ChatSession::new();
        assert!(session.is_empty());
        assert_eq!(session.len(), 0);
        assert_eq!(session.transcript(), "");
    }

    #[test]
    fn keeps_insertion_order() {
        let mut session = ChatSession::new();
        session.push_user("kitap");
        session.push_assistant("كتاب");
        session.push_user("kalem");

        let roles: Vec<Role> = session.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant, Role::User]);
        assert_eq!(session.messages()[2].content, "kalem");
    }

    #[test]
    fn history_is_not_capped() {
        let mut session = ChatSession::new();
        for i in 0..50 {
            session.push_user(format!("satır {i}"));
        }
        assert_eq!(session.len(), 50);
        assert_eq!(session.messages()[0].content, "satır 0");
    }

    #[test]
    fn clear_resets() {
        let mut session = ChatSession::new();
        session.push_user("kitap");
        session.clear();
        assert!(session.is_empty());
    }

    #[test]
    fn transcript_format() {
        let mut session = ChatSession::new();
        session.push_user("kitap");
        session.push_assistant("كتاب");
        assert_eq!(session.transcript(), "user: kitap\nassistant: كتاب");
    }

    #[test]
    fn saves_json() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("out").join("chat.json");

        let mut session = ChatSession::new();
        session.push_user("kitap");
        session.push_assistant("كتاب");
        session.save_to(&path).expect("save");

        let data = std::fs::read_to_string(&path).expect("read");
        let loaded: Vec<ChatMessage> = serde_json::from_str(&data).expect("json");
        assert_eq!(loaded, session.messages());
        assert!(data.contains("\"role\": \"assistant\""));
    }
}
