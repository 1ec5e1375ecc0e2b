use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Greeting seeded into every fresh transcript.
pub const GREETING: &str = "How can I help you?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            at: Utc::now(),
        }
    }
}

/// Ordered chat transcript.
///
/// Append-only except for `clear`, which resets it to the single seeded
/// assistant greeting. A fresh transcript and a cleared transcript are
/// indistinguishable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTranscript {
    turns: Vec<Turn>,
}

impl ChatTranscript {
    /// Create a fresh transcript seeded with the assistant greeting.
    pub fn new() -> Self {
        Self {
            turns: vec![Turn::new(Role::Assistant, GREETING)],
        }
    }

    pub fn append(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(Turn::new(role, text));
    }

    /// Reset to the seeded greeting.
    pub fn clear(&mut self) {
        self.turns = vec![Turn::new(Role::Assistant, GREETING)];
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_transcript_has_greeting() {
        let transcript = ChatTranscript::new();
        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, Role::Assistant);
        assert_eq!(transcript.turns()[0].text, GREETING);
    }

    #[test]
    fn test_append_preserves_order() {
        let mut transcript = ChatTranscript::new();
        transcript.append(Role::User, "How many students are there?");
        transcript.append(Role::Assistant, "There are 51 students.");

        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript.turns()[1].role, Role::User);
        assert_eq!(transcript.turns()[2].role, Role::Assistant);
    }

    #[test]
    fn test_clear_resets_to_single_greeting() {
        let mut transcript = ChatTranscript::new();
        transcript.append(Role::User, "hello");
        transcript.append(Role::Assistant, "hi");
        transcript.clear();

        assert_eq!(transcript.len(), 1);
        assert_eq!(transcript.turns()[0].role, Role::Assistant);
        assert_eq!(transcript.turns()[0].text, GREETING);
    }
}
