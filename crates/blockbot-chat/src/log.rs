//! Append-only conversation log.

use crate::types::{Role, Turn};

/// Chronological sequence of turns for one session.
///
/// Turns can only be appended; nothing is reordered or removed.
#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    turns: Vec<Turn>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return a reference to it.
    pub fn append(&mut self, role: Role, content: impl Into<String>) -> &Turn {
        self.turns.push(Turn::new(role, content));
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_log_is_empty() {
        let log = ConversationLog::new();
        assert!(log.turns().is_empty());
    }

    #[test]
    fn test_append_returns_new_turn() {
        let mut log = ConversationLog::new();
        let turn = log.append(Role::User, "hello").clone();
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "hello");
        assert_eq!(log.turns().last(), Some(&turn));
    }

    #[test]
    fn test_append_preserves_order() {
        let mut log = ConversationLog::new();
        log.append(Role::User, "first");
        log.append(Role::Assistant, "second");
        log.append(Role::User, "third");

        let contents: Vec<&str> = log.turns().iter().map(|t| t.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
        assert_eq!(log.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn test_turn_ids_distinct_within_log() {
        let mut log = ConversationLog::new();
        for i in 0..20 {
            log.append(Role::User, format!("message {}", i));
        }
        let mut ids: Vec<_> = log.turns().iter().map(|t| t.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 20);
    }
}
