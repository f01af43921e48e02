//! Error types for the dialogue controller.

use blockbot_core::error::BlockbotError;

/// Reasons a turn is refused before it reaches the conversation log.
///
/// Failures that happen while a turn is processed (generation errors,
/// confirmation mismatches) never surface here; they become assistant text.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("message exceeds maximum length of {0} characters")]
    MessageTooLong(usize),
    #[error("a previous message is still being processed")]
    Busy,
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
}

impl From<ChatError> for BlockbotError {
    fn from(err: ChatError) -> Self {
        BlockbotError::Chat(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        assert_eq!(
            ChatError::MessageTooLong(4000).to_string(),
            "message exceeds maximum length of 4000 characters"
        );
        assert_eq!(
            ChatError::Busy.to_string(),
            "a previous message is still being processed"
        );
        assert_eq!(
            ChatError::UnknownTopic("Gardening".to_string()).to_string(),
            "unknown topic: Gardening"
        );
    }

    #[test]
    fn test_into_blockbot_error() {
        let err: BlockbotError = ChatError::Busy.into();
        assert!(matches!(err, BlockbotError::Chat(_)));
        assert!(err.to_string().contains("still being processed"));
    }
}
