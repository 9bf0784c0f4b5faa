//! Chat history types

use serde::{Deserialize, Serialize};

/// Who produced a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The human asking questions
    User,
    /// The answering model
    Assistant,
}

/// A single message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// One completed question/answer exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatTurn {
    pub question: String,
    pub answer: String,
}

impl ChatTurn {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Expand the turn into its user and assistant messages
    pub fn messages(&self) -> [ChatMessage; 2] {
        [
            ChatMessage::user(self.question.clone()),
            ChatMessage::assistant(self.answer.clone()),
        ]
    }
}

/// Flatten an ordered turn list into a message list
pub fn history_messages(turns: &[ChatTurn]) -> Vec<ChatMessage> {
    turns.iter().flat_map(|t| t.messages()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serde() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"user""#));

        let parsed: ChatMessage = serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#)
            .unwrap();
        assert_eq!(parsed.role, ChatRole::Assistant);
    }

    #[test]
    fn test_history_messages_ordering() {
        let turns = vec![
            ChatTurn::new("q1", "a1"),
            ChatTurn::new("q2", "a2"),
        ];
        let messages = history_messages(&turns);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[0].content, "q1");
        assert_eq!(messages[3].role, ChatRole::Assistant);
        assert_eq!(messages[3].content, "a2");
    }
}
