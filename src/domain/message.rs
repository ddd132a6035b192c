use super::MediaType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One typed unit within a conversation turn sent to the model.
#[derive(Debug, Clone)]
pub enum ContentBlock {
    Text { text: String },
    Image { media_type: MediaType, data: Vec<u8> },
}

/// A conversation turn carrying one or more content blocks.
#[derive(Debug, Clone)]
pub struct Message {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

impl Message {
    pub fn user_text(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// The common extraction shape: one document block followed by the
    /// instruction telling the model what to do with it.
    pub fn user_document(media_type: MediaType, data: Vec<u8>, instruction: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![
                ContentBlock::Image { media_type, data },
                ContentBlock::Text {
                    text: instruction.into(),
                },
            ],
        }
    }
}
