use std::sync::Arc;

use validator::Validate;

use crate::messages::{Message, MessageError, MessageRepository, NewMessage, SendMessageRequest};

/// Service for the public contact form
#[derive(Clone)]
pub struct MessageService {
    messages: Arc<dyn MessageRepository>,
}

impl MessageService {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    pub async fn send(&self, request: SendMessageRequest) -> Result<Message, MessageError> {
        request.validate()?;

        let (Some(first_name), Some(last_name), Some(email), Some(phone), Some(message)) = (
            request.first_name,
            request.last_name,
            request.email,
            request.phone,
            request.message,
        ) else {
            return Err(MessageError::Validation(validator::ValidationErrors::new()));
        };

        let stored = self
            .messages
            .create(NewMessage {
                first_name,
                last_name,
                email,
                phone,
                message,
            })
            .await?;

        tracing::info!("Stored contact message {} from {}", stored.id, stored.email);
        Ok(stored)
    }

    pub async fn list(&self) -> Result<Vec<Message>, MessageError> {
        let messages = self.messages.list_all().await?;
        tracing::debug!("Retrieved {} contact messages", messages.len());
        Ok(messages)
    }
}
