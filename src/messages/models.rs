use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Contact message stored in the database
#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Validated contact message ready to be persisted
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl From<Message> for MessageView {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            first_name: message.first_name,
            last_name: message.last_name,
            email: message.email,
            phone: message.phone,
            message: message.message,
            created_at: message.created_at,
        }
    }
}

/// Request DTO for the public contact form
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    #[validate(
        required(message = "First Name Is Required!"),
        length(min = 2, message = "First Name Must Contain At Least 2 Characters!"),
        custom = "crate::validation::validate_alpha_name"
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last Name Is Required!"),
        length(min = 2, message = "Last Name Must Contain At Least 2 Characters!"),
        custom = "crate::validation::validate_alpha_name"
    )]
    pub last_name: Option<String>,

    #[validate(
        required(message = "Email Is Required!"),
        email(message = "Please Provide A Valid Email!")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "Phone Number Is Required!"),
        length(equal = 11, message = "Phone Number Must Contain Exact 11 Digits!"),
        custom = "crate::validation::validate_numeric"
    )]
    pub phone: Option<String>,

    #[validate(
        required(message = "Message Is Required!"),
        length(min = 10, message = "Message Must Contain At Least 10 Characters!")
    )]
    #[schema(example = "I would like to know your visiting hours.")]
    pub message: Option<String>,
}

/// Payload carrying every contact message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessagesResponse {
    pub success: bool,
    pub messages: Vec<MessageView>,
}
