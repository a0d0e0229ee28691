// HTTP handlers for the contact form

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::auth::middleware::AdminUser;
use crate::auth::models::MessageResponse;
use crate::error::{ApiError, ErrorResponse};
use crate::messages::{MessageError, MessagesResponse, SendMessageRequest};
use crate::AppState;

/// Handler for POST /api/v1/message/send
#[utoipa::path(
    post,
    path = "/api/v1/message/send",
    request_body = SendMessageRequest,
    responses(
        (status = 200, description = "Message stored", body = MessageResponse),
        (status = 400, description = "Validation failure", body = ErrorResponse)
    ),
    tag = "messages"
)]
pub async fn send_message(
    State(state): State<AppState>,
    payload: Result<Json<SendMessageRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(request) = payload?;
    state.message_service.send(request).await?;

    Ok(Json(MessageResponse {
        success: true,
        message: "Message Sent Successfully!".to_string(),
    }))
}

/// Handler for GET /api/v1/message/getall
/// Lists contact messages (Admin only)
#[utoipa::path(
    get,
    path = "/api/v1/message/getall",
    responses(
        (status = 200, description = "All messages, newest first", body = MessagesResponse),
        (status = 400, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    tag = "messages"
)]
pub async fn list_messages(
    State(state): State<AppState>,
    _admin: AdminUser,
) -> Result<Json<MessagesResponse>, MessageError> {
    let messages = state.message_service.list().await?;

    Ok(Json(MessagesResponse {
        success: true,
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}
