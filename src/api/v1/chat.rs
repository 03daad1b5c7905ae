//! Student/teacher chat handlers.
//!
//! Only the two participants of a conversation may read or post to it.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::auth::Caller;
use crate::api::{ApiError, AppState};
use crate::backend::{
    Backend, ChatMessage, ChatRepository, Conversation, NewChatMessage, NewConversation,
    ProfileRepository, Role,
};

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

#[derive(Serialize, ToSchema)]
pub struct ConversationResponse {
    pub id: String,
    pub student_id: String,
    pub teacher_id: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            student_id: c.student_id,
            teacher_id: c.teacher_id,
            created_at: c.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub id: String,
    pub conversation_id: String,
    pub sender_id: String,
    #[schema(example = "Can we move tomorrow's lesson?")]
    pub content: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ChatMessage> for MessageResponse {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id,
            conversation_id: m.conversation_id,
            sender_id: m.sender_id,
            content: m.content,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OpenConversationRequest {
    /// User ID of the teacher to talk to
    pub teacher_id: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SendMessageRequest {
    #[schema(example = "Can we move tomorrow's lesson?")]
    pub content: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Load a conversation and require the caller to be one of its participants.
async fn participant_conversation<B: Backend>(
    state: &AppState<B>,
    caller: &Caller,
    id: &str,
) -> Result<Conversation, ApiError> {
    let conversation = state.backend().chat().conversation(id).await?;
    if !conversation.has_participant(&caller.user.id) {
        return Err(ApiError::Forbidden(
            "Not a participant in this conversation".to_string(),
        ));
    }
    Ok(conversation)
}

/// List the caller's conversations
#[utoipa::path(
    get,
    path = "/v1/conversations",
    tag = "chat",
    responses(
        (status = 200, description = "Conversations, newest first", body = Vec<ConversationResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::api::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, caller))]
pub async fn list_conversations<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Caller,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let conversations = state
        .backend()
        .chat()
        .list_conversations(&caller.user.id)
        .await?;
    Ok(Json(
        conversations
            .into_iter()
            .map(ConversationResponse::from)
            .collect(),
    ))
}

/// Open a conversation between the calling student and a teacher
///
/// Returns the existing conversation if there is one (200), otherwise creates it (201).
#[utoipa::path(
    post,
    path = "/v1/conversations",
    tag = "chat",
    request_body = OpenConversationRequest,
    responses(
        (status = 200, description = "Existing conversation", body = ConversationResponse),
        (status = 201, description = "Conversation created", body = ConversationResponse),
        (status = 400, description = "Target is not a teacher", body = crate::api::ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = crate::api::ErrorResponse),
        (status = 403, description = "Caller is not a student", body = crate::api::ErrorResponse),
        (status = 404, description = "Teacher not found", body = crate::api::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, caller))]
pub async fn open_conversation<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Caller,
    Json(req): Json<OpenConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), ApiError> {
    let teacher_id = req.teacher_id.trim();
    if teacher_id.is_empty() {
        return Err(ApiError::BadRequest("teacher_id is required".to_string()));
    }
    caller.require_role(&state, Role::Student).await?;

    let target = state.backend().profiles().get(teacher_id).await?;
    if target.role != Role::Teacher {
        return Err(ApiError::BadRequest(format!(
            "Profile '{}' is not a teacher (role: {})",
            teacher_id, target.role
        )));
    }

    let chat = state.backend().chat();
    if let Some(existing) = chat.find_conversation(&caller.user.id, teacher_id).await? {
        return Ok((StatusCode::OK, Json(existing.into())));
    }

    let created = chat
        .create_conversation(&NewConversation {
            student_id: caller.user.id.clone(),
            teacher_id: teacher_id.to_string(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List messages in a conversation, oldest first
#[utoipa::path(
    get,
    path = "/v1/conversations/{id}/messages",
    tag = "chat",
    params(("id" = String, Path, description = "Conversation ID")),
    responses(
        (status = 200, description = "Messages", body = Vec<MessageResponse>),
        (status = 403, description = "Caller is not a participant", body = crate::api::ErrorResponse),
        (status = 404, description = "Conversation not found", body = crate::api::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, caller))]
pub async fn list_messages<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Caller,
    Path(id): Path<String>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let conversation = participant_conversation(&state, &caller, &id).await?;
    let messages = state
        .backend()
        .chat()
        .list_messages(&conversation.id)
        .await?;
    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Post a message to a conversation
#[utoipa::path(
    post,
    path = "/v1/conversations/{id}/messages",
    tag = "chat",
    params(("id" = String, Path, description = "Conversation ID")),
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = MessageResponse),
        (status = 400, description = "Empty message", body = crate::api::ErrorResponse),
        (status = 403, description = "Caller is not a participant", body = crate::api::ErrorResponse),
        (status = 404, description = "Conversation not found", body = crate::api::ErrorResponse)
    ),
    security(("bearer" = []))
)]
#[instrument(skip(state, caller, req))]
pub async fn send_message<B: Backend>(
    State(state): State<AppState<B>>,
    caller: Caller,
    Path(id): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let content = req.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("Message cannot be empty".to_string()));
    }

    let conversation = participant_conversation(&state, &caller, &id).await?;
    let message = state
        .backend()
        .chat()
        .send_message(&NewChatMessage {
            conversation_id: conversation.id,
            sender_id: caller.user.id.clone(),
            content: content.to_string(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}
