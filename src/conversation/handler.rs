use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::message::service::MessageService;
use crate::user;
use crate::user::model::UserInfo;

use super::Id;
use super::model::{ConversationDto, Participant, UnreadSummary};
use super::service::ConversationService;

#[derive(Deserialize)]
pub struct CreateParams {
    recipient: user::Sub,
    recipient_name: String,
    recipient_role: user::Role,
}

pub async fn create(
    Extension(user_info): Extension<UserInfo>,
    State(conversation_service): State<ConversationService>,
    Json(params): Json<CreateParams>,
) -> crate::Result<Json<ConversationDto>> {
    let other = Participant::new(params.recipient, params.recipient_name, params.recipient_role);
    let conversation = conversation_service.get_or_create(&user_info, other).await?;

    Ok(Json(conversation.into()))
}

pub async fn find_all(
    Extension(user_info): Extension<UserInfo>,
    State(conversation_service): State<ConversationService>,
) -> crate::Result<Json<Vec<ConversationDto>>> {
    let conversations = conversation_service.find_all(&user_info.sub).await?;

    Ok(Json(conversations))
}

pub async fn unread_summary(
    Extension(user_info): Extension<UserInfo>,
    State(conversation_service): State<ConversationService>,
) -> crate::Result<Json<UnreadSummary>> {
    let unread = conversation_service.unread_summary(&user_info.sub).await?;

    Ok(Json(UnreadSummary { unread }))
}

#[derive(Serialize)]
pub struct ReadReceipt {
    success: bool,
    updated: u64,
}

pub async fn mark_read(
    Extension(user_info): Extension<UserInfo>,
    Path(id): Path<Id>,
    State(message_service): State<MessageService>,
) -> crate::Result<Json<ReadReceipt>> {
    let updated = message_service
        .mark_conversation_read(&user_info, &id)
        .await?;

    Ok(Json(ReadReceipt {
        success: true,
        updated,
    }))
}

pub async fn reconcile(
    Extension(user_info): Extension<UserInfo>,
    Path(id): Path<Id>,
    State(conversation_service): State<ConversationService>,
) -> crate::Result<Json<ConversationDto>> {
    if user_info.role != user::Role::Admin {
        return Err(super::Error::Forbidden.into());
    }

    let conversation = conversation_service.reconcile(&id).await?;

    Ok(Json(conversation.into()))
}
