use axum::extract::State;
use axum::{Extension, Json};
use axum_extra::extract::Query;
use serde::Deserialize;

use crate::conversation;
use crate::user;
use crate::user::model::UserInfo;

use super::Kind;
use super::model::MessageDto;
use super::service::MessageService;

#[derive(Deserialize)]
pub struct CreateParams {
    conversation_id: conversation::Id,
    recipient: user::Sub,
    text: String,
    kind: Option<Kind>,
}

pub async fn create(
    Extension(user_info): Extension<UserInfo>,
    State(message_service): State<MessageService>,
    Json(params): Json<CreateParams>,
) -> crate::Result<Json<MessageDto>> {
    let msg = message_service
        .create(
            &user_info,
            &params.conversation_id,
            &params.recipient,
            &params.text,
            params.kind.unwrap_or(Kind::Text),
        )
        .await?;

    Ok(Json(msg))
}

#[derive(Deserialize)]
pub struct FindAllParams {
    conversation_id: Option<conversation::Id>,
    skip: Option<u64>,
    limit: Option<i64>,
}

pub async fn find_all(
    Extension(user_info): Extension<UserInfo>,
    Query(params): Query<FindAllParams>,
    State(message_service): State<MessageService>,
) -> crate::Result<Json<Vec<MessageDto>>> {
    let conversation_id = params
        .conversation_id
        .ok_or(crate::Error::QueryParamRequired("conversation_id".to_owned()))?;

    let messages = message_service
        .find_by_conversation(&user_info.sub, &conversation_id, params.skip, params.limit)
        .await?;

    Ok(Json(messages))
}
