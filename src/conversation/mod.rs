use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use log::error;
use serde::{Deserialize, Serialize};

use crate::ErrorResponse;
use crate::state::AppState;
use crate::user;

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

/// Canonical id of the thread between two users: both subs sorted
/// lexicographically and joined with an underscore, so either direction
/// of a pair resolves to the same record without a lookup.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct Id(pub String);

impl Id {
    pub fn between(a: &user::Sub, b: &user::Sub) -> Self {
        let (lo, hi) = if a.0 <= b.0 { (a, b) } else { (b, a) };
        Self(format!("{lo}_{hi}"))
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn api<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/conversations", post(handler::create))
        .route("/conversations", get(handler::find_all))
        .route("/conversations/unread", get(handler::unread_summary))
        .route("/conversations/{id}/read", put(handler::mark_read))
        .route("/conversations/{id}/reconcile", post(handler::reconcile))
        .with_state(state)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("conversation not found: {0:?}")]
    NotFound(Option<Id>),
    #[error("user is not a participant of the conversation")]
    NotParticipant,
    #[error("cannot start a conversation with yourself")]
    SelfConversation,
    #[error("malformed participant id: {0}")]
    MalformedSub(user::Sub),
    #[error("admin role required")]
    Forbidden,

    #[error(transparent)]
    _Bson(#[from] mongodb::bson::ser::Error),

    #[error(transparent)]
    _MongoDB(#[from] mongodb::error::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("{self}");

        let (status, message) = match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::NotParticipant | Self::SelfConversation | Self::MalformedSub(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),

            Self::_Bson(_) | Self::_MongoDB(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned(),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
