use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::error;
use mongodb::bson::serde_helpers::hex_string_as_object_id;
use serde::{Deserialize, Serialize};

use crate::ErrorResponse;
use crate::state::AppState;
use crate::conversation;

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

/// Upper bound on a message body, so the conversation preview document
/// stays small.
pub const MAX_TEXT_LEN: usize = 4096;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Id(#[serde(with = "hex_string_as_object_id")] pub String);

impl Id {
    pub fn random() -> Self {
        Self(mongodb::bson::oid::ObjectId::new().to_hex())
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Distinguishes user-authored text from system-generated notices in the
/// same log. Both count toward unread the same way.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Text,
    System,
}

impl Kind {
    pub const fn as_str(&self) -> &str {
        match self {
            Self::Text => "text",
            Self::System => "system",
        }
    }
}

pub fn api<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/messages", post(handler::create))
        .route("/messages", get(handler::find_all))
        .with_state(state)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("message not found: {0:?}")]
    NotFound(Option<Id>),
    #[error("message text is empty")]
    EmptyText,
    #[error("message text exceeds {} bytes", MAX_TEXT_LEN)]
    TextTooLong,
    #[error("cannot send a message to yourself")]
    SelfAddressed,
    #[error("could not store message")]
    NotCreated,

    /// The message is stored but the registry update failed. The log is
    /// authoritative, so a reconcile run brings the record back in line.
    #[error("message stored but conversation {0} was not updated")]
    OutOfSync(conversation::Id),
    /// Messages were flipped to seen but the counter reset failed.
    #[error("messages marked seen but conversation {0} counter was not reset")]
    CounterOutOfSync(conversation::Id),

    #[error(transparent)]
    _Conversation(#[from] conversation::Error),

    #[error(transparent)]
    _MongoDB(#[from] mongodb::error::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("{self}");

        let (status, message) = match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            Self::EmptyText | Self::TextTooLong | Self::SelfAddressed => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            Self::NotCreated => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),

            // Surfaced verbatim so callers can tell a partial write from a
            // plain failure and trigger reconciliation.
            Self::OutOfSync(_) | Self::CounterOutOfSync(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string())
            }

            Self::_Conversation(e) => return e.into_response(),

            Self::_MongoDB(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned(),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
