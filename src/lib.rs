pub mod auth;
pub mod conversation;
pub mod event;
pub mod integration;
pub mod message;
pub mod state;
pub mod user;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    _Auth(#[from] auth::Error),
    _Conversation(#[from] conversation::Error),
    _Message(#[from] message::Error),
    _Event(#[from] event::Error),

    #[error("missing required query parameter: {0}")]
    QueryParamRequired(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Self::_Auth(e) => e.into_response(),
            Self::_Conversation(e) => e.into_response(),
            Self::_Message(e) => e.into_response(),
            Self::_Event(e) => e.into_response(),
            Self::QueryParamRequired(_) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(self.to_string())),
            )
                .into_response(),
        }
    }
}

/// Wire shape of every failure: a success flag and a human-readable message.
#[derive(Serialize)]
pub struct ErrorResponse {
    success: bool,
    message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}
