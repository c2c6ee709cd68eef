use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::error;

use crate::ErrorResponse;
use crate::state::AppState;

mod handler;
pub mod model;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

pub fn api<S>(state: AppState) -> Router<S> {
    Router::new()
        .route("/events", get(handler::notifications))
        .with_state(state)
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// No NATS configured: push delivery is off and clients should poll
    /// the unread summary instead.
    #[error("push delivery is not configured")]
    NotConfigured,

    #[error(transparent)]
    _Subscribe(#[from] async_nats::SubscribeError),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        error!("{self}");

        let (status, message) = match self {
            Self::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, self.to_string()),
            Self::_Subscribe(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_owned(),
            ),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
