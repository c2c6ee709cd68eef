use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::debug;
use serde::Deserialize;

use crate::ErrorResponse;
use crate::user;

pub mod middleware;
pub mod service;

type Result<T> = std::result::Result<T, Error>;

#[derive(Deserialize, Clone)]
struct TokenClaims {
    sub: user::Sub,
    name: String,
    role: user::Role,
    #[allow(dead_code)]
    exp: usize,
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing or invalid authorization header")]
    Unauthenticated,

    #[error(transparent)]
    _JsonWebtoken(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        debug!("{self}");

        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse::new("authentication required")),
        )
            .into_response()
    }
}
