use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::service::AuthService;

/// Validates the bearer token and stores the caller's [UserInfo] as a
/// request extension. Rejected requests never reach a handler, so no
/// write can happen on behalf of an unauthenticated caller.
///
/// [UserInfo]: crate::user::model::UserInfo
pub async fn authenticate(
    auth_service: State<AuthService>,
    mut req: Request,
    next: Next,
) -> crate::Result<Response> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or(super::Error::Unauthenticated)?;

    let user_info = auth_service.validate(token)?;
    req.extensions_mut().insert(user_info);

    Ok(next.run(req).await)
}
