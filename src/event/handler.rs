use std::convert::Infallible;

use axum::Extension;
use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use futures::StreamExt;
use log::error;

use crate::user::model::UserInfo;

use super::model::Subject;
use super::service::EventService;

/// Bridges the caller's notification subject onto an SSE stream. Returns
/// 503 when push delivery is not configured; polling remains available.
pub async fn notifications(
    Extension(user_info): Extension<UserInfo>,
    State(event_service): State<EventService>,
) -> crate::Result<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let mut notifications = event_service
        .read(&Subject::Notifications(&user_info.sub))
        .await?;

    let stream = async_stream::stream! {
        while let Some(noti) = notifications.next().await {
            let Some(noti) = noti else { continue };
            match Event::default().json_data(&noti) {
                Ok(event) => yield Ok(event),
                Err(e) => error!("could not serialize notification event: {e:?}"),
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
