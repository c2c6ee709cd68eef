use futures::StreamExt;
use log::{debug, error};

use super::model::{Notification, NotificationStream, Subject};

/// Best-effort push channel over NATS. When no NATS is configured every
/// publish is a logged no-op and clients fall back to polling the unread
/// summary; the two delivery strategies are interchangeable from the
/// registry's point of view.
#[derive(Clone)]
pub struct EventService {
    pubsub: Option<async_nats::Client>,
}

impl EventService {
    pub fn new(pubsub: Option<async_nats::Client>) -> Self {
        Self { pubsub }
    }
}

impl EventService {
    pub async fn publish(&self, subject: &Subject<'_>, noti: &Notification) {
        let Some(client) = &self.pubsub else {
            debug!("push channel not configured, skipping notification for {subject}");
            return;
        };

        if let Err(e) = client.publish(subject, noti.clone().into()).await {
            error!("could not publish notification: {e:?}");
        }
    }

    pub async fn read(&self, subject: &Subject<'_>) -> super::Result<NotificationStream> {
        let client = self.pubsub.as_ref().ok_or(super::Error::NotConfigured)?;

        let subscriber = client.subscribe(subject).await?;

        let stream = subscriber.map(|msg| {
            match serde_json::from_slice::<Notification>(&msg.payload) {
                Ok(noti) => Some(noti),
                Err(e) => {
                    error!("could not deserialize notification: {e:?}");
                    None
                }
            }
        });

        Ok(Box::pin(stream))
    }
}
