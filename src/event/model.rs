use std::fmt;
use std::pin::Pin;

use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::conversation;
use crate::message::model::LastMessageDto;
use crate::user;

/// One notification channel per user.
pub enum Subject<'a> {
    Notifications(&'a user::Sub),
}

impl fmt::Display for Subject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Notifications(sub) => write!(f, "noti.{sub}"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    NewMessage {
        conversation_id: conversation::Id,
        last_message: LastMessageDto,
    },
}

pub type NotificationStream = Pin<Box<dyn Stream<Item = Option<Notification>> + Send>>;
