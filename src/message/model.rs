use serde::{Deserialize, Serialize};

use crate::conversation;
use crate::user;
use crate::user::model::UserInfo;

use super::{Id, Kind};

/// One chat line. Immutable once stored except for `seen`, which only ever
/// transitions false to true. Sender and recipient names/roles are
/// write-time snapshots.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Message {
    #[serde(alias = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<Id>,
    conversation_id: conversation::Id,
    sender: user::Sub,
    recipient: user::Sub,
    sender_name: String,
    sender_role: user::Role,
    recipient_name: String,
    recipient_role: user::Role,
    text: String,
    kind: Kind,
    timestamp: i64,
    seen: bool,
}

impl Message {
    pub fn new(
        conversation_id: conversation::Id,
        sender: &UserInfo,
        recipient: &conversation::model::Participant,
        text: &str,
        kind: Kind,
    ) -> Self {
        Self {
            id: None,
            conversation_id,
            sender: sender.sub.clone(),
            recipient: recipient.sub().clone(),
            sender_name: sender.name.clone(),
            sender_role: sender.role.clone(),
            recipient_name: recipient.name().to_string(),
            recipient_role: recipient.role().clone(),
            text: text.to_string(),
            kind,
            timestamp: chrono::Utc::now().timestamp(),
            seen: false,
        }
    }

    pub fn with_id(&self, id: Id) -> Self {
        Self {
            id: Some(id),
            ..self.clone()
        }
    }

    pub const fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    pub const fn conversation_id(&self) -> &conversation::Id {
        &self.conversation_id
    }

    pub const fn sender(&self) -> &user::Sub {
        &self.sender
    }

    pub const fn recipient(&self) -> &user::Sub {
        &self.recipient
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn kind(&self) -> &Kind {
        &self.kind
    }

    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub const fn seen(&self) -> bool {
        self.seen
    }

    /// Preview of this message for the conversation record. None when the
    /// message has not been stored yet.
    pub fn preview(&self) -> Option<LastMessage> {
        self.id.clone().map(|id| {
            LastMessage::new(id, &self.text, self.sender.clone(), self.timestamp)
        })
    }
}

#[cfg(test)]
impl Message {
    pub(crate) fn stub(
        conversation_id: conversation::Id,
        sender: user::Sub,
        recipient: user::Sub,
        text: &str,
        kind: Kind,
        timestamp: i64,
    ) -> Self {
        Self {
            id: Some(Id::random()),
            conversation_id,
            sender_name: sender.to_string(),
            recipient_name: recipient.to_string(),
            sender,
            recipient,
            sender_role: user::Role::Student,
            recipient_role: user::Role::Owner,
            text: text.to_string(),
            kind,
            timestamp,
            seen: false,
        }
    }

    pub(crate) fn as_seen(self) -> Self {
        Self { seen: true, ..self }
    }
}

/// Preview stored on the conversation record: body, sender and timestamp
/// of the chronologically last message.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LastMessage {
    id: Id,
    text: String,
    owner: user::Sub,
    timestamp: i64,
}

impl LastMessage {
    pub fn new(id: Id, text: impl Into<String>, owner: user::Sub, timestamp: i64) -> Self {
        Self {
            id,
            text: text.into(),
            owner,
            timestamp,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn owner(&self) -> &user::Sub {
        &self.owner
    }

    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LastMessageDto {
    pub id: String,
    pub text: String,
    pub owner: user::Sub,
    pub timestamp: i64,
}

impl From<LastMessage> for LastMessageDto {
    fn from(m: LastMessage) -> Self {
        Self {
            id: m.id.0,
            text: m.text,
            owner: m.owner,
            timestamp: m.timestamp,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct MessageDto {
    pub id: String,
    pub conversation_id: conversation::Id,
    pub sender: user::Sub,
    pub recipient: user::Sub,
    pub sender_name: String,
    pub sender_role: user::Role,
    pub text: String,
    pub kind: Kind,
    pub timestamp: i64,
    pub seen: bool,
}

impl From<Message> for MessageDto {
    fn from(message: Message) -> Self {
        Self {
            id: message.id.map(|id| id.0).expect("stored message has an id"),
            conversation_id: message.conversation_id,
            sender: message.sender,
            recipient: message.recipient,
            sender_name: message.sender_name,
            sender_role: message.sender_role,
            text: message.text,
            kind: message.kind,
            timestamp: message.timestamp,
            seen: message.seen,
        }
    }
}
