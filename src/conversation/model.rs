use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::message::model::{LastMessage, LastMessageDto};
use crate::user;

use super::Id;

/// Write-time snapshot of one side of a conversation. Name and role are a
/// denormalized cache with no freshness guarantee, never a live reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Participant {
    sub: user::Sub,
    name: String,
    role: user::Role,
}

impl Participant {
    pub fn new(sub: user::Sub, name: impl Into<String>, role: user::Role) -> Self {
        Self {
            sub,
            name: name.into(),
            role,
        }
    }

    pub const fn sub(&self) -> &user::Sub {
        &self.sub
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn role(&self) -> &user::Role {
        &self.role
    }
}

/// One record per unordered participant pair, keyed by the canonical
/// pair id. `unread_counts` is keyed by participant sub.
#[derive(Clone, Serialize, Deserialize)]
pub struct Conversation {
    #[serde(rename = "_id")]
    id: Id,
    participants: [Participant; 2],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_message: Option<LastMessage>,
    unread_counts: HashMap<String, i64>,
    created_at: i64,
}

impl Conversation {
    pub fn new(a: Participant, b: Participant) -> Self {
        let id = Id::between(a.sub(), b.sub());
        let unread_counts =
            HashMap::from([(a.sub().to_string(), 0), (b.sub().to_string(), 0)]);
        let participants = if a.sub().0 <= b.sub().0 { [a, b] } else { [b, a] };

        Self {
            id,
            participants,
            last_message: None,
            unread_counts,
            created_at: chrono::Utc::now().timestamp(),
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn participants(&self) -> &[Participant; 2] {
        &self.participants
    }

    pub const fn last_message(&self) -> Option<&LastMessage> {
        self.last_message.as_ref()
    }

    pub fn participant(&self, sub: &user::Sub) -> Option<&Participant> {
        self.participants.iter().find(|p| p.sub() == sub)
    }

    pub fn is_participant(&self, sub: &user::Sub) -> bool {
        self.participant(sub).is_some()
    }

    pub fn unread_for(&self, sub: &user::Sub) -> i64 {
        self.unread_counts.get(&sub.to_string()).copied().unwrap_or(0)
    }
}

#[derive(Clone, Serialize, Debug)]
pub struct ConversationDto {
    pub id: String,
    pub participants: [Participant; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<LastMessageDto>,
    pub unread_counts: HashMap<String, i64>,
}

impl From<Conversation> for ConversationDto {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id.0,
            participants: c.participants,
            last_message: c.last_message.map(LastMessageDto::from),
            unread_counts: c.unread_counts,
        }
    }
}

/// One badge-count entry of the unread summary.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct UnreadEntry {
    #[serde(rename = "conversationId")]
    pub conversation_id: Id,
    #[serde(rename = "unreadCount")]
    pub unread_count: i64,
}

impl UnreadEntry {
    pub fn new(conversation_id: Id, unread_count: i64) -> Self {
        Self {
            conversation_id,
            unread_count,
        }
    }
}

#[derive(Serialize)]
pub struct UnreadSummary {
    pub unread: Vec<UnreadEntry>,
}
