use std::collections::HashMap;
use std::sync::Arc;

use crate::event;
use crate::event::service::EventService;
use crate::message::model::{LastMessage, Message};
use crate::message::repository::MessageRepository;
use crate::user;
use crate::user::model::UserInfo;

use super::Id;
use super::model::{Conversation, ConversationDto, Participant, UnreadEntry};
use super::repository::ConversationRepository;

#[derive(Clone)]
pub struct ConversationService {
    repo: Arc<ConversationRepository>,
    message_repo: Arc<MessageRepository>,
    event_service: EventService,
}

impl ConversationService {
    pub fn new(
        repo: ConversationRepository,
        message_repo: MessageRepository,
        event_service: EventService,
    ) -> Self {
        Self {
            repo: Arc::new(repo),
            message_repo: Arc::new(message_repo),
            event_service,
        }
    }
}

impl ConversationService {
    pub async fn get_or_create(
        &self,
        logged_user: &UserInfo,
        other: Participant,
    ) -> super::Result<Conversation> {
        if logged_user.sub == *other.sub() {
            return Err(super::Error::SelfConversation);
        }
        for sub in [&logged_user.sub, other.sub()] {
            if !sub.is_well_formed() {
                return Err(super::Error::MalformedSub(sub.clone()));
            }
        }

        let me = Participant::new(
            logged_user.sub.clone(),
            logged_user.name.clone(),
            logged_user.role.clone(),
        );

        self.repo.get_or_create(&Conversation::new(me, other)).await
    }

    pub async fn find_by_id(&self, id: &Id) -> super::Result<Conversation> {
        self.repo.find_by_id(id).await
    }

    pub async fn find_all(&self, sub: &user::Sub) -> super::Result<Vec<ConversationDto>> {
        let conversations = self.repo.find_by_sub(sub).await?;

        Ok(conversations.into_iter().map(ConversationDto::from).collect())
    }

    /// Badge counts: one entry per conversation the user participates in.
    pub async fn unread_summary(&self, sub: &user::Sub) -> super::Result<Vec<UnreadEntry>> {
        let conversations = self.repo.find_by_sub(sub).await?;

        Ok(conversations
            .iter()
            .map(|c| UnreadEntry::new(c.id().clone(), c.unread_for(sub)))
            .collect())
    }

    pub async fn check_participant(&self, id: &Id, sub: &user::Sub) -> super::Result<()> {
        let conversation = self.repo.find_by_id(id).await?;

        if !conversation.is_participant(sub) {
            return Err(super::Error::NotParticipant);
        }

        Ok(())
    }
}

impl ConversationService {
    /// Applies a freshly stored message to the registry record and pushes
    /// a notification to the recipient. The push is best effort: polling
    /// the unread summary remains the fallback delivery path.
    pub async fn record_new_message(
        &self,
        id: &Id,
        message: &Message,
        preview: &LastMessage,
    ) -> super::Result<()> {
        self.repo
            .record_new_message(id, preview, message.sender(), message.recipient())
            .await?;

        self.event_service
            .publish(
                &event::model::Subject::Notifications(message.recipient()),
                &event::model::Notification::NewMessage {
                    conversation_id: id.clone(),
                    last_message: preview.clone().into(),
                },
            )
            .await;

        Ok(())
    }

    pub async fn mark_read(&self, id: &Id, reader: &user::Sub) -> super::Result<()> {
        self.repo.mark_read(id, reader).await
    }
}

impl ConversationService {
    /// Rebuilds `last_message` and `unread_counts` from the authoritative
    /// message log, repairing any drift left behind by a partial failure.
    /// Safe to run any number of times.
    pub async fn reconcile(&self, id: &Id) -> super::Result<Conversation> {
        let conversation = self.repo.find_by_id(id).await?;
        let messages = self.message_repo.find_all_by_conversation(id).await?;

        let (last_message, unread_counts) = replay(conversation.participants(), &messages);
        self.repo
            .set_derived(id, last_message.as_ref(), &unread_counts)
            .await?;

        self.repo.find_by_id(id).await
    }
}

/// Recomputes the derived conversation fields from the full message log:
/// the chronologically last message wins the preview, and each participant
/// is owed one unread per unseen message addressed to them.
fn replay(
    participants: &[Participant; 2],
    messages: &[Message],
) -> (Option<LastMessage>, HashMap<String, i64>) {
    let mut unread_counts = HashMap::from([
        (participants[0].sub().to_string(), 0),
        (participants[1].sub().to_string(), 0),
    ]);

    for message in messages {
        if !message.seen() {
            *unread_counts
                .entry(message.recipient().to_string())
                .or_insert(0) += 1;
        }
    }

    let last_message = messages
        .iter()
        .max_by_key(|m| m.timestamp())
        .and_then(Message::preview);

    (last_message, unread_counts)
}

#[cfg(test)]
mod tests {
    use crate::message::Kind;
    use crate::user::{Role, Sub};

    use super::*;

    fn participants() -> [Participant; 2] {
        [
            Participant::new(Sub("a1".into()), "Ali", Role::Student),
            Participant::new(Sub("b2".into()), "Bilal", Role::Owner),
        ]
    }

    fn message(from: &str, to: &str, text: &str, timestamp: i64, seen: bool) -> Message {
        let msg = Message::stub(
            Id(format!("{from}_{to}")),
            Sub(from.into()),
            Sub(to.into()),
            text,
            Kind::Text,
            timestamp,
        );
        if seen { msg.as_seen() } else { msg }
    }

    #[test]
    fn replay_of_empty_log_yields_zero_counters_and_no_preview() {
        let (last, counts) = replay(&participants(), &[]);

        assert!(last.is_none());
        assert_eq!(counts["a1"], 0);
        assert_eq!(counts["b2"], 0);
    }

    #[test]
    fn replay_counts_unseen_per_recipient() {
        // 2 to b2 (one already read), 1 to a1.
        let messages = vec![
            message("a1", "b2", "salam", 100, true),
            message("b2", "a1", "walaikum", 110, false),
            message("a1", "b2", "room available?", 120, false),
        ];

        let (last, counts) = replay(&participants(), &messages);

        assert_eq!(counts["b2"], 1);
        assert_eq!(counts["a1"], 1);
        assert_eq!(last.unwrap().text(), "room available?");
    }

    #[test]
    fn replay_preview_is_chronologically_last_regardless_of_slice_order() {
        let messages = vec![
            message("a1", "b2", "second", 200, false),
            message("b2", "a1", "first", 100, false),
        ];

        let (last, _) = replay(&participants(), &messages);

        assert_eq!(last.unwrap().text(), "second");
    }

    #[test]
    fn replay_is_idempotent() {
        let messages = vec![
            message("a1", "b2", "salam", 100, false),
            message("a1", "b2", "hello?", 110, false),
        ];

        let first = replay(&participants(), &messages);
        let second = replay(&participants(), &messages);

        assert_eq!(first.1, second.1);
        assert_eq!(
            first.0.as_ref().map(LastMessage::text),
            second.0.as_ref().map(LastMessage::text)
        );
    }
}
