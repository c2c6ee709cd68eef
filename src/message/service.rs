use std::sync::Arc;

use log::error;

use crate::conversation;
use crate::conversation::service::ConversationService;
use crate::user;
use crate::user::model::UserInfo;

use super::model::{LastMessage, Message, MessageDto};
use super::repository::MessageRepository;
use super::{Kind, MAX_TEXT_LEN};

const DEFAULT_PAGE_SIZE: i64 = 50;

#[derive(Clone)]
pub struct MessageService {
    repo: Arc<MessageRepository>,
    conversation_service: ConversationService,
}

impl MessageService {
    pub fn new(repo: MessageRepository, conversation_service: ConversationService) -> Self {
        Self {
            repo: Arc::new(repo),
            conversation_service,
        }
    }
}

impl MessageService {
    /// Appends to the log, then folds the message into the conversation
    /// record. The store has no cross-document transactions: when the
    /// registry update fails the stored message stays in place and the
    /// error names the conversation so a reconcile run can repair it.
    pub async fn create(
        &self,
        logged_user: &UserInfo,
        conversation_id: &conversation::Id,
        recipient: &user::Sub,
        text: &str,
        kind: Kind,
    ) -> super::Result<MessageDto> {
        let text = text.trim();
        if text.is_empty() {
            return Err(super::Error::EmptyText);
        }
        if text.len() > MAX_TEXT_LEN {
            return Err(super::Error::TextTooLong);
        }
        if logged_user.sub == *recipient {
            return Err(super::Error::SelfAddressed);
        }
        if !recipient.is_well_formed() {
            return Err(conversation::Error::MalformedSub(recipient.clone()).into());
        }

        let conversation = self.conversation_service.find_by_id(conversation_id).await?;
        if !conversation.is_participant(&logged_user.sub) {
            return Err(conversation::Error::NotParticipant.into());
        }
        let recipient = conversation
            .participant(recipient)
            .ok_or(conversation::Error::NotParticipant)?;

        let msg = Message::new(
            conversation_id.clone(),
            logged_user,
            recipient,
            text,
            kind,
        );

        let id = self
            .repo
            .insert(&msg)
            .await?
            .ok_or(super::Error::NotCreated)?;
        let msg = msg.with_id(id.clone());
        let preview = LastMessage::new(id, text, logged_user.sub.clone(), msg.timestamp());

        if let Err(e) = self
            .conversation_service
            .record_new_message(conversation_id, &msg, &preview)
            .await
        {
            error!("conversation update failed after message insert: {e:?}");
            return Err(super::Error::OutOfSync(conversation_id.to_owned()));
        }

        Ok(MessageDto::from(msg))
    }

    pub async fn find_by_conversation(
        &self,
        logged_sub: &user::Sub,
        conversation_id: &conversation::Id,
        skip: Option<u64>,
        limit: Option<i64>,
    ) -> super::Result<Vec<MessageDto>> {
        self.conversation_service
            .check_participant(conversation_id, logged_sub)
            .await?;

        let messages = self
            .repo
            .find_by_conversation(
                conversation_id,
                skip.unwrap_or(0),
                limit.unwrap_or(DEFAULT_PAGE_SIZE),
            )
            .await?;

        Ok(messages.into_iter().map(MessageDto::from).collect())
    }

    /// Flips `seen` on everything addressed to the caller, then resets
    /// their unread counter. Partial application is surfaced the same way
    /// as in [Self::create].
    pub async fn mark_conversation_read(
        &self,
        logged_user: &UserInfo,
        conversation_id: &conversation::Id,
    ) -> super::Result<u64> {
        self.conversation_service
            .check_participant(conversation_id, &logged_user.sub)
            .await?;

        let flipped = self.repo.mark_seen(conversation_id, &logged_user.sub).await?;

        if let Err(e) = self
            .conversation_service
            .mark_read(conversation_id, &logged_user.sub)
            .await
        {
            error!("unread counter reset failed after marking messages seen: {e:?}");
            return Err(super::Error::CounterOutOfSync(conversation_id.to_owned()));
        }

        Ok(flipped)
    }
}
