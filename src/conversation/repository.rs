use std::collections::HashMap;

use futures::stream::TryStreamExt;
use mongodb::bson::{Document, doc, to_bson, to_document};

use crate::message::model::LastMessage;
use crate::user;

use super::Id;
use super::model::Conversation;

const CONVERSATIONS_COLLECTION: &str = "conversations";

#[derive(Clone)]
pub struct ConversationRepository {
    col: mongodb::Collection<Conversation>,
}

impl ConversationRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            col: db.collection(CONVERSATIONS_COLLECTION),
        }
    }
}

impl ConversationRepository {
    /// Upsert keyed on the canonical pair id. Two near-simultaneous first
    /// contacts between the same pair race on the same `_id`, so the loser
    /// becomes a no-op and reads the winner's document back.
    pub async fn get_or_create(&self, conversation: &Conversation) -> super::Result<Conversation> {
        let id = conversation.id();

        let mut on_insert = to_document(conversation)?;
        on_insert.remove("_id");

        self.col
            .update_one(doc! { "_id": id }, doc! { "$setOnInsert": on_insert })
            .upsert(true)
            .await?;

        self.find_by_id(id).await
    }

    pub async fn find_by_id(&self, id: &Id) -> super::Result<Conversation> {
        self.col
            .find_one(doc! { "_id": id })
            .await?
            .ok_or(super::Error::NotFound(Some(id.to_owned())))
    }

    pub async fn find_by_sub(&self, sub: &user::Sub) -> super::Result<Vec<Conversation>> {
        let cursor = self
            .col
            .find(doc! { "participants.sub": sub })
            .sort(doc! { "last_message.timestamp": -1 })
            .await?;

        let conversations = cursor.try_collect::<Vec<Conversation>>().await?;

        Ok(conversations)
    }
}

impl ConversationRepository {
    /// Folds a freshly appended message into the record with a single
    /// atomic update: new preview, sender counter to zero, recipient
    /// counter up by one. `$inc` commutes, so concurrent sends into the
    /// same conversation cannot lose an increment.
    pub async fn record_new_message(
        &self,
        id: &Id,
        last_message: &LastMessage,
        sender: &user::Sub,
        recipient: &user::Sub,
    ) -> super::Result<()> {
        let mut set = Document::new();
        set.insert("last_message", to_bson(last_message)?);
        set.insert(format!("unread_counts.{sender}"), 0_i64);

        let mut inc = Document::new();
        inc.insert(format!("unread_counts.{recipient}"), 1_i64);

        let result = self
            .col
            .update_one(doc! { "_id": id }, doc! { "$set": set, "$inc": inc })
            .await?;

        if result.matched_count == 0 {
            return Err(super::Error::NotFound(Some(id.to_owned())));
        }

        Ok(())
    }

    /// Resets the reader's counter. Already-zero counters stay zero, so
    /// repeated calls are no-ops rather than errors.
    pub async fn mark_read(&self, id: &Id, reader: &user::Sub) -> super::Result<()> {
        let mut set = Document::new();
        set.insert(format!("unread_counts.{reader}"), 0_i64);

        let result = self
            .col
            .update_one(doc! { "_id": id }, doc! { "$set": set })
            .await?;

        if result.matched_count == 0 {
            return Err(super::Error::NotFound(Some(id.to_owned())));
        }

        Ok(())
    }

    /// Overwrites the derived fields wholesale. Used by reconciliation,
    /// which recomputes them from the message log.
    pub async fn set_derived(
        &self,
        id: &Id,
        last_message: Option<&LastMessage>,
        unread_counts: &HashMap<String, i64>,
    ) -> super::Result<()> {
        let result = self
            .col
            .update_one(
                doc! { "_id": id },
                doc! { "$set": {
                    "last_message": to_bson(&last_message)?,
                    "unread_counts": to_bson(unread_counts)?,
                }},
            )
            .await?;

        if result.matched_count == 0 {
            return Err(super::Error::NotFound(Some(id.to_owned())));
        }

        Ok(())
    }
}
