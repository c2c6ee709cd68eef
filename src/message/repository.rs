use futures::stream::TryStreamExt;
use mongodb::bson::doc;

use crate::conversation;
use crate::user;

use super::Id;
use super::model::Message;

const MESSAGES_COLLECTION: &str = "messages";

type Result<T> = std::result::Result<T, mongodb::error::Error>;

#[derive(Clone)]
pub struct MessageRepository {
    col: mongodb::Collection<Message>,
}

impl MessageRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            col: db.collection(MESSAGES_COLLECTION),
        }
    }
}

impl MessageRepository {
    pub async fn insert(&self, message: &Message) -> Result<Option<Id>> {
        self.col
            .insert_one(message)
            .await
            .map(|r| r.inserted_id.as_object_id().map(|oid| Id(oid.to_hex())))
    }

    /// Ascending by server timestamp, ObjectId as the tie-breaker, so a
    /// page re-queried with the same bounds reproduces the same result
    /// set absent new messages.
    pub async fn find_by_conversation(
        &self,
        id: &conversation::Id,
        skip: u64,
        limit: i64,
    ) -> Result<Vec<Message>> {
        let cursor = self
            .col
            .find(doc! { "conversation_id": id })
            .sort(doc! { "timestamp": 1, "_id": 1 })
            .skip(skip)
            .limit(limit)
            .await?;

        cursor.try_collect().await
    }

    /// The full log, for reconciliation.
    pub async fn find_all_by_conversation(&self, id: &conversation::Id) -> Result<Vec<Message>> {
        let cursor = self
            .col
            .find(doc! { "conversation_id": id })
            .sort(doc! { "timestamp": 1, "_id": 1 })
            .await?;

        cursor.try_collect().await
    }

    /// Flips `seen` on every unseen message addressed to the reader.
    /// Returns how many were flipped; zero is a valid outcome.
    pub async fn mark_seen(&self, id: &conversation::Id, reader: &user::Sub) -> Result<u64> {
        self.col
            .update_many(
                doc! {
                    "conversation_id": id,
                    "recipient": reader,
                    "seen": false,
                },
                doc! { "$set": { "seen": true } },
            )
            .await
            .map(|r| r.modified_count)
    }
}
