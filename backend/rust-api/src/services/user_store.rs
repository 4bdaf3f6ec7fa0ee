use anyhow::{Context, Result};
use async_trait::async_trait;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::Database;

use crate::metrics::track_db_operation;
use crate::models::{BookmarkAction, UserBookmarks};
use crate::utils::retry::{retry_async_with_config, RetryConfig};

const USERS_COLLECTION: &str = "users";

/// Bookmark list persisted on the user document.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// `None` when the user does not exist.
    async fn bookmarked_questions(&self, user_id: ObjectId) -> Result<Option<Vec<ObjectId>>>;

    /// Removes `question_id` if present, adds it otherwise. `None` when the
    /// user does not exist. The stored list never holds duplicates.
    async fn toggle_bookmark(
        &self,
        user_id: ObjectId,
        question_id: ObjectId,
    ) -> Result<Option<BookmarkAction>>;
}

pub struct MongoUserStore {
    mongo: Database,
}

impl MongoUserStore {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn bookmarked_questions(&self, user_id: ObjectId) -> Result<Option<Vec<ObjectId>>> {
        let users = self.mongo.collection::<UserBookmarks>(USERS_COLLECTION);

        let user = track_db_operation("find_bookmarks", USERS_COLLECTION, async {
            retry_async_with_config(RetryConfig::default(), || async {
                users
                    .find_one(doc! { "_id": user_id })
                    .projection(doc! { "bookmarkedQuestions": 1 })
                    .await
                    .context("Failed to query user bookmarks")
            })
            .await
        })
        .await?;

        Ok(user.map(|user| user.bookmarked_questions))
    }

    async fn toggle_bookmark(
        &self,
        user_id: ObjectId,
        question_id: ObjectId,
    ) -> Result<Option<BookmarkAction>> {
        let users = self.mongo.collection::<UserBookmarks>(USERS_COLLECTION);

        // Pull only matches when the id is already bookmarked.
        let pulled = track_db_operation("pull_bookmark", USERS_COLLECTION, async {
            users
                .update_one(
                    doc! { "_id": user_id, "bookmarkedQuestions": question_id },
                    doc! { "$pull": { "bookmarkedQuestions": question_id } },
                )
                .await
                .context("Failed to remove bookmark")
        })
        .await?;

        if pulled.modified_count > 0 {
            return Ok(Some(BookmarkAction::Removed));
        }

        let added = track_db_operation("add_bookmark", USERS_COLLECTION, async {
            users
                .update_one(
                    doc! { "_id": user_id },
                    doc! { "$addToSet": { "bookmarkedQuestions": question_id } },
                )
                .await
                .context("Failed to add bookmark")
        })
        .await?;

        if added.matched_count == 0 {
            return Ok(None);
        }

        Ok(Some(BookmarkAction::Added))
    }
}
