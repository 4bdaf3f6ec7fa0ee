use anyhow::Result;
use mongodb::bson::oid::ObjectId;
use std::collections::HashSet;
use std::sync::Arc;

use crate::engine;
use crate::metrics::{BOOKMARKS_RESOLVED_TOTAL, BOOKMARK_TOGGLES_TOTAL};
use crate::models::{BookmarkAction, ResolvedBookmark};
use crate::services::{quiz_store::QuizStore, user_store::UserStore};

pub struct BookmarkService {
    quizzes: Arc<dyn QuizStore>,
    users: Arc<dyn UserStore>,
}

impl BookmarkService {
    pub fn new(quizzes: Arc<dyn QuizStore>, users: Arc<dyn UserStore>) -> Self {
        Self { quizzes, users }
    }

    /// Returns `None` when the user does not exist.
    pub async fn toggle(
        &self,
        user_id: ObjectId,
        question_id: ObjectId,
    ) -> Result<Option<BookmarkAction>> {
        let action = self.users.toggle_bookmark(user_id, question_id).await?;

        if let Some(action) = action {
            BOOKMARK_TOGGLES_TOTAL
                .with_label_values(&[action.as_str()])
                .inc();
            tracing::info!(
                "Bookmark {} for user {}: question {}",
                action.as_str(),
                user_id,
                question_id
            );
        }

        Ok(action)
    }

    /// Bookmarked questions with quiz and case context. Returns `None` when
    /// the user does not exist; stale ids are skipped.
    pub async fn list(&self, user_id: ObjectId) -> Result<Option<Vec<ResolvedBookmark>>> {
        let Some(bookmarked) = self.users.bookmarked_questions(user_id).await? else {
            return Ok(None);
        };

        let ids: HashSet<ObjectId> = bookmarked.into_iter().collect();
        let lookup: Vec<ObjectId> = ids.iter().copied().collect();
        let quizzes = self.quizzes.find_containing_questions(&lookup).await?;

        let resolved = engine::resolve_bookmarks(&quizzes, &ids);
        if resolved.len() < ids.len() {
            tracing::debug!(
                "User {} has {} bookmarks that no longer resolve",
                user_id,
                ids.len() - resolved.len()
            );
        }
        BOOKMARKS_RESOLVED_TOTAL.inc_by(resolved.len() as u64);

        Ok(Some(resolved))
    }
}
