use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Bookmark-relevant projection of a document in the "users" collection.
/// Credentials and profile fields belong to the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserBookmarks {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub bookmarked_questions: Vec<ObjectId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkAction {
    Added,
    Removed,
}

impl BookmarkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkAction::Added => "added",
            BookmarkAction::Removed => "removed",
        }
    }

    pub fn is_bookmarked(&self) -> bool {
        matches!(self, BookmarkAction::Added)
    }
}

#[derive(Debug, Serialize)]
pub struct BookmarkToggleResponse {
    pub msg: String,
    pub bookmarked: bool,
}

impl From<BookmarkAction> for BookmarkToggleResponse {
    fn from(action: BookmarkAction) -> Self {
        let msg = match action {
            BookmarkAction::Added => "Question bookmarked",
            BookmarkAction::Removed => "Bookmark removed",
        };
        Self {
            msg: msg.to_string(),
            bookmarked: action.is_bookmarked(),
        }
    }
}
