use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use validator::Validate;

use super::quiz::{AnswerOption, Difficulty, QuestionType};

/// Flat, self-contained view of one question, produced by the flattener.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AtomicQuestion {
    #[serde(rename = "_id", serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    pub question_text: String,
    pub question_type: QuestionType,
    pub options: Vec<AnswerOption>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_explanation: Option<String>,
    /// Present only when the question is a child of a case group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_stem: Option<String>,
    #[serde(serialize_with = "serialize_object_id")]
    pub quiz_id: ObjectId,
    pub quiz_title: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TagFilterMode {
    #[default]
    Any,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagFilter {
    pub tags: HashSet<String>,
    pub mode: TagFilterMode,
}

impl TagFilter {
    pub fn new<I, S>(tags: I, mode: TagFilterMode) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tags: tags.into_iter().map(Into::into).collect(),
            mode,
        }
    }
}

/// Validated input of the session composer.
#[derive(Debug, Clone, Default)]
pub struct SessionCriteria {
    pub tag_filter: Option<TagFilter>,
    pub difficulties: Option<HashSet<Difficulty>>,
    pub number_of_questions: usize,
}

/// Body of `POST /api/study/session`
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudySessionRequest {
    #[serde(default)]
    #[validate(length(max = 50, message = "At most 50 tags can be requested"))]
    pub tags: Vec<String>,
    #[serde(default)]
    pub difficulties: Vec<String>,
    #[validate(range(min = 0, message = "numberOfQuestions must not be negative"))]
    pub number_of_questions: Option<i64>,
    #[serde(default)]
    pub tag_filter_mode: TagFilterMode,
}

/// Virtual quiz assembled on demand; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct StudySession {
    pub title: String,
    pub description: String,
    pub questions: Vec<AtomicQuestion>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedBookmark {
    #[serde(serialize_with = "serialize_object_id")]
    pub quiz_id: ObjectId,
    pub quiz_title: String,
    pub question: AtomicQuestion,
}

/// Filter values available across the question bank
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StudyFilters {
    pub tags: Vec<String>,
    pub difficulties: Vec<Difficulty>,
}

fn serialize_object_id<S>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&id.to_hex())
}
