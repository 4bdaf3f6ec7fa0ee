use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::Database;

use crate::metrics::track_db_operation;
use crate::models::{Quiz, SessionCriteria, TagFilterMode};
use crate::utils::retry::{retry_async_with_config, RetryConfig};

const QUIZZES_COLLECTION: &str = "quizzes";

/// Read access to quiz documents. Implementations must return complete
/// documents, nested question items included.
#[async_trait]
pub trait QuizStore: Send + Sync {
    /// Quizzes that may contain questions matching `criteria`. The result can be
    /// a superset; the engine applies the exact predicates afterwards.
    async fn find_study_candidates(&self, criteria: &SessionCriteria) -> Result<Vec<Quiz>>;

    async fn find_all(&self) -> Result<Vec<Quiz>>;

    /// Quizzes holding any of `question_ids` as a standalone question or group child.
    async fn find_containing_questions(&self, question_ids: &[ObjectId]) -> Result<Vec<Quiz>>;

    async fn ping(&self) -> Result<()>;
}

pub struct MongoQuizStore {
    mongo: Database,
    retry: RetryConfig,
}

impl MongoQuizStore {
    pub fn new(mongo: Database) -> Self {
        Self {
            mongo,
            retry: RetryConfig::default(),
        }
    }

    async fn find(&self, operation: &str, filter: Document) -> Result<Vec<Quiz>> {
        let collection = self.mongo.collection::<Document>(QUIZZES_COLLECTION);

        let documents = track_db_operation(operation, QUIZZES_COLLECTION, async {
            retry_async_with_config(self.retry.clone(), || async {
                let cursor = collection
                    .find(filter.clone())
                    .await
                    .context("Failed to query quizzes")?;
                cursor
                    .try_collect::<Vec<Document>>()
                    .await
                    .context("Failed to read quiz cursor")
            })
            .await
        })
        .await?;

        Ok(decode_quizzes(documents))
    }
}

/// Decodes stored quizzes, skipping documents that do not fit the model.
/// Decoding happens after the read so a bad document is never retried.
fn decode_quizzes(documents: Vec<Document>) -> Vec<Quiz> {
    documents
        .into_iter()
        .filter_map(|doc| {
            let id = doc.get_object_id("_id").ok();
            match mongodb::bson::from_document::<Quiz>(doc) {
                Ok(quiz) => Some(quiz),
                Err(e) => {
                    tracing::warn!("Skipping undecodable quiz {:?}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

#[async_trait]
impl QuizStore for MongoQuizStore {
    async fn find_study_candidates(&self, criteria: &SessionCriteria) -> Result<Vec<Quiz>> {
        let filter = candidate_filter(criteria);
        tracing::debug!("Loading study candidates with filter {}", filter);
        self.find("find_study_candidates", filter).await
    }

    async fn find_all(&self) -> Result<Vec<Quiz>> {
        self.find("find_all", doc! {}).await
    }

    async fn find_containing_questions(&self, question_ids: &[ObjectId]) -> Result<Vec<Quiz>> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids = question_ids.to_vec();
        let filter = doc! {
            "$or": [
                { "questions._id": { "$in": ids.clone() } },
                { "questions.childQuestions._id": { "$in": ids } },
            ]
        };
        self.find("find_containing_questions", filter).await
    }

    async fn ping(&self) -> Result<()> {
        self.mongo
            .run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB ping failed")?;
        Ok(())
    }
}

/// Coarse storage-side prefilter on tags, at either nesting level.
///
/// A quiz passes if the tags appear anywhere in it, which is a superset of the
/// quizzes holding a single matching question. Difficulty is not pushed down
/// because stored spellings vary; the engine matches it exactly.
pub fn candidate_filter(criteria: &SessionCriteria) -> Document {
    let Some(tag_filter) = criteria
        .tag_filter
        .as_ref()
        .filter(|filter| !filter.tags.is_empty())
    else {
        return doc! {};
    };

    let mut tags: Vec<String> = tag_filter.tags.iter().cloned().collect();
    tags.sort();

    let operator = match tag_filter.mode {
        TagFilterMode::Any => "$in",
        TagFilterMode::All => "$all",
    };
    let mut condition = Document::new();
    condition.insert(operator, tags);

    doc! {
        "$or": [
            { "questions.tags": condition.clone() },
            { "questions.childQuestions.tags": condition },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TagFilter;

    #[test]
    fn no_tags_means_no_prefilter() {
        assert_eq!(candidate_filter(&SessionCriteria::default()), doc! {});

        let criteria = SessionCriteria {
            tag_filter: Some(TagFilter::new(Vec::<String>::new(), TagFilterMode::All)),
            ..Default::default()
        };
        assert_eq!(candidate_filter(&criteria), doc! {});
    }

    #[test]
    fn any_mode_uses_in_on_both_levels() {
        let criteria = SessionCriteria {
            tag_filter: Some(TagFilter::new(["renal", "pharm"], TagFilterMode::Any)),
            ..Default::default()
        };

        assert_eq!(
            candidate_filter(&criteria),
            doc! {
                "$or": [
                    { "questions.tags": { "$in": ["pharm", "renal"] } },
                    { "questions.childQuestions.tags": { "$in": ["pharm", "renal"] } },
                ]
            }
        );
    }

    #[test]
    fn all_mode_uses_all_operator() {
        let criteria = SessionCriteria {
            tag_filter: Some(TagFilter::new(["pharm"], TagFilterMode::All)),
            ..Default::default()
        };

        assert_eq!(
            candidate_filter(&criteria),
            doc! {
                "$or": [
                    { "questions.tags": { "$all": ["pharm"] } },
                    { "questions.childQuestions.tags": { "$all": ["pharm"] } },
                ]
            }
        );
    }

    #[test]
    fn undecodable_quizzes_are_skipped() {
        let good = doc! {
            "_id": ObjectId::new(),
            "title": "Renal",
            "subject": "Physiology",
            "createdBy": ObjectId::new(),
            "questions": [],
        };
        let missing_title = doc! {
            "_id": ObjectId::new(),
            "subject": "Physiology",
            "createdBy": ObjectId::new(),
        };

        let quizzes = decode_quizzes(vec![missing_title, good]);
        assert_eq!(quizzes.len(), 1);
        assert_eq!(quizzes[0].title, "Renal");
    }
}
