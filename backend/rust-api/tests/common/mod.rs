#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use mongodb::bson::oid::ObjectId;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use studymed_api::{
    config::Config,
    create_router,
    middlewares::auth::{JwtClaims, JwtService},
    models::{
        AnswerOption, BookmarkAction, Difficulty, Question, QuestionGroup, QuestionItem,
        QuestionType, Quiz, SessionCriteria, TagFilterMode,
    },
    services::{quiz_store::QuizStore, user_store::UserStore, AppState},
};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Quiz bank held in memory. Candidate lookup applies the same coarse tag
/// prefilter as the MongoDB query, so the engine sees the same superset.
#[derive(Default)]
pub struct InMemoryQuizStore {
    quizzes: Vec<Quiz>,
}

impl InMemoryQuizStore {
    pub fn new(quizzes: Vec<Quiz>) -> Self {
        Self { quizzes }
    }
}

#[async_trait]
impl QuizStore for InMemoryQuizStore {
    async fn find_study_candidates(&self, criteria: &SessionCriteria) -> anyhow::Result<Vec<Quiz>> {
        Ok(self
            .quizzes
            .iter()
            .filter(|quiz| passes_tag_prefilter(quiz, criteria))
            .cloned()
            .collect())
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Quiz>> {
        Ok(self.quizzes.clone())
    }

    async fn find_containing_questions(
        &self,
        question_ids: &[ObjectId],
    ) -> anyhow::Result<Vec<Quiz>> {
        Ok(self
            .quizzes
            .iter()
            .filter(|quiz| quiz_contains_any(quiz, question_ids))
            .cloned()
            .collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Mirrors `candidate_filter`: `questions.tags` (standalone and group-level
/// tags) or `questions.childQuestions.tags`, each compared as the union of
/// tags along that path.
fn passes_tag_prefilter(quiz: &Quiz, criteria: &SessionCriteria) -> bool {
    let Some(filter) = criteria
        .tag_filter
        .as_ref()
        .filter(|filter| !filter.tags.is_empty())
    else {
        return true;
    };

    let mut item_tags = HashSet::new();
    let mut child_tags = HashSet::new();
    for item in &quiz.questions {
        match item {
            QuestionItem::Standalone(question) => item_tags.extend(question.tags.iter()),
            QuestionItem::Group(group) => {
                item_tags.extend(group.tags.iter());
                for child in &group.child_questions {
                    child_tags.extend(child.tags.iter());
                }
            }
        }
    }

    let satisfies = |present: &HashSet<&String>| match filter.mode {
        TagFilterMode::Any => filter.tags.iter().any(|tag| present.contains(tag)),
        TagFilterMode::All => filter.tags.iter().all(|tag| present.contains(tag)),
    };

    satisfies(&item_tags) || satisfies(&child_tags)
}

fn quiz_contains_any(quiz: &Quiz, ids: &[ObjectId]) -> bool {
    quiz.questions.iter().any(|item| match item {
        QuestionItem::Standalone(question) => ids.contains(&question.id),
        QuestionItem::Group(group) => group
            .child_questions
            .iter()
            .any(|child| ids.contains(&child.id)),
    })
}

#[derive(Default)]
pub struct InMemoryUserStore {
    bookmarks: Mutex<HashMap<ObjectId, Vec<ObjectId>>>,
}

impl InMemoryUserStore {
    pub fn with_user(user_id: ObjectId, bookmarks: Vec<ObjectId>) -> Self {
        let store = Self::default();
        store.bookmarks.lock().unwrap().insert(user_id, bookmarks);
        store
    }

    pub fn bookmarks_of(&self, user_id: ObjectId) -> Option<Vec<ObjectId>> {
        self.bookmarks.lock().unwrap().get(&user_id).cloned()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn bookmarked_questions(&self, user_id: ObjectId) -> anyhow::Result<Option<Vec<ObjectId>>> {
        Ok(self.bookmarks_of(user_id))
    }

    async fn toggle_bookmark(
        &self,
        user_id: ObjectId,
        question_id: ObjectId,
    ) -> anyhow::Result<Option<BookmarkAction>> {
        let mut users = self.bookmarks.lock().unwrap();
        let Some(list) = users.get_mut(&user_id) else {
            return Ok(None);
        };

        if let Some(pos) = list.iter().position(|id| *id == question_id) {
            list.remove(pos);
            Ok(Some(BookmarkAction::Removed))
        } else {
            list.push(question_id);
            Ok(Some(BookmarkAction::Added))
        }
    }
}

pub fn test_config() -> Config {
    Config {
        mongo_uri: "mongodb://localhost:27017".to_string(),
        mongo_database: "studymed_test".to_string(),
        jwt_secret: TEST_JWT_SECRET.to_string(),
        port: 0,
        cors_origin: None,
        default_question_count: 10,
        max_question_count: 200,
    }
}

pub fn create_test_app(quizzes: Arc<InMemoryQuizStore>, users: Arc<InMemoryUserStore>) -> Router {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let state = AppState::with_stores(test_config(), quizzes, users);
    create_router(Arc::new(state))
}

pub fn token_for(user_id: &str) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let claims = JwtClaims {
        sub: user_id.to_string(),
        role: "user".to_string(),
        exp: now + 3600,
        iat: now,
    };

    JwtService::new(TEST_JWT_SECRET)
        .generate_token(&claims)
        .expect("Failed to sign test token")
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

pub fn question(text: &str, tags: &[&str], difficulty: Option<Difficulty>) -> Question {
    Question {
        id: ObjectId::new(),
        question_text: text.to_string(),
        question_type: QuestionType::SingleChoice,
        options: vec![
            AnswerOption {
                text: "Yes".to_string(),
                is_correct: true,
                feedback: None,
            },
            AnswerOption {
                text: "No".to_string(),
                is_correct: false,
                feedback: None,
            },
        ],
        tags: tags.iter().map(|t| t.to_string()).collect(),
        difficulty,
        general_explanation: None,
    }
}

pub fn group(case_stem: &str, children: Vec<Question>) -> QuestionItem {
    QuestionItem::Group(QuestionGroup {
        id: ObjectId::new(),
        case_stem: case_stem.to_string(),
        child_questions: children,
        tags: Vec::new(),
        difficulty: None,
    })
}

pub fn quiz(title: &str, questions: Vec<QuestionItem>) -> Quiz {
    Quiz {
        id: ObjectId::new(),
        title: title.to_string(),
        description: None,
        subject: "Medicine".to_string(),
        topic: None,
        questions,
        created_by: ObjectId::new(),
        is_system_quiz: true,
        created_at: None,
        updated_at: None,
    }
}

/// One quiz with a standalone question and a two-child case group.
pub struct Fixture {
    pub quiz: Quiz,
    pub standalone: Question,
    pub first_child: Question,
    pub second_child: Question,
}

pub fn cardiology_fixture() -> Fixture {
    let standalone = question(
        "Which valve is affected in rheumatic fever?",
        &["a"],
        Some(Difficulty::Recall),
    );
    let first_child = question(
        "What is the most likely diagnosis?",
        &["a", "b"],
        Some(Difficulty::Comprehension),
    );
    let second_child = question(
        "What is the next step in management?",
        &["b"],
        Some(Difficulty::Application),
    );

    let quiz = quiz(
        "Cardiology Basics",
        vec![
            QuestionItem::Standalone(standalone.clone()),
            group(
                "A 54-year-old man presents with crushing chest pain.",
                vec![first_child.clone(), second_child.clone()],
            ),
        ],
    );

    Fixture {
        quiz,
        standalone,
        first_child,
        second_child,
    }
}
