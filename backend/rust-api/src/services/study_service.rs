use std::sync::Arc;

use crate::config::Config;
use crate::engine::{self, StudyError};
use crate::metrics::{STUDY_SESSIONS_TOTAL, STUDY_SESSION_QUESTIONS};
use crate::models::{CreateStudySessionRequest, SessionCriteria, StudyFilters, StudySession};
use crate::services::quiz_store::QuizStore;

pub struct StudyService {
    quizzes: Arc<dyn QuizStore>,
    default_question_count: usize,
    max_question_count: usize,
}

impl StudyService {
    pub fn new(quizzes: Arc<dyn QuizStore>, config: &Config) -> Self {
        Self {
            quizzes,
            default_question_count: config.default_question_count,
            max_question_count: config.max_question_count,
        }
    }

    pub async fn create_session(
        &self,
        req: &CreateStudySessionRequest,
    ) -> Result<StudySession, StudyError> {
        let result = self.compose(req).await;

        let outcome = match &result {
            Ok(_) => "created",
            Err(StudyError::NotFound) => "not_found",
            Err(StudyError::InvalidArgument(_)) => "invalid",
            Err(StudyError::Store(_)) => "error",
        };
        STUDY_SESSIONS_TOTAL.with_label_values(&[outcome]).inc();

        if let Ok(session) = &result {
            STUDY_SESSION_QUESTIONS.observe(session.questions.len() as f64);
        }

        result
    }

    async fn compose(&self, req: &CreateStudySessionRequest) -> Result<StudySession, StudyError> {
        let criteria = SessionCriteria::from_request(
            req,
            self.default_question_count,
            self.max_question_count,
        )?;

        // A zero-count session only needs a non-empty bank, so the tag
        // prefilter must not narrow it.
        let quizzes = if criteria.number_of_questions == 0 {
            self.quizzes.find_all().await?
        } else {
            self.quizzes.find_study_candidates(&criteria).await?
        };
        tracing::debug!(
            "Loaded {} candidate quizzes for {} requested questions",
            quizzes.len(),
            criteria.number_of_questions
        );

        // ThreadRng is not Send; it must not live across an await.
        engine::compose_session(&quizzes, &criteria, &mut rand::rng())
    }

    pub async fn available_filters(&self) -> Result<StudyFilters, StudyError> {
        let quizzes = self.quizzes.find_all().await?;
        let records = engine::flatten(&quizzes);
        Ok(engine::available_filters(&records))
    }
}
