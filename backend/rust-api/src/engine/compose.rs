use rand::Rng;
use std::collections::HashSet;

use super::{filter, flatten, sample, StudyError};
use crate::models::{
    CreateStudySessionRequest, Difficulty, Quiz, SessionCriteria, StudySession, TagFilter,
};

pub const SESSION_TITLE: &str = "Custom study session";

impl SessionCriteria {
    /// Validates raw request input. Counts above `max_count` are clamped.
    pub fn from_request(
        req: &CreateStudySessionRequest,
        default_count: usize,
        max_count: usize,
    ) -> Result<Self, StudyError> {
        let number_of_questions = match req.number_of_questions {
            None => default_count,
            Some(count) => usize::try_from(count)
                .map_err(|_| StudyError::invalid("numberOfQuestions must not be negative"))?,
        }
        .min(max_count);

        let difficulties = req
            .difficulties
            .iter()
            .map(|value| value.parse::<Difficulty>().map_err(StudyError::InvalidArgument))
            .collect::<Result<HashSet<_>, _>>()?;

        let tags: HashSet<String> = req
            .tags
            .iter()
            .map(|tag| tag.trim())
            .filter(|tag| !tag.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            tag_filter: (!tags.is_empty()).then(|| TagFilter {
                tags,
                mode: req.tag_filter_mode,
            }),
            difficulties: (!difficulties.is_empty()).then_some(difficulties),
            number_of_questions,
        })
    }
}

/// Builds a virtual study session: flatten, filter, then sample.
///
/// Asking for zero questions from a non-empty bank is a valid, empty session;
/// an empty candidate pool for a positive count is `NotFound`.
pub fn compose_session<R>(
    quizzes: &[Quiz],
    criteria: &SessionCriteria,
    rng: &mut R,
) -> Result<StudySession, StudyError>
where
    R: Rng + ?Sized,
{
    let records = flatten(quizzes);

    if criteria.number_of_questions == 0 {
        if records.is_empty() {
            return Err(StudyError::NotFound);
        }
        return Ok(session_from(Vec::new()));
    }

    let candidates = filter(
        records,
        criteria.tag_filter.as_ref(),
        criteria.difficulties.as_ref(),
    );
    if candidates.is_empty() {
        return Err(StudyError::NotFound);
    }

    let questions = sample(&candidates, criteria.number_of_questions, rng);
    tracing::debug!(
        candidates = candidates.len(),
        selected = questions.len(),
        "Composed study session"
    );

    Ok(session_from(questions))
}

fn session_from(questions: Vec<crate::models::AtomicQuestion>) -> StudySession {
    StudySession {
        title: SESSION_TITLE.to_string(),
        description: format!("Includes {} selected questions.", questions.len()),
        questions,
    }
}
