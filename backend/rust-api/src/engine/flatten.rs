use crate::models::{AtomicQuestion, Question, QuestionItem, Quiz};

/// Flattens quizzes into one record per answerable question.
///
/// Order is stable: quiz order, then item order, then child order. Group
/// children carry the group's case stem; a group without children contributes
/// nothing.
pub fn flatten(quizzes: &[Quiz]) -> Vec<AtomicQuestion> {
    flatten_iter(quizzes).collect()
}

pub(crate) fn flatten_iter(quizzes: &[Quiz]) -> impl Iterator<Item = AtomicQuestion> + '_ {
    quizzes.iter().flat_map(|quiz| {
        quiz.questions
            .iter()
            .flat_map(move |item| flatten_item(quiz, item))
    })
}

fn flatten_item<'a>(
    quiz: &'a Quiz,
    item: &'a QuestionItem,
) -> impl Iterator<Item = AtomicQuestion> + 'a {
    let (single, group) = match item {
        QuestionItem::Standalone(question) => (Some(question), None),
        QuestionItem::Group(group) => (None, Some(group)),
    };

    let children = group.into_iter().flat_map(move |group| {
        group
            .child_questions
            .iter()
            .map(move |child| to_atomic(quiz, child, Some(&group.case_stem)))
    });

    single
        .into_iter()
        .map(move |question| to_atomic(quiz, question, None))
        .chain(children)
}

fn to_atomic(quiz: &Quiz, question: &Question, case_stem: Option<&String>) -> AtomicQuestion {
    AtomicQuestion {
        id: question.id,
        question_text: question.question_text.clone(),
        question_type: question.question_type,
        options: question.options.clone(),
        tags: question.tags.clone(),
        difficulty: question.difficulty,
        general_explanation: question.general_explanation.clone(),
        case_stem: case_stem.cloned(),
        quiz_id: quiz.id,
        quiz_title: quiz.title.clone(),
    }
}
