use crate::models::{
    AnswerOption, Difficulty, Question, QuestionGroup, QuestionItem, QuestionType, Quiz,
};
use mongodb::bson::oid::ObjectId;

pub fn question(text: &str, tags: &[&str], difficulty: Option<Difficulty>) -> Question {
    Question {
        id: ObjectId::new(),
        question_text: text.to_string(),
        question_type: QuestionType::SingleChoice,
        options: vec![
            AnswerOption {
                text: "yes".to_string(),
                is_correct: true,
                feedback: None,
            },
            AnswerOption {
                text: "no".to_string(),
                is_correct: false,
                feedback: Some("Re-read the stem".to_string()),
            },
        ],
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        difficulty,
        general_explanation: None,
    }
}

pub fn standalone(question: Question) -> QuestionItem {
    QuestionItem::Standalone(question)
}

pub fn group(case_stem: &str, children: Vec<Question>) -> QuestionItem {
    QuestionItem::Group(QuestionGroup {
        id: ObjectId::new(),
        case_stem: case_stem.to_string(),
        child_questions: children,
        tags: vec![],
        difficulty: None,
    })
}

pub fn quiz(title: &str, questions: Vec<QuestionItem>) -> Quiz {
    Quiz {
        id: ObjectId::new(),
        title: title.to_string(),
        description: None,
        subject: "Pharmacology".to_string(),
        topic: None,
        questions,
        created_by: ObjectId::new(),
        is_system_quiz: true,
        created_at: None,
        updated_at: None,
    }
}
