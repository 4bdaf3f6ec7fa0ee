use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Quiz document stored in MongoDB "quizzes" collection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "deserialize_items")]
    pub questions: Vec<QuestionItem>,
    pub created_by: ObjectId,
    #[serde(default)]
    pub is_system_quiz: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<mongodb::bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<mongodb::bson::DateTime>,
}

/// Top-level entry of a quiz: either a standalone question or a case-based group.
///
/// Stored items are decoded by [`QuestionItem::from_document`]; items written
/// before case groups existed carry no `type` field.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum QuestionItem {
    #[serde(rename = "single")]
    Standalone(Question),
    #[serde(rename = "group")]
    Group(QuestionGroup),
}

impl QuestionItem {
    pub fn from_document(doc: Document) -> Result<Self, String> {
        let kind = match doc.get("type") {
            Some(Bson::String(kind)) => Some(kind.as_str()),
            Some(other) => return Err(format!("Invalid item type: {}", other)),
            None => None,
        };

        let is_group = match kind {
            Some("group") => true,
            Some("single" | "standalone") => false,
            Some(other) => return Err(format!("Unknown item type: {}", other)),
            None => doc.contains_key("childQuestions") || doc.contains_key("caseStem"),
        };

        if is_group {
            mongodb::bson::from_document(doc)
                .map(QuestionItem::Group)
                .map_err(|e| e.to_string())
        } else {
            mongodb::bson::from_document(doc)
                .map(QuestionItem::Standalone)
                .map_err(|e| e.to_string())
        }
    }
}

/// Keeps every decodable item; malformed ones are logged and skipped so a
/// single bad entry does not hide the rest of the quiz.
fn deserialize_items<'de, D>(deserializer: D) -> Result<Vec<QuestionItem>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Bson>>::deserialize(deserializer)?.unwrap_or_default();

    Ok(raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let decoded = match item {
                Bson::Document(doc) => QuestionItem::from_document(doc),
                other => Err(format!("expected a document, found {}", other)),
            };
            decoded
                .map_err(|e| tracing::warn!("Skipping quiz item {}: {}", index, e))
                .ok()
        })
        .collect())
}

/// Stored difficulty; spellings outside the known levels read as unset.
fn deserialize_difficulty<'de, D>(deserializer: D) -> Result<Option<Difficulty>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Bson>::deserialize(deserializer)?;

    Ok(match raw {
        Some(Bson::String(value)) => match value.parse() {
            Ok(difficulty) => Some(difficulty),
            Err(e) => {
                tracing::debug!("Ignoring stored difficulty: {}", e);
                None
            }
        },
        _ => None,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub question_text: String,
    #[serde(default)]
    pub question_type: QuestionType,
    #[serde(default)]
    pub options: Vec<AnswerOption>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_difficulty",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub general_explanation: Option<String>,
}

/// Clinical case with several child questions sharing one narrative.
///
/// Group-level `tags` and `difficulty` are kept for authoring tools only;
/// filtering always reads the child question's own fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionGroup {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub case_stem: String,
    #[serde(default)]
    pub child_questions: Vec<Question>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_difficulty",
        skip_serializing_if = "Option::is_none"
    )]
    pub difficulty: Option<Difficulty>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionType {
    #[default]
    SingleChoice,
    MultiSelect,
    TrueFalse,
}

/// Cognitive level of a question, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub enum Difficulty {
    Recall,
    Comprehension,
    Application,
    AdvancedApplication,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Recall => "recall",
            Difficulty::Comprehension => "comprehension",
            Difficulty::Application => "application",
            Difficulty::AdvancedApplication => "advanced_application",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "recall" => Ok(Difficulty::Recall),
            "comprehension" => Ok(Difficulty::Comprehension),
            "application" => Ok(Difficulty::Application),
            "advancedapplication" => Ok(Difficulty::AdvancedApplication),
            _ => Err(format!("Invalid difficulty: {}", value)),
        }
    }
}

impl TryFrom<String> for Difficulty {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.as_str().to_string()
    }
}
