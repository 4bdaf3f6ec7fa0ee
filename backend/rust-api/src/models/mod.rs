pub mod quiz;
pub mod study;
pub mod user;

pub use quiz::{AnswerOption, Difficulty, Question, QuestionGroup, QuestionItem, QuestionType, Quiz};
pub use study::{
    AtomicQuestion, CreateStudySessionRequest, ResolvedBookmark, SessionCriteria, StudyFilters,
    StudySession, TagFilter, TagFilterMode,
};
pub use user::{BookmarkAction, BookmarkToggleResponse, UserBookmarks};
