use thiserror::Error;

#[derive(Debug, Error)]
pub enum StudyError {
    #[error("No questions match the selected filters")]
    NotFound,
    #[error("{0}")]
    InvalidArgument(String),
    #[error("Quiz store failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl StudyError {
    pub fn invalid(message: impl Into<String>) -> Self {
        StudyError::InvalidArgument(message.into())
    }
}
