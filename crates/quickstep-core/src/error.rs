use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Persistence failure: {0}")]
    Persistence(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Unknown judge: {0}")]
    UnknownJudge(String),

    #[error("Category {category_id} is locked for {judge_email}")]
    CategoryLocked {
        category_id: String,
        judge_email: String,
    },

    #[error("Competition {0} is locked")]
    CompetitionLocked(String),

    #[error("Submission already in flight for category {0}")]
    SubmissionInFlight(String),

    #[error("No category selected")]
    NoActiveCategory,

    #[error("Role {0} may not perform this action")]
    Forbidden(String),

    #[error("Actor {0} has no score cells of their own")]
    ReadOnlyActor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
