use thiserror::Error;

pub type RatingResult<T> = Result<T, RatingError>;

#[derive(Error, Debug)]
pub enum RatingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Malformed record: {0}")]
    MalformedRecord(String),

    #[error("Unknown coordinate: user {user}, content {content}")]
    UnknownCoordinate { user: String, content: String },

    #[error("No estimate for user {user}, content {content}: {reason}")]
    Unestimable {
        user: String,
        content: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
