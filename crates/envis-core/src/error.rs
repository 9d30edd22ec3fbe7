//! Error types for Envis

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid date '{0}' (expected DD Mon YYYY)")]
    DateParse(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("Category id already in use: {0}")]
    DuplicateCategorySlug(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("{0} is already a member of this family")]
    AlreadyMember(String),

    #[error("An invitation is already pending for {0}")]
    AlreadyInvited(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Whether this error means the requested record does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::CategoryNotFound(_))
    }

    /// Whether this error means the request conflicts with existing state
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::DuplicateCategorySlug(_) | Self::AlreadyMember(_) | Self::AlreadyInvited(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
