use thiserror::Error;

pub type MailResult<T> = Result<T, MailError>;

#[derive(Error, Debug, Clone)]
pub enum MailError {
    #[error("Document error: {0}")]
    Document(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown block id '{id}'")]
    UnknownBlock { id: String },

    #[error("Block '{id}' is not a container and cannot hold children")]
    NotAContainer { id: String },

    #[error("Container '{id}' cannot be nested inside another container")]
    NestedContainer { id: String },

    #[error("Insertion index {index} is out of bounds for a list of {len} blocks")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Duplicate id '{id}': block ids must be unique within the document")]
    DuplicateId { id: String },
}

impl From<serde_json::Error> for MailError {
    fn from(err: serde_json::Error) -> Self {
        MailError::Serialization(err.to_string())
    }
}
