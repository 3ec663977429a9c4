use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoftError {
    #[error("Geometry error: {0}")]
    Geometry(String),

    #[error("Singular matrix: {0}")]
    SingularMatrix(String),

    #[error("Invalid index {index}: {context}")]
    InvalidIndex { index: usize, context: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LoftError>;
