use thiserror::Error;

pub type SeqResult<T> = Result<T, SeqError>;

#[derive(Debug, Error)]
pub enum SeqError {
    /// The sequence was used in a way its bound does not allow, such as
    /// draining an unbounded generator without a prior `limit`.
    #[error("usage error: {0}")]
    Usage(String),

    /// A user-supplied stage function failed on an element.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl SeqError {
    pub fn unbounded(op: &str) -> Self {
        SeqError::Usage(format!(
            "{op} needs a bounded sequence; apply limit() to the generator first"
        ))
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, SeqError::Parse(_))
    }
}

impl From<std::num::ParseIntError> for SeqError {
    fn from(e: std::num::ParseIntError) -> Self {
        SeqError::Parse(format!("integer: {e}"))
    }
}

impl From<std::num::ParseFloatError> for SeqError {
    fn from(e: std::num::ParseFloatError) -> Self {
        SeqError::Parse(format!("float: {e}"))
    }
}

impl From<chrono::ParseError> for SeqError {
    fn from(e: chrono::ParseError) -> Self {
        SeqError::Parse(format!("date: {e}"))
    }
}
