use thiserror::Error;

pub type Result<T> = std::result::Result<T, CodecError>;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("config error: {0}")]
    Config(String),

    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field {0} updated more than once in a single call")]
    DuplicateUpdate(String),

    #[error("value {value} out of range for field {field} (0..={max})")]
    OutOfRange { field: String, value: i128, max: u64 },

    #[error("score domain error: {0}")]
    ScoreDomain(String),

    #[error("layout format error: {0}")]
    LayoutFormat(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
