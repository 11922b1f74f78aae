use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("read timed out after {timeout_ms}ms: {soul}")]
    ReadTimeout { soul: String, timeout_ms: u64 },

    #[error("store error: {0}")]
    Store(String),

    #[error("scope already released")]
    ScopeReleased,

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl GraphError {
    pub fn store<E: std::fmt::Display>(e: E) -> Self {
        Self::Store(e.to_string())
    }

    pub fn serialization<E: std::fmt::Display>(e: E) -> Self {
        Self::Serialization(e.to_string())
    }
}
