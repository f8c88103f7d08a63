use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RevenueError {
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
