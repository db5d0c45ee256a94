use async_trait::async_trait;

use crate::domain::entities::member::MemberRecord;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to connect to member store: {0}")]
    Connect(String),
    #[error("failed to query member store: {0}")]
    Query(String),
    #[error("member document has no usable `_id`")]
    MissingId,
}

#[async_trait]
pub trait MemberCursor: Send {
    async fn next_record(&mut self) -> Result<Option<MemberRecord>, SourceError>;
}

#[async_trait]
pub trait MemberSource: Send + Sync {
    async fn scan<'a>(&'a self) -> Result<Box<dyn MemberCursor + 'a>, SourceError>;
}
