use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Bson, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("failed to decode document: {0}")]
    Decode(#[from] bson::de::Error),

    #[error("store returned a non-ObjectId identifier: {0}")]
    UnexpectedId(Bson),

    #[error("unsupported operator `{0}`")]
    UnsupportedOperator(String),

    #[error("cannot apply `{operator}` to field `{field}`")]
    TypeMismatch { operator: String, field: String },
}

/// Result of an `update_one` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

impl UpdateOutcome {
    pub fn is_matched(&self) -> bool {
        self.matched > 0
    }
}

/// Minimal document-store surface the services depend on.
///
/// Filters support field equality (array fields match when they contain the
/// value) and `$ne`. Updates support `$set`, `$inc`, `$push` and `$pull`, and
/// are applied to the first matching document as a single atomic step.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Cheap round trip to confirm the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_one(&self, collection: &str, filter: Document) -> Result<Option<Document>, StoreError>;

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, StoreError>;

    /// Inserts `document`, generating an `_id` when it has none.
    async fn insert_one(&self, collection: &str, document: Document) -> Result<ObjectId, StoreError>;

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        update: Document,
    ) -> Result<UpdateOutcome, StoreError>;
}

pub fn encode<T: Serialize>(value: &T) -> Result<Document, StoreError> {
    Ok(bson::to_document(value)?)
}

pub fn decode<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    Ok(bson::from_document(document)?)
}
