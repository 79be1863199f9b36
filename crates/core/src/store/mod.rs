//! Persistence boundary for website documents.
//!
//! Mutations are read-modify-write with no version token: two concurrent
//! writers to the same website both succeed and the later `replace` wins.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgDocumentStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::document::{NewWebsite, OwnerId, WebsiteDocument, WebsiteId};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("document serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch by id regardless of owner.
    async fn fetch(&self, id: WebsiteId) -> Result<Option<WebsiteDocument>, StoreError>;

    /// Fetch by id, only if owned by `owner_id`.
    async fn fetch_owned(
        &self,
        id: WebsiteId,
        owner_id: &OwnerId,
    ) -> Result<Option<WebsiteDocument>, StoreError>;

    /// All websites of one owner, newest first.
    async fn list_owned(&self, owner_id: &OwnerId) -> Result<Vec<WebsiteDocument>, StoreError>;

    /// Persist a new website and return the id assigned to it.
    async fn insert(&self, website: &NewWebsite) -> Result<WebsiteId, StoreError>;

    /// Overwrite the mutable fields of the row matching `(id, owner_id)`.
    /// Returns `false` when no such row exists.
    async fn replace(&self, document: &WebsiteDocument) -> Result<bool, StoreError>;

    /// Returns `false` when no row matched `(id, owner_id)`.
    async fn delete(&self, id: WebsiteId, owner_id: &OwnerId) -> Result<bool, StoreError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}
