use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{DocumentStore, StoreError};
use crate::document::{NewWebsite, OwnerId, WebsiteDocument, WebsiteId};

/// Process-local store used by tests and local runs without PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: RwLock<HashMap<WebsiteId, WebsiteDocument>>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `StoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("memory store switched off".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch(&self, id: WebsiteId) -> Result<Option<WebsiteDocument>, StoreError> {
        self.check_available()?;
        Ok(self.documents.read().await.get(&id).cloned())
    }

    async fn fetch_owned(
        &self,
        id: WebsiteId,
        owner_id: &OwnerId,
    ) -> Result<Option<WebsiteDocument>, StoreError> {
        self.check_available()?;
        Ok(self
            .documents
            .read()
            .await
            .get(&id)
            .filter(|doc| doc.owner_id == *owner_id)
            .cloned())
    }

    async fn list_owned(&self, owner_id: &OwnerId) -> Result<Vec<WebsiteDocument>, StoreError> {
        self.check_available()?;
        let mut owned: Vec<WebsiteDocument> = self
            .documents
            .read()
            .await
            .values()
            .filter(|doc| doc.owner_id == *owner_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn insert(&self, website: &NewWebsite) -> Result<WebsiteId, StoreError> {
        self.check_available()?;
        let id = WebsiteId::generate();
        self.documents
            .write()
            .await
            .insert(id, website.clone().into_document(id));
        Ok(id)
    }

    async fn replace(&self, document: &WebsiteDocument) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut documents = self.documents.write().await;
        match documents.get_mut(&document.id) {
            Some(stored) if stored.owner_id == document.owner_id => {
                stored.business_type = document.business_type.clone();
                stored.industry = document.industry.clone();
                stored.content = document.content.clone();
                stored.customizations = document.customizations.clone();
                stored.updated_at = document.updated_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: WebsiteId, owner_id: &OwnerId) -> Result<bool, StoreError> {
        self.check_available()?;
        let mut documents = self.documents.write().await;
        if documents.get(&id).is_some_and(|doc| doc.owner_id == *owner_id) {
            documents.remove(&id);
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check_available()
    }
}
