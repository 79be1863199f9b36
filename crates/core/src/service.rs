//! Website operations exposed to the request-handling layer.
//!
//! Every owner-scoped operation validates the id before touching the store,
//! resolves ownership through [`owns_or_fail`], and commits with a single
//! `insert`/`replace`/`delete`. Nothing is written when an earlier step fails.

use std::sync::Arc;

use chrono::Utc;

use crate::access::owns_or_fail;
use crate::document::validate::validate_generation_fields;
use crate::document::{new_document, Content, OwnerId, WebsiteDocument, WebsiteId};
use crate::error::{WebsiteError, WebsiteResult};
use crate::events::{EventBus, MutationEvent, MutationKind, WebsiteEvent};
use crate::generate::ContentGenerator;
use crate::mutation::{merge_content, replace_document, ContentPatch, GenerateWebsite, ReplaceWebsite};
use crate::store::DocumentStore;

#[derive(Clone)]
pub struct WebsiteService {
    store: Arc<dyn DocumentStore>,
    generator: Arc<dyn ContentGenerator>,
    events: EventBus,
}

impl WebsiteService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        generator: Arc<dyn ContentGenerator>,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            generator,
            events,
        }
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Validate the request, ask the generator for content and persist it.
    pub async fn generate(
        &self,
        owner_id: &OwnerId,
        request: GenerateWebsite,
    ) -> WebsiteResult<WebsiteDocument> {
        validate_generation_fields(request.business_type.as_deref(), request.industry.as_deref())?;
        let business_type = request.business_type.unwrap_or_default();
        let industry = request.industry.unwrap_or_default();

        let content = self
            .generator
            .generate(&business_type, &industry)
            .await
            .inspect_err(|err| tracing::warn!(%business_type, %industry, "generation failed: {err}"))?;

        self.create_document(owner_id, business_type, industry, content)
            .await
    }

    /// Persist already generated content as a new website.
    pub async fn create_document(
        &self,
        owner_id: &OwnerId,
        business_type: impl Into<String>,
        industry: impl Into<String>,
        content: Content,
    ) -> WebsiteResult<WebsiteDocument> {
        let draft = new_document(owner_id.clone(), business_type, industry, content);
        let id = self.store.insert(&draft).await?;
        let document = draft.into_document(id);

        tracing::info!(website_id = %id, owner_id = %owner_id, "website created");
        self.announce(&document, MutationKind::Create);
        Ok(document)
    }

    pub async fn get_document(&self, id: &str, owner_id: &OwnerId) -> WebsiteResult<WebsiteDocument> {
        self.fetch_owned(id, owner_id).await
    }

    /// Read without an ownership check, for public previews.
    pub async fn get_document_public(&self, id: &str) -> WebsiteResult<WebsiteDocument> {
        let id = WebsiteId::parse(id)?;
        self.store
            .fetch(id)
            .await?
            .ok_or(WebsiteError::NotFoundOrUnauthorized)
    }

    pub async fn list_documents(&self, owner_id: &OwnerId) -> WebsiteResult<Vec<WebsiteDocument>> {
        Ok(self.store.list_owned(owner_id).await?)
    }

    /// Replace business type, industry, content and customizations wholesale.
    pub async fn replace_document(
        &self,
        id: &str,
        owner_id: &OwnerId,
        replacement: ReplaceWebsite,
    ) -> WebsiteResult<WebsiteDocument> {
        let current = self.fetch_owned(id, owner_id).await?;
        let mut updated = replace_document(&current, replacement);
        updated.touch();
        self.commit(updated, MutationKind::Replace).await
    }

    /// Upsert sections by type and apply `layout`/`title` overrides.
    pub async fn merge_patch_content(
        &self,
        id: &str,
        owner_id: &OwnerId,
        patch: ContentPatch,
    ) -> WebsiteResult<WebsiteDocument> {
        let website_id = WebsiteId::parse(id)?;
        patch.validate()?;

        let current = owns_or_fail(self.store.fetch_owned(website_id, owner_id).await?, owner_id)?;
        let mut updated = current.clone();
        updated.content = merge_content(&current.content, &patch);
        updated.touch();
        self.commit(updated, MutationKind::Patch).await
    }

    /// Delete an owned website. Always `Ok(true)` on success.
    pub async fn delete_document(&self, id: &str, owner_id: &OwnerId) -> WebsiteResult<bool> {
        let website_id = WebsiteId::parse(id)?;
        if !self.store.delete(website_id, owner_id).await? {
            return Err(WebsiteError::NotFoundOrUnauthorized);
        }

        tracing::info!(website_id = %website_id, owner_id = %owner_id, "website deleted");
        self.events.publish(WebsiteEvent::Mutation(MutationEvent {
            website_id,
            owner_id: owner_id.clone(),
            operation: MutationKind::Delete,
            timestamp: Utc::now(),
        }));
        Ok(true)
    }

    async fn fetch_owned(&self, id: &str, owner_id: &OwnerId) -> WebsiteResult<WebsiteDocument> {
        let id = WebsiteId::parse(id)?;
        owns_or_fail(self.store.fetch_owned(id, owner_id).await?, owner_id)
    }

    async fn commit(
        &self,
        document: WebsiteDocument,
        operation: MutationKind,
    ) -> WebsiteResult<WebsiteDocument> {
        // The row can vanish between read and write if it was deleted concurrently.
        if !self.store.replace(&document).await? {
            return Err(WebsiteError::NotFoundOrUnauthorized);
        }
        tracing::info!(website_id = %document.id, ?operation, "website updated");
        self.announce(&document, operation);
        Ok(document)
    }

    fn announce(&self, document: &WebsiteDocument, operation: MutationKind) {
        self.events.publish(WebsiteEvent::Mutation(MutationEvent {
            website_id: document.id,
            owner_id: document.owner_id.clone(),
            operation,
            timestamp: document.updated_at,
        }));
    }
}
