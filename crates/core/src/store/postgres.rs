use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use super::{DocumentStore, StoreError};
use crate::document::{NewWebsite, OwnerId, WebsiteDocument, WebsiteId};

const SELECT_COLUMNS: &str = "SELECT id, owner_id, business_type, industry, content, \
     customizations, is_published, created_at, updated_at FROM websites";

/// Database row representation of a website.
#[derive(Debug, Clone, sqlx::FromRow)]
struct WebsiteRow {
    id: Uuid,
    owner_id: String,
    business_type: String,
    industry: String,
    content: Value,
    customizations: Value,
    is_published: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<WebsiteRow> for WebsiteDocument {
    type Error = StoreError;

    fn try_from(row: WebsiteRow) -> Result<Self, Self::Error> {
        Ok(WebsiteDocument {
            id: WebsiteId::from(row.id),
            owner_id: OwnerId::new(row.owner_id),
            business_type: row.business_type,
            industry: row.industry,
            content: serde_json::from_value(row.content)?,
            customizations: serde_json::from_value(row.customizations)?,
            is_published: row.is_published,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// PostgreSQL-backed store. `content` and `customizations` are JSONB.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn fetch(&self, id: WebsiteId) -> Result<Option<WebsiteDocument>, StoreError> {
        let row = sqlx::query_as::<_, WebsiteRow>(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        row.map(WebsiteDocument::try_from).transpose()
    }

    async fn fetch_owned(
        &self,
        id: WebsiteId,
        owner_id: &OwnerId,
    ) -> Result<Option<WebsiteDocument>, StoreError> {
        let query = format!("{SELECT_COLUMNS} WHERE id = $1 AND owner_id = $2");
        let row = sqlx::query_as::<_, WebsiteRow>(&query)
            .bind(id.as_uuid())
            .bind(owner_id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(WebsiteDocument::try_from).transpose()
    }

    async fn list_owned(&self, owner_id: &OwnerId) -> Result<Vec<WebsiteDocument>, StoreError> {
        let rows = sqlx::query_as::<_, WebsiteRow>(&format!(
            "{SELECT_COLUMNS} WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id.as_str())
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(WebsiteDocument::try_from).collect()
    }

    async fn insert(&self, website: &NewWebsite) -> Result<WebsiteId, StoreError> {
        let id = WebsiteId::generate();
        sqlx::query(
            "INSERT INTO websites (id, owner_id, business_type, industry, content, \
             customizations, is_published, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(id.as_uuid())
        .bind(website.owner_id.as_str())
        .bind(&website.business_type)
        .bind(&website.industry)
        .bind(serde_json::to_value(&website.content)?)
        .bind(serde_json::to_value(&website.customizations)?)
        .bind(website.is_published)
        .bind(website.created_at)
        .bind(website.updated_at)
        .execute(&self.pool)
        .await?;
        tracing::debug!(website_id = %id, "inserted website row");
        Ok(id)
    }

    async fn replace(&self, document: &WebsiteDocument) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE websites SET business_type = $3, industry = $4, content = $5, \
             customizations = $6, updated_at = $7 WHERE id = $1 AND owner_id = $2",
        )
        .bind(document.id.as_uuid())
        .bind(document.owner_id.as_str())
        .bind(&document.business_type)
        .bind(&document.industry)
        .bind(serde_json::to_value(&document.content)?)
        .bind(serde_json::to_value(&document.customizations)?)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: WebsiteId, owner_id: &OwnerId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM websites WHERE id = $1 AND owner_id = $2")
            .bind(id.as_uuid())
            .bind(owner_id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(content: Value) -> WebsiteRow {
        let now = Utc::now();
        WebsiteRow {
            id: Uuid::now_v7(),
            owner_id: "u1".into(),
            business_type: "bakery".into(),
            industry: "food".into(),
            content,
            customizations: json!({ "images": [], "layout": "default" }),
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn row_converts_to_document() {
        let row = row(json!({ "title": "T", "sections": [{ "type": "hero" }] }));
        let id = row.id;
        let doc = WebsiteDocument::try_from(row).unwrap();
        assert_eq!(doc.id.as_uuid(), id);
        assert_eq!(doc.content.title, "T");
        assert_eq!(doc.customizations.layout, "default");
    }

    #[test]
    fn corrupt_content_is_reported() {
        let err = WebsiteDocument::try_from(row(json!({ "sections": "oops" }))).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
