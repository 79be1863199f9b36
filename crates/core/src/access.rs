//! Ownership checks shared by every owner-scoped operation.

use crate::document::{OwnerId, WebsiteDocument};
use crate::error::WebsiteError;

/// Return the document only if it exists and belongs to `caller`.
///
/// A missing document and someone else's document produce the same error so
/// callers cannot learn which ids belong to someone else.
pub fn owns_or_fail(
    document: Option<WebsiteDocument>,
    caller: &OwnerId,
) -> Result<WebsiteDocument, WebsiteError> {
    match document {
        Some(document) if document.owner_id == *caller => Ok(document),
        Some(document) => {
            tracing::debug!(website_id = %document.id, "ownership check failed");
            Err(WebsiteError::NotFoundOrUnauthorized)
        }
        None => Err(WebsiteError::NotFoundOrUnauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{new_document, Content, WebsiteId};

    fn owned_by(owner: &str) -> WebsiteDocument {
        new_document(OwnerId::new(owner), "bakery", "food", Content::default())
            .into_document(WebsiteId::generate())
    }

    #[test]
    fn owner_is_allowed() {
        let doc = owned_by("u1");
        let checked = owns_or_fail(Some(doc.clone()), &OwnerId::new("u1")).unwrap();
        assert_eq!(checked, doc);
    }

    #[test]
    fn other_owner_and_absent_look_the_same() {
        let foreign = owns_or_fail(Some(owned_by("u1")), &OwnerId::new("u2")).unwrap_err();
        let absent = owns_or_fail(None, &OwnerId::new("u2")).unwrap_err();
        assert!(matches!(foreign, WebsiteError::NotFoundOrUnauthorized));
        assert!(matches!(absent, WebsiteError::NotFoundOrUnauthorized));
        assert_eq!(foreign.to_string(), absent.to_string());
    }
}
