use thiserror::Error;

use crate::document::validate::ValidationError;
use crate::document::InvalidIdentifier;
use crate::generate::GenerationError;
use crate::store::StoreError;

/// Every way a website operation can fail. The HTTP layer owns the mapping
/// of these onto status codes.
#[derive(Debug, Error)]
pub enum WebsiteError {
    #[error(transparent)]
    InvalidIdentifier(#[from] InvalidIdentifier),

    #[error("invalid patch: {0}")]
    InvalidPatch(ValidationError),

    #[error("{0}")]
    MissingFields(ValidationError),

    /// Absent and not-owned are deliberately indistinguishable.
    #[error("website not found or unauthorized")]
    NotFoundOrUnauthorized,

    #[error("content generation failed: {0}")]
    GenerationFailure(#[from] GenerationError),

    #[error("store failure: {0}")]
    StoreFailure(#[from] StoreError),
}

impl From<ValidationError> for WebsiteError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingFields(_) => WebsiteError::MissingFields(err),
            ValidationError::EmptyPatch
            | ValidationError::PatchNotObject
            | ValidationError::MalformedPatch(_) => WebsiteError::InvalidPatch(err),
        }
    }
}

pub type WebsiteResult<T> = Result<T, WebsiteError>;
