//! Bearer-token caller identity.
//!
//! Tokens are issued by the external auth service. This layer only verifies
//! the HS256 signature and expiry and takes the `sub` claim as the owner id.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use site_forge_core::document::OwnerId;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// The authenticated caller of a request.
#[derive(Debug, Clone)]
pub struct Caller(pub OwnerId);

pub fn verify_token(token: &str, secret: &str) -> Result<OwnerId, ApiError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        tracing::debug!("rejected bearer token: {e}");
        ApiError::Unauthorized
    })?;

    if data.claims.sub.trim().is_empty() {
        return Err(ApiError::Unauthorized);
    }
    Ok(OwnerId::new(data.claims.sub))
}

impl FromRequestParts<AppState> for Caller {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;
        let owner_id = verify_token(bearer.token(), &state.config().jwt_secret)?;
        Ok(Caller(owner_id))
    }
}

#[cfg(test)]
pub(crate) fn issue_token(sub: &str, secret: &str) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    encode(
        &Header::default(),
        &Claims {
            sub: sub.to_string(),
            exp,
        },
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_token_yields_owner() {
        let token = issue_token("ada@example.com", "s3cret");
        assert_eq!(
            verify_token(&token, "s3cret").unwrap(),
            OwnerId::new("ada@example.com")
        );
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token("ada@example.com", "s3cret");
        assert!(matches!(verify_token(&token, "other"), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn blank_subject_is_rejected() {
        let token = issue_token("  ", "s3cret");
        assert!(matches!(verify_token(&token, "s3cret"), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(verify_token("not.a.jwt", "s3cret"), Err(ApiError::Unauthorized)));
    }
}
