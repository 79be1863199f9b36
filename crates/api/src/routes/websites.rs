use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, JsonRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use site_forge_core::document::WebsiteId;
use site_forge_core::mutation::{ContentPatch, GenerateWebsite, ReplaceWebsite};
use site_forge_core::WebsiteError;

use crate::auth::Caller;
use crate::cache::ResponseCache;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Website routes. Everything except the preview requires a bearer token.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/website", get(list_websites))
        .route("/website/generate", post(generate_website))
        .route(
            "/website/{id}",
            get(get_website).put(replace_website).delete(delete_website),
        )
        .route("/website/{id}/content", patch(patch_website_content))
        .route("/website/{id}/preview", get(preview_website))
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })
}

fn raw_body(payload: Result<Bytes, BytesRejection>) -> ApiResult<Bytes> {
    payload.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge
        } else {
            ApiError::BadRequest(rejection.body_text())
        }
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}

async fn generate_website(
    State(state): State<AppState>,
    Caller(owner_id): Caller,
    payload: Result<Json<GenerateWebsite>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let request = json_body(payload)?;
    let website = state.service().generate(&owner_id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Website generated",
            "website_id": website.id,
            "website": website,
        })),
    ))
}

async fn list_websites(
    State(state): State<AppState>,
    Caller(owner_id): Caller,
) -> ApiResult<Json<Value>> {
    let key = ResponseCache::key(&owner_id, "/website");
    if let Some(body) = state.cache().get(&key).await {
        return Ok(Json(body));
    }

    let websites = state.service().list_documents(&owner_id).await?;
    let body = json!({ "websites": to_json(&websites)? });
    state.cache().insert(key, &owner_id, body.clone()).await;
    Ok(Json(body))
}

async fn get_website(
    State(state): State<AppState>,
    Caller(owner_id): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let key = ResponseCache::key(&owner_id, &format!("/website/{id}"));
    if let Some(body) = state.cache().get(&key).await {
        return Ok(Json(body));
    }

    let website = state.service().get_document(&id, &owner_id).await?;
    let body = to_json(&website)?;
    state.cache().insert(key, &owner_id, body.clone()).await;
    Ok(Json(body))
}

/// Anyone holding the id may preview a website.
async fn preview_website(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let website = state.service().get_document_public(&id).await?;
    Ok(Json(to_json(&website)?))
}

async fn replace_website(
    State(state): State<AppState>,
    Caller(owner_id): Caller,
    Path(id): Path<String>,
    payload: Result<Json<ReplaceWebsite>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    WebsiteId::parse(&id).map_err(WebsiteError::from)?;
    let replacement = json_body(payload)?;
    let website = state
        .service()
        .replace_document(&id, &owner_id, replacement)
        .await?;

    Ok(Json(json!({ "message": "Website updated", "website": website })))
}

async fn patch_website_content(
    State(state): State<AppState>,
    Caller(owner_id): Caller,
    Path(id): Path<String>,
    payload: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<Value>> {
    WebsiteId::parse(&id).map_err(WebsiteError::from)?;
    let body = raw_body(payload)?;
    let patch = ContentPatch::from_slice(&body).map_err(WebsiteError::from)?;
    let website = state
        .service()
        .merge_patch_content(&id, &owner_id, patch)
        .await?;

    Ok(Json(json!({ "message": "Website content updated", "website": website })))
}

async fn delete_website(
    State(state): State<AppState>,
    Caller(owner_id): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let deleted = state.service().delete_document(&id, &owner_id).await?;
    Ok(Json(json!({ "message": "Website deleted", "deleted": deleted })))
}
