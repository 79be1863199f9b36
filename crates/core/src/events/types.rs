use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::{OwnerId, WebsiteId};

/// Events emitted after a website mutation has been committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WebsiteEvent {
    Mutation(MutationEvent),
}

impl WebsiteEvent {
    pub fn owner_id(&self) -> &OwnerId {
        match self {
            WebsiteEvent::Mutation(event) => &event.owner_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationEvent {
    pub website_id: WebsiteId,
    pub owner_id: OwnerId,
    pub operation: MutationKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    Create,
    Replace,
    Patch,
    Delete,
}
