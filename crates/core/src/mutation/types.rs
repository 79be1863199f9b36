/// Request payloads for the two edit styles: section-level merge-patch and
/// whole-document replace.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::document::validate::ValidationError;
use crate::document::{Content, Customizations};

/// Partial update of a website's `content`.
///
/// `sections` entries are kept as raw JSON: an entry without a string `type`
/// is skipped by the merge rather than failing the whole patch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ContentPatch {
    /// Parse a raw request body. An empty body, a non-object, or an object
    /// with none of the recognised keys is rejected.
    pub fn from_slice(body: &[u8]) -> Result<Self, ValidationError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(ValidationError::EmptyPatch);
        }
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ValidationError::MalformedPatch(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, ValidationError> {
        if !value.is_object() {
            return Err(ValidationError::PatchNotObject);
        }
        let patch: ContentPatch = serde_json::from_value(value)
            .map_err(|e| ValidationError::MalformedPatch(e.to_string()))?;
        patch.validate()?;
        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_none() && self.layout.is_none() && self.title.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Err(ValidationError::EmptyPatch)
        } else {
            Ok(())
        }
    }
}

/// Whole-document replacement. Every omitted field resets to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplaceWebsite {
    pub business_type: String,
    pub industry: String,
    pub content: Content,
    pub customizations: Customizations,
}

/// Request for a freshly generated website.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateWebsite {
    pub business_type: Option<String>,
    pub industry: Option<String>,
}
